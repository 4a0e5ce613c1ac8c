//! voxrelay API Routes
//!
//! - /health - Liveness and configuration summary
//! - /api/voices - Voice catalog passthrough (wildcard CORS)
//! - /api/speech - Text-to-speech, streamed audio
//! - /api/assistant/runs - Create (POST) and poll (GET) assistant runs

pub mod assistant;
pub mod health;
pub mod speech;
pub mod swagger;
pub mod voices;
