//! voxrelay Domain Library
//!
//! Core types shared by the relay server and its clients.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain/`): transient request/response records
//!   - `entities/`: RunHandle, PollResult, Voice, validated request payloads
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `AssistantRelay`: create-run / poll-run against a relay
//!
//! - **Driver** (`driver`): client-side poll loop that turns an utterance
//!   into the assistant's answer
//!
//! # Usage
//!
//! ```rust,ignore
//! use voxrelay::{PollSettings, RunDriver};
//!
//! let driver = RunDriver::new(client).with_settings(PollSettings::default());
//! let answer = driver.ask("What's the weather like?").await?;
//! ```

pub mod domain;
pub mod driver;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    CreateRunPayload, CreateRunRequest, DomainError, PollQuery, PollResult, RunHandle,
    RunStarted, RunStatus, SpeechPayload, SpeechRequest, Validate, Voice, VoiceCatalog,
    DEFAULT_TTS_MODEL,
};
pub use driver::{DriverError, PollSettings, RunDriver};
pub use ports::AssistantRelay;
