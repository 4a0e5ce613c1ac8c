//! Domain Entities
//!
//! Transient records exchanged between client, relay and upstream.
//! - Run: RunHandle / RunStarted / PollResult for the assistant run protocol
//! - Request: validated client payloads (speech, create run, poll)
//! - Voice: voice catalog entries

mod request;
mod run;
mod voice;

pub use request::*;
pub use run::*;
pub use voice::*;
