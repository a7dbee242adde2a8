// Shared test infrastructure for unit and integration tests.
//
// Gateway traffic goes through `RecordingTransport`, which answers from
// scripted responses and keeps every request it was asked to send.
//
// Usage:
//   #[path = "../helpers/mod.rs"]
//   mod helpers;
//   use helpers::*;

#![allow(dead_code)]

pub mod fixtures;
pub mod recording_transport;

pub use fixtures::*;
pub use recording_transport::*;
