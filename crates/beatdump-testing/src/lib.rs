//! Testing infrastructure for beatdump tests.
//!
//! - `ScriptedTransport`: in-memory `SearchTransport` with queued replies
//! - `fixtures`: search hits and response bodies

pub mod fixtures;
mod transport;

pub use fixtures::page_body;
pub use transport::ScriptedTransport;
