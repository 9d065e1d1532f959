//! Payload access layer: reading and unescaping backend payloads.

mod payload;

pub use payload::{unescape_html, PayloadInputs, PayloadSet, PayloadSource};
