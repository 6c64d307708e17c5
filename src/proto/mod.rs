// src/proto/mod.rs

//! Machine-readable output protocol.
//!
//! The tool is run with its machine-readable flag and writes one
//! comma-separated record per stdout line:
//!
//! ```text
//! <epoch-seconds>,<target-or-empty>,<type>,<data-0>,<data-1>,...
//! ```
//!
//! Literal commas inside data fields are pre-escaped by the producer as
//! `%!(PACKER_COMMA)`, and literal newlines / carriage returns as the
//! two-character sequences `\n` / `\r`.
//!
//! - [`message`] holds the decoded [`Message`] value and the known type and
//!   data constants.
//! - [`parser`] decodes one raw line into a message.

pub mod message;
pub mod parser;

pub use message::Message;
pub use parser::parse_line;
