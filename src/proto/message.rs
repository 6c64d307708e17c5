// src/proto/message.rs

use std::time::SystemTime;

/// One decoded line of the tool's machine-readable output.
///
/// Constructed by [`parse_line`](super::parse_line), delivered synchronously
/// to the [`Terminal`](crate::exec::Terminal) and then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// When the tool emitted the line, at seconds resolution.
    pub timestamp: SystemTime,
    /// Build the message refers to; `None` for global messages.
    pub target: Option<String>,
    /// Message category, e.g. [`Message::TYPE_UI`].
    pub kind: String,
    /// Category-dependent payload fields, already unescaped.
    pub data: Vec<String>,
}

impl Message {
    /// Human-readable output. Data field 0 is one of the `DATA_UI_*`
    /// subtypes, field 1 the text.
    pub const TYPE_UI: &'static str = "ui";

    /// How many artifacts a particular build produced.
    pub const TYPE_ARTIFACT_COUNT: &'static str = "artifact-count";

    /// Information about an artifact created by a build. Data fields are
    /// `artifact_number`, `key` (one of the `DATA_ARTIFACT_*` keys) and
    /// `value`.
    pub const TYPE_ARTIFACT: &'static str = "artifact";

    /// Version of the running tool.
    pub const TYPE_VERSION: &'static str = "version";

    /// `dev` when the version is a prerelease, blank otherwise.
    pub const TYPE_VERSION_PRERELEASE: &'static str = "version-prerelease";

    /// Git commit the tool was built from.
    pub const TYPE_VERSION_COMMIT: &'static str = "version-commit";

    /// Announcement of a new step in the build process.
    pub const DATA_UI_SAY: &'static str = "say";

    /// Routine update during the build process.
    pub const DATA_UI_MESSAGE: &'static str = "message";

    /// Reserved for errors.
    pub const DATA_UI_ERROR: &'static str = "error";

    pub const DATA_ARTIFACT_BUILDER_ID: &'static str = "builder-id";
    pub const DATA_ARTIFACT_ID: &'static str = "id";
    pub const DATA_ARTIFACT_STRING: &'static str = "string";
    pub const DATA_ARTIFACT_FILES_COUNT: &'static str = "files-count";
    pub const DATA_ARTIFACT_END: &'static str = "end";
}
