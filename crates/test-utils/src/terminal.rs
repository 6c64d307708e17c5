use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use packgate::errors::{AbortCause, TerminalError};
use packgate::proto::Message;
use packgate::Terminal;

/// A [`Terminal`] that journals every received message.
///
/// Optional behaviours for exercising the drain loop:
/// - abort the execution when a message of a given kind arrives
/// - fail (non-abort) on a given kind, dropping that message
/// - sleep before handling each message, to simulate a slow receiver
pub struct RecordingTerminal {
    messages: Mutex<Vec<Message>>,
    working_dir: Option<PathBuf>,
    abort_on_kind: Option<(String, AbortCause)>,
    fail_on_kind: Option<String>,
    receive_delay: Option<Duration>,
}

impl RecordingTerminal {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            working_dir: None,
            abort_on_kind: None,
            fail_on_kind: None,
            receive_delay: None,
        }
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Raise `cause` when a message of kind `kind` is received. The
    /// triggering message is still recorded first.
    pub fn abort_on_kind(mut self, kind: &str, cause: AbortCause) -> Self {
        self.abort_on_kind = Some((kind.to_string(), cause));
        self
    }

    /// Return a non-abort receiver error for messages of kind `kind`; such
    /// messages must be dropped by the drain loop without stopping it.
    pub fn fail_on_kind(mut self, kind: &str) -> Self {
        self.fail_on_kind = Some(kind.to_string());
        self
    }

    pub fn with_receive_delay(mut self, delay: Duration) -> Self {
        self.receive_delay = Some(delay);
        self
    }

    /// Snapshot of the messages received so far, in delivery order.
    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().unwrap().clone()
    }

    /// Kinds of the received messages, in delivery order.
    pub fn kinds(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .map(|message| message.kind)
            .collect()
    }
}

impl Default for RecordingTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for RecordingTerminal {
    fn working_dir(&self) -> Option<PathBuf> {
        self.working_dir.clone()
    }

    fn receive(&self, message: Message) -> Result<(), TerminalError> {
        if let Some(delay) = self.receive_delay {
            std::thread::sleep(delay);
        }
        if let Some(failing) = &self.fail_on_kind {
            if message.kind == *failing {
                return Err(anyhow::anyhow!("receiver failure on kind {failing}").into());
            }
        }
        let kind = message.kind.clone();
        self.messages.lock().unwrap().push(message);
        if let Some((aborting, cause)) = &self.abort_on_kind {
            if kind == *aborting {
                return Err(TerminalError::Abort(cause.clone()));
            }
        }
        Ok(())
    }
}
