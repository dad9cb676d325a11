//! Script diagnostics sink.
//!
//! Evaluation and the scene facade report user-facing conditions (name
//! collisions, bad operands, parse failures) through a [`ScriptLog`] owned
//! by the scene, so an editor front-end can render them in-app while tests
//! capture them for assertions.

/// Severity of one log entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Debug,
    Error,
}

/// Where script diagnostics go.
///
/// `Tracing` is the default and forwards to the process-wide subscriber;
/// `Capture` buffers entries in order for later inspection; `Silent` drops
/// everything.
#[derive(Debug, Default)]
pub enum ScriptLog {
    #[default]
    Tracing,
    Capture(Vec<(Severity, String)>),
    Silent,
}

impl ScriptLog {
    /// Create a capturing log with an empty buffer.
    pub fn capture() -> Self {
        ScriptLog::Capture(Vec::new())
    }

    /// Report a recoverable condition the script author should see.
    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message.into());
    }

    /// Report detail useful when tracing script behavior.
    pub fn debug(&mut self, message: impl Into<String>) {
        self.push(Severity::Debug, message.into());
    }

    /// Report a condition that stopped evaluation.
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message.into());
    }

    fn push(&mut self, severity: Severity, message: String) {
        match self {
            ScriptLog::Tracing => match severity {
                Severity::Warning => tracing::warn!(target: "script", "{message}"),
                Severity::Debug => tracing::debug!(target: "script", "{message}"),
                Severity::Error => tracing::error!(target: "script", "{message}"),
            },
            ScriptLog::Capture(entries) => entries.push((severity, message)),
            ScriptLog::Silent => {}
        }
    }

    /// Buffered entries, oldest first. Empty for non-capturing logs.
    pub fn captured(&self) -> &[(Severity, String)] {
        match self {
            ScriptLog::Capture(entries) => entries,
            _ => &[],
        }
    }

    /// Drop all buffered entries.
    pub fn clear(&mut self) {
        if let ScriptLog::Capture(entries) = self {
            entries.clear();
        }
    }
}
