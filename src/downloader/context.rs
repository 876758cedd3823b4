// Per-session operation context
//
// Replaces the ambient globals of a typical glue script: the logger handle
// is the process-wide tracing dispatcher, and the last failure detail lives
// here instead of in a module-level variable so the debug display can show
// it without any shared mutable state.

#[derive(Debug, Default)]
pub struct OpContext {
    last_error: Option<String>,
}

impl OpContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the most recent failure detail for the debug display.
    pub fn record_failure(&mut self, detail: impl Into<String>) {
        self.last_error = Some(detail.into());
    }

    pub fn clear(&mut self) {
        self.last_error = None;
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
