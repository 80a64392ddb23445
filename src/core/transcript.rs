use std::sync::{Arc, Mutex, MutexGuard};

/// Ordered record of the console lines a demonstration produced.
///
/// Clones share the same buffer, so a handler or subscriber can hold its own
/// copy and the caller still sees every line. With echo enabled each line is
/// also printed to stdout as it is recorded.
#[derive(Clone, Default)]
pub struct Transcript {
    lines: Arc<Mutex<Vec<String>>>,
    echo: bool,
}

impl Transcript {
    /// A silent transcript; lines are only recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// A transcript that also prints every line.
    pub fn echoing() -> Self {
        Self {
            lines: Arc::default(),
            echo: true,
        }
    }

    pub fn line(&self, line: impl Into<String>) {
        let line = line.into();
        if self.echo {
            println!("{}", line);
        }
        self.lock().push(line);
    }

    /// Snapshot of every line recorded so far.
    pub fn lines(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Drains the buffer, returning what was recorded.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        // A panicking writer cannot leave a Vec<String> half-pushed.
        self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for Transcript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transcript")
            .field("lines", &*self.lock())
            .field("echo", &self.echo)
            .finish()
    }
}
