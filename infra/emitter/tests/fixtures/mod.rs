use parking_lot::Mutex;
use std::io;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestEvent(pub i64, pub i64);

/// Shared call log that listeners append `label:a,b` entries to.
#[derive(Clone, Debug, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorder(
        &self,
        label: &'static str,
    ) -> impl Fn(&TestEvent) + Clone + Send + Sync + 'static {
        let calls = Arc::clone(&self.calls);
        move |TestEvent(a, b)| calls.lock().push(format!("{label}:{a},{b}"))
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.calls.lock().push(entry.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn count(&self, label: &str) -> usize {
        let prefix = format!("{label}:");
        self.calls.lock().iter().filter(|c| c.starts_with(&prefix)).count()
    }
}

/// In-memory sink for `tracing-subscriber` output.
#[derive(Clone, Debug, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
