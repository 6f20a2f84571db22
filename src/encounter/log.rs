use chrono::Local;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogSource {
    Bot,
    System,
    Model,
    Error,
}

impl LogSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogSource::Bot => "BOT",
            LogSource::System => "SYSTEM",
            LogSource::Model => "MODEL",
            LogSource::Error => "ERROR",
        }
    }
}

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub timestamp: String,
    pub message: String,
    pub source: LogSource,
}

/// Append-only event log shown to the operator. Cleared only when a new run
/// begins or the mode changes.
#[derive(Default, Debug)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

impl EventLog {
    pub fn push<S: Into<String>>(&mut self, source: LogSource, message: S) {
        let message = message.into();
        tracing::debug!(source = source.as_str(), "{message}");
        self.entries.push(LogEntry {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            message,
            source,
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// The most recent `count` entries, oldest first.
    pub fn tail(&self, count: usize) -> &[LogEntry] {
        let start = self.entries.len().saturating_sub(count);
        &self.entries[start..]
    }
}

#[cfg(test)]
impl EventLog {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|entry| entry.message.contains(needle))
    }
}
