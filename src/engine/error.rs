use ulid::Ulid;

/// Failures outside the normal validation flow. An invalid selection is never
/// one of these; see `ValidationResult`.
#[derive(Debug)]
pub enum ScheduleError {
    InvalidDay(u8),
    InvalidConfig(String),
    NoRuntime,
    SessionNotFound(Ulid),
    LimitExceeded(&'static str),
    Listings(String),
}

impl std::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleError::InvalidDay(i) => write!(f, "invalid day index {i}: expected 0..=6"),
            ScheduleError::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            ScheduleError::NoRuntime => {
                write!(f, "no tokio runtime available for deferred validation")
            }
            ScheduleError::SessionNotFound(id) => write!(f, "session not found: {id}"),
            ScheduleError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            ScheduleError::Listings(msg) => write!(f, "listing data error: {msg}"),
        }
    }
}

impl std::error::Error for ScheduleError {}
