use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Cannot parse date '{input}' (expected YYYY-MM-DD)")]
    DateParse { input: String },

    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange { start: String, end: String },

    #[error("Date arithmetic out of range: {anchor} {unit} offset {offset}")]
    DateOutOfRange { anchor: String, unit: &'static str, offset: i64 },

    #[error("Unknown status filter '{0}'")]
    UnknownStatus(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StatsResult<T> = Result<T, StatsError>;
