use thiserror::Error;

/// Malformed wire data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("`{0}` is not a hexadecimal timestamp")]
    NotHex(String),
    #[error("timestamp `{0}` does not fit in 64 bits")]
    Overflow(String),
    #[error("{0} seconds since the epoch is not a representable instant")]
    OutOfRange(u64),
    #[error("instant {0} lies before the epoch and has no wire encoding")]
    BeforeEpoch(i64),
}

/// Data that decodes fine but breaks one of the log invariants.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IntegrityError {
    #[error("entry {index} ends at {end} before it starts at {start}")]
    EndBeforeStart { index: usize, start: i64, end: i64 },
    #[error("entry {index} is open but isn't the last entry of the log")]
    OpenNotLast { index: usize },
    #[error("entry {index} starts before the previous entry")]
    OutOfOrder { index: usize },
    #[error("a session is already in progress")]
    SessionAlreadyOpen,
    #[error("there is no session in progress")]
    NoOpenSession,
    #[error("entry {index} overlaps the previous block by {overlap:.6}% of the day")]
    Overlap { index: usize, overlap: f64 },
    #[error("frequency bucket {index} holds invalid value {value}")]
    InvalidFrequency { index: usize, value: f64 },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LogError {
    #[error("entry {index}: {source}")]
    Format {
        index: usize,
        #[source]
        source: FormatError,
    },
    #[error(transparent)]
    Integrity(#[from] IntegrityError),
}
