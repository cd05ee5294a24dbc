use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown identity: {0}")]
    UnknownIdentity(String),
    #[error("no counter provisioned for identity: {0}")]
    UnprovisionedCounter(String),
    #[error("invalid or out of range code")]
    InvalidOrOutOfRangeCode,
    #[error("failed to persist counters")]
    PersistenceFailure(#[from] std::io::Error),
    #[error("invalid secret: {0}")]
    InvalidSecret(String),
    #[error("invalid identity: {0:?}")]
    InvalidIdentity(String),
    #[error("increment must be greater than zero")]
    InvalidIncrement,
    #[error("code length must be between 1 and 9 digits, got {0}")]
    InvalidDigits(u32),
    #[error("counter for {identity} cannot move back from {stored} to {requested}")]
    CounterRegression {
        identity: String,
        stored: u64,
        requested: u64,
    },
}

impl Error {
    /// True when the submitted credentials were refused, as opposed to the
    /// validator being unable to decide (storage or configuration problems).
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::UnknownIdentity(_) | Self::InvalidOrOutOfRangeCode
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_rejection() {
        assert!(Error::InvalidOrOutOfRangeCode.is_rejection());
        assert!(Error::UnknownIdentity("qwerty".to_string()).is_rejection());
        assert!(!Error::UnprovisionedCounter("qwerty".to_string()).is_rejection());
        assert!(!Error::InvalidIncrement.is_rejection());
        assert!(!Error::InvalidDigits(0).is_rejection());
        assert!(!Error::PersistenceFailure(std::io::Error::other("disk full")).is_rejection());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Error::UnknownIdentity("qwerty".to_string()).to_string(),
            "unknown identity: qwerty"
        );
        assert_eq!(
            Error::InvalidIdentity("two words".to_string()).to_string(),
            "invalid identity: \"two words\""
        );
        assert_eq!(
            Error::CounterRegression {
                identity: "qwerty".to_string(),
                stored: 3,
                requested: 1,
            }
            .to_string(),
            "counter for qwerty cannot move back from 3 to 1"
        );
    }
}
