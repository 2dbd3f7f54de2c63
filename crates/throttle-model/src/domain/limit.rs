use std::{fmt, num::NonZeroUsize, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Maximum number of tasks a runner keeps in flight at the same time.
///
/// A limit of zero would never admit anything, so it is rejected at construction,
/// parsing and deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct ConcurrencyLimit(NonZeroUsize);

impl ConcurrencyLimit {
    /// A limit of one: tasks run strictly one after another.
    pub const SERIAL: Self = Self(NonZeroUsize::MIN);

    /// Create a limit, rejecting zero.
    pub fn new(limit: usize) -> ModelResult<Self> {
        NonZeroUsize::new(limit)
            .map(Self)
            .ok_or(ModelError::ZeroConcurrency)
    }

    /// Raw limit value (always >= 1).
    #[inline]
    pub fn get(&self) -> usize {
        self.0.get()
    }
}

impl Default for ConcurrencyLimit {
    fn default() -> Self {
        Self::SERIAL
    }
}

impl From<NonZeroUsize> for ConcurrencyLimit {
    fn from(n: NonZeroUsize) -> Self {
        Self(n)
    }
}

impl TryFrom<usize> for ConcurrencyLimit {
    type Error = ModelError;
    fn try_from(n: usize) -> ModelResult<Self> {
        Self::new(n)
    }
}

impl From<ConcurrencyLimit> for usize {
    fn from(l: ConcurrencyLimit) -> Self {
        l.get()
    }
}

impl FromStr for ConcurrencyLimit {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        let n = s
            .trim()
            .parse::<usize>()
            .map_err(|e| ModelError::InvalidConcurrency(format!("{s}: {e}")))?;
        Self::new(n)
    }
}

impl fmt::Display for ConcurrencyLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_rejected() {
        assert!(matches!(
            ConcurrencyLimit::new(0),
            Err(ModelError::ZeroConcurrency)
        ));
        assert!(matches!(
            "0".parse::<ConcurrencyLimit>(),
            Err(ModelError::ZeroConcurrency)
        ));
    }

    #[test]
    fn parses_positive_values() {
        assert_eq!(" 4 ".parse::<ConcurrencyLimit>().unwrap().get(), 4);
        assert_eq!(ConcurrencyLimit::new(1).unwrap(), ConcurrencyLimit::SERIAL);
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "-1", "two", "1.5"] {
            assert!(
                bad.parse::<ConcurrencyLimit>().is_err(),
                "expected error for {bad:?}"
            );
        }
    }

    #[test]
    fn deserialize_rejects_zero() {
        assert!(serde_json::from_str::<ConcurrencyLimit>("0").is_err());

        let l: ConcurrencyLimit = serde_json::from_str("8").unwrap();
        assert_eq!(l.get(), 8);
        assert_eq!(serde_json::to_string(&l).unwrap(), "8");
    }
}
