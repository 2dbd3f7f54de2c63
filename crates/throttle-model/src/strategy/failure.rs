use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::{ModelError, ModelResult};

/// Defines how a runner reacts when one of its tasks fails.
///
/// Strategies:
/// - `BestEffort`: record the failure and keep admitting the rest of the backlog.
///   Other in-flight tasks are left alone and the run as a whole never fails.
/// - `CancelOnFailure`: on the first failure (or timeout) signal cancellation to every
///   in-flight task and resolve the remaining backlog as canceled without running it.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailurePolicy {
    /// Keep going; failures are only recorded.
    #[default]
    BestEffort,
    /// Stop executing new work after the first failure.
    CancelOnFailure,
}

impl FailurePolicy {
    /// Returns `true` if a failed outcome should cancel the rest of the run.
    #[inline]
    pub fn cancels_on_failure(&self) -> bool {
        matches!(self, FailurePolicy::CancelOnFailure)
    }
}

impl FromStr for FailurePolicy {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best-effort" | "besteffort" | "continue" | "" => Ok(FailurePolicy::BestEffort),
            "cancel-on-failure" | "cancelonfailure" | "fail-fast" => {
                Ok(FailurePolicy::CancelOnFailure)
            }
            other => Err(ModelError::UnknownFailurePolicy(other.to_string())),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailurePolicy::BestEffort => "best-effort",
            FailurePolicy::CancelOnFailure => "cancel-on-failure",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_best_effort() {
        assert_eq!(FailurePolicy::default(), FailurePolicy::BestEffort);
        assert!(!FailurePolicy::default().cancels_on_failure());
    }

    #[test]
    fn parses_aliases() {
        assert_eq!(
            "fail-fast".parse::<FailurePolicy>().unwrap(),
            FailurePolicy::CancelOnFailure
        );
        assert_eq!(
            " Best-Effort ".parse::<FailurePolicy>().unwrap(),
            FailurePolicy::BestEffort
        );
        assert!(matches!(
            "retry".parse::<FailurePolicy>(),
            Err(ModelError::UnknownFailurePolicy(s)) if s == "retry"
        ));
    }

    #[test]
    fn display_parses_back() {
        for p in [FailurePolicy::BestEffort, FailurePolicy::CancelOnFailure] {
            assert_eq!(p.to_string().parse::<FailurePolicy>().unwrap(), p);
        }
    }

    #[test]
    fn serde_uses_camel_case() {
        let json = serde_json::to_string(&FailurePolicy::CancelOnFailure).unwrap();
        assert_eq!(json, r#""cancelOnFailure""#);
    }
}
