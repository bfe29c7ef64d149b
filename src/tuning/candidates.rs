//! Candidate-value sets for tuning variables.

use crate::errors::OctotuneError;

/// The values a tuning variable is allowed to take.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Candidates {
    /// Explicit set of values, tried in shuffled order.
    Set(Vec<i64>),
    /// Half-open range `[lo, hi)` with a positive step.
    Range { lo: i64, hi: i64, step: i64 },
}

impl Candidates {
    pub fn set(values: impl Into<Vec<i64>>) -> Self {
        Candidates::Set(values.into())
    }

    pub fn range(lo: i64, hi: i64, step: i64) -> Self {
        Candidates::Range { lo, hi, step }
    }

    /// Materialize the candidate list.
    pub fn values(&self) -> Vec<i64> {
        match self {
            Candidates::Set(values) => values.clone(),
            Candidates::Range { lo, hi, step } => {
                if *step <= 0 || hi <= lo {
                    return Vec::new();
                }
                let mut out = Vec::new();
                let mut v = *lo;
                while v < *hi {
                    out.push(v);
                    v += step;
                }
                out
            }
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        match self {
            Candidates::Set(values) => values.contains(&value),
            Candidates::Range { lo, hi, step } => {
                *step > 0 && value >= *lo && value < *hi && (value - lo) % step == 0
            }
        }
    }

    pub(crate) fn validate(&self, name: &str) -> Result<(), OctotuneError> {
        if let Candidates::Range { lo, hi, step } = *self {
            if step <= 0 || hi < lo {
                return Err(OctotuneError::InvalidCandidateRange {
                    name: name.to_string(),
                    lo,
                    hi,
                    step,
                });
            }
        }
        if self.values().is_empty() {
            return Err(OctotuneError::EmptyCandidates(name.to_string()));
        }
        Ok(())
    }
}

/// Declaration of a tunable output variable.
#[derive(Clone, Debug)]
pub struct VariableInfo {
    pub name: String,
    pub candidates: Candidates,
    pub default: i64,
}

impl VariableInfo {
    pub fn new(name: impl Into<String>, candidates: Candidates, default: i64) -> Self {
        Self {
            name: name.into(),
            candidates,
            default,
        }
    }

    /// Categorical variable over `0..n`, defaulting to the first option.
    pub fn categorical(name: impl Into<String>, n: usize) -> Self {
        Self::new(name, Candidates::range(0, n as i64, 1), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_materializes_with_step() {
        let c = Candidates::range(0, 10, 3);
        assert_eq!(c.values(), vec![0, 3, 6, 9]);
        assert!(c.contains(6));
        assert!(!c.contains(7));
        assert!(!c.contains(10));
    }

    #[test]
    fn bad_range_rejected() {
        assert!(Candidates::range(0, 10, 0).validate("x").is_err());
        assert!(Candidates::set(vec![]).validate("x").is_err());
        assert!(Candidates::set(vec![1]).validate("x").is_ok());
    }
}
