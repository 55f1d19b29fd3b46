/// Result of a call that never fails outright.
///
/// External lookups in the recommendation pipeline always produce a usable
/// value. When the real call fails they return a fixed fallback and keep the
/// cause, so callers and tests can tell the two apart without inspecting logs.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The external call succeeded
    Success(T),
    /// The external call failed and `fallback` stands in for its result
    Degraded { fallback: T, cause: String },
}

impl<T> Outcome<T> {
    pub fn degraded(fallback: T, cause: impl ToString) -> Self {
        Outcome::Degraded {
            fallback,
            cause: cause.to_string(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }

    /// The usable value, whichever variant this is
    pub fn value(&self) -> &T {
        match self {
            Outcome::Success(value) => value,
            Outcome::Degraded { fallback, .. } => fallback,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Success(value) => value,
            Outcome::Degraded { fallback, .. } => fallback,
        }
    }

    pub fn cause(&self) -> Option<&str> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Degraded { cause, .. } => Some(cause),
        }
    }
}
