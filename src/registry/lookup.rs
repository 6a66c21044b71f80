//! Outcome of a recoverable registry lookup.

/// What a lookup-style call produced.
///
/// Absence and transient failure are expected outcomes, not errors: callers
/// typically fall back to another dependency source (e.g., Git) on either.
/// Keeping them distinct lets callers decide without parsing log output.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// The registry returned the record.
    Found(T),
    /// The registry answered 404.
    NotFound,
    /// The request failed for any other reason.
    Failed(String),
}

impl<T> Lookup<T> {
    /// Borrow the record, if found.
    pub fn found(&self) -> Option<&T> {
        match self {
            Lookup::Found(value) => Some(value),
            _ => None,
        }
    }

    /// Discard the miss reason.
    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Lookup::NotFound)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Lookup::Failed(_))
    }

    /// Transform the found record, keeping miss reasons.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::NotFound => Lookup::NotFound,
            Lookup::Failed(reason) => Lookup::Failed(reason),
        }
    }
}
