//! The three-way result returned at the dispatcher's public boundary.
use crate::error::DispatchError;

/// Result of a public dispatcher operation.
///
/// `SoftFailure` marks input that was handled but could not be honoured (an
/// unknown user in a link, a malformed link payload). The user has already
/// been told about it, so callers usually only need to stop.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    SoftFailure(String),
    Error(DispatchError),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_soft_failure(&self) -> bool {
        matches!(self, Outcome::SoftFailure(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&DispatchError> {
        match self {
            Outcome::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Collapses a fallible computation that already decided its own outcome.
    pub fn flatten(result: Result<Outcome<T>, DispatchError>) -> Self {
        result.unwrap_or_else(Outcome::Error)
    }
}

impl<T> From<Result<T, DispatchError>> for Outcome<T> {
    fn from(result: Result<T, DispatchError>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(err) => Outcome::Error(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_conversion_keeps_errors_apart_from_soft_failures() {
        let ok: Outcome<u8> = Ok(1).into();
        assert_eq!(ok, Outcome::Success(1));

        let err: Outcome<u8> = Err(DispatchError::App("boom".into())).into();
        assert_eq!(err.error(), Some(&DispatchError::App("boom".into())));
        assert!(!err.is_soft_failure());

        let soft: Outcome<u8> =
            Outcome::flatten(Ok(Outcome::SoftFailure("unknown user".into())));
        assert!(soft.is_soft_failure());
        assert!(soft.error().is_none());
    }
}
