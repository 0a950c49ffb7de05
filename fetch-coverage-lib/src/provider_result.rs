use std::sync::Arc;

/// Outcome of asking a single coverage source about a repository.
#[derive(Debug, Clone)]
pub enum ProviderResult<T> {
    /// The source reported data.
    Found(T),

    /// The source has no data for the repository. This is a valid negative, not a failure.
    Unavailable(Arc<str>),

    /// The source could not be queried or answered with something unexpected.
    Error(Arc<ohno::AppError>),
}

impl<T> ProviderResult<T> {
    /// Returns `true` if the result is `Error`.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns a reference to the contained data if `Found`, otherwise `None`.
    #[must_use]
    pub const fn as_ref(&self) -> Option<&T> {
        match self {
            Self::Found(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn unavailable(reason: impl Into<Arc<str>>) -> Self {
        Self::Unavailable(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ohno::app_err;

    #[test]
    fn test_found_variant() {
        let result: ProviderResult<f64> = ProviderResult::Found(42.0);
        assert_eq!(result.as_ref(), Some(&42.0));
        assert!(!result.is_error());
    }

    #[test]
    fn test_zero_is_found() {
        let result: ProviderResult<f64> = ProviderResult::Found(0.0);
        assert_eq!(result.as_ref(), Some(&0.0));
    }

    #[test]
    fn test_unavailable_is_not_found() {
        let result: ProviderResult<f64> = ProviderResult::unavailable("repository not registered");
        assert!(!result.is_error());
        assert_eq!(result.as_ref(), None);
    }

    #[test]
    fn test_error_is_not_found() {
        let result: ProviderResult<f64> = ProviderResult::Error(Arc::new(app_err!("test error")));
        assert!(result.is_error());
        assert_eq!(result.as_ref(), None);
    }

    #[test]
    fn test_debug_variants() {
        let found: ProviderResult<i32> = ProviderResult::Found(42);
        let debug_str = format!("{found:?}");
        assert!(debug_str.contains("Found"));
        assert!(debug_str.contains("42"));

        let unavailable: ProviderResult<i32> = ProviderResult::unavailable("nope");
        assert!(format!("{unavailable:?}").contains("Unavailable"));
    }
}
