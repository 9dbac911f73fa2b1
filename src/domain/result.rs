//! Result type alias for the scrubber

use super::errors::ScrubError;

/// Result type alias for scrubber operations
///
/// # Examples
///
/// ```
/// use scrubber::domain::result::Result;
/// use scrubber::domain::errors::ScrubError;
///
/// fn failing_function() -> Result<()> {
///     Err(ScrubError::Configuration("missing DEFAULT operator".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ScrubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<usize> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(ScrubError::Overlap("test".to_string()));
        assert!(result.is_err());
    }
}
