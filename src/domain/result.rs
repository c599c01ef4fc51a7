//! Result type alias for the samples

use super::errors::SampleError;

/// Result type alias for sample operations
///
/// # Examples
///
/// ```
/// use cosmos_family::domain::result::Result;
/// use cosmos_family::domain::errors::SampleError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SampleError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SampleError>;
