//! Result type alias for Veil

use super::errors::VeilError;

/// Result type alias for Veil operations
///
/// # Examples
///
/// ```
/// use veil::domain::result::Result;
/// use veil::domain::errors::VeilError;
///
/// fn pool_size(requested: usize) -> Result<usize> {
///     if requested == 0 {
///         return Err(VeilError::Validation("pool size must be > 0".to_string()));
///     }
///     Ok(requested)
/// }
///
/// assert!(pool_size(0).is_err());
/// ```
pub type Result<T> = std::result::Result<T, VeilError>;
