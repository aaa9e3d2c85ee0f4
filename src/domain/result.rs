//! Result type alias for Ledgerlift
//!
//! This module provides a convenient Result type alias that uses LiftError
//! as the error type.

use super::errors::LiftError;

/// Result type alias for Ledgerlift operations
///
/// # Examples
///
/// ```
/// use ledgerlift::domain::result::Result;
/// use ledgerlift::domain::errors::LiftError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(LiftError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, LiftError>;
