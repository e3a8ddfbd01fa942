//! Result type alias for tally
//!
//! This module provides a convenient Result type alias that uses TallyError
//! as the error type.

use super::errors::TallyError;

/// Result type alias for tally operations
///
/// This is a convenience type alias that uses `TallyError` as the error type.
/// Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use tally::domain::result::Result;
/// use tally::domain::errors::TallyError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(TallyError::Pipeline("invalid stage".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, TallyError>;
