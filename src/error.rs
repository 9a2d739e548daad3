//! Error module for the Rusty Spike Sort library.
use std::error::Error;
use std::fmt;

/// Error types for the library.
#[derive(Debug, PartialEq)]
pub enum SortError {
    /// Error for an unusable signal, e.g., empty or containing NaN or infinite samples.
    InvalidSignal(String),
    /// Error for invalid parameters, e.g., negative durations or non-positive sampling frequency.
    InvalidParameter(String),
    /// Error for out of bounds access, e.g., a spike index past the end of the signal.
    OutOfBounds(String),
    /// Error for I/O operations.
    IOError(String),
}

impl fmt::Display for SortError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SortError::InvalidSignal(e) => write!(f, "Invalid signal: {}", e),
            SortError::InvalidParameter(e) => write!(f, "Invalid parameters: {}", e),
            SortError::OutOfBounds(e) => {
                write!(f, "Index out of bounds: {}", e)
            }
            SortError::IOError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl Error for SortError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            SortError::InvalidParameter("dead time must be non-negative".to_string()).to_string(),
            "Invalid parameters: dead time must be non-negative"
        );
        assert_eq!(
            SortError::OutOfBounds("index 42 for 10 samples".to_string()).to_string(),
            "Index out of bounds: index 42 for 10 samples"
        );
    }
}
