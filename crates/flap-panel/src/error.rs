#![forbid(unsafe_code)]

//! Construction errors.
//!
//! A constructed controller never fails an operation: the worst outcome of
//! any call is that the panel keeps its current state. Everything that can
//! go wrong is caught when the controller is built.

use std::fmt;

/// Reasons a [`FlapController`](crate::FlapController) refuses to start.
#[derive(Debug, Clone, PartialEq)]
pub enum FlapError {
    /// The host viewport has no usable height.
    InvalidHost { height: f64 },
    /// There is no content to host.
    EmptyContent { height: f64 },
    /// The configuration failed validation.
    InvalidConfig(Vec<String>),
}

impl fmt::Display for FlapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHost { height } => {
                write!(f, "host height must be finite and positive, got {height}")
            }
            Self::EmptyContent { height } => {
                write!(f, "content height must be finite and positive, got {height}")
            }
            Self::InvalidConfig(errors) => {
                write!(f, "invalid panel config: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for FlapError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            FlapError::EmptyContent { height: 0.0 }.to_string(),
            "content height must be finite and positive, got 0"
        );
        assert_eq!(
            FlapError::InvalidConfig(vec!["x".into(), "y".into()]).to_string(),
            "invalid panel config: x; y"
        );
    }
}
