//! Unified error code interface for Weft crates.
//!
//! Every error enum in the workspace implements [`ErrorCode`] so that
//! hosts and telemetry can branch on stable, machine-readable codes
//! instead of display strings.
//!
//! # Code Convention
//!
//! - UPPER_SNAKE_CASE, prefixed by domain: `EVENT_`, `CAP_`, `BRIDGE_`,
//!   `ROUTER_`, `CONFIG_`
//! - Stable once published (renaming a code is a breaking change)
//!
//! # Example
//!
//! ```
//! use weft_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum MountError {
//!     Full,
//!     Closed,
//! }
//!
//! impl ErrorCode for MountError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Full => "MOUNT_FULL",
//!             Self::Closed => "MOUNT_CLOSED",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Full)
//!     }
//! }
//!
//! assert_eq!(MountError::Full.code(), "MOUNT_FULL");
//! assert!(MountError::Full.is_recoverable());
//! ```

/// Machine-readable error classification.
///
/// Recoverability drives retry decisions: a full mount buffer may drain,
/// a malformed boundary message will never parse on retry.
pub trait ErrorCode {
    /// Returns the stable UPPER_SNAKE_CASE code for this error.
    fn code(&self) -> &'static str;

    /// Returns whether retrying the failed operation may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error code follows Weft conventions.
///
/// Checks that the code is non-empty, UPPER_SNAKE_CASE, and carries the
/// expected domain prefix.
///
/// # Panics
///
/// Panics with a descriptive message if any check fails.
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );
    assert!(
        is_upper_snake_case(code),
        "error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Asserts every variant of an error enum at once.
///
/// # Example
///
/// ```
/// use weft_types::{assert_error_codes, ErrorCode};
///
/// #[derive(Debug)]
/// enum E { A, B }
///
/// impl ErrorCode for E {
///     fn code(&self) -> &'static str {
///         match self { Self::A => "X_A", Self::B => "X_B" }
///     }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_codes(&[E::A, E::B], "X_");
/// ```
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum TestError {
        Transient,
        Fatal,
    }

    impl ErrorCode for TestError {
        fn code(&self) -> &'static str {
            match self {
                Self::Transient => "TEST_TRANSIENT",
                Self::Fatal => "TEST_FATAL",
            }
        }

        fn is_recoverable(&self) -> bool {
            matches!(self, Self::Transient)
        }
    }

    #[test]
    fn codes_and_recoverability() {
        assert_eq!(TestError::Transient.code(), "TEST_TRANSIENT");
        assert!(TestError::Transient.is_recoverable());
        assert!(!TestError::Fatal.is_recoverable());
    }

    #[test]
    fn assert_helpers_accept_valid_codes() {
        assert_error_codes(&[TestError::Transient, TestError::Fatal], "TEST_");
    }

    #[test]
    #[should_panic(expected = "must start with prefix")]
    fn assert_rejects_wrong_prefix() {
        assert_error_code(&TestError::Transient, "OTHER_");
    }

    #[test]
    fn upper_snake_case_rules() {
        assert!(is_upper_snake_case("ROUTER_CANVAS_MISMATCH"));
        assert!(!is_upper_snake_case("router_canvas"));
        assert!(!is_upper_snake_case("_ROUTER"));
        assert!(!is_upper_snake_case("ROUTER__X"));
    }
}
