//! Harness error types and result definitions

use core::fmt;

/// Harness operation result type
pub type Result<T> = core::result::Result<T, HarnessError>;

/// Registration and lookup errors
///
/// Assertion failures are not represented here: they accumulate in the
/// invocation channel and travel to the external reporter through the
/// result transport, never up the call stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessError {
    /// A registry with this name already exists process-wide
    DuplicateRegistry,
    /// A test with this name already exists in the target registry
    DuplicateTest,
    /// No registry with this name
    RegistryNotFound,
    /// No test with this name in the named registry
    TestNotFound,
}

impl HarnessError {
    /// Get a static string description of the error
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuplicateRegistry => "Registry name already in use",
            Self::DuplicateTest => "Test name already registered",
            Self::RegistryNotFound => "Registry not found",
            Self::TestNotFound => "Test not found",
        }
    }

    /// Convert error to a numeric code for the driver boundary
    pub fn to_errno(self) -> i32 {
        match self {
            Self::DuplicateRegistry => -17,
            Self::DuplicateTest => -17,
            Self::RegistryNotFound => -2,
            Self::TestNotFound => -2,
        }
    }
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
