//! Shared error classification for the single-line diagram services
//!
//! Each crate keeps its own domain-specific error enum and implements
//! [`ServiceErrorTrait`] to gain a common outward-facing interface: stable
//! error codes, a category used for HTTP status mapping and log levels, and
//! retry hints for callers.

// ============================================================================
// Error categories
// ============================================================================

/// Error category enum - used for classification and HTTP status mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    // Infrastructure layer
    Configuration,
    Network,
    Timeout,

    // Business logic layer
    Validation,
    NotFound,

    // Upstream collaborators (network store, diagram library)
    Upstream,
    Rendering,

    // System level
    Internal,
    DataCorruption,

    // Others
    Unknown,
}

impl ErrorCategory {
    /// Short lowercase label used in structured log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Upstream => "upstream",
            Self::Rendering => "rendering",
            Self::Internal => "internal",
            Self::DataCorruption => "data_corruption",
            Self::Unknown => "unknown",
        }
    }
}

// ============================================================================
// Service error trait
// ============================================================================

/// Error capability trait shared by every service error type
///
/// Implementors only provide [`error_code`](Self::error_code) and
/// [`category`](Self::category); everything else has a category-based
/// default that services may override.
pub trait ServiceErrorTrait: std::error::Error + Send + Sync + 'static {
    /// Get error code (for API, logs, monitoring)
    fn error_code(&self) -> &'static str;

    /// Get error category (for classification)
    fn category(&self) -> ErrorCategory;

    /// Whether the error is retryable (default implementation is category-based)
    fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Network | ErrorCategory::Timeout | ErrorCategory::Upstream
        )
    }

    /// Recommended retry delay in milliseconds
    fn retry_delay_ms(&self) -> u64 {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Upstream => 1000,
            ErrorCategory::Timeout => 500,
            _ => 0,
        }
    }

    /// Numeric HTTP status for this error
    fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Validation => 400,
            ErrorCategory::NotFound => 404,
            ErrorCategory::Upstream | ErrorCategory::Network => 502,
            ErrorCategory::Timeout => 504,
            _ => 500,
        }
    }

    /// Get log level
    fn log_level(&self) -> tracing::Level {
        use tracing::Level;
        match self.category() {
            ErrorCategory::Internal
            | ErrorCategory::Rendering
            | ErrorCategory::DataCorruption => Level::ERROR,
            ErrorCategory::Network | ErrorCategory::Timeout | ErrorCategory::Upstream => {
                Level::WARN
            },
            ErrorCategory::Validation | ErrorCategory::NotFound => Level::INFO,
            _ => Level::WARN,
        }
    }
}

// Tests
#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    enum TestError {
        #[error("missing: {0}")]
        Missing(String),
        #[error("upstream down")]
        Upstream,
        #[error("broken")]
        Broken,
    }

    impl ServiceErrorTrait for TestError {
        fn error_code(&self) -> &'static str {
            match self {
                Self::Missing(_) => "TEST_MISSING",
                Self::Upstream => "TEST_UPSTREAM",
                Self::Broken => "TEST_BROKEN",
            }
        }

        fn category(&self) -> ErrorCategory {
            match self {
                Self::Missing(_) => ErrorCategory::NotFound,
                Self::Upstream => ErrorCategory::Upstream,
                Self::Broken => ErrorCategory::Internal,
            }
        }
    }

    #[test]
    fn test_status_codes_follow_category() {
        assert_eq!(TestError::Missing("vl".into()).status_code(), 404);
        assert_eq!(TestError::Upstream.status_code(), 502);
        assert_eq!(TestError::Broken.status_code(), 500);
    }

    #[test]
    fn test_retryable() {
        assert!(TestError::Upstream.is_retryable());
        assert_eq!(TestError::Upstream.retry_delay_ms(), 1000);
        assert!(!TestError::Missing("vl".into()).is_retryable());
        assert_eq!(TestError::Broken.retry_delay_ms(), 0);
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(
            TestError::Missing("vl".into()).log_level(),
            tracing::Level::INFO
        );
        assert_eq!(TestError::Upstream.log_level(), tracing::Level::WARN);
        assert_eq!(TestError::Broken.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(ErrorCategory::NotFound.as_str(), "not_found");
        assert_eq!(ErrorCategory::Upstream.as_str(), "upstream");
    }
}
