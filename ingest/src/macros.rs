//! Macros for ingestion error handling.
//!
//! Provides convenience macros for creating and returning [`crate::error::IngestError`]
//! instances with reduced boilerplate for common error handling patterns.

/// Creates an [`crate::error::IngestError`] from error kind and description.
///
/// This macro provides a concise way to create [`crate::error::IngestError`] instances
/// with a static description and optional dynamic detail.
#[macro_export]
macro_rules! ingest_error {
    ($kind:expr, $desc:expr) => {
        $crate::error::IngestError::from(($kind, $desc))
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        $crate::error::IngestError::from(($kind, $desc, $detail.to_string()))
    };
}

/// Creates and returns an [`crate::error::IngestError`] from the current function.
///
/// This macro combines error creation with early return, reducing boilerplate
/// when handling error conditions that should immediately terminate execution.
/// Supports the same optional detail argument as [`ingest_error!`].
#[macro_export]
macro_rules! bail {
    ($kind:expr, $desc:expr) => {
        return ::core::result::Result::Err($crate::ingest_error!($kind, $desc))
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        return ::core::result::Result::Err($crate::ingest_error!($kind, $desc, $detail))
    };
}
