//! Error Module
//!
//! Failures reported by the footprint calculator. Every error is detected
//! before any footprint is produced, so a failed call never yields a partial
//! batch.

use thiserror::Error;

use crate::format::Format;

/// Errors returned by footprint and subresource computations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FootprintError {
    /// The requested subresource range does not fit in the resource.
    #[error("subresources {first}..{first}+{count} out of range for resource with {total} subresources")]
    InvalidRange { first: u32, count: u32, total: u32 },

    /// The format is unknown or has no copyable block footprint.
    #[error("format {0} has no copyable layout")]
    InvalidFormat(Format),

    /// The resource shape is geometrically inconsistent.
    #[error("unsupported resource shape: {0}")]
    UnsupportedDimension(&'static str),

    /// An offset, pitch or size does not fit in its output type.
    #[error("footprint arithmetic overflowed")]
    ArithmeticOverflow,
}

pub type Result<T> = std::result::Result<T, FootprintError>;
