//! Copyable Footprints
//!
//! Computes the linear-buffer layout of every subresource of a GPU resource:
//! where each mip level, array slice and plane starts, how its rows are
//! padded, and how many bytes the whole range needs. Results use the D3D12
//! placed footprint layout.
//!
//! ```
//! use copyable_footprint::{get_copyable_footprints, Format, ResourceDesc};
//!
//! let desc = ResourceDesc::tex2d(Format::R8G8B8A8_UNORM, 100, 100, 1, 1);
//! let batch = get_copyable_footprints(&desc, 0, 1, 0).unwrap();
//! assert_eq!(batch.layouts[0].footprint.row_pitch, 512);
//! assert_eq!(batch.total_bytes, 512 * 100);
//! ```

pub mod config;
pub mod error;
pub mod footprint;
pub mod format;
pub mod protocol;
pub mod subresource;

pub use error::FootprintError;
pub use footprint::{
    get_copyable_footprints, get_required_intermediate_size, FootprintBatch, SubresourceLayout,
};
pub use format::{Format, FormatInfo, FormatLayout};
pub use protocol::*;
pub use subresource::{calc_subresource, SubresourceIndex, SubresourceShape};
