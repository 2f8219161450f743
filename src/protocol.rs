//! Resource and Footprint Structures
//!
//! Manual Rust bindings for the D3D12 resource description and placed
//! footprint structures. These match the C layouts field for field so results
//! can be handed to code expecting `D3D12_PLACED_SUBRESOURCE_FOOTPRINT`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::format::Format;

// =============================================================================
// Alignment Constants
// =============================================================================

/// Row pitch alignment for linear texture data (`D3D12_TEXTURE_DATA_PITCH_ALIGNMENT`).
pub const TEXTURE_DATA_PITCH_ALIGNMENT: u32 = 256;

/// Offset alignment for each subresource in a linear buffer
/// (`D3D12_TEXTURE_DATA_PLACEMENT_ALIGNMENT`). Also the row pitch alignment
/// for planar video formats.
pub const TEXTURE_DATA_PLACEMENT_ALIGNMENT: u32 = 512;

// =============================================================================
// Texture Layouts
// =============================================================================

/// Driver-chosen texture layout (`D3D12_TEXTURE_LAYOUT_UNKNOWN`).
pub const TEXTURE_LAYOUT_UNKNOWN: u32 = 0;
/// Linear row-major layout, required for buffers (`D3D12_TEXTURE_LAYOUT_ROW_MAJOR`).
pub const TEXTURE_LAYOUT_ROW_MAJOR: u32 = 1;

// =============================================================================
// Resource Flags
// =============================================================================

/// No usage flags (`D3D12_RESOURCE_FLAG_NONE`). Flags do not affect copyable layouts.
pub const RESOURCE_FLAG_NONE: u32 = 0;

// =============================================================================
// Resource Description
// =============================================================================

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceDimension {
    Unknown = 0,
    Buffer = 1,
    Texture1D = 2,
    Texture2D = 3,
    Texture3D = 4,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleDesc {
    pub count: u32,
    pub quality: u32,
}

impl Default for SampleDesc {
    fn default() -> Self {
        Self {
            count: 1,
            quality: 0,
        }
    }
}

/// Shape of a buffer or texture resource (`D3D12_RESOURCE_DESC`).
///
/// `depth_or_array_size` is the depth of a 3D texture and the array size of
/// every other dimension. A `mip_levels` of 0 requests the full chain.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceDesc {
    pub dimension: ResourceDimension,
    pub alignment: u64,
    pub width: u64,
    pub height: u32,
    pub depth_or_array_size: u16,
    pub mip_levels: u16,
    pub format: Format,
    pub sample_desc: SampleDesc,
    pub layout: u32,
    pub flags: u32,
}

impl ResourceDesc {
    /// Linear buffer of `width` bytes.
    pub fn buffer(width: u64) -> Self {
        Self {
            dimension: ResourceDimension::Buffer,
            alignment: 0,
            width,
            height: 1,
            depth_or_array_size: 1,
            mip_levels: 1,
            format: Format::UNKNOWN,
            sample_desc: SampleDesc::default(),
            layout: TEXTURE_LAYOUT_ROW_MAJOR,
            flags: RESOURCE_FLAG_NONE,
        }
    }

    pub fn tex1d(format: Format, width: u64, array_size: u16, mip_levels: u16) -> Self {
        Self::texture(ResourceDimension::Texture1D, format, width, 1, array_size, mip_levels)
    }

    pub fn tex2d(
        format: Format,
        width: u64,
        height: u32,
        array_size: u16,
        mip_levels: u16,
    ) -> Self {
        Self::texture(
            ResourceDimension::Texture2D,
            format,
            width,
            height,
            array_size,
            mip_levels,
        )
    }

    pub fn tex3d(format: Format, width: u64, height: u32, depth: u16, mip_levels: u16) -> Self {
        Self::texture(ResourceDimension::Texture3D, format, width, height, depth, mip_levels)
    }

    fn texture(
        dimension: ResourceDimension,
        format: Format,
        width: u64,
        height: u32,
        depth_or_array_size: u16,
        mip_levels: u16,
    ) -> Self {
        Self {
            dimension,
            alignment: 0,
            width,
            height,
            depth_or_array_size,
            mip_levels,
            format,
            sample_desc: SampleDesc::default(),
            layout: TEXTURE_LAYOUT_UNKNOWN,
            flags: RESOURCE_FLAG_NONE,
        }
    }

    /// Set the multisample count and quality.
    pub fn with_samples(mut self, count: u32, quality: u32) -> Self {
        self.sample_desc = SampleDesc { count, quality };
        self
    }

    /// Number of array slices (always 1 for 3D textures).
    pub fn array_size(&self) -> u32 {
        match self.dimension {
            ResourceDimension::Texture3D => 1,
            _ => self.depth_or_array_size as u32,
        }
    }

    /// Depth in texels (always 1 for anything but 3D textures).
    pub fn depth(&self) -> u32 {
        match self.dimension {
            ResourceDimension::Texture3D => self.depth_or_array_size as u32,
            _ => 1,
        }
    }
}

// =============================================================================
// Footprints
// =============================================================================

/// Format, padded extents and row pitch of one subresource in a linear
/// buffer (`D3D12_SUBRESOURCE_FOOTPRINT`).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SubresourceFootprint {
    pub format: Format,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub row_pitch: u32,
}

/// A footprint placed at a byte offset (`D3D12_PLACED_SUBRESOURCE_FOOTPRINT`).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PlacedSubresourceFootprint {
    pub offset: u64,
    pub footprint: SubresourceFootprint,
}

impl fmt::Display for PlacedSubresourceFootprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "offset={} format={} {}x{}x{} row_pitch={}",
            self.offset,
            self.footprint.format,
            self.footprint.width,
            self.footprint.height,
            self.footprint.depth,
            self.footprint.row_pitch
        )
    }
}

// Verify layouts at compile time
const _: () = assert!(std::mem::size_of::<ResourceDesc>() == 56);
const _: () = assert!(std::mem::size_of::<SubresourceFootprint>() == 20);
const _: () = assert!(std::mem::size_of::<PlacedSubresourceFootprint>() == 32);
const _: () = assert!(std::mem::align_of::<PlacedSubresourceFootprint>() == 8);
const _: () = assert!(core::mem::offset_of!(PlacedSubresourceFootprint, footprint) == 8);
const _: () = assert!(core::mem::offset_of!(SubresourceFootprint, row_pitch) == 16);
const _: () = assert!(core::mem::offset_of!(ResourceDesc, format) == 32);
const _: () = assert!(core::mem::offset_of!(ResourceDesc, flags) == 48);

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::offset_of;

    #[test]
    fn test_footprint_field_offsets() {
        assert_eq!(offset_of!(PlacedSubresourceFootprint, offset), 0);
        assert_eq!(offset_of!(PlacedSubresourceFootprint, footprint), 8);
        assert_eq!(offset_of!(SubresourceFootprint, format), 0);
        assert_eq!(offset_of!(SubresourceFootprint, width), 4);
        assert_eq!(offset_of!(SubresourceFootprint, height), 8);
        assert_eq!(offset_of!(SubresourceFootprint, depth), 12);
        assert_eq!(offset_of!(SubresourceFootprint, row_pitch), 16);
    }

    #[test]
    fn test_resource_desc_field_offsets() {
        assert_eq!(offset_of!(ResourceDesc, dimension), 0);
        assert_eq!(offset_of!(ResourceDesc, alignment), 8);
        assert_eq!(offset_of!(ResourceDesc, width), 16);
        assert_eq!(offset_of!(ResourceDesc, height), 24);
        assert_eq!(offset_of!(ResourceDesc, depth_or_array_size), 28);
        assert_eq!(offset_of!(ResourceDesc, mip_levels), 30);
        assert_eq!(offset_of!(ResourceDesc, format), 32);
        assert_eq!(offset_of!(ResourceDesc, sample_desc), 36);
        assert_eq!(offset_of!(ResourceDesc, layout), 44);
        assert_eq!(offset_of!(ResourceDesc, flags), 48);
        assert_eq!(offset_of!(SampleDesc, quality), 4);
    }

    #[test]
    fn test_array_size_and_depth() {
        let array = ResourceDesc::tex2d(Format::R8G8B8A8_UNORM, 100, 100, 5, 1);
        assert_eq!((array.array_size(), array.depth()), (5, 1));

        let volume = ResourceDesc::tex3d(Format::R8G8B8A8_UNORM, 64, 32, 8, 1);
        assert_eq!((volume.array_size(), volume.depth()), (1, 8));

        let buffer = ResourceDesc::buffer(1000);
        assert_eq!((buffer.array_size(), buffer.depth()), (1, 1));
        assert_eq!(buffer.format, Format::UNKNOWN);
        assert_eq!(buffer.layout, TEXTURE_LAYOUT_ROW_MAJOR);
        assert_eq!(array.layout, TEXTURE_LAYOUT_UNKNOWN);
        assert_eq!(array.flags, RESOURCE_FLAG_NONE);
    }
}
