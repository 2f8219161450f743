//! Format Module
//!
//! DXGI format values and the block/plane footprint table used to lay out
//! copyable subresources. The table is an immutable process-wide constant.

use std::fmt;

/// DXGI format value.
///
/// Kept as a transparent `u32` newtype (same representation as `DXGI_FORMAT`)
/// so values without a table entry can still be carried and rejected.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Format(pub u32);

/// One plane of a multi-plane format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneFormat {
    pub format: Format,
    pub bytes_per_texel: u32,
}

/// How a format splits into copyable planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatLayout {
    /// Single plane addressed in blocks of `block_width` x `block_height` texels.
    Blocked,
    /// Depth and stencil copied as two planes with identical extents.
    DepthStencil {
        depth: PlaneFormat,
        stencil: PlaneFormat,
    },
    /// Video format: full resolution luma plane followed by an interleaved
    /// chroma plane subsampled by the given shifts.
    Planar {
        luma: PlaneFormat,
        chroma: PlaneFormat,
        chroma_shift_x: u32,
        chroma_shift_y: u32,
    },
}

/// Block footprint of a format.
///
/// For multi-plane formats `block_width`/`block_height` are the alignment the
/// parent extents are rounded to, and each plane is sized by its own
/// [`PlaneFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    pub format: Format,
    pub name: &'static str,
    pub block_width: u32,
    pub block_height: u32,
    pub bytes_per_block: u32,
    pub layout: FormatLayout,
}

/// Extents of a single plane of one subresource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneExtent {
    pub format: Format,
    /// Width in texels, rounded to the block width.
    pub width: u32,
    /// Height in texels, rounded to the block height.
    pub height: u32,
    pub width_in_blocks: u32,
    pub height_in_blocks: u32,
    pub bytes_per_block: u32,
}

impl PlaneExtent {
    /// Unpadded size of one row of blocks.
    pub fn row_size_in_bytes(&self) -> u64 {
        self.width_in_blocks as u64 * self.bytes_per_block as u64
    }
}

const fn info(block_width: u32, block_height: u32, bytes_per_block: u32) -> FormatInfo {
    FormatInfo {
        format: Format::UNKNOWN,
        name: "",
        block_width,
        block_height,
        bytes_per_block,
        layout: FormatLayout::Blocked,
    }
}

const fn texel(bytes: u32) -> FormatInfo {
    info(1, 1, bytes)
}

const fn plane(format: Format, bytes_per_texel: u32) -> PlaneFormat {
    PlaneFormat {
        format,
        bytes_per_texel,
    }
}

const fn depth_stencil(depth: PlaneFormat, stencil: PlaneFormat) -> FormatInfo {
    FormatInfo {
        bytes_per_block: depth.bytes_per_texel + stencil.bytes_per_texel,
        layout: FormatLayout::DepthStencil { depth, stencil },
        ..texel(0)
    }
}

const fn planar(
    luma: PlaneFormat,
    chroma: PlaneFormat,
    chroma_shift_x: u32,
    chroma_shift_y: u32,
) -> FormatInfo {
    FormatInfo {
        layout: FormatLayout::Planar {
            luma,
            chroma,
            chroma_shift_x,
            chroma_shift_y,
        },
        ..info(1 << chroma_shift_x, 1 << chroma_shift_y, 0)
    }
}

macro_rules! dxgi_formats {
    ($($name:ident = $value:literal => $info:expr,)+) => {
        impl Format {
            $(pub const $name: Format = Format($value);)+
        }

        /// Sorted by format value.
        static FORMAT_TABLE: &[FormatInfo] = &[
            $(FormatInfo {
                format: Format($value),
                name: stringify!($name),
                ..$info
            },)+
        ];
    };
}

impl Format {
    pub const UNKNOWN: Format = Format(0);
}

dxgi_formats! {
    R32G32B32A32_TYPELESS = 1 => texel(16),
    R32G32B32A32_FLOAT = 2 => texel(16),
    R32G32B32A32_UINT = 3 => texel(16),
    R32G32B32A32_SINT = 4 => texel(16),
    R32G32B32_TYPELESS = 5 => texel(12),
    R32G32B32_FLOAT = 6 => texel(12),
    R32G32B32_UINT = 7 => texel(12),
    R32G32B32_SINT = 8 => texel(12),
    R16G16B16A16_TYPELESS = 9 => texel(8),
    R16G16B16A16_FLOAT = 10 => texel(8),
    R16G16B16A16_UNORM = 11 => texel(8),
    R16G16B16A16_UINT = 12 => texel(8),
    R16G16B16A16_SNORM = 13 => texel(8),
    R16G16B16A16_SINT = 14 => texel(8),
    R32G32_TYPELESS = 15 => texel(8),
    R32G32_FLOAT = 16 => texel(8),
    R32G32_UINT = 17 => texel(8),
    R32G32_SINT = 18 => texel(8),
    R32G8X24_TYPELESS = 19 => depth_stencil(plane(Format::R32_TYPELESS, 4), plane(Format::R8_TYPELESS, 1)),
    D32_FLOAT_S8X24_UINT = 20 => depth_stencil(plane(Format::R32_TYPELESS, 4), plane(Format::R8_TYPELESS, 1)),
    R32_FLOAT_X8X24_TYPELESS = 21 => texel(8),
    X32_TYPELESS_G8X24_UINT = 22 => texel(8),
    R10G10B10A2_TYPELESS = 23 => texel(4),
    R10G10B10A2_UNORM = 24 => texel(4),
    R10G10B10A2_UINT = 25 => texel(4),
    R11G11B10_FLOAT = 26 => texel(4),
    R8G8B8A8_TYPELESS = 27 => texel(4),
    R8G8B8A8_UNORM = 28 => texel(4),
    R8G8B8A8_UNORM_SRGB = 29 => texel(4),
    R8G8B8A8_UINT = 30 => texel(4),
    R8G8B8A8_SNORM = 31 => texel(4),
    R8G8B8A8_SINT = 32 => texel(4),
    R16G16_TYPELESS = 33 => texel(4),
    R16G16_FLOAT = 34 => texel(4),
    R16G16_UNORM = 35 => texel(4),
    R16G16_UINT = 36 => texel(4),
    R16G16_SNORM = 37 => texel(4),
    R16G16_SINT = 38 => texel(4),
    R32_TYPELESS = 39 => texel(4),
    D32_FLOAT = 40 => texel(4),
    R32_FLOAT = 41 => texel(4),
    R32_UINT = 42 => texel(4),
    R32_SINT = 43 => texel(4),
    R24G8_TYPELESS = 44 => depth_stencil(plane(Format::R24G8_TYPELESS, 4), plane(Format::R8_TYPELESS, 1)),
    D24_UNORM_S8_UINT = 45 => depth_stencil(plane(Format::R24G8_TYPELESS, 4), plane(Format::R8_TYPELESS, 1)),
    R24_UNORM_X8_TYPELESS = 46 => texel(4),
    X24_TYPELESS_G8_UINT = 47 => texel(4),
    R8G8_TYPELESS = 48 => texel(2),
    R8G8_UNORM = 49 => texel(2),
    R8G8_UINT = 50 => texel(2),
    R8G8_SNORM = 51 => texel(2),
    R8G8_SINT = 52 => texel(2),
    R16_TYPELESS = 53 => texel(2),
    R16_FLOAT = 54 => texel(2),
    D16_UNORM = 55 => texel(2),
    R16_UNORM = 56 => texel(2),
    R16_UINT = 57 => texel(2),
    R16_SNORM = 58 => texel(2),
    R16_SINT = 59 => texel(2),
    R8_TYPELESS = 60 => texel(1),
    R8_UNORM = 61 => texel(1),
    R8_UINT = 62 => texel(1),
    R8_SNORM = 63 => texel(1),
    R8_SINT = 64 => texel(1),
    A8_UNORM = 65 => texel(1),
    R9G9B9E5_SHAREDEXP = 67 => texel(4),
    R8G8_B8G8_UNORM = 68 => info(2, 1, 4),
    G8R8_G8B8_UNORM = 69 => info(2, 1, 4),
    BC1_TYPELESS = 70 => info(4, 4, 8),
    BC1_UNORM = 71 => info(4, 4, 8),
    BC1_UNORM_SRGB = 72 => info(4, 4, 8),
    BC2_TYPELESS = 73 => info(4, 4, 16),
    BC2_UNORM = 74 => info(4, 4, 16),
    BC2_UNORM_SRGB = 75 => info(4, 4, 16),
    BC3_TYPELESS = 76 => info(4, 4, 16),
    BC3_UNORM = 77 => info(4, 4, 16),
    BC3_UNORM_SRGB = 78 => info(4, 4, 16),
    BC4_TYPELESS = 79 => info(4, 4, 8),
    BC4_UNORM = 80 => info(4, 4, 8),
    BC4_SNORM = 81 => info(4, 4, 8),
    BC5_TYPELESS = 82 => info(4, 4, 16),
    BC5_UNORM = 83 => info(4, 4, 16),
    BC5_SNORM = 84 => info(4, 4, 16),
    B5G6R5_UNORM = 85 => texel(2),
    B5G5R5A1_UNORM = 86 => texel(2),
    B8G8R8A8_UNORM = 87 => texel(4),
    B8G8R8X8_UNORM = 88 => texel(4),
    R10G10B10_XR_BIAS_A2_UNORM = 89 => texel(4),
    B8G8R8A8_TYPELESS = 90 => texel(4),
    B8G8R8A8_UNORM_SRGB = 91 => texel(4),
    B8G8R8X8_TYPELESS = 92 => texel(4),
    B8G8R8X8_UNORM_SRGB = 93 => texel(4),
    BC6H_TYPELESS = 94 => info(4, 4, 16),
    BC6H_UF16 = 95 => info(4, 4, 16),
    BC6H_SF16 = 96 => info(4, 4, 16),
    BC7_TYPELESS = 97 => info(4, 4, 16),
    BC7_UNORM = 98 => info(4, 4, 16),
    BC7_UNORM_SRGB = 99 => info(4, 4, 16),
    AYUV = 100 => texel(4),
    Y410 = 101 => texel(4),
    Y416 = 102 => texel(8),
    NV12 = 103 => planar(plane(Format::R8_TYPELESS, 1), plane(Format::R8G8_TYPELESS, 2), 1, 1),
    P010 = 104 => planar(plane(Format::R16_TYPELESS, 2), plane(Format::R16G16_TYPELESS, 4), 1, 1),
    P016 = 105 => planar(plane(Format::R16_TYPELESS, 2), plane(Format::R16G16_TYPELESS, 4), 1, 1),
    OPAQUE_420 = 106 => planar(plane(Format::R8_TYPELESS, 1), plane(Format::R8G8_TYPELESS, 2), 1, 1),
    YUY2 = 107 => info(2, 1, 4),
    Y210 = 108 => info(2, 1, 8),
    Y216 = 109 => info(2, 1, 8),
    NV11 = 110 => planar(plane(Format::R8_TYPELESS, 1), plane(Format::R8G8_TYPELESS, 2), 2, 0),
    AI44 = 111 => texel(1),
    IA44 = 112 => texel(1),
    P8 = 113 => texel(1),
    A8P8 = 114 => texel(2),
    B4G4R4A4_UNORM = 115 => texel(2),
    P208 = 130 => planar(plane(Format::R8_TYPELESS, 1), plane(Format::R8G8_TYPELESS, 2), 1, 0),
}

impl Format {
    /// Look up the block footprint for this format.
    pub fn info(self) -> Option<&'static FormatInfo> {
        FORMAT_TABLE
            .binary_search_by_key(&self, |info| info.format)
            .ok()
            .map(|index| &FORMAT_TABLE[index])
    }

    /// Table name of the format, e.g. `R8G8B8A8_UNORM`.
    pub fn name(self) -> Option<&'static str> {
        if self == Format::UNKNOWN {
            return Some("UNKNOWN");
        }
        self.info().map(|info| info.name)
    }

    /// Parse a format name, with or without the `DXGI_FORMAT_` prefix.
    pub fn from_name(name: &str) -> Option<Format> {
        let name = name.trim();
        let name = name.strip_prefix("DXGI_FORMAT_").unwrap_or(name);
        if name.eq_ignore_ascii_case("UNKNOWN") {
            return Some(Format::UNKNOWN);
        }
        // DXGI spells this one with a leading digit.
        if name.eq_ignore_ascii_case("420_OPAQUE") {
            return Some(Format::OPAQUE_420);
        }
        FORMAT_TABLE
            .iter()
            .find(|info| info.name.eq_ignore_ascii_case(name))
            .map(|info| info.format)
    }

    /// Number of copyable planes, or `None` for formats without a footprint.
    pub fn plane_count(self) -> Option<u32> {
        self.info().map(FormatInfo::plane_count)
    }

    /// Every format with a table entry, in ascending value order.
    pub fn all() -> impl Iterator<Item = Format> {
        FORMAT_TABLE.iter().map(|info| info.format)
    }
}

impl fmt::Debug for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "Format({})", self.0),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FormatInfo {
    pub fn plane_count(&self) -> u32 {
        match self.layout {
            FormatLayout::Blocked => 1,
            FormatLayout::DepthStencil { .. } | FormatLayout::Planar { .. } => 2,
        }
    }

    pub fn is_planar(&self) -> bool {
        matches!(self.layout, FormatLayout::Planar { .. })
    }

    pub fn is_block_compressed(&self) -> bool {
        matches!(self.layout, FormatLayout::Blocked) && self.block_height > 1
    }

    /// Extents of `plane_slice` for a subresource whose mip extents have
    /// already been rounded to this format's block size.
    ///
    /// Returns `None` if the plane does not exist.
    pub fn plane(&self, plane_slice: u32, width: u32, height: u32) -> Option<PlaneExtent> {
        match (self.layout, plane_slice) {
            (FormatLayout::Blocked, 0) => Some(PlaneExtent {
                format: self.format,
                width,
                height,
                width_in_blocks: width / self.block_width,
                height_in_blocks: height / self.block_height,
                bytes_per_block: self.bytes_per_block,
            }),
            (FormatLayout::DepthStencil { depth, .. }, 0) => Some(texel_plane(depth, width, height)),
            (FormatLayout::DepthStencil { stencil, .. }, 1) => {
                Some(texel_plane(stencil, width, height))
            }
            (FormatLayout::Planar { luma, .. }, 0) => Some(texel_plane(luma, width, height)),
            (
                FormatLayout::Planar {
                    chroma,
                    chroma_shift_x,
                    chroma_shift_y,
                    ..
                },
                1,
            ) => Some(texel_plane(
                chroma,
                width >> chroma_shift_x,
                height >> chroma_shift_y,
            )),
            _ => None,
        }
    }
}

fn texel_plane(plane: PlaneFormat, width: u32, height: u32) -> PlaneExtent {
    PlaneExtent {
        format: plane.format,
        width,
        height,
        width_in_blocks: width,
        height_in_blocks: height,
        bytes_per_block: plane.bytes_per_texel,
    }
}
