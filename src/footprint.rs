//! Footprint Calculator
//!
//! Computes where each subresource of a resource lands when copied into a
//! linear buffer: byte offset, padded extents, row pitch, row count and
//! unpadded row size.
//!
//! Layout rules:
//! - mip extents are `max(1, base >> mip)`, rounded up to the format's block size
//! - row pitch is the row size rounded up to [`TEXTURE_DATA_PITCH_ALIGNMENT`]
//!   ([`TEXTURE_DATA_PLACEMENT_ALIGNMENT`] for planar video formats)
//! - each subresource starts on a [`TEXTURE_DATA_PLACEMENT_ALIGNMENT`] boundary
//!   relative to the base offset
//! - depth slices of a 3D subresource are extra rows sharing the row pitch

use tracing::{debug, trace};

use crate::error::{FootprintError, Result};
use crate::format::{Format, FormatInfo};
use crate::protocol::{
    PlacedSubresourceFootprint, ResourceDesc, ResourceDimension, SubresourceFootprint,
    TEXTURE_DATA_PITCH_ALIGNMENT, TEXTURE_DATA_PLACEMENT_ALIGNMENT,
};
use crate::subresource::{max_mip_levels, mip_extent, SubresourceIndex, SubresourceShape};

/// Footprints for a contiguous range of subresources.
///
/// The three vectors are parallel and ordered by subresource index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FootprintBatch {
    pub layouts: Vec<PlacedSubresourceFootprint>,
    pub num_rows: Vec<u32>,
    pub row_sizes_in_bytes: Vec<u64>,
    /// Bytes from the base offset to the end of the last subresource.
    pub total_bytes: u64,
}

/// One entry of a [`FootprintBatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubresourceLayout {
    pub placed: PlacedSubresourceFootprint,
    pub num_rows: u32,
    pub row_size_in_bytes: u64,
}

impl SubresourceLayout {
    /// Bytes this subresource occupies in the buffer, padding included.
    pub fn size_in_bytes(&self) -> u64 {
        self.placed.footprint.row_pitch as u64 * self.num_rows as u64
    }
}

impl FootprintBatch {
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// The `i`th entry of the batch (relative to the first requested subresource).
    pub fn subresource(&self, i: usize) -> Option<SubresourceLayout> {
        Some(SubresourceLayout {
            placed: *self.layouts.get(i)?,
            num_rows: *self.num_rows.get(i)?,
            row_size_in_bytes: *self.row_sizes_in_bytes.get(i)?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = SubresourceLayout> + '_ {
        (0..self.len()).filter_map(move |i| self.subresource(i))
    }
}

impl ResourceDesc {
    /// Mip level count with 0 expanded to the full chain.
    pub fn resolved_mip_levels(&self) -> u32 {
        match (self.mip_levels, self.dimension) {
            (0, ResourceDimension::Texture3D) => {
                max_mip_levels(self.width, self.height, self.depth())
            }
            (0, _) => max_mip_levels(self.width, self.height, 1),
            (mips, _) => mips as u32,
        }
    }

    /// Validate the description and return its subresource shape.
    pub fn subresource_shape(&self) -> Result<SubresourceShape> {
        let plane_count = match self.dimension {
            ResourceDimension::Buffer => {
                validate_buffer(self)?;
                1
            }
            _ => validate_texture(self)?.plane_count(),
        };
        Ok(SubresourceShape {
            mip_levels: self.resolved_mip_levels(),
            array_size: self.array_size(),
            plane_count,
        })
    }

    /// Total subresources across all mips, array slices and planes.
    pub fn subresource_count(&self) -> Result<u32> {
        self.subresource_shape()?
            .count()
            .ok_or(FootprintError::ArithmeticOverflow)
    }
}

fn validate_buffer(desc: &ResourceDesc) -> Result<()> {
    if desc.format != Format::UNKNOWN {
        return Err(FootprintError::InvalidFormat(desc.format));
    }
    if desc.width == 0 {
        return Err(FootprintError::UnsupportedDimension("buffer width is zero"));
    }
    if desc.height != 1 || desc.depth_or_array_size != 1 {
        return Err(FootprintError::UnsupportedDimension(
            "buffer height and depth must be 1",
        ));
    }
    if desc.mip_levels != 1 {
        return Err(FootprintError::UnsupportedDimension(
            "buffer must have exactly one mip level",
        ));
    }
    if desc.sample_desc.count != 1 {
        return Err(FootprintError::UnsupportedDimension(
            "buffer cannot be multisampled",
        ));
    }
    Ok(())
}

fn validate_texture(desc: &ResourceDesc) -> Result<&'static FormatInfo> {
    if desc.dimension == ResourceDimension::Unknown {
        return Err(FootprintError::UnsupportedDimension(
            "resource dimension is unknown",
        ));
    }

    let info = desc
        .format
        .info()
        .ok_or(FootprintError::InvalidFormat(desc.format))?;

    if desc.width == 0 || desc.height == 0 || desc.depth_or_array_size == 0 {
        return Err(FootprintError::UnsupportedDimension(
            "texture extents must be non-zero",
        ));
    }
    if desc.width > u32::MAX as u64 {
        return Err(FootprintError::UnsupportedDimension(
            "texture width exceeds 32 bits",
        ));
    }
    if desc.dimension == ResourceDimension::Texture1D && desc.height != 1 {
        return Err(FootprintError::UnsupportedDimension(
            "1D texture height must be 1",
        ));
    }
    if desc.dimension == ResourceDimension::Texture1D && info.is_block_compressed() {
        return Err(FootprintError::UnsupportedDimension(
            "block-compressed formats need a 2D or 3D texture",
        ));
    }
    if desc.dimension != ResourceDimension::Texture2D && info.plane_count() > 1 {
        return Err(FootprintError::UnsupportedDimension(
            "multi-plane formats need a 2D texture",
        ));
    }

    match desc.sample_desc.count {
        0 => {
            return Err(FootprintError::UnsupportedDimension(
                "sample count must be at least 1",
            ))
        }
        1 => {}
        _ if desc.dimension != ResourceDimension::Texture2D => {
            return Err(FootprintError::UnsupportedDimension(
                "only 2D textures can be multisampled",
            ))
        }
        _ if desc.mip_levels != 1 => {
            return Err(FootprintError::UnsupportedDimension(
                "multisampled textures have exactly one mip level",
            ))
        }
        _ => {}
    }

    let max_mips = match desc.dimension {
        ResourceDimension::Texture3D => max_mip_levels(desc.width, desc.height, desc.depth()),
        _ => max_mip_levels(desc.width, desc.height, 1),
    };
    if desc.mip_levels as u32 > max_mips {
        return Err(FootprintError::UnsupportedDimension(
            "mip level count exceeds the full chain for these extents",
        ));
    }

    Ok(info)
}

/// Compute copyable footprints for `num_subresources` subresources starting
/// at `first_subresource`, placed from `base_offset` onwards.
///
/// Fails without producing any footprint if the description is invalid, the
/// range does not fit, or a value overflows its output type.
pub fn get_copyable_footprints(
    desc: &ResourceDesc,
    first_subresource: u32,
    num_subresources: u32,
    base_offset: u64,
) -> Result<FootprintBatch> {
    let shape = desc.subresource_shape()?;
    let total = shape.count().ok_or(FootprintError::ArithmeticOverflow)?;

    let in_range = first_subresource
        .checked_add(num_subresources)
        .map_or(false, |end| end <= total);
    if !in_range {
        return Err(FootprintError::InvalidRange {
            first: first_subresource,
            count: num_subresources,
            total,
        });
    }

    debug!(
        "Footprints: {:?} {} {}x{}x{} mips={} subresources {}..{} of {}, base={}",
        desc.dimension,
        desc.format,
        desc.width,
        desc.height,
        desc.depth_or_array_size,
        shape.mip_levels,
        first_subresource,
        first_subresource + num_subresources,
        total,
        base_offset
    );

    let capacity = num_subresources as usize;
    let mut batch = FootprintBatch {
        layouts: Vec::with_capacity(capacity),
        num_rows: Vec::with_capacity(capacity),
        row_sizes_in_bytes: Vec::with_capacity(capacity),
        total_bytes: 0,
    };

    let mut running: u64 = 0;
    for subresource in first_subresource..first_subresource + num_subresources {
        let index = shape.decompose(subresource)?;
        let layout = match desc.dimension {
            ResourceDimension::Buffer => buffer_layout(desc)?,
            _ => texture_layout(desc, index)?,
        };

        running = align_up(running, TEXTURE_DATA_PLACEMENT_ALIGNMENT as u64)?;
        let offset = base_offset
            .checked_add(running)
            .ok_or(FootprintError::ArithmeticOverflow)?;
        let size = layout.size_in_bytes();
        running = running
            .checked_add(size)
            .ok_or(FootprintError::ArithmeticOverflow)?;

        let placed = PlacedSubresourceFootprint {
            offset,
            footprint: layout.footprint,
        };
        trace!(
            "Subresource {} (mip {}, array {}, plane {}): {} rows={} row_size={}",
            subresource,
            index.mip_slice,
            index.array_slice,
            index.plane_slice,
            placed,
            layout.num_rows,
            layout.row_size_in_bytes
        );

        batch.layouts.push(placed);
        batch.num_rows.push(layout.num_rows);
        batch.row_sizes_in_bytes.push(layout.row_size_in_bytes);
    }

    batch.total_bytes = running;
    Ok(batch)
}

/// Size of an intermediate upload buffer able to hold the given subresources.
pub fn get_required_intermediate_size(
    desc: &ResourceDesc,
    first_subresource: u32,
    num_subresources: u32,
) -> Result<u64> {
    Ok(get_copyable_footprints(desc, first_subresource, num_subresources, 0)?.total_bytes)
}

/// Footprint of one subresource before it is placed.
struct UnplacedLayout {
    footprint: SubresourceFootprint,
    num_rows: u32,
    row_size_in_bytes: u64,
}

impl UnplacedLayout {
    fn size_in_bytes(&self) -> u64 {
        self.footprint.row_pitch as u64 * self.num_rows as u64
    }
}

fn buffer_layout(desc: &ResourceDesc) -> Result<UnplacedLayout> {
    let width = u32::try_from(desc.width).map_err(|_| FootprintError::ArithmeticOverflow)?;
    let row_pitch = align_up(desc.width, TEXTURE_DATA_PITCH_ALIGNMENT as u64)?;
    Ok(UnplacedLayout {
        footprint: SubresourceFootprint {
            format: Format::UNKNOWN,
            width,
            height: 1,
            depth: 1,
            row_pitch: u32::try_from(row_pitch).map_err(|_| FootprintError::ArithmeticOverflow)?,
        },
        num_rows: 1,
        row_size_in_bytes: desc.width,
    })
}

fn texture_layout(desc: &ResourceDesc, index: SubresourceIndex) -> Result<UnplacedLayout> {
    let info = desc
        .format
        .info()
        .ok_or(FootprintError::InvalidFormat(desc.format))?;

    let width = align_up(
        mip_extent(desc.width, index.mip_slice),
        info.block_width as u64,
    )?;
    let height = align_up(
        mip_extent(desc.height as u64, index.mip_slice),
        info.block_height as u64,
    )?;
    let depth = match desc.dimension {
        ResourceDimension::Texture3D => mip_extent(desc.depth() as u64, index.mip_slice),
        _ => 1,
    };

    let width = u32::try_from(width).map_err(|_| FootprintError::ArithmeticOverflow)?;
    let height = u32::try_from(height).map_err(|_| FootprintError::ArithmeticOverflow)?;
    // Bounded by depth_or_array_size, which is a u16.
    let depth = depth as u32;

    let plane = info
        .plane(index.plane_slice, width, height)
        .ok_or(FootprintError::InvalidRange {
            first: index.plane_slice,
            count: 1,
            total: info.plane_count(),
        })?;

    let row_size_in_bytes = plane.row_size_in_bytes();
    let pitch_alignment = if info.is_planar() {
        TEXTURE_DATA_PLACEMENT_ALIGNMENT
    } else {
        TEXTURE_DATA_PITCH_ALIGNMENT
    };
    let row_pitch = align_up(row_size_in_bytes, pitch_alignment as u64)?;
    let num_rows = plane
        .height_in_blocks
        .checked_mul(depth)
        .ok_or(FootprintError::ArithmeticOverflow)?;

    Ok(UnplacedLayout {
        footprint: SubresourceFootprint {
            format: plane.format,
            width: plane.width,
            height: plane.height,
            depth,
            row_pitch: u32::try_from(row_pitch).map_err(|_| FootprintError::ArithmeticOverflow)?,
        },
        num_rows,
        row_size_in_bytes,
    })
}

/// Round `value` up to a multiple of `alignment` (a power of two).
fn align_up(value: u64, alignment: u64) -> Result<u64> {
    debug_assert!(alignment.is_power_of_two());
    value
        .checked_add(alignment - 1)
        .map(|v| v & !(alignment - 1))
        .ok_or(FootprintError::ArithmeticOverflow)
}
