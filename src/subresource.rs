//! Subresource Indexing
//!
//! Maps between linear subresource indices and (mip, array, plane) triples.
//! Mip slices vary fastest, then array slices, then planes.

use crate::error::{FootprintError, Result};

/// A subresource addressed by its mip, array and plane slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubresourceIndex {
    pub mip_slice: u32,
    pub array_slice: u32,
    pub plane_slice: u32,
}

/// Subresource dimensions of a resource with resolved mip levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubresourceShape {
    pub mip_levels: u32,
    pub array_size: u32,
    pub plane_count: u32,
}

impl SubresourceShape {
    /// Total number of subresources, or `None` if it does not fit in a `u32`.
    pub fn count(&self) -> Option<u32> {
        self.mip_levels
            .checked_mul(self.array_size)?
            .checked_mul(self.plane_count)
    }

    /// Linear index of `index`.
    pub fn compose(&self, index: SubresourceIndex) -> Result<u32> {
        if index.mip_slice >= self.mip_levels
            || index.array_slice >= self.array_size
            || index.plane_slice >= self.plane_count
        {
            return Err(FootprintError::InvalidRange {
                first: 0,
                count: 0,
                total: self.count().unwrap_or(u32::MAX),
            });
        }
        Ok(calc_subresource(
            index.mip_slice,
            index.array_slice,
            index.plane_slice,
            self.mip_levels,
            self.array_size,
        ))
    }

    /// Split a linear index back into its slices.
    pub fn decompose(&self, subresource: u32) -> Result<SubresourceIndex> {
        let total = self.count().ok_or(FootprintError::ArithmeticOverflow)?;
        if subresource >= total {
            return Err(FootprintError::InvalidRange {
                first: subresource,
                count: 1,
                total,
            });
        }
        Ok(SubresourceIndex {
            mip_slice: subresource % self.mip_levels,
            array_slice: (subresource / self.mip_levels) % self.array_size,
            plane_slice: subresource / (self.mip_levels * self.array_size),
        })
    }
}

/// Linear subresource index, `mip + array * mip_levels + plane * mip_levels * array_size`.
///
/// Wraps on overflow like the C helper it mirrors; use
/// [`SubresourceShape::compose`] for a checked version.
pub fn calc_subresource(
    mip_slice: u32,
    array_slice: u32,
    plane_slice: u32,
    mip_levels: u32,
    array_size: u32,
) -> u32 {
    mip_slice
        .wrapping_add(array_slice.wrapping_mul(mip_levels))
        .wrapping_add(plane_slice.wrapping_mul(mip_levels).wrapping_mul(array_size))
}

/// Length of a full mip chain: `floor(log2(max extent)) + 1`.
pub fn max_mip_levels(width: u64, height: u32, depth: u32) -> u32 {
    let largest = width.max(height as u64).max(depth as u64).max(1);
    u64::BITS - largest.leading_zeros()
}

/// Extent of `mip_slice` along one axis, never smaller than one texel.
pub fn mip_extent(base: u64, mip_slice: u32) -> u64 {
    base.checked_shr(mip_slice).unwrap_or(0).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(mip_levels: u32, array_size: u32, plane_count: u32) -> SubresourceShape {
        SubresourceShape {
            mip_levels,
            array_size,
            plane_count,
        }
    }

    #[test]
    fn test_calc_subresource() {
        assert_eq!(calc_subresource(0, 0, 0, 7, 5), 0);
        assert_eq!(calc_subresource(3, 0, 0, 7, 5), 3);
        assert_eq!(calc_subresource(3, 2, 0, 7, 5), 17);
        assert_eq!(calc_subresource(3, 2, 1, 7, 5), 52);
    }

    #[test]
    fn test_decompose_mip_fastest() {
        let s = shape(7, 5, 2);
        assert_eq!(s.count(), Some(70));

        let idx = s.decompose(52).unwrap();
        assert_eq!(
            idx,
            SubresourceIndex {
                mip_slice: 3,
                array_slice: 2,
                plane_slice: 1
            }
        );
        assert_eq!(s.compose(idx).unwrap(), 52);

        let idx = s.decompose(7).unwrap();
        assert_eq!((idx.mip_slice, idx.array_slice, idx.plane_slice), (0, 1, 0));
    }

    #[test]
    fn test_decompose_out_of_range() {
        let s = shape(1, 1, 1);
        assert_eq!(
            s.decompose(1),
            Err(FootprintError::InvalidRange {
                first: 1,
                count: 1,
                total: 1
            })
        );
        assert!(s
            .compose(SubresourceIndex {
                mip_slice: 1,
                array_slice: 0,
                plane_slice: 0
            })
            .is_err());
    }

    #[test]
    fn test_count_overflow() {
        assert_eq!(shape(16, u32::MAX, 2).count(), None);
    }

    #[test]
    fn test_max_mip_levels() {
        assert_eq!(max_mip_levels(1, 1, 1), 1);
        assert_eq!(max_mip_levels(100, 100, 1), 7);
        assert_eq!(max_mip_levels(128, 1, 1), 8);
        assert_eq!(max_mip_levels(127, 1, 1), 7);
        assert_eq!(max_mip_levels(64, 32, 8), 7);
        assert_eq!(max_mip_levels(4, 4, 256), 9);
        assert_eq!(max_mip_levels(16384, 16384, 1), 15);
    }

    #[test]
    fn test_mip_extent() {
        assert_eq!(mip_extent(100, 0), 100);
        assert_eq!(mip_extent(100, 2), 25);
        assert_eq!(mip_extent(100, 3), 12);
        assert_eq!(mip_extent(100, 10), 1);
        assert_eq!(mip_extent(100, 64), 1);
    }
}
