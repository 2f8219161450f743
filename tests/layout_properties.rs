//! Invariants that hold for every valid resource and subresource range.

use copyable_footprint::{
    calc_subresource, get_copyable_footprints, FootprintError, Format, ResourceDesc,
    SubresourceShape, TEXTURE_DATA_PITCH_ALIGNMENT, TEXTURE_DATA_PLACEMENT_ALIGNMENT,
};
use proptest::prelude::*;

fn format_strategy() -> impl Strategy<Value = Format> {
    prop_oneof![
        Just(Format::R8_UNORM),
        Just(Format::R8G8B8A8_UNORM),
        Just(Format::R32G32B32_FLOAT),
        Just(Format::R16G16B16A16_FLOAT),
        Just(Format::BC1_UNORM),
        Just(Format::BC7_UNORM),
        Just(Format::YUY2),
        Just(Format::NV12),
        Just(Format::P010),
        Just(Format::NV11),
        Just(Format::D32_FLOAT_S8X24_UINT),
    ]
}

/// A valid 2D texture description with an arbitrary (possibly full) mip chain.
fn texture2d_strategy() -> impl Strategy<Value = ResourceDesc> {
    (format_strategy(), 1u64..=600, 1u32..=600, 1u16..=6, any::<bool>()).prop_flat_map(
        |(format, width, height, array_size, full_chain)| {
            let max = u64::BITS - width.max(height as u64).leading_zeros();
            let mips = if full_chain { Just(0u16).boxed() } else { (1..=max as u16).boxed() };
            mips.prop_map(move |mip_levels| {
                ResourceDesc::tex2d(format, width, height, array_size, mip_levels)
            })
        },
    )
}

fn volume_strategy() -> impl Strategy<Value = ResourceDesc> {
    (1u64..=256, 1u32..=256, 1u16..=64).prop_map(|(width, height, depth)| {
        ResourceDesc::tex3d(Format::R8G8B8A8_UNORM, width, height, depth, 0)
    })
}

fn desc_with_range() -> impl Strategy<Value = (ResourceDesc, u32, u32, u64)> {
    prop_oneof![texture2d_strategy(), volume_strategy()].prop_flat_map(|desc| {
        let total = desc.subresource_count().unwrap();
        (0..total).prop_flat_map(move |first| {
            (Just(desc), Just(first), 0..=total - first, 0u64..1 << 20)
        })
    })
}

proptest! {
    #[test]
    fn offsets_are_aligned_and_monotonic((desc, first, count, base) in desc_with_range()) {
        let batch = get_copyable_footprints(&desc, first, count, base).unwrap();
        prop_assert_eq!(batch.len(), count as usize);

        for layout in batch.iter() {
            let pitch = layout.placed.footprint.row_pitch;
            prop_assert_eq!(pitch % TEXTURE_DATA_PITCH_ALIGNMENT, 0);
            prop_assert!(pitch as u64 >= layout.row_size_in_bytes);
            prop_assert_eq!(
                (layout.placed.offset - base) % TEXTURE_DATA_PLACEMENT_ALIGNMENT as u64,
                0
            );
        }

        let layouts: Vec<_> = batch.iter().collect();
        for pair in layouts.windows(2) {
            prop_assert!(pair[1].placed.offset >= pair[0].placed.offset + pair[0].size_in_bytes());
        }

        match layouts.last() {
            Some(last) => prop_assert_eq!(
                batch.total_bytes,
                last.placed.offset - base + last.size_in_bytes()
            ),
            None => prop_assert_eq!(batch.total_bytes, 0),
        }
    }

    #[test]
    fn repeated_calls_agree((desc, first, count, base) in desc_with_range()) {
        let a = get_copyable_footprints(&desc, first, count, base).unwrap();
        let b = get_copyable_footprints(&desc, first, count, base).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn subrange_matches_full_range_shifted((desc, first, count, _base) in desc_with_range()) {
        prop_assume!(count > 0);
        let total = desc.subresource_count().unwrap();
        let full = get_copyable_footprints(&desc, 0, total, 0).unwrap();
        let sub = get_copyable_footprints(&desc, first, count, 0).unwrap();

        let shift = full.layouts[first as usize].offset;
        for (i, layout) in sub.iter().enumerate() {
            let expected = full.subresource(first as usize + i).unwrap();
            prop_assert_eq!(layout.placed.footprint, expected.placed.footprint);
            prop_assert_eq!(layout.num_rows, expected.num_rows);
            prop_assert_eq!(layout.row_size_in_bytes, expected.row_size_in_bytes);
            prop_assert_eq!(layout.placed.offset + shift, expected.placed.offset);
        }
    }

    #[test]
    fn out_of_range_always_fails(desc in texture2d_strategy(), extra in 1u32..16) {
        let total = desc.subresource_count().unwrap();
        prop_assert_eq!(
            get_copyable_footprints(&desc, 0, total + extra, 0),
            Err(FootprintError::InvalidRange { first: 0, count: total + extra, total })
        );
        let past_end = get_copyable_footprints(&desc, total, extra, 0);
        let rejected = matches!(past_end, Err(FootprintError::InvalidRange { .. }));
        prop_assert!(rejected, "expected InvalidRange, got {:?}", past_end);
    }

    #[test]
    fn index_decomposition_is_bijective(
        mip_levels in 1u32..16,
        array_size in 1u32..64,
        plane_count in 1u32..3,
    ) {
        let shape = SubresourceShape { mip_levels, array_size, plane_count };
        let total = shape.count().unwrap();
        for subresource in 0..total {
            let index = shape.decompose(subresource).unwrap();
            prop_assert!(index.mip_slice < mip_levels);
            prop_assert!(index.array_slice < array_size);
            prop_assert!(index.plane_slice < plane_count);
            prop_assert_eq!(shape.compose(index).unwrap(), subresource);
            prop_assert_eq!(
                calc_subresource(
                    index.mip_slice,
                    index.array_slice,
                    index.plane_slice,
                    mip_levels,
                    array_size
                ),
                subresource
            );
        }
        prop_assert!(shape.decompose(total).is_err());
    }
}

#[test]
fn concurrent_callers_see_identical_results() {
    let desc = ResourceDesc::tex2d(Format::NV12, 1920, 1080, 4, 0);
    let total = desc.subresource_count().unwrap();
    let expected = get_copyable_footprints(&desc, 0, total, 0).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| get_copyable_footprints(&desc, 0, total, 0).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
