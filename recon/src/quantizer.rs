// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Quantization step sizes: segment-adjusted quantization indices, DC/AC step
//! lookup and the per-coefficient quantizer matrices.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::{
    bit_depth::BitDepth,
    error::{Error, Result},
    util::{clip3, tracing_wrappers::*},
};

mod matrix;
mod segmentation;
mod tables;
mod transform_size;

pub use matrix::{
    NUM_PLANE_TYPES, NUM_QUANTIZER_LEVELS, PACKED_SOURCE_BYTES, QuantizerMatrix,
    QuantizerMatrixSources, SOURCE_BYTES_PER_PLANE_TYPE, SourceTable,
};
pub use segmentation::{MAX_SEGMENTS, NUM_SEGMENT_FEATURES, SegmentFeature, Segmentation};
pub use transform_size::{NUM_TRANSFORM_SIZES, TransformSize};

pub const MIN_QUANTIZER: i32 = 0;
pub const MAX_QUANTIZER: i32 = 255;
pub const QINDEX_RANGE: usize = MAX_QUANTIZER as usize + 1;
pub const NUM_PLANES: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum Plane {
    Y = 0,
    U = 1,
    V = 2,
}

impl Plane {
    pub const VALUES: [Plane; NUM_PLANES] = [Plane::Y, Plane::U, Plane::V];

    pub const fn plane_type(self) -> PlaneType {
        match self {
            Plane::Y => PlaneType::Y,
            Plane::U | Plane::V => PlaneType::UV,
        }
    }
}

impl TryFrom<u32> for Plane {
    type Error = Error;

    fn try_from(value: u32) -> Result<Plane> {
        Plane::from_u32(value).ok_or_else(|| Error::InvalidEnum(value, "Plane".to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaneType {
    Y = 0,
    UV = 1,
}

impl PlaneType {
    pub const VALUES: [PlaneType; NUM_PLANE_TYPES] = [PlaneType::Y, PlaneType::UV];
}

/// Quantization index of blocks in `segment`: the frame's base index,
/// overridden by the segment's quantizer feature when that is active.
pub fn get_qindex(segmentation: &Segmentation, segment: usize, base_qindex: i32) -> i32 {
    if segmentation.feature_active(segment, SegmentFeature::Quantizer) {
        let segment_qindex =
            base_qindex + segmentation.feature_data(segment, SegmentFeature::Quantizer) as i32;
        return clip3(segment_qindex, MIN_QUANTIZER, MAX_QUANTIZER);
    }
    base_qindex
}

/// Frame level quantization parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuantizerParameters {
    pub base_index: i32,
    /// Indexed by [`Plane`].
    pub delta_dc: [i32; NUM_PLANES],
    /// Indexed by [`Plane`].
    pub delta_ac: [i32; NUM_PLANES],
    pub use_matrix: bool,
    /// Indexed by [`Plane`]. Level 15 means flat weights.
    pub matrix_level: [u8; NUM_PLANES],
}

impl QuantizerParameters {
    /// Quantizer matrix level of `plane`, if its coefficients are weighted.
    pub fn matrix_level(&self, plane: Plane) -> Option<usize> {
        let level = self.matrix_level[plane as usize] as usize;
        (self.use_matrix && level < NUM_QUANTIZER_LEVELS).then_some(level)
    }
}

/// Step sizes for every quantization index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuantizerLookup {
    dc: [i16; QINDEX_RANGE],
    ac: [i16; QINDEX_RANGE],
}

impl QuantizerLookup {
    /// Both tables must be non-decreasing.
    pub fn new(dc: [i16; QINDEX_RANGE], ac: [i16; QINDEX_RANGE]) -> Result<QuantizerLookup> {
        for table in [&dc, &ac] {
            if let Some(index) = table.windows(2).position(|w| w[1] < w[0]) {
                return Err(Error::NonMonotonicQuantizerLookup(index + 1));
            }
        }
        Ok(QuantizerLookup { dc, ac })
    }

    /// Step sizes of the bitstream definition for `bit_depth`.
    pub fn builtin(bit_depth: BitDepth) -> &'static QuantizerLookup {
        match bit_depth {
            BitDepth::Eight => &tables::LOOKUP_8BIT,
            BitDepth::Ten => &tables::LOOKUP_10BIT,
            BitDepth::Twelve => &tables::LOOKUP_12BIT,
        }
    }

    pub fn dc(&self, qindex: usize) -> i32 {
        self.dc[qindex] as i32
    }

    pub fn ac(&self, qindex: usize) -> i32 {
        self.ac[qindex] as i32
    }
}

/// Quantization parameters of a frame bound to the step size tables of its
/// bit depth.
#[derive(Clone, Copy, Debug)]
pub struct Quantizer<'a> {
    params: QuantizerParameters,
    lookup: &'a QuantizerLookup,
}

impl Quantizer<'static> {
    pub fn new(bit_depth: BitDepth, params: &QuantizerParameters) -> Quantizer<'static> {
        debug!(?bit_depth, base_index = params.base_index, "quantizer");
        Quantizer::with_lookup(QuantizerLookup::builtin(bit_depth), params)
    }
}

impl<'a> Quantizer<'a> {
    pub fn with_lookup(lookup: &'a QuantizerLookup, params: &QuantizerParameters) -> Quantizer<'a> {
        Quantizer {
            params: *params,
            lookup,
        }
    }

    pub fn params(&self) -> &QuantizerParameters {
        &self.params
    }

    fn index(qindex: i32, delta: i32) -> usize {
        clip3(qindex + delta, MIN_QUANTIZER, MAX_QUANTIZER) as usize
    }

    pub fn dc_value(&self, plane: Plane, qindex: i32) -> i32 {
        self.lookup
            .dc(Self::index(qindex, self.params.delta_dc[plane as usize]))
    }

    pub fn ac_value(&self, plane: Plane, qindex: i32) -> i32 {
        self.lookup
            .ac(Self::index(qindex, self.params.delta_ac[plane as usize]))
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;
    use crate::util::test::assert_almost_eq;

    fn segmentation_with_delta(segment: usize, delta: i16) -> Segmentation {
        let mut segmentation = Segmentation {
            enabled: true,
            ..Default::default()
        };
        segmentation.set_feature(segment, SegmentFeature::Quantizer, delta);
        segmentation
    }

    #[test]
    fn segment_delta_is_clamped() {
        assert_eq!(get_qindex(&segmentation_with_delta(1, 20), 1, 100), 120);
        assert_eq!(get_qindex(&segmentation_with_delta(1, -200), 1, 100), MIN_QUANTIZER);
        assert_eq!(get_qindex(&segmentation_with_delta(1, 200), 1, 100), MAX_QUANTIZER);
    }

    #[test]
    fn inactive_feature_keeps_base() {
        let segmentation = segmentation_with_delta(1, 20);
        assert_eq!(get_qindex(&segmentation, 0, 100), 100);
        assert_eq!(get_qindex(&Segmentation::default(), 1, 100), 100);
        // Without an active feature, the base index passes through unclamped.
        for base in 0..=255 {
            assert_eq!(get_qindex(&segmentation, 2, base), base);
        }
    }

    #[test]
    fn builtin_tables_are_monotonic() {
        for bit_depth in BitDepth::VALUES {
            let lookup = QuantizerLookup::builtin(bit_depth);
            let rebuilt = QuantizerLookup::new(lookup.dc, lookup.ac).unwrap();
            assert_eq!(&rebuilt, lookup);
            assert_eq!(lookup.dc(0), 4);
            assert_eq!(lookup.ac(0), 4);
        }
    }

    #[test]
    fn table_endpoints() {
        let eight = QuantizerLookup::builtin(BitDepth::Eight);
        assert_eq!((eight.dc(255), eight.ac(255)), (1336, 1828));
        let ten = QuantizerLookup::builtin(BitDepth::Ten);
        assert_eq!((ten.dc(255), ten.ac(255)), (5347, 7312));
        let twelve = QuantizerLookup::builtin(BitDepth::Twelve);
        assert_eq!((twelve.dc(1), twelve.ac(1)), (12, 13));
        assert_eq!((twelve.dc(255), twelve.ac(255)), (21387, 29247));
    }

    #[test]
    fn rejects_decreasing_lookup() {
        let mut dc = [0i16; QINDEX_RANGE];
        for (i, v) in dc.iter_mut().enumerate() {
            *v = i as i16;
        }
        let ac = dc;
        dc[10] = 3;
        assert!(matches!(
            QuantizerLookup::new(dc, ac),
            Err(Error::NonMonotonicQuantizerLookup(10))
        ));
    }

    #[test]
    fn deltas_apply_per_plane_and_clamp() {
        let params = QuantizerParameters {
            base_index: 100,
            delta_dc: [0, -10, 300],
            delta_ac: [5, 0, -300],
            ..Default::default()
        };
        let quantizer = Quantizer::new(BitDepth::Eight, &params);
        let lookup = QuantizerLookup::builtin(BitDepth::Eight);
        assert_eq!(quantizer.dc_value(Plane::Y, 100), lookup.dc(100));
        assert_eq!(quantizer.dc_value(Plane::U, 100), lookup.dc(90));
        assert_eq!(quantizer.dc_value(Plane::V, 100), lookup.dc(255));
        assert_eq!(quantizer.ac_value(Plane::Y, 100), lookup.ac(105));
        assert_eq!(quantizer.ac_value(Plane::U, 100), lookup.ac(100));
        assert_eq!(quantizer.ac_value(Plane::V, 100), lookup.ac(0));
        assert_eq!(quantizer.ac_value(Plane::Y, -50), lookup.ac(0));
    }

    #[test]
    fn step_sizes_are_monotonic_in_qindex() {
        let params = QuantizerParameters {
            delta_dc: [3, -7, 0],
            delta_ac: [-2, 0, 9],
            ..Default::default()
        };
        for bit_depth in BitDepth::VALUES {
            let quantizer = Quantizer::new(bit_depth, &params);
            for plane in Plane::VALUES {
                for qindex in -20..300 {
                    let dc = quantizer.dc_value(plane, qindex);
                    let ac = quantizer.ac_value(plane, qindex);
                    assert!(dc <= quantizer.dc_value(plane, qindex + 1));
                    assert!(ac <= quantizer.ac_value(plane, qindex + 1));
                }
            }
        }
    }

    #[test]
    fn twelve_bit_steps_track_ten_bit() {
        let params = QuantizerParameters::default();
        let twelve = Quantizer::new(BitDepth::Twelve, &params);
        let ten = Quantizer::new(BitDepth::Ten, &params);
        // Two extra bits of precision scale the upper step sizes by four.
        for qindex in 128..=255 {
            for (a, b) in [
                (twelve.dc_value(Plane::Y, qindex), ten.dc_value(Plane::Y, qindex)),
                (twelve.ac_value(Plane::U, qindex), ten.ac_value(Plane::U, qindex)),
            ] {
                assert_almost_eq!(a, 4 * b, 4 * b / 100);
            }
        }
    }

    #[test]
    fn injected_lookup_replaces_builtin() {
        let params = QuantizerParameters::default();
        let mut steps = [0i16; QINDEX_RANGE];
        for (i, v) in steps.iter_mut().enumerate() {
            *v = 16 + 4 * i as i16;
        }
        let lookup = QuantizerLookup::new(steps, steps).unwrap();
        let quantizer = Quantizer::with_lookup(&lookup, &params);
        assert_eq!(quantizer.dc_value(Plane::V, 10), 56);
        assert_eq!(quantizer.ac_value(Plane::Y, 400), 16 + 4 * 255);
    }

    #[test]
    fn plane_types() {
        assert_eq!(Plane::Y.plane_type(), PlaneType::Y);
        assert_eq!(Plane::U.plane_type(), PlaneType::UV);
        assert_eq!(Plane::V.plane_type(), PlaneType::UV);
        assert_eq!(Plane::try_from(2).unwrap(), Plane::V);
        assert!(Plane::try_from(3).is_err());
    }
}
