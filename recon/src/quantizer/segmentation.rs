// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::error::{Error, Result};

pub const MAX_SEGMENTS: usize = 8;
pub const NUM_SEGMENT_FEATURES: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum SegmentFeature {
    Quantizer = 0,
    LoopFilterYVertical = 1,
    LoopFilterYHorizontal = 2,
    LoopFilterU = 3,
    LoopFilterV = 4,
    ReferenceFrame = 5,
    Skip = 6,
    GlobalMv = 7,
}

impl TryFrom<u32> for SegmentFeature {
    type Error = Error;

    fn try_from(value: u32) -> Result<SegmentFeature> {
        SegmentFeature::from_u32(value)
            .ok_or_else(|| Error::InvalidEnum(value, "SegmentFeature".to_string()))
    }
}

/// Per-segment feature state of a frame, as parsed from its header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Segmentation {
    pub enabled: bool,
    pub feature_enabled: [[bool; NUM_SEGMENT_FEATURES]; MAX_SEGMENTS],
    pub feature_data: [[i16; NUM_SEGMENT_FEATURES]; MAX_SEGMENTS],
}

impl Segmentation {
    pub fn feature_active(&self, segment: usize, feature: SegmentFeature) -> bool {
        self.enabled && self.feature_enabled[segment][feature as usize]
    }

    pub fn feature_data(&self, segment: usize, feature: SegmentFeature) -> i16 {
        self.feature_data[segment][feature as usize]
    }

    /// Enables `feature` for `segment` with the given value. Does not touch `enabled`.
    pub fn set_feature(&mut self, segment: usize, feature: SegmentFeature, data: i16) {
        self.feature_enabled[segment][feature as usize] = true;
        self.feature_data[segment][feature as usize] = data;
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;

    #[test]
    fn features_require_segmentation() {
        let mut segmentation = Segmentation::default();
        segmentation.set_feature(3, SegmentFeature::Quantizer, -12);
        assert!(!segmentation.feature_active(3, SegmentFeature::Quantizer));
        segmentation.enabled = true;
        assert!(segmentation.feature_active(3, SegmentFeature::Quantizer));
        assert!(!segmentation.feature_active(2, SegmentFeature::Quantizer));
        assert!(!segmentation.feature_active(3, SegmentFeature::Skip));
        assert_eq!(segmentation.feature_data(3, SegmentFeature::Quantizer), -12);
    }

    #[test]
    fn feature_from_raw() {
        assert_eq!(SegmentFeature::try_from(0).unwrap(), SegmentFeature::Quantizer);
        assert_eq!(SegmentFeature::try_from(7).unwrap(), SegmentFeature::GlobalMv);
        assert!(SegmentFeature::try_from(8).is_err());
    }
}
