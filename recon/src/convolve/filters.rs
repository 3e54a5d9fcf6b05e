// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::error::{Error, Result};

pub const SUB_PIXEL_TAPS: usize = 8;
pub const NUM_PHASES: usize = 16;
pub const NUM_FILTERS: usize = 6;

/// Sum of the taps of every entry of `HALF_SUB_PIXEL_FILTERS`.
pub const HALF_FILTER_UNITY: i32 = 1 << (crate::bit_depth::FILTER_BITS - 1);

/// Interpolation filter selector. The first three are the bitstream-level
/// filters; the 4-tap variants are what they narrow to on small blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum InterpolationFilter {
    // Despite the name, uses only 6 taps.
    EightTap = 0,
    // Despite the name, uses only 6 taps.
    EightTapSmooth = 1,
    EightTapSharp = 2,
    Bilinear = 3,
    FourTap = 4,
    FourTapSmooth = 5,
}

impl InterpolationFilter {
    pub const VALUES: [InterpolationFilter; NUM_FILTERS] = [
        InterpolationFilter::EightTap,
        InterpolationFilter::EightTapSmooth,
        InterpolationFilter::EightTapSharp,
        InterpolationFilter::Bilinear,
        InterpolationFilter::FourTap,
        InterpolationFilter::FourTapSmooth,
    ];

    /// Filter actually applied along an axis whose block extent is `extent`.
    /// Blocks of 4 or fewer samples are not guaranteed the border a 6 or 8-tap
    /// filter reads, so those filters narrow to their 4-tap counterparts.
    pub const fn for_extent(self, extent: usize) -> InterpolationFilter {
        if extent > 4 {
            return self;
        }
        match self {
            InterpolationFilter::EightTap | InterpolationFilter::EightTapSharp => {
                InterpolationFilter::FourTap
            }
            InterpolationFilter::EightTapSmooth => InterpolationFilter::FourTapSmooth,
            other => other,
        }
    }

    pub const fn num_taps(self) -> FilterTaps {
        match self {
            InterpolationFilter::EightTap | InterpolationFilter::EightTapSmooth => FilterTaps::Six,
            InterpolationFilter::EightTapSharp => FilterTaps::Eight,
            InterpolationFilter::Bilinear => FilterTaps::Two,
            InterpolationFilter::FourTap | InterpolationFilter::FourTapSmooth => FilterTaps::Four,
        }
    }
}

impl TryFrom<u32> for InterpolationFilter {
    type Error = Error;

    fn try_from(value: u32) -> Result<InterpolationFilter> {
        InterpolationFilter::from_u32(value)
            .ok_or_else(|| Error::InvalidEnum(value, "InterpolationFilter".to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterTaps {
    Two = 2,
    Four = 4,
    Six = 6,
    Eight = 8,
}

impl FilterTaps {
    pub const fn count(self) -> usize {
        self as usize
    }

    /// Offset of the first tap relative to the sample being produced.
    pub const fn first_offset(self) -> isize {
        -(self.count() as isize / 2 - 1)
    }

    /// Index of the first used coefficient in an 8-entry filter row; the same
    /// index locates the first sample in a row that starts 3 samples early.
    pub const fn first_index(self) -> usize {
        SUB_PIXEL_TAPS / 2 - self.count() / 2
    }
}

/// Coefficients of one (filter, phase) pair restricted to the taps the filter uses.
#[derive(Clone, Copy, Debug)]
pub struct SubPixelFilter {
    num_taps: FilterTaps,
    coefficients: [i32; SUB_PIXEL_TAPS],
}

impl SubPixelFilter {
    /// `phase` is in 1/16 sample units and must be below 16.
    pub fn new(filter: InterpolationFilter, phase: u8) -> SubPixelFilter {
        let num_taps = filter.num_taps();
        let row = &HALF_SUB_PIXEL_FILTERS[filter as usize][phase as usize];
        let used = &row[num_taps.first_index()..num_taps.first_index() + num_taps.count()];
        let mut coefficients = [0; SUB_PIXEL_TAPS];
        for (c, &tap) in coefficients.iter_mut().zip(used) {
            *c = tap as i32;
        }
        SubPixelFilter {
            num_taps,
            coefficients,
        }
    }

    pub fn num_taps(&self) -> FilterTaps {
        self.num_taps
    }

    pub fn taps(&self) -> &[i32] {
        &self.coefficients[..self.num_taps.count()]
    }
}

/// The AV1 sub-pixel filters with every coefficient halved (all of them are
/// even), so that 8-bit sums fit in 16 bits. Each row sums to 64; the
/// rounding shifts applied to these sums are the full-precision shifts minus one.
///
/// Indexed by [`InterpolationFilter`] and phase.
#[rustfmt::skip]
pub static HALF_SUB_PIXEL_FILTERS: [[[i8; SUB_PIXEL_TAPS]; NUM_PHASES]; NUM_FILTERS] = [
    // EightTap (regular).
    [
        [0, 0, 0, 64, 0, 0, 0, 0], [0, 1, -3, 63, 4, -1, 0, 0],
        [0, 1, -5, 61, 9, -2, 0, 0], [0, 1, -6, 58, 14, -4, 1, 0],
        [0, 1, -7, 55, 19, -5, 1, 0], [0, 1, -7, 51, 24, -6, 1, 0],
        [0, 1, -8, 47, 29, -6, 1, 0], [0, 1, -7, 42, 33, -6, 1, 0],
        [0, 1, -7, 38, 38, -7, 1, 0], [0, 1, -6, 33, 42, -7, 1, 0],
        [0, 1, -6, 29, 47, -8, 1, 0], [0, 1, -6, 24, 51, -7, 1, 0],
        [0, 1, -5, 19, 55, -7, 1, 0], [0, 1, -4, 14, 58, -6, 1, 0],
        [0, 0, -2, 9, 61, -5, 1, 0], [0, 0, -1, 4, 63, -3, 1, 0],
    ],
    // EightTapSmooth.
    [
        [0, 0, 0, 64, 0, 0, 0, 0], [0, 1, 14, 31, 17, 1, 0, 0],
        [0, 0, 13, 31, 18, 2, 0, 0], [0, 0, 11, 31, 20, 2, 0, 0],
        [0, 0, 10, 30, 21, 3, 0, 0], [0, 0, 9, 29, 22, 4, 0, 0],
        [0, 0, 8, 28, 23, 5, 0, 0], [0, -1, 8, 27, 24, 6, 0, 0],
        [0, -1, 7, 26, 26, 7, -1, 0], [0, 0, 6, 24, 27, 8, -1, 0],
        [0, 0, 5, 23, 28, 8, 0, 0], [0, 0, 4, 22, 29, 9, 0, 0],
        [0, 0, 3, 21, 30, 10, 0, 0], [0, 0, 2, 20, 31, 11, 0, 0],
        [0, 0, 2, 18, 31, 13, 0, 0], [0, 0, 1, 17, 31, 14, 1, 0],
    ],
    // EightTapSharp.
    [
        [0, 0, 0, 64, 0, 0, 0, 0], [-1, 1, -3, 63, 4, -1, 1, 0],
        [-1, 3, -6, 62, 8, -3, 2, -1], [-1, 4, -9, 60, 13, -5, 3, -1],
        [-2, 5, -11, 58, 19, -7, 3, -1], [-2, 5, -11, 54, 24, -9, 4, -1],
        [-2, 5, -12, 50, 30, -10, 4, -1], [-2, 5, -12, 45, 35, -11, 5, -1],
        [-2, 6, -12, 40, 40, -12, 6, -2], [-1, 5, -11, 35, 45, -12, 5, -2],
        [-1, 4, -10, 30, 50, -12, 5, -2], [-1, 4, -9, 24, 54, -11, 5, -2],
        [-1, 3, -7, 19, 58, -11, 5, -2], [-1, 3, -5, 13, 60, -9, 4, -1],
        [-1, 2, -3, 8, 62, -6, 3, -1], [0, 1, -1, 4, 63, -3, 1, -1],
    ],
    // Bilinear.
    [
        [0, 0, 0, 64, 0, 0, 0, 0], [0, 0, 0, 60, 4, 0, 0, 0],
        [0, 0, 0, 56, 8, 0, 0, 0], [0, 0, 0, 52, 12, 0, 0, 0],
        [0, 0, 0, 48, 16, 0, 0, 0], [0, 0, 0, 44, 20, 0, 0, 0],
        [0, 0, 0, 40, 24, 0, 0, 0], [0, 0, 0, 36, 28, 0, 0, 0],
        [0, 0, 0, 32, 32, 0, 0, 0], [0, 0, 0, 28, 36, 0, 0, 0],
        [0, 0, 0, 24, 40, 0, 0, 0], [0, 0, 0, 20, 44, 0, 0, 0],
        [0, 0, 0, 16, 48, 0, 0, 0], [0, 0, 0, 12, 52, 0, 0, 0],
        [0, 0, 0, 8, 56, 0, 0, 0], [0, 0, 0, 4, 60, 0, 0, 0],
    ],
    // FourTap (regular).
    [
        [0, 0, 0, 64, 0, 0, 0, 0], [0, 0, -2, 63, 4, -1, 0, 0],
        [0, 0, -4, 61, 9, -2, 0, 0], [0, 0, -5, 58, 14, -3, 0, 0],
        [0, 0, -6, 55, 19, -4, 0, 0], [0, 0, -6, 51, 24, -5, 0, 0],
        [0, 0, -7, 47, 29, -5, 0, 0], [0, 0, -6, 42, 33, -5, 0, 0],
        [0, 0, -6, 38, 38, -6, 0, 0], [0, 0, -5, 33, 42, -6, 0, 0],
        [0, 0, -5, 29, 47, -7, 0, 0], [0, 0, -5, 24, 51, -6, 0, 0],
        [0, 0, -4, 19, 55, -6, 0, 0], [0, 0, -3, 14, 58, -5, 0, 0],
        [0, 0, -2, 9, 61, -4, 0, 0], [0, 0, -1, 4, 63, -2, 0, 0],
    ],
    // FourTapSmooth.
    [
        [0, 0, 0, 64, 0, 0, 0, 0], [0, 0, 15, 31, 17, 1, 0, 0],
        [0, 0, 13, 31, 18, 2, 0, 0], [0, 0, 11, 31, 20, 2, 0, 0],
        [0, 0, 10, 30, 21, 3, 0, 0], [0, 0, 9, 29, 22, 4, 0, 0],
        [0, 0, 8, 28, 23, 5, 0, 0], [0, 0, 7, 27, 24, 6, 0, 0],
        [0, 0, 6, 26, 26, 6, 0, 0], [0, 0, 6, 24, 27, 7, 0, 0],
        [0, 0, 5, 23, 28, 8, 0, 0], [0, 0, 4, 22, 29, 9, 0, 0],
        [0, 0, 3, 21, 30, 10, 0, 0], [0, 0, 2, 20, 31, 11, 0, 0],
        [0, 0, 2, 18, 31, 13, 0, 0], [0, 0, 1, 17, 31, 15, 0, 0],
    ],
];
