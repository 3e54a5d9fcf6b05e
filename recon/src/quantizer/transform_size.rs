// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::error::{Error, Result};

pub const NUM_TRANSFORM_SIZES: usize = 19;

/// Transform block dimensions, named width by height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive)]
pub enum TransformSize {
    Tx4x4 = 0,
    Tx4x8 = 1,
    Tx4x16 = 2,
    Tx8x4 = 3,
    Tx8x8 = 4,
    Tx8x16 = 5,
    Tx8x32 = 6,
    Tx16x4 = 7,
    Tx16x8 = 8,
    Tx16x16 = 9,
    Tx16x32 = 10,
    Tx16x64 = 11,
    Tx32x8 = 12,
    Tx32x16 = 13,
    Tx32x32 = 14,
    Tx32x64 = 15,
    Tx64x16 = 16,
    Tx64x32 = 17,
    Tx64x64 = 18,
}

const LOG2_WIDTH: [u8; NUM_TRANSFORM_SIZES] = [2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 4, 5, 5, 5, 5, 6, 6, 6];
const LOG2_HEIGHT: [u8; NUM_TRANSFORM_SIZES] = [2, 3, 4, 2, 3, 4, 5, 2, 3, 4, 5, 6, 3, 4, 5, 6, 4, 5, 6];

impl TransformSize {
    pub const VALUES: [TransformSize; NUM_TRANSFORM_SIZES] = [
        TransformSize::Tx4x4,
        TransformSize::Tx4x8,
        TransformSize::Tx4x16,
        TransformSize::Tx8x4,
        TransformSize::Tx8x8,
        TransformSize::Tx8x16,
        TransformSize::Tx8x32,
        TransformSize::Tx16x4,
        TransformSize::Tx16x8,
        TransformSize::Tx16x16,
        TransformSize::Tx16x32,
        TransformSize::Tx16x64,
        TransformSize::Tx32x8,
        TransformSize::Tx32x16,
        TransformSize::Tx32x32,
        TransformSize::Tx32x64,
        TransformSize::Tx64x16,
        TransformSize::Tx64x32,
        TransformSize::Tx64x64,
    ];

    pub const fn width(self) -> usize {
        1 << LOG2_WIDTH[self as usize]
    }

    pub const fn height(self) -> usize {
        1 << LOG2_HEIGHT[self as usize]
    }

    pub const fn area(self) -> usize {
        self.width() * self.height()
    }

    pub const fn has_64_side(self) -> bool {
        self.width() == 64 || self.height() == 64
    }

    /// Size whose coefficients are actually coded: only the top-left 32x32
    /// region of a transform with a 64-sample side carries coefficients.
    pub const fn adjusted(self) -> TransformSize {
        match self {
            TransformSize::Tx64x64 | TransformSize::Tx64x32 | TransformSize::Tx32x64 => {
                TransformSize::Tx32x32
            }
            TransformSize::Tx16x64 => TransformSize::Tx16x32,
            TransformSize::Tx64x16 => TransformSize::Tx32x16,
            other => other,
        }
    }
}

impl TryFrom<u32> for TransformSize {
    type Error = Error;

    fn try_from(value: u32) -> Result<TransformSize> {
        TransformSize::from_u32(value)
            .ok_or_else(|| Error::InvalidEnum(value, "TransformSize".to_string()))
    }
}
