// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;

use crate::bit_depth::BitDepth;

mod private {
    pub trait Sealed {}
}

/// Offset added to high bit depth compound samples so that the unclipped
/// prediction range fits in an unsigned 16-bit sample.
pub const COMPOUND_OFFSET: i32 = (1 << 14) + (1 << 13);

/// Storage type of reconstructed samples: `u8` for 8-bit sequences, `u16` for
/// 10 and 12-bit ones.
pub trait Pixel:
    private::Sealed + Copy + Default + Debug + PartialEq + Send + Sync + Into<i32> + 'static
{
    /// 16-bit storage of an unclipped compound prediction sample.
    type Compound: Copy + Default + Debug + PartialEq + Send + Sync + Into<i32> + 'static;

    fn supports(bit_depth: BitDepth) -> bool;

    /// Narrows a value already clamped to the pixel range.
    fn from_clamped(value: i32) -> Self;

    fn to_compound(value: i32) -> Self::Compound;

    /// Inverse of `to_compound`, for the blend stage that consumes compound predictions.
    fn from_compound(value: Self::Compound) -> i32;
}

impl private::Sealed for u8 {}

impl Pixel for u8 {
    type Compound = i16;

    fn supports(bit_depth: BitDepth) -> bool {
        bit_depth == BitDepth::Eight
    }

    #[inline(always)]
    fn from_clamped(value: i32) -> u8 {
        debug_assert!((0..=u8::MAX as i32).contains(&value));
        value as u8
    }

    #[inline(always)]
    fn to_compound(value: i32) -> i16 {
        debug_assert!((i16::MIN as i32..=i16::MAX as i32).contains(&value));
        value as i16
    }

    #[inline(always)]
    fn from_compound(value: i16) -> i32 {
        value as i32
    }
}

impl private::Sealed for u16 {}

impl Pixel for u16 {
    type Compound = u16;

    fn supports(bit_depth: BitDepth) -> bool {
        bit_depth != BitDepth::Eight
    }

    #[inline(always)]
    fn from_clamped(value: i32) -> u16 {
        debug_assert!((0..=u16::MAX as i32).contains(&value));
        value as u16
    }

    #[inline(always)]
    fn to_compound(value: i32) -> u16 {
        let value = value + COMPOUND_OFFSET;
        debug_assert!((0..=u16::MAX as i32).contains(&value));
        value as u16
    }

    #[inline(always)]
    fn from_compound(value: u16) -> i32 {
        value as i32 - COMPOUND_OFFSET
    }
}
