// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::error::{Error, Result};

/// Precision of the full-scale interpolation filters: taps sum to `1 << FILTER_BITS`.
pub const FILTER_BITS: u32 = 7;

pub const INTER_ROUND_BITS_HORIZONTAL: u32 = 3;
pub const INTER_ROUND_BITS_HORIZONTAL_12BPP: u32 = 5;
pub const INTER_ROUND_BITS_VERTICAL: u32 = 11;
pub const INTER_ROUND_BITS_VERTICAL_12BPP: u32 = 9;
pub const INTER_ROUND_BITS_COMPOUND_VERTICAL: u32 = 7;

/// Sample precision of a sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitDepth {
    Eight,
    Ten,
    Twelve,
}

impl BitDepth {
    pub const VALUES: [BitDepth; 3] = [BitDepth::Eight, BitDepth::Ten, BitDepth::Twelve];

    pub fn from_bits(bits: u32) -> Result<BitDepth> {
        match bits {
            8 => Ok(BitDepth::Eight),
            10 => Ok(BitDepth::Ten),
            12 => Ok(BitDepth::Twelve),
            _ => Err(Error::InvalidBitDepth(bits)),
        }
    }

    pub const fn bits(self) -> u32 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Ten => 10,
            BitDepth::Twelve => 12,
        }
    }

    pub const fn max_pixel_value(self) -> i32 {
        (1 << self.bits()) - 1
    }

    /// Rounding applied to the output of the horizontal pass.
    pub const fn inter_round_bits_horizontal(self) -> u32 {
        match self {
            BitDepth::Twelve => INTER_ROUND_BITS_HORIZONTAL_12BPP,
            _ => INTER_ROUND_BITS_HORIZONTAL,
        }
    }

    /// Rounding applied by the vertical pass of a single-reference 2D filter.
    pub const fn inter_round_bits_vertical(self) -> u32 {
        match self {
            BitDepth::Twelve => INTER_ROUND_BITS_VERTICAL_12BPP,
            _ => INTER_ROUND_BITS_VERTICAL,
        }
    }

    /// Left shift turning a pixel into a compound prediction sample; every
    /// compound path produces samples at this scale.
    pub const fn compound_copy_shift(self) -> u32 {
        2 * FILTER_BITS - self.inter_round_bits_horizontal() - INTER_ROUND_BITS_COMPOUND_VERTICAL
    }
}

impl TryFrom<u32> for BitDepth {
    type Error = Error;

    fn try_from(bits: u32) -> Result<BitDepth> {
        BitDepth::from_bits(bits)
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;

    #[test]
    fn round_bits_total_to_double_filter_precision() {
        for depth in [BitDepth::Eight, BitDepth::Ten, BitDepth::Twelve] {
            assert_eq!(
                depth.inter_round_bits_horizontal() + depth.inter_round_bits_vertical(),
                2 * FILTER_BITS
            );
        }
    }

    #[test]
    fn compound_shift() {
        assert_eq!(BitDepth::Eight.compound_copy_shift(), 4);
        assert_eq!(BitDepth::Ten.compound_copy_shift(), 4);
        assert_eq!(BitDepth::Twelve.compound_copy_shift(), 2);
    }

    #[test]
    fn from_bits() {
        assert_eq!(BitDepth::from_bits(10).unwrap(), BitDepth::Ten);
        assert_eq!(BitDepth::try_from(12).unwrap().max_pixel_value(), 4095);
        assert!(matches!(BitDepth::from_bits(9), Err(Error::InvalidBitDepth(9))));
    }
}
