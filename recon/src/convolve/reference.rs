// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Direct model of inter prediction filtering: always two passes over the full
//! 8-tap, 7-bit filters, each pass evaluated in `f64` and rounded half up.
//! Slow, but with none of the shortcuts taken by the kernels in the parent
//! module, which makes it the yardstick for them.

use super::{ConvolveParams, InterpolationFilter, filters::HALF_SUB_PIXEL_FILTERS};
use crate::{
    bit_depth::INTER_ROUND_BITS_COMPOUND_VERTICAL,
    image::{Pixel, ReferenceBlock},
};

fn round_shift(value: f64, bits: u32) -> f64 {
    (value / (1u32 << bits) as f64 + 0.5).floor()
}

fn full_precision_taps(
    filter: InterpolationFilter,
    phase: u8,
) -> impl Iterator<Item = (isize, f64)> {
    HALF_SUB_PIXEL_FILTERS[filter as usize][phase as usize]
        .iter()
        .enumerate()
        .map(|(k, &tap)| (k as isize - 3, tap as f64 * 2.0))
}

/// Prediction for `reference` as a densely packed `width * height` block. For
/// compound predictions the values are those of [`Pixel::from_compound`].
pub fn reference_convolve<P: Pixel>(
    params: &ConvolveParams,
    reference: &ReferenceBlock<P>,
    compound: bool,
) -> Vec<i32> {
    let (width, height) = reference.size();
    let bit_depth = params.bit_depth;
    let horizontal = params.horizontal_filter.for_extent(width);
    let vertical = params.vertical_filter.for_extent(height);
    let round_vertical = if compound {
        INTER_ROUND_BITS_COMPOUND_VERTICAL
    } else {
        bit_depth.inter_round_bits_vertical()
    };

    // Rows -3..height + 5 cover every vertical tap.
    let intermediate_rows = height + 7;
    let mut intermediate = vec![0.0; width * intermediate_rows];
    for r in 0..intermediate_rows {
        let y = r as isize - 3;
        for x in 0..width {
            let sum: f64 = full_precision_taps(horizontal, params.horizontal_phase)
                .map(|(dx, tap)| {
                    let sample: i32 = reference.sample(x as isize + dx, y).into();
                    tap * sample as f64
                })
                .sum();
            intermediate[r * width + x] =
                round_shift(sum, bit_depth.inter_round_bits_horizontal());
        }
    }

    let mut out = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let sum: f64 = full_precision_taps(vertical, params.vertical_phase)
                .map(|(dy, tap)| tap * intermediate[((y as isize + 3 + dy) as usize) * width + x])
                .sum();
            let value = round_shift(sum, round_vertical);
            let value = if compound {
                value
            } else {
                value.clamp(0.0, bit_depth.max_pixel_value() as f64)
            };
            out.push(value as i32);
        }
    }
    out
}
