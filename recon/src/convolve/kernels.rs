// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::ops::Range;

use recon_simd::{I32SimdVec, ScalarDescriptor, SimdDescriptor};

use super::filters::SubPixelFilter;
use crate::image::{Pixel, REFERENCE_BORDER_BEFORE, ReferenceBlock};

/// Rounding applied to a filter sum before it is stored: `sum + bias` is
/// shifted right with rounding, then clamped to `0..=max` if `max` is set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct Rounding {
    bias: i32,
    shift: u32,
    max: Option<i32>,
}

impl Rounding {
    pub(super) const fn unclamped(shift: u32) -> Rounding {
        Rounding {
            bias: 0,
            shift,
            max: None,
        }
    }

    pub(super) const fn clamped(shift: u32, max: i32) -> Rounding {
        Rounding {
            bias: 0,
            shift,
            max: Some(max),
        }
    }

    pub(super) const fn with_bias(self, bias: i32) -> Rounding {
        Rounding { bias, ..self }
    }

    #[inline(always)]
    fn apply<V: I32SimdVec>(self, d: V::Descriptor, sum: V) -> V {
        let rounded = (sum + V::splat(d, self.bias)).shr_round(self.shift);
        match self.max {
            Some(max) => rounded.clamp(V::zero(d), V::splat(d, max)),
            None => rounded,
        }
    }
}

/// Columns handled `D::I32Vec::LEN` at a time, and the remainder handled one by one.
fn split_columns<D: SimdDescriptor>(width: usize) -> (Range<usize>, Range<usize>) {
    let vector_end = width - width % D::I32Vec::LEN;
    (0..vector_end, vector_end..width)
}

/// Rows read by the vertical filter. Row 0 is the row of the first tap of the
/// first output row and every row starts at the block's first column.
pub(super) trait SourceRows {
    type Sample: Copy + Into<i32>;

    fn row(&self, y: usize) -> &[Self::Sample];
}

pub(super) struct ReferenceRows<'a, 'b, P: Pixel> {
    pub block: &'b ReferenceBlock<'a, P>,
    pub first_row: isize,
}

impl<P: Pixel> SourceRows for ReferenceRows<'_, '_, P> {
    type Sample = P;

    #[inline(always)]
    fn row(&self, y: usize) -> &[P] {
        &self.block.row(self.first_row + y as isize)[REFERENCE_BORDER_BEFORE..]
    }
}

pub(super) struct IntermediateRows<'a> {
    pub data: &'a [i16],
    pub stride: usize,
}

impl SourceRows for IntermediateRows<'_> {
    type Sample = i16;

    #[inline(always)]
    fn row(&self, y: usize) -> &[i16] {
        &self.data[y * self.stride..]
    }
}

#[inline(always)]
fn horizontal_columns<V: I32SimdVec, S: Copy + Into<i32>, T>(
    d: V::Descriptor,
    row: &[S],
    taps: &[i32],
    columns: Range<usize>,
    rounding: Rounding,
    out: &mut [T],
    store: impl Fn(i32) -> T + Copy,
) {
    for x in columns.step_by(V::LEN) {
        let mut sum = V::zero(d);
        for (k, &tap) in taps.iter().enumerate() {
            sum = V::load_from(d, &row[x + k..]).mul_add(V::splat(d, tap), sum);
        }
        rounding.apply(d, sum).store_with(&mut out[x..], store);
    }
}

/// Filters `rows` rows of `block` horizontally, starting at row `first_row`
/// relative to the block. Output row `y` starts at `out[y * out_stride]`.
#[allow(clippy::too_many_arguments)]
pub(super) fn filter_horizontal<D: SimdDescriptor, P: Pixel, T>(
    d: D,
    block: &ReferenceBlock<P>,
    first_row: isize,
    rows: usize,
    filter: &SubPixelFilter,
    rounding: Rounding,
    out: &mut [T],
    out_stride: usize,
    store: impl Fn(i32) -> T + Copy,
) {
    let (vector, tail) = split_columns::<D>(block.size().0);
    let first_sample = filter.num_taps().first_index();
    let taps = filter.taps();
    for (y, out_row) in out.chunks_mut(out_stride).take(rows).enumerate() {
        let row = &block.row(first_row + y as isize)[first_sample..];
        horizontal_columns::<D::I32Vec, _, _>(
            d,
            row,
            taps,
            vector.clone(),
            rounding,
            out_row,
            store,
        );
        horizontal_columns::<i32, _, _>(
            ScalarDescriptor,
            row,
            taps,
            tail.clone(),
            rounding,
            out_row,
            store,
        );
    }
}

#[inline(always)]
#[allow(clippy::too_many_arguments)]
fn vertical_columns<V: I32SimdVec, R: SourceRows, T>(
    d: V::Descriptor,
    source: &R,
    y: usize,
    taps: &[i32],
    columns: Range<usize>,
    rounding: Rounding,
    out: &mut [T],
    store: impl Fn(i32) -> T + Copy,
) {
    for x in columns.step_by(V::LEN) {
        let mut sum = V::zero(d);
        for (k, &tap) in taps.iter().enumerate() {
            sum = V::load_from(d, &source.row(y + k)[x..]).mul_add(V::splat(d, tap), sum);
        }
        rounding.apply(d, sum).store_with(&mut out[x..], store);
    }
}

/// Filters `width x rows` samples vertically. Output row `y` reads source rows
/// `y..y + taps` and starts at `out[y * out_stride]`.
#[allow(clippy::too_many_arguments)]
pub(super) fn filter_vertical<D: SimdDescriptor, R: SourceRows, T>(
    d: D,
    source: &R,
    width: usize,
    rows: usize,
    filter: &SubPixelFilter,
    rounding: Rounding,
    out: &mut [T],
    out_stride: usize,
    store: impl Fn(i32) -> T + Copy,
) {
    let (vector, tail) = split_columns::<D>(width);
    let taps = filter.taps();
    for (y, out_row) in out.chunks_mut(out_stride).take(rows).enumerate() {
        vertical_columns::<D::I32Vec, _, _>(
            d,
            source,
            y,
            taps,
            vector.clone(),
            rounding,
            out_row,
            store,
        );
        vertical_columns::<i32, _, _>(
            ScalarDescriptor,
            source,
            y,
            taps,
            tail.clone(),
            rounding,
            out_row,
            store,
        );
    }
}

pub(super) fn copy_block<P: Pixel>(block: &ReferenceBlock<P>, out: &mut [P], out_stride: usize) {
    let (width, height) = block.size();
    for (y, out_row) in out.chunks_mut(out_stride).take(height).enumerate() {
        let row = &block.row(y as isize)[REFERENCE_BORDER_BEFORE..];
        out_row[..width].copy_from_slice(&row[..width]);
    }
}

#[inline(always)]
fn shift_columns<V: I32SimdVec, P: Pixel>(
    d: V::Descriptor,
    row: &[P],
    columns: Range<usize>,
    shift: u32,
    out: &mut [P::Compound],
) {
    for x in columns.step_by(V::LEN) {
        V::load_from(d, &row[x..])
            .shl(shift)
            .store_with(&mut out[x..], P::to_compound);
    }
}

/// Unfiltered compound prediction: every sample scaled up to the precision of
/// the filtered compound paths. `out` is densely packed.
pub(super) fn copy_block_compound<D: SimdDescriptor, P: Pixel>(
    d: D,
    block: &ReferenceBlock<P>,
    shift: u32,
    out: &mut [P::Compound],
) {
    let (width, height) = block.size();
    let (vector, tail) = split_columns::<D>(width);
    for (y, out_row) in out.chunks_mut(width).take(height).enumerate() {
        let row = &block.row(y as isize)[REFERENCE_BORDER_BEFORE..];
        shift_columns::<D::I32Vec, P>(d, row, vector.clone(), shift, out_row);
        shift_columns::<i32, P>(ScalarDescriptor, row, tail.clone(), shift, out_row);
    }
}
