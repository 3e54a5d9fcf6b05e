// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Sub-pixel motion compensated prediction: separable interpolation of a
//! reference block at a 1/16 sample offset, producing either final pixels or
//! the higher precision intermediate used by compound prediction.

use recon_simd::{PreferredDescriptor, ScalarDescriptor, SimdDescriptor};

use crate::{
    MAX_SUPERBLOCK_SIZE_IN_PIXELS,
    bit_depth::{BitDepth, FILTER_BITS, INTER_ROUND_BITS_COMPOUND_VERTICAL},
    image::{Pixel, ReferenceBlock},
    util::tracing_wrappers::*,
};

mod filters;
mod intermediate;
mod kernels;
pub mod reference;

pub use filters::{
    FilterTaps, HALF_FILTER_UNITY, HALF_SUB_PIXEL_FILTERS, InterpolationFilter, NUM_FILTERS,
    NUM_PHASES, SUB_PIXEL_TAPS, SubPixelFilter,
};
pub use intermediate::IntermediateBuffer;
use kernels::{IntermediateRows, ReferenceRows, Rounding};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConvolveParams {
    pub bit_depth: BitDepth,
    pub horizontal_filter: InterpolationFilter,
    pub vertical_filter: InterpolationFilter,
    /// Horizontal sub-sample offset in 1/16 sample units, `0..16`.
    pub horizontal_phase: u8,
    /// Vertical sub-sample offset in 1/16 sample units, `0..16`.
    pub vertical_phase: u8,
}

/// Which axes need filtering. A zero phase makes the filter on that axis the
/// identity, so that pass is skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConvolvePath {
    Copy,
    Horizontal,
    Vertical,
    TwoD,
}

impl ConvolvePath {
    pub fn select(horizontal_phase: u8, vertical_phase: u8) -> ConvolvePath {
        match (horizontal_phase != 0, vertical_phase != 0) {
            (false, false) => ConvolvePath::Copy,
            (true, false) => ConvolvePath::Horizontal,
            (false, true) => ConvolvePath::Vertical,
            (true, true) => ConvolvePath::TwoD,
        }
    }
}

/// Destination of a prediction.
#[derive(Debug)]
pub enum PredictionMut<'a, P: Pixel> {
    /// Final single reference prediction, clamped to the pixel range.
    Pixels { data: &'a mut [P], stride: usize },
    /// Unclipped prediction awaiting blending with a second one. Always densely
    /// packed: its stride is the block width.
    Compound(&'a mut [P::Compound]),
}

/// Final rounding of each filtering path for one kind of destination.
struct OutputRounding {
    horizontal: Rounding,
    vertical: Rounding,
    two_d_horizontal: Rounding,
    two_d_vertical: Rounding,
}

impl OutputRounding {
    // Shifts are one less than the bitstream ones since the filters are stored halved.
    fn new(bit_depth: BitDepth, compound: bool) -> OutputRounding {
        let round_horizontal = bit_depth.inter_round_bits_horizontal();
        let two_d_horizontal = Rounding::unclamped(round_horizontal - 1);
        if compound {
            return OutputRounding {
                horizontal: two_d_horizontal,
                vertical: two_d_horizontal,
                two_d_horizontal,
                two_d_vertical: Rounding::unclamped(INTER_ROUND_BITS_COMPOUND_VERTICAL - 1),
            };
        }
        let max = bit_depth.max_pixel_value();
        OutputRounding {
            // Both roundings of a 2D pass with an identity vertical filter, as a
            // single shift. Exact since nothing is clamped in between.
            horizontal: Rounding::clamped(FILTER_BITS - 1, max)
                .with_bias(1 << (round_horizontal - 2)),
            vertical: Rounding::clamped(FILTER_BITS - 1, max),
            two_d_horizontal,
            two_d_vertical: Rounding::clamped(bit_depth.inter_round_bits_vertical() - 1, max),
        }
    }
}

/// Predicts the block covered by `reference` with the preferred vector width.
///
/// Panics if `P` cannot hold `params.bit_depth` samples, if a phase is not below
/// 16, if the block is larger than a superblock, or if `prediction` is too small
/// for the block. Compound predictions additionally require a block of at
/// least 4x4.
pub fn convolve<P: Pixel>(
    params: &ConvolveParams,
    reference: &ReferenceBlock<P>,
    scratch: &mut IntermediateBuffer,
    prediction: PredictionMut<'_, P>,
) {
    match PreferredDescriptor::new() {
        Some(d) => d.call(|d| convolve_with(d, params, reference, scratch, prediction)),
        None => convolve_with(ScalarDescriptor, params, reference, scratch, prediction),
    }
}

/// Same as [`convolve`], with an explicit vector width.
pub fn convolve_with<D: SimdDescriptor, P: Pixel>(
    d: D,
    params: &ConvolveParams,
    reference: &ReferenceBlock<P>,
    scratch: &mut IntermediateBuffer,
    prediction: PredictionMut<'_, P>,
) {
    let (width, height) = reference.size();
    let bit_depth = params.bit_depth;
    assert!(
        P::supports(bit_depth),
        "{bit_depth:?} samples do not fit in {}",
        std::any::type_name::<P>()
    );
    assert!(width <= MAX_SUPERBLOCK_SIZE_IN_PIXELS && height <= MAX_SUPERBLOCK_SIZE_IN_PIXELS);
    assert!((params.horizontal_phase as usize) < NUM_PHASES);
    assert!((params.vertical_phase as usize) < NUM_PHASES);

    let path = ConvolvePath::select(params.horizontal_phase, params.vertical_phase);
    trace!(?path, width, height, "convolve");

    match (path, prediction) {
        (ConvolvePath::Copy, PredictionMut::Pixels { data, stride }) => {
            check_pixel_destination(width, height, data.len(), stride);
            kernels::copy_block(reference, data, stride);
        }
        (ConvolvePath::Copy, PredictionMut::Compound(data)) => {
            check_compound_destination(width, height, data.len());
            kernels::copy_block_compound(d, reference, bit_depth.compound_copy_shift(), data);
        }
        (path, PredictionMut::Pixels { data, stride }) => {
            check_pixel_destination(width, height, data.len(), stride);
            filter_block(
                d,
                params,
                path,
                reference,
                scratch,
                &OutputRounding::new(bit_depth, false),
                data,
                stride,
                P::from_clamped,
            );
        }
        (path, PredictionMut::Compound(data)) => {
            check_compound_destination(width, height, data.len());
            filter_block(
                d,
                params,
                path,
                reference,
                scratch,
                &OutputRounding::new(bit_depth, true),
                data,
                width,
                P::to_compound,
            );
        }
    }
}

fn check_pixel_destination(width: usize, height: usize, len: usize, stride: usize) {
    assert!(stride >= width, "stride {stride} below block width {width}");
    assert!(
        len >= height.saturating_sub(1) * stride + width,
        "destination of {len} samples too small for {width}x{height} with stride {stride}"
    );
}

fn check_compound_destination(width: usize, height: usize, len: usize) {
    assert!(
        width >= 4 && height >= 4,
        "compound prediction of a {width}x{height} block"
    );
    assert!(
        len >= width * height,
        "compound destination of {len} samples too small for {width}x{height}"
    );
}

#[allow(clippy::too_many_arguments)]
fn filter_block<D: SimdDescriptor, P: Pixel, T>(
    d: D,
    params: &ConvolveParams,
    path: ConvolvePath,
    reference: &ReferenceBlock<P>,
    scratch: &mut IntermediateBuffer,
    rounding: &OutputRounding,
    out: &mut [T],
    out_stride: usize,
    store: impl Fn(i32) -> T + Copy,
) {
    let (width, height) = reference.size();
    let horizontal = SubPixelFilter::new(
        params.horizontal_filter.for_extent(width),
        params.horizontal_phase,
    );
    let vertical = SubPixelFilter::new(
        params.vertical_filter.for_extent(height),
        params.vertical_phase,
    );
    match path {
        ConvolvePath::Copy => unreachable!("copies do not filter"),
        ConvolvePath::Horizontal => kernels::filter_horizontal(
            d,
            reference,
            0,
            height,
            &horizontal,
            rounding.horizontal,
            out,
            out_stride,
            store,
        ),
        ConvolvePath::Vertical => {
            let rows = ReferenceRows {
                block: reference,
                first_row: vertical.num_taps().first_offset(),
            };
            kernels::filter_vertical(
                d,
                &rows,
                width,
                height,
                &vertical,
                rounding.vertical,
                out,
                out_stride,
                store,
            );
        }
        ConvolvePath::TwoD => {
            let intermediate_height = height + vertical.num_taps().count() - 1;
            let intermediate = scratch.block_mut(width, intermediate_height);
            kernels::filter_horizontal(
                d,
                reference,
                vertical.num_taps().first_offset(),
                intermediate_height,
                &horizontal,
                rounding.two_d_horizontal,
                intermediate,
                width,
                |v| v as i16,
            );
            let rows = IntermediateRows {
                data: intermediate,
                stride: width,
            };
            kernels::filter_vertical(
                d,
                &rows,
                width,
                height,
                &vertical,
                rounding.two_d_vertical,
                out,
                out_stride,
                store,
            );
        }
    }
}
