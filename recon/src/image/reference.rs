// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::error::{Error, Result};

use super::Pixel;

/// Samples an 8-tap filter reads above/left of the sample it produces.
pub const REFERENCE_BORDER_BEFORE: usize = 3;
/// Samples an 8-tap filter reads below/right of the sample it produces.
pub const REFERENCE_BORDER_AFTER: usize = 4;

/// Read-only view of the reference samples a prediction block is filtered
/// from. Construction checks that the block plus the widest filter footprint
/// lies inside the backing buffer, so the kernels can index without further
/// checks beyond the slice bounds.
#[derive(Clone, Copy, Debug)]
pub struct ReferenceBlock<'a, P: Pixel> {
    data: &'a [P],
    stride: usize,
    // Index in `data` of the top-left sample of the block.
    origin: usize,
    // width, height
    size: (usize, usize),
}

impl<'a, P: Pixel> ReferenceBlock<'a, P> {
    /// `position` is the (x, y) of the block's top-left sample in a plane of
    /// `stride` samples per row stored in `data`.
    pub fn new(
        data: &'a [P],
        stride: usize,
        position: (usize, usize),
        size: (usize, usize),
    ) -> Result<Self> {
        let (x, y) = position;
        let (width, height) = size;
        let out_of_bounds = || Error::ReferenceOutOfBounds(width, height, x, y, data.len(), stride);
        if x < REFERENCE_BORDER_BEFORE || y < REFERENCE_BORDER_BEFORE || width == 0 || height == 0 {
            return Err(out_of_bounds());
        }
        let right = x
            .checked_add(width)
            .and_then(|v| v.checked_add(REFERENCE_BORDER_AFTER))
            .ok_or(Error::ArithmeticOverflow)?;
        if right > stride {
            return Err(out_of_bounds());
        }
        let last_row = y
            .checked_add(height)
            .and_then(|v| v.checked_add(REFERENCE_BORDER_AFTER - 1))
            .ok_or(Error::ArithmeticOverflow)?;
        let end = last_row
            .checked_mul(stride)
            .and_then(|v| v.checked_add(right))
            .ok_or(Error::ArithmeticOverflow)?;
        if end > data.len() {
            return Err(out_of_bounds());
        }
        Ok(ReferenceBlock {
            data,
            stride,
            origin: y * stride + x,
            size,
        })
    }

    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Row `dy` relative to the block's first row. The returned slice starts
    /// `REFERENCE_BORDER_BEFORE` samples left of the block and covers the full
    /// horizontal filter footprint.
    #[inline(always)]
    pub(crate) fn row(&self, dy: isize) -> &'a [P] {
        debug_assert!(
            dy >= -(REFERENCE_BORDER_BEFORE as isize)
                && dy < (self.size.1 + REFERENCE_BORDER_AFTER) as isize
        );
        let start = (self.origin - REFERENCE_BORDER_BEFORE) as isize + dy * self.stride as isize;
        let start = start as usize;
        &self.data[start..start + self.size.0 + REFERENCE_BORDER_BEFORE + REFERENCE_BORDER_AFTER]
    }

    /// Single sample at (dx, dy) relative to the block's top-left sample.
    #[inline(always)]
    pub fn sample(&self, dx: isize, dy: isize) -> P {
        self.row(dy)[(dx + REFERENCE_BORDER_BEFORE as isize) as usize]
    }
}
