// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use super::filters::SUB_PIXEL_TAPS;
use crate::{MAX_SUPERBLOCK_SIZE_IN_PIXELS, error::Result, util::try_filled_vec};

/// Scratch storage for the horizontal pass of 2D filtering. One buffer per
/// decoding thread; it is reused across blocks and never shared.
#[derive(Debug)]
pub struct IntermediateBuffer {
    data: Vec<i16>,
}

impl IntermediateBuffer {
    /// Largest block plus the extra rows read by the widest vertical filter.
    pub const LEN: usize = MAX_SUPERBLOCK_SIZE_IN_PIXELS
        * (MAX_SUPERBLOCK_SIZE_IN_PIXELS + SUB_PIXEL_TAPS - 1);

    pub fn new() -> Result<IntermediateBuffer> {
        Ok(IntermediateBuffer {
            data: try_filled_vec(Self::LEN, 0)?,
        })
    }

    /// Densely packed `width x rows` region at the start of the buffer.
    pub(super) fn block_mut(&mut self, width: usize, rows: usize) -> &mut [i16] {
        &mut self.data[..width * rows]
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;

    #[test]
    fn fits_largest_block() {
        let mut buffer = IntermediateBuffer::new().unwrap();
        let block = buffer.block_mut(128, 128 + 7);
        assert_eq!(block.len(), IntermediateBuffer::LEN);
        assert!(block.iter().all(|&v| v == 0));
    }
}
