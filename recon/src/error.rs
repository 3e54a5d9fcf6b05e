// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::collections::TryReserveError;

use thiserror::Error;


#[derive(Error, Debug)]
pub enum Error {
    #[error("Out of memory: {0}")]
    OutOfMemory(#[from] TryReserveError),
    #[error("Invalid bit depth: {0}, expected 8, 10 or 12")]
    InvalidBitDepth(u32),
    #[error("Quantizer lookup table decreases at index {0}")]
    NonMonotonicQuantizerLookup(usize),
    #[error("Invalid enum value {0} for {1}")]
    InvalidEnum(u32, String),
    #[error("Invalid quantizer matrix source: expected {expected} bytes, found {found}")]
    InvalidQuantizerMatrixSource { expected: usize, found: usize },
    #[error(
        "Reference block {0}x{1}+{2}+{3} with filter border does not fit in a buffer of {4} samples with stride {5}"
    )]
    ReferenceOutOfBounds(usize, usize, usize, usize, usize, usize),
    // Generic arithmetic overflow. Prefer using other errors if possible.
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
}

pub type Result<T> = std::result::Result<T, Error>;
