// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Pixel reconstruction core of an AV1 decoder.
//!
//! Two independent components live here: the sub-pixel interpolation filter
//! used for motion-compensated prediction ([`convolve`]) and the quantizer
//! lookup and quantizer-matrix construction ([`quantizer`]). Both are
//! bit-exact portable reference implementations.

#![deny(unsafe_code)]
pub mod bit_depth;
pub mod convolve;
pub mod error;
pub mod image;
pub mod quantizer;
pub mod util;

pub use bit_depth::BitDepth;
pub use error::{Error, Result};

/// Largest prediction block edge, in pixels.
pub const MAX_SUPERBLOCK_SIZE_IN_PIXELS: usize = 128;
