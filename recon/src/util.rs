// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

#[cfg(test)]
pub mod test;
pub mod tracing_wrappers;
mod vec_helpers;

pub use vec_helpers::*;

/// Clamps `value` into `[low, high]`.
#[inline(always)]
pub fn clip3(value: i32, low: i32, high: i32) -> i32 {
    value.clamp(low, high)
}
