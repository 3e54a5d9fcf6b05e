// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::collections::TryReserveError;

pub trait TryWithCapacity {
    type Output;
    type Error;
    fn try_with_capacity(capacity: usize) -> Result<Self::Output, Self::Error>;
}

impl<T> TryWithCapacity for Vec<T> {
    type Output = Vec<T>;
    type Error = TryReserveError;

    fn try_with_capacity(capacity: usize) -> Result<Self::Output, Self::Error> {
        let mut vec = Vec::new();
        vec.try_reserve_exact(capacity)?;
        Ok(vec)
    }
}

pub fn try_with_capacity<T>(capacity: usize) -> Result<Vec<T>, TryReserveError> {
    <Vec<T> as TryWithCapacity>::try_with_capacity(capacity)
}

/// Allocates a vector of `len` copies of `value`, reporting allocation failure
/// instead of aborting.
pub fn try_filled_vec<T: Clone>(len: usize, value: T) -> Result<Vec<T>, TryReserveError> {
    let mut vec = try_with_capacity(len)?;
    vec.resize(len, value);
    Ok(vec)
}
