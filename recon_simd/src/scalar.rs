// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use super::{I32SimdVec, SimdDescriptor};

#[derive(Clone, Copy, Debug)]
pub struct ScalarDescriptor;

impl SimdDescriptor for ScalarDescriptor {
    type I32Vec = i32;

    fn new() -> Option<Self> {
        Some(Self)
    }

    fn call<R>(self, f: impl FnOnce(Self) -> R) -> R {
        // No special features needed for scalar implementation
        f(self)
    }
}

impl I32SimdVec for i32 {
    type Descriptor = ScalarDescriptor;

    const LEN: usize = 1;

    #[inline(always)]
    fn splat(_d: Self::Descriptor, v: i32) -> Self {
        v
    }

    #[inline(always)]
    fn zero(_d: Self::Descriptor) -> Self {
        0
    }

    #[inline(always)]
    fn load(_d: Self::Descriptor, mem: &[i32]) -> Self {
        mem[0]
    }

    #[inline(always)]
    fn load_from<T: Copy + Into<i32>>(_d: Self::Descriptor, mem: &[T]) -> Self {
        mem[0].into()
    }

    #[inline(always)]
    fn store(&self, mem: &mut [i32]) {
        mem[0] = *self;
    }

    #[inline(always)]
    fn store_with<T>(&self, mem: &mut [T], f: impl Fn(i32) -> T) {
        mem[0] = f(*self);
    }

    #[inline(always)]
    fn mul_add(self, mul: Self, add: Self) -> Self {
        self * mul + add
    }

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        Ord::min(self, other)
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        Ord::max(self, other)
    }

    #[inline(always)]
    fn shr(self, amount: u32) -> Self {
        self >> amount
    }

    #[inline(always)]
    fn shl(self, amount: u32) -> Self {
        self << amount
    }

    #[inline(always)]
    fn shr_round(self, amount: u32) -> Self {
        crate::shr_round(self, amount)
    }
}
