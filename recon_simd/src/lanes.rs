// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};

use super::{I32SimdVec, SimdDescriptor};

/// Portable descriptor operating on `N` 32-bit lanes held in a plain array.
/// The per-lane loops have a fixed trip count, which is what lets the compiler
/// lower them to whatever vector width the target offers.
#[derive(Clone, Copy, Debug)]
pub struct LanesDescriptor<const N: usize>;

pub type Lanes4Descriptor = LanesDescriptor<4>;
pub type Lanes8Descriptor = LanesDescriptor<8>;
pub type Lanes16Descriptor = LanesDescriptor<16>;

impl<const N: usize> SimdDescriptor for LanesDescriptor<N> {
    type I32Vec = I32Lanes<N>;

    fn new() -> Option<Self> {
        if N.is_power_of_two() && N <= 64 {
            Some(Self)
        } else {
            None
        }
    }

    #[inline(always)]
    fn call<R>(self, f: impl FnOnce(Self) -> R) -> R {
        f(self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct I32Lanes<const N: usize>([i32; N]);

impl<const N: usize> I32Lanes<N> {
    #[inline(always)]
    fn map(self, f: impl Fn(i32) -> i32) -> Self {
        Self(self.0.map(f))
    }

    #[inline(always)]
    fn zip_with(self, rhs: Self, f: impl Fn(i32, i32) -> i32) -> Self {
        Self(std::array::from_fn(|i| f(self.0[i], rhs.0[i])))
    }
}

macro_rules! impl_lanes_op {
    ($trait:ident, $fn:ident, $assign_trait:ident, $assign_fn:ident, $op:tt) => {
        impl<const N: usize> $trait<I32Lanes<N>> for I32Lanes<N> {
            type Output = I32Lanes<N>;

            #[inline(always)]
            fn $fn(self, rhs: I32Lanes<N>) -> I32Lanes<N> {
                self.zip_with(rhs, |a, b| a $op b)
            }
        }

        impl<const N: usize> $assign_trait<I32Lanes<N>> for I32Lanes<N> {
            #[inline(always)]
            fn $assign_fn(&mut self, rhs: I32Lanes<N>) {
                *self = *self $op rhs;
            }
        }
    };
}

impl_lanes_op!(Add, add, AddAssign, add_assign, +);
impl_lanes_op!(Sub, sub, SubAssign, sub_assign, -);
impl_lanes_op!(Mul, mul, MulAssign, mul_assign, *);

impl<const N: usize> I32SimdVec for I32Lanes<N> {
    type Descriptor = LanesDescriptor<N>;

    const LEN: usize = N;

    #[inline(always)]
    fn splat(_d: Self::Descriptor, v: i32) -> Self {
        Self([v; N])
    }

    #[inline(always)]
    fn zero(_d: Self::Descriptor) -> Self {
        Self([0; N])
    }

    #[inline(always)]
    fn load(_d: Self::Descriptor, mem: &[i32]) -> Self {
        let mut lanes = [0; N];
        lanes.copy_from_slice(&mem[..N]);
        Self(lanes)
    }

    #[inline(always)]
    fn load_from<T: Copy + Into<i32>>(_d: Self::Descriptor, mem: &[T]) -> Self {
        let mem = &mem[..N];
        Self(std::array::from_fn(|i| mem[i].into()))
    }

    #[inline(always)]
    fn store(&self, mem: &mut [i32]) {
        mem[..N].copy_from_slice(&self.0);
    }

    #[inline(always)]
    fn store_with<T>(&self, mem: &mut [T], f: impl Fn(i32) -> T) {
        for (out, &lane) in mem[..N].iter_mut().zip(self.0.iter()) {
            *out = f(lane);
        }
    }

    #[inline(always)]
    fn mul_add(self, mul: Self, add: Self) -> Self {
        self * mul + add
    }

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        self.zip_with(other, Ord::min)
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        self.zip_with(other, Ord::max)
    }

    #[inline(always)]
    fn shr(self, amount: u32) -> Self {
        self.map(|v| v >> amount)
    }

    #[inline(always)]
    fn shl(self, amount: u32) -> Self {
        self.map(|v| v << amount)
    }

    #[inline(always)]
    fn shr_round(self, amount: u32) -> Self {
        self.map(|v| crate::shr_round(v, amount))
    }
}
