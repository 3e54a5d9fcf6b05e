// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::{
    fmt::Debug,
    ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign},
};

mod lanes;
mod scalar;

pub use lanes::{I32Lanes, Lanes4Descriptor, Lanes8Descriptor, Lanes16Descriptor, LanesDescriptor};
pub use scalar::ScalarDescriptor;

/// Descriptor used by the dispatching entry points. Eight 32-bit lanes match the
/// widest integer register file commonly available; kernels are written against
/// `SimdDescriptor` so this only changes the tiling width.
pub type PreferredDescriptor = Lanes8Descriptor;

pub trait SimdDescriptor: Sized + Copy + Debug + Send + Sync {
    type I32Vec: I32SimdVec<Descriptor = Self>;

    fn new() -> Option<Self>;

    /// Calls the given closure within the context of this descriptor.
    /// Kernels are instantiated once per descriptor, so everything reachable from
    /// the closure is monomorphized for the lane count of `Self`.
    fn call<R>(self, f: impl FnOnce(Self) -> R) -> R;
}

pub trait I32SimdVec:
    Sized
    + Copy
    + Debug
    + Send
    + Sync
    + Add<Self, Output = Self>
    + Mul<Self, Output = Self>
    + Sub<Self, Output = Self>
    + AddAssign<Self>
    + MulAssign<Self>
    + SubAssign<Self>
{
    type Descriptor: SimdDescriptor;

    const LEN: usize;

    /// Converts v to an array of v.
    fn splat(d: Self::Descriptor, v: i32) -> Self;

    fn zero(d: Self::Descriptor) -> Self;

    // Requires `mem.len() >= Self::LEN` or it will panic.
    fn load(d: Self::Descriptor, mem: &[i32]) -> Self;

    /// Widening load of `Self::LEN` samples of a narrower integer type.
    // Requires `mem.len() >= Self::LEN` or it will panic.
    fn load_from<T: Copy + Into<i32>>(d: Self::Descriptor, mem: &[T]) -> Self;

    // Requires `mem.len() >= Self::LEN` or it will panic.
    fn store(&self, mem: &mut [i32]);

    /// Narrowing store: every lane goes through `f` before being written.
    // Requires `mem.len() >= Self::LEN` or it will panic.
    fn store_with<T>(&self, mem: &mut [T], f: impl Fn(i32) -> T);

    fn mul_add(self, mul: Self, add: Self) -> Self;

    fn min(self, other: Self) -> Self;

    fn max(self, other: Self) -> Self;

    fn clamp(self, lo: Self, hi: Self) -> Self {
        self.max(lo).min(hi)
    }

    /// Arithmetic shift right.
    fn shr(self, amount: u32) -> Self;

    fn shl(self, amount: u32) -> Self;

    /// `(x + (1 << (amount - 1))) >> amount`, the identity when `amount == 0`.
    fn shr_round(self, amount: u32) -> Self;
}

/// Rounding right shift on a single value, matching `I32SimdVec::shr_round`.
#[inline(always)]
pub const fn shr_round(value: i32, amount: u32) -> i32 {
    if amount == 0 {
        value
    } else {
        (value + (1 << (amount - 1))) >> amount
    }
}

#[macro_export]
macro_rules! test_all_instruction_sets {
    (
        $name:ident
    ) => {
        paste::paste! {
            #[test]
            fn [<$name _scalar>]() {
                use $crate::SimdDescriptor;
                $name($crate::ScalarDescriptor::new().unwrap())
            }

            #[test]
            fn [<$name _lanes4>]() {
                use $crate::SimdDescriptor;
                $name($crate::Lanes4Descriptor::new().unwrap())
            }

            #[test]
            fn [<$name _lanes8>]() {
                use $crate::SimdDescriptor;
                $name($crate::Lanes8Descriptor::new().unwrap())
            }

            #[test]
            fn [<$name _lanes16>]() {
                use $crate::SimdDescriptor;
                $name($crate::Lanes16Descriptor::new().unwrap())
            }
        }
    };
}

#[macro_export]
macro_rules! bench_all_instruction_sets {
    (
        $name:ident,
        $criterion:ident
    ) => {
        use $crate::SimdDescriptor;
        $name(
            $crate::ScalarDescriptor::new().unwrap(),
            $criterion,
            "scalar",
        );
        $name(
            $crate::Lanes4Descriptor::new().unwrap(),
            $criterion,
            "lanes4",
        );
        $name(
            $crate::Lanes8Descriptor::new().unwrap(),
            $criterion,
            "lanes8",
        );
        $name(
            $crate::Lanes16Descriptor::new().unwrap(),
            $criterion,
            "lanes16",
        );
    };
}
