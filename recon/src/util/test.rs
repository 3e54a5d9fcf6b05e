// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use num_traits::Num;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

use crate::image::Pixel;

pub fn abs_delta<T: Num + std::cmp::PartialOrd>(left_val: T, right_val: T) -> T {
    if left_val > right_val {
        left_val - right_val
    } else {
        right_val - left_val
    }
}

/// `|left - right| <= max_error` for two scalars.
macro_rules! assert_almost_eq {
    ($left:expr, $right:expr, $max_error:expr $(,)?) => {
        let (left_val, right_val, max_error) = (&$left, &$right, &$max_error);
        match $crate::util::test::abs_delta(*left_val, *right_val).partial_cmp(max_error) {
            Some(std::cmp::Ordering::Greater) | None => panic!(
                "assertion failed: `(left ≈ right)`\n left: `{:?}`,\n right: `{:?}`,\n max_error: `{:?}`",
                left_val, right_val, max_error
            ),
            _ => {}
        }
    };
}
pub(crate) use assert_almost_eq;

/// Element-wise `|left - right| <= max_error` over two indexable sequences.
macro_rules! assert_all_almost_eq {
    ($left:expr, $right:expr, $max_error:expr $(,)?) => {
        let (left_val, right_val, max_error) = (&$left, &$right, &$max_error);
        if left_val.len() != right_val.len() {
            panic!(
                "assertion failed: `(left ≈ right)`\n left.len(): `{}`,\n right.len(): `{}`",
                left_val.len(),
                right_val.len()
            );
        }
        for index in 0..left_val.len() {
            match $crate::util::test::abs_delta(left_val[index], right_val[index])
                .partial_cmp(max_error)
            {
                Some(std::cmp::Ordering::Greater) | None => panic!(
                    "assertion failed: `(left ≈ right)` at index {}\n left: `{:?}`,\n right: `{:?}`,\n max_error: `{:?}`",
                    index, left_val[index], right_val[index], max_error
                ),
                _ => {}
            }
        }
    };
}
pub(crate) use assert_all_almost_eq;

/// Plane of `stride * rows` random samples in `0..=max_value`.
pub fn random_plane<P: Pixel>(seed: u64, stride: usize, rows: usize, max_value: i32) -> Vec<P> {
    let mut rng = XorShiftRng::seed_from_u64(seed);
    (0..stride * rows)
        .map(|_| P::from_clamped(rng.random_range(0..=max_value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::random_plane;

    #[test]
    fn scalar_within_tolerance() {
        assert_almost_eq!(1.0f64, 1.25, 0.25);
        assert_almost_eq!(40, 37, 3);
    }

    #[test]
    #[should_panic]
    fn scalar_outside_tolerance() {
        assert_almost_eq!(100i32, 96, 3);
    }

    #[test]
    #[should_panic]
    fn scalar_nan_never_matches() {
        assert_almost_eq!(f64::NAN, 0.0, 1.0);
    }

    #[test]
    fn within_tolerance() {
        assert_all_almost_eq!([1.0, 2.5], vec![1.5, 2.0], 0.5);
        assert_all_almost_eq!([1, 2, 3], vec![1, 3, 3], 1);
    }

    #[test]
    #[should_panic]
    fn outside_tolerance() {
        assert_all_almost_eq!([10u32, 20], [10u32, 23], 2);
    }

    #[test]
    #[should_panic]
    fn length_mismatch() {
        assert_all_almost_eq!([1, 2, 3], vec![1, 2], 1);
    }

    #[test]
    fn random_planes_are_seeded_and_bounded() {
        let a = random_plane::<u16>(5, 16, 4, 1023);
        assert_eq!(a.len(), 64);
        assert!(a.iter().all(|&v| v <= 1023));
        assert_eq!(a, random_plane::<u16>(5, 16, 4, 1023));
        assert_ne!(a, random_plane::<u16>(6, 16, 4, 1023));
    }
}
