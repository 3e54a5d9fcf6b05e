// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use super::{
    PlaneType, QuantizerParameters,
    transform_size::{NUM_TRANSFORM_SIZES, TransformSize},
};
use crate::{
    error::{Error, Result},
    quantizer::Plane,
    util::{tracing_wrappers::*, try_filled_vec, try_with_capacity},
};

pub const NUM_QUANTIZER_LEVELS: usize = 15;
pub const NUM_PLANE_TYPES: usize = 2;

/// Tables every (level, plane type) pair is built from. Squares are stored as
/// their lower triangle, row by row; rectangles are stored row-major with
/// width below height. Variants are in packed storage order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceTable {
    Triangle4x4,
    Triangle8x8,
    Triangle32x32,
    Rect4x8,
    Rect4x16,
    Rect8x16,
    Rect8x32,
    Rect16x32,
}

impl SourceTable {
    pub const VALUES: [SourceTable; 8] = [
        SourceTable::Triangle4x4,
        SourceTable::Triangle8x8,
        SourceTable::Triangle32x32,
        SourceTable::Rect4x8,
        SourceTable::Rect4x16,
        SourceTable::Rect8x16,
        SourceTable::Rect8x32,
        SourceTable::Rect16x32,
    ];

    pub const fn width(self) -> usize {
        match self {
            SourceTable::Triangle4x4 | SourceTable::Rect4x8 | SourceTable::Rect4x16 => 4,
            SourceTable::Triangle8x8 | SourceTable::Rect8x16 | SourceTable::Rect8x32 => 8,
            SourceTable::Rect16x32 => 16,
            SourceTable::Triangle32x32 => 32,
        }
    }

    pub const fn height(self) -> usize {
        match self {
            SourceTable::Triangle4x4 => 4,
            SourceTable::Triangle8x8 | SourceTable::Rect4x8 => 8,
            SourceTable::Rect4x16 | SourceTable::Rect8x16 => 16,
            SourceTable::Triangle32x32 | SourceTable::Rect8x32 | SourceTable::Rect16x32 => 32,
        }
    }

    pub const fn is_triangle(self) -> bool {
        matches!(
            self,
            SourceTable::Triangle4x4 | SourceTable::Triangle8x8 | SourceTable::Triangle32x32
        )
    }

    pub const fn size(self) -> usize {
        if self.is_triangle() {
            self.width() * (self.width() + 1) / 2
        } else {
            self.width() * self.height()
        }
    }

    const fn offset(self) -> usize {
        let mut offset = 0;
        let mut i = 0;
        while i < self as usize {
            offset += SourceTable::VALUES[i].size();
            i += 1;
        }
        offset
    }
}

/// Bytes of source tables for one (level, plane type) pair.
pub const SOURCE_BYTES_PER_PLANE_TYPE: usize = SourceTable::Rect16x32.offset()
    + SourceTable::Rect16x32.size();
/// Size of the packed form accepted by [`QuantizerMatrixSources::from_packed`].
pub const PACKED_SOURCE_BYTES: usize =
    NUM_QUANTIZER_LEVELS * NUM_PLANE_TYPES * SOURCE_BYTES_PER_PLANE_TYPE;

/// The canonical quantizer matrix tables, stored in level, plane type, then
/// [`SourceTable`] order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuantizerMatrixSources {
    data: Vec<u8>,
}

impl QuantizerMatrixSources {
    /// All-zero sources, to be filled with [`set_table`](Self::set_table).
    pub fn new() -> Result<QuantizerMatrixSources> {
        Ok(QuantizerMatrixSources {
            data: try_filled_vec(PACKED_SOURCE_BYTES, 0)?,
        })
    }

    pub fn from_packed(packed: &[u8]) -> Result<QuantizerMatrixSources> {
        if packed.len() != PACKED_SOURCE_BYTES {
            return Err(Error::InvalidQuantizerMatrixSource {
                expected: PACKED_SOURCE_BYTES,
                found: packed.len(),
            });
        }
        let mut data = try_with_capacity(PACKED_SOURCE_BYTES)?;
        data.extend_from_slice(packed);
        Ok(QuantizerMatrixSources { data })
    }

    fn range(level: usize, plane_type: PlaneType, table: SourceTable) -> std::ops::Range<usize> {
        assert!(level < NUM_QUANTIZER_LEVELS);
        let start = (level * NUM_PLANE_TYPES + plane_type as usize) * SOURCE_BYTES_PER_PLANE_TYPE
            + table.offset();
        start..start + table.size()
    }

    pub fn set_table(
        &mut self,
        level: usize,
        plane_type: PlaneType,
        table: SourceTable,
        values: &[u8],
    ) -> Result<()> {
        if level >= NUM_QUANTIZER_LEVELS {
            return Err(Error::InvalidEnum(
                level as u32,
                "quantizer matrix level".to_string(),
            ));
        }
        if values.len() != table.size() {
            return Err(Error::InvalidQuantizerMatrixSource {
                expected: table.size(),
                found: values.len(),
            });
        }
        self.data[Self::range(level, plane_type, table)].copy_from_slice(values);
        Ok(())
    }

    pub fn table(&self, level: usize, plane_type: PlaneType, table: SourceTable) -> &[u8] {
        &self.data[Self::range(level, plane_type, table)]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Derivation {
    /// Lower triangle copied and mirrored across the main diagonal.
    MirrorFill(SourceTable),
    Copy(SourceTable),
    /// Source with swapped dimensions, transposed.
    Transpose(SourceTable),
    /// Every other row and column of an already derived matrix.
    Subsample(TransformSize),
}

/// Matrices built for every (level, plane type), in dependency order.
/// Sizes with a 64-sample side are never built, see [`TransformSize::adjusted`].
const DERIVATIONS: [(TransformSize, Derivation); 14] = [
    (TransformSize::Tx4x4, Derivation::MirrorFill(SourceTable::Triangle4x4)),
    (TransformSize::Tx4x8, Derivation::Copy(SourceTable::Rect4x8)),
    (TransformSize::Tx4x16, Derivation::Copy(SourceTable::Rect4x16)),
    (TransformSize::Tx8x4, Derivation::Transpose(SourceTable::Rect4x8)),
    (TransformSize::Tx8x8, Derivation::MirrorFill(SourceTable::Triangle8x8)),
    (TransformSize::Tx8x16, Derivation::Copy(SourceTable::Rect8x16)),
    (TransformSize::Tx8x32, Derivation::Copy(SourceTable::Rect8x32)),
    (TransformSize::Tx16x4, Derivation::Transpose(SourceTable::Rect4x16)),
    (TransformSize::Tx16x8, Derivation::Transpose(SourceTable::Rect8x16)),
    (TransformSize::Tx16x32, Derivation::Copy(SourceTable::Rect16x32)),
    (TransformSize::Tx32x8, Derivation::Transpose(SourceTable::Rect8x32)),
    (TransformSize::Tx32x16, Derivation::Transpose(SourceTable::Rect16x32)),
    (TransformSize::Tx32x32, Derivation::MirrorFill(SourceTable::Triangle32x32)),
    (TransformSize::Tx16x16, Derivation::Subsample(TransformSize::Tx32x32)),
];

fn mirror_fill(dst: &mut [u8], src: &[u8], size: usize) {
    let mut values = src.iter();
    for y in 0..size {
        for (x, &value) in (0..=y).zip(&mut values) {
            dst[y * size + x] = value;
            dst[x * size + y] = value;
        }
    }
}

/// `src` is `src_width` wide; `dst` is `src_height` wide.
fn transpose(dst: &mut [u8], src: &[u8], src_width: usize, src_height: usize) {
    for y in 0..src_width {
        for x in 0..src_height {
            dst[y * src_height + x] = src[x * src_width + y];
        }
    }
}

fn subsample(dst: &mut [u8], dst_width: usize, dst_height: usize, src: &[u8], src_width: usize) {
    for y in 0..dst_height {
        for x in 0..dst_width {
            dst[y * dst_width + x] = src[2 * y * src_width + 2 * x];
        }
    }
}

/// Per-coefficient quantizer weights for every level, plane type and transform
/// size. Built once per sequence and read-only afterwards.
#[derive(Debug)]
pub struct QuantizerMatrix {
    // Indexed by (level * NUM_PLANE_TYPES + plane type) * NUM_TRANSFORM_SIZES + size.
    // Sizes with a 64-sample side are left empty.
    matrices: Vec<Vec<u8>>,
}

impl QuantizerMatrix {
    /// Builds every matrix from `sources`. On failure nothing is returned; there
    /// is no partially built state to recover.
    pub fn initialize(sources: &QuantizerMatrixSources) -> Result<QuantizerMatrix> {
        debug!("building quantizer matrices");
        let mut matrices =
            try_with_capacity(NUM_QUANTIZER_LEVELS * NUM_PLANE_TYPES * NUM_TRANSFORM_SIZES)?;
        for level in 0..NUM_QUANTIZER_LEVELS {
            for plane_type in PlaneType::VALUES {
                let mut sizes: [Vec<u8>; NUM_TRANSFORM_SIZES] = array_init::array_init(|_| Vec::new());
                for (target, _) in DERIVATIONS {
                    sizes[target as usize] = match try_filled_vec(target.area(), 0) {
                        Ok(matrix) => matrix,
                        Err(err) => {
                            warn!("allocating {target:?} quantizer matrix failed: {err}");
                            return Err(err.into());
                        }
                    };
                }
                for (target, derivation) in DERIVATIONS {
                    derive(&mut sizes, target, derivation, |table| {
                        sources.table(level, plane_type, table)
                    });
                }
                matrices.extend(sizes);
            }
            trace!(level, "quantizer matrices built");
        }
        debug!("quantizer matrices ready");
        Ok(QuantizerMatrix { matrices })
    }

    /// Weights of a `tx_size` transform, row-major. Sizes with a 64-sample side
    /// resolve to their adjusted size.
    pub fn get(&self, level: usize, plane_type: PlaneType, tx_size: TransformSize) -> &[u8] {
        assert!(level < NUM_QUANTIZER_LEVELS);
        let index = (level * NUM_PLANE_TYPES + plane_type as usize) * NUM_TRANSFORM_SIZES
            + tx_size.adjusted() as usize;
        &self.matrices[index]
    }

    /// Weights to dequantize `plane` with, or `None` when the frame uses flat quantization.
    pub fn for_plane(
        &self,
        params: &QuantizerParameters,
        plane: Plane,
        tx_size: TransformSize,
    ) -> Option<&[u8]> {
        params
            .matrix_level(plane)
            .map(|level| self.get(level, plane.plane_type(), tx_size))
    }
}

fn derive<'a>(
    sizes: &mut [Vec<u8>; NUM_TRANSFORM_SIZES],
    target: TransformSize,
    derivation: Derivation,
    source: impl Fn(SourceTable) -> &'a [u8],
) {
    let mut dst = std::mem::take(&mut sizes[target as usize]);
    match derivation {
        Derivation::MirrorFill(table) => mirror_fill(&mut dst, source(table), table.width()),
        Derivation::Copy(table) => dst.copy_from_slice(source(table)),
        Derivation::Transpose(table) => {
            transpose(&mut dst, source(table), table.width(), table.height())
        }
        Derivation::Subsample(from) => subsample(
            &mut dst,
            target.width(),
            target.height(),
            &sizes[from as usize],
            from.width(),
        ),
    }
    sizes[target as usize] = dst;
}

#[cfg(test)]
mod test {
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;
    use test_log::test;

    use super::*;

    fn random_sources(seed: u64) -> QuantizerMatrixSources {
        let mut rng = XorShiftRng::seed_from_u64(seed);
        let packed: Vec<u8> = (0..PACKED_SOURCE_BYTES)
            .map(|_| rng.random_range(32..=255))
            .collect();
        QuantizerMatrixSources::from_packed(&packed).unwrap()
    }

    fn at(matrix: &[u8], width: usize, x: usize, y: usize) -> u8 {
        matrix[y * width + x]
    }

    #[test]
    fn source_layout() {
        assert_eq!(SourceTable::Triangle4x4.size(), 10);
        assert_eq!(SourceTable::Triangle8x8.size(), 36);
        assert_eq!(SourceTable::Triangle32x32.size(), 528);
        assert_eq!(SOURCE_BYTES_PER_PLANE_TYPE, 1566);
        assert_eq!(PACKED_SOURCE_BYTES, 46980);
        assert_eq!(SourceTable::Rect4x8.offset(), 574);
    }

    #[test]
    fn derivations_match_target_dimensions() {
        let mut built = Vec::new();
        for (target, derivation) in DERIVATIONS {
            assert!(!target.has_64_side());
            let (width, height) = match derivation {
                Derivation::MirrorFill(t) | Derivation::Copy(t) => (t.width(), t.height()),
                Derivation::Transpose(t) => (t.height(), t.width()),
                Derivation::Subsample(from) => {
                    assert!(built.contains(&from), "{from:?} used before it is built");
                    (from.width() / 2, from.height() / 2)
                }
            };
            assert_eq!((width, height), (target.width(), target.height()), "{target:?}");
            built.push(target);
        }
        let expected: Vec<_> = TransformSize::VALUES
            .into_iter()
            .filter(|s| !s.has_64_side())
            .collect();
        built.sort();
        assert_eq!(built, expected);
    }

    #[test]
    fn rejects_truncated_packed_sources() {
        let packed = vec![0u8; PACKED_SOURCE_BYTES - 1];
        assert!(matches!(
            QuantizerMatrixSources::from_packed(&packed),
            Err(Error::InvalidQuantizerMatrixSource {
                expected: PACKED_SOURCE_BYTES,
                found
            }) if found == PACKED_SOURCE_BYTES - 1
        ));
    }

    #[test]
    fn mirrors_4x4_triangle() {
        let mut sources = QuantizerMatrixSources::new().unwrap();
        let triangle: Vec<u8> = (1..=10).collect();
        sources
            .set_table(0, PlaneType::Y, SourceTable::Triangle4x4, &triangle)
            .unwrap();
        let matrix = QuantizerMatrix::initialize(&sources).unwrap();
        #[rustfmt::skip]
        let expected: [u8; 16] = [
            1, 2, 4, 7,
            2, 3, 5, 8,
            4, 5, 6, 9,
            7, 8, 9, 10,
        ];
        assert_eq!(matrix.get(0, PlaneType::Y, TransformSize::Tx4x4), &expected);
        assert!(matrix.get(0, PlaneType::UV, TransformSize::Tx4x4).iter().all(|&v| v == 0));
    }

    #[test]
    fn set_table_checks_length() {
        let mut sources = QuantizerMatrixSources::new().unwrap();
        assert!(matches!(
            sources.set_table(1, PlaneType::UV, SourceTable::Rect8x16, &[0; 127]),
            Err(Error::InvalidQuantizerMatrixSource {
                expected: 128,
                found: 127
            })
        ));
    }

    #[test]
    fn set_table_rejects_out_of_range_level() {
        let mut sources = QuantizerMatrixSources::new().unwrap();
        let values = [7; 10];
        assert!(matches!(
            sources.set_table(
                NUM_QUANTIZER_LEVELS,
                PlaneType::Y,
                SourceTable::Triangle4x4,
                &values
            ),
            Err(Error::InvalidEnum(15, _))
        ));
        sources
            .set_table(
                NUM_QUANTIZER_LEVELS - 1,
                PlaneType::Y,
                SourceTable::Triangle4x4,
                &values,
            )
            .unwrap();
        assert_eq!(
            sources.table(NUM_QUANTIZER_LEVELS - 1, PlaneType::Y, SourceTable::Triangle4x4),
            &values
        );
    }

    #[test]
    fn derived_matrices_are_consistent() {
        let sources = random_sources(0x5eed);
        let matrix = QuantizerMatrix::initialize(&sources).unwrap();
        for level in 0..NUM_QUANTIZER_LEVELS {
            for plane_type in PlaneType::VALUES {
                let get = |size| matrix.get(level, plane_type, size);
                for (size, n) in [
                    (TransformSize::Tx4x4, 4),
                    (TransformSize::Tx8x8, 8),
                    (TransformSize::Tx16x16, 16),
                    (TransformSize::Tx32x32, 32),
                ] {
                    let m = get(size);
                    for y in 0..n {
                        for x in 0..n {
                            assert_eq!(at(m, n, x, y), at(m, n, y, x), "{size:?} at {x},{y}");
                        }
                    }
                }

                let (m16, m32) = (get(TransformSize::Tx16x16), get(TransformSize::Tx32x32));
                for y in 0..16 {
                    for x in 0..16 {
                        assert_eq!(at(m16, 16, x, y), at(m32, 32, 2 * x, 2 * y));
                    }
                }

                for (wide, tall) in [
                    (TransformSize::Tx8x4, TransformSize::Tx4x8),
                    (TransformSize::Tx16x4, TransformSize::Tx4x16),
                    (TransformSize::Tx16x8, TransformSize::Tx8x16),
                    (TransformSize::Tx32x8, TransformSize::Tx8x32),
                    (TransformSize::Tx32x16, TransformSize::Tx16x32),
                ] {
                    let (w, t) = (get(wide), get(tall));
                    assert_eq!(w.len(), wide.area());
                    for y in 0..wide.height() {
                        for x in 0..wide.width() {
                            assert_eq!(at(w, wide.width(), x, y), at(t, tall.width(), y, x));
                        }
                    }
                }

                assert_eq!(
                    get(TransformSize::Tx4x16),
                    sources.table(level, plane_type, SourceTable::Rect4x16)
                );
            }
        }
    }

    #[test]
    fn sixty_four_sided_sizes_resolve_to_adjusted() {
        let matrix = QuantizerMatrix::initialize(&random_sources(7)).unwrap();
        assert_eq!(
            matrix.get(3, PlaneType::UV, TransformSize::Tx64x64),
            matrix.get(3, PlaneType::UV, TransformSize::Tx32x32)
        );
        assert_eq!(
            matrix.get(3, PlaneType::Y, TransformSize::Tx16x64),
            matrix.get(3, PlaneType::Y, TransformSize::Tx16x32)
        );
        assert_eq!(matrix.get(14, PlaneType::Y, TransformSize::Tx64x16).len(), 512);
    }

    #[test]
    fn flat_quantization_has_no_matrix() {
        let matrix = QuantizerMatrix::initialize(&random_sources(9)).unwrap();
        let mut params = QuantizerParameters {
            base_index: 60,
            use_matrix: true,
            matrix_level: [2, 15, 4],
            ..Default::default()
        };
        assert_eq!(
            matrix.for_plane(&params, Plane::Y, TransformSize::Tx8x8),
            Some(matrix.get(2, PlaneType::Y, TransformSize::Tx8x8))
        );
        assert_eq!(matrix.for_plane(&params, Plane::U, TransformSize::Tx8x8), None);
        assert_eq!(
            matrix.for_plane(&params, Plane::V, TransformSize::Tx8x8),
            Some(matrix.get(4, PlaneType::UV, TransformSize::Tx8x8))
        );
        params.use_matrix = false;
        assert_eq!(matrix.for_plane(&params, Plane::Y, TransformSize::Tx8x8), None);
    }
}
