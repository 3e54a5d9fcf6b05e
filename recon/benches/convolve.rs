// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use criterion::measurement::Measurement;
use criterion::{BenchmarkGroup, BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use recon::{
    BitDepth,
    convolve::{ConvolveParams, IntermediateBuffer, InterpolationFilter, PredictionMut, convolve_with},
    image::ReferenceBlock,
};
use recon_simd::{SimdDescriptor, bench_all_instruction_sets};

const BORDER: usize = 8;
const SIZES: [(usize, usize); 6] = [(4, 4), (8, 8), (16, 8), (16, 16), (32, 32), (64, 64)];

fn random_plane(width: usize, height: usize) -> (Vec<u8>, usize) {
    let stride = width + 2 * BORDER;
    let mut rng = XorShiftRng::seed_from_u64(0);
    let plane = (0..stride * (height + 2 * BORDER))
        .map(|_| rng.random::<u8>())
        .collect();
    (plane, stride)
}

fn bench_convolve_path<D: SimdDescriptor>(
    d: D,
    c: &mut BenchmarkGroup<'_, impl Measurement>,
    name: &str,
    path: &str,
    phases: (u8, u8),
    compound: bool,
) {
    let mut scratch = IntermediateBuffer::new().unwrap();
    for (width, height) in SIZES {
        let (plane, stride) = random_plane(width, height);
        let reference =
            ReferenceBlock::new(&plane, stride, (BORDER, BORDER), (width, height)).unwrap();
        let params = ConvolveParams {
            bit_depth: BitDepth::Eight,
            horizontal_filter: InterpolationFilter::EightTapSharp,
            vertical_filter: InterpolationFilter::EightTap,
            horizontal_phase: phases.0,
            vertical_phase: phases.1,
        };
        let id = BenchmarkId::new(
            format!("{path}{}/{name}", if compound { "_compound" } else { "" }),
            format_args!("{width}x{height}"),
        );
        let mut pixels = vec![0u8; width * height];
        let mut compound_out = vec![0i16; width * height];
        c.bench_function(id, |b| {
            b.iter(|| {
                let prediction = if compound {
                    PredictionMut::Compound(&mut compound_out)
                } else {
                    PredictionMut::Pixels {
                        data: &mut pixels,
                        stride: width,
                    }
                };
                d.call(|d| convolve_with(d, &params, &reference, &mut scratch, prediction));
            })
        });
    }
}

fn bench_convolve<D: SimdDescriptor>(
    d: D,
    c: &mut BenchmarkGroup<'_, impl Measurement>,
    name: &str,
) {
    for compound in [false, true] {
        bench_convolve_path(d, c, name, "copy", (0, 0), compound);
        bench_convolve_path(d, c, name, "horizontal", (5, 0), compound);
        bench_convolve_path(d, c, name, "vertical", (0, 11), compound);
        bench_convolve_path(d, c, name, "2d", (5, 11), compound);
    }
}

fn convolve_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("convolve");
    let g = &mut group;

    bench_all_instruction_sets!(bench_convolve, g);

    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(50);
    targets = convolve_benches
);
criterion_main!(benches);
