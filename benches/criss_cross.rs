use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use num_complex::Complex;
use rand::{Rng, rng};
use ssr_fft::{
    parameters::SsrParameters,
    permutation::{CrissCrossNetwork, LaneBuffers},
};

fn random_lanes(params: &SsrParameters) -> LaneBuffers<Complex<f32>> {
    let mut rng = rng();
    LaneBuffers::from_fn(params, |_, _| Complex::new(rng.random(), rng.random()))
}

fn bench_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("criss_cross_drain");

    for &log_len in &[12, 16, 20] {
        let transform_len = 1 << log_len;
        for &radix in &[4, 8, 16] {
            let params = SsrParameters::new(transform_len, radix).unwrap();
            let network = CrissCrossNetwork::new(params).unwrap();
            let lanes = random_lanes(&params);
            let mut out = vec![Complex::default(); transform_len];

            group.bench_with_input(
                BenchmarkId::new(format!("L=2^{log_len}"), radix),
                &radix,
                |b, _| {
                    b.iter(|| network.drain_into(&lanes, &mut out));
                },
            );
        }
    }

    group.finish();
}

fn bench_permute_cycle(c: &mut Criterion) {
    let params = SsrParameters::new(1 << 12, 8).unwrap();
    let network = CrissCrossNetwork::new(params).unwrap();
    let lanes = random_lanes(&params);
    let mut out = [Complex::default(); 8];

    c.bench_function("criss_cross_permute_cycle", |b| {
        b.iter(|| {
            for step in network.schedule() {
                network.permute_into(step.stage_index, step.time_offset, &lanes, &mut out);
            }
        });
    });
}

criterion_group!(benches, bench_drain, bench_permute_cycle);
criterion_main!(benches);
