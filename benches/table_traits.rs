use criterion::{Criterion, criterion_group, criterion_main};
use ssr_fft::{
    numeric::NumericRepresentation,
    parameters::SsrParameters,
    tables::{TableConfig, TableTraits},
};

fn bench_table_traits(c: &mut Criterion) {
    let params = SsrParameters::new(1 << 14, 8).unwrap();
    let representation = NumericRepresentation::fixed(18, 2).unwrap();
    let config = TableConfig::default();

    c.bench_function("table_traits_new", |b| {
        b.iter(|| TableTraits::new(params, representation, config));
    });

    c.bench_function("table_traits_cached", |b| {
        b.iter(|| TableTraits::cached(params, representation, config));
    });
}

criterion_group!(benches, bench_table_traits);
criterion_main!(benches);
