//! Benchmarks for both stretch engines on a synthetic frame.
//!
//! Run with: cargo bench -p astrostretch --features synthetic --bench stretch

use std::hint::black_box;

use astrostretch::testing::{SkyConfig, synthetic_rgb};
use astrostretch::{Config, ObjectType, OtsConfig, ProgressContext, SasConfig, execute};
use criterion::{Criterion, criterion_group, criterion_main};

fn stretch_benchmarks(c: &mut Criterion) {
    let image = synthetic_rgb(&SkyConfig {
        width: 1024,
        height: 768,
        num_stars: 400,
        ..Default::default()
    });
    let ctx = ProgressContext::default();

    let mut group = c.benchmark_group("stretch");
    group.sample_size(10);

    group.bench_function("ots_nebula_1024x768", |b| {
        let config = Config::ots(OtsConfig {
            object_type: ObjectType::Nebula,
            ..Default::default()
        });
        b.iter(|| execute(black_box(&image), &config, &ctx).unwrap())
    });

    group.bench_function("sas_default_1024x768", |b| {
        let config = Config::sas(SasConfig::default());
        b.iter(|| execute(black_box(&image), &config, &ctx).unwrap())
    });

    group.bench_function("sas_no_protection_1024x768", |b| {
        let config = Config::sas(SasConfig {
            highlight_protection: 0.0,
            ..Default::default()
        });
        b.iter(|| execute(black_box(&image), &config, &ctx).unwrap())
    });

    group.finish();
}

criterion_group!(benches, stretch_benchmarks);
criterion_main!(benches);
