//! Benchmarking Observation RINEX decoding
//! using tiny files of each revision
extern crate criterion;
use criterion::{criterion_group, criterion_main, Criterion};

use rnx2tab::prelude::ObsReader;

fn obs_parsing(reader: &ObsReader, path: &str) {
    let _ = reader.read_file(path).unwrap();
}

fn benchmark(c: &mut Criterion) {
    let mut parsing_grp = c.benchmark_group("parsing");

    let reader = ObsReader::new();
    let indexed = ObsReader::new().with_index(&["epoch", "prn"]);

    // Small RINEX OBS (V2)
    parsing_grp.bench_function("OBS/V2", |b| {
        b.iter(|| {
            obs_parsing(&reader, "test_resources/OBS/V2/ajac0010.21o");
        })
    });

    parsing_grp.bench_function("OBS/V2/indexed", |b| {
        b.iter(|| {
            obs_parsing(&indexed, "test_resources/OBS/V2/ajac0010.21o");
        })
    });

    // Small RINEX OBS (V3)
    parsing_grp.bench_function("OBS/V3", |b| {
        b.iter(|| {
            obs_parsing(&reader, "test_resources/OBS/V3/ACOR00ESP.rnx");
        })
    });

    parsing_grp.finish();
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
