//! Criterion microbenches for lhcbdata.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - dataset JSON parsing (from_json_str)
//! - options generation for a large dataset (options_string)
//! - set operations between overlapping datasets (union, difference)

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use lhcbdata::dataset::io_json::{from_json_str, to_json_string};
use lhcbdata::options::{options_string, DatatypeMatcher};
use lhcbdata::setops::{difference, union};
use lhcbdata::{Config, DataFile, Dataset};

/// A dataset of `n` files, every tenth a raw PFN.
fn synthetic_dataset(n: usize, offset: usize) -> Dataset {
    let files = (offset..offset + n)
        .map(|i| {
            if i % 10 == 0 {
                DataFile::physical(format!("/castor/cern.ch/lhcb/run{i:06}.raw"))
            } else {
                DataFile::logical(format!("/lhcb/LHCb/Collision12/DST/{i:08}_1.dst"))
            }
        })
        .collect();
    Dataset::from_files(files)
}

fn bench_json_parse(c: &mut Criterion) {
    let json = to_json_string(&synthetic_dataset(2_000, 0)).unwrap();
    let mut group = c.benchmark_group("dataset_json");
    group.throughput(Throughput::Bytes(json.len() as u64));

    group.bench_function("from_json_str", |b| {
        b.iter(|| {
            let ds = from_json_str(black_box(&json)).unwrap();
            black_box(ds)
        })
    });

    group.finish();
}

fn bench_options(c: &mut Criterion) {
    let dataset = synthetic_dataset(2_000, 0);
    let matcher = DatatypeMatcher::from_config(&Config::default()).unwrap();
    let mut group = c.benchmark_group("options");
    group.throughput(Throughput::Elements(dataset.len() as u64));

    group.bench_function("options_string", |b| {
        b.iter(|| black_box(options_string(black_box(&dataset), &matcher, None)))
    });

    group.finish();
}

/// Two datasets overlapping by half.
fn bench_setops(c: &mut Criterion) {
    let a = synthetic_dataset(5_000, 0);
    let b = synthetic_dataset(5_000, 2_500);
    let mut group = c.benchmark_group("setops");
    group.throughput(Throughput::Elements((a.len() + b.len()) as u64));

    group.bench_function("union", |bench| {
        bench.iter(|| black_box(union(black_box(&a), black_box(&b)).unwrap()))
    });
    group.bench_function("difference", |bench| {
        bench.iter(|| black_box(difference(black_box(&a), black_box(&b)).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_json_parse, bench_options, bench_setops);
criterion_main!(benches);
