//! Reconciliation benchmarks for distverify.
//!
//! Measures:
//! - Path resolution throughput
//! - Full reconciliation of a generated tree (both passes)
//! - Checksum throughput per algorithm

#![allow(clippy::unwrap_used, clippy::expect_used, missing_docs)]

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use distverify_core::ChecksumAlgorithm;
use distverify_core::ManifestEntry;
use distverify_core::NoopObserver;
use distverify_core::Variables;
use distverify_core::manifest::generate_manifest;
use distverify_core::reconcile;
use distverify_core::resolve;
use std::fs;
use std::hint::black_box;
use std::path::Path;
use tempfile::TempDir;

fn build_tree(root: &Path, dirs: usize, files_per_dir: usize) {
    for d in 0..dirs {
        let dir = root.join(format!("dir{d:03}"));
        fs::create_dir_all(&dir).unwrap();
        for f in 0..files_per_dir {
            fs::write(dir.join(format!("file{f:03}.txt")), format!("{d}-{f}")).unwrap();
        }
    }
}

fn benchmark_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    let mut vars = Variables::new();
    vars.insert("project.version".into(), "1.2.3".into());
    vars.insert("project.artifactId".into(), "app".into());

    group.bench_function("no_placeholders", |b| {
        b.iter(|| resolve(black_box("/lib/app-1.2.3.jar"), black_box(&vars)));
    });

    group.bench_function("two_placeholders", |b| {
        b.iter(|| {
            resolve(
                black_box("/lib/${project.artifactId}-${project.version}.jar"),
                black_box(&vars),
            )
        });
    });

    group.finish();
}

fn benchmark_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");

    for &(dirs, files) in &[(10, 10), (20, 50)] {
        let temp = TempDir::new().unwrap();
        build_tree(temp.path(), dirs, files);
        let full = generate_manifest(temp.path(), &ChecksumAlgorithm::Md5).unwrap();
        // Drop every other entry so pass 2 has undeclared files to hash.
        let half: Vec<ManifestEntry> = full.iter().step_by(2).cloned().collect();
        let total = dirs * files;

        group.throughput(Throughput::Elements(total as u64));
        group.bench_with_input(BenchmarkId::new("all_declared", total), &full, |b, entries| {
            b.iter(|| {
                reconcile(
                    temp.path(),
                    black_box(entries),
                    &ChecksumAlgorithm::Md5,
                    &mut NoopObserver,
                )
            });
        });
        group.bench_with_input(BenchmarkId::new("half_declared", total), &half, |b, entries| {
            b.iter(|| {
                reconcile(
                    temp.path(),
                    black_box(entries),
                    &ChecksumAlgorithm::Md5,
                    &mut NoopObserver,
                )
            });
        });
    }

    group.finish();
}

fn benchmark_checksum(c: &mut Criterion) {
    let mut group = c.benchmark_group("checksum");
    let data = vec![0xA5u8; 1024 * 1024];
    group.throughput(Throughput::Bytes(data.len() as u64));

    for algorithm in ChecksumAlgorithm::ALL {
        group.bench_function(algorithm.as_str(), |b| {
            b.iter(|| algorithm.digest_bytes(black_box(&data)));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_resolve, benchmark_reconcile, benchmark_checksum);
criterion_main!(benches);
