//! Benchmarks for path canonicalization and overlay resolution.
//!
//! These are the two operations on the hot path of every intercepted
//! libc call, so their cost is paid once per `open`, `stat`, and friends
//! in the host process.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use overdub::canon::canonicalize;
use overdub::config::OverlayConfig;
use overdub::real::RealFs;
use overdub::resolve::{resolve, Intent};

/// An in-memory existence oracle, so benchmarks measure the engine
/// rather than syscall latency.
struct SetFs {
    present: HashSet<PathBuf>,
}

impl RealFs for SetFs {
    fn exists(&self, path: &Path) -> bool {
        self.present.contains(path)
    }

    fn create_dir(&self, _path: &Path, _mode: u32) -> io::Result<()> {
        Ok(())
    }
}

/// Builds a base tree with `num_files` entries spread across modules.
fn populated_base(num_files: usize) -> SetFs {
    let mut present = HashSet::new();
    for i in 0..num_files {
        present.insert(PathBuf::from(format!(
            "/srv/dist/module{}/file{}.php",
            i / 100,
            i
        )));
    }
    SetFs { present }
}

fn bench_canonicalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonicalize");

    group.bench_function("clean_absolute", |b| {
        b.iter(|| canonicalize(black_box(Path::new("/srv/dist/app/index.php"))))
    });

    group.bench_function("dot_segments", |b| {
        b.iter(|| canonicalize(black_box(Path::new("/srv/./dist//app/./index.php"))))
    });

    group.bench_function("parent_segments", |b| {
        b.iter(|| {
            canonicalize(black_box(Path::new(
                "/srv/dist/vendor/../app/cache/../index.php",
            )))
        })
    });

    // Deep paths scale the segment loop.
    for depth in [4, 16, 64] {
        let mut spelled = String::from("/srv");
        for i in 0..depth {
            spelled.push_str(&format!("/level{}/./", i));
        }
        spelled.push_str("leaf.php");
        let path = PathBuf::from(spelled);

        group.bench_with_input(BenchmarkId::new("deep", depth), &path, |b, path| {
            b.iter(|| canonicalize(black_box(path)))
        });
    }

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    let config = OverlayConfig::new("/srv/dist", "/srv/scratch");

    for size in [100, 500, 1000] {
        let fs = populated_base(size);

        let hit = PathBuf::from(format!("/srv/dist/module{}/file{}.php", size / 200, size / 2));
        group.bench_with_input(BenchmarkId::new("base_hit", size), &hit, |b, hit| {
            b.iter(|| resolve(black_box(&config), &fs, black_box(hit), Intent::Read))
        });

        let miss = Path::new("/srv/dist/nonexistent/file.php");
        group.bench_with_input(BenchmarkId::new("scratch_fallback", size), &miss, |b, miss| {
            b.iter(|| resolve(black_box(&config), &fs, black_box(miss), Intent::Read))
        });
    }

    let fs = populated_base(100);

    // The common case for unrelated processes sharing the preload.
    group.bench_function("outside_roots", |b| {
        b.iter(|| {
            resolve(
                black_box(&config),
                &fs,
                black_box(Path::new("/etc/ld.so.cache")),
                Intent::Read,
            )
        })
    });

    // Scratch spelling of a base file, plus canonicalization work.
    group.bench_function("scratch_spelling_messy", |b| {
        b.iter(|| {
            resolve(
                black_box(&config),
                &fs,
                black_box(Path::new("/srv/scratch/./module0/../module0/file50.php")),
                Intent::Read,
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_canonicalize, bench_resolve);
criterion_main!(benches);
