// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Anthologize-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Anthologize and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use anthologize::model::SortKey;

// Benchmark identity (keep stable):
// - Group name in this file: `sort.between`
// - Case IDs must remain stable across refactors so results stay comparable
//   over time (e.g. `descending_512`, `alternating_512`).
fn descending_keys(count: usize) -> Vec<SortKey> {
    let mut keys = Vec::with_capacity(count);
    let mut hi = SortKey::between(None, None);
    for _ in 0..count {
        let key = SortKey::between(None, Some(&hi));
        keys.push(key.clone());
        hi = key;
    }
    keys
}

fn bench_between(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort.between");

    group.throughput(Throughput::Elements(512));
    group.bench_function("descending_512", |b| {
        b.iter(|| black_box(descending_keys(512)));
    });

    group.bench_function("alternating_512", |b| {
        b.iter(|| {
            let mut lo = SortKey::between(None, None);
            let mut hi = SortKey::between(Some(&lo), None);
            for round in 0..512 {
                let mid = SortKey::between(Some(&lo), Some(&hi));
                if round % 2 == 0 {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            black_box((lo, hi))
        });
    });

    group.finish();
}

fn bench_ordering(c: &mut Criterion) {
    let keys = descending_keys(512);
    let mut group = c.benchmark_group("sort.ordering");

    group.throughput(Throughput::Elements(512));
    group.bench_function("resort_512", |b| {
        b.iter_batched(
            || keys.clone(),
            |mut shuffled| {
                shuffled.reverse();
                shuffled.sort();
                black_box(shuffled)
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_between, bench_ordering);
criterion_main!(benches);
