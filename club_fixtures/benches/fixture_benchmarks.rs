use chrono::{TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use club_fixtures::{
    AccessTokenService, Contest, GroupingEngine, PairingEngine, Participant, Resource,
    ResourceScheduler, RotationEngine, SchedulingConstraints, SystemClock,
};
use std::hint::black_box;
use std::sync::Arc;

/// Helper to create a roster spread over `clubs` clubs
fn roster(n: usize, clubs: usize) -> Vec<Participant> {
    (0..n)
        .map(|i| {
            Participant::new(format!("p{i}"), format!("Player {i}"), format!("club{}", i % clubs))
        })
        .collect()
}

/// Benchmark grouping with different field sizes
fn bench_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("grouping");

    for n in [16, 64, 256].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_participants", n)),
            n,
            |b, &n| {
                let participants = roster(n, 6);
                b.iter(|| GroupingEngine::new().group(black_box(&participants), 4));
            },
        );
    }

    group.finish();
}

/// Benchmark pairing search; few clubs means heavy backtracking
fn bench_pairing(c: &mut Criterion) {
    let mut group = c.benchmark_group("pairing");

    for (n, clubs) in [(8, 4), (16, 4), (12, 2), (32, 8)].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_participants_{}_clubs", n, clubs)),
            &(*n, *clubs),
            |b, &(n, clubs)| {
                let participants = roster(n, clubs);
                b.iter(|| PairingEngine::new().pair(black_box(&participants)));
            },
        );
    }

    group.finish();
}

/// Benchmark round-robin generation
fn bench_rotation(c: &mut Criterion) {
    let mut group = c.benchmark_group("rotation");

    for n in [8, 32, 128].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_participants", n)),
            n,
            |b, &n| {
                let participants = roster(n, 5);
                b.iter(|| RotationEngine::new().generate_round_robin(black_box(&participants)));
            },
        );
    }

    group.finish();
}

/// Benchmark scheduling a full round robin on several courts
fn bench_scheduling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduling");
    let start = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
    let constraints = SchedulingConstraints::default()
        .with_working_hours(0, 24)
        .with_max_contests_per_resource_per_day(100);

    for (n, courts) in [(8, 2), (16, 4), (32, 8)].iter() {
        let contests: Vec<Contest> = RotationEngine::new()
            .generate_round_robin(&roster(*n, 4))
            .unwrap()
            .contests()
            .cloned()
            .collect();
        let resources: Vec<Resource> = (0..*courts)
            .map(|i| Resource::new(format!("court-{i}"), format!("Court {i}")))
            .collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_contests_{}_courts", contests.len(), courts)),
            &(contests, resources),
            |b, (contests, resources)| {
                b.iter(|| {
                    ResourceScheduler::new(constraints).schedule(
                        black_box(contests),
                        black_box(resources),
                        start,
                    )
                });
            },
        );
    }

    group.finish();
}

/// Benchmark token issue and validate
fn bench_token_round_trip(c: &mut Criterion) {
    let mut service = AccessTokenService::new(Arc::new(SystemClock), "bench-secret").unwrap();

    c.bench_function("token_issue_validate", |b| {
        b.iter(|| {
            let issued = service.issue("c1", &["p1", "p2"], Some("court-1")).unwrap();
            service.validate(black_box(&issued.token))
        });
    });
}

criterion_group!(
    fixture_generation,
    bench_grouping,
    bench_pairing,
    bench_rotation,
);

criterion_group!(
    scheduling_operations,
    bench_scheduling,
    bench_token_round_trip,
);

criterion_main!(fixture_generation, scheduling_operations);
