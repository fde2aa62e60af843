//! Snapshot cost over a ledger filled by a growing, partly cloned client population.
//!
//! Thirty clients rotate every second while random clones and new clients join, up to 30% growth,
//! until the requested number of operations has been appended.

// std
use std::{hint::black_box, sync::Arc};
// crates.io
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::Rng;
use time::{Duration, macros};
// self
use erf_ledger::{
	clock::{Clock, ManualClock},
	ledger::Ledger,
	rotator::Rotator,
	store::MemoryStore,
};

const INITIAL_CLIENTS: usize = 30;
const MAX_GROWTH: usize = INITIAL_CLIENTS * 3 / 10;
const OPERATION: &str = "Hello, World!";

fn populate(operations: usize) -> Ledger {
	let clock = ManualClock::new(macros::datetime!(2025-03-01 09:00 UTC));
	let ledger = Ledger::default();
	let mut rng = rand::rng();
	let open = |store: MemoryStore| {
		Rotator::with_clock(store, 1, Arc::new(clock.clone()))
			.expect("Memory-backed rotator should open.")
	};
	let mut clients = (0..INITIAL_CLIENTS).map(|_| open(MemoryStore::default())).collect::<Vec<_>>();
	let mut added = 0;
	let mut appended = 0;

	while appended < operations {
		if added < MAX_GROWTH && rng.random_bool(0.1) {
			let rotator = if rng.random_bool(0.5) {
				open(clients[rng.random_range(0..clients.len())].store().duplicate())
			} else {
				open(MemoryStore::default())
			};

			clients.push(rotator);
			added += 1;
		}

		for rotator in clients.iter().take(operations - appended) {
			let token = rotator.token().expect("Token should be available.");

			ledger.append(&token, OPERATION, clock.now()).expect("Append should succeed.");
			appended += 1;
		}

		clock.advance(Duration::seconds(1));
	}

	ledger
}

fn bench_snapshot(c: &mut Criterion) {
	let mut group = c.benchmark_group("ledger_snapshot");

	for operations in [1_000, 10_000] {
		let ledger = populate(operations);

		group.throughput(Throughput::Elements(ledger.client_count() as u64));
		group.bench_with_input(BenchmarkId::from_parameter(operations), &ledger, |b, ledger| {
			b.iter(|| black_box(ledger.snapshot()))
		});
	}

	group.finish();
}

criterion_group!(benches, bench_snapshot);
criterion_main!(benches);
