// std
use std::fs;
// crates.io
use time::macros;
// self
use erf_ledger::{
	_preludet::*,
	client::ErfClient,
	clock::{Clock, ManualClock},
	error::ErrorKind,
	ledger::Ledger,
	rotator::Rotator,
	store::{FileStore, MemoryStore},
};

fn clock() -> ManualClock {
	ManualClock::new(macros::datetime!(2025-03-01 09:00 UTC))
}

#[test]
fn fresh_client_scenario_keeps_one_identity_across_rotations() {
	let clock = clock();
	let path = temp_store_path("scenario");
	let client = ErfClient::with_clock(&path, 1, Arc::new(clock.clone()))
		.expect("Fresh client should open.");
	let ledger = Ledger::default();
	let first = client.token().expect("First token should be available.");
	let identity =
		ledger.append(&first, "write", clock.now()).expect("First append should succeed.");

	assert_eq!(identity, client.client_id());
	assert_eq!(
		ledger.snapshot().operations(&identity).cloned(),
		Some(BTreeMap::from([("write".to_owned(), 1)]))
	);

	clock.advance(Duration::seconds(2));

	let second = client.token().expect("Rotated token should be available.");

	assert_ne!(first, second);

	let again = ledger
		.append(&second, "write", clock.now())
		.expect("Second append should succeed.");
	let view = ledger.snapshot();

	assert_eq!(again, identity);
	assert_eq!(view.len(), 1);
	assert_eq!(view.count(&identity, "write"), 2);

	let _ = fs::remove_dir_all(path.parent().expect("Temp store path should have a parent."));
}

#[test]
fn cloned_file_matches_then_diverges_under_one_identity() {
	let clock = clock();
	let path = temp_store_path("clone_original");
	let copy_path = temp_store_path("clone_copy");
	let original = ErfClient::with_clock(&path, 1, Arc::new(clock.clone()))
		.expect("Original client should open.");

	clone_store_file(&path, &copy_path).expect("Token file should copy.");

	let copy = ErfClient::with_clock(&copy_path, 1, Arc::new(clock.clone()))
		.expect("Copied client should open.");

	assert_eq!(
		original.token().expect("Original token should be available."),
		copy.token().expect("Copied token should be available.")
	);

	clock.advance(Duration::seconds(1));

	let a = original.token().expect("Original should rotate.");
	let b = copy.token().expect("Copy should rotate.");

	assert_ne!(a, b);
	assert_eq!(a.decode().map(|t| t.counter).ok(), Some(1));
	assert_eq!(b.decode().map(|t| t.counter).ok(), Some(1));

	let ledger = Ledger::default();
	let at = macros::datetime!(2025-03-01 09:00:01 UTC);

	assert_eq!(
		ledger.append(&a, "write", at).expect("Original append should succeed."),
		ledger.append(&b, "write", at).expect("Copy append should succeed.")
	);
	assert_eq!(ledger.client_count(), 1);
	assert_eq!(ledger.snapshot().total(), 2);

	for p in [&path, &copy_path] {
		let _ = fs::remove_dir_all(p.parent().expect("Temp store path should have a parent."));
	}
}

#[test]
fn token_changes_once_per_elapsed_interval() {
	let clock = clock();
	let rotator = Rotator::with_clock(MemoryStore::default(), 10, Arc::new(clock.clone()))
		.expect("Memory-backed rotator should open.");
	let mut tokens = Vec::new();

	for _ in 0..4 {
		for _ in 0..3 {
			tokens.push(rotator.token().expect("Token should be available."));
			clock.advance(Duration::seconds(3));
		}

		clock.advance(Duration::seconds(1));
	}

	let changes = tokens.windows(2).filter(|w| w[0] != w[1]).count();

	// Twelve calls spanning 40 seconds at a 10 second interval.
	assert_eq!(changes, 3);
	assert_eq!(rotator.state().counter, 3);
}

#[test]
fn unreadable_store_is_reported_at_open() {
	let path = temp_store_path("unreadable");

	fs::create_dir_all(path.parent().expect("Temp store path should have a parent."))
		.expect("Parent directory should be created.");
	fs::write(&path, b"{\"seed\":").expect("Corrupt state should be written.");

	let store = FileStore::open(&path).expect("Store should open lazily.");
	let err = Rotator::open(store, 5).expect_err("Corrupt state must not be silently replaced.");

	assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
	assert_eq!(fs::read(&path).ok(), Some(b"{\"seed\":".to_vec()));

	let _ = fs::remove_dir_all(path.parent().expect("Temp store path should have a parent."));
}

#[test]
fn empty_token_file_keeps_its_bytes_and_fails_to_open() {
	let path = temp_store_path("empty_file");
	let store = FileStore::open(&path).expect("Store should open lazily.");

	fs::write(&path, b"").expect("Truncated state should be written.");

	let err = Rotator::open(store, 5).expect_err("A truncated copy must not mint a new lineage.");

	assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
	assert_eq!(fs::metadata(&path).map(|m| m.len()).ok(), Some(0));

	let _ = fs::remove_dir_all(path.parent().expect("Temp store path should have a parent."));
}
