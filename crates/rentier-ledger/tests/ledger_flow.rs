//! Ledger behavior across services: guarded reads, payment recording, and
//! the derived ordering a landlord sees.

use chrono::{TimeZone, Utc};
use rentier_ledger::{
	AccessGuard, InMemoryPaymentStore, InMemoryRentalStore, LedgerError, NewRental, RentalLedger,
};
use std::sync::Arc;
use uuid::Uuid;

fn new_rental(address: &str) -> NewRental {
	NewRental {
		address: address.to_string(),
		tenant_name: "Bob".to_string(),
		rent_amount: 150_000,
		is_commercial: false,
		annual_property_tax: None,
		annual_insurance: None,
	}
}

#[tokio::test]
async fn test_guarded_balance_lookup() {
	let rentals = Arc::new(InMemoryRentalStore::new());
	let ledger = RentalLedger::new(rentals.clone(), Arc::new(InMemoryPaymentStore::new()));
	let guard = AccessGuard::new(rentals);
	let owner = Uuid::new_v4();
	let rental_id = ledger.create_rental(owner, new_rental("1 Main St")).await.unwrap();
	ledger.record_payment(rental_id, 150_000, None).await.unwrap();

	// The owner passes the guard and reads the balance
	let rental = guard.authorize_rental_access(owner, rental_id).await.unwrap();
	let (_, payments, total_paid) = ledger.rental_with_balance(rental.id).await.unwrap();
	assert_eq!(payments.len(), 1);
	assert_eq!(total_paid, 150_000);

	// A stranger gets the same answer as for a rental that does not exist
	let stranger = Uuid::new_v4();
	let foreign = guard
		.authorize_rental_access(stranger, rental_id)
		.await
		.unwrap_err();
	let missing = guard
		.authorize_rental_access(stranger, Uuid::new_v4())
		.await
		.unwrap_err();
	assert_eq!(foreign, missing);
	assert_eq!(foreign, LedgerError::NotFound);
}

#[tokio::test]
async fn test_payment_sequence_keeps_marker_at_maximum() {
	let ledger = RentalLedger::new(
		Arc::new(InMemoryRentalStore::new()),
		Arc::new(InMemoryPaymentStore::new()),
	);
	let owner = Uuid::new_v4();
	let rental_id = ledger.create_rental(owner, new_rental("1 Main St")).await.unwrap();

	let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
	let t1 = Utc.timestamp_opt(1_700_086_400, 0).unwrap();

	// A payment at T1, then a back-dated payment at T0 < T1
	ledger.record_payment(rental_id, 150_000, Some(t1)).await.unwrap();
	ledger.record_payment(rental_id, 150_000, Some(t0)).await.unwrap();

	let (rental, payments, total_paid) = ledger.rental_with_balance(rental_id).await.unwrap();
	assert_eq!(rental.last_payment_at, Some(t1));
	assert_eq!(total_paid, 300_000);
	assert_eq!(payments.first().unwrap().paid_at, t0);
	assert_eq!(payments.last().unwrap().paid_at, t1);
}

#[tokio::test]
async fn test_overview_ordering_is_stable_under_new_payments() {
	let ledger = RentalLedger::new(
		Arc::new(InMemoryRentalStore::new()),
		Arc::new(InMemoryPaymentStore::new()),
	);
	let owner = Uuid::new_v4();
	let a = ledger.create_rental(owner, new_rental("1 A St")).await.unwrap();
	let b = ledger.create_rental(owner, new_rental("2 B St")).await.unwrap();
	let c = ledger.create_rental(owner, new_rental("3 C St")).await.unwrap();

	let at = |secs: i64| Utc.timestamp_opt(secs, 0).unwrap();
	ledger.record_payment(a, 100, Some(at(5_000))).await.unwrap();
	ledger.record_payment(b, 100, Some(at(2_000))).await.unwrap();

	// c never paid, then b, then a
	let ids: Vec<_> = ledger.list_rentals(owner).await.iter().map(|r| r.id).collect();
	assert_eq!(ids, vec![c, b, a]);

	// Paying c moves it to the bottom
	ledger.record_payment(c, 100, Some(at(9_000))).await.unwrap();
	let ids: Vec<_> = ledger.list_rentals(owner).await.iter().map(|r| r.id).collect();
	assert_eq!(ids, vec![b, a, c]);
}
