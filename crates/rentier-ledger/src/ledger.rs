//! Rental ledger service
//!
//! Owns the rental and payment records: creation, payment recording, the
//! derived `last_payment_at` marker, and the payment-recency ordering used
//! by the landlord's overview.

use crate::models::{NewRental, Payment, Rental, RentalUpdate};
use crate::store::{PaymentStore, RentalStore};
use crate::LedgerError;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// The rental payment ledger
///
/// Mutations against one rental are serialized on a per-rental lock so the
/// payment insert and the `last_payment_at` recomputation land atomically;
/// operations on different rentals never contend.
///
/// # Examples
///
/// ```
/// use rentier_ledger::{InMemoryPaymentStore, InMemoryRentalStore, NewRental, RentalLedger};
/// use std::sync::Arc;
/// use uuid::Uuid;
///
/// # tokio_test::block_on(async {
/// let ledger = RentalLedger::new(
/// 	Arc::new(InMemoryRentalStore::new()),
/// 	Arc::new(InMemoryPaymentStore::new()),
/// );
/// let owner = Uuid::new_v4();
///
/// let rental_id = ledger
/// 	.create_rental(owner, NewRental {
/// 		address: "1 Main St".to_string(),
/// 		tenant_name: "Bob".to_string(),
/// 		rent_amount: 150_000,
/// 		is_commercial: false,
/// 		annual_property_tax: None,
/// 		annual_insurance: None,
/// 	})
/// 	.await
/// 	.unwrap();
///
/// ledger.record_payment(rental_id, 150_000, None).await.unwrap();
///
/// let (_, payments, total_paid) = ledger.rental_with_balance(rental_id).await.unwrap();
/// assert_eq!(payments.len(), 1);
/// assert_eq!(total_paid, 150_000);
/// # })
/// ```
pub struct RentalLedger<R: RentalStore, P: PaymentStore> {
	rentals: Arc<R>,
	payments: Arc<P>,
	rental_locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl<R: RentalStore, P: PaymentStore> RentalLedger<R, P> {
	/// Create a ledger over the given stores
	pub fn new(rentals: Arc<R>, payments: Arc<P>) -> Self {
		Self {
			rentals,
			payments,
			rental_locks: DashMap::new(),
		}
	}

	/// Create a rental for a user
	///
	/// `address`, `tenant_name`, `rent_amount`, and `is_commercial` are
	/// mandatory; the rent must be a positive number of minor units. The
	/// rental starts with no payments and no `last_payment_at`.
	pub async fn create_rental(
		&self,
		user_id: Uuid,
		new: NewRental,
	) -> Result<Uuid, LedgerError> {
		validate_address(&new.address)?;
		validate_tenant_name(&new.tenant_name)?;
		validate_rent_amount(new.rent_amount)?;
		validate_annual(new.annual_property_tax, "annual_property_tax")?;
		validate_annual(new.annual_insurance, "annual_insurance")?;

		let rental = Rental {
			id: Uuid::new_v4(),
			user_id,
			address: new.address,
			tenant_name: new.tenant_name,
			rent_amount: new.rent_amount,
			is_commercial: new.is_commercial,
			annual_property_tax: new.annual_property_tax,
			annual_insurance: new.annual_insurance,
			last_payment_at: None,
		};
		let rental_id = rental.id;

		self.rentals.insert(rental).await?;
		tracing::debug!(%rental_id, %user_id, "rental created");

		Ok(rental_id)
	}

	/// Edit a rental's fields
	///
	/// Only the owner may edit; anyone else sees [`LedgerError::NotFound`],
	/// the same as for a rental that does not exist.
	pub async fn update_rental(
		&self,
		user_id: Uuid,
		rental_id: Uuid,
		update: RentalUpdate,
	) -> Result<Rental, LedgerError> {
		let lock = self.mutation_lock(rental_id);
		let _guard = lock.lock().await;

		let mut rental = match self.rentals.get(rental_id).await {
			Some(r) if r.user_id == user_id => r,
			_ => return Err(LedgerError::NotFound),
		};

		if let Some(address) = update.address {
			validate_address(&address)?;
			rental.address = address;
		}
		if let Some(tenant_name) = update.tenant_name {
			validate_tenant_name(&tenant_name)?;
			rental.tenant_name = tenant_name;
		}
		if let Some(rent_amount) = update.rent_amount {
			validate_rent_amount(rent_amount)?;
			rental.rent_amount = rent_amount;
		}
		if let Some(is_commercial) = update.is_commercial {
			rental.is_commercial = is_commercial;
		}
		if let Some(tax) = update.annual_property_tax {
			validate_annual(Some(tax), "annual_property_tax")?;
			rental.annual_property_tax = Some(tax);
		}
		if let Some(insurance) = update.annual_insurance {
			validate_annual(Some(insurance), "annual_insurance")?;
			rental.annual_insurance = Some(insurance);
		}

		self.rentals.update(rental.clone()).await?;
		Ok(rental)
	}

	/// Record a rent payment against a rental
	///
	/// `paid_at` defaults to the current wall-clock time. The payment
	/// insert and the `last_payment_at` update happen under the rental's
	/// mutation lock, and the marker only moves forward: a back-dated
	/// payment never regresses a later one.
	pub async fn record_payment(
		&self,
		rental_id: Uuid,
		amount: i64,
		paid_at: Option<DateTime<Utc>>,
	) -> Result<Uuid, LedgerError> {
		if amount <= 0 {
			return Err(LedgerError::validation(
				"amount",
				"payment amount must be a positive number of minor units",
			));
		}

		let lock = self.mutation_lock(rental_id);
		let _guard = lock.lock().await;

		let mut rental = self
			.rentals
			.get(rental_id)
			.await
			.ok_or(LedgerError::RentalNotFound)?;

		let paid_at = paid_at.unwrap_or_else(Utc::now);
		let payment = Payment {
			id: Uuid::new_v4(),
			rental_id,
			amount,
			paid_at,
		};
		let payment_id = payment.id;

		self.payments.insert(payment).await?;

		if rental.last_payment_at.is_none_or(|latest| paid_at > latest) {
			rental.last_payment_at = Some(paid_at);
			self.rentals.update(rental).await?;
		}

		tracing::debug!(%rental_id, %payment_id, amount, "payment recorded");
		Ok(payment_id)
	}

	/// A user's rentals ordered by payment recency
	///
	/// Ascending by `last_payment_at` with never-paid rentals first, so the
	/// most urgent units surface at the top of the overview.
	pub async fn list_rentals(&self, user_id: Uuid) -> Vec<Rental> {
		let mut rentals = self.rentals.list_by_user(user_id).await;
		rentals.sort_by_key(|r| r.last_payment_at);
		rentals
	}

	/// A rental together with its payment history and running total
	///
	/// Payments come back in chronological order. A rental with no payments
	/// has a total of zero; an empty ledger is a valid ledger, not an error.
	pub async fn rental_with_balance(
		&self,
		rental_id: Uuid,
	) -> Result<(Rental, Vec<Payment>, i64), LedgerError> {
		let rental = self
			.rentals
			.get(rental_id)
			.await
			.ok_or(LedgerError::RentalNotFound)?;

		let mut payments = self.payments.list_by_rental(rental_id).await;
		payments.sort_by_key(|p| p.paid_at);
		let total_paid = payments.iter().map(|p| p.amount).sum();

		Ok((rental, payments, total_paid))
	}

	fn mutation_lock(&self, rental_id: Uuid) -> Arc<Mutex<()>> {
		Arc::clone(self.rental_locks.entry(rental_id).or_default().value())
	}
}

fn validate_address(address: &str) -> Result<(), LedgerError> {
	if address.trim().is_empty() {
		return Err(LedgerError::validation("address", "address is required"));
	}
	Ok(())
}

fn validate_tenant_name(tenant_name: &str) -> Result<(), LedgerError> {
	if tenant_name.trim().is_empty() {
		return Err(LedgerError::validation("tenant", "tenant name is required"));
	}
	Ok(())
}

fn validate_rent_amount(rent_amount: i64) -> Result<(), LedgerError> {
	if rent_amount <= 0 {
		return Err(LedgerError::validation(
			"rent",
			"rent must be a positive number of minor units",
		));
	}
	Ok(())
}

fn validate_annual(value: Option<i64>, field: &'static str) -> Result<(), LedgerError> {
	if let Some(v) = value
		&& v < 0
	{
		return Err(LedgerError::validation(field, "must not be negative"));
	}
	Ok(())
}
