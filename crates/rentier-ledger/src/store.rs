//! Storage seams and in-memory implementations
//!
//! The ledger is specified independent of any storage engine: services take
//! these traits and the persistence technology is an injected dependency.
//! The in-memory implementations double as the reference semantics and the
//! test fixtures.

use crate::LedgerError;
use crate::models::{Payment, Profile, Rental};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Storage seam for rentals
#[async_trait]
pub trait RentalStore: Send + Sync {
	/// Load a rental by id
	async fn get(&self, id: Uuid) -> Option<Rental>;

	/// All rentals owned by a user, in no particular order
	async fn list_by_user(&self, user_id: Uuid) -> Vec<Rental>;

	/// Insert a new rental
	async fn insert(&self, rental: Rental) -> Result<(), LedgerError>;

	/// Replace an existing rental; fails with [`LedgerError::RentalNotFound`]
	/// if it does not exist
	async fn update(&self, rental: Rental) -> Result<(), LedgerError>;
}

/// Storage seam for payments
#[async_trait]
pub trait PaymentStore: Send + Sync {
	/// All payments recorded against a rental, in no particular order
	async fn list_by_rental(&self, rental_id: Uuid) -> Vec<Payment>;

	/// Insert a new payment
	async fn insert(&self, payment: Payment) -> Result<(), LedgerError>;
}

/// Storage seam for account profiles
#[async_trait]
pub trait ProfileStore: Send + Sync {
	/// Load the profile belonging to a user
	async fn get_by_user(&self, user_id: Uuid) -> Option<Profile>;

	/// Insert a new profile; fails with [`LedgerError::DuplicateProfile`]
	/// if the user already has one
	async fn insert(&self, profile: Profile) -> Result<(), LedgerError>;

	/// Replace an existing profile
	async fn update(&self, profile: Profile) -> Result<(), LedgerError>;
}

/// In-memory rental store
pub struct InMemoryRentalStore {
	rentals: RwLock<HashMap<Uuid, Rental>>,
}

impl InMemoryRentalStore {
	pub fn new() -> Self {
		Self {
			rentals: RwLock::new(HashMap::new()),
		}
	}
}

impl Default for InMemoryRentalStore {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl RentalStore for InMemoryRentalStore {
	async fn get(&self, id: Uuid) -> Option<Rental> {
		let rentals = self.rentals.read().unwrap_or_else(|e| e.into_inner());
		rentals.get(&id).cloned()
	}

	async fn list_by_user(&self, user_id: Uuid) -> Vec<Rental> {
		let rentals = self.rentals.read().unwrap_or_else(|e| e.into_inner());
		rentals
			.values()
			.filter(|r| r.user_id == user_id)
			.cloned()
			.collect()
	}

	async fn insert(&self, rental: Rental) -> Result<(), LedgerError> {
		let mut rentals = self.rentals.write().unwrap_or_else(|e| e.into_inner());
		rentals.insert(rental.id, rental);
		Ok(())
	}

	async fn update(&self, rental: Rental) -> Result<(), LedgerError> {
		let mut rentals = self.rentals.write().unwrap_or_else(|e| e.into_inner());
		match rentals.get_mut(&rental.id) {
			Some(existing) => {
				*existing = rental;
				Ok(())
			}
			None => Err(LedgerError::RentalNotFound),
		}
	}
}

/// In-memory payment store
pub struct InMemoryPaymentStore {
	payments: RwLock<Vec<Payment>>,
}

impl InMemoryPaymentStore {
	pub fn new() -> Self {
		Self {
			payments: RwLock::new(Vec::new()),
		}
	}
}

impl Default for InMemoryPaymentStore {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
	async fn list_by_rental(&self, rental_id: Uuid) -> Vec<Payment> {
		let payments = self.payments.read().unwrap_or_else(|e| e.into_inner());
		payments
			.iter()
			.filter(|p| p.rental_id == rental_id)
			.cloned()
			.collect()
	}

	async fn insert(&self, payment: Payment) -> Result<(), LedgerError> {
		let mut payments = self.payments.write().unwrap_or_else(|e| e.into_inner());
		payments.push(payment);
		Ok(())
	}
}

/// In-memory profile store
pub struct InMemoryProfileStore {
	profiles: RwLock<HashMap<Uuid, Profile>>,
}

impl InMemoryProfileStore {
	pub fn new() -> Self {
		Self {
			profiles: RwLock::new(HashMap::new()),
		}
	}
}

impl Default for InMemoryProfileStore {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
	async fn get_by_user(&self, user_id: Uuid) -> Option<Profile> {
		let profiles = self.profiles.read().unwrap_or_else(|e| e.into_inner());
		profiles.values().find(|p| p.user_id == user_id).cloned()
	}

	async fn insert(&self, profile: Profile) -> Result<(), LedgerError> {
		// One profile per user, enforced under the write guard
		let mut profiles = self.profiles.write().unwrap_or_else(|e| e.into_inner());
		if profiles.values().any(|p| p.user_id == profile.user_id) {
			return Err(LedgerError::DuplicateProfile);
		}
		profiles.insert(profile.id, profile);
		Ok(())
	}

	async fn update(&self, profile: Profile) -> Result<(), LedgerError> {
		let mut profiles = self.profiles.write().unwrap_or_else(|e| e.into_inner());
		match profiles.get_mut(&profile.id) {
			Some(existing) => {
				*existing = profile;
				Ok(())
			}
			None => Err(LedgerError::ProfileNotFound),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::Utc;

	fn rental(user_id: Uuid) -> Rental {
		Rental {
			id: Uuid::new_v4(),
			user_id,
			address: "1 Main St".to_string(),
			tenant_name: "Bob".to_string(),
			rent_amount: 150_000,
			is_commercial: false,
			annual_property_tax: None,
			annual_insurance: None,
			last_payment_at: None,
		}
	}

	#[tokio::test]
	async fn test_rental_store_scopes_listing_to_user() {
		let store = InMemoryRentalStore::new();
		let alice = Uuid::new_v4();
		let bob = Uuid::new_v4();
		store.insert(rental(alice)).await.unwrap();
		store.insert(rental(alice)).await.unwrap();
		store.insert(rental(bob)).await.unwrap();

		let listed = store.list_by_user(alice).await;

		assert_eq!(listed.len(), 2);
		assert!(listed.iter().all(|r| r.user_id == alice));
	}

	#[tokio::test]
	async fn test_rental_store_update_missing_is_error() {
		let store = InMemoryRentalStore::new();

		let result = store.update(rental(Uuid::new_v4())).await;

		assert_eq!(result.unwrap_err(), LedgerError::RentalNotFound);
	}

	#[tokio::test]
	async fn test_payment_store_filters_by_rental() {
		let store = InMemoryPaymentStore::new();
		let rental_id = Uuid::new_v4();
		store
			.insert(Payment {
				id: Uuid::new_v4(),
				rental_id,
				amount: 100,
				paid_at: Utc::now(),
			})
			.await
			.unwrap();
		store
			.insert(Payment {
				id: Uuid::new_v4(),
				rental_id: Uuid::new_v4(),
				amount: 200,
				paid_at: Utc::now(),
			})
			.await
			.unwrap();

		let listed = store.list_by_rental(rental_id).await;

		assert_eq!(listed.len(), 1);
		assert_eq!(listed[0].amount, 100);
	}

	#[tokio::test]
	async fn test_profile_store_rejects_second_profile() {
		let store = InMemoryProfileStore::new();
		let user_id = Uuid::new_v4();
		let profile = Profile {
			id: Uuid::new_v4(),
			user_id,
			email: "alice@example.com".to_string(),
			avatar_reference: String::new(),
			tax_rate: None,
		};
		store.insert(profile.clone()).await.unwrap();

		let second = Profile {
			id: Uuid::new_v4(),
			..profile
		};

		assert_eq!(
			store.insert(second).await.unwrap_err(),
			LedgerError::DuplicateProfile
		);
	}
}
