//! Ownership checks
//!
//! A rental is visible and mutable only by its owning user. A lookup miss
//! and an ownership mismatch are distinguishable here but surface
//! identically to the caller, so a probing user cannot learn that someone
//! else's rental id exists.

use crate::LedgerError;
use crate::models::Rental;
use crate::store::RentalStore;
use std::sync::Arc;
use uuid::Uuid;

/// Access control guard for rentals
///
/// # Examples
///
/// ```
/// use rentier_ledger::{AccessGuard, InMemoryRentalStore, LedgerError};
/// use std::sync::Arc;
/// use uuid::Uuid;
///
/// # tokio_test::block_on(async {
/// let guard = AccessGuard::new(Arc::new(InMemoryRentalStore::new()));
///
/// // A rental that does not exist reads as NotFound
/// let err = guard
/// 	.authorize_rental_access(Uuid::new_v4(), Uuid::new_v4())
/// 	.await
/// 	.unwrap_err();
/// assert_eq!(err, LedgerError::NotFound);
/// # })
/// ```
pub struct AccessGuard<R: RentalStore> {
	rentals: Arc<R>,
}

impl<R: RentalStore> AccessGuard<R> {
	/// Create a guard over the given rental store
	pub fn new(rentals: Arc<R>) -> Self {
		Self { rentals }
	}

	/// Authorize a user's access to a rental
	///
	/// Returns the rental if and only if `user_id` owns it. Both failure
	/// causes collapse to [`LedgerError::NotFound`] at this boundary.
	pub async fn authorize_rental_access(
		&self,
		user_id: Uuid,
		rental_id: Uuid,
	) -> Result<Rental, LedgerError> {
		match self.rentals.get(rental_id).await {
			Some(rental) if rental.user_id == user_id => Ok(rental),
			Some(_) => {
				tracing::debug!(%user_id, %rental_id, "rental access denied: not the owner");
				Err(LedgerError::NotFound)
			}
			None => Err(LedgerError::NotFound),
		}
	}
}
