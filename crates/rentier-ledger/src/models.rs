//! Ledger records
//!
//! Plain data records passed across the storage seam. Amounts are integer
//! minor currency units; see [`crate::currency`] for the input boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A rental unit owned by a user
///
/// `last_payment_at` is derived state: always the `paid_at` of the
/// chronologically latest payment, or `None` for a rental that has never
/// been paid. [`crate::ledger::RentalLedger::record_payment`] maintains it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rental {
	pub id: Uuid,
	/// Owning user; every read and mutation is scoped to this id.
	pub user_id: Uuid,
	pub address: String,
	pub tenant_name: String,
	/// Monthly rent in minor currency units.
	pub rent_amount: i64,
	pub is_commercial: bool,
	pub annual_property_tax: Option<i64>,
	pub annual_insurance: Option<i64>,
	pub last_payment_at: Option<DateTime<Utc>>,
}

/// A rent payment received against a rental
///
/// Immutable once recorded; there is no update or delete path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
	pub id: Uuid,
	pub rental_id: Uuid,
	/// Amount received, in minor currency units; always positive.
	pub amount: i64,
	pub paid_at: DateTime<Utc>,
}

/// Per-user account profile
///
/// One per user, created together with the user at registration.
/// `avatar_reference` is derived from `email` and recomputed whenever the
/// email changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
	pub id: Uuid,
	pub user_id: Uuid,
	pub email: String,
	pub avatar_reference: String,
	/// Applicable tax rate as a whole percentage, if configured.
	pub tax_rate: Option<u32>,
}

/// Fields for creating a rental
#[derive(Debug, Clone)]
pub struct NewRental {
	pub address: String,
	pub tenant_name: String,
	pub rent_amount: i64,
	pub is_commercial: bool,
	pub annual_property_tax: Option<i64>,
	pub annual_insurance: Option<i64>,
}

/// Partial update of a rental's editable fields
///
/// `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct RentalUpdate {
	pub address: Option<String>,
	pub tenant_name: Option<String>,
	pub rent_amount: Option<i64>,
	pub is_commercial: Option<bool>,
	pub annual_property_tax: Option<i64>,
	pub annual_insurance: Option<i64>,
}

/// Partial update of a profile
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
	pub email: Option<String>,
	pub tax_rate: Option<u32>,
}
