//! # Rentier Ledger
//!
//! The authoritative record of rental units and the rent payments received
//! against them, together with the ownership checks that keep one landlord's
//! books invisible to another.
//!
//! Key modules:
//!
//! - [`models`]: the [`Rental`], [`Payment`], and [`Profile`] records
//! - [`store`]: storage seams ([`RentalStore`], [`PaymentStore`],
//!   [`ProfileStore`]) with in-memory implementations
//! - [`ledger`]: the [`RentalLedger`] service: create rentals, record
//!   payments, list by payment recency, compute balances
//! - [`access`]: the [`AccessGuard`] ownership check
//! - [`profile`]: per-user account profiles with derived avatar references
//! - [`currency`]: the major-to-minor unit boundary conversion
//!
//! Monetary amounts are integer minor units (cents) everywhere inside the
//! ledger; fractional input is truncated at the boundary by
//! [`currency::to_minor_units`] before it can enter.

pub mod access;
pub mod currency;
pub mod ledger;
pub mod models;
pub mod profile;
pub mod store;

pub use access::AccessGuard;
pub use ledger::RentalLedger;
pub use models::{NewRental, Payment, Profile, ProfileUpdate, Rental, RentalUpdate};
pub use profile::{ProfileService, avatar_reference, validate_email};
pub use store::{
	InMemoryPaymentStore, InMemoryProfileStore, InMemoryRentalStore, PaymentStore, ProfileStore,
	RentalStore,
};

/// Ledger errors
///
/// Ownership mismatches are reported as [`LedgerError::NotFound`] on
/// purpose: a caller probing another user's rental id must not learn that
/// the rental exists.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
	/// A field failed validation; carries the offending field's name.
	#[error("validation failed for `{field}`: {message}")]
	Validation {
		field: &'static str,
		message: String,
	},
	/// The rental targeted by a payment does not exist.
	#[error("rental not found")]
	RentalNotFound,
	/// The requested record does not exist, or belongs to another user.
	#[error("not found")]
	NotFound,
	/// The user has no account profile.
	#[error("profile not found")]
	ProfileNotFound,
	/// The user already has an account profile.
	#[error("profile already exists for user")]
	DuplicateProfile,
	/// The backing store reported an error.
	#[error("store error: {0}")]
	Store(String),
}

impl LedgerError {
	pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
		Self::Validation {
			field,
			message: message.into(),
		}
	}
}
