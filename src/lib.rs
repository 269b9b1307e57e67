//! # Rentier
//!
//! A rental payment ledger for landlords: rental units, the rent payments
//! received against them, and per-user authentication scoping every ledger
//! operation to its owner.
//!
//! Rentier is a library, not a web application. A routing/presentation
//! layer sits in front of it and calls the typed services re-exported here;
//! the library's own surface is:
//!
//! - [`auth`] ([`rentier_auth`]): credential storage (salted argon2
//!   hashes), the durable signing secret, and opaque signed session tokens
//! - [`ledger`] ([`rentier_ledger`]): rentals, payments, derived balances
//!   and payment-recency ordering, ownership checks, account profiles
//! - [`accounts`]: the registration glue that creates a user and their
//!   profile together
//!
//! ## Request flow
//!
//! A request resolves its session token to a user id, the access guard
//! authorizes the target rental against that user, and only then does the
//! ledger perform the read or mutation:
//!
//! ```
//! use rentier::prelude::*;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let rentals = Arc::new(InMemoryRentalStore::new());
//! let ledger = RentalLedger::new(rentals.clone(), Arc::new(InMemoryPaymentStore::new()));
//! let guard = AccessGuard::new(rentals);
//! let credentials = CredentialStore::new(Arc::new(InMemoryUserStore::new()));
//! let sessions = SessionAuthority::new(SigningSecret::generate());
//!
//! let user_id = credentials.register("alice", "a strong password").await.unwrap();
//! let token = sessions.create_session(user_id);
//!
//! let rental_id = ledger
//! 	.create_rental(user_id, NewRental {
//! 		address: "1 Main St".to_string(),
//! 		tenant_name: "Bob".to_string(),
//! 		rent_amount: 150_000,
//! 		is_commercial: false,
//! 		annual_property_tax: None,
//! 		annual_insurance: None,
//! 	})
//! 	.await
//! 	.unwrap();
//!
//! // Later, a request carrying the token:
//! let caller = sessions.resolve_session(&token).unwrap();
//! let rental = guard.authorize_rental_access(caller, rental_id).await.unwrap();
//! ledger.record_payment(rental.id, 150_000, None).await.unwrap();
//! # })
//! ```

pub use rentier_auth as auth;
pub use rentier_ledger as ledger;

pub mod accounts;

pub use accounts::{AccountError, AccountService};

/// Commonly used types, importable in one line
pub mod prelude {
	pub use crate::accounts::{AccountError, AccountService};
	pub use rentier_auth::{
		AuthError, CredentialStore, InMemoryUserStore, SecretStore, SessionAuthority,
		SessionError, SigningSecret, UserStore,
	};
	pub use rentier_ledger::{
		AccessGuard, InMemoryPaymentStore, InMemoryProfileStore, InMemoryRentalStore,
		LedgerError, NewRental, ProfileService, ProfileUpdate, RentalLedger, RentalUpdate,
	};
}
