//! # Rentier Auth
//!
//! Credential storage and session issuance for the rentier ledger.
//!
//! Every ledger operation is scoped to an owning user, so this crate carries
//! the two gatekeepers: the [`CredentialStore`], which registers users and
//! verifies login attempts against salted argon2 hashes, and the
//! [`SessionAuthority`], which turns a verified user id into an opaque,
//! tamper-evident session token and back again.
//!
//! Key modules:
//!
//! - [`credentials`]: user records, the [`UserStore`] seam, registration and
//!   password verification
//! - [`hasher`]: the [`PasswordHasher`] trait and the argon2 default
//! - [`secret`]: the durable process-wide signing secret
//! - [`session`]: signed session tokens (create / resolve / destroy)
//!
//! Verification deliberately reports a single [`AuthError::InvalidCredentials`]
//! for both unknown names and wrong passwords, so callers cannot probe which
//! user names exist.

pub mod credentials;
pub mod hasher;
pub mod secret;
pub mod session;

pub use credentials::{CredentialStore, InMemoryUserStore, MIN_PASSWORD_LEN, User, UserStore};
pub use hasher::{Argon2Hasher, PasswordHasher};
pub use secret::{SECRET_LEN, SecretError, SecretStore, SigningSecret, process_secret};
pub use session::{SessionAuthority, SessionError, SessionToken};

/// Authentication errors
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
	/// A user with the requested name already exists.
	#[error("a user with that name already exists")]
	DuplicateName,
	/// Login failed. Deliberately covers both unknown names and wrong
	/// passwords so the two are indistinguishable to the caller.
	#[error("invalid credentials")]
	InvalidCredentials,
	/// The supplied password does not meet the minimum requirements.
	#[error("password must be at least {MIN_PASSWORD_LEN} characters")]
	WeakPassword,
	/// The user name is empty or whitespace-only.
	#[error("user name must not be empty")]
	InvalidName,
	/// No user with the given id exists.
	#[error("no such user")]
	UnknownUser,
	/// Password hashing or verification failed internally.
	#[error("password hashing failed: {0}")]
	Hash(String),
	/// The backing user store reported an error.
	#[error("user store error: {0}")]
	Store(String),
}
