//! Credential store
//!
//! Registration and login verification backed by a pluggable [`UserStore`].
//! The store holds only names and salted password hashes; a raw password is
//! hashed immediately and then dropped.

use crate::AuthError;
use crate::hasher::{Argon2Hasher, PasswordHasher};
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// A registered user
///
/// `password_hash` is a PHC string produced by a [`PasswordHasher`]; the
/// plaintext password is never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
	pub id: Uuid,
	pub name: String,
	pub password_hash: String,
}

/// Storage seam for user records
///
/// Mirrors what the ledger needs from a database: lookup by id, lookup by
/// name, insert, update. `insert` must enforce name uniqueness atomically,
/// the way a unique index would.
#[async_trait]
pub trait UserStore: Send + Sync {
	/// Load a user by id
	async fn get(&self, id: Uuid) -> Option<User>;

	/// Load a user by unique name
	async fn get_by_name(&self, name: &str) -> Option<User>;

	/// Insert a new user; fails with [`AuthError::DuplicateName`] if the
	/// name is already taken
	async fn insert(&self, user: User) -> Result<(), AuthError>;

	/// Replace an existing user record
	async fn update(&self, user: User) -> Result<(), AuthError>;
}

/// In-memory user store
///
/// # Examples
///
/// ```
/// use rentier_auth::{InMemoryUserStore, UserStore, User};
/// use uuid::Uuid;
///
/// # tokio_test::block_on(async {
/// let store = InMemoryUserStore::new();
/// let user = User {
/// 	id: Uuid::new_v4(),
/// 	name: "alice".to_string(),
/// 	password_hash: "$argon2id$...".to_string(),
/// };
///
/// store.insert(user.clone()).await.unwrap();
/// assert!(store.get_by_name("alice").await.is_some());
///
/// // A second user with the same name is rejected
/// let dup = User { id: Uuid::new_v4(), ..user };
/// assert!(store.insert(dup).await.is_err());
/// # })
/// ```
pub struct InMemoryUserStore {
	users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserStore {
	/// Create a new empty user store
	pub fn new() -> Self {
		Self {
			users: RwLock::new(HashMap::new()),
		}
	}
}

impl Default for InMemoryUserStore {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl UserStore for InMemoryUserStore {
	async fn get(&self, id: Uuid) -> Option<User> {
		let users = self.users.read().unwrap_or_else(|e| e.into_inner());
		users.get(&id).cloned()
	}

	async fn get_by_name(&self, name: &str) -> Option<User> {
		let users = self.users.read().unwrap_or_else(|e| e.into_inner());
		users.values().find(|u| u.name == name).cloned()
	}

	async fn insert(&self, user: User) -> Result<(), AuthError> {
		// Uniqueness check and insert under one write guard
		let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());
		if users.values().any(|u| u.name == user.name) {
			return Err(AuthError::DuplicateName);
		}
		users.insert(user.id, user);
		Ok(())
	}

	async fn update(&self, user: User) -> Result<(), AuthError> {
		let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());
		match users.get_mut(&user.id) {
			Some(existing) => {
				*existing = user;
				Ok(())
			}
			None => Err(AuthError::UnknownUser),
		}
	}
}

/// Credential store
///
/// Registers users and verifies login attempts. Lookup failure and password
/// mismatch surface as the same [`AuthError::InvalidCredentials`], and the
/// unknown-name path burns a comparable amount of hashing work, so callers
/// cannot enumerate registered names by timing or by error kind.
///
/// # Examples
///
/// ```
/// use rentier_auth::{CredentialStore, InMemoryUserStore};
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let store = CredentialStore::new(Arc::new(InMemoryUserStore::new()));
///
/// let user_id = store.register("alice", "correct horse battery").await.unwrap();
/// assert_eq!(store.verify("alice", "correct horse battery").await.unwrap(), user_id);
///
/// assert!(store.verify("alice", "wrong password").await.is_err());
/// assert!(store.verify("nobody", "anything").await.is_err());
/// # })
/// ```
pub struct CredentialStore<S: UserStore> {
	store: Arc<S>,
	hasher: Arc<dyn PasswordHasher>,
	dummy_hash: OnceCell<String>,
}

impl<S: UserStore> CredentialStore<S> {
	/// Create a credential store with the default argon2 hasher
	pub fn new(store: Arc<S>) -> Self {
		Self::with_hasher(store, Arc::new(Argon2Hasher::new()))
	}

	/// Create a credential store with a custom password hasher
	pub fn with_hasher(store: Arc<S>, hasher: Arc<dyn PasswordHasher>) -> Self {
		Self {
			store,
			hasher,
			dummy_hash: OnceCell::new(),
		}
	}

	/// Register a new user
	///
	/// The caller is expected to have already confirmed the password against
	/// its confirmation field; this store only checks the minimum strength
	/// requirement. The raw password is hashed and discarded.
	pub async fn register(&self, name: &str, password: &str) -> Result<Uuid, AuthError> {
		if name.trim().is_empty() {
			return Err(AuthError::InvalidName);
		}
		if password.chars().count() < MIN_PASSWORD_LEN {
			return Err(AuthError::WeakPassword);
		}

		let user = User {
			id: Uuid::new_v4(),
			name: name.to_string(),
			password_hash: self.hasher.hash(password)?,
		};
		let user_id = user.id;

		self.store.insert(user).await?;
		tracing::info!(%user_id, "registered new user");

		Ok(user_id)
	}

	/// Verify a login attempt
	///
	/// Returns the user id on success. Unknown names and wrong passwords
	/// both fail with [`AuthError::InvalidCredentials`].
	pub async fn verify(&self, name: &str, password: &str) -> Result<Uuid, AuthError> {
		match self.store.get_by_name(name).await {
			Some(user) => {
				if self.hasher.verify(password, &user.password_hash)? {
					Ok(user.id)
				} else {
					tracing::debug!(user_id = %user.id, "password mismatch");
					Err(AuthError::InvalidCredentials)
				}
			}
			None => {
				// Burn the same hashing work as the known-name path so the
				// two failures are observably identical.
				let dummy = self.dummy_hash();
				let _ = self.hasher.verify(password, dummy);
				Err(AuthError::InvalidCredentials)
			}
		}
	}

	/// Rotate a user's password
	///
	/// Re-hashes with a fresh salt; existing sessions are unaffected.
	pub async fn set_password(&self, user_id: Uuid, password: &str) -> Result<(), AuthError> {
		if password.chars().count() < MIN_PASSWORD_LEN {
			return Err(AuthError::WeakPassword);
		}

		let mut user = self.store.get(user_id).await.ok_or(AuthError::UnknownUser)?;
		user.password_hash = self.hasher.hash(password)?;
		self.store.update(user).await?;
		tracing::info!(%user_id, "password rotated");

		Ok(())
	}

	fn dummy_hash(&self) -> &str {
		self.dummy_hash
			.get_or_init(|| self.hasher.hash("rentier-dummy-password").unwrap_or_default())
	}
}
