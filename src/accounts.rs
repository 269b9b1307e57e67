//! Account registration
//!
//! A user and their account profile exist together or not at all, so the
//! two creations are tied into one operation here rather than left to the
//! presentation layer to sequence.

use rentier_auth::{AuthError, CredentialStore, UserStore};
use rentier_ledger::{LedgerError, ProfileService, ProfileStore, validate_email};
use uuid::Uuid;

/// Errors from account-level operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
	#[error(transparent)]
	Auth(#[from] AuthError),
	#[error(transparent)]
	Ledger(#[from] LedgerError),
}

/// Registration service tying credentials and profiles together
///
/// # Examples
///
/// ```
/// use rentier::AccountService;
/// use rentier_auth::{CredentialStore, InMemoryUserStore};
/// use rentier_ledger::{InMemoryProfileStore, ProfileService};
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let accounts = AccountService::new(
/// 	CredentialStore::new(Arc::new(InMemoryUserStore::new())),
/// 	ProfileService::new(Arc::new(InMemoryProfileStore::new())),
/// );
///
/// let user_id = accounts
/// 	.register("alice", "a strong password", "alice@example.com")
/// 	.await
/// 	.unwrap();
///
/// assert_eq!(accounts.profiles().get_profile(user_id).await.unwrap().email, "alice@example.com");
/// # })
/// ```
pub struct AccountService<S: UserStore, P: ProfileStore> {
	credentials: CredentialStore<S>,
	profiles: ProfileService<P>,
}

impl<S: UserStore, P: ProfileStore> AccountService<S, P> {
	/// Create an account service over the two underlying services
	pub fn new(credentials: CredentialStore<S>, profiles: ProfileService<P>) -> Self {
		Self {
			credentials,
			profiles,
		}
	}

	/// Register a new account: user credentials plus their profile
	///
	/// The email is validated up front so a bad address cannot leave a
	/// user behind without a profile. The caller is expected to have
	/// already matched the password against its confirmation field.
	pub async fn register(
		&self,
		name: &str,
		password: &str,
		email: &str,
	) -> Result<Uuid, AccountError> {
		validate_email(email)?;

		let user_id = self.credentials.register(name, password).await?;
		self.profiles.create_profile(user_id, email).await?;
		tracing::info!(%user_id, "account registered");

		Ok(user_id)
	}

	/// The credential store behind this service
	pub fn credentials(&self) -> &CredentialStore<S> {
		&self.credentials
	}

	/// The profile service behind this service
	pub fn profiles(&self) -> &ProfileService<P> {
		&self.profiles
	}
}
