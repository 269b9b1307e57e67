//! Account profiles
//!
//! One-to-one user metadata: contact email, the avatar reference derived
//! from it, and an optional tax rate. Created together with the user at
//! registration, never independently.

use crate::LedgerError;
use crate::models::{Profile, ProfileUpdate};
use crate::store::ProfileStore;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

/// Derive the avatar reference for an email address
///
/// Stable hash of the trimmed, lowercased address, embedded in a gravatar
/// lookup URL. Two spellings of the same address map to the same avatar.
///
/// # Examples
///
/// ```
/// use rentier_ledger::avatar_reference;
///
/// let reference = avatar_reference("Alice@Example.com ");
///
/// assert_eq!(reference, avatar_reference("alice@example.com"));
/// assert!(reference.starts_with("https://gravatar.com/avatar/"));
/// ```
pub fn avatar_reference(email: &str) -> String {
	let normalized = email.trim().to_lowercase();
	let digest = Sha256::digest(normalized.as_bytes());
	format!("https://gravatar.com/avatar/{}", hex::encode(digest))
}

/// Account profile service
pub struct ProfileService<S: ProfileStore> {
	profiles: Arc<S>,
}

impl<S: ProfileStore> ProfileService<S> {
	/// Create a profile service over the given store
	pub fn new(profiles: Arc<S>) -> Self {
		Self { profiles }
	}

	/// Create a user's profile
	///
	/// Computes the avatar reference from the email at creation time.
	/// Fails with [`LedgerError::DuplicateProfile`] if the user already
	/// has one.
	pub async fn create_profile(&self, user_id: Uuid, email: &str) -> Result<Uuid, LedgerError> {
		validate_email(email)?;

		let profile = Profile {
			id: Uuid::new_v4(),
			user_id,
			email: email.to_string(),
			avatar_reference: avatar_reference(email),
			tax_rate: None,
		};
		let profile_id = profile.id;

		self.profiles.insert(profile).await?;
		tracing::debug!(%user_id, "profile created");

		Ok(profile_id)
	}

	/// Look up a user's profile
	pub async fn get_profile(&self, user_id: Uuid) -> Result<Profile, LedgerError> {
		self.profiles
			.get_by_user(user_id)
			.await
			.ok_or(LedgerError::ProfileNotFound)
	}

	/// Partially update a user's profile
	///
	/// The avatar reference is recomputed whenever the email changes, so
	/// the stored reference always derives from the current address.
	pub async fn update_profile(
		&self,
		user_id: Uuid,
		update: ProfileUpdate,
	) -> Result<Profile, LedgerError> {
		let mut profile = self.get_profile(user_id).await?;

		if let Some(email) = update.email {
			validate_email(&email)?;
			if email != profile.email {
				profile.avatar_reference = avatar_reference(&email);
			}
			profile.email = email;
		}
		if let Some(tax_rate) = update.tax_rate {
			if tax_rate > 100 {
				return Err(LedgerError::validation(
					"tax",
					"tax rate is a percentage between 0 and 100",
				));
			}
			profile.tax_rate = Some(tax_rate);
		}

		self.profiles.update(profile.clone()).await?;
		Ok(profile)
	}
}

/// Check that an email address is usable as a profile contact
///
/// Deliberately loose: the ledger only needs something deliverable enough
/// to derive an avatar from, not full RFC 5322 conformance.
pub fn validate_email(email: &str) -> Result<(), LedgerError> {
	let email = email.trim();
	if email.is_empty() || !email.contains('@') {
		return Err(LedgerError::validation(
			"email",
			"a contact email address is required",
		));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::store::InMemoryProfileStore;
	use rstest::rstest;

	fn service() -> ProfileService<InMemoryProfileStore> {
		ProfileService::new(Arc::new(InMemoryProfileStore::new()))
	}

	#[tokio::test]
	async fn test_create_profile_derives_avatar() {
		let service = service();
		let user_id = Uuid::new_v4();

		service
			.create_profile(user_id, "alice@example.com")
			.await
			.unwrap();

		let profile = service.get_profile(user_id).await.unwrap();
		assert_eq!(profile.avatar_reference, avatar_reference("alice@example.com"));
		assert_eq!(profile.tax_rate, None);
	}

	#[tokio::test]
	async fn test_second_profile_for_user_is_rejected() {
		let service = service();
		let user_id = Uuid::new_v4();
		service
			.create_profile(user_id, "alice@example.com")
			.await
			.unwrap();

		let err = service
			.create_profile(user_id, "other@example.com")
			.await
			.unwrap_err();

		assert_eq!(err, LedgerError::DuplicateProfile);
	}

	#[rstest]
	#[case("")]
	#[case("   ")]
	#[case("no-at-sign")]
	#[tokio::test]
	async fn test_invalid_email_is_rejected(#[case] email: &str) {
		let service = service();

		let err = service
			.create_profile(Uuid::new_v4(), email)
			.await
			.unwrap_err();

		assert!(matches!(err, LedgerError::Validation { field: "email", .. }));
	}

	#[tokio::test]
	async fn test_email_change_recomputes_avatar() {
		let service = service();
		let user_id = Uuid::new_v4();
		service
			.create_profile(user_id, "alice@example.com")
			.await
			.unwrap();

		let updated = service
			.update_profile(
				user_id,
				ProfileUpdate {
					email: Some("alice@new-domain.com".to_string()),
					..Default::default()
				},
			)
			.await
			.unwrap();

		assert_eq!(updated.email, "alice@new-domain.com");
		assert_eq!(
			updated.avatar_reference,
			avatar_reference("alice@new-domain.com")
		);
	}

	#[tokio::test]
	async fn test_tax_rate_update_leaves_avatar_alone() {
		let service = service();
		let user_id = Uuid::new_v4();
		service
			.create_profile(user_id, "alice@example.com")
			.await
			.unwrap();
		let before = service.get_profile(user_id).await.unwrap().avatar_reference;

		let updated = service
			.update_profile(
				user_id,
				ProfileUpdate {
					tax_rate: Some(25),
					..Default::default()
				},
			)
			.await
			.unwrap();

		assert_eq!(updated.tax_rate, Some(25));
		assert_eq!(updated.avatar_reference, before);
	}

	#[tokio::test]
	async fn test_update_without_profile_is_error() {
		let service = service();

		let err = service
			.update_profile(Uuid::new_v4(), ProfileUpdate::default())
			.await
			.unwrap_err();

		assert_eq!(err, LedgerError::ProfileNotFound);
	}

	#[tokio::test]
	async fn test_out_of_range_tax_rate() {
		let service = service();
		let user_id = Uuid::new_v4();
		service
			.create_profile(user_id, "alice@example.com")
			.await
			.unwrap();

		let err = service
			.update_profile(
				user_id,
				ProfileUpdate {
					tax_rate: Some(101),
					..Default::default()
				},
			)
			.await
			.unwrap_err();

		assert!(matches!(err, LedgerError::Validation { field: "tax", .. }));
	}
}
