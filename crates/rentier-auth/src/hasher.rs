//! Password hashing
//!
//! Raw passwords never leave this module: they are hashed with a randomized
//! per-user salt on the way in and compared via the algorithm's own
//! constant-time verification on the way out.

use crate::AuthError;

/// Password hasher trait
///
/// Implement this trait to swap in a different hashing algorithm. The
/// default implementation is [`Argon2Hasher`].
///
/// # Examples
///
/// ```
/// use rentier_auth::{Argon2Hasher, PasswordHasher};
///
/// let hasher = Argon2Hasher::new();
/// let hash = hasher.hash("my_secure_password").unwrap();
///
/// assert!(hasher.verify("my_secure_password", &hash).unwrap());
/// assert!(!hasher.verify("wrong_password", &hash).unwrap());
/// ```
pub trait PasswordHasher: Send + Sync {
	/// Hashes a raw password, returning a self-describing PHC string that
	/// embeds the salt and cost parameters.
	fn hash(&self, password: &str) -> Result<String, AuthError>;

	/// Verifies a raw password against a stored hash.
	///
	/// Returns `Ok(true)` on a match, `Ok(false)` on a mismatch, and an
	/// error only when the stored hash itself cannot be parsed.
	fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Argon2id password hasher
///
/// Argon2id is the OWASP-recommended algorithm for password storage; its
/// work factor makes offline brute force impractical and the comparison is
/// constant time.
pub struct Argon2Hasher;

impl Argon2Hasher {
	/// Creates a new argon2 password hasher with the default cost parameters
	pub fn new() -> Self {
		Self
	}
}

impl Default for Argon2Hasher {
	fn default() -> Self {
		Self::new()
	}
}

impl PasswordHasher for Argon2Hasher {
	fn hash(&self, password: &str) -> Result<String, AuthError> {
		use argon2::{
			Argon2,
			password_hash::{PasswordHasher as _, SaltString},
		};
		use rand::RngCore;

		let mut salt_bytes = [0u8; 16];
		rand::rngs::OsRng.fill_bytes(&mut salt_bytes);

		let salt =
			SaltString::encode_b64(&salt_bytes).map_err(|e| AuthError::Hash(e.to_string()))?;

		Argon2::default()
			.hash_password(password.as_bytes(), &salt)
			.map(|hash| hash.to_string())
			.map_err(|e| AuthError::Hash(e.to_string()))
	}

	fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
		use argon2::{
			Argon2,
			password_hash::{PasswordHash, PasswordVerifier},
		};

		let parsed_hash = PasswordHash::new(hash).map_err(|e| AuthError::Hash(e.to_string()))?;

		Ok(Argon2::default()
			.verify_password(password.as_bytes(), &parsed_hash)
			.is_ok())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_hash_embeds_random_salt() {
		let hasher = Argon2Hasher::new();
		let first = hasher.hash("same_password").unwrap();
		let second = hasher.hash("same_password").unwrap();

		// Different salts must produce different PHC strings
		assert_ne!(first, second);
		assert!(hasher.verify("same_password", &first).unwrap());
		assert!(hasher.verify("same_password", &second).unwrap());
	}

	#[test]
	fn test_verify_rejects_wrong_password() {
		let hasher = Argon2Hasher::new();
		let hash = hasher.hash("correct_password").unwrap();

		assert!(!hasher.verify("incorrect_password", &hash).unwrap());
	}

	#[test]
	fn test_verify_malformed_hash_is_error() {
		let hasher = Argon2Hasher::new();

		assert!(hasher.verify("anything", "not-a-phc-string").is_err());
	}
}
