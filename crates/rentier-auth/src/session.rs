//! Signed session tokens
//!
//! A session token is base64url over `user_id:issued_at:nonce:signature`,
//! where the signature is HMAC-SHA256 under the process signing secret. The
//! token is opaque to its holder and carries only the user id; tampering
//! with any part invalidates the signature.

use crate::secret::SigningSecret;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::HashSet;
use std::sync::RwLock;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Opaque session token handed to callers
pub type SessionToken = String;

/// Session resolution errors
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
	/// The token is absent, malformed, forged, or was destroyed.
	#[error("no active session")]
	NoSession,
}

/// Session authority
///
/// Issues and validates signed session tokens. Token verification is
/// read-only and safe under unlimited concurrent callers; the signing
/// secret is injected at construction and never changes afterwards.
///
/// # Examples
///
/// ```
/// use rentier_auth::{SessionAuthority, SigningSecret};
/// use uuid::Uuid;
///
/// let authority = SessionAuthority::new(SigningSecret::generate());
/// let user_id = Uuid::new_v4();
///
/// let token = authority.create_session(user_id);
/// assert_eq!(authority.resolve_session(&token).unwrap(), user_id);
///
/// authority.destroy_session(&token);
/// assert!(authority.resolve_session(&token).is_err());
/// ```
pub struct SessionAuthority {
	secret: SigningSecret,
	revoked: RwLock<HashSet<SessionToken>>,
}

impl SessionAuthority {
	/// Create a session authority signing with the given secret
	pub fn new(secret: SigningSecret) -> Self {
		Self {
			secret,
			revoked: RwLock::new(HashSet::new()),
		}
	}

	/// Issue a session token bound to a user id
	///
	/// The nonce makes every token unique, so two sessions for the same
	/// user can be destroyed independently.
	pub fn create_session(&self, user_id: Uuid) -> SessionToken {
		let issued_at = Utc::now().timestamp();
		let nonce = Uuid::new_v4().simple().to_string();

		let payload = format!("{}:{}:{}", user_id, issued_at, nonce);
		let signature = hex::encode(self.sign(payload.as_bytes()));

		URL_SAFE_NO_PAD.encode(format!("{}:{}", payload, signature).as_bytes())
	}

	/// Resolve a token back to the user id it was issued for
	///
	/// Fails with [`SessionError::NoSession`] if the token is malformed,
	/// carries a bad signature, or was destroyed.
	pub fn resolve_session(&self, token: &str) -> Result<Uuid, SessionError> {
		let decoded = URL_SAFE_NO_PAD
			.decode(token)
			.map_err(|_| SessionError::NoSession)?;
		let contents = String::from_utf8(decoded).map_err(|_| SessionError::NoSession)?;

		// user_id:issued_at:nonce:signature
		let parts: Vec<&str> = contents.splitn(4, ':').collect();
		if parts.len() != 4 {
			return Err(SessionError::NoSession);
		}

		let user_id: Uuid = parts[0].parse().map_err(|_| SessionError::NoSession)?;
		let _issued_at: i64 = parts[1].parse().map_err(|_| SessionError::NoSession)?;
		let signature = hex::decode(parts[3]).map_err(|_| SessionError::NoSession)?;

		let payload = format!("{}:{}:{}", parts[0], parts[1], parts[2]);
		let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
			.expect("HMAC accepts any key length");
		mac.update(payload.as_bytes());
		mac.verify_slice(&signature)
			.map_err(|_| SessionError::NoSession)?;

		let revoked = self.revoked.read().unwrap_or_else(|e| e.into_inner());
		if revoked.contains(token) {
			return Err(SessionError::NoSession);
		}

		Ok(user_id)
	}

	/// Destroy a session
	///
	/// Idempotent and infallible: destroying an unknown, malformed, or
	/// already-destroyed token is a no-op. A genuine token stops resolving.
	pub fn destroy_session(&self, token: &str) {
		// Only authentic tokens enter the revocation set; forged input can
		// never resolve, so remembering it would only grow the set.
		let already_revoked = {
			let revoked = self.revoked.read().unwrap_or_else(|e| e.into_inner());
			revoked.contains(token)
		};
		if already_revoked || self.verify_signature(token) {
			let mut revoked = self.revoked.write().unwrap_or_else(|e| e.into_inner());
			revoked.insert(token.to_string());
		}
	}

	fn verify_signature(&self, token: &str) -> bool {
		let Ok(decoded) = URL_SAFE_NO_PAD.decode(token) else {
			return false;
		};
		let Ok(contents) = String::from_utf8(decoded) else {
			return false;
		};
		let parts: Vec<&str> = contents.splitn(4, ':').collect();
		if parts.len() != 4 {
			return false;
		}
		let Ok(signature) = hex::decode(parts[3]) else {
			return false;
		};

		let payload = format!("{}:{}:{}", parts[0], parts[1], parts[2]);
		let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
			.expect("HMAC accepts any key length");
		mac.update(payload.as_bytes());
		mac.verify_slice(&signature).is_ok()
	}

	fn sign(&self, message: &[u8]) -> Vec<u8> {
		let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
			.expect("HMAC accepts any key length");
		mac.update(message);
		mac.finalize().into_bytes().to_vec()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn authority() -> SessionAuthority {
		SessionAuthority::new(SigningSecret::generate())
	}

	#[test]
	fn test_create_and_resolve_roundtrip() {
		let authority = authority();
		let user_id = Uuid::new_v4();

		let token = authority.create_session(user_id);

		assert_eq!(authority.resolve_session(&token).unwrap(), user_id);
	}

	#[test]
	fn test_token_is_opaque_to_holder() {
		let authority = authority();
		let user_id = Uuid::new_v4();

		let token = authority.create_session(user_id);

		// The raw uuid must not be visible in the token itself
		assert!(!token.contains(&user_id.to_string()));
	}

	#[rstest]
	#[case("")]
	#[case("not-a-token")]
	#[case("bm90OmE6dmFsaWQ6dG9rZW4")]
	fn test_resolve_malformed_token(#[case] token: &str) {
		let authority = authority();

		assert_eq!(
			authority.resolve_session(token).unwrap_err(),
			SessionError::NoSession
		);
	}

	#[test]
	fn test_tampered_token_is_rejected() {
		let authority = authority();
		let token = authority.create_session(Uuid::new_v4());

		let mut tampered = token.clone();
		tampered.push('A');

		assert!(authority.resolve_session(&tampered).is_err());
	}

	#[test]
	fn test_token_from_other_secret_is_rejected() {
		let issuing = authority();
		let other = authority();

		let token = issuing.create_session(Uuid::new_v4());

		assert!(other.resolve_session(&token).is_err());
	}

	#[test]
	fn test_destroy_session_is_idempotent() {
		let authority = authority();
		let token = authority.create_session(Uuid::new_v4());

		authority.destroy_session(&token);
		authority.destroy_session(&token);
		authority.destroy_session("never-was-a-token");

		assert!(authority.resolve_session(&token).is_err());
	}

	#[test]
	fn test_destroying_one_session_leaves_others() {
		let authority = authority();
		let user_id = Uuid::new_v4();

		let first = authority.create_session(user_id);
		let second = authority.create_session(user_id);
		authority.destroy_session(&first);

		assert!(authority.resolve_session(&first).is_err());
		assert_eq!(authority.resolve_session(&second).unwrap(), user_id);
	}
}
