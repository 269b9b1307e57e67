//! Durable signing secret
//!
//! The session authority signs tokens with a process-wide secret that must
//! survive restarts: a new secret would silently invalidate every session in
//! the wild. The secret is generated once from OS randomness, persisted as
//! an opaque base64 value, and reused on every subsequent startup. It is
//! never rotated automatically.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use once_cell::sync::OnceCell;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Minimum signing secret length in bytes
pub const SECRET_LEN: usize = 32;

/// Secret persistence errors
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
	#[error("secret store I/O error: {0}")]
	Io(#[from] std::io::Error),
	#[error("persisted signing secret is not valid base64")]
	Malformed,
	#[error("signing secret must be at least {SECRET_LEN} bytes")]
	TooShort,
}

/// A signing secret for session tokens
///
/// Wraps at least [`SECRET_LEN`] bytes of cryptographically random key
/// material. The `Debug` impl never prints the bytes.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
	/// Generate a fresh secret from OS randomness
	pub fn generate() -> Self {
		use rand::RngCore;

		let mut bytes = vec![0u8; SECRET_LEN];
		rand::rngs::OsRng.fill_bytes(&mut bytes);
		Self(bytes)
	}

	/// Wrap existing key material; fails if it is shorter than [`SECRET_LEN`]
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, SecretError> {
		if bytes.len() < SECRET_LEN {
			return Err(SecretError::TooShort);
		}
		Ok(Self(bytes.to_vec()))
	}

	/// The raw key material
	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}
}

impl std::fmt::Debug for SigningSecret {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("SigningSecret").field(&"..").finish()
	}
}

/// File-backed secret store
///
/// Persists the signing secret as a single base64 line. First startup
/// generates and writes it with create-new semantics, so two processes
/// racing on an empty data directory cannot clobber each other; every later
/// startup reads the same value back.
///
/// # Examples
///
/// ```
/// use rentier_auth::SecretStore;
///
/// let dir = tempfile::tempdir().unwrap();
/// let store = SecretStore::new(dir.path().join("signing_secret"));
///
/// let first = store.load_or_generate().unwrap();
/// let second = store.load_or_generate().unwrap();
///
/// // The same secret is reused across loads
/// assert_eq!(first.as_bytes(), second.as_bytes());
/// ```
pub struct SecretStore {
	path: PathBuf,
}

impl SecretStore {
	/// Create a secret store backed by the given file path
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// Load the persisted secret, generating and persisting one on first use
	pub fn load_or_generate(&self) -> Result<SigningSecret, SecretError> {
		match fs::read_to_string(&self.path) {
			Ok(contents) => Self::decode(contents.trim()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => self.generate_and_persist(),
			Err(e) => Err(e.into()),
		}
	}

	fn decode(encoded: &str) -> Result<SigningSecret, SecretError> {
		let bytes = STANDARD.decode(encoded).map_err(|_| SecretError::Malformed)?;
		SigningSecret::from_bytes(&bytes)
	}

	fn generate_and_persist(&self) -> Result<SigningSecret, SecretError> {
		let secret = SigningSecret::generate();

		let mut open = fs::OpenOptions::new();
		open.write(true).create_new(true);
		match open.open(&self.path) {
			Ok(mut file) => {
				file.write_all(STANDARD.encode(secret.as_bytes()).as_bytes())?;
				tracing::info!(path = %self.path.display(), "generated new signing secret");
				Ok(secret)
			}
			Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
				// Lost the race to another initializer; use its secret.
				Self::decode(fs::read_to_string(&self.path)?.trim())
			}
			Err(e) => Err(e.into()),
		}
	}
}

static PROCESS_SECRET: OnceCell<SigningSecret> = OnceCell::new();

/// Process-wide signing secret
///
/// Loads (or generates) the secret exactly once per process under a
/// single-writer guard; all subsequent calls return the same instance
/// regardless of the path they pass.
pub fn process_secret(path: &Path) -> Result<&'static SigningSecret, SecretError> {
	PROCESS_SECRET.get_or_try_init(|| SecretStore::new(path).load_or_generate())
}
