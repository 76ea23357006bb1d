//! Protected session key material.
//!
//! A session holds the data key unlocked by the user and exposes only the
//! narrow decrypt surface the search layer needs. Failed decryptions come
//! back as `None`: per-note failures are expected when notes were encrypted
//! under an older key, and must never abort a scan.

use zeroize::Zeroizing;

use folio_core::ProtectedSession;

use crate::cipher::{decrypt_envelope, encrypt_envelope};
use crate::error::CryptoResult;

/// A protected session backed by an in-memory data key.
///
/// The key is zeroized on drop.
pub struct StaticKeySession {
    key: Zeroizing<[u8; 32]>,
}

impl StaticKeySession {
    /// Create a session from a raw 256-bit data key.
    pub fn new(key: [u8; 32]) -> Self {
        Self {
            key: Zeroizing::new(key),
        }
    }

    /// Encrypt a plaintext string under this session's key.
    pub fn encrypt_string(&self, plaintext: &str) -> CryptoResult<String> {
        encrypt_envelope(&self.key, plaintext)
    }
}

impl ProtectedSession for StaticKeySession {
    fn is_available(&self) -> bool {
        true
    }

    fn decrypt_string(&self, ciphertext: &str) -> Option<String> {
        match decrypt_envelope(&self.key, ciphertext) {
            Ok(plaintext) => Some(plaintext),
            Err(e) => {
                tracing::debug!(
                    subsystem = "crypto",
                    component = "session",
                    error = %e,
                    "envelope decryption failed"
                );
                None
            }
        }
    }
}
