//! AES-256-GCM cipher operations over the protected-note envelope.
//!
//! Protected note content is stored as base64 of `nonce || ciphertext`,
//! where the ciphertext carries the 16-byte GCM authentication tag at the
//! end. A fresh random nonce is drawn per encryption.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;

use crate::error::{CryptoError, CryptoResult};

/// GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// Generate cryptographically secure random bytes.
pub fn generate_random<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

/// Generate a random nonce (12 bytes).
pub fn generate_nonce() -> [u8; NONCE_LEN] {
    generate_random()
}

/// Encrypt a plaintext string into the protected-note envelope.
///
/// Returns base64 of `nonce || ciphertext` with the authentication tag
/// appended to the ciphertext.
pub fn encrypt_envelope(key: &[u8; 32], plaintext: &str) -> CryptoResult<String> {
    let cipher =
        Aes256Gcm::new_from_slice(key).map_err(|e| CryptoError::Encryption(e.to_string()))?;

    let nonce_bytes = generate_nonce();
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|_| CryptoError::Encryption("AES-GCM encryption failed".into()))?;

    let mut envelope = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    envelope.extend_from_slice(&nonce_bytes);
    envelope.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(envelope))
}

/// Decrypt a protected-note envelope back to its plaintext string.
///
/// Fails on malformed base64, a truncated envelope, a wrong key, or a
/// tampered ciphertext (authentication tag mismatch).
pub fn decrypt_envelope(key: &[u8; 32], envelope: &str) -> CryptoResult<String> {
    let bytes = BASE64
        .decode(envelope)
        .map_err(|e| CryptoError::InvalidFormat(format!("bad base64: {e}")))?;

    if bytes.len() < NONCE_LEN {
        return Err(CryptoError::InvalidFormat(format!(
            "envelope too short: {} bytes",
            bytes.len()
        )));
    }
    let (nonce_bytes, ciphertext) = bytes.split_at(NONCE_LEN);

    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|_| CryptoError::Decryption("Invalid key".to_string()))?;

    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| CryptoError::Decryption("AES-GCM decryption failed".to_string()))?;

    String::from_utf8(plaintext)
        .map_err(|_| CryptoError::Decryption("plaintext is not valid UTF-8".to_string()))
}
