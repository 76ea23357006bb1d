//! Error types for cryptographic operations.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Encryption failed.
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed - wrong key or corrupted data.
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// Ciphertext envelope too short or not valid base64.
    #[error("Invalid ciphertext format: {0}")]
    InvalidFormat(String),

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decryption_error_display() {
        let err = CryptoError::Decryption("bad tag".to_string());
        assert!(err.to_string().contains("bad tag"));
    }

    #[test]
    fn test_invalid_format_display() {
        let err = CryptoError::InvalidFormat("truncated".to_string());
        assert!(err.to_string().contains("truncated"));
    }
}
