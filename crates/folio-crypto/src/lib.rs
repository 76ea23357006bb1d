//! # folio-crypto
//!
//! Cryptographic primitives for folio protected notes.
//!
//! Protected note content is encrypted at rest with AES-256-GCM and only
//! ever decrypted in memory, inside an unlocked session. This crate
//! provides the envelope cipher and the session type the search layer
//! consumes through the [`folio_core::ProtectedSession`] trait.

pub mod cipher;
pub mod error;
pub mod session;

pub use cipher::{decrypt_envelope, encrypt_envelope, generate_nonce, generate_random, NONCE_LEN};
pub use error::{CryptoError, CryptoResult};
pub use session::StaticKeySession;
