//! Collaborator traits consumed by the search subsystem.
//!
//! The note store and the protected-session (encryption) subsystem are
//! external; the indexer only sees them through these interfaces.

use async_trait::async_trait;

use crate::models::Note;
use crate::Result;

/// Read-only access to the note store.
///
/// Implementations join note metadata with blob content; the indexer never
/// mutates notes.
#[async_trait]
pub trait NoteSource: Send + Sync {
    /// Fetch a single note with its content, or `None` if absent.
    async fn get_note(&self, note_id: &str) -> Result<Option<Note>>;

    /// Fetch protected, non-deleted, indexable-type notes, optionally
    /// restricted to a note-ID scope. Content is returned as ciphertext.
    async fn fetch_protected_notes(&self, scope: Option<&[String]>) -> Result<Vec<Note>>;
}

/// Capability handle for the protected (encrypted) note session.
///
/// Decryption is transient: callers must discard plaintext as soon as
/// matching is done and must never persist it in any index or cache.
pub trait ProtectedSession: Send + Sync {
    /// Whether the user has an active protected session (notes unlocked).
    fn is_available(&self) -> bool;

    /// Decrypt a ciphertext string. Returns `None` on any failure — a
    /// note that cannot be decrypted simply does not match.
    fn decrypt_string(&self, ciphertext: &str) -> Option<String>;
}

/// Null session: protected notes stay locked.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProtectedSession;

impl ProtectedSession for NoProtectedSession {
    fn is_available(&self) -> bool {
        false
    }

    fn decrypt_string(&self, _ciphertext: &str) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_session_is_unavailable() {
        let session = NoProtectedSession;
        assert!(!session.is_available());
        assert!(session.decrypt_string("anything").is_none());
    }
}
