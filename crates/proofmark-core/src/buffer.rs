//! Transient artifact buffers
//!
//! Every in-flight artifact (the fetched photo ID, the filled form, the
//! consent letter) lives in exactly one [`TransientBuffer`], owned by the
//! orchestrator for the duration of a run. The deletion engine overwrites
//! the contents with zeros before the buffer is released; the buffer also
//! wipes itself on drop so error paths cannot leak plaintext into freed
//! memory.

use zeroize::Zeroize;

/// Artifact label for the uploaded identity document.
pub const LABEL_PHOTO_ID: &str = "photo_id";
/// Artifact label for the filled official form.
pub const LABEL_FILLED_FORM: &str = "filled_form";
/// Artifact label for the generated consent letter.
pub const LABEL_CONSENT_LETTER: &str = "consent_letter";

/// A named, owned byte buffer holding one artifact.
#[derive(Debug)]
pub struct TransientBuffer {
    label: String,
    bytes: Vec<u8>,
}

impl TransientBuffer {
    /// Take ownership of artifact bytes under a label.
    pub fn new(label: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            label: label.into(),
            bytes,
        }
    }

    /// The artifact label, e.g. `photo_id`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Borrow the contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes held.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Overwrite the contents with zero bytes, in place. The length is
    /// preserved so tests can observe that wiping actually happened.
    pub fn wipe(&mut self) {
        // Zeroize the slice, not the Vec: Vec::zeroize also clears the
        // length, which would hide whether the overwrite happened
        self.bytes.as_mut_slice().zeroize();
    }

    /// True when every byte is zero. Vacuously true for an empty buffer.
    pub fn is_wiped(&self) -> bool {
        self.bytes.iter().all(|b| *b == 0)
    }
}

impl Drop for TransientBuffer {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}
