//! Preview resources for uploaded images.
//!
//! Previews are transient, locally displayable resources (object URLs, thumbnails) created by an
//! external [`PreviewGenerator`]. The [`PreviewTable`] owns the handles per slot and releases a
//! handle explicitly when it is superseded, when the slot is cleared, or when the wizard is torn
//! down.

use indexmap::IndexMap;
use qissa_types::FileHandle;
use thiserror::Error;
use tracing::debug;

/// Opaque reference to a generated preview.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewHandle(pub String);

impl PreviewHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PreviewError {
    #[error("preview generation failed for '{file_name}': {reason}")]
    Generation { file_name: String, reason: String },
}

/// Creates and releases preview resources.
pub trait PreviewGenerator {
    fn create_preview(&self, file: &FileHandle) -> Result<PreviewHandle, PreviewError>;

    fn release_preview(&self, handle: &PreviewHandle);
}

/// A generator that hands out synthetic handles and holds no resources.
/// Useful for previews in tests and headless front ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPreviewGenerator;

impl PreviewGenerator for NoopPreviewGenerator {
    fn create_preview(&self, file: &FileHandle) -> Result<PreviewHandle, PreviewError> {
        Ok(PreviewHandle(format!("preview://{}", file.id)))
    }

    fn release_preview(&self, _handle: &PreviewHandle) {}
}

/// Live preview handles keyed by image slot.
#[derive(Debug, Default)]
pub struct PreviewTable {
    entries: IndexMap<String, PreviewHandle>,
}

impl PreviewTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot_id: &str) -> Option<&PreviewHandle> {
        self.entries.get(slot_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stores `handle` for the slot, releasing whatever it replaces.
    pub fn replace(&mut self, slot_id: &str, handle: PreviewHandle, generator: &dyn PreviewGenerator) {
        if let Some(previous) = self.entries.insert(slot_id.to_string(), handle) {
            debug!(slot = %slot_id, preview = %previous.as_str(), "Releasing superseded preview");
            generator.release_preview(&previous);
        }
    }

    /// Releases the slot's handle, if any.
    pub fn release(&mut self, slot_id: &str, generator: &dyn PreviewGenerator) {
        if let Some(previous) = self.entries.shift_remove(slot_id) {
            debug!(slot = %slot_id, preview = %previous.as_str(), "Releasing preview");
            generator.release_preview(&previous);
        }
    }

    /// Releases every handle. Called on teardown.
    pub fn release_all(&mut self, generator: &dyn PreviewGenerator) {
        for (_, handle) in self.entries.drain(..) {
            generator.release_preview(&handle);
        }
    }
}
