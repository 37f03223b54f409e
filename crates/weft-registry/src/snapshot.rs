//! Layer 9: Snapshot handle
//!
//! A zero-copy reference to one published bundle. Cheap to clone, safe to
//! hand across threads, never reflects later mutations; the bundle is
//! reclaimed when the last holder drops.

use std::ops::Deref;
use std::sync::Arc;

use super::identity::Revision;
use super::state::RegistryState;

/// Read-only view of the registry at one revision.
///
/// Derefs to [`RegistryState`], so the whole query surface is available
/// without any locking.
#[derive(Clone, Debug)]
pub struct Snapshot {
    state: Arc<RegistryState>,
}

impl Snapshot {
    pub(crate) fn new(state: Arc<RegistryState>) -> Self {
        Self { state }
    }

    pub fn revision(&self) -> Revision {
        self.state.revision()
    }
}

impl Deref for Snapshot {
    type Target = RegistryState;

    fn deref(&self) -> &RegistryState {
        &self.state
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new(Arc::new(RegistryState::new()))
    }
}
