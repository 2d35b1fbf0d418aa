//! Ownership brands carried by entity handles.
//!
//! Every manifest draws a fresh [`Owner`] and stamps it into each handle it
//! mints. Tables compare the stamp before indexing, so a handle from one
//! manifest never resolves against another manifest's tables, even when its
//! index is in range.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of the manifest (or stand-alone table) that minted a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Owner(u64);

impl Owner {
    /// Draw an owner no other live table shares.
    pub(crate) fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}
