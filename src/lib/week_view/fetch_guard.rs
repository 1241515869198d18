//! Ordering for overlapping fetches.
//!
//! Every fetch carries a token. Issuing a new token supersedes all earlier
//! ones, and cancelling (page teardown) invalidates everything outstanding,
//! so a late response can never overwrite fresher data.
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use log::{debug, warn};

use crate::grid::models::Section;

use super::models::SectionPage;

#[derive(Debug, Clone, Default)]
pub struct FetchGuard {
    generation: Arc<AtomicU64>,
}

#[derive(Debug, Clone)]
pub struct FetchToken {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl FetchGuard {
    pub fn issue(&self) -> FetchToken {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Issued fetch token {}", generation);
        FetchToken {
            generation,
            current: Arc::clone(&self.generation),
        }
    }

    pub fn cancel(&self) {
        let last = self.generation.fetch_add(1, Ordering::SeqCst);
        debug!("Cancelled fetches up to token {}", last);
    }
}

impl FetchToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }
}

/// The page-level section list. Only ever replaced as a whole.
#[derive(Debug, Default)]
pub struct SectionStore {
    page: SectionPage,
    accepted: Option<u64>,
}

impl SectionStore {
    /// Takes `page` if `token` is still the freshest one; otherwise drops it
    /// and reports `false`.
    pub fn accept(&mut self, token: &FetchToken, page: SectionPage) -> bool {
        if !token.is_current() {
            warn!(
                "Discarding stale response for token {} ({} sections)",
                token.generation(),
                page.sections.len()
            );
            return false;
        }
        self.page = page;
        self.accepted = Some(token.generation());
        true
    }

    pub fn sections(&self) -> &[Section] {
        &self.page.sections
    }

    pub fn owner(&self) -> Option<&str> {
        self.page.owner.as_deref()
    }

    /// Generation of the token whose response is currently held.
    pub fn accepted(&self) -> Option<u64> {
        self.accepted
    }
}
