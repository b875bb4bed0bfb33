// src/fetch/binding.rs

//! Process-global fetch binding.
//!
//! The decorator in [`tracked`](crate::fetch::tracked) needs none of this;
//! the binding exists for the drop-in path, where call sites go through
//! [`fetch`] and the tracker swaps the implementation underneath them once
//! at start time. Shape of the state:
//!
//! - a single slot holding the current [`Fetch`] implementation, lazily
//!   seeded with [`HttpFetch`] on first use
//! - an install-once guard so repeated `start` calls cannot stack wrappers
//!
//! Both are written during installation and only read afterwards.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use tracing::{debug, info};

use crate::errors::Result;
use crate::fetch::client::{Fetch, FetchError, FetchOptions, FetchResult, HttpFetch};
use crate::fetch::tracked::TrackedFetch;
use crate::report::Reporter;
use crate::types::Resource;

static BINDING: LazyLock<RwLock<Option<Arc<dyn Fetch>>>> = LazyLock::new(|| RwLock::new(None));
static TRACKING_INSTALLED: AtomicBool = AtomicBool::new(false);

/// Fetch through the process-global binding.
///
/// Behaves exactly like calling the bound implementation directly; with
/// tracking installed, network-level failures are additionally reported.
pub async fn fetch(resource: impl Into<Resource>, options: FetchOptions) -> FetchResult {
    let binding = current()?;
    binding.fetch(resource.into(), options).await
}

/// Replace the process-global fetch binding outright.
///
/// Intended for embedding a custom transport (or a test double) underneath
/// the tracker. Set the binding *before* installing tracking: the wrapper
/// decorates whatever is current at install time.
pub fn set_fetch(fetch: Arc<dyn Fetch>) {
    let mut slot = BINDING.write().unwrap_or_else(PoisonError::into_inner);
    *slot = Some(fetch);
}

/// Wrap the current binding in a [`TrackedFetch`] reporting to `reporter`.
///
/// Idempotent: a second installation leaves the existing wrapper in place,
/// so repeated `start` calls are safe.
pub fn install_fetch_tracking(reporter: Reporter) -> Result<()> {
    if TRACKING_INSTALLED.swap(true, Ordering::SeqCst) {
        debug!("fetch tracking already installed; leaving existing wrapper in place");
        return Ok(());
    }

    let inner = match current() {
        Ok(fetch) => fetch,
        Err(err) => {
            // Leave the guard clear so a later start can retry.
            TRACKING_INSTALLED.store(false, Ordering::SeqCst);
            return Err(err.into());
        }
    };

    let tracked: Arc<dyn Fetch> = Arc::new(TrackedFetch::new(inner, reporter));
    set_fetch(tracked);

    info!("fetch tracking installed");
    Ok(())
}

/// Current binding, seeding the default implementation on first use.
fn current() -> std::result::Result<Arc<dyn Fetch>, FetchError> {
    {
        let slot = BINDING.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(fetch) = slot.as_ref() {
            return Ok(Arc::clone(fetch));
        }
    }

    let fresh: Arc<dyn Fetch> =
        Arc::new(HttpFetch::new().map_err(|err| FetchError::Binding(err.to_string()))?);

    let mut slot = BINDING.write().unwrap_or_else(PoisonError::into_inner);
    Ok(Arc::clone(slot.get_or_insert(fresh)))
}
