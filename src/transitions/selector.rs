use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tracing::debug;

use super::catalog::{TransitionCatalog, TransitionDescriptor};
use super::AUTO_MIX;

/// Resolves a transition mode into the concrete transition for one boundary
///
/// The random source is injected so auto-mix sequences can be reproduced.
pub struct TransitionSelector {
    rng: Box<dyn RngCore + Send>,
}

impl TransitionSelector {
    /// Selector backed by an entropy-seeded generator
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Selector with a deterministic sequence
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng<R: RngCore + Send + 'static>(rng: R) -> Self {
        Self { rng: Box::new(rng) }
    }

    /// Resolve `mode` against `catalog`
    ///
    /// A concrete id is returned unchanged, an unknown id falls back to the
    /// catalog default, and `auto-mix` draws uniformly from the catalog.
    /// Draws are independent; the same transition may repeat.
    pub fn resolve<'c>(&mut self, mode: &str, catalog: &'c TransitionCatalog) -> &'c TransitionDescriptor {
        if mode == AUTO_MIX && !catalog.is_empty() {
            let index = self.rng.gen_range(0..catalog.len());
            let picked = &catalog.entries()[index];
            debug!("auto-mix picked {}", picked.id);
            return picked;
        }

        match catalog.get(mode) {
            Some(descriptor) => descriptor,
            None => {
                if mode != AUTO_MIX {
                    debug!("Unknown transition '{}', using default", mode);
                }
                catalog.default_entry()
            }
        }
    }

    /// Convenience returning only the id
    pub fn resolve_id(&mut self, mode: &str, catalog: &TransitionCatalog) -> &'static str {
        self.resolve(mode, catalog).id
    }
}

impl Default for TransitionSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TransitionSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionSelector").finish_non_exhaustive()
    }
}
