//! Engine-level configuration. Governs how `reachable`/`plans` *run*, not
//! what they compute — the algorithmic inputs (`NodeSpec`/`Application`)
//! stay config-free, per spec.md §6. See SPEC_FULL.md §4.3.

use serde::{Deserialize, Serialize};

/// Operational knobs for the reachability search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Safety cap on the number of reachable states explored. `None`
    /// (the default) means unbounded — the caller is trusted to have a
    /// finite, reasonably-sized topology. When set, `reachable_with_config`
    /// returns `SpecInvalid::TooManyStates` instead of iterating forever
    /// on a miswired topology (e.g. one with accidental non-determinism
    /// introduced upstream of this crate).
    pub max_reachable_states: Option<usize>,

    /// Whether `reachable` emits a `trace!` event per expanded state.
    /// Default `true`; large graphs under heavy tracing may want it off.
    pub log_expansion: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_reachable_states: None,
            log_expansion: true,
        }
    }
}

#[cfg(feature = "config-file")]
impl EngineConfig {
    /// Load an `EngineConfig` from a TOML file, falling back to defaults
    /// for any field the file omits.
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        #[derive(Deserialize, Default)]
        struct Partial {
            max_reachable_states: Option<usize>,
            log_expansion: Option<bool>,
        }
        let partial: Partial = toml::from_str(contents)?;
        let defaults = EngineConfig::default();
        Ok(EngineConfig {
            max_reachable_states: partial.max_reachable_states.or(defaults.max_reachable_states),
            log_expansion: partial.log_expansion.unwrap_or(defaults.log_expansion),
        })
    }
}
