//! Provider registry and selection
//!
//! Holds the configured adapters in priority order. There is no cached
//! "current provider" field: selection is re-evaluated on every query over
//! the adapters' configured flags, so state can never go stale.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{ProviderDescriptor, ServiceStatus};
use crate::provider::amap::AmapProvider;
use crate::provider::tencent::TencentProvider;
use crate::provider::GeoProvider;

/// Ordered collection of provider adapters
///
/// Read-only after construction, so it is safe to share across concurrent
/// in-flight requests without synchronization.
pub struct ProviderRegistry {
    providers: Vec<Box<dyn GeoProvider>>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field(
                "providers",
                &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ProviderRegistry {
    /// Build a registry from an explicit adapter list
    ///
    /// List order is selection priority order.
    pub fn new(providers: Vec<Box<dyn GeoProvider>>) -> Self {
        Self { providers }
    }

    /// Build a registry from configuration
    ///
    /// Adapters are constructed in the configured priority order. No network
    /// calls happen here; an adapter with a missing key is still registered,
    /// it just never gets selected.
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = config.timeout();
        let mut providers: Vec<Box<dyn GeoProvider>> = Vec::new();

        for name in &config.providers.priority {
            let provider: Box<dyn GeoProvider> = match name.as_str() {
                "amap" => Box::new(AmapProvider::new(config.providers.amap.key.clone(), timeout)),
                "tencent" => Box::new(TencentProvider::new(
                    config.providers.tencent.key.clone(),
                    timeout,
                )),
                other => {
                    return Err(Error::Config(format!(
                        "Unknown provider '{}' in priority list. Supported providers: amap, tencent.",
                        other
                    )));
                }
            };
            providers.push(provider);
        }

        Ok(Self::new(providers))
    }

    /// Select the active adapter: the first one in priority order whose
    /// credentials are present
    ///
    /// Deterministic for a given configuration; does not probe liveness.
    pub fn select(&self) -> Option<&dyn GeoProvider> {
        self.providers
            .iter()
            .find(|p| p.is_configured())
            .map(|p| p.as_ref())
    }

    /// Name of the currently active provider, or None when nothing is
    /// configured
    pub fn current_provider(&self) -> Option<&'static str> {
        self.select().map(|p| p.name())
    }

    /// Whether any provider is configured
    pub fn is_available(&self) -> bool {
        self.select().is_some()
    }

    /// Snapshot of all registered providers and the active one
    pub fn status(&self) -> ServiceStatus {
        let providers = self
            .providers
            .iter()
            .map(|p| ProviderDescriptor {
                name: p.name().to_string(),
                configured: p.is_configured(),
            })
            .collect();

        ServiceStatus {
            available: self.is_available(),
            provider: self.current_provider().map(str::to_string),
            providers,
        }
    }
}
