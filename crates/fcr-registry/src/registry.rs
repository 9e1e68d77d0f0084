//! # Registry Bundle
//!
//! Builds a facility registry and a compliance registry that share one
//! [`AdminGate`] and one [`HeightSource`]. An admin transfer made through
//! either side is seen by both.

use std::sync::Arc;

use fcr_core::{AdminIdentity, HeightSource, Principal, RegistryConfig, RegistryError};

use crate::compliance::ComplianceRegistry;
use crate::facility::FacilityRegistry;
use crate::gate::AdminGate;

/// Facility and compliance registries behind a single admin.
#[derive(Debug, Clone)]
pub struct Registry {
    gate: Arc<AdminGate>,
    heights: Arc<dyn HeightSource>,
    facilities: FacilityRegistry,
    compliance: ComplianceRegistry,
}

impl Registry {
    /// Build both registries around a fresh gate for `admin`.
    pub fn new(admin: AdminIdentity, heights: Arc<dyn HeightSource>) -> Self {
        let gate = Arc::new(AdminGate::new(admin));
        Self {
            facilities: FacilityRegistry::new(Arc::clone(&gate)),
            compliance: ComplianceRegistry::new(Arc::clone(&gate), Arc::clone(&heights)),
            gate,
            heights,
        }
    }

    /// Build from configuration.
    pub fn from_config(config: &RegistryConfig) -> Self {
        tracing::debug!(admin = %config.admin, height = %config.height, "building registry");
        Self::new(config.admin.clone(), config.height.build())
    }

    /// The facility side.
    pub fn facilities(&self) -> &FacilityRegistry {
        &self.facilities
    }

    /// The compliance side.
    pub fn compliance(&self) -> &ComplianceRegistry {
        &self.compliance
    }

    /// The shared gate.
    pub fn gate(&self) -> &Arc<AdminGate> {
        &self.gate
    }

    /// The shared height source.
    pub fn heights(&self) -> &Arc<dyn HeightSource> {
        &self.heights
    }

    /// The current admin.
    pub fn admin(&self) -> AdminIdentity {
        self.gate.admin()
    }

    /// Hand the admin role of both registries to `new_admin`.
    pub fn transfer_admin(
        &self,
        new_admin: AdminIdentity,
        caller: &Principal,
    ) -> Result<(), RegistryError> {
        self.gate.transfer_admin(new_admin, caller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcr_core::{BlockHeight, HeightConfig};

    #[test]
    fn test_transfer_applies_to_both_sides() {
        let admin = AdminIdentity::new("admin").unwrap();
        let next = AdminIdentity::new("next").unwrap();
        let config = RegistryConfig {
            admin: admin.clone(),
            height: HeightConfig::Manual { start: 5 },
        };
        let registry = Registry::from_config(&config);

        registry
            .facilities()
            .transfer_admin(next.clone(), admin.as_principal())
            .unwrap();
        assert_eq!(registry.admin(), next);

        assert!(registry
            .compliance()
            .add_requirement("req-1", "T", "D", Vec::new(), admin.as_principal())
            .is_err());
        registry
            .compliance()
            .add_requirement("req-1", "T", "D", Vec::new(), next.as_principal())
            .unwrap();
        assert_eq!(
            registry.compliance().get_requirement("req-1").unwrap().created_at,
            BlockHeight(5)
        );
    }

    #[test]
    fn test_clones_share_state() {
        let admin = AdminIdentity::new("admin").unwrap();
        let registry = Registry::from_config(&RegistryConfig::new(admin.clone()));
        let handle = registry.clone();

        handle
            .facilities()
            .register_facility("f-1", "Plant", "Here", admin.as_principal())
            .unwrap();
        assert!(registry.facilities().get_facility("f-1").is_some());
    }
}
