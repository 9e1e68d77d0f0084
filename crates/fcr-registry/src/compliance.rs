//! # Compliance Registry
//!
//! Stores regulatory requirement definitions and per-product compliance
//! evidence.
//!
//! ## Access model
//!
//! | Operation                     | Caller check |
//! |-------------------------------|--------------|
//! | `add_requirement`             | admin only   |
//! | `update_product_compliance`   | none         |
//! | every read                    | none         |
//!
//! Any party may submit compliance evidence for a product through
//! `update_product_compliance`. The only precondition is that the
//! referenced requirement exists.
//!
//! ## Records
//!
//! Requirements are immutable once added and are never removed, so a
//! compliance record can never reference a missing requirement. Compliance
//! records are upserted: a second submission for the same
//! `(product, requirement)` replaces the document list and stamp outright.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use fcr_core::{
    BlockHeight, ComplianceKey, HeightSource, Principal, ProductId, RecordKind, RegistryError,
    RequirementId,
};

use crate::gate::AdminGate;
use crate::store::Store;

/// A regulatory requirement definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegulatoryRequirement {
    /// Short title, e.g. "ISO 9001".
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Document-type labels a product is expected to submit, in order.
    pub required_documents: Vec<String>,
    /// Always true; no deactivation operation exists.
    pub active: bool,
    /// Height at which the requirement was added.
    pub created_at: BlockHeight,
}

/// Compliance evidence for one `(product, requirement)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductComplianceRecord {
    /// Always true for an existing record.
    pub compliant: bool,
    /// Submitted document identifiers, in submission order.
    pub documents: Vec<String>,
    /// Height of the latest submission.
    pub last_updated: BlockHeight,
}

/// Requirement definitions and product compliance records.
///
/// Cheap to clone; clones share all state.
#[derive(Debug, Clone)]
pub struct ComplianceRegistry {
    gate: Arc<AdminGate>,
    heights: Arc<dyn HeightSource>,
    requirements: Store<RequirementId, RegulatoryRequirement>,
    compliance: Store<ComplianceKey, ProductComplianceRecord>,
}

impl ComplianceRegistry {
    /// Create an empty registry guarded by `gate`, stamping records from
    /// `heights`.
    pub fn new(gate: Arc<AdminGate>, heights: Arc<dyn HeightSource>) -> Self {
        Self {
            gate,
            heights,
            requirements: Store::new(),
            compliance: Store::new(),
        }
    }

    /// The gate guarding requirement definitions.
    pub fn gate(&self) -> &Arc<AdminGate> {
        &self.gate
    }

    /// The source records are stamped from.
    pub fn heights(&self) -> &Arc<dyn HeightSource> {
        &self.heights
    }

    /// Define a new requirement.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if `caller` is not the admin.
    /// - `AlreadyExists` if `id` is taken; the existing definition is untouched.
    pub fn add_requirement(
        &self,
        id: impl Into<RequirementId>,
        title: impl Into<String>,
        description: impl Into<String>,
        required_documents: Vec<String>,
        caller: &Principal,
    ) -> Result<(), RegistryError> {
        let _admin = self.gate.authorize(caller)?;
        let id = id.into();
        let created_at = self.heights.current();
        let requirement = RegulatoryRequirement {
            title: title.into(),
            description: description.into(),
            required_documents,
            active: true,
            created_at,
        };
        if !self.requirements.insert_new(id.clone(), requirement) {
            return Err(RegistryError::already_exists(RecordKind::Requirement, &id));
        }
        tracing::debug!(requirement_id = %id, height = %created_at, "requirement added");
        Ok(())
    }

    /// Record that `product_id` satisfies `requirement_id` with `documents`.
    ///
    /// Open to any caller. Overwrites any earlier record for the pair.
    ///
    /// # Errors
    ///
    /// `NotFound` if the requirement does not exist; nothing is written.
    pub fn update_product_compliance(
        &self,
        product_id: impl Into<ProductId>,
        requirement_id: &str,
        documents: Vec<String>,
    ) -> Result<(), RegistryError> {
        if !self.requirements.contains(requirement_id) {
            return Err(RegistryError::not_found(
                RecordKind::Requirement,
                requirement_id,
            ));
        }
        let key = ComplianceKey::new(product_id, requirement_id);
        let last_updated = self.heights.current();
        let previous = self.compliance.upsert(
            key.clone(),
            ProductComplianceRecord {
                compliant: true,
                documents,
                last_updated,
            },
        );
        tracing::debug!(
            product_id = %key.product_id,
            requirement_id = %key.requirement_id,
            height = %last_updated,
            replaced = previous.is_some(),
            "product compliance updated"
        );
        Ok(())
    }

    /// Whether a product is compliant with a requirement.
    ///
    /// # Errors
    ///
    /// `NotFound` if no compliance record exists for the pair.
    pub fn is_product_compliant(
        &self,
        product_id: &str,
        requirement_id: &str,
    ) -> Result<bool, RegistryError> {
        let key = ComplianceKey::new(product_id, requirement_id);
        self.compliance
            .get(&key)
            .map(|record| record.compliant)
            .ok_or_else(|| RegistryError::not_found(RecordKind::ProductCompliance, &key))
    }

    /// Look up a requirement.
    pub fn get_requirement(&self, id: &str) -> Option<RegulatoryRequirement> {
        self.requirements.get(id)
    }

    /// Look up the compliance record for a pair.
    pub fn get_product_compliance(
        &self,
        product_id: &str,
        requirement_id: &str,
    ) -> Option<ProductComplianceRecord> {
        self.compliance
            .get(&ComplianceKey::new(product_id, requirement_id))
    }

    /// All requirements, ordered by id.
    pub fn list_requirements(&self) -> Vec<(RequirementId, RegulatoryRequirement)> {
        let mut all = self.requirements.entries();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    /// Every compliance record held for `product_id`, ordered by
    /// requirement id.
    pub fn compliance_for_product(
        &self,
        product_id: &str,
    ) -> Vec<(RequirementId, ProductComplianceRecord)> {
        let mut records: Vec<_> = self
            .compliance
            .filter(|key, _| key.product_id.as_str() == product_id)
            .into_iter()
            .map(|(key, record)| (key.requirement_id, record))
            .collect();
        records.sort_by(|a, b| a.0.cmp(&b.0));
        records
    }

    /// Number of requirement definitions.
    pub fn requirement_count(&self) -> usize {
        self.requirements.len()
    }

    /// Number of compliance records.
    pub fn compliance_record_count(&self) -> usize {
        self.compliance.len()
    }
}
