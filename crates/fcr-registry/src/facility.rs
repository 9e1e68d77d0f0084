//! # Facility Registry
//!
//! Tracks physical facilities and whether an admin has verified them.
//!
//! ## States
//!
//! ```text
//! Unregistered ──register──▶ Unverified ──verify──▶ Verified
//!                                                     │  ▲
//!                                                     └──┘ verify (re-stamps height)
//! ```
//!
//! Both transitions require the admin. There is no reverse transition and
//! records are never deleted. Re-verification is accepted and overwrites
//! `verification_date` with whatever height the admin supplies; heights are
//! not required to increase.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use fcr_core::{AdminIdentity, BlockHeight, FacilityId, Principal, RecordKind, RegistryError};

use crate::gate::AdminGate;
use crate::store::Store;

// ─── Facility Status ─────────────────────────────────────────────────

/// Lifecycle position of a facility id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FacilityStatus {
    /// No record exists for the id.
    Unregistered,
    /// Registered, not yet verified.
    Unverified,
    /// Verified by the admin at least once.
    Verified,
}

impl std::fmt::Display for FacilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unregistered => "UNREGISTERED",
            Self::Unverified => "UNVERIFIED",
            Self::Verified => "VERIFIED",
        };
        f.write_str(s)
    }
}

// ─── Facility Record ─────────────────────────────────────────────────

/// A registered facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityRecord {
    /// Display name.
    pub name: String,
    /// Free-form location.
    pub location: String,
    /// Whether the admin has verified the facility.
    pub verified: bool,
    /// Height of the latest verification, genesis until verified.
    pub verification_date: BlockHeight,
}

impl FacilityRecord {
    fn unverified(name: String, location: String) -> Self {
        Self {
            name,
            location,
            verified: false,
            verification_date: BlockHeight::GENESIS,
        }
    }

    /// Lifecycle status of this record.
    pub fn status(&self) -> FacilityStatus {
        if self.verified {
            FacilityStatus::Verified
        } else {
            FacilityStatus::Unverified
        }
    }
}

// ─── Facility Registry ───────────────────────────────────────────────

/// Admin-gated facility records with open reads.
///
/// Cheap to clone; clones share records and gate.
#[derive(Debug, Clone)]
pub struct FacilityRegistry {
    gate: Arc<AdminGate>,
    facilities: Store<FacilityId, FacilityRecord>,
}

impl FacilityRegistry {
    /// Create an empty registry guarded by `gate`.
    pub fn new(gate: Arc<AdminGate>) -> Self {
        Self {
            gate,
            facilities: Store::new(),
        }
    }

    /// Create an empty registry with its own gate.
    pub fn with_admin(admin: AdminIdentity) -> Self {
        Self::new(Arc::new(AdminGate::new(admin)))
    }

    /// The gate guarding this registry.
    pub fn gate(&self) -> &Arc<AdminGate> {
        &self.gate
    }

    /// The current admin.
    pub fn admin(&self) -> AdminIdentity {
        self.gate.admin()
    }

    /// Whether `caller` is the current admin.
    pub fn is_admin(&self, caller: &Principal) -> bool {
        self.gate.is_admin(caller)
    }

    /// Hand the admin role to `new_admin`.
    ///
    /// Affects every registry sharing this gate.
    pub fn transfer_admin(
        &self,
        new_admin: AdminIdentity,
        caller: &Principal,
    ) -> Result<(), RegistryError> {
        self.gate.transfer_admin(new_admin, caller)
    }

    /// Register a new, unverified facility.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if `caller` is not the admin.
    /// - `AlreadyExists` if `id` is taken; the existing record is untouched.
    pub fn register_facility(
        &self,
        id: impl Into<FacilityId>,
        name: impl Into<String>,
        location: impl Into<String>,
        caller: &Principal,
    ) -> Result<(), RegistryError> {
        let _admin = self.gate.authorize(caller)?;
        let id = id.into();
        let record = FacilityRecord::unverified(name.into(), location.into());
        if !self.facilities.insert_new(id.clone(), record) {
            return Err(RegistryError::already_exists(RecordKind::Facility, &id));
        }
        tracing::debug!(facility_id = %id, "facility registered");
        Ok(())
    }

    /// Mark a facility verified at `at`.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if `caller` is not the admin.
    /// - `NotFound` if no facility has this id.
    pub fn verify_facility(
        &self,
        id: &str,
        caller: &Principal,
        at: impl Into<BlockHeight>,
    ) -> Result<(), RegistryError> {
        let _admin = self.gate.authorize(caller)?;
        let at = at.into();
        self.facilities
            .update(id, |record| {
                record.verified = true;
                record.verification_date = at;
            })
            .ok_or_else(|| RegistryError::not_found(RecordKind::Facility, id))?;
        tracing::debug!(facility_id = %id, height = %at, "facility verified");
        Ok(())
    }

    /// Whether a facility is verified.
    ///
    /// # Errors
    ///
    /// `NotFound` if no facility has this id.
    pub fn is_facility_verified(&self, id: &str) -> Result<bool, RegistryError> {
        self.facilities
            .get(id)
            .map(|record| record.verified)
            .ok_or_else(|| RegistryError::not_found(RecordKind::Facility, id))
    }

    /// Look up a facility.
    pub fn get_facility(&self, id: &str) -> Option<FacilityRecord> {
        self.facilities.get(id)
    }

    /// Lifecycle status of an id, including `Unregistered`.
    pub fn status(&self, id: &str) -> FacilityStatus {
        self.facilities
            .get(id)
            .map_or(FacilityStatus::Unregistered, |record| record.status())
    }

    /// All facilities, ordered by id.
    pub fn list_facilities(&self) -> Vec<(FacilityId, FacilityRecord)> {
        let mut all = self.facilities.entries();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    /// Ids of verified facilities, ordered.
    pub fn verified_facilities(&self) -> Vec<FacilityId> {
        let mut ids: Vec<FacilityId> = self
            .facilities
            .filter(|_, record| record.verified)
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        ids.sort();
        ids
    }

    /// Number of registered facilities.
    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    /// Whether no facility is registered.
    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
