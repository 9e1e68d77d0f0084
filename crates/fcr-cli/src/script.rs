//! # Operation Scripts
//!
//! A script is an ordered list of registry operations, one per step, read
//! from YAML or JSON:
//!
//! ```yaml
//! steps:
//!   - op: register_facility
//!     id: facility-001
//!     name: Plant A
//!     location: NY
//!     caller: ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM
//!   - op: verify_facility
//!     id: facility-001
//!     caller: ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM
//!     height: 12345
//! ```
//!
//! A `caller` is any string; a blank one is simply not the admin, so its
//! step is rejected as unauthorized. A `new_admin` must be non-blank and is
//! validated while parsing, so a blank one rejects the whole script before
//! any step runs.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use fcr_core::{AdminIdentity, Principal};

/// A parsed script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Steps in execution order.
    pub steps: Vec<Step>,
}

/// One registry operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    RegisterFacility {
        id: String,
        name: String,
        location: String,
        caller: Principal,
    },
    VerifyFacility {
        id: String,
        caller: Principal,
        height: u64,
    },
    IsFacilityVerified {
        id: String,
    },
    GetFacility {
        id: String,
    },
    TransferAdmin {
        new_admin: AdminIdentity,
        caller: Principal,
    },
    AddRequirement {
        id: String,
        title: String,
        description: String,
        #[serde(default)]
        required_documents: Vec<String>,
        caller: Principal,
    },
    UpdateProductCompliance {
        product_id: String,
        requirement_id: String,
        #[serde(default)]
        documents: Vec<String>,
    },
    IsProductCompliant {
        product_id: String,
        requirement_id: String,
    },
    GetRequirement {
        id: String,
    },
    GetProductCompliance {
        product_id: String,
        requirement_id: String,
    },
    /// Move a manual height source forward.
    AdvanceHeight {
        by: u64,
    },
}

impl Step {
    /// The `op` tag of this step.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RegisterFacility { .. } => "register_facility",
            Self::VerifyFacility { .. } => "verify_facility",
            Self::IsFacilityVerified { .. } => "is_facility_verified",
            Self::GetFacility { .. } => "get_facility",
            Self::TransferAdmin { .. } => "transfer_admin",
            Self::AddRequirement { .. } => "add_requirement",
            Self::UpdateProductCompliance { .. } => "update_product_compliance",
            Self::IsProductCompliant { .. } => "is_product_compliant",
            Self::GetRequirement { .. } => "get_requirement",
            Self::GetProductCompliance { .. } => "get_product_compliance",
            Self::AdvanceHeight { .. } => "advance_height",
        }
    }
}

impl Script {
    /// Load a script, choosing the parser by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            Some("json") => Self::from_json_str(&text),
            _ => bail!(
                "unsupported script format for {} (expected .yaml, .yml or .json)",
                path.display()
            ),
        }
        .with_context(|| format!("invalid script {}", path.display()))
    }

    /// Parse a YAML script.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parse a JSON script.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
