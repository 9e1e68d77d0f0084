//! # Run Subcommand
//!
//! Replays an operation script against a fresh in-process [`Registry`] and
//! prints one JSON line per step:
//!
//! ```text
//! {"index":0,"op":"register_facility","result":"ok"}
//! {"index":1,"op":"register_facility","result":"error","code":500,"message":"facility facility-001 already exists"}
//! {"index":2,"op":"is_facility_verified","result":"value","value":false}
//! ```
//!
//! ## Exit codes
//!
//! - `0`: every step was accepted.
//! - `2`: at least one step was rejected by the registry.
//! - `1`: the script or configuration could not be used.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Args;
use serde::Serialize;

use fcr_core::{BlockHeight, ErrorCode, RegistryError};
use fcr_registry::{FacilityRecord, ProductComplianceRecord, Registry, RegulatoryRequirement};

use crate::config::{resolve_config, Overrides};
use crate::script::{Script, Step};

/// Arguments for the `fcr run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the script (.yaml, .yml or .json).
    pub script: PathBuf,

    /// Admin identity. Overrides the config file and FCR_ADMIN.
    #[arg(long)]
    pub admin: Option<String>,

    /// Start a manual height source at this height.
    #[arg(long)]
    pub start_height: Option<u64>,

    /// Stop at the first rejected step.
    #[arg(long)]
    pub fail_fast: bool,
}

/// Result of a single step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    /// Mutation applied.
    Ok,
    /// Boolean query answered.
    Value { value: bool },
    /// Lookup found a record.
    Record { record: StepRecord },
    /// Lookup found nothing.
    Empty,
    /// Height source moved.
    Height { height: BlockHeight },
    /// Registry rejected the step.
    Error { code: ErrorCode, message: String },
}

/// A record returned by a lookup step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StepRecord {
    Facility(FacilityRecord),
    Requirement(RegulatoryRequirement),
    ProductCompliance(ProductComplianceRecord),
}

/// A printed line.
#[derive(Debug, Serialize)]
pub struct StepReport {
    /// Zero-based step position.
    pub index: usize,
    /// Operation tag.
    pub op: &'static str,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Tally of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps executed.
    pub executed: usize,
    /// Steps the registry rejected.
    pub rejected: usize,
}

impl RunSummary {
    /// Process exit code for this run.
    pub fn exit_code(&self) -> u8 {
        if self.rejected == 0 {
            0
        } else {
            2
        }
    }
}

impl From<RegistryError> for Outcome {
    fn from(err: RegistryError) -> Self {
        Self::Error {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

fn unit(result: Result<(), RegistryError>) -> Outcome {
    result.map_or_else(Outcome::from, |()| Outcome::Ok)
}

fn value(result: Result<bool, RegistryError>) -> Outcome {
    result.map_or_else(Outcome::from, |value| Outcome::Value { value })
}

fn lookup<T>(found: Option<T>, wrap: impl FnOnce(T) -> StepRecord) -> Outcome {
    found.map_or(Outcome::Empty, |record| Outcome::Record {
        record: wrap(record),
    })
}

/// Apply one step to `registry`.
///
/// Registry rejections become [`Outcome::Error`]. Only a step the registry
/// cannot express at all (advancing a wall-clock height) is an `Err`.
pub fn execute(registry: &Registry, step: &Step) -> Result<Outcome> {
    let facilities = registry.facilities();
    let compliance = registry.compliance();

    let outcome = match step {
        Step::RegisterFacility {
            id,
            name,
            location,
            caller,
        } => unit(facilities.register_facility(id.as_str(), name.as_str(), location.as_str(), caller)),
        Step::VerifyFacility { id, caller, height } => {
            unit(facilities.verify_facility(id, caller, *height))
        }
        Step::IsFacilityVerified { id } => value(facilities.is_facility_verified(id)),
        Step::GetFacility { id } => lookup(facilities.get_facility(id), StepRecord::Facility),
        Step::TransferAdmin { new_admin, caller } => {
            unit(registry.transfer_admin(new_admin.clone(), caller))
        }
        Step::AddRequirement {
            id,
            title,
            description,
            required_documents,
            caller,
        } => unit(compliance.add_requirement(
            id.as_str(),
            title.as_str(),
            description.as_str(),
            required_documents.clone(),
            caller,
        )),
        Step::UpdateProductCompliance {
            product_id,
            requirement_id,
            documents,
        } => unit(compliance.update_product_compliance(
            product_id.as_str(),
            requirement_id,
            documents.clone(),
        )),
        Step::IsProductCompliant {
            product_id,
            requirement_id,
        } => value(compliance.is_product_compliant(product_id, requirement_id)),
        Step::GetRequirement { id } => {
            lookup(compliance.get_requirement(id), StepRecord::Requirement)
        }
        Step::GetProductCompliance {
            product_id,
            requirement_id,
        } => lookup(
            compliance.get_product_compliance(product_id, requirement_id),
            StepRecord::ProductCompliance,
        ),
        Step::AdvanceHeight { by } => {
            let height = registry
                .heights()
                .advance(*by)
                .ok_or_else(|| anyhow!("the configured height source cannot be advanced"))?;
            Outcome::Height { height }
        }
    };
    Ok(outcome)
}

/// Run every step of `script`, writing one JSON line per step to `out`.
pub fn run_steps(
    registry: &Registry,
    script: &Script,
    fail_fast: bool,
    out: &mut dyn Write,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    for (index, step) in script.steps.iter().enumerate() {
        let outcome = execute(registry, step).with_context(|| format!("step {index}"))?;
        let rejected = matches!(outcome, Outcome::Error { .. });

        let report = StepReport {
            index,
            op: step.name(),
            outcome,
        };
        serde_json::to_writer(&mut *out, &report)?;
        writeln!(out)?;

        summary.executed += 1;
        if rejected {
            summary.rejected += 1;
            tracing::info!(index, op = step.name(), "step rejected");
            if fail_fast {
                break;
            }
        }
    }
    Ok(summary)
}

/// Execute the run subcommand.
pub fn run_script(args: &RunArgs, config_path: Option<&Path>) -> Result<u8> {
    let config = resolve_config(
        config_path,
        &Overrides {
            admin: args.admin.as_deref(),
            start_height: args.start_height,
        },
    )?;
    let script = Script::load(&args.script)?;
    let registry = Registry::from_config(&config);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = run_steps(&registry, &script, args.fail_fast, &mut out)?;
    out.flush()?;

    tracing::info!(
        executed = summary.executed,
        rejected = summary.rejected,
        "script finished"
    );
    Ok(summary.exit_code())
}
