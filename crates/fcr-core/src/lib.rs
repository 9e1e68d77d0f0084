//! # fcr-core — Foundational Types for the Facility & Compliance Registry
//!
//! This crate is the leaf of the workspace. It defines the identifier
//! newtypes, the block-height model, the error hierarchy and configuration
//! that the registry crates build on. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `Principal`, `FacilityId`,
//!    `RequirementId`, `ProductId`. No bare strings cross a registry API.
//!
//! 2. **Opaque callers, non-empty admins.** Any `Principal` may call; only
//!    an `AdminIdentity` can be installed as admin, and it is never blank.
//!
//! 3. **Closed result codes.** `RegistryError` maps onto exactly three wire
//!    codes (`403`, `404`, `500`) via `ErrorCode`.
//!
//! 4. **Explicit time.** Record stamping heights come from a `HeightSource`
//!    the registry owns, not from a global clock.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `fcr-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod height;
pub mod identity;

pub use config::{HeightConfig, RegistryConfig};
pub use error::{
    ConfigError, ErrorCode, RecordKind, RegistryError, UnknownErrorCode,
    ValidationError,
};
pub use height::{BlockHeight, HeightSource, ManualHeight, WallClockHeight};
pub use identity::{AdminIdentity, ComplianceKey, FacilityId, Principal, ProductId, RequirementId};
