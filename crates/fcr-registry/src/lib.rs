//! # fcr-registry — Access-Controlled Facility and Compliance Registries
//!
//! Implements the registry state machines: how records are created,
//! transitioned and queried, and how the single-admin gate is enforced and
//! transferred.
//!
//! ## Components
//!
//! - **Admin Gate** (`gate.rs`): the current admin identity, the
//!   authorization check, and single-step transfer.
//!
//! - **Facility Registry** (`facility.rs`): `Unregistered → Unverified →
//!   Verified`, both transitions admin-only.
//!
//! - **Compliance Registry** (`compliance.rs`): admin-defined requirements
//!   and openly submitted `(product, requirement)` compliance evidence.
//!
//! - **Registry** (`registry.rs`): both registries behind one shared gate.
//!
//! ## Concurrency
//!
//! Every registry is `Send + Sync` and cheap to clone. Each map sits behind
//! its own `parking_lot::RwLock` (`store.rs`). Gated writes hold the admin
//! read lock for their whole duration, and a map's check-then-insert runs
//! under one write lock. No operation blocks on I/O.
//!
//! ## Errors
//!
//! Every operation either applies fully or not at all, and rejections come
//! back as [`fcr_core::RegistryError`] carrying a `403`/`404`/`500` code.

pub mod compliance;
pub mod facility;
pub mod gate;
pub mod registry;
pub mod store;

pub use compliance::{ComplianceRegistry, ProductComplianceRecord, RegulatoryRequirement};
pub use facility::{FacilityRecord, FacilityRegistry, FacilityStatus};
pub use gate::{AdminGate, AdminGuard};
pub use registry::Registry;
pub use store::Store;
