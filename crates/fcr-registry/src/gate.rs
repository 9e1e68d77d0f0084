//! # Admin Gate
//!
//! Holds the single administrator identity and authorizes mutation
//! requests against it. Ownership transfer is one atomic replacement: no
//! grace period, no pending-acceptance step.
//!
//! Callers are arbitrary [`Principal`]s, blank ones included; they simply
//! fail the check. Only an [`AdminIdentity`] can be installed, so the gate
//! never holds an empty admin.
//!
//! ## Locking
//!
//! [`AdminGate::authorize`] hands back an [`AdminGuard`] holding a read
//! lock on the admin identity. Registries keep the guard alive across
//! their write, so a concurrent [`AdminGate::transfer_admin`] cannot slip
//! in between "caller is admin" and "record written". Transfer only ever
//! takes this one lock, so the admin → map lock order cannot deadlock.
//!
//! A thread must not call `transfer_admin` while it holds an `AdminGuard`
//! from the same gate.

use parking_lot::{RwLock, RwLockReadGuard};

use fcr_core::{AdminIdentity, Principal, RegistryError};

/// The single-admin authorization primitive.
#[derive(Debug)]
pub struct AdminGate {
    admin: RwLock<AdminIdentity>,
}

/// Proof that a caller was the admin, valid while the guard lives.
#[derive(Debug)]
pub struct AdminGuard<'a> {
    admin: RwLockReadGuard<'a, AdminIdentity>,
}

impl AdminGuard<'_> {
    /// The admin that was authorized.
    pub fn admin(&self) -> &AdminIdentity {
        &self.admin
    }
}

impl AdminGate {
    /// Create a gate with an initial admin.
    pub fn new(admin: AdminIdentity) -> Self {
        Self {
            admin: RwLock::new(admin),
        }
    }

    /// The current admin.
    pub fn admin(&self) -> AdminIdentity {
        self.admin.read().clone()
    }

    /// Whether `caller` is the current admin.
    pub fn is_admin(&self, caller: &Principal) -> bool {
        *self.admin.read() == *caller
    }

    /// Authorize `caller`, holding the admin identity stable until the
    /// returned guard is dropped.
    pub fn authorize(&self, caller: &Principal) -> Result<AdminGuard<'_>, RegistryError> {
        let admin = self.admin.read();
        if *admin != *caller {
            return Err(RegistryError::Unauthorized {
                caller: caller.clone(),
            });
        }
        Ok(AdminGuard { admin })
    }

    /// Replace the admin with `new_admin` if `caller` is the current admin.
    ///
    /// Check and replacement happen under one write lock. Every check after
    /// this returns uses `new_admin`.
    pub fn transfer_admin(
        &self,
        new_admin: AdminIdentity,
        caller: &Principal,
    ) -> Result<(), RegistryError> {
        let mut admin = self.admin.write();
        if *admin != *caller {
            return Err(RegistryError::Unauthorized {
                caller: caller.clone(),
            });
        }
        tracing::info!(previous = %*admin, next = %new_admin, "admin transferred");
        *admin = new_admin;
        Ok(())
    }
}
