//! # Identity and Key Newtypes
//!
//! Newtype wrappers for every identifier the registry handles. A
//! `FacilityId` cannot be passed where a `RequirementId` is expected, and a
//! caller identity is never confused with a record key.
//!
//! ## Principal and AdminIdentity
//!
//! [`Principal`] is the opaque caller token. It carries no structure and no
//! validation: any string, blank included, is a caller the gate can compare
//! against the admin.
//!
//! [`AdminIdentity`] is a principal that may be installed as the registry
//! administrator. It rejects empty or whitespace-only tokens at
//! construction, so the gate can never hold an unusable admin.
//!
//! ## Record keys
//!
//! Record keys are opaque strings with no validation. They implement
//! `Borrow<str>` so the stores can be queried with a plain `&str`.

use std::borrow::Borrow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Opaque identity of a caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Wrap a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Access the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Principal {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Principal {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A principal eligible to hold the admin role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AdminIdentity(Principal);

impl AdminIdentity {
    /// Create an admin identity, rejecting empty or whitespace-only tokens.
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        Self::try_from(Principal::new(token))
    }

    /// The admin as a caller principal.
    pub fn as_principal(&self) -> &Principal {
        &self.0
    }

    /// Access the raw token.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<Principal> for AdminIdentity {
    type Error = ValidationError;

    fn try_from(value: Principal) -> Result<Self, Self::Error> {
        if value.as_str().trim().is_empty() {
            return Err(ValidationError::EmptyIdentity);
        }
        Ok(Self(value))
    }
}

impl TryFrom<String> for AdminIdentity {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AdminIdentity> for String {
    fn from(value: AdminIdentity) -> Self {
        value.0 .0
    }
}

impl From<AdminIdentity> for Principal {
    fn from(value: AdminIdentity) -> Self {
        value.0
    }
}

impl FromStr for AdminIdentity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl PartialEq<Principal> for AdminIdentity {
    fn eq(&self, other: &Principal) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for AdminIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// Defines an opaque string key with transparent serde, `Borrow<str>` and
/// the usual conversions.
macro_rules! string_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw key.
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// Access the raw key.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_key!(
    /// Key of a facility record.
    FacilityId
);

string_key!(
    /// Key of a regulatory requirement definition.
    RequirementId
);

string_key!(
    /// Identifier of a product whose compliance is tracked.
    ProductId
);

/// Composite key of a product compliance record.
///
/// Kept as a structured pair so that distinct `(product, requirement)`
/// combinations can never collide the way a joined string would.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComplianceKey {
    /// The product the record is about.
    pub product_id: ProductId,
    /// The requirement the product is evaluated against.
    pub requirement_id: RequirementId,
}

impl ComplianceKey {
    /// Build a key from its two parts.
    pub fn new(product_id: impl Into<ProductId>, requirement_id: impl Into<RequirementId>) -> Self {
        Self {
            product_id: product_id.into(),
            requirement_id: requirement_id.into(),
        }
    }
}

impl std::fmt::Display for ComplianceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.product_id, self.requirement_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_accepts_any_token() {
        assert_eq!(Principal::new("").as_str(), "");
        assert_eq!(Principal::new("   ").as_str(), "   ");
        assert_ne!(Principal::new(""), Principal::new(" "));
    }

    #[test]
    fn test_admin_identity_rejects_blank() {
        assert_eq!(AdminIdentity::new(""), Err(ValidationError::EmptyIdentity));
        assert!(AdminIdentity::new("   ").is_err());
        assert!("".parse::<AdminIdentity>().is_err());
        assert!(AdminIdentity::try_from(Principal::new("\t")).is_err());
    }

    #[test]
    fn test_admin_identity_matches_its_principal() {
        let admin = AdminIdentity::new("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM").unwrap();
        assert_eq!(admin.as_str(), "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM");
        assert_eq!(admin, Principal::new("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM"));
        assert_ne!(admin, Principal::new("ST2PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM"));
        assert_eq!(admin.to_string(), admin.as_str());
    }

    #[test]
    fn test_serde_validates_only_admins() {
        let p: Principal = serde_json::from_str("\"\"").unwrap();
        assert_eq!(p.as_str(), "");
        let admin: AdminIdentity = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(serde_json::to_string(&admin).unwrap(), "\"admin\"");
        assert!(serde_json::from_str::<AdminIdentity>("\"\"").is_err());
    }

    #[test]
    fn test_keys_serialize_as_plain_strings() {
        let id = FacilityId::from("facility-001");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"facility-001\"");
    }

    #[test]
    fn test_compliance_keys_do_not_collide() {
        let a = ComplianceKey::new("a-b", "c");
        let b = ComplianceKey::new("a", "b-c");
        assert_ne!(a, b);
    }

    #[test]
    fn test_compliance_key_display() {
        let key = ComplianceKey::new("product-001", "req-003");
        assert_eq!(key.to_string(), "product-001/req-003");
    }
}
