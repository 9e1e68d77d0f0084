//! # Error Types
//!
//! Structured error hierarchy for the registry. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - [`RegistryError`] is the closed set of outcomes a registry operation
//!   can reject with. Each variant maps to exactly one [`ErrorCode`]
//!   (`403`, `404`, `500`), which is what an external transport reports.
//! - [`ValidationError`] covers values rejected at construction time and
//!   never reaches a registry operation.
//! - [`ConfigError`] covers loading and resolving a [`RegistryConfig`],
//!   keeping the underlying parser error as its source.
//!
//! [`RegistryConfig`]: crate::config::RegistryConfig

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::Principal;

/// The closed enumeration of numeric result codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum ErrorCode {
    /// Caller is not the current admin (403).
    Unauthorized,
    /// Lookup or reference miss (404).
    NotFound,
    /// Duplicate-key insert attempt (500).
    AlreadyExists,
}

impl ErrorCode {
    /// Numeric wire value of the code.
    pub fn as_u16(&self) -> u16 {
        match self {
            Self::Unauthorized => 403,
            Self::NotFound => 404,
            Self::AlreadyExists => 500,
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.as_u16()
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = UnknownErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            403 => Ok(Self::Unauthorized),
            404 => Ok(Self::NotFound),
            500 => Ok(Self::AlreadyExists),
            other => Err(UnknownErrorCode(other)),
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// A numeric code outside the closed `403/404/500` set.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unknown error code {0}")]
pub struct UnknownErrorCode(pub u16);

/// The kind of record an operation addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// A facility record.
    Facility,
    /// A regulatory requirement definition.
    Requirement,
    /// A `(product, requirement)` compliance record.
    ProductCompliance,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Facility => "facility",
            Self::Requirement => "requirement",
            Self::ProductCompliance => "product compliance record",
        };
        f.write_str(s)
    }
}

/// Rejection returned by a registry operation.
///
/// No variant implies a partial write: the operation that produced it left
/// the registry exactly as it found it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The caller is not the current admin.
    #[error("caller {caller} is not the registry admin")]
    Unauthorized {
        /// The rejected caller.
        caller: Principal,
    },

    /// The addressed record does not exist.
    #[error("{kind} {key} not found")]
    NotFound {
        /// Kind of record looked up.
        kind: RecordKind,
        /// Display form of the missing key.
        key: String,
    },

    /// A record with the same key already exists.
    #[error("{kind} {key} already exists")]
    AlreadyExists {
        /// Kind of record inserted.
        kind: RecordKind,
        /// Display form of the duplicate key.
        key: String,
    },
}

impl RegistryError {
    /// Result code reported for this rejection.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Unauthorized { .. } => ErrorCode::Unauthorized,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::AlreadyExists { .. } => ErrorCode::AlreadyExists,
        }
    }

    /// Build a [`RegistryError::NotFound`].
    pub fn not_found(kind: RecordKind, key: impl std::fmt::Display) -> Self {
        Self::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    /// Build a [`RegistryError::AlreadyExists`].
    pub fn already_exists(kind: RecordKind, key: impl std::fmt::Display) -> Self {
        Self::AlreadyExists {
            kind,
            key: key.to_string(),
        }
    }
}

/// Construction-time validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An identity token was empty or whitespace-only.
    #[error("identity must not be empty")]
    EmptyIdentity,
}

/// Failure to load or resolve configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file extension does not select a known format.
    #[error("unsupported config format for {path} (expected .yaml, .yml or .json)")]
    UnsupportedFormat {
        /// Offending path.
        path: PathBuf,
    },

    /// A YAML document did not parse.
    #[error("failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON document did not parse.
    #[error("failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// An environment override held an unusable value.
    #[error("invalid value for {var}: {reason}")]
    Env {
        /// Variable name.
        var: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A parsed value failed validation.
    #[error("invalid config: {0}")]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_wire_values() {
        assert_eq!(ErrorCode::Unauthorized.as_u16(), 403);
        assert_eq!(ErrorCode::NotFound.as_u16(), 404);
        assert_eq!(ErrorCode::AlreadyExists.as_u16(), 500);
    }

    #[test]
    fn test_code_set_is_closed() {
        assert_eq!(ErrorCode::try_from(404), Ok(ErrorCode::NotFound));
        assert_eq!(ErrorCode::try_from(401), Err(UnknownErrorCode(401)));
    }

    #[test]
    fn test_code_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::Unauthorized).unwrap(), "403");
        let code: ErrorCode = serde_json::from_str("500").unwrap();
        assert_eq!(code, ErrorCode::AlreadyExists);
        assert!(serde_json::from_str::<ErrorCode>("418").is_err());
    }

    #[test]
    fn test_registry_error_codes() {
        let caller = Principal::new("intruder");
        assert_eq!(RegistryError::Unauthorized { caller }.code().as_u16(), 403);
        assert_eq!(
            RegistryError::not_found(RecordKind::Facility, "f-1").code(),
            ErrorCode::NotFound
        );
        assert_eq!(
            RegistryError::already_exists(RecordKind::Requirement, "r-1").code(),
            ErrorCode::AlreadyExists
        );
    }

    #[test]
    fn test_registry_error_display() {
        let err = RegistryError::not_found(RecordKind::Facility, "facility-009");
        assert_eq!(err.to_string(), "facility facility-009 not found");
    }
}
