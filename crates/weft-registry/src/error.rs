//! Bounded domain errors (token parsing).
//!
//! The database itself has no failure modes: mutations are total and lookups
//! return absence, not errors. Parsing textual tokens is the only fallible
//! surface, used by tooling that reads command or kind names.

use thiserror::Error;

/// Unknown registration command token.
#[derive(Debug, Error, Clone)]
#[error("command type `{raw}` is invalid")]
pub struct InvalidCmdType {
    pub raw: String,
}

/// Unknown entity kind token.
#[derive(Debug, Error, Clone)]
#[error("entity kind `{raw}` is invalid")]
pub struct InvalidEntityKind {
    pub raw: String,
}

/// Canonical error enum for the registry crate.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum RegistryError {
    #[error(transparent)]
    InvalidCmdType(#[from] InvalidCmdType),
    #[error(transparent)]
    InvalidEntityKind(#[from] InvalidEntityKind),
}
