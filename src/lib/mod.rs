//! Shared page utilities: configuration, the gate error taxonomy, and build
//! metadata. Configuration values are public endpoints and identifiers; no
//! secrets live here and none may be logged.

pub(crate) mod config;
pub(crate) mod errors;

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) const GIT_COMMIT_HASH: &str = env!("PORTAL_GIT_SHA");

pub(crate) use errors::GateError;
