#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Core loader types: resource kinds, request lifecycle states, and the
//! completion handle every load request settles through.

/// One-shot settlement handles shared between a request and its waiters.
pub mod completion;
/// Resource kinds declared by directive elements.
pub mod kind;
/// Request lifecycle states and the legal transitions between them.
pub mod state;

pub use completion::{Completion, Settlement, settle_all};
pub use kind::{LoadKind, UnknownKind};
pub use state::{InvalidTransition, LoadState};
