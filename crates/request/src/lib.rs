#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Load requests and the builders that turn directive elements into them.
//!
//! A directive block groups directive elements; each element declares one
//! script, stylesheet or region through its attributes:
//!
//! ```text
//! <bia-load>
//!     <load type="style" source="css/nav.css" target="nav">
//!     <load type="script" source="js/nav.js" target="nav" dependencies="jquery">
//!     <load type="region" source="views/home.html" target="home" display="flex">
//! </bia-load>
//! ```
//!
//! [`build_block`] converts a whole block, skipping malformed elements with
//! a warning. [`LoadRequest`] then carries the built [`RequestSpec`] through
//! its lifecycle.

pub mod build;
pub mod directive;
pub mod error;
pub mod request;
pub mod spec;

pub use build::{build_block, build_request};
pub use directive::{BlockId, DirectiveBlock, DirectiveElement};
pub use error::{DirectiveError, Result};
pub use request::LoadRequest;
pub use spec::{RegionSpec, RequestSpec, ScriptSpec, StyleSpec};
