#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Load orchestration for declaratively loaded scripts, stylesheets and
//! regions.
//!
//! A [`LoadSession`] asks its [`Renderer`] for directive blocks, builds load
//! requests from them, and drives every request to `Injected` or `Failed`:
//!
//! - scripts wait on the scripts they depend on (see [`DependencyPolicy`]
//!   for what happens when a dependency is missing or fails), then are
//!   wrapped in a scoped closure and mounted;
//! - stylesheets are scoped under their target with [`scope_stylesheet`]
//!   unless precompiled;
//! - regions are mounted in hidden containers, and any directive blocks
//!   they contain are expanded in turn.
//!
//! [`LoadSession::load`] settles once nothing is left to expand and every
//! request has settled, then emits `success`, `partial` or `fail`, followed
//! by `done`.
//!
//! ```ignore
//! let session = LoadSession::new(fetcher, renderer);
//! session.events().on(EventKind::Done, |_| tracing::info!("page ready"));
//! match session.load().await {
//!     Outcome::Success => session.swap("home").await?,
//!     outcome => tracing::warn!(%outcome, "some resources failed"),
//! }
//! ```
//!
//! [`DependencyPolicy`]: bia_config::DependencyPolicy

mod context;
pub mod error;
mod graph;
pub mod host;
pub mod outcome;
mod region;
pub mod registry;
pub mod scope;
pub mod script;
pub mod session;
pub mod style;
mod tasks;

pub use bia_config::{ConfigHandle, DependencyPolicy, LoaderConfig};
pub use bia_events::{EventBus, EventKind, LoadEvent};
pub use bia_primitives::{Completion, LoadKind, LoadState, Settlement};
pub use bia_request::{BlockId, DirectiveBlock, DirectiveElement, LoadRequest, RequestSpec};
pub use error::{FetchError, LoadError, RenderError, SwapError};
pub use host::{ContainerId, Fetcher, RegionContainer, Renderer, ScanRoot};
pub use outcome::Outcome;
pub use registry::LoadedRegion;
pub use scope::{scope_query, scope_stylesheet};
pub use script::wrap_script;
pub use session::LoadSession;
