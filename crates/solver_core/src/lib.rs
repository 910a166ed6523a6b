//! Everything the Math Solver front end does that does not touch the browser directly, so
//! it can be tested natively.
//!
//! Key components:
//! - **Form**: `EntryArena` rows for functions and constants, `FormState` and `collect`
//!   which turns the current field values into a `SolveRequest`.
//! - **Dispatch**: the `Transport` seam over the HTTP client and the `Dispatcher` that
//!   normalizes every outcome into a `ResponseEnvelope`.
//! - **View**: the pure `render` function mapping an envelope to sections, plus the
//!   per-section "Copied!" indicator state.

pub mod config;
pub mod copy;
pub mod dispatch;
pub mod entries;
pub mod envelope;
pub mod form;
pub mod transport;
pub mod view;

pub use config::{BackendConfig, Environment};
pub use dispatch::Dispatcher;
pub use envelope::{EnvelopeContent, ImageRef, ResponseEnvelope, SolveResult};
pub use form::{collect, FormState, SolveRequest, SubmitMode};
pub use view::{render, View};
