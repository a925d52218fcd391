//! Synchromise: promise chains that settle immediately and synchronously.
//!
//! # Overview
//!
//! A drop-in stand-in for the familiar promise abstraction with one
//! defining difference: there is no microtask queue. Handlers registered
//! with `then`/`catch`/`finally` run immediately and synchronously — on
//! the registering caller's stack when the parent already settled,
//! otherwise on the stack of whoever settles the root. That makes every
//! chain observable step-by-step, which is what you want in tests,
//! simulations, and environments without an event loop.
//!
//! # Core Guarantees
//!
//! - **Settle-once**: a node moves from pending to fulfilled or rejected
//!   exactly once; later attempts are silent no-ops
//! - **Synchronous drain**: every continuation registered on a node runs,
//!   in registration order, before the settling call returns
//! - **Skip-and-propagate**: rejections skip fulfillment-only handlers
//!   until a rejection handler or `finally`; a handled rejection does not
//!   re-propagate
//! - **Transparent finally**: `finally` observes a settlement without
//!   changing what flows through it
//! - **Explicit control**: [`Promise::unresolved`] hands out the root's
//!   settle capability; [`Promise::pause`] withholds a chain's drain
//!   behind an explicit [`Promise::resume`]
//!
//! # Module Structure
//!
//! - [`promise`]: the [`Promise`] handle and its chain operations
//! - [`settlement`]: [`Settlement`] outcomes and handler [`Step`] results
//! - [`deferred`]: [`Deferred`] root control
//! - [`combinator`]: [`all`] / [`race`] built on the public surface
//! - [`error`]: misuse errors ([`NotPaused`])
//!
//! # Known Limits
//!
//! Draining is depth-first recursion through the chain, so stack depth
//! grows with chain length. Execution is single-threaded by contract
//! (`Rc`/`RefCell` internals; handles are not `Send`). A foreign,
//! genuinely asynchronous future cannot be adopted without breaking the
//! synchronous guarantee, so no such bridge is offered.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod combinator;
pub mod deferred;
pub mod error;
mod gate;
mod node;
pub mod promise;
pub mod settlement;

pub use combinator::{all, race};
pub use deferred::Deferred;
pub use error::NotPaused;
pub use promise::Promise;
pub use settlement::{Settlement, Step};
