//! Settlement outcomes and handler step results.
//!
//! Two small vocabulary types:
//!
//! - [`Settlement`]: the final outcome of a node, handed to every
//!   continuation when the node drains.
//! - [`Step`]: what a `then`/`catch` handler returns. Rust has neither
//!   dynamic handler arity nor exceptions, so the three possible handler
//!   outcomes are explicit variants: produce a value, reject the child, or
//!   hand back another promise for the child to adopt.

use crate::promise::Promise;

/// The settled outcome of a promise node.
///
/// Produced exactly once per node, the moment it leaves `Pending`. Cloned
/// into each registered continuation, which is why chained value and error
/// types must be `Clone`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement<T, E> {
    /// The node fulfilled with a value.
    Fulfilled(T),
    /// The node rejected with an error.
    Rejected(E),
}

impl<T, E> Settlement<T, E> {
    /// Returns true if this is a fulfillment.
    #[must_use]
    pub const fn is_fulfilled(&self) -> bool {
        matches!(self, Self::Fulfilled(_))
    }

    /// Returns true if this is a rejection.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Returns the fulfillment value, if any.
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Fulfilled(value) => Some(value),
            Self::Rejected(_) => None,
        }
    }

    /// Returns the rejection error, if any.
    pub const fn error(&self) -> Option<&E> {
        match self {
            Self::Fulfilled(_) => None,
            Self::Rejected(error) => Some(error),
        }
    }
}

/// The result of running a `then`/`catch` handler.
///
/// Where a dynamic-language handler would return a value, throw, or return
/// another promise, a handler here says which explicitly:
///
/// - `Value(v)`: the child node fulfills with `v`.
/// - `Reject(e)`: the child node rejects with `e` (the "handler threw"
///   case).
/// - `Adopt(p)`: thenable flattening. The child does not settle now; it
///   adopts `p`'s eventual settlement instead, whatever and whenever that
///   turns out to be.
#[derive(Debug)]
pub enum Step<T, E> {
    /// Fulfill the child with this value.
    Value(T),
    /// Reject the child with this error.
    Reject(E),
    /// The child adopts this promise's eventual settlement.
    Adopt(Promise<T, E>),
}
