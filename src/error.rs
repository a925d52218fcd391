//! Misuse errors.
//!
//! Normal chain outcomes (handler failures, double settlement) never
//! surface as errors: failures become downstream rejections and repeat
//! settlements are silent no-ops. The types here cover programming errors
//! only, which fail loudly and distinctly.

/// Error returned by [`Promise::resume`] when the chain has no pause gate
/// upstream.
///
/// [`Promise::resume`]: crate::Promise::resume
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("resume called on a promise chain with no pause gate")]
pub struct NotPaused;
