//! Generation orchestration for PageForge.
//!
//! Ties the chat client, markdown parser, and storage layer together:
//! [`run_continuation`] stitches a multi-round model response into one
//! document, [`publish_pages`] persists it, and [`generate_and_publish`]
//! runs both as a single pipeline.

pub mod continuation;
pub mod pipeline;
pub mod publisher;

pub use continuation::{MAX_ROUNDS, run_continuation};
pub use pipeline::{GenerationJob, GenerationResult, generate_and_publish};
pub use publisher::publish_pages;
