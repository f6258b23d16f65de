//! Notification Pipeline
//!
//! Payload normalization and one-shot dispatch to the messaging backend.

mod dispatch;
mod normalize;

pub use dispatch::{compose_notification, dispatch, DispatchError};
pub use normalize::{normalize, Normalized};
