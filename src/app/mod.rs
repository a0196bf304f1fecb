// SPDX-License-Identifier: MPL-2.0

//! Viewfinder host component
//!
//! Owns the detection overlay, the photo capture pipeline and the current
//! stream orientation, and consumes the two event interfaces the capture
//! collaborator feeds it.
//!
//! # Architecture
//!
//! - `state`: [`Viewfinder`] and the [`Message`] type
//! - `update`: Message handling and the event loop

mod state;
mod update;

pub use state::{Message, Viewfinder};
