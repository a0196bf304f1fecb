// SPDX-License-Identifier: MPL-2.0

//! Frame processor module for per-frame code detection
//!
//! Detection results for one preview frame travel as a [`MetadataBatch`]:
//! plain data, produced fresh for every frame and dropped once the overlay
//! has consumed it. Currently implements QR code detection.

pub mod tasks;
pub mod types;

pub use tasks::qr_detector;
pub use types::{Detection, FrameContext, MetadataBatch, SymbolKind};
