// SPDX-License-Identifier: MPL-2.0

//! Processing pipelines
//!
//! # Pipeline Architecture
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │ Still Photo  │ ──▶ │  Photo Pipeline   │ ──▶ │ Storage Sink │
//! │ (raw buffer) │     │  - Decode         │     │              │
//! │              │     │  - Square crop    │     │              │
//! │              │     │  - Rotation tag   │     │              │
//! └──────────────┘     └───────────────────┘     └──────────────┘
//! ```
//!
//! The live preview never waits on this pipeline: detection batches go
//! straight to the overlay.

pub mod photo;
