// SPDX-License-Identifier: GPL-3.0-only

//! Backends for the collaborators the viewfinder core talks to

pub mod camera;
