// SPDX-License-Identifier: GPL-3.0-only

//! Settings UI module
//!
//! Camera, automatic actions, behavior and appearance, all persisted
//! through cosmic-config.

pub mod view;
