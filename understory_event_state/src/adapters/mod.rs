// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Understory crates.
//!
//! Each adapter is gated behind a feature flag to keep the core managers
//! independent of any particular target storage.
//!
//! ## Available Adapters
//!
//! - [`element_tree`] (`element_tree_adapter` feature): [`TargetHost`](crate::host::TargetHost)
//!   for [`understory_element_tree::ElementTree`], mapping markers onto element flags.

#[cfg(feature = "element_tree_adapter")]
pub mod element_tree;
