// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters that connect navigation to concrete hierarchies.

#[cfg(feature = "element_tree_adapter")]
pub mod element_tree;
