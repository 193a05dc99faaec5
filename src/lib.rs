// SPDX-License-Identifier: MIT

//! Workflow graph engine
//!
//! `engine` holds the collaborator contracts (operation descriptors, errors),
//! `workflow` holds the graph store, port matching, output versioning,
//! navigation and the caller-side runner and loader.

pub mod engine;
pub mod workflow;
