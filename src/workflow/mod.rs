// SPDX-License-Identifier: MIT

pub mod graph;
pub mod loader;
pub mod registry;
pub mod runner;
