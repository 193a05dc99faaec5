// SPDX-License-Identifier: MIT

//! Collaborator contracts: operation descriptors and error types

pub mod error;
pub mod operation;

pub use error::{FlowError, OperationError, PortTypeError};
pub use operation::{ActionContext, ActionOutput, Operation, OutputValue, PortSpec};
