// Dweve Weft - Streaming XML Event Cursors
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types for cursor traversal.
//!
//! # Error Categories
//!
//! - **Protocol violations**: an operation was called outside the state
//!   window in which it is defined, e.g. `attributes()` while the current
//!   event is `Text`, or `next()` on a closed cursor.
//! - **Upstream failures**: the source producing events reported a fault
//!   (malformed markup, I/O error, unbalanced synthetic sequence).
//!
//! Optional information a source cannot supply (unparsed entities, source
//! locations) is *not* an error: those accessors return `None`.
//!
//! Any error ends the traversal. Nothing is retried inside a cursor chain;
//! after an upstream failure the cursor position is undefined and the cursor
//! should be closed.
//!
//! # Examples
//!
//! ```rust
//! use weft_core::{CursorError, Event, Operation};
//!
//! let err = CursorError::violation(Operation::Attributes, Event::Text, "only valid at START_ELEMENT");
//! assert!(err.is_protocol_violation());
//! assert!(err.to_string().contains("attributes()"));
//! ```

use crate::event::Event;
use crate::location::Location;
use std::fmt;
use thiserror::Error;

/// The cursor operation an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `next()`
    Next,
    /// `skip_to_matching_end()`
    SkipToMatchingEnd,
    /// `attributes()`
    Attributes,
    /// `namespace_declarations()`
    NamespaceDeclarations,
    /// `node_name()`
    NodeName,
    /// `string_value()`
    StringValue,
    /// `atomic_value()`
    AtomicValue,
    /// `schema_type()`
    SchemaType,
    /// `set_pipeline_context()`
    SetPipelineContext,
}

impl Operation {
    /// Human-readable description of the states in which the operation is defined.
    pub fn valid_window(self) -> &'static str {
        match self {
            Operation::Next => "not valid once END_OF_INPUT has been returned or the cursor is closed",
            Operation::SkipToMatchingEnd => "only valid at START_ELEMENT or START_DOCUMENT",
            Operation::Attributes | Operation::NamespaceDeclarations => {
                "only valid at START_ELEMENT, before any further state change"
            }
            Operation::NodeName => {
                "only valid at START_ELEMENT, END_ELEMENT, ATTRIBUTE, NAMESPACE or PROCESSING_INSTRUCTION"
            }
            Operation::StringValue => {
                "only valid at START_ELEMENT, TEXT, COMMENT, PROCESSING_INSTRUCTION, ATTRIBUTE, NAMESPACE or ATOMIC_VALUE"
            }
            Operation::AtomicValue => "only valid at ATOMIC_VALUE",
            Operation::SchemaType => "only valid at START_ELEMENT, ATTRIBUTE or ATOMIC_VALUE",
            Operation::SetPipelineContext => "only valid before the first call to next()",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Next => "next()",
            Operation::SkipToMatchingEnd => "skip_to_matching_end()",
            Operation::Attributes => "attributes()",
            Operation::NamespaceDeclarations => "namespace_declarations()",
            Operation::NodeName => "node_name()",
            Operation::StringValue => "string_value()",
            Operation::AtomicValue => "atomic_value()",
            Operation::SchemaType => "schema_type()",
            Operation::SetPipelineContext => "set_pipeline_context()",
        };
        f.write_str(name)
    }
}

/// Errors raised while driving a cursor chain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CursorError {
    /// An operation was called outside its valid state window.
    #[error("protocol violation: {operation} called at {current}: {message}")]
    ProtocolViolation {
        /// The offending operation.
        operation: Operation,
        /// The cursor's current event at the time of the call.
        current: Event,
        /// Description of the violated rule.
        message: String,
    },

    /// The source cursor failed while producing an event.
    #[error("upstream failure{}: {message}", .location.as_ref().map(|l| format!(" at {}", l)).unwrap_or_default())]
    Upstream {
        /// Description of the failure.
        message: String,
        /// Where in the source the failure occurred, if known.
        location: Option<Location>,
    },
}

impl CursorError {
    /// Create a protocol violation.
    #[inline]
    pub fn violation(operation: Operation, current: Event, message: impl Into<String>) -> Self {
        Self::ProtocolViolation {
            operation,
            current,
            message: message.into(),
        }
    }

    /// Create an upstream failure without location.
    #[inline]
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            location: None,
        }
    }

    /// Create an upstream failure at a known location.
    #[inline]
    pub fn upstream_at(message: impl Into<String>, location: Location) -> Self {
        Self::Upstream {
            message: message.into(),
            location: Some(location),
        }
    }

    /// Returns true if this is a protocol violation.
    #[inline]
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::ProtocolViolation { .. })
    }

    /// The operation a protocol violation refers to.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::ProtocolViolation { operation, .. } => Some(*operation),
            Self::Upstream { .. } => None,
        }
    }

    /// The source location of an upstream failure, if known.
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::Upstream { location, .. } => location.as_ref(),
            Self::ProtocolViolation { .. } => None,
        }
    }
}

impl From<std::io::Error> for CursorError {
    fn from(err: std::io::Error) -> Self {
        Self::upstream(format!("I/O error: {}", err))
    }
}

/// Result type for cursor operations.
pub type CursorResult<T> = Result<T, CursorError>;
