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

//! The closed set of traversal states a cursor moves through.
//!
//! A well-formed event stream is stack-structured: every `StartDocument` and
//! `StartElement` is closed by exactly one `EndDocument` / `EndElement`, with
//! arbitrarily nested content in between.
//!
//! ```text
//! StartOfInput
//! StartDocument
//!   StartElement "a"
//!     Text "hi"
//!     StartElement "b"
//!     EndElement "b"
//!   EndElement "a"
//! EndDocument
//! EndOfInput
//! ```

use std::fmt;

/// One state in the linear traversal of a node/value sequence.
///
/// `Event` carries no payload. The data belonging to an event is read through
/// the accessors of [`EventCursor`](crate::EventCursor) while the event is
/// current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Before the first call to `next()`.
    StartOfInput,
    /// A document node begins.
    StartDocument,
    /// An element node begins. Attributes and namespaces are readable.
    StartElement,
    /// A text node.
    Text,
    /// A comment node.
    Comment,
    /// A processing instruction node.
    ProcessingInstruction,
    /// A free-standing attribute node (never used inside element content).
    Attribute,
    /// A free-standing namespace node (never used inside element content).
    Namespace,
    /// A free-standing atomic value, not part of any node's content.
    AtomicValue,
    /// The element opened by the matching `StartElement` ends.
    EndElement,
    /// The document opened by the matching `StartDocument` ends.
    EndDocument,
    /// Terminal state; the sequence is exhausted.
    EndOfInput,
}

impl Event {
    /// Returns true for `StartDocument` and `StartElement`.
    #[inline]
    pub fn is_start(self) -> bool {
        matches!(self, Event::StartDocument | Event::StartElement)
    }

    /// Returns true for `EndDocument` and `EndElement`.
    #[inline]
    pub fn is_end(self) -> bool {
        matches!(self, Event::EndDocument | Event::EndElement)
    }

    /// Returns true for events that neither open nor close a container.
    #[inline]
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            Event::Text
                | Event::Comment
                | Event::ProcessingInstruction
                | Event::Attribute
                | Event::Namespace
                | Event::AtomicValue
        )
    }

    /// The end event that closes this start event, if this is a start event.
    #[inline]
    pub fn matching_end(self) -> Option<Event> {
        match self {
            Event::StartDocument => Some(Event::EndDocument),
            Event::StartElement => Some(Event::EndElement),
            _ => None,
        }
    }

    /// The conventional upper-case name of the event.
    pub fn as_str(self) -> &'static str {
        match self {
            Event::StartOfInput => "START_OF_INPUT",
            Event::StartDocument => "START_DOCUMENT",
            Event::StartElement => "START_ELEMENT",
            Event::Text => "TEXT",
            Event::Comment => "COMMENT",
            Event::ProcessingInstruction => "PROCESSING_INSTRUCTION",
            Event::Attribute => "ATTRIBUTE",
            Event::Namespace => "NAMESPACE",
            Event::AtomicValue => "ATOMIC_VALUE",
            Event::EndElement => "END_ELEMENT",
            Event::EndDocument => "END_DOCUMENT",
            Event::EndOfInput => "END_OF_INPUT",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
