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

//! The pull protocol.
//!
//! An [`EventCursor`] exposes a tree or sequence as a linear, lazily advanced
//! series of [`Event`]s. The consumer drives it forward with
//! [`next`](EventCursor::next) and reads the data of the current event through
//! accessors that are only defined in certain states.
//!
//! # Ordering rules
//!
//! - `attributes()` and `namespace_declarations()` may be read, in either
//!   order, only while the current event is `StartElement`. Once the cursor
//!   moves on (to a child, or through `string_value()` or
//!   `skip_to_matching_end()`), they are gone.
//! - `string_value()` at `StartElement` consumes the whole element and leaves
//!   the cursor at the matching `EndElement`.
//! - `skip_to_matching_end()` is only defined at `StartElement` and
//!   `StartDocument`.
//!
//! Calls outside these windows are protocol violations. Whether they fail or
//! degrade to a fallback is decided by the chain's
//! [`Strictness`](crate::Strictness).
//!
//! # Example
//!
//! ```rust
//! use weft_core::{Event, EventCursor, SequenceBuilder};
//!
//! let mut cursor = SequenceBuilder::new()
//!     .start_element("a")
//!     .attribute("id", "1")
//!     .text("hi")
//!     .end_element()
//!     .build()?;
//!
//! assert_eq!(cursor.next()?, Event::StartElement);
//! assert_eq!(cursor.attributes()?.value("id"), Some("1"));
//! assert_eq!(cursor.string_value()?, "hi");
//! assert_eq!(cursor.current(), Event::EndElement);
//! assert_eq!(cursor.next()?, Event::EndOfInput);
//! # Ok::<(), weft_core::CursorError>(())
//! ```

use crate::attributes::AttributeSet;
use crate::context::PipelineContext;
use crate::error::{CursorError, CursorResult};
use crate::event::Event;
use crate::location::{Location, UnparsedEntity};
use crate::name::{NamespaceBinding, NodeName};
use crate::value::{AtomicValue, SchemaType};
use std::sync::Arc;

/// Pull-based traversal of a node/value sequence.
///
/// A cursor starts positioned before the first event (`current()` is
/// [`Event::StartOfInput`]) and is moved only by `next()`,
/// `skip_to_matching_end()` and `string_value()` at `StartElement`.
///
/// Cursors are single-threaded and non-reentrant; a decorator chain shares
/// mutable position state and must be driven from one place.
pub trait EventCursor {
    /// Advance to and return the next event.
    fn next(&mut self) -> CursorResult<Event>;

    /// The event most recently produced by a state-changing call.
    fn current(&self) -> Event;

    /// Attributes of the current element.
    fn attributes(&self) -> CursorResult<&AttributeSet>;

    /// Namespace declarations of the current element.
    ///
    /// For a top-level element this is the whole in-scope set; for a nested
    /// element it is the difference from its parent (declarations and
    /// undeclarations). Redundant entries are permitted.
    fn namespace_declarations(&self) -> CursorResult<&[NamespaceBinding]>;

    /// Skip the content of the current element or document and return its
    /// end event. The next call to `next()` returns whatever follows.
    fn skip_to_matching_end(&mut self) -> CursorResult<Event>;

    /// Name of the current element, attribute, namespace prefix or
    /// processing-instruction target.
    fn node_name(&self) -> CursorResult<&NodeName>;

    /// String value of the current node or atomic value.
    ///
    /// At `StartElement` this reads the element's entire content and leaves
    /// the cursor at the matching `EndElement`.
    fn string_value(&mut self) -> CursorResult<String>;

    /// The value of the current `AtomicValue` event.
    fn atomic_value(&self) -> CursorResult<&AtomicValue>;

    /// Type annotation of the current element, attribute or atomic value.
    fn schema_type(&self) -> CursorResult<SchemaType>;

    /// Location of the current event, if the source tracks it.
    fn source_location(&self) -> Option<Location> {
        None
    }

    /// Unparsed entities of the document.
    ///
    /// `None` means the source cannot tell; `Some(&[])` means it knows there
    /// are none.
    fn unparsed_entities(&self) -> Option<&[UnparsedEntity]> {
        None
    }

    /// Release resources. Safe to call at any point, any number of times.
    fn close(&mut self);

    fn pipeline_context(&self) -> &Arc<PipelineContext>;

    /// Replace the chain's context. Only allowed before the first `next()`.
    fn set_pipeline_context(&mut self, context: Arc<PipelineContext>) -> CursorResult<()>;

    /// Borrowed view of the current element's start tag.
    ///
    /// The view borrows the cursor, so it cannot outlive the event it
    /// describes.
    fn start_element(&self) -> CursorResult<StartElement<'_>> {
        Ok(StartElement {
            name: self.node_name()?,
            attributes: self.attributes()?,
            namespaces: self.namespace_declarations()?,
        })
    }
}

/// Snapshot of a `StartElement` event.
#[derive(Debug, Clone, Copy)]
pub struct StartElement<'a> {
    pub name: &'a NodeName,
    pub attributes: &'a AttributeSet,
    pub namespaces: &'a [NamespaceBinding],
}

impl<C: EventCursor + ?Sized> EventCursor for Box<C> {
    fn next(&mut self) -> CursorResult<Event> {
        (**self).next()
    }

    fn current(&self) -> Event {
        (**self).current()
    }

    fn attributes(&self) -> CursorResult<&AttributeSet> {
        (**self).attributes()
    }

    fn namespace_declarations(&self) -> CursorResult<&[NamespaceBinding]> {
        (**self).namespace_declarations()
    }

    fn skip_to_matching_end(&mut self) -> CursorResult<Event> {
        (**self).skip_to_matching_end()
    }

    fn node_name(&self) -> CursorResult<&NodeName> {
        (**self).node_name()
    }

    fn string_value(&mut self) -> CursorResult<String> {
        (**self).string_value()
    }

    fn atomic_value(&self) -> CursorResult<&AtomicValue> {
        (**self).atomic_value()
    }

    fn schema_type(&self) -> CursorResult<SchemaType> {
        (**self).schema_type()
    }

    fn source_location(&self) -> Option<Location> {
        (**self).source_location()
    }

    fn unparsed_entities(&self) -> Option<&[UnparsedEntity]> {
        (**self).unparsed_entities()
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn pipeline_context(&self) -> &Arc<PipelineContext> {
        (**self).pipeline_context()
    }

    fn set_pipeline_context(&mut self, context: Arc<PipelineContext>) -> CursorResult<()> {
        (**self).set_pipeline_context(context)
    }
}

/// Skip to the end matching the current start event by calling `next()`.
///
/// This is the baseline implementation of
/// [`skip_to_matching_end`](EventCursor::skip_to_matching_end) for sources
/// that cannot fast-forward, and for filters whose `next()` changes the
/// shape of the stream. The caller checks that the current event is a start
/// event.
pub fn skip_by_next<C: EventCursor + ?Sized>(cursor: &mut C) -> CursorResult<Event> {
    let mut depth = 0usize;
    loop {
        let event = cursor.next()?;
        match event {
            Event::StartElement | Event::StartDocument => depth += 1,
            Event::EndElement | Event::EndDocument => {
                if depth == 0 {
                    return Ok(event);
                }
                depth -= 1;
            }
            Event::EndOfInput => {
                return Err(CursorError::upstream(
                    "input ended before the end of the skipped subtree",
                ))
            }
            _ => {}
        }
    }
}

/// Read the string value of the current element by calling `next()`.
///
/// Concatenates every descendant text node and stops at the matching
/// `EndElement`. The caller checks that the current event is
/// `StartElement`.
pub fn collect_string_value<C: EventCursor + ?Sized>(cursor: &mut C) -> CursorResult<String> {
    let mut value = String::new();
    let mut depth = 0usize;
    loop {
        match cursor.next()? {
            Event::StartElement => depth += 1,
            Event::Text => value.push_str(&cursor.string_value()?),
            Event::EndElement => {
                if depth == 0 {
                    return Ok(value);
                }
                depth -= 1;
            }
            Event::EndDocument | Event::EndOfInput => {
                return Err(CursorError::upstream(
                    "element content ended without a matching END_ELEMENT",
                ))
            }
            _ => {}
        }
    }
}
