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

//! # Weft - composable pull cursors over XML event streams
//!
//! Weft models a document (or any sequence of nodes and values) as a stream
//! of [`Event`]s pulled one at a time through an [`EventCursor`]. A source
//! produces events; filters wrap a cursor and transform the stream; the
//! consumer drives the outermost cursor.
//!
//! ## Quick Start
//!
//! ```rust
//! use weft::filter::{CommentStripper, ElementPruner, LocalNames};
//! use weft::{Event, EventCursor};
//!
//! let text = r#"<doc><!-- draft --><title>Weft</title><notes>skip me</notes></doc>"#;
//!
//! let source = weft::read_xml(text);
//! let mut cursor = ElementPruner::new(CommentStripper::new(source), LocalNames::new(["notes"]));
//!
//! assert_eq!(cursor.next()?, Event::StartDocument);
//! assert_eq!(cursor.next()?, Event::StartElement);
//! assert_eq!(cursor.string_value()?, "Weft");
//! # Ok::<(), weft::CursorError>(())
//! ```
//!
//! ## Modules
//!
//! - [`filter`]: pass-through decorator and concrete filters
//! - `xml`: XML sources (feature = "xml", on by default)
//!
//! ## Protocol
//!
//! Payload accessors are only valid while the cursor sits on the matching
//! event; see [`EventCursor`] for the exact windows. Outside them a cursor
//! fails with [`CursorError::ProtocolViolation`], or returns a documented
//! fallback when its [`PipelineContext`] is [`Strictness::Tolerant`].

pub use weft_core::{
    collect_string_value, forward_cursor, skip_by_next, Atom, Atomic, AtomicValue, AttributeInfo,
    AttributeSet, CollectingReporter, CursorError, CursorResult, CursorState, ErrorReporter, Event,
    EventCursor, Item, Location, NamePool, NamespaceBinding, NodeName, Operation, PipelineContext,
    Proceed, SchemaType, SequenceBuilder, SequenceCursor, StartElement, Strictness,
    TracingReporter, UnparsedEntity, XML_NAMESPACE, XS_NAMESPACE,
};

pub mod filter {
    //! Pass-through decorator and concrete filters
    pub use weft_core::filter::{
        CommentStripper, Delegating, ElementPruner, EventTracer, LocalNames, NameTest,
    };
}

/// XML sources (requires `xml` feature)
#[cfg(feature = "xml")]
pub mod xml {
    pub use weft_xml::{
        parse_document, parse_document_named, TreeCursor, TreeCursorConfig, XmlReaderConfig,
        XmlReaderCursor,
    };
}

/// Stream events from XML text with the default reader configuration.
///
/// # Examples
///
/// ```rust
/// use weft::{Event, EventCursor};
///
/// let mut cursor = weft::read_xml("<a/>");
/// assert_eq!(cursor.next().unwrap(), Event::StartDocument);
/// ```
#[cfg(feature = "xml")]
#[inline]
pub fn read_xml(text: &str) -> weft_xml::XmlReaderCursor<&[u8]> {
    weft_xml::XmlReaderCursor::from_text(text, weft_xml::XmlReaderConfig::default())
}

/// Drain `cursor`, returning every event up to and including
/// `EndOfInput`.
///
/// # Errors
///
/// Returns the first error raised by the cursor.
pub fn events<C: EventCursor + ?Sized>(cursor: &mut C) -> CursorResult<Vec<Event>> {
    let mut out = Vec::new();
    loop {
        let event = cursor.next()?;
        out.push(event);
        if event == Event::EndOfInput {
            return Ok(out);
        }
    }
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_drains_sequence() {
        let mut cursor = SequenceBuilder::new().text("x").build().unwrap();
        assert_eq!(events(&mut cursor).unwrap(), vec![Event::Text, Event::EndOfInput]);
    }

    #[test]
    fn test_events_propagates_errors() {
        let mut cursor = SequenceBuilder::new().build().unwrap();
        events(&mut cursor).unwrap();
        assert!(events(&mut cursor).is_err());
    }

    #[cfg(feature = "xml")]
    #[test]
    fn test_read_xml() {
        let mut cursor = read_xml("<a>t</a>");
        assert_eq!(events(&mut cursor).unwrap().len(), 6);
    }
}
