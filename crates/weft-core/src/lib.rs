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

//! Weft Core: pull-based event cursors for the XPath data model
//!
//! This crate defines a streaming cursor protocol for walking documents,
//! elements, attributes, namespaces, text, comments, processing instructions
//! and free atomic values one event at a time, without materialising a tree,
//! and a decorator mechanism for inserting transformations into a traversal.
//!
//! # Architecture
//!
//! - **event** - the closed [`Event`] enumeration
//! - **cursor** - the [`EventCursor`] protocol and generic traversal helpers
//! - **state** - [`CursorState`], the state machine shared by sources
//! - **context** - [`PipelineContext`]: name pool, error sink, strictness
//! - **filter** - [`Delegating`](filter::Delegating) and concrete filters
//! - **sequence** - [`SequenceCursor`], a source over prebuilt items
//!
//! # Example
//!
//! ```rust
//! use weft_core::filter::{CommentStripper, EventTracer};
//! use weft_core::{Event, EventCursor, SequenceBuilder};
//!
//! let source = SequenceBuilder::new()
//!     .start_document()
//!     .start_element("a")
//!     .attribute("id", "1")
//!     .comment("ignored")
//!     .text("hi")
//!     .end_element()
//!     .end_document()
//!     .build()?;
//!
//! let mut chain = EventTracer::new(CommentStripper::new(source));
//! assert_eq!(chain.next()?, Event::StartDocument);
//! assert_eq!(chain.next()?, Event::StartElement);
//! assert_eq!(chain.attributes()?.value("id"), Some("1"));
//! assert_eq!(chain.next()?, Event::Text);
//! chain.close();
//! # Ok::<(), weft_core::CursorError>(())
//! ```

mod attributes;
mod context;
mod cursor;
mod error;
mod event;
mod location;
mod name;
mod sequence;
mod state;
mod value;

pub mod filter;

pub use attributes::{AttributeInfo, AttributeSet};
pub use context::{CollectingReporter, ErrorReporter, PipelineContext, Strictness, TracingReporter};
pub use cursor::{collect_string_value, skip_by_next, EventCursor, StartElement};
pub use error::{CursorError, CursorResult, Operation};
pub use event::Event;
pub use location::{Location, UnparsedEntity};
pub use name::{Atom, NamePool, NamespaceBinding, NodeName, XML_NAMESPACE, XS_NAMESPACE};
pub use sequence::{Item, SequenceBuilder, SequenceCursor};
pub use state::{CursorState, Proceed};
pub use value::{Atomic, AtomicValue, SchemaType};
