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

//! Composable pass-through decorators.
//!
//! [`Delegating`] wraps one inner cursor and forwards every operation to it,
//! keeping its own current-event slot. A concrete filter embeds a
//! `Delegating` and implements [`EventCursor`] itself: it overrides the
//! operations it cares about and forwards the rest with
//! [`forward_cursor!`](crate::forward_cursor), so the forwarding is explicit
//! in the filter's source.
//!
//! Filters stack to any depth. A filter never assumes it is the outermost
//! or innermost layer; it only talks to the cursor directly beneath it.
//!
//! ```text
//! consumer ──next()──▶ EventTracer ──▶ ElementPruner ──▶ CommentStripper ──▶ source
//! ```
//!
//! # Writing a filter
//!
//! ```rust
//! use weft_core::filter::Delegating;
//! use weft_core::{forward_cursor, CursorResult, Event, EventCursor};
//!
//! /// Drops every text node.
//! struct TextDropper<C> {
//!     base: Delegating<C>,
//! }
//!
//! impl<C: EventCursor> EventCursor for TextDropper<C> {
//!     fn next(&mut self) -> CursorResult<Event> {
//!         loop {
//!             let event = self.base.next()?;
//!             if event != Event::Text {
//!                 return Ok(event);
//!             }
//!         }
//!     }
//!
//!     fn string_value(&mut self) -> CursorResult<String> {
//!         if self.base.current() == Event::StartElement {
//!             weft_core::collect_string_value(self)
//!         } else {
//!             self.base.string_value()
//!         }
//!     }
//!
//!     forward_cursor!(base;
//!         current, attributes, namespace_declarations, skip_to_matching_end,
//!         node_name, atomic_value, schema_type, source_location,
//!         unparsed_entities, close, pipeline_context, set_pipeline_context);
//! }
//! ```

mod comments;
mod prune;
mod trace;

pub use comments::CommentStripper;
pub use prune::{ElementPruner, LocalNames, NameTest};
pub use trace::EventTracer;

use crate::attributes::AttributeSet;
use crate::context::PipelineContext;
use crate::cursor::EventCursor;
use crate::error::CursorResult;
use crate::event::Event;
use crate::location::{Location, UnparsedEntity};
use crate::name::{NamePool, NamespaceBinding, NodeName};
use crate::value::{AtomicValue, SchemaType};
use std::sync::Arc;
use tracing::debug;

/// Forward the listed [`EventCursor`] methods to a field.
///
/// Used inside an `impl EventCursor for ...` block. The field must itself
/// implement `EventCursor`, normally a [`Delegating`].
///
/// ```text
/// forward_cursor!(base; current, attributes, close);
/// ```
#[macro_export]
macro_rules! forward_cursor {
    ($field:ident; $($method:ident),+ $(,)?) => {
        $( $crate::forward_cursor!(@method $field $method); )+
    };
    (@method $field:ident next) => {
        fn next(&mut self) -> $crate::CursorResult<$crate::Event> {
            $crate::EventCursor::next(&mut self.$field)
        }
    };
    (@method $field:ident current) => {
        fn current(&self) -> $crate::Event {
            $crate::EventCursor::current(&self.$field)
        }
    };
    (@method $field:ident attributes) => {
        fn attributes(&self) -> $crate::CursorResult<&$crate::AttributeSet> {
            $crate::EventCursor::attributes(&self.$field)
        }
    };
    (@method $field:ident namespace_declarations) => {
        fn namespace_declarations(&self) -> $crate::CursorResult<&[$crate::NamespaceBinding]> {
            $crate::EventCursor::namespace_declarations(&self.$field)
        }
    };
    (@method $field:ident skip_to_matching_end) => {
        fn skip_to_matching_end(&mut self) -> $crate::CursorResult<$crate::Event> {
            $crate::EventCursor::skip_to_matching_end(&mut self.$field)
        }
    };
    (@method $field:ident node_name) => {
        fn node_name(&self) -> $crate::CursorResult<&$crate::NodeName> {
            $crate::EventCursor::node_name(&self.$field)
        }
    };
    (@method $field:ident string_value) => {
        fn string_value(&mut self) -> $crate::CursorResult<::std::string::String> {
            $crate::EventCursor::string_value(&mut self.$field)
        }
    };
    (@method $field:ident atomic_value) => {
        fn atomic_value(&self) -> $crate::CursorResult<&$crate::AtomicValue> {
            $crate::EventCursor::atomic_value(&self.$field)
        }
    };
    (@method $field:ident schema_type) => {
        fn schema_type(&self) -> $crate::CursorResult<$crate::SchemaType> {
            $crate::EventCursor::schema_type(&self.$field)
        }
    };
    (@method $field:ident source_location) => {
        fn source_location(&self) -> ::std::option::Option<$crate::Location> {
            $crate::EventCursor::source_location(&self.$field)
        }
    };
    (@method $field:ident unparsed_entities) => {
        fn unparsed_entities(&self) -> ::std::option::Option<&[$crate::UnparsedEntity]> {
            $crate::EventCursor::unparsed_entities(&self.$field)
        }
    };
    (@method $field:ident close) => {
        fn close(&mut self) {
            $crate::EventCursor::close(&mut self.$field)
        }
    };
    (@method $field:ident pipeline_context) => {
        fn pipeline_context(&self) -> &::std::sync::Arc<$crate::PipelineContext> {
            $crate::EventCursor::pipeline_context(&self.$field)
        }
    };
    (@method $field:ident set_pipeline_context) => {
        fn set_pipeline_context(
            &mut self,
            context: ::std::sync::Arc<$crate::PipelineContext>,
        ) -> $crate::CursorResult<()> {
            $crate::EventCursor::set_pipeline_context(&mut self.$field, context)
        }
    };
}

/// Pass-through decorator around one inner cursor.
///
/// On its own it changes nothing: a chain of any number of `Delegating`
/// layers produces exactly the events of the source. It owns its current
/// event, updated by every state-changing call that passes through it, and
/// shares the inner cursor's context.
#[derive(Debug)]
pub struct Delegating<C> {
    base: C,
    context: Arc<PipelineContext>,
    current: Event,
}

impl<C: EventCursor> Delegating<C> {
    /// Wrap `base`, adopting its pipeline context and current event.
    pub fn new(base: C) -> Self {
        let context = Arc::clone(base.pipeline_context());
        let current = base.current();
        debug!(current = %current, "wrapping cursor");
        Self {
            base,
            context,
            current,
        }
    }

    /// The cursor this decorator forwards to.
    pub fn base(&self) -> &C {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut C {
        &mut self.base
    }

    /// Unwrap, returning the inner cursor.
    pub fn into_inner(self) -> C {
        self.base
    }

    /// The name pool of the chain's context.
    pub fn names(&self) -> &NamePool {
        self.context.names()
    }

    /// Overwrite the current event.
    ///
    /// A filter that reports an event other than the one its inner cursor
    /// returned must record it here, so that `current()` stays consistent
    /// with what the filter handed out.
    pub fn set_current(&mut self, event: Event) {
        self.current = event;
    }
}

impl<C: EventCursor> EventCursor for Delegating<C> {
    fn next(&mut self) -> CursorResult<Event> {
        let event = self.base.next()?;
        self.current = event;
        Ok(event)
    }

    fn current(&self) -> Event {
        self.current
    }

    fn attributes(&self) -> CursorResult<&AttributeSet> {
        self.base.attributes()
    }

    fn namespace_declarations(&self) -> CursorResult<&[NamespaceBinding]> {
        self.base.namespace_declarations()
    }

    fn skip_to_matching_end(&mut self) -> CursorResult<Event> {
        let event = self.base.skip_to_matching_end()?;
        self.current = event;
        Ok(event)
    }

    fn node_name(&self) -> CursorResult<&NodeName> {
        self.base.node_name()
    }

    fn string_value(&mut self) -> CursorResult<String> {
        let value = self.base.string_value()?;
        // Reading an element's string value moves the inner cursor.
        self.current = self.base.current();
        Ok(value)
    }

    fn atomic_value(&self) -> CursorResult<&AtomicValue> {
        self.base.atomic_value()
    }

    fn schema_type(&self) -> CursorResult<SchemaType> {
        self.base.schema_type()
    }

    fn source_location(&self) -> Option<Location> {
        self.base.source_location()
    }

    fn unparsed_entities(&self) -> Option<&[UnparsedEntity]> {
        self.base.unparsed_entities()
    }

    fn close(&mut self) {
        self.base.close()
    }

    fn pipeline_context(&self) -> &Arc<PipelineContext> {
        &self.context
    }

    fn set_pipeline_context(&mut self, context: Arc<PipelineContext>) -> CursorResult<()> {
        self.base.set_pipeline_context(Arc::clone(&context))?;
        debug!("pipeline context replaced");
        self.context = context;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::{SequenceBuilder, SequenceCursor};

    fn source() -> SequenceCursor {
        SequenceBuilder::new()
            .start_document()
            .start_element("a")
            .attribute("id", "1")
            .text("hi")
            .start_element("b")
            .end_element()
            .end_element()
            .end_document()
            .build()
            .unwrap()
    }

    #[test]
    fn test_delegating_adopts_context_and_current() {
        let base = source();
        let context = Arc::clone(base.pipeline_context());
        let wrapped = Delegating::new(base);
        assert!(Arc::ptr_eq(wrapped.pipeline_context(), &context));
        assert_eq!(wrapped.current(), Event::StartOfInput);
    }

    #[test]
    fn test_delegating_wraps_mid_stream() {
        let mut base = source();
        base.next().unwrap();
        base.next().unwrap();
        let wrapped = Delegating::new(base);
        assert_eq!(wrapped.current(), Event::StartElement);
        assert_eq!(wrapped.attributes().unwrap().value("id"), Some("1"));
    }

    #[test]
    fn test_delegating_tracks_string_value_move() {
        let mut wrapped = Delegating::new(Delegating::new(source()));
        wrapped.next().unwrap();
        wrapped.next().unwrap();
        assert_eq!(wrapped.string_value().unwrap(), "hi");
        assert_eq!(wrapped.current(), Event::EndElement);
        assert_eq!(wrapped.base().current(), Event::EndElement);
    }

    #[test]
    fn test_set_context_propagates_down() {
        let mut wrapped = Delegating::new(Delegating::new(source()));
        let context = PipelineContext::new().into_shared();
        wrapped.set_pipeline_context(Arc::clone(&context)).unwrap();
        assert!(Arc::ptr_eq(wrapped.pipeline_context(), &context));
        assert!(Arc::ptr_eq(wrapped.base().pipeline_context(), &context));
        assert!(Arc::ptr_eq(wrapped.base().base().pipeline_context(), &context));
    }

    #[test]
    fn test_set_context_after_start_fails() {
        let mut wrapped = Delegating::new(source());
        let before = Arc::clone(wrapped.pipeline_context());
        wrapped.next().unwrap();
        assert!(wrapped
            .set_pipeline_context(PipelineContext::new().into_shared())
            .is_err());
        assert!(Arc::ptr_eq(wrapped.pipeline_context(), &before));
    }

    #[test]
    fn test_into_inner() {
        let mut wrapped = Delegating::new(source());
        wrapped.next().unwrap();
        let mut inner = wrapped.into_inner();
        assert_eq!(inner.current(), Event::StartDocument);
        assert_eq!(inner.next().unwrap(), Event::StartElement);
    }
}
