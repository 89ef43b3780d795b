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

//! Log every event passing through a chain.

use super::Delegating;
use crate::cursor::EventCursor;
use crate::error::CursorResult;
use crate::event::Event;
use crate::forward_cursor;
use tracing::{debug, trace};

/// Emits a `trace!` record for each event and a `debug!` summary on close.
///
/// The tracer sits anywhere in a chain and observes exactly what the layer
/// above it sees.
pub struct EventTracer<C> {
    base: Delegating<C>,
    label: &'static str,
    depth: usize,
    events: u64,
    skipped: u64,
}

impl<C: EventCursor> EventTracer<C> {
    pub fn new(base: C) -> Self {
        Self::labelled(base, "cursor")
    }

    /// A tracer whose records carry `label`, to tell layers apart.
    pub fn labelled(base: C, label: &'static str) -> Self {
        Self {
            base: Delegating::new(base),
            label,
            depth: 0,
            events: 0,
            skipped: 0,
        }
    }

    /// Events observed so far, including end events returned by skips.
    pub fn events_seen(&self) -> u64 {
        self.events
    }

    /// Subtrees skipped so far.
    pub fn subtrees_skipped(&self) -> u64 {
        self.skipped
    }

    fn observe(&mut self, event: Event) {
        self.events += 1;
        if event.is_end() {
            self.depth = self.depth.saturating_sub(1);
        }
        match event {
            Event::StartElement | Event::EndElement => {
                let name = self.base.node_name().map(|n| n.display_name()).unwrap_or_default();
                trace!(label = self.label, depth = self.depth, event = %event, name = %name, "event");
            }
            _ => trace!(label = self.label, depth = self.depth, event = %event, "event"),
        }
        if event.is_start() {
            self.depth += 1;
        }
    }
}

impl<C: EventCursor> EventCursor for EventTracer<C> {
    fn next(&mut self) -> CursorResult<Event> {
        let event = self.base.next()?;
        self.observe(event);
        Ok(event)
    }

    fn skip_to_matching_end(&mut self) -> CursorResult<Event> {
        let start = self.base.current();
        let event = self.base.skip_to_matching_end()?;
        if start.is_start() {
            self.skipped += 1;
            trace!(label = self.label, depth = self.depth, "skipped subtree");
            self.observe(event);
        }
        Ok(event)
    }

    fn string_value(&mut self) -> CursorResult<String> {
        let start = self.base.current();
        let value = self.base.string_value()?;
        if start == Event::StartElement {
            let end = self.base.current();
            self.observe(end);
        }
        Ok(value)
    }

    fn close(&mut self) {
        debug!(
            label = self.label,
            events = self.events,
            skipped = self.skipped,
            "closing traced cursor"
        );
        self.base.close()
    }

    forward_cursor!(base;
        current, attributes, namespace_declarations, node_name, atomic_value,
        schema_type, source_location, unparsed_entities, pipeline_context,
        set_pipeline_context);
}
