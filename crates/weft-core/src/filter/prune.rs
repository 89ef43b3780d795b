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

//! Remove whole elements from the stream.

use super::Delegating;
use crate::cursor::{collect_string_value, EventCursor};
use crate::error::CursorResult;
use crate::event::Event;
use crate::name::{Atom, NodeName};
use crate::forward_cursor;
use tracing::trace;

/// Decides whether an element is removed.
pub trait NameTest {
    fn matches(&self, name: &NodeName) -> bool;
}

impl<F> NameTest for F
where
    F: Fn(&NodeName) -> bool,
{
    fn matches(&self, name: &NodeName) -> bool {
        self(name)
    }
}

/// Matches elements by local name, in any namespace.
#[derive(Debug, Clone, Default)]
pub struct LocalNames(Vec<Atom>);

impl LocalNames {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(names.into_iter().map(|n| Atom::from(n.as_ref())).collect())
    }
}

impl NameTest for LocalNames {
    fn matches(&self, name: &NodeName) -> bool {
        self.0.iter().any(|local| &**local == name.local_name())
    }
}

/// Drops every element whose name passes a [`NameTest`], together with its
/// content.
///
/// Matching subtrees are discarded with the inner cursor's
/// `skip_to_matching_end`, so a source with fast skip never materialises
/// them. The string value of an element is computed from the filtered
/// stream.
pub struct ElementPruner<C, T> {
    base: Delegating<C>,
    test: T,
    pruned: usize,
}

impl<C: EventCursor, T: NameTest> ElementPruner<C, T> {
    pub fn new(base: C, test: T) -> Self {
        Self {
            base: Delegating::new(base),
            test,
            pruned: 0,
        }
    }

    /// Number of elements removed so far.
    pub fn pruned(&self) -> usize {
        self.pruned
    }

    pub fn into_inner(self) -> C {
        self.base.into_inner()
    }
}

impl<C: EventCursor, T: NameTest> EventCursor for ElementPruner<C, T> {
    fn next(&mut self) -> CursorResult<Event> {
        loop {
            let event = self.base.next()?;
            if event == Event::StartElement && self.test.matches(self.base.node_name()?) {
                trace!(name = %self.base.node_name()?, "pruning element");
                self.base.skip_to_matching_end()?;
                self.pruned += 1;
                continue;
            }
            return Ok(event);
        }
    }

    fn string_value(&mut self) -> CursorResult<String> {
        if self.base.current() == Event::StartElement {
            collect_string_value(self)
        } else {
            self.base.string_value()
        }
    }

    forward_cursor!(base;
        current, attributes, namespace_declarations, skip_to_matching_end,
        node_name, atomic_value, schema_type, source_location,
        unparsed_entities, close, pipeline_context, set_pipeline_context);
}
