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

//! Capture a cursor's output as comparable values.

use weft_core::filter::Delegating;
use weft_core::{CursorResult, Event, EventCursor};

/// One event together with everything observable about it.
///
/// Payload is read through the cursor's own accessors, so two cursors that
/// record equal streams are indistinguishable to a consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
    pub event: Event,
    /// Clark name for named events.
    pub name: Option<String>,
    /// `(clark name, value)` pairs at `StartElement`.
    pub attributes: Vec<(String, String)>,
    /// Declarations as `prefix=uri` at `StartElement`, sorted.
    pub namespaces: Vec<String>,
    /// String value of leaf events.
    pub value: Option<String>,
    /// Schema type, where one is defined.
    pub schema_type: Option<String>,
}

impl RecordedEvent {
    fn capture<C: EventCursor + ?Sized>(cursor: &mut C, event: Event) -> CursorResult<Self> {
        let mut recorded = RecordedEvent {
            event,
            name: None,
            attributes: Vec::new(),
            namespaces: Vec::new(),
            value: None,
            schema_type: None,
        };
        match event {
            Event::StartElement => {
                recorded.name = Some(cursor.node_name()?.clark_name());
                recorded.attributes = cursor
                    .attributes()?
                    .iter()
                    .map(|a| (a.name().clark_name(), a.value().to_string()))
                    .collect();
                recorded.namespaces = cursor
                    .namespace_declarations()?
                    .iter()
                    .map(|ns| format!("{}={}", ns.prefix(), ns.uri()))
                    .collect();
                recorded.namespaces.sort();
                recorded.schema_type = Some(cursor.schema_type()?.to_string());
            }
            Event::EndElement => {
                recorded.name = Some(cursor.node_name()?.clark_name());
            }
            Event::ProcessingInstruction | Event::Attribute | Event::Namespace => {
                recorded.name = Some(cursor.node_name()?.clark_name());
                recorded.value = Some(cursor.string_value()?);
            }
            Event::Text | Event::Comment => {
                recorded.value = Some(cursor.string_value()?);
            }
            Event::AtomicValue => {
                recorded.value = Some(cursor.atomic_value()?.lexical().into_owned());
                recorded.schema_type = Some(cursor.schema_type()?.to_string());
            }
            _ => {}
        }
        Ok(recorded)
    }
}

/// Drain `cursor` to `EndOfInput`, recording every event including the last.
pub fn record_all<C: EventCursor + ?Sized>(cursor: &mut C) -> CursorResult<Vec<RecordedEvent>> {
    record_skipping(cursor, |_| false)
}

/// Like [`record_all`], but calls `skip_to_matching_end()` on every start
/// event for which `skip` returns true. The matching end event is recorded.
pub fn record_skipping<C, F>(cursor: &mut C, mut skip: F) -> CursorResult<Vec<RecordedEvent>>
where
    C: EventCursor + ?Sized,
    F: FnMut(&RecordedEvent) -> bool,
{
    let mut out = Vec::new();
    let mut event = cursor.next()?;
    loop {
        let recorded = RecordedEvent::capture(cursor, event)?;
        let skipping = event.is_start() && skip(&recorded);
        out.push(recorded);
        if event == Event::EndOfInput {
            return Ok(out);
        }
        event = if skipping {
            cursor.skip_to_matching_end()?
        } else {
            cursor.next()?
        };
    }
}

/// Wrap `cursor` in `layers` pass-through decorators.
pub fn wrap_n<'a>(cursor: Box<dyn EventCursor + 'a>, layers: usize) -> Box<dyn EventCursor + 'a> {
    (0..layers).fold(cursor, |inner, _| Box::new(Delegating::new(inner)))
}
