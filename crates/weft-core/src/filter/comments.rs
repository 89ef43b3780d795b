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

//! Drop comments and processing instructions.

use super::Delegating;
use crate::cursor::EventCursor;
use crate::error::CursorResult;
use crate::event::Event;
use crate::forward_cursor;

/// Removes `Comment` and `ProcessingInstruction` events.
///
/// Neither contributes to an element's string value, so `string_value`
/// passes straight through to the inner cursor.
pub struct CommentStripper<C> {
    base: Delegating<C>,
    keep_processing_instructions: bool,
}

impl<C: EventCursor> CommentStripper<C> {
    pub fn new(base: C) -> Self {
        Self {
            base: Delegating::new(base),
            keep_processing_instructions: false,
        }
    }

    /// Strip comments only.
    pub fn comments_only(base: C) -> Self {
        Self {
            base: Delegating::new(base),
            keep_processing_instructions: true,
        }
    }

    fn is_stripped(&self, event: Event) -> bool {
        match event {
            Event::Comment => true,
            Event::ProcessingInstruction => !self.keep_processing_instructions,
            _ => false,
        }
    }
}

impl<C: EventCursor> EventCursor for CommentStripper<C> {
    fn next(&mut self) -> CursorResult<Event> {
        loop {
            let event = self.base.next()?;
            if !self.is_stripped(event) {
                return Ok(event);
            }
        }
    }

    forward_cursor!(base;
        current, attributes, namespace_declarations, skip_to_matching_end,
        node_name, string_value, atomic_value, schema_type, source_location,
        unparsed_entities, close, pipeline_context, set_pipeline_context);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::{SequenceBuilder, SequenceCursor};

    fn source() -> SequenceCursor {
        SequenceBuilder::new()
            .start_document()
            .comment("prolog")
            .start_element("a")
            .processing_instruction("render", "fast")
            .text("x")
            .comment("inner")
            .end_element()
            .end_document()
            .build()
            .unwrap()
    }

    fn events<C: EventCursor>(cursor: &mut C) -> Vec<Event> {
        let mut out = Vec::new();
        loop {
            let event = cursor.next().unwrap();
            out.push(event);
            if event == Event::EndOfInput {
                return out;
            }
        }
    }

    #[test]
    fn test_strips_comments_and_pis() {
        let mut cursor = CommentStripper::new(source());
        assert_eq!(
            events(&mut cursor),
            vec![
                Event::StartDocument,
                Event::StartElement,
                Event::Text,
                Event::EndElement,
                Event::EndDocument,
                Event::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_comments_only_keeps_pis() {
        let mut cursor = CommentStripper::comments_only(source());
        let events = events(&mut cursor);
        assert!(events.contains(&Event::ProcessingInstruction));
        assert!(!events.contains(&Event::Comment));
    }

    #[test]
    fn test_string_value_passes_through() {
        let mut cursor = CommentStripper::new(source());
        cursor.next().unwrap();
        cursor.next().unwrap();
        assert_eq!(cursor.string_value().unwrap(), "x");
        assert_eq!(cursor.current(), Event::EndElement);
    }
}
