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

//! State machine bookkeeping shared by source cursors.
//!
//! [`CursorState`] owns a source's current event, its stack of open
//! containers, and its lifecycle flags. Sources call
//! [`begin_next`](CursorState::begin_next) before producing an event and
//! [`advance`](CursorState::advance) with the event they produced; the state
//! rejects out-of-order calls and event streams that are not well nested.

use crate::context::PipelineContext;
use crate::error::{CursorError, CursorResult, Operation};
use crate::event::Event;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::debug;

/// What the owner of a [`CursorState`] should do after a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proceed {
    /// The operation is allowed; carry it out.
    Continue,
    /// The operation was a tolerated violation; return this event unchanged.
    Return(Event),
}

/// Current event, nesting stack and lifecycle of one source cursor.
#[derive(Debug)]
pub struct CursorState {
    current: Event,
    open: SmallVec<[Event; 16]>,
    context: Arc<PipelineContext>,
    started: bool,
    closed: bool,
}

impl CursorState {
    pub fn new(context: Arc<PipelineContext>) -> Self {
        Self {
            current: Event::StartOfInput,
            open: SmallVec::new(),
            context,
            started: false,
            closed: false,
        }
    }

    #[inline]
    pub fn current(&self) -> Event {
        self.current
    }

    #[inline]
    pub fn context(&self) -> &Arc<PipelineContext> {
        &self.context
    }

    /// Number of containers opened and not yet closed.
    #[inline]
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Returns true once `EndOfInput` has been produced.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.current == Event::EndOfInput
    }

    /// Check that `next()` may produce a new event.
    pub fn begin_next(&mut self) -> CursorResult<Proceed> {
        if self.closed || self.current == Event::EndOfInput {
            let current = self.current;
            self.context
                .tolerate(Operation::Next, current, Proceed::Return(Event::EndOfInput))
                .map(|proceed| {
                    self.current = Event::EndOfInput;
                    proceed
                })
        } else {
            self.started = true;
            Ok(Proceed::Continue)
        }
    }

    /// Check that `skip_to_matching_end()` is allowed at the current event.
    pub fn begin_skip(&self) -> CursorResult<Proceed> {
        if self.current.is_start() && !self.closed {
            Ok(Proceed::Continue)
        } else {
            self.context
                .tolerate(Operation::SkipToMatchingEnd, self.current, Proceed::Return(self.current))
        }
    }

    /// Record `event` as the new current event.
    ///
    /// Fails with an upstream error if the event breaks well-nesting, such as
    /// an `EndElement` closing a document or `EndOfInput` inside an element.
    pub fn advance(&mut self, event: Event) -> CursorResult<Event> {
        match event {
            Event::StartElement | Event::StartDocument => self.open.push(event),
            Event::EndElement | Event::EndDocument => {
                let opened = self.open.pop();
                if opened.and_then(Event::matching_end) != Some(event) {
                    return Err(self.unbalanced(event, opened));
                }
            }
            Event::EndOfInput => {
                if let Some(&opened) = self.open.last() {
                    return Err(self.unbalanced(event, Some(opened)));
                }
            }
            Event::StartOfInput => {
                return Err(CursorError::upstream("START_OF_INPUT cannot be produced by next()"));
            }
            _ => {}
        }
        self.current = event;
        Ok(event)
    }

    fn unbalanced(&self, event: Event, opened: Option<Event>) -> CursorError {
        let message = match opened {
            Some(start) => format!("{} does not close the open {}", event, start),
            None => format!("{} without a matching start event", event),
        };
        let error = CursorError::upstream(message);
        self.context.report(&error);
        error
    }

    /// Reject `operation` at the current event, yielding `fallback` in
    /// tolerant mode.
    pub fn reject<T>(&self, operation: Operation, fallback: T) -> CursorResult<T> {
        self.context.tolerate(operation, self.current, fallback)
    }

    /// Mark the cursor closed. Returns true the first time only.
    pub fn close(&mut self) -> bool {
        if self.closed {
            return false;
        }
        debug!(current = %self.current, depth = self.open.len(), "closing cursor");
        self.closed = true;
        true
    }

    /// Replace the context if traversal has not begun.
    pub fn set_context(&mut self, context: Arc<PipelineContext>) -> CursorResult<()> {
        if self.started {
            return Err(self.context.violation(Operation::SetPipelineContext, self.current));
        }
        self.context = context;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{CollectingReporter, Strictness};

    fn strict() -> CursorState {
        CursorState::new(PipelineContext::new().into_shared())
    }

    fn tolerant(reporter: Arc<CollectingReporter>) -> CursorState {
        CursorState::new(
            PipelineContext::new()
                .with_strictness(Strictness::Tolerant)
                .with_reporter(reporter)
                .into_shared(),
        )
    }

    #[test]
    fn test_well_nested_sequence() {
        let mut state = strict();
        for event in [
            Event::StartDocument,
            Event::StartElement,
            Event::Text,
            Event::EndElement,
            Event::EndDocument,
            Event::EndOfInput,
        ] {
            assert_eq!(state.begin_next().unwrap(), Proceed::Continue);
            assert_eq!(state.advance(event).unwrap(), event);
        }
        assert!(state.is_finished());
        assert_eq!(state.depth(), 0);
    }

    #[test]
    fn test_mismatched_end_is_upstream_failure() {
        let mut state = strict();
        state.advance(Event::StartDocument).unwrap();
        let err = state.advance(Event::EndElement).unwrap_err();
        assert!(!err.is_protocol_violation());
        assert!(err.to_string().contains("does not close"));
    }

    #[test]
    fn test_end_of_input_inside_element() {
        let mut state = strict();
        state.advance(Event::StartElement).unwrap();
        assert!(state.advance(Event::EndOfInput).is_err());
    }

    #[test]
    fn test_next_after_end_of_input_strict() {
        let mut state = strict();
        state.advance(Event::EndOfInput).unwrap();
        let err = state.begin_next().unwrap_err();
        assert_eq!(err.operation(), Some(Operation::Next));
    }

    #[test]
    fn test_next_after_close_tolerant() {
        let reporter = Arc::new(CollectingReporter::new());
        let mut state = tolerant(reporter.clone());
        state.begin_next().unwrap();
        state.advance(Event::StartElement).unwrap();
        assert!(state.close());
        assert!(!state.close());
        assert_eq!(state.begin_next().unwrap(), Proceed::Return(Event::EndOfInput));
        assert_eq!(state.current(), Event::EndOfInput);
        assert_eq!(reporter.len(), 1);
    }

    #[test]
    fn test_skip_guard() {
        let mut state = strict();
        assert!(state.begin_skip().is_err());
        state.advance(Event::StartElement).unwrap();
        assert_eq!(state.begin_skip().unwrap(), Proceed::Continue);
    }

    #[test]
    fn test_tolerated_skip_returns_current() {
        let mut state = tolerant(Arc::new(CollectingReporter::new()));
        state.advance(Event::Text).unwrap();
        assert_eq!(state.begin_skip().unwrap(), Proceed::Return(Event::Text));
    }

    #[test]
    fn test_context_locked_after_start() {
        let mut state = strict();
        assert!(state.set_context(PipelineContext::new().into_shared()).is_ok());
        state.begin_next().unwrap();
        let err = state.set_context(PipelineContext::new().into_shared()).unwrap_err();
        assert_eq!(err.operation(), Some(Operation::SetPipelineContext));
    }
}
