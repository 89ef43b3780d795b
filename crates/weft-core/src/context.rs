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

//! Configuration shared by every cursor in a chain.
//!
//! A [`PipelineContext`] is created once per chain and shared by reference
//! (`Arc`) between the source and all decorators. It carries the name pool,
//! the error-reporting sink and the strictness mode. It must not be replaced
//! once traversal has started; cursors enforce this in
//! [`set_pipeline_context`](crate::EventCursor::set_pipeline_context).
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use weft_core::{CollectingReporter, PipelineContext, Strictness};
//!
//! let reporter = Arc::new(CollectingReporter::new());
//! let context = PipelineContext::new()
//!     .with_strictness(Strictness::Tolerant)
//!     .with_reporter(reporter.clone())
//!     .into_shared();
//!
//! assert!(context.is_tolerant());
//! assert!(reporter.is_empty());
//! ```

use crate::error::{CursorError, CursorResult, Operation};
use crate::event::Event;
use crate::name::NamePool;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// How ordering violations are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Fail immediately with [`CursorError::ProtocolViolation`].
    #[default]
    Strict,
    /// Report the violation and continue with a documented fallback result.
    Tolerant,
}

/// Sink receiving every error a cursor raises or tolerates.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &CursorError);
}

/// Default reporter: logs through `tracing` at WARN level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, error: &CursorError) {
        warn!(error = %error, "cursor error");
    }
}

/// Reporter that keeps every reported error for later inspection.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    errors: Mutex<Vec<CursorError>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the errors reported so far.
    pub fn errors(&self) -> Vec<CursorError> {
        self.errors.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.errors.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.lock().is_empty()
    }
}

impl ErrorReporter for CollectingReporter {
    fn report(&self, error: &CursorError) {
        self.errors.lock().push(error.clone());
    }
}

/// Chain-wide configuration.
#[derive(Clone)]
pub struct PipelineContext {
    names: Arc<NamePool>,
    reporter: Arc<dyn ErrorReporter>,
    strictness: Strictness,
}

impl PipelineContext {
    /// A context with a fresh name pool, the tracing reporter and strict mode.
    pub fn new() -> Self {
        Self {
            names: Arc::new(NamePool::new()),
            reporter: Arc::new(TracingReporter),
            strictness: Strictness::Strict,
        }
    }

    /// Share an existing name pool.
    pub fn with_names(mut self, names: Arc<NamePool>) -> Self {
        self.names = names;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Wrap in an `Arc` for sharing across a chain.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    #[inline]
    pub fn names(&self) -> &Arc<NamePool> {
        &self.names
    }

    #[inline]
    pub fn reporter(&self) -> &dyn ErrorReporter {
        self.reporter.as_ref()
    }

    #[inline]
    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    #[inline]
    pub fn is_tolerant(&self) -> bool {
        self.strictness == Strictness::Tolerant
    }

    /// Send an error to the reporter.
    pub fn report(&self, error: &CursorError) {
        self.reporter.report(error);
    }

    /// Report a violation of `operation` at `current` and return it as an error,
    /// regardless of strictness.
    pub fn violation(&self, operation: Operation, current: Event) -> CursorError {
        let error = CursorError::violation(operation, current, operation.valid_window());
        self.report(&error);
        error
    }

    /// Report a violation of `operation` at `current`. In tolerant mode the
    /// call then succeeds with `fallback`; in strict mode it fails.
    pub fn tolerate<T>(&self, operation: Operation, current: Event, fallback: T) -> CursorResult<T> {
        let error = self.violation(operation, current);
        match self.strictness {
            Strictness::Strict => Err(error),
            Strictness::Tolerant => Ok(fallback),
        }
    }
}

impl Default for PipelineContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PipelineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineContext")
            .field("names", &self.names.len())
            .field("strictness", &self.strictness)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_strict() {
        let context = PipelineContext::default();
        assert_eq!(context.strictness(), Strictness::Strict);
        assert!(!context.is_tolerant());
        assert!(context.names().is_empty());
    }

    #[test]
    fn test_strict_tolerate_fails_and_reports() {
        let reporter = Arc::new(CollectingReporter::new());
        let context = PipelineContext::new().with_reporter(reporter.clone());
        let result = context.tolerate(Operation::Attributes, Event::Text, 0);
        let err = result.unwrap_err();
        assert!(err.is_protocol_violation());
        assert_eq!(reporter.len(), 1);
        assert_eq!(reporter.errors()[0], err);
    }

    #[test]
    fn test_tolerant_tolerate_returns_fallback_and_reports() {
        let reporter = Arc::new(CollectingReporter::new());
        let context = PipelineContext::new()
            .with_reporter(reporter.clone())
            .with_strictness(Strictness::Tolerant);
        let result = context.tolerate(Operation::AtomicValue, Event::StartElement, "fallback");
        assert_eq!(result, Ok("fallback"));
        assert_eq!(reporter.len(), 1);
        assert_eq!(reporter.errors()[0].operation(), Some(Operation::AtomicValue));
    }

    #[test]
    fn test_shared_name_pool() {
        let names = Arc::new(NamePool::new());
        let a = PipelineContext::new().with_names(Arc::clone(&names));
        let b = PipelineContext::new().with_names(Arc::clone(&names));
        a.names().intern("", "", "shared");
        assert_eq!(b.names().len(), 1);
    }

    #[test]
    fn test_debug_output() {
        let debug = format!("{:?}", PipelineContext::new());
        assert!(debug.contains("PipelineContext"));
        assert!(debug.contains("Strict"));
    }
}
