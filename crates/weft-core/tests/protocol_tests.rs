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

//! Integration tests for the cursor protocol over synthetic sources

use std::sync::Arc;
use weft_core::filter::Delegating;
use weft_core::{
    CollectingReporter, CursorError, Event, EventCursor, Operation, PipelineContext, Strictness,
};
use weft_test::{free_items, mixed_content, namespaced, record_all, scenario};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("weft_core=trace")
        .with_test_writer()
        .try_init();
}

fn tolerant() -> (Arc<PipelineContext>, Arc<CollectingReporter>) {
    let reporter = Arc::new(CollectingReporter::new());
    let context = PipelineContext::new()
        .with_strictness(Strictness::Tolerant)
        .with_reporter(reporter.clone())
        .into_shared();
    (context, reporter)
}

// ==================== Concrete Scenario ====================

#[test]
fn test_scenario_attributes_after_start_element() {
    let mut cursor = scenario().build().unwrap();
    assert_eq!(cursor.next().unwrap(), Event::StartDocument);
    assert_eq!(cursor.next().unwrap(), Event::StartElement);

    let attributes = cursor.attributes().unwrap();
    assert_eq!(attributes.len(), 1);
    assert_eq!(attributes.value("id"), Some("1"));
}

#[test]
fn test_scenario_skip_then_next() {
    let mut cursor = scenario().build().unwrap();
    cursor.next().unwrap();
    cursor.next().unwrap();

    assert_eq!(cursor.skip_to_matching_end().unwrap(), Event::EndElement);
    assert_eq!(cursor.node_name().unwrap().local_name(), "a");
    assert_eq!(cursor.next().unwrap(), Event::EndDocument);
    assert_eq!(cursor.next().unwrap(), Event::EndOfInput);
}

#[test]
fn test_scenario_string_value_consumes_element() {
    let mut cursor = scenario().build().unwrap();
    cursor.next().unwrap();
    cursor.next().unwrap();

    assert_eq!(cursor.string_value().unwrap(), "hi");
    assert_eq!(cursor.current(), Event::EndElement);
    assert_eq!(cursor.node_name().unwrap().local_name(), "a");
    assert_eq!(cursor.next().unwrap(), Event::EndDocument);
}

#[test]
fn test_scenario_through_decorators() {
    init_tracing();
    let mut cursor = Delegating::new(Delegating::new(scenario().build().unwrap()));
    cursor.next().unwrap();
    cursor.next().unwrap();
    assert_eq!(cursor.attributes().unwrap().value("id"), Some("1"));
    assert_eq!(cursor.string_value().unwrap(), "hi");
    assert_eq!(cursor.current(), Event::EndElement);
    assert_eq!(cursor.base().current(), Event::EndElement);
    assert_eq!(cursor.next().unwrap(), Event::EndDocument);
}

// ==================== Payload Access ====================

#[test]
fn test_mixed_content_string_value() {
    let mut cursor = mixed_content().build().unwrap();
    cursor.next().unwrap();
    cursor.next().unwrap();
    assert_eq!(cursor.string_value().unwrap(), "one two three");
    assert_eq!(cursor.node_name().unwrap().local_name(), "doc");
}

#[test]
fn test_namespace_declarations_are_per_element() {
    let mut cursor = namespaced().build().unwrap();
    cursor.next().unwrap();
    cursor.next().unwrap();

    let root = cursor.start_element().unwrap();
    assert_eq!(root.name.clark_name(), "{urn:p}root");
    assert_eq!(root.namespaces.len(), 2);
    assert_eq!(root.attributes.value_ns("urn:p", "flag"), Some("yes"));

    assert_eq!(cursor.next().unwrap(), Event::StartElement);
    assert!(cursor.namespace_declarations().unwrap().is_empty());
    cursor.next().unwrap();

    assert_eq!(cursor.next().unwrap(), Event::StartElement);
    let undeclared = cursor.namespace_declarations().unwrap();
    assert_eq!(undeclared.len(), 1);
    assert!(undeclared[0].is_undeclaration());
}

#[test]
fn test_free_standing_items() {
    let mut cursor = free_items().build().unwrap();
    let recorded = record_all(&mut cursor).unwrap();
    let events: Vec<Event> = recorded.iter().map(|r| r.event).collect();
    assert_eq!(
        events,
        vec![
            Event::AtomicValue,
            Event::AtomicValue,
            Event::AtomicValue,
            Event::Attribute,
            Event::Namespace,
            Event::StartElement,
            Event::Text,
            Event::EndElement,
            Event::EndOfInput,
        ]
    );
    assert_eq!(recorded[0].value.as_deref(), Some("true"));
    assert_eq!(recorded[0].schema_type.as_deref(), Some("xs:boolean"));
    assert_eq!(recorded[1].value.as_deref(), Some("7"));
    assert_eq!(recorded[3].value.as_deref(), Some("en"));
    assert_eq!(recorded[4].value.as_deref(), Some("urn:q"));
}

#[test]
fn test_atomic_value_downcast() {
    let mut cursor = free_items().build().unwrap();
    cursor.next().unwrap();
    assert_eq!(cursor.atomic_value().unwrap().downcast_ref::<bool>(), Some(&true));
    cursor.next().unwrap();
    assert_eq!(cursor.atomic_value().unwrap().downcast_ref::<i64>(), Some(&7));
}

// ==================== Protocol Violations ====================

#[test]
fn test_strict_attributes_outside_window() {
    let mut cursor = scenario().build().unwrap();
    cursor.next().unwrap();
    let err = cursor.attributes().unwrap_err();
    assert!(err.is_protocol_violation());
    assert_eq!(err.operation(), Some(Operation::Attributes));
}

#[test]
fn test_strict_next_after_end_of_input() {
    let mut cursor = scenario().build().unwrap();
    record_all(&mut cursor).unwrap();
    let err = cursor.next().unwrap_err();
    assert!(matches!(
        err,
        CursorError::ProtocolViolation {
            operation: Operation::Next,
            current: Event::EndOfInput,
            ..
        }
    ));
}

#[test]
fn test_strict_skip_outside_start_event() {
    let mut cursor = scenario().build().unwrap();
    cursor.next().unwrap();
    cursor.next().unwrap();
    cursor.next().unwrap();
    assert_eq!(cursor.current(), Event::Text);
    let err = cursor.skip_to_matching_end().unwrap_err();
    assert_eq!(err.operation(), Some(Operation::SkipToMatchingEnd));
    assert_eq!(cursor.current(), Event::Text);
}

#[test]
fn test_tolerant_mode_reports_and_continues() {
    init_tracing();
    let (context, reporter) = tolerant();
    let mut cursor = scenario().build_with(context).unwrap();

    cursor.next().unwrap();
    assert!(cursor.attributes().unwrap().is_empty());
    assert_eq!(cursor.atomic_value().unwrap().lexical(), "");

    cursor.next().unwrap();
    assert_eq!(cursor.next().unwrap(), Event::Text);
    assert_eq!(cursor.skip_to_matching_end().unwrap(), Event::Text);

    record_all(&mut cursor).unwrap();
    assert_eq!(cursor.next().unwrap(), Event::EndOfInput);
    assert_eq!(cursor.next().unwrap(), Event::EndOfInput);

    assert_eq!(reporter.len(), 5);
    assert!(reporter.errors().iter().all(CursorError::is_protocol_violation));
}

#[test]
fn test_set_context_after_start_fails_in_both_modes() {
    let (context, _) = tolerant();
    let mut cursor = scenario().build_with(context).unwrap();
    cursor.next().unwrap();
    let err = cursor
        .set_pipeline_context(PipelineContext::new().into_shared())
        .unwrap_err();
    assert_eq!(err.operation(), Some(Operation::SetPipelineContext));
}

#[test]
fn test_set_context_before_start_reaches_source() {
    let (context, reporter) = tolerant();
    let mut cursor = Delegating::new(scenario().build().unwrap());
    cursor.set_pipeline_context(context).unwrap();
    assert!(cursor.pipeline_context().is_tolerant());
    assert!(cursor.base().pipeline_context().is_tolerant());

    cursor.next().unwrap();
    cursor.attributes().unwrap();
    assert_eq!(reporter.len(), 1);
}

// ==================== Close ====================

#[test]
fn test_close_is_idempotent() {
    let mut cursor = scenario().build().unwrap();
    cursor.next().unwrap();
    cursor.close();
    cursor.close();

    let mut drained = scenario().build().unwrap();
    record_all(&mut drained).unwrap();
    drained.close();
    drained.close();
}

#[test]
fn test_next_after_close() {
    let mut cursor = Delegating::new(scenario().build().unwrap());
    cursor.next().unwrap();
    cursor.close();
    assert!(cursor.next().is_err());

    let (context, _) = tolerant();
    let mut cursor = scenario().build_with(context).unwrap();
    cursor.next().unwrap();
    cursor.close();
    assert_eq!(cursor.next().unwrap(), Event::EndOfInput);
}
