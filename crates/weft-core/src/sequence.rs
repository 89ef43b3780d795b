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

//! A source cursor over an owned, prebuilt item list.
//!
//! [`SequenceCursor`] replays a sequence of [`Item`]s, each carrying the
//! payload of its event. It is the source for synthetically constructed
//! sequences (query results, test fixtures) and has no source location.
//!
//! Construction validates well-nesting and records, for every start item,
//! the index of its matching end. `skip_to_matching_end()` is therefore a
//! single jump.
//!
//! # Examples
//!
//! ```rust
//! use weft_core::{Event, EventCursor, SequenceBuilder};
//!
//! let mut cursor = SequenceBuilder::new()
//!     .start_document()
//!     .start_element("a")
//!     .attribute("id", "1")
//!     .text("hi")
//!     .start_element("b")
//!     .end_element()
//!     .end_element()
//!     .end_document()
//!     .build()?;
//!
//! assert_eq!(cursor.next()?, Event::StartDocument);
//! assert_eq!(cursor.next()?, Event::StartElement);
//! assert_eq!(cursor.skip_to_matching_end()?, Event::EndElement);
//! assert_eq!(cursor.next()?, Event::EndDocument);
//! # Ok::<(), weft_core::CursorError>(())
//! ```

use crate::attributes::{AttributeInfo, AttributeSet};
use crate::context::PipelineContext;
use crate::cursor::{collect_string_value, EventCursor};
use crate::error::{CursorError, CursorResult, Operation};
use crate::event::Event;
use crate::name::{NamespaceBinding, NodeName};
use crate::state::{CursorState, Proceed};
use crate::value::{AtomicValue, SchemaType};
use std::sync::Arc;

const NO_NAMESPACES: &[NamespaceBinding] = &[];

/// One event together with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    StartDocument,
    EndDocument,
    StartElement {
        name: NodeName,
        attributes: AttributeSet,
        namespaces: Vec<NamespaceBinding>,
        schema_type: SchemaType,
    },
    EndElement {
        name: NodeName,
    },
    Text(String),
    Comment(String),
    ProcessingInstruction {
        target: NodeName,
        data: String,
    },
    /// A free-standing attribute.
    Attribute(AttributeInfo),
    /// A free-standing namespace node. `name` is the prefix as a local name.
    Namespace {
        name: NodeName,
        binding: NamespaceBinding,
    },
    Atomic(AtomicValue),
}

impl Item {
    /// The event this item produces.
    pub fn event(&self) -> Event {
        match self {
            Item::StartDocument => Event::StartDocument,
            Item::EndDocument => Event::EndDocument,
            Item::StartElement { .. } => Event::StartElement,
            Item::EndElement { .. } => Event::EndElement,
            Item::Text(_) => Event::Text,
            Item::Comment(_) => Event::Comment,
            Item::ProcessingInstruction { .. } => Event::ProcessingInstruction,
            Item::Attribute(_) => Event::Attribute,
            Item::Namespace { .. } => Event::Namespace,
            Item::Atomic(_) => Event::AtomicValue,
        }
    }
}

/// Fluent builder for [`SequenceCursor`].
///
/// End items are given names automatically. Attributes and namespace
/// declarations attach to the element most recently started, and are only
/// accepted directly after its `start_element`.
#[derive(Debug, Default)]
pub struct SequenceBuilder {
    items: Vec<Item>,
    open: Vec<Option<NodeName>>,
    error: Option<String>,
}

impl SequenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, message: String) {
        if self.error.is_none() {
            self.error = Some(message);
        }
    }

    pub fn start_document(mut self) -> Self {
        self.items.push(Item::StartDocument);
        self.open.push(None);
        self
    }

    pub fn end_document(mut self) -> Self {
        match self.open.pop() {
            Some(None) => self.items.push(Item::EndDocument),
            _ => self.fail(format!("end_document at item {} does not close a document", self.items.len())),
        }
        self
    }

    /// Start an untyped element.
    pub fn start_element(self, name: impl Into<NodeName>) -> Self {
        self.start_typed_element(name, SchemaType::untyped())
    }

    pub fn start_typed_element(mut self, name: impl Into<NodeName>, schema_type: SchemaType) -> Self {
        let name = name.into();
        self.open.push(Some(name.clone()));
        self.items.push(Item::StartElement {
            name,
            attributes: AttributeSet::new(),
            namespaces: Vec::new(),
            schema_type,
        });
        self
    }

    pub fn end_element(mut self) -> Self {
        match self.open.pop() {
            Some(Some(name)) => self.items.push(Item::EndElement { name }),
            _ => self.fail(format!("end_element at item {} does not close an element", self.items.len())),
        }
        self
    }

    /// Add an untyped attribute to the element just started.
    pub fn attribute(self, name: impl Into<NodeName>, value: impl Into<String>) -> Self {
        self.attribute_info(AttributeInfo::new(name, value))
    }

    pub fn attribute_info(mut self, attribute: AttributeInfo) -> Self {
        match self.items.last_mut() {
            Some(Item::StartElement { attributes, .. }) => {
                attributes.push(attribute);
            }
            _ => self.fail(format!("attribute {} is not directly after a start_element", attribute.name())),
        }
        self
    }

    /// Add a namespace declaration to the element just started.
    pub fn namespace(mut self, binding: NamespaceBinding) -> Self {
        match self.items.last_mut() {
            Some(Item::StartElement { namespaces, .. }) => namespaces.push(binding),
            _ => self.fail(format!("namespace {} is not directly after a start_element", binding)),
        }
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.items.push(Item::Text(text.into()));
        self
    }

    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.items.push(Item::Comment(text.into()));
        self
    }

    pub fn processing_instruction(mut self, target: &str, data: impl Into<String>) -> Self {
        self.items.push(Item::ProcessingInstruction {
            target: NodeName::local(target),
            data: data.into(),
        });
        self
    }

    /// Add a free-standing attribute node.
    pub fn top_level_attribute(mut self, attribute: AttributeInfo) -> Self {
        self.items.push(Item::Attribute(attribute));
        self
    }

    /// Add a free-standing namespace node.
    pub fn top_level_namespace(mut self, binding: NamespaceBinding) -> Self {
        self.items.push(Item::Namespace {
            name: NodeName::local(binding.prefix()),
            binding,
        });
        self
    }

    pub fn atomic(mut self, value: impl Into<AtomicValue>) -> Self {
        self.items.push(Item::Atomic(value.into()));
        self
    }

    /// The items added so far.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Build with a fresh default context.
    pub fn build(self) -> CursorResult<SequenceCursor> {
        self.build_with(PipelineContext::new().into_shared())
    }

    pub fn build_with(self, context: Arc<PipelineContext>) -> CursorResult<SequenceCursor> {
        if let Some(message) = self.error {
            return Err(CursorError::upstream(message));
        }
        SequenceCursor::with_context(self.items, context)
    }
}

/// Source cursor replaying an owned item list.
#[derive(Debug)]
pub struct SequenceCursor {
    items: Vec<Item>,
    /// For each start item, the index of its matching end item.
    partner: Vec<usize>,
    /// Index of the current item, `None` before the first and after the last.
    position: Option<usize>,
    next_index: usize,
    state: CursorState,
}

impl SequenceCursor {
    /// Create a cursor with a fresh default context.
    pub fn new(items: Vec<Item>) -> CursorResult<Self> {
        Self::with_context(items, PipelineContext::new().into_shared())
    }

    /// Create a cursor, validating that `items` are well nested.
    pub fn with_context(items: Vec<Item>, context: Arc<PipelineContext>) -> CursorResult<Self> {
        let mut partner = vec![usize::MAX; items.len()];
        let mut open: Vec<usize> = Vec::new();
        for (index, item) in items.iter().enumerate() {
            let event = item.event();
            if event.is_start() {
                open.push(index);
            } else if event.is_end() {
                let start = open.pop().ok_or_else(|| {
                    CursorError::upstream(format!("{} at item {} has no matching start", event, index))
                })?;
                if items[start].event().matching_end() != Some(event) {
                    return Err(CursorError::upstream(format!(
                        "{} at item {} does not close {} at item {}",
                        event,
                        index,
                        items[start].event(),
                        start
                    )));
                }
                partner[start] = index;
            }
        }
        if let Some(start) = open.pop() {
            return Err(CursorError::upstream(format!(
                "{} at item {} is never closed",
                items[start].event(),
                start
            )));
        }
        Ok(Self {
            items,
            partner,
            position: None,
            next_index: 0,
            state: CursorState::new(context),
        })
    }

    /// Number of items in the sequence.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn item(&self) -> Option<&Item> {
        self.position.map(|index| &self.items[index])
    }
}

impl EventCursor for SequenceCursor {
    fn next(&mut self) -> CursorResult<Event> {
        if let Proceed::Return(event) = self.state.begin_next()? {
            return Ok(event);
        }
        if self.next_index >= self.items.len() {
            self.position = None;
            return self.state.advance(Event::EndOfInput);
        }
        let index = self.next_index;
        self.position = Some(index);
        self.next_index += 1;
        self.state.advance(self.items[index].event())
    }

    fn current(&self) -> Event {
        self.state.current()
    }

    fn attributes(&self) -> CursorResult<&AttributeSet> {
        match self.item() {
            Some(Item::StartElement { attributes, .. }) => Ok(attributes),
            _ => self.state.reject(Operation::Attributes, AttributeSet::empty()),
        }
    }

    fn namespace_declarations(&self) -> CursorResult<&[NamespaceBinding]> {
        match self.item() {
            Some(Item::StartElement { namespaces, .. }) => Ok(namespaces),
            _ => self.state.reject(Operation::NamespaceDeclarations, NO_NAMESPACES),
        }
    }

    fn skip_to_matching_end(&mut self) -> CursorResult<Event> {
        if let Proceed::Return(event) = self.state.begin_skip()? {
            return Ok(event);
        }
        let Some(start) = self.position else {
            return self.state.reject(Operation::SkipToMatchingEnd, self.current());
        };
        let end = self.partner[start];
        self.position = Some(end);
        self.next_index = end + 1;
        self.state.advance(self.items[end].event())
    }

    fn node_name(&self) -> CursorResult<&NodeName> {
        match self.item() {
            Some(Item::StartElement { name, .. })
            | Some(Item::EndElement { name })
            | Some(Item::ProcessingInstruction { target: name, .. })
            | Some(Item::Namespace { name, .. }) => Ok(name),
            Some(Item::Attribute(attribute)) => Ok(attribute.name()),
            _ => self.state.reject(Operation::NodeName, NodeName::placeholder()),
        }
    }

    fn string_value(&mut self) -> CursorResult<String> {
        match self.item() {
            Some(Item::StartElement { .. }) => collect_string_value(self),
            Some(Item::Text(text)) | Some(Item::Comment(text)) => Ok(text.clone()),
            Some(Item::ProcessingInstruction { data, .. }) => Ok(data.clone()),
            Some(Item::Attribute(attribute)) => Ok(attribute.value().to_string()),
            Some(Item::Namespace { binding, .. }) => Ok(binding.uri().to_string()),
            Some(Item::Atomic(value)) => Ok(value.lexical().into_owned()),
            _ => self.state.reject(Operation::StringValue, String::new()),
        }
    }

    fn atomic_value(&self) -> CursorResult<&AtomicValue> {
        match self.item() {
            Some(Item::Atomic(value)) => Ok(value),
            _ => self.state.reject(Operation::AtomicValue, AtomicValue::placeholder()),
        }
    }

    fn schema_type(&self) -> CursorResult<SchemaType> {
        match self.item() {
            Some(Item::StartElement { schema_type, .. }) => Ok(schema_type.clone()),
            Some(Item::Attribute(attribute)) => Ok(attribute.schema_type().clone()),
            Some(Item::Atomic(value)) => Ok(value.type_annotation()),
            _ => self.state.reject(Operation::SchemaType, SchemaType::untyped()),
        }
    }

    fn close(&mut self) {
        if self.state.close() {
            self.position = None;
        }
    }

    fn pipeline_context(&self) -> &Arc<PipelineContext> {
        self.state.context()
    }

    fn set_pipeline_context(&mut self, context: Arc<PipelineContext>) -> CursorResult<()> {
        self.state.set_context(context)
    }
}
