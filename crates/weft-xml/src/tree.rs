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

//! Event cursor over a parsed `roxmltree` document.
//!
//! The whole document is in memory, so the cursor can move anywhere in
//! constant time: `skip_to_matching_end` jumps straight from a start node to
//! its end without visiting descendants, and `string_value` reads an
//! element's text from the tree before jumping to the end.

use roxmltree::{Document, Node, NodeType};
use std::sync::Arc;
use tracing::debug;
use weft_core::{
    AttributeInfo, AttributeSet, AtomicValue, CursorResult, CursorState, Event, EventCursor,
    Location, NamespaceBinding, NodeName, Operation, PipelineContext, Proceed, SchemaType,
};

/// Configuration for [`TreeCursor`].
#[derive(Debug, Clone, Default)]
pub struct TreeCursorConfig {
    /// System identifier reported in source locations.
    pub system_id: Option<String>,
    /// Drop text nodes that contain only whitespace (default: false).
    pub skip_whitespace_text: bool,
}

const NO_NAMESPACES: &[NamespaceBinding] = &[];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Position<'a, 'input> {
    Before,
    Entering(Node<'a, 'input>),
    Leaving(Node<'a, 'input>),
    After,
}

/// Source cursor walking a `roxmltree` tree in document order.
///
/// The walk covers one node and its descendants: a whole document (framed
/// by `StartDocument`/`EndDocument`) or a single element subtree. The
/// outermost element reports every namespace in scope; nested elements
/// report only the bindings that differ from their parent.
#[derive(Debug)]
pub struct TreeCursor<'a, 'input> {
    start: Node<'a, 'input>,
    position: Position<'a, 'input>,
    name: NodeName,
    attributes: AttributeSet,
    namespaces: Vec<NamespaceBinding>,
    system_id: Option<Arc<str>>,
    skip_whitespace_text: bool,
    state: CursorState,
}

impl<'a, 'input> TreeCursor<'a, 'input> {
    /// Walk the whole document.
    pub fn new(document: &'a Document<'input>, config: TreeCursorConfig) -> Self {
        Self::subtree(document.root(), config)
    }

    /// Walk `node` and its descendants only.
    pub fn subtree(node: Node<'a, 'input>, config: TreeCursorConfig) -> Self {
        debug!(node = ?node.node_type(), "tree cursor created");
        Self {
            start: node,
            position: Position::Before,
            name: NodeName::placeholder().clone(),
            attributes: AttributeSet::new(),
            namespaces: Vec::new(),
            system_id: config.system_id.map(Arc::from),
            skip_whitespace_text: config.skip_whitespace_text,
            state: CursorState::new(PipelineContext::new().into_shared()),
        }
    }

    /// Use `context` instead of a fresh default context.
    ///
    /// # Errors
    ///
    /// Fails with a protocol violation once `next()` has been called.
    pub fn with_context(mut self, context: Arc<PipelineContext>) -> CursorResult<Self> {
        self.state.set_context(context)?;
        Ok(self)
    }

    fn is_skipped(&self, node: Node<'a, 'input>) -> bool {
        self.skip_whitespace_text
            && node.is_text()
            && node.text().map_or(true, |text| text.trim().is_empty())
    }

    /// The position after `position` in document order.
    fn step(&self, position: Position<'a, 'input>) -> Position<'a, 'input> {
        match position {
            Position::Before => Position::Entering(self.start),
            Position::Entering(node) if has_content(node) => match node.first_child() {
                Some(child) => Position::Entering(child),
                None => Position::Leaving(node),
            },
            Position::Entering(node) | Position::Leaving(node) => {
                if node == self.start {
                    return Position::After;
                }
                match (node.next_sibling(), node.parent()) {
                    (Some(sibling), _) => Position::Entering(sibling),
                    (None, Some(parent)) => Position::Leaving(parent),
                    (None, None) => Position::After,
                }
            }
            Position::After => Position::After,
        }
    }

    /// Move to `position`, loading the payload of the new event.
    fn enter(&mut self, position: Position<'a, 'input>) -> CursorResult<Event> {
        self.position = position;
        let event = match position {
            Position::Entering(node) => {
                match node.node_type() {
                    NodeType::Element => self.load_element(node),
                    NodeType::PI => {
                        let target = node.pi().map_or("", |pi| pi.target);
                        self.name = NodeName::local(target);
                    }
                    _ => {}
                }
                event_of(node, true)
            }
            Position::Leaving(node) => {
                if node.is_element() {
                    self.name = self.element_name(node);
                }
                event_of(node, false)
            }
            Position::Before | Position::After => Event::EndOfInput,
        };
        self.state.advance(event)
    }

    fn load_element(&mut self, node: Node<'a, 'input>) {
        self.name = self.element_name(node);
        let names = self.state.context().names();
        self.attributes = node
            .attributes()
            .map(|attr| {
                let uri = attr.namespace().unwrap_or("");
                let prefix = attr.namespace().and_then(|ns| node.lookup_prefix(ns)).unwrap_or("");
                AttributeInfo::new(names.intern(prefix, uri, attr.name()), attr.value())
            })
            .collect();
        self.namespaces = self.declarations(node);
    }

    fn element_name(&self, node: Node<'a, 'input>) -> NodeName {
        let tag = node.tag_name();
        let uri = tag.namespace().unwrap_or("");
        let prefix = tag.namespace().and_then(|ns| node.lookup_prefix(ns)).unwrap_or("");
        self.state.context().names().intern(prefix, uri, tag.name())
    }

    /// Bindings introduced by `node` relative to its parent element.
    fn declarations(&self, node: Node<'a, 'input>) -> Vec<NamespaceBinding> {
        let own = in_scope(node);
        let parent = if node == self.start { None } else { node.parent_element() };
        let Some(parent) = parent else {
            return own
                .into_iter()
                .filter(|(_, uri)| !uri.is_empty())
                .map(|(prefix, uri)| NamespaceBinding::new(prefix, uri))
                .collect();
        };
        let inherited = in_scope(parent);
        let mut declared: Vec<NamespaceBinding> = own
            .iter()
            .filter(|binding| !inherited.contains(*binding))
            .map(|(prefix, uri)| NamespaceBinding::new(prefix, uri))
            .collect();
        let has_default = |bindings: &[(&str, &str)]| bindings.iter().any(|(prefix, _)| prefix.is_empty());
        if has_default(inherited.as_slice()) && !has_default(own.as_slice()) {
            declared.push(NamespaceBinding::default_namespace(""));
        }
        declared
    }

    fn current_node(&self) -> Option<Node<'a, 'input>> {
        match self.position {
            Position::Entering(node) => Some(node),
            _ => None,
        }
    }
}

fn has_content(node: Node<'_, '_>) -> bool {
    matches!(node.node_type(), NodeType::Root | NodeType::Element)
}

fn event_of(node: Node<'_, '_>, entering: bool) -> Event {
    match (node.node_type(), entering) {
        (NodeType::Root, true) => Event::StartDocument,
        (NodeType::Root, false) => Event::EndDocument,
        (NodeType::Element, true) => Event::StartElement,
        (NodeType::Element, false) => Event::EndElement,
        (NodeType::Text, _) => Event::Text,
        (NodeType::Comment, _) => Event::Comment,
        (NodeType::PI, _) => Event::ProcessingInstruction,
    }
}

/// `(prefix, uri)` of every namespace in scope at `node`, minus `xml`.
fn in_scope<'a>(node: Node<'a, '_>) -> Vec<(&'a str, &'a str)> {
    node.namespaces()
        .filter(|ns| ns.name() != Some("xml"))
        .map(|ns| (ns.name().unwrap_or(""), ns.uri()))
        .collect()
}

impl<'a, 'input> EventCursor for TreeCursor<'a, 'input> {
    fn next(&mut self) -> CursorResult<Event> {
        if let Proceed::Return(event) = self.state.begin_next()? {
            return Ok(event);
        }
        let mut position = self.step(self.position);
        while let Position::Entering(node) = position {
            if !self.is_skipped(node) {
                break;
            }
            position = self.step(position);
        }
        self.enter(position)
    }

    fn current(&self) -> Event {
        self.state.current()
    }

    fn attributes(&self) -> CursorResult<&AttributeSet> {
        match self.state.current() {
            Event::StartElement => Ok(&self.attributes),
            _ => self.state.reject(Operation::Attributes, AttributeSet::empty()),
        }
    }

    fn namespace_declarations(&self) -> CursorResult<&[NamespaceBinding]> {
        match self.state.current() {
            Event::StartElement => Ok(&self.namespaces),
            _ => self.state.reject(Operation::NamespaceDeclarations, NO_NAMESPACES),
        }
    }

    fn skip_to_matching_end(&mut self) -> CursorResult<Event> {
        if let Proceed::Return(event) = self.state.begin_skip()? {
            return Ok(event);
        }
        match self.current_node() {
            Some(node) => self.enter(Position::Leaving(node)),
            None => self.state.reject(Operation::SkipToMatchingEnd, self.state.current()),
        }
    }

    fn node_name(&self) -> CursorResult<&NodeName> {
        match self.state.current() {
            Event::StartElement | Event::EndElement | Event::ProcessingInstruction => Ok(&self.name),
            _ => self.state.reject(Operation::NodeName, NodeName::placeholder()),
        }
    }

    fn string_value(&mut self) -> CursorResult<String> {
        let Some(node) = self.current_node() else {
            return self.state.reject(Operation::StringValue, String::new());
        };
        match node.node_type() {
            NodeType::Element => {
                let value: String = node
                    .descendants()
                    .filter(|d| d.is_text() && !self.is_skipped(*d))
                    .filter_map(|d| d.text())
                    .collect();
                self.enter(Position::Leaving(node))?;
                Ok(value)
            }
            NodeType::Text | NodeType::Comment => Ok(node.text().unwrap_or_default().to_string()),
            NodeType::PI => Ok(node.pi().and_then(|pi| pi.value).unwrap_or_default().to_string()),
            NodeType::Root => self.state.reject(Operation::StringValue, String::new()),
        }
    }

    fn atomic_value(&self) -> CursorResult<&AtomicValue> {
        self.state.reject(Operation::AtomicValue, AtomicValue::placeholder())
    }

    fn schema_type(&self) -> CursorResult<SchemaType> {
        match self.state.current() {
            Event::StartElement => Ok(SchemaType::untyped()),
            _ => self.state.reject(Operation::SchemaType, SchemaType::untyped()),
        }
    }

    fn source_location(&self) -> Option<Location> {
        let offset = match self.position {
            Position::Entering(node) => node.range().start,
            Position::Leaving(node) => node.range().end,
            Position::Before | Position::After => return None,
        };
        let pos = self.start.document().text_pos_at(offset);
        Some(Location {
            system_id: self.system_id.clone(),
            line: Some(pos.row),
            column: Some(pos.col),
            byte_offset: Some(offset as u64),
        })
    }

    fn close(&mut self) {
        if self.state.close() {
            self.position = Position::After;
        }
    }

    fn pipeline_context(&self) -> &Arc<PipelineContext> {
        self.state.context()
    }

    fn set_pipeline_context(&mut self, context: Arc<PipelineContext>) -> CursorResult<()> {
        self.state.set_context(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_document;

    fn events(cursor: &mut TreeCursor<'_, '_>) -> Vec<Event> {
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
    fn test_document_events() {
        let doc = parse_document(r#"<a id="1">hi<b/></a>"#).unwrap();
        let mut cursor = TreeCursor::new(&doc, TreeCursorConfig::default());
        assert_eq!(
            events(&mut cursor),
            vec![
                Event::StartDocument,
                Event::StartElement,
                Event::Text,
                Event::StartElement,
                Event::EndElement,
                Event::EndElement,
                Event::EndDocument,
                Event::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_subtree_has_no_document_frame() {
        let doc = parse_document("<r><a><b/></a><c/></r>").unwrap();
        let a = doc.root_element().first_child().unwrap();
        let mut cursor = TreeCursor::subtree(a, TreeCursorConfig::default());
        assert_eq!(
            events(&mut cursor),
            vec![Event::StartElement, Event::StartElement, Event::EndElement, Event::EndElement, Event::EndOfInput]
        );
    }

    #[test]
    fn test_skip_jumps_to_end() {
        let doc = parse_document("<a><b><c>x</c></b><d/></a>").unwrap();
        let mut cursor = TreeCursor::new(&doc, TreeCursorConfig::default());
        cursor.next().unwrap();
        cursor.next().unwrap();
        cursor.next().unwrap();
        assert_eq!(cursor.node_name().unwrap().local_name(), "b");
        assert_eq!(cursor.skip_to_matching_end().unwrap(), Event::EndElement);
        assert_eq!(cursor.node_name().unwrap().local_name(), "b");
        assert_eq!(cursor.next().unwrap(), Event::StartElement);
        assert_eq!(cursor.node_name().unwrap().local_name(), "d");
    }

    #[test]
    fn test_skip_document() {
        let doc = parse_document("<a><b/></a>").unwrap();
        let mut cursor = TreeCursor::new(&doc, TreeCursorConfig::default());
        cursor.next().unwrap();
        assert_eq!(cursor.skip_to_matching_end().unwrap(), Event::EndDocument);
        assert_eq!(cursor.next().unwrap(), Event::EndOfInput);
    }

    #[test]
    fn test_string_value_reads_descendant_text() {
        let doc = parse_document("<a>one <b>two</b><!--c--> three</a>").unwrap();
        let mut cursor = TreeCursor::new(&doc, TreeCursorConfig::default());
        cursor.next().unwrap();
        cursor.next().unwrap();
        assert_eq!(cursor.string_value().unwrap(), "one two three");
        assert_eq!(cursor.current(), Event::EndElement);
        assert_eq!(cursor.node_name().unwrap().local_name(), "a");
        assert_eq!(cursor.next().unwrap(), Event::EndDocument);
    }

    #[test]
    fn test_comment_and_pi_values() {
        let doc = parse_document("<a><!-- note --><?render fast?></a>").unwrap();
        let mut cursor = TreeCursor::new(&doc, TreeCursorConfig::default());
        cursor.next().unwrap();
        cursor.next().unwrap();
        assert_eq!(cursor.next().unwrap(), Event::Comment);
        assert_eq!(cursor.string_value().unwrap(), " note ");
        assert_eq!(cursor.next().unwrap(), Event::ProcessingInstruction);
        assert_eq!(cursor.node_name().unwrap().local_name(), "render");
        assert_eq!(cursor.string_value().unwrap(), "fast");
    }

    #[test]
    fn test_namespace_delta() {
        let doc = parse_document(
            r#"<p:r xmlns:p="urn:p" xmlns="urn:d"><c xmlns:q="urn:q"/><u xmlns=""/></p:r>"#,
        )
        .unwrap();
        let mut cursor = TreeCursor::new(&doc, TreeCursorConfig::default());
        cursor.next().unwrap();
        cursor.next().unwrap();
        assert_eq!(cursor.node_name().unwrap().clark_name(), "{urn:p}r");
        assert_eq!(cursor.node_name().unwrap().prefix(), "p");
        assert_eq!(cursor.namespace_declarations().unwrap().len(), 2);

        cursor.next().unwrap();
        assert_eq!(cursor.node_name().unwrap().clark_name(), "{urn:d}c");
        let declared = cursor.namespace_declarations().unwrap();
        assert_eq!(declared, &[NamespaceBinding::new("q", "urn:q")]);

        cursor.next().unwrap();
        cursor.next().unwrap();
        assert_eq!(cursor.node_name().unwrap().clark_name(), "u");
        let declared = cursor.namespace_declarations().unwrap();
        assert_eq!(declared.len(), 1);
        assert!(declared[0].is_undeclaration());
    }

    #[test]
    fn test_prefixed_attribute() {
        let doc = parse_document(r#"<a xmlns:x="urn:x" x:k="v" plain="w"/>"#).unwrap();
        let mut cursor = TreeCursor::new(&doc, TreeCursorConfig::default());
        cursor.next().unwrap();
        cursor.next().unwrap();
        let attributes = cursor.attributes().unwrap();
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes.value_ns("urn:x", "k"), Some("v"));
        assert_eq!(attributes.value("plain"), Some("w"));
    }

    #[test]
    fn test_skip_whitespace_text() {
        let doc = parse_document("<a>\n  <b/>\n</a>").unwrap();
        let config = TreeCursorConfig {
            skip_whitespace_text: true,
            ..TreeCursorConfig::default()
        };
        let mut cursor = TreeCursor::new(&doc, config);
        assert!(!events(&mut cursor).contains(&Event::Text));

        let mut keeping = TreeCursor::new(&doc, TreeCursorConfig::default());
        assert_eq!(events(&mut keeping).iter().filter(|e| **e == Event::Text).count(), 2);
    }

    #[test]
    fn test_locations() {
        let doc = parse_document("<a>\n<b/></a>").unwrap();
        let config = TreeCursorConfig {
            system_id: Some("doc.xml".to_string()),
            ..TreeCursorConfig::default()
        };
        let mut cursor = TreeCursor::new(&doc, config);
        assert!(cursor.source_location().is_none());
        cursor.next().unwrap();
        cursor.next().unwrap();
        cursor.next().unwrap();
        cursor.next().unwrap();
        let location = cursor.source_location().unwrap();
        assert_eq!(location.line, Some(2));
        assert_eq!(location.column, Some(1));
        assert_eq!(location.to_string(), "doc.xml:2:1");
    }

    #[test]
    fn test_accessors_outside_window() {
        let doc = parse_document("<a>t</a>").unwrap();
        let mut cursor = TreeCursor::new(&doc, TreeCursorConfig::default());
        cursor.next().unwrap();
        assert!(cursor.attributes().is_err());
        assert!(cursor.string_value().is_err());
        cursor.next().unwrap();
        cursor.next().unwrap();
        assert!(cursor.skip_to_matching_end().is_err());
        assert!(cursor.atomic_value().is_err());
        assert!(cursor.unparsed_entities().is_none());
    }

    #[test]
    fn test_with_context_before_traversal() {
        let doc = parse_document("<a/>").unwrap();
        let context = PipelineContext::new().into_shared();
        let cursor = TreeCursor::new(&doc, TreeCursorConfig::default())
            .with_context(Arc::clone(&context))
            .unwrap();
        assert!(Arc::ptr_eq(cursor.pipeline_context(), &context));
    }

    #[test]
    fn test_with_context_after_next_is_rejected() {
        let doc = parse_document("<a><b/></a>").unwrap();
        let mut cursor = TreeCursor::new(&doc, TreeCursorConfig::default());
        cursor.next().unwrap();
        cursor.next().unwrap();
        let err = cursor
            .with_context(PipelineContext::new().into_shared())
            .unwrap_err();
        assert!(err.is_protocol_violation());
    }

    #[test]
    fn test_internal_entities_are_expanded() {
        let doc = parse_document(r#"<!DOCTYPE a [<!ENTITY e "x">]><a>&e;</a>"#).unwrap();
        let mut cursor = TreeCursor::new(&doc, TreeCursorConfig::default());
        cursor.next().unwrap();
        cursor.next().unwrap();
        assert_eq!(cursor.string_value().unwrap(), "x");
    }
}
