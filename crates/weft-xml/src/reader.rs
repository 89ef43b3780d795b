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

//! Event cursor over an incremental `quick_xml` reader.
//!
//! Memory use is bounded by the reader's buffer plus the stack of open
//! elements, so this source suits documents too large to hold as a tree.
//! `skip_to_matching_end` hands the subtree to the reader's raw
//! `read_to_end_into`, which scans bytes without decoding text or
//! attributes.

use crate::dtd;
use crate::error::malformed;
use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::name::{PrefixDeclaration, QName};
use quick_xml::Reader;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::io::{BufRead, BufReader, Read};
use std::sync::Arc;
use tracing::debug;
use weft_core::{
    collect_string_value, skip_by_next, AttributeInfo, AttributeSet, AtomicValue, CursorError,
    CursorResult, CursorState, Event, EventCursor, Location, NamespaceBinding, NodeName, Operation,
    PipelineContext, Proceed, SchemaType, UnparsedEntity, XML_NAMESPACE,
};

const NO_NAMESPACES: &[NamespaceBinding] = &[];

/// Configuration for [`XmlReaderCursor`].
#[derive(Debug, Clone)]
pub struct XmlReaderConfig {
    /// Capacity of the `BufReader` used by [`XmlReaderCursor::from_read`]
    /// (default: 64KB).
    pub buffer_size: usize,
    /// Trim whitespace around text and drop whitespace-only text
    /// (default: false).
    pub trim_text: bool,
    /// Let the reader split `<a/>` into separate start and end tags
    /// (default: false).
    pub expand_empty_elements: bool,
    /// System identifier reported in source locations.
    pub system_id: Option<String>,
}

impl Default for XmlReaderConfig {
    fn default() -> Self {
        Self {
            buffer_size: 65536,
            trim_text: false,
            expand_empty_elements: false,
            system_id: None,
        }
    }
}

/// A reader event with its payload copied out of the read buffer.
#[derive(Debug)]
enum Token {
    Start {
        raw: Vec<u8>,
        attributes: Vec<(Vec<u8>, String)>,
        empty: bool,
    },
    End,
    Text(String),
    Comment(String),
    Pi { target: String, data: String },
    DocType(String),
    Eof,
}

/// An open element: its raw tag name, resolved name and declarations.
struct Scope {
    raw: Vec<u8>,
    name: NodeName,
    bindings: Vec<NamespaceBinding>,
}

/// Source cursor pulling events from a `quick_xml::Reader`.
///
/// Always frames its output with `StartDocument`/`EndDocument`. Adjacent
/// text and CDATA sections are merged into one `Text` event, and
/// whitespace outside the document element is dropped.
pub struct XmlReaderCursor<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    lookahead: Option<(Token, u64)>,
    scopes: SmallVec<[Scope; 16]>,
    name: NodeName,
    attributes: AttributeSet,
    namespaces: Vec<NamespaceBinding>,
    text: String,
    pending_end: bool,
    declared: Vec<UnparsedEntity>,
    entities: Option<Vec<UnparsedEntity>>,
    general: HashMap<String, String>,
    offset: u64,
    system_id: Option<Arc<str>>,
    state: CursorState,
}

impl<R: BufRead> XmlReaderCursor<R> {
    pub fn new(input: R, config: XmlReaderConfig) -> Self {
        let mut reader = Reader::from_reader(input);
        reader
            .trim_text(config.trim_text)
            .expand_empty_elements(config.expand_empty_elements);
        debug!(
            trim_text = config.trim_text,
            expand_empty_elements = config.expand_empty_elements,
            "xml reader cursor created"
        );
        Self {
            reader,
            buf: Vec::with_capacity(8192),
            lookahead: None,
            scopes: SmallVec::new(),
            name: NodeName::placeholder().clone(),
            attributes: AttributeSet::new(),
            namespaces: Vec::new(),
            text: String::new(),
            pending_end: false,
            declared: Vec::new(),
            entities: None,
            general: HashMap::new(),
            offset: 0,
            system_id: config.system_id.map(Arc::from),
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

    fn location(&self, offset: u64) -> Location {
        Location::at_offset(offset).with_system_id(self.system_id.clone())
    }

    fn upstream(&self, message: String) -> CursorError {
        let error = CursorError::upstream_at(message, self.location(self.offset));
        self.state.context().report(&error);
        error
    }

    fn read_token(&mut self) -> CursorResult<(Token, u64)> {
        if let Some(token) = self.lookahead.take() {
            return Ok(token);
        }
        let decoder = self.reader.decoder();
        loop {
            let offset = self.reader.buffer_position() as u64;
            self.buf.clear();
            let token = match self.reader.read_event_into(&mut self.buf) {
                Ok(XmlEvent::Start(e)) => start_token(&e, false, &self.general),
                Ok(XmlEvent::Empty(e)) => start_token(&e, true, &self.general),
                Ok(XmlEvent::End(_)) => Ok(Token::End),
                Ok(XmlEvent::Text(e)) => e
                    .unescape_with(|name| resolve_entity(&self.general, name))
                    .map(|text| Token::Text(text.into_owned())),
                Ok(XmlEvent::CData(e)) => decoder.decode(&e).map(|text| Token::Text(text.into_owned())),
                Ok(XmlEvent::Comment(e)) => decoder.decode(&e).map(|text| Token::Comment(text.into_owned())),
                Ok(XmlEvent::PI(e)) => decoder.decode(&e).map(|content| {
                    let (target, data) = split_pi(&content);
                    Token::Pi {
                        target: target.to_string(),
                        data: data.to_string(),
                    }
                }),
                Ok(XmlEvent::DocType(e)) => decoder.decode(&e).map(|text| Token::DocType(text.into_owned())),
                Ok(XmlEvent::Decl(_)) => continue,
                Ok(XmlEvent::Eof) => Ok(Token::Eof),
                Err(e) => Err(e),
            };
            return token
                .map(|token| (token, offset))
                .map_err(|e| malformed(self.state.context(), e, self.location(offset)));
        }
    }

    /// Append any directly following text and CDATA to `text`.
    fn merge_text(&mut self, mut text: String) -> CursorResult<String> {
        loop {
            match self.read_token()? {
                (Token::Text(more), _) => text.push_str(&more),
                other => {
                    self.lookahead = Some(other);
                    return Ok(text);
                }
            }
        }
    }

    /// The document prolog ends at the first element or end of input.
    fn leave_prolog(&mut self) {
        if self.entities.is_none() {
            self.entities = Some(std::mem::take(&mut self.declared));
        }
    }

    fn lookup(&self, prefix: &str) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.bindings.iter().rev())
            .find(|binding| binding.prefix() == prefix)
            .map(NamespaceBinding::uri)
    }

    fn resolve(&self, raw: &[u8], is_element: bool) -> CursorResult<NodeName> {
        let qname = QName(raw);
        let local = self.utf8(qname.local_name().into_inner())?;
        let prefix = match qname.prefix() {
            Some(prefix) => self.utf8(prefix.into_inner())?,
            None => "",
        };
        let uri = match prefix {
            "" if is_element => self.lookup("").unwrap_or(""),
            "" => "",
            "xml" => XML_NAMESPACE,
            _ => match self.lookup(prefix) {
                Some(uri) if !uri.is_empty() => uri,
                _ => return Err(self.upstream(format!("prefix {} is not bound to a namespace", prefix))),
            },
        };
        Ok(self.state.context().names().intern(prefix, uri, local))
    }

    fn utf8<'b>(&self, bytes: &'b [u8]) -> CursorResult<&'b str> {
        std::str::from_utf8(bytes).map_err(|e| self.upstream(format!("name is not UTF-8: {}", e)))
    }

    fn open_element(&mut self, raw: Vec<u8>, attributes: Vec<(Vec<u8>, String)>) -> CursorResult<()> {
        let mut bindings = Vec::new();
        let mut plain = Vec::with_capacity(attributes.len());
        for (key, value) in attributes {
            let binding = match QName(&key).as_namespace_binding() {
                Some(PrefixDeclaration::Default) => Some(NamespaceBinding::default_namespace(&value)),
                Some(PrefixDeclaration::Named(prefix)) => Some(NamespaceBinding::new(self.utf8(prefix)?, &value)),
                None => None,
            };
            match binding {
                Some(binding) => bindings.push(binding),
                None => plain.push((key, value)),
            }
        }
        self.namespaces = bindings.clone();
        self.scopes.push(Scope {
            raw,
            name: NodeName::placeholder().clone(),
            bindings,
        });

        let (name, attributes) = self.resolve_start(&plain)?;
        if let Some(scope) = self.scopes.last_mut() {
            scope.name = name.clone();
        }
        self.name = name;
        self.attributes = attributes;
        Ok(())
    }

    fn resolve_start(&self, plain: &[(Vec<u8>, String)]) -> CursorResult<(NodeName, AttributeSet)> {
        let raw = self.scopes.last().map(|scope| scope.raw.as_slice()).unwrap_or_default();
        let name = self.resolve(raw, true)?;
        let attributes = plain
            .iter()
            .map(|(key, value)| {
                self.resolve(key, false)
                    .map(|name| AttributeInfo::new(name, value.as_str()))
            })
            .collect::<CursorResult<AttributeSet>>()?;
        Ok((name, attributes))
    }

    fn close_element(&mut self) -> CursorResult<Event> {
        match self.scopes.pop() {
            Some(scope) => {
                self.name = scope.name;
                self.state.advance(Event::EndElement)
            }
            None => Err(self.upstream("end tag without a matching start tag".to_string())),
        }
    }
}

impl<T: Read> XmlReaderCursor<BufReader<T>> {
    /// Read from an unbuffered source, buffering with
    /// [`XmlReaderConfig::buffer_size`].
    pub fn from_read(input: T, config: XmlReaderConfig) -> Self {
        let buffered = BufReader::with_capacity(config.buffer_size, input);
        Self::new(buffered, config)
    }
}

impl<'t> XmlReaderCursor<&'t [u8]> {
    /// Read from an in-memory document.
    pub fn from_text(text: &'t str, config: XmlReaderConfig) -> Self {
        Self::new(text.as_bytes(), config)
    }
}

/// Internal entities declared in the DOCTYPE. The predefined entities and
/// character references are expanded by the reader itself.
fn resolve_entity<'e>(general: &'e HashMap<String, String>, name: &str) -> Option<&'e str> {
    general.get(name).map(String::as_str)
}

fn start_token(
    start: &BytesStart<'_>,
    empty: bool,
    general: &HashMap<String, String>,
) -> quick_xml::Result<Token> {
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let value = attribute
            .unescape_value_with(|name| resolve_entity(general, name))?
            .into_owned();
        attributes.push((attribute.key.as_ref().to_vec(), value));
    }
    Ok(Token::Start {
        raw: start.name().as_ref().to_vec(),
        attributes,
        empty,
    })
}

/// Split processing instruction content into target and data.
fn split_pi(content: &str) -> (&str, &str) {
    match content.find(char::is_whitespace) {
        Some(index) => (&content[..index], content[index..].trim_start()),
        None => (content, ""),
    }
}

impl<R: BufRead> EventCursor for XmlReaderCursor<R> {
    fn next(&mut self) -> CursorResult<Event> {
        if let Proceed::Return(event) = self.state.begin_next()? {
            return Ok(event);
        }
        match self.state.current() {
            Event::StartOfInput => return self.state.advance(Event::StartDocument),
            Event::EndDocument => return self.state.advance(Event::EndOfInput),
            _ => {}
        }
        if self.pending_end {
            self.pending_end = false;
            return self.close_element();
        }
        loop {
            let (token, offset) = self.read_token()?;
            self.offset = offset;
            match token {
                Token::Start { raw, attributes, empty } => {
                    self.leave_prolog();
                    self.open_element(raw, attributes)?;
                    self.pending_end = empty;
                    return self.state.advance(Event::StartElement);
                }
                Token::End => return self.close_element(),
                Token::Text(text) => {
                    let text = self.merge_text(text)?;
                    if self.scopes.is_empty() {
                        if text.trim().is_empty() {
                            continue;
                        }
                        return Err(self.upstream("text outside the document element".to_string()));
                    }
                    if text.is_empty() {
                        continue;
                    }
                    self.text = text;
                    return self.state.advance(Event::Text);
                }
                Token::Comment(text) => {
                    self.text = text;
                    return self.state.advance(Event::Comment);
                }
                Token::Pi { target, data } => {
                    self.name = NodeName::local(&target);
                    self.text = data;
                    return self.state.advance(Event::ProcessingInstruction);
                }
                Token::DocType(content) => {
                    let declarations = dtd::scan(&content);
                    debug!(
                        unparsed = declarations.unparsed.len(),
                        general = declarations.general.len(),
                        "read document type declaration"
                    );
                    self.declared = declarations.unparsed;
                    self.general = declarations.general;
                }
                Token::Eof => {
                    if let Some(scope) = self.scopes.last() {
                        let message = format!("input ended inside element {}", scope.name.display_name());
                        return Err(self.upstream(message));
                    }
                    self.leave_prolog();
                    return self.state.advance(Event::EndDocument);
                }
            }
        }
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
        if self.state.current() == Event::StartDocument || self.lookahead.is_some() {
            return skip_by_next(self);
        }
        if self.pending_end {
            self.pending_end = false;
            return self.close_element();
        }
        let Some(raw) = self.scopes.last().map(|scope| scope.raw.clone()) else {
            return skip_by_next(self);
        };
        self.buf.clear();
        let offset = self.reader.buffer_position() as u64;
        if let Err(e) = self.reader.read_to_end_into(QName(&raw), &mut self.buf) {
            return Err(malformed(self.state.context(), e, self.location(offset)));
        }
        self.offset = offset;
        self.close_element()
    }

    fn node_name(&self) -> CursorResult<&NodeName> {
        match self.state.current() {
            Event::StartElement | Event::EndElement | Event::ProcessingInstruction => Ok(&self.name),
            _ => self.state.reject(Operation::NodeName, NodeName::placeholder()),
        }
    }

    fn string_value(&mut self) -> CursorResult<String> {
        match self.state.current() {
            Event::StartElement => collect_string_value(self),
            Event::Text | Event::Comment | Event::ProcessingInstruction => Ok(self.text.clone()),
            _ => self.state.reject(Operation::StringValue, String::new()),
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
        match self.state.current() {
            Event::StartOfInput | Event::EndOfInput => None,
            _ => Some(self.location(self.offset)),
        }
    }

    fn unparsed_entities(&self) -> Option<&[UnparsedEntity]> {
        self.entities.as_deref()
    }

    fn close(&mut self) {
        if self.state.close() {
            self.buf = Vec::new();
            self.lookahead = None;
            self.scopes.clear();
            self.pending_end = false;
        }
    }

    fn pipeline_context(&self) -> &Arc<PipelineContext> {
        self.state.context()
    }

    fn set_pipeline_context(&mut self, context: Arc<PipelineContext>) -> CursorResult<()> {
        self.state.set_context(context)
    }
}

impl<R> fmt::Debug for XmlReaderCursor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlReaderCursor")
            .field("current", &self.state.current())
            .field("depth", &self.scopes.len())
            .field("offset", &self.offset)
            .field("system_id", &self.system_id)
            .finish_non_exhaustive()
    }
}
