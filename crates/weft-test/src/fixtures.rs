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

//! Canonical sequences and their XML equivalents.
//!
//! Each builder fixture has an XML twin producing the same event stream
//! when parsed without whitespace text, so source adapters can be checked
//! against the synthetic source.

use weft_core::{AttributeInfo, NamespaceBinding, NodeName, SequenceBuilder};

/// `<a id="1">hi<b/></a>` as a document.
pub fn scenario() -> SequenceBuilder {
    SequenceBuilder::new()
        .start_document()
        .start_element("a")
        .attribute("id", "1")
        .text("hi")
        .start_element("b")
        .end_element()
        .end_element()
        .end_document()
}

pub const SCENARIO_XML: &str = r#"<a id="1">hi<b/></a>"#;

/// Mixed content with nesting, comments and a processing instruction.
pub fn mixed_content() -> SequenceBuilder {
    SequenceBuilder::new()
        .start_document()
        .start_element("doc")
        .text("one ")
        .start_element("em")
        .text("two")
        .end_element()
        .comment(" c ")
        .text(" three")
        .processing_instruction("pi", "data")
        .start_element("empty")
        .end_element()
        .end_element()
        .end_document()
}

pub const MIXED_CONTENT_XML: &str =
    r#"<doc>one <em>two</em><!-- c --> three<?pi data?><empty/></doc>"#;

/// Elements in namespaces, with a declaration, a redeclaration and an
/// undeclaration of the default namespace.
pub fn namespaced() -> SequenceBuilder {
    SequenceBuilder::new()
        .start_document()
        .start_element(NodeName::new("p", "urn:p", "root"))
        .namespace(NamespaceBinding::new("p", "urn:p"))
        .namespace(NamespaceBinding::default_namespace("urn:d"))
        .attribute_info(AttributeInfo::new(NodeName::new("p", "urn:p", "flag"), "yes"))
        .start_element(NodeName::new("", "urn:d", "child"))
        .end_element()
        .start_element(NodeName::local("plain"))
        .namespace(NamespaceBinding::default_namespace(""))
        .end_element()
        .end_element()
        .end_document()
}

pub const NAMESPACED_XML: &str = r#"<p:root xmlns:p="urn:p" xmlns="urn:d" p:flag="yes"><child/><plain xmlns=""/></p:root>"#;

/// A sequence of free-standing items, not wrapped in a document.
pub fn free_items() -> SequenceBuilder {
    SequenceBuilder::new()
        .atomic(true)
        .atomic(7_i64)
        .atomic("seven")
        .top_level_attribute(AttributeInfo::new("lang", "en"))
        .top_level_namespace(NamespaceBinding::new("q", "urn:q"))
        .start_element("solo")
        .text("alone")
        .end_element()
}
