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

//! Proptest strategies for well-nested sequences.

use proptest::prelude::*;
use weft_core::{SequenceBuilder, SequenceCursor};

/// A generated node tree.
#[derive(Debug, Clone)]
pub enum Tree {
    Element {
        name: String,
        attributes: Vec<(String, String)>,
        children: Vec<Tree>,
    },
    Text(String),
    Comment(String),
    Pi(String, String),
}

impl Tree {
    fn append(&self, builder: SequenceBuilder) -> SequenceBuilder {
        match self {
            Tree::Element {
                name,
                attributes,
                children,
            } => {
                let mut builder = builder.start_element(name.as_str());
                for (attr, value) in attributes {
                    builder = builder.attribute(attr.as_str(), value.as_str());
                }
                let builder = children.iter().fold(builder, |b, child| child.append(b));
                builder.end_element()
            }
            Tree::Text(text) => builder.text(text.as_str()),
            Tree::Comment(text) => builder.comment(text.as_str()),
            Tree::Pi(target, data) => builder.processing_instruction(target, data.as_str()),
        }
    }

    /// Concatenated descendant text, in document order.
    pub fn text_content(&self) -> String {
        match self {
            Tree::Element { children, .. } => children.iter().map(Tree::text_content).collect(),
            Tree::Text(text) => text.clone(),
            Tree::Comment(_) | Tree::Pi(..) => String::new(),
        }
    }

    /// Serialise as XML. Generated content never needs escaping.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_xml(&mut out);
        out
    }

    fn write_xml(&self, out: &mut String) {
        match self {
            Tree::Element {
                name,
                attributes,
                children,
            } => {
                out.push('<');
                out.push_str(name);
                for (attr, value) in attributes {
                    out.push_str(&format!(" {}=\"{}\"", attr, value));
                }
                if children.is_empty() {
                    out.push_str("/>");
                    return;
                }
                out.push('>');
                for child in children {
                    child.write_xml(out);
                }
                out.push_str(&format!("</{}>", name));
            }
            Tree::Text(text) => out.push_str(text),
            Tree::Comment(text) => out.push_str(&format!("<!--{}-->", text)),
            Tree::Pi(target, data) if data.is_empty() => out.push_str(&format!("<?{}?>", target)),
            Tree::Pi(target, data) => out.push_str(&format!("<?{} {}?>", target, data)),
        }
    }

    /// Number of events this tree produces.
    pub fn event_count(&self) -> usize {
        match self {
            Tree::Element { children, .. } => 2 + children.iter().map(Tree::event_count).sum::<usize>(),
            _ => 1,
        }
    }
}

fn arb_name() -> impl Strategy<Value = String> {
    "[a-w][a-z0-9]{0,5}"
}

fn arb_leaf() -> impl Strategy<Value = Tree> {
    prop_oneof![
        4 => "[a-z ]{1,8}".prop_map(Tree::Text),
        1 => "[a-z ]{0,8}".prop_map(Tree::Comment),
        1 => ("p[a-z0-9]{0,5}", "[a-z]{0,6}").prop_map(|(t, d)| Tree::Pi(t, d)),
    ]
}

fn arb_tree() -> impl Strategy<Value = Tree> {
    arb_leaf().prop_recursive(4, 48, 5, |inner| {
        (
            arb_name(),
            prop::collection::btree_map("a[a-z0-9]{0,4}", "[a-z0-9]{0,4}", 0..3),
            prop::collection::vec(inner, 0..5),
        )
            .prop_map(|(name, attributes, children)| Tree::Element {
                name,
                attributes: attributes.into_iter().collect(),
                children,
            })
    })
}

/// A document element as a tree, with its root guaranteed to be an element.
pub fn arb_sequence() -> impl Strategy<Value = Tree> {
    (arb_name(), prop::collection::vec(arb_tree(), 0..6)).prop_map(|(name, children)| Tree::Element {
        name,
        attributes: Vec::new(),
        children,
    })
}

/// Build a document cursor for `tree`.
pub fn build_sequence(tree: &Tree) -> SequenceCursor {
    let builder = tree.append(SequenceBuilder::new().start_document()).end_document();
    match builder.build() {
        Ok(cursor) => cursor,
        Err(e) => panic!("generated tree is not well nested: {e}"),
    }
}
