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

//! Attribute snapshots exposed at `StartElement` events.

use crate::name::NodeName;
use crate::value::SchemaType;
use std::slice;

/// One attribute of an element, or a free-standing attribute node.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeInfo {
    name: NodeName,
    value: String,
    schema_type: SchemaType,
}

impl AttributeInfo {
    /// An untyped attribute (`xs:untypedAtomic`).
    pub fn new(name: impl Into<NodeName>, value: impl Into<String>) -> Self {
        Self::typed(name, value, SchemaType::untyped_atomic())
    }

    pub fn typed(name: impl Into<NodeName>, value: impl Into<String>, schema_type: SchemaType) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            schema_type,
        }
    }

    #[inline]
    pub fn name(&self) -> &NodeName {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[inline]
    pub fn schema_type(&self) -> &SchemaType {
        &self.schema_type
    }
}

/// The immutable attribute set of one element.
///
/// A cursor hands out `&AttributeSet`; the borrow ends at the next
/// state-changing call, which is exactly as long as the snapshot is
/// guaranteed to be stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeSet {
    items: Vec<AttributeInfo>,
}

static EMPTY: AttributeSet = AttributeSet::new();

impl AttributeSet {
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// A shared empty set, returned for elements without attributes and as the
    /// tolerated result of `attributes()` outside its window.
    pub fn empty() -> &'static AttributeSet {
        &EMPTY
    }

    /// Append an attribute. Only the producer of a set mutates it; consumers
    /// see it through a shared borrow.
    pub fn push(&mut self, attribute: AttributeInfo) {
        self.items.push(attribute);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, AttributeInfo> {
        self.items.iter()
    }

    /// Look up an attribute by expanded name.
    pub fn get(&self, uri: &str, local: &str) -> Option<&AttributeInfo> {
        self.items.iter().find(|a| a.name.matches(uri, local))
    }

    /// Value of the no-namespace attribute `local`.
    pub fn value(&self, local: &str) -> Option<&str> {
        self.get("", local).map(AttributeInfo::value)
    }

    /// Value of the attribute with the given expanded name.
    pub fn value_ns(&self, uri: &str, local: &str) -> Option<&str> {
        self.get(uri, local).map(AttributeInfo::value)
    }
}

impl FromIterator<AttributeInfo> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = AttributeInfo>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<AttributeInfo>> for AttributeSet {
    fn from(items: Vec<AttributeInfo>) -> Self {
        Self { items }
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = &'a AttributeInfo;
    type IntoIter = slice::Iter<'a, AttributeInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
