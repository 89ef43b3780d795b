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

//! Opaque payloads supplied by the type system.
//!
//! The cursor never interprets atomic values or type annotations. It only
//! needs atomic values to support equality and a stable lexical form, and
//! type annotations to be comparable by identity. Anything richer (casting,
//! ordering, arithmetic) belongs to the type subsystem that produces them.

use crate::name::{Atom, XS_NAMESPACE};
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// A schema type annotation, identified by its expanded name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaType {
    uri: Atom,
    local: Atom,
}

impl SchemaType {
    /// A type identified by namespace URI and local name.
    pub fn named(uri: &str, local: &str) -> Self {
        Self {
            uri: Atom::from(uri),
            local: Atom::from(local),
        }
    }

    fn xs(local: &str) -> Self {
        Self::named(XS_NAMESPACE, local)
    }

    /// `xs:untyped`, the annotation of elements in an unvalidated document.
    pub fn untyped() -> Self {
        Self::xs("untyped")
    }

    /// `xs:untypedAtomic`, the annotation of attributes in an unvalidated document.
    pub fn untyped_atomic() -> Self {
        Self::xs("untypedAtomic")
    }

    /// `xs:anyType`
    pub fn any_type() -> Self {
        Self::xs("anyType")
    }

    /// `xs:string`
    pub fn string() -> Self {
        Self::xs("string")
    }

    /// `xs:boolean`
    pub fn boolean() -> Self {
        Self::xs("boolean")
    }

    /// `xs:integer`
    pub fn integer() -> Self {
        Self::xs("integer")
    }

    #[inline]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    #[inline]
    pub fn local_name(&self) -> &str {
        &self.local
    }

    /// Returns true for the built-in XML Schema types.
    pub fn is_builtin(&self) -> bool {
        &*self.uri == XS_NAMESPACE
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_builtin() {
            write!(f, "xs:{}", self.local)
        } else if self.uri.is_empty() {
            f.write_str(&self.local)
        } else {
            write!(f, "Q{{{}}}{}", self.uri, self.local)
        }
    }
}

/// Contract a typed scalar must satisfy to travel through a cursor.
pub trait Atomic: fmt::Debug + Send + Sync + 'static {
    /// The canonical lexical form of the value.
    fn lexical(&self) -> Cow<'_, str>;

    /// The type annotation of the value.
    fn type_annotation(&self) -> SchemaType;

    fn as_any(&self) -> &dyn Any;

    /// Value equality. Values of different Rust types are never equal.
    fn equals(&self, other: &dyn Atomic) -> bool;
}

impl Atomic for String {
    fn lexical(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }

    fn type_annotation(&self) -> SchemaType {
        SchemaType::string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Atomic) -> bool {
        other.as_any().downcast_ref::<String>() == Some(self)
    }
}

impl Atomic for bool {
    fn lexical(&self) -> Cow<'_, str> {
        Cow::Borrowed(if *self { "true" } else { "false" })
    }

    fn type_annotation(&self) -> SchemaType {
        SchemaType::boolean()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Atomic) -> bool {
        other.as_any().downcast_ref::<bool>() == Some(self)
    }
}

impl Atomic for i64 {
    fn lexical(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn type_annotation(&self) -> SchemaType {
        SchemaType::integer()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Atomic) -> bool {
        other.as_any().downcast_ref::<i64>() == Some(self)
    }
}

/// Shared handle to an atomic value carried by an `AtomicValue` event.
#[derive(Debug, Clone)]
pub struct AtomicValue(Arc<dyn Atomic>);

impl AtomicValue {
    pub fn new<A: Atomic>(value: A) -> Self {
        Self(Arc::new(value))
    }

    /// Used as the tolerated result of `atomic_value()` outside its window.
    pub fn placeholder() -> &'static AtomicValue {
        static PLACEHOLDER: OnceLock<AtomicValue> = OnceLock::new();
        PLACEHOLDER.get_or_init(|| AtomicValue::new(String::new()))
    }

    /// The lexical form, used as the string value of the event.
    pub fn lexical(&self) -> Cow<'_, str> {
        self.0.lexical()
    }

    pub fn type_annotation(&self) -> SchemaType {
        self.0.type_annotation()
    }

    /// Access the concrete payload.
    pub fn downcast_ref<T: Atomic>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl PartialEq for AtomicValue {
    fn eq(&self, other: &Self) -> bool {
        self.0.equals(other.0.as_ref())
    }
}

impl fmt::Display for AtomicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lexical())
    }
}

impl From<String> for AtomicValue {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for AtomicValue {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl From<bool> for AtomicValue {
    fn from(value: bool) -> Self {
        Self::new(value)
    }
}

impl From<i64> for AtomicValue {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}
