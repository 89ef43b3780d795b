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

//! Qualified names, namespace bindings and the name pool.
//!
//! Names are built from interned [`Atom`]s, so equal strings share storage and
//! compare by pointer. The [`NamePool`] additionally hands out stable integer
//! fingerprints for expanded names; it is the name-interning registry shared
//! through a [`PipelineContext`](crate::PipelineContext).

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

pub use string_cache::DefaultAtom as Atom;

/// The namespace bound to the `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// The XML Schema namespace.
pub const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// A qualified name: prefix, namespace URI and local part.
///
/// Two names are equal when their namespace URI and local part are equal;
/// the prefix is presentation only.
#[derive(Debug, Clone)]
pub struct NodeName {
    prefix: Atom,
    uri: Atom,
    local: Atom,
}

impl NodeName {
    /// Create a name from its three parts. Empty strings mean "no prefix" /
    /// "no namespace".
    pub fn new(prefix: &str, uri: &str, local: &str) -> Self {
        Self {
            prefix: Atom::from(prefix),
            uri: Atom::from(uri),
            local: Atom::from(local),
        }
    }

    /// A name in no namespace.
    pub fn local(local: &str) -> Self {
        Self::new("", "", local)
    }

    /// Used as the tolerated result of `node_name()` outside its window.
    pub fn placeholder() -> &'static NodeName {
        static PLACEHOLDER: OnceLock<NodeName> = OnceLock::new();
        PLACEHOLDER.get_or_init(|| NodeName::local(""))
    }

    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[inline]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    #[inline]
    pub fn local_name(&self) -> &str {
        &self.local
    }

    /// Returns true if the name is in no namespace.
    #[inline]
    pub fn is_unqualified(&self) -> bool {
        self.uri.is_empty()
    }

    /// Returns true if the name has the given namespace URI and local part.
    #[inline]
    pub fn matches(&self, uri: &str, local: &str) -> bool {
        &*self.uri == uri && &*self.local == local
    }

    /// The lexical form `prefix:local`, or `local` when unprefixed.
    pub fn display_name(&self) -> String {
        if self.prefix.is_empty() {
            self.local.to_string()
        } else {
            format!("{}:{}", self.prefix, self.local)
        }
    }

    /// The Clark form `{uri}local`, or `local` when in no namespace.
    pub fn clark_name(&self) -> String {
        if self.uri.is_empty() {
            self.local.to_string()
        } else {
            format!("{{{}}}{}", self.uri, self.local)
        }
    }
}

impl PartialEq for NodeName {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri && self.local == other.local
    }
}

impl Eq for NodeName {}

impl Hash for NodeName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri.hash(state);
        self.local.hash(state);
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prefix.is_empty() {
            f.write_str(&self.local)
        } else {
            write!(f, "{}:{}", self.prefix, self.local)
        }
    }
}

impl From<&str> for NodeName {
    fn from(local: &str) -> Self {
        NodeName::local(local)
    }
}

/// A namespace declaration (or undeclaration) on an element.
///
/// An empty `uri` undeclares the prefix; an empty `prefix` refers to the
/// default namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceBinding {
    prefix: Atom,
    uri: Atom,
}

impl NamespaceBinding {
    pub fn new(prefix: &str, uri: &str) -> Self {
        Self {
            prefix: Atom::from(prefix),
            uri: Atom::from(uri),
        }
    }

    /// Binding of the default namespace.
    pub fn default_namespace(uri: &str) -> Self {
        Self::new("", uri)
    }

    /// The implicit binding of the `xml` prefix.
    pub fn xml() -> Self {
        Self::new("xml", XML_NAMESPACE)
    }

    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[inline]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns true if this binding removes the prefix from scope.
    #[inline]
    pub fn is_undeclaration(&self) -> bool {
        self.uri.is_empty()
    }
}

impl fmt::Display for NamespaceBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prefix.is_empty() {
            write!(f, "xmlns=\"{}\"", self.uri)
        } else {
            write!(f, "xmlns:{}=\"{}\"", self.prefix, self.uri)
        }
    }
}

/// Interning registry that assigns a fingerprint to each expanded name.
///
/// Fingerprints are dense, start at zero and never change for the lifetime
/// of the pool. The pool is safe to share between chains on different
/// threads; lookups take a read lock, new names a write lock.
#[derive(Debug, Default)]
pub struct NamePool {
    inner: RwLock<PoolInner>,
}

#[derive(Debug, Default)]
struct PoolInner {
    fingerprints: HashMap<(Atom, Atom), u32>,
    names: Vec<(Atom, Atom)>,
}

impl NamePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a name and register its fingerprint.
    pub fn intern(&self, prefix: &str, uri: &str, local: &str) -> NodeName {
        let name = NodeName::new(prefix, uri, local);
        self.allocate(&name);
        name
    }

    /// Return the fingerprint of `name`, allocating one if needed.
    pub fn allocate(&self, name: &NodeName) -> u32 {
        let key = (name.uri.clone(), name.local.clone());
        if let Some(fp) = self.inner.read().fingerprints.get(&key) {
            return *fp;
        }
        let mut inner = self.inner.write();
        // Another thread may have won the race between the two locks.
        if let Some(fp) = inner.fingerprints.get(&key) {
            return *fp;
        }
        let fp = inner.names.len() as u32;
        inner.names.push(key.clone());
        inner.fingerprints.insert(key, fp);
        fp
    }

    /// The fingerprint of `name`, if it has been interned.
    pub fn fingerprint(&self, name: &NodeName) -> Option<u32> {
        self.inner
            .read()
            .fingerprints
            .get(&(name.uri.clone(), name.local.clone()))
            .copied()
    }

    /// The unprefixed name registered under `fingerprint`.
    pub fn name_of(&self, fingerprint: u32) -> Option<NodeName> {
        self.inner
            .read()
            .names
            .get(fingerprint as usize)
            .map(|(uri, local)| NodeName {
                prefix: Atom::from(""),
                uri: uri.clone(),
                local: local.clone(),
            })
    }

    /// Number of distinct expanded names in the pool.
    pub fn len(&self) -> usize {
        self.inner.read().names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_name_equality_ignores_prefix() {
        let a = NodeName::new("x", "urn:a", "item");
        let b = NodeName::new("y", "urn:a", "item");
        let c = NodeName::new("x", "urn:b", "item");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.display_name(), "x:item");
        assert_eq!(b.to_string(), "y:item");
        assert_eq!(a.clark_name(), "{urn:a}item");
    }

    #[test]
    fn test_local_name() {
        let name = NodeName::from("para");
        assert!(name.is_unqualified());
        assert!(name.matches("", "para"));
        assert_eq!(name.display_name(), "para");
        assert_eq!(name.clark_name(), "para");
    }

    #[test]
    fn test_namespace_binding_display() {
        assert_eq!(NamespaceBinding::default_namespace("urn:d").to_string(), "xmlns=\"urn:d\"");
        assert_eq!(NamespaceBinding::new("p", "urn:p").to_string(), "xmlns:p=\"urn:p\"");
        assert!(NamespaceBinding::new("p", "").is_undeclaration());
        assert!(!NamespaceBinding::xml().is_undeclaration());
    }

    #[test]
    fn test_pool_fingerprints_are_stable() {
        let pool = NamePool::new();
        let a = pool.intern("", "urn:a", "x");
        let b = pool.intern("p", "urn:a", "x");
        let c = pool.intern("", "", "x");
        assert_eq!(pool.fingerprint(&a), pool.fingerprint(&b));
        assert_ne!(pool.fingerprint(&a), pool.fingerprint(&c));
        assert_eq!(pool.len(), 2);
        let fp = pool.fingerprint(&c).unwrap();
        assert_eq!(pool.name_of(fp), Some(NodeName::local("x")));
        assert!(pool.name_of(99).is_none());
    }

    #[test]
    fn test_pool_unknown_name() {
        let pool = NamePool::new();
        assert!(pool.is_empty());
        assert_eq!(pool.fingerprint(&NodeName::local("nope")), None);
    }

    #[test]
    fn test_pool_concurrent_interning() {
        let pool = Arc::new(NamePool::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || {
                    (0..50)
                        .map(|i| pool.allocate(&NodeName::local(&format!("n{}", i))))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(pool.len(), 50);
        for r in &results[1..] {
            assert_eq!(r, &results[0]);
        }
    }
}
