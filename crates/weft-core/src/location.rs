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

//! Source positions and document-level metadata.

use std::fmt;
use std::sync::Arc;

/// Position of the current event in its source.
///
/// Parsers over real documents fill in whatever they can track: a tree
/// parser knows line and column, an incremental reader usually only the byte
/// offset. Synthetic sequences have no location at all and report `None`
/// from [`EventCursor::source_location`](crate::EventCursor::source_location).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// URI or path of the source document.
    pub system_id: Option<Arc<str>>,
    /// 1-based line number.
    pub line: Option<u32>,
    /// 1-based column number.
    pub column: Option<u32>,
    /// Byte offset from the start of the input.
    pub byte_offset: Option<u64>,
}

impl Location {
    /// A location identified by line and column.
    pub fn at_line_column(line: u32, column: u32) -> Self {
        Self {
            line: Some(line),
            column: Some(column),
            ..Self::default()
        }
    }

    /// A location identified by byte offset.
    pub fn at_offset(byte_offset: u64) -> Self {
        Self {
            byte_offset: Some(byte_offset),
            ..Self::default()
        }
    }

    /// Attach the system identifier of the document.
    pub fn with_system_id(mut self, system_id: Option<Arc<str>>) -> Self {
        self.system_id = system_id;
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(system_id) = &self.system_id {
            write!(f, "{}", system_id)?;
        } else {
            f.write_str("<input>")?;
        }
        match (self.line, self.column, self.byte_offset) {
            (Some(line), Some(column), _) => write!(f, ":{}:{}", line, column),
            (Some(line), None, _) => write!(f, ":{}", line),
            (None, _, Some(offset)) => write!(f, " @ byte {}", offset),
            _ => Ok(()),
        }
    }
}

/// An unparsed entity declared in the document type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnparsedEntity {
    /// Entity name.
    pub name: String,
    /// System identifier (URI of the entity).
    pub system_id: String,
    /// Public identifier, when declared.
    pub public_id: Option<String>,
    /// Name of the notation given in `NDATA`.
    pub notation: String,
}
