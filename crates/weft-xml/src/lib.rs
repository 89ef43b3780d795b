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

//! XML sources for Weft event pipelines.
//!
//! Two adapters turn XML text into an [`EventCursor`](weft_core::EventCursor):
//!
//! - [`TreeCursor`] walks a parsed [`roxmltree`] document. Positions carry
//!   line and column, and skipping a subtree is constant time.
//! - [`XmlReaderCursor`] pulls from a [`quick_xml`] reader over any
//!   `BufRead`, holding only the open-element stack in memory. Positions
//!   carry byte offsets, and DTD-declared unparsed entities are reported
//!   once the prolog has been read.
//!
//! # Example
//!
//! ```rust
//! use weft_core::{Event, EventCursor};
//! use weft_xml::{parse_document, TreeCursor, TreeCursorConfig, XmlReaderConfig, XmlReaderCursor};
//!
//! let text = r#"<a id="1">hi<b/></a>"#;
//!
//! let doc = parse_document(text)?;
//! let mut tree = TreeCursor::new(&doc, TreeCursorConfig::default());
//! let mut stream = XmlReaderCursor::from_text(text, XmlReaderConfig::default());
//!
//! for cursor in [&mut tree as &mut dyn EventCursor, &mut stream] {
//!     assert_eq!(cursor.next()?, Event::StartDocument);
//!     assert_eq!(cursor.next()?, Event::StartElement);
//!     assert_eq!(cursor.string_value()?, "hi");
//!     assert_eq!(cursor.next()?, Event::EndDocument);
//! }
//! # Ok::<(), weft_core::CursorError>(())
//! ```

mod dtd;
mod error;
pub mod reader;
pub mod tree;

pub use error::{parse_document, parse_document_named};
pub use reader::{XmlReaderConfig, XmlReaderCursor};
pub use tree::{TreeCursor, TreeCursorConfig};
