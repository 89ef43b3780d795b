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

//! Mapping parser failures onto cursor errors.

use std::fmt::Display;
use std::sync::Arc;
use weft_core::{CursorError, CursorResult, Location, PipelineContext};

/// Build an upstream error for malformed input and send it to the
/// context's reporter.
pub(crate) fn malformed(
    context: &PipelineContext,
    cause: impl Display,
    location: Location,
) -> CursorError {
    let error = CursorError::upstream_at(format!("malformed XML: {}", cause), location);
    context.report(&error);
    error
}

/// Parse `text` into a tree, allowing a document type declaration.
///
/// # Errors
///
/// Returns [`CursorError::Upstream`] with the line and column of the first
/// syntax error.
pub fn parse_document(text: &str) -> CursorResult<roxmltree::Document<'_>> {
    parse_document_named(text, None)
}

/// Like [`parse_document`], tagging errors with `system_id`.
pub fn parse_document_named<'input>(
    text: &'input str,
    system_id: Option<&str>,
) -> CursorResult<roxmltree::Document<'input>> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    roxmltree::Document::parse_with_options(text, options).map_err(|e| {
        let pos = e.pos();
        CursorError::upstream_at(
            format!("malformed XML: {}", e),
            Location::at_line_column(pos.row, pos.col).with_system_id(system_id.map(Arc::from)),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_has_line_and_column() {
        let err = parse_document("<a>\n  <b></a>").unwrap_err();
        let location = err.location().unwrap();
        assert_eq!(location.line, Some(2));
        assert!(location.column.is_some());
        assert!(err.to_string().contains("malformed XML"));
    }

    #[test]
    fn test_doctype_is_allowed() {
        let doc = parse_document("<!DOCTYPE a><a/>").unwrap();
        assert_eq!(doc.root_element().tag_name().name(), "a");
    }

    #[test]
    fn test_named_error_carries_system_id() {
        let err = parse_document_named("<a>", Some("broken.xml")).unwrap_err();
        assert!(err.to_string().contains("broken.xml"));
    }
}
