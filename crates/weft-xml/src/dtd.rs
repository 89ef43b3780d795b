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

//! Entity declarations from a DOCTYPE internal subset.
//!
//! Two kinds of general entity are collected: external entities with an
//! `NDATA` notation (unparsed entities), and internal entities whose
//! replacement text is a literal. Parameter entities and parsed external
//! entities are ignored. The scan is lexical, skips comments, and does not
//! validate the subset.

use quick_xml::escape::unescape;
use std::collections::HashMap;
use weft_core::UnparsedEntity;

const ENTITY_OPEN: &str = "<!ENTITY";
const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Entity declarations of one document type declaration.
#[derive(Debug, Default)]
pub(crate) struct Declarations {
    /// `<!ENTITY name SYSTEM|PUBLIC ... NDATA notation>`, in declaration order.
    pub unparsed: Vec<UnparsedEntity>,
    /// Replacement text of `<!ENTITY name "literal">`. The first
    /// declaration of a name wins.
    pub general: HashMap<String, String>,
}

enum Declaration {
    Unparsed(UnparsedEntity),
    Internal(String, String),
}

/// Scan the content of a DOCTYPE for entity declarations.
pub(crate) fn scan(doctype: &str) -> Declarations {
    let mut declarations = Declarations::default();
    let mut rest = doctype;
    loop {
        let entity = rest.find(ENTITY_OPEN);
        let comment = rest.find(COMMENT_OPEN);
        let start = match (entity, comment) {
            (Some(entity), Some(comment)) if comment < entity => {
                rest = skip_comment(&rest[comment + COMMENT_OPEN.len()..]);
                continue;
            }
            (Some(entity), _) => entity,
            (None, _) => break,
        };
        rest = &rest[start + ENTITY_OPEN.len()..];
        let end = declaration_end(rest);
        match parse_declaration(&rest[..end]) {
            Some(Declaration::Unparsed(entity)) => declarations.unparsed.push(entity),
            Some(Declaration::Internal(name, value)) => {
                declarations.general.entry(name).or_insert(value);
            }
            None => {}
        }
        rest = &rest[end..];
    }
    declarations
}

fn skip_comment(body: &str) -> &str {
    match body.find(COMMENT_CLOSE) {
        Some(end) => &body[end + COMMENT_CLOSE.len()..],
        None => "",
    }
}

/// Index of the `>` closing a declaration, ignoring quoted literals.
fn declaration_end(decl: &str) -> usize {
    let mut quote = None;
    for (index, c) in decl.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if q == c => quote = None,
            (None, '>') => return index,
            _ => {}
        }
    }
    decl.len()
}

/// Split on whitespace, keeping quoted literals whole and unquoted.
fn tokens(decl: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut rest = decl.trim_start();
    while let Some(first) = rest.chars().next() {
        if first == '"' || first == '\'' {
            let body = &rest[1..];
            let len = body.find(first).unwrap_or(body.len());
            out.push(&body[..len]);
            rest = body.get(len + 1..).unwrap_or("");
        } else {
            let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
            out.push(&rest[..len]);
            rest = &rest[len..];
        }
        rest = rest.trim_start();
    }
    out
}

fn parse_declaration(decl: &str) -> Option<Declaration> {
    let decl = decl.trim_start();
    if decl.starts_with('%') {
        return None;
    }
    let name_len = decl.find(char::is_whitespace)?;
    let name = &decl[..name_len];
    let body = decl[name_len..].trim_start();
    let tokens = tokens(body);
    let mut tokens = tokens.into_iter();

    if body.starts_with('"') || body.starts_with('\'') {
        let literal = tokens.next()?;
        // Character references in the literal are expanded at declaration.
        let value = unescape(literal).map_or_else(|_| literal.to_string(), |value| value.into_owned());
        return Some(Declaration::Internal(name.to_string(), value));
    }

    let (public_id, system_id) = match tokens.next()? {
        "SYSTEM" => (None, tokens.next()?),
        "PUBLIC" => {
            let public_id = tokens.next()?;
            (Some(public_id.to_string()), tokens.next()?)
        }
        _ => return None,
    };
    match (tokens.next(), tokens.next()) {
        (Some("NDATA"), Some(notation)) => Some(Declaration::Unparsed(UnparsedEntity {
            name: name.to_string(),
            system_id: system_id.to_string(),
            public_id,
            notation: notation.to_string(),
        })),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_ndata_entity() {
        let entities = scan(r#" doc [ <!ENTITY logo SYSTEM "logo.gif" NDATA gif> ]"#).unparsed;
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].name, "logo");
        assert_eq!(entities[0].system_id, "logo.gif");
        assert_eq!(entities[0].public_id, None);
        assert_eq!(entities[0].notation, "gif");
    }

    #[test]
    fn test_public_ndata_entity() {
        let entities = scan(r#"doc [<!ENTITY pic PUBLIC '-//ACME//pic' 'pic.png' NDATA png>]"#).unparsed;
        assert_eq!(entities[0].public_id.as_deref(), Some("-//ACME//pic"));
        assert_eq!(entities[0].system_id, "pic.png");
    }

    #[test]
    fn test_only_ndata_entities_are_unparsed() {
        let doctype = r#"doc [
            <!ENTITY greeting "a > b">
            <!ENTITY % common SYSTEM "common.ent">
            <!ENTITY chapter SYSTEM "ch1.xml">
            <!ENTITY photo SYSTEM "photo.jpg" NDATA jpeg>
        ]"#;
        let declarations = scan(doctype);
        assert_eq!(declarations.unparsed.len(), 1);
        assert_eq!(declarations.unparsed[0].name, "photo");
        assert_eq!(declarations.general.len(), 1);
        assert_eq!(declarations.general["greeting"], "a > b");
    }

    #[test]
    fn test_internal_entities() {
        let declarations = scan(r#"a [<!ENTITY e "x"> <!ENTITY copy '&#169; 2025'> <!ENTITY e "y">]"#);
        assert_eq!(declarations.general["e"], "x");
        assert_eq!(declarations.general["copy"], "\u{a9} 2025");
        assert!(declarations.unparsed.is_empty());
    }

    #[test]
    fn test_commented_declarations_are_ignored() {
        let doctype = r#"doc [
            <!-- <!ENTITY ghost SYSTEM "ghost.gif" NDATA gif> -->
            <!ENTITY logo SYSTEM "logo.gif" NDATA gif>
            <!-- <!ENTITY hidden "no"> -->
        ]"#;
        let declarations = scan(doctype);
        assert_eq!(declarations.unparsed.len(), 1);
        assert_eq!(declarations.unparsed[0].name, "logo");
        assert!(declarations.general.is_empty());
    }

    #[test]
    fn test_comment_inside_literal_is_text() {
        let declarations = scan(r#"a [<!ENTITY c "<!--"> <!ENTITY pic SYSTEM "p.png" NDATA png>]"#);
        assert_eq!(declarations.general["c"], "<!--");
        assert_eq!(declarations.unparsed.len(), 1);
    }

    #[test]
    fn test_no_internal_subset() {
        assert!(scan("html").unparsed.is_empty());
    }

    #[test]
    fn test_unterminated_declaration() {
        assert!(scan("doc [<!ENTITY x SYSTEM \"x").unparsed.is_empty());
    }
}
