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

//! Property tests for the cursor protocol

use proptest::prelude::*;
use weft_core::{Event, EventCursor};
use weft_test::{arb_sequence, build_sequence, record_all, record_skipping, wrap_n, Tree};

/// Walk `cursor` to the next `StartElement` after `skip` of them.
fn advance_to_element<C: EventCursor + ?Sized>(cursor: &mut C, skip: usize) -> bool {
    let mut seen = 0;
    loop {
        match cursor.next().unwrap() {
            Event::StartElement if seen == skip => return true,
            Event::StartElement => seen += 1,
            Event::EndOfInput => return false,
            _ => {}
        }
    }
}

fn element_count(tree: &Tree) -> usize {
    match tree {
        Tree::Element { children, .. } => 1 + children.iter().map(element_count).sum::<usize>(),
        _ => 0,
    }
}

/// The tree of the `index`-th element in document order.
fn nth_element(tree: &Tree, index: usize) -> Option<&Tree> {
    fn walk<'t>(tree: &'t Tree, index: &mut usize) -> Option<&'t Tree> {
        if let Tree::Element { children, .. } = tree {
            if *index == 0 {
                return Some(tree);
            }
            *index -= 1;
            for child in children {
                if let Some(found) = walk(child, index) {
                    return Some(found);
                }
            }
        }
        None
    }
    let mut index = index;
    walk(tree, &mut index)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_source_emits_every_event(tree in arb_sequence()) {
        let mut cursor = build_sequence(&tree);
        let recorded = record_all(&mut cursor).unwrap();
        // START_DOCUMENT, END_DOCUMENT and END_OF_INPUT surround the tree.
        prop_assert_eq!(recorded.len(), tree.event_count() + 3);
    }

    #[test]
    fn prop_pass_through_layers_are_transparent(tree in arb_sequence(), layers in 0usize..8) {
        let expected = record_all(&mut build_sequence(&tree)).unwrap();
        let mut chain = wrap_n(Box::new(build_sequence(&tree)), layers);
        prop_assert_eq!(record_all(&mut chain).unwrap(), expected);
    }

    #[test]
    fn prop_skip_matches_walking(tree in arb_sequence(), pick in any::<prop::sample::Index>()) {
        let target = pick.index(element_count(&tree));

        let mut skipped = build_sequence(&tree);
        prop_assert!(advance_to_element(&mut skipped, target));
        let skip_end = skipped.skip_to_matching_end().unwrap();

        let mut walked = build_sequence(&tree);
        prop_assert!(advance_to_element(&mut walked, target));
        let walk_end = weft_core::skip_by_next(&mut walked).unwrap();

        prop_assert_eq!(skip_end, Event::EndElement);
        prop_assert_eq!(walk_end, Event::EndElement);
        prop_assert_eq!(skipped.node_name().unwrap(), walked.node_name().unwrap());
        prop_assert_eq!(record_all(&mut skipped).unwrap(), record_all(&mut walked).unwrap());
    }

    #[test]
    fn prop_string_value_lands_on_matching_end(
        tree in arb_sequence(),
        pick in any::<prop::sample::Index>(),
        layers in 0usize..4,
    ) {
        let target = pick.index(element_count(&tree));
        let Some(element) = nth_element(&tree, target) else {
            return Err(TestCaseError::fail("element index out of range"));
        };

        let mut chain = wrap_n(Box::new(build_sequence(&tree)), layers);
        prop_assert!(advance_to_element(chain.as_mut(), target));
        let name = chain.node_name().unwrap().clone();

        prop_assert_eq!(chain.string_value().unwrap(), element.text_content());
        prop_assert_eq!(chain.current(), Event::EndElement);
        prop_assert_eq!(chain.node_name().unwrap(), &name);
    }

    #[test]
    fn prop_skipping_every_element_leaves_document_frame(tree in arb_sequence()) {
        let mut cursor = build_sequence(&tree);
        let recorded = record_skipping(&mut cursor, |r| r.event == Event::StartElement).unwrap();
        let events: Vec<Event> = recorded.iter().map(|r| r.event).collect();
        prop_assert_eq!(
            events,
            vec![
                Event::StartDocument,
                Event::StartElement,
                Event::EndElement,
                Event::EndDocument,
                Event::EndOfInput,
            ]
        );
    }

    #[test]
    fn prop_close_never_fails(tree in arb_sequence(), steps in 0usize..20) {
        let mut cursor = build_sequence(&tree);
        for _ in 0..steps {
            if cursor.next().unwrap() == Event::EndOfInput {
                break;
            }
        }
        cursor.close();
        cursor.close();
    }
}
