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

//! Events command - dump a document's event stream

use crate::cli::EventsArgs;
use crate::error::{CliError, CliResult};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::sync::Arc;
use tracing::{debug, info};
use weft_core::filter::{CommentStripper, ElementPruner, EventTracer, LocalNames};
use weft_core::{CursorResult, Event, EventCursor, PipelineContext, Strictness};
use weft_xml::{parse_document_named, TreeCursor, TreeCursorConfig, XmlReaderConfig, XmlReaderCursor};

/// Print the event stream of `args.file` to stdout.
///
/// # Errors
///
/// Returns `Err` if the file cannot be read, is not well-formed XML, or a
/// protocol violation occurs in strict mode.
pub fn events(args: &EventsArgs) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let count = run_events(args, &mut out)?;
    out.flush().map_err(|e| CliError::io_error("<stdout>", e))?;
    info!(events = count, file = %args.file.display(), "done");
    Ok(())
}

/// Write the event lines for `args` to `out`, returning the number of
/// events written.
pub fn run_events<W: Write>(args: &EventsArgs, out: &mut W) -> CliResult<usize> {
    let system_id = args.file.display().to_string();
    let context = PipelineContext::new()
        .with_strictness(if args.tolerant {
            Strictness::Tolerant
        } else {
            Strictness::Strict
        })
        .into_shared();

    if args.streaming {
        let file = File::open(&args.file).map_err(|e| CliError::io_error(&args.file, e))?;
        let config = XmlReaderConfig {
            system_id: Some(system_id),
            ..XmlReaderConfig::default()
        };
        let source = XmlReaderCursor::from_read(file, config).with_context(context)?;
        write_events(chain(Box::new(source), args), args, out)
    } else {
        let text = fs::read_to_string(&args.file).map_err(|e| CliError::io_error(&args.file, e))?;
        let document = parse_document_named(&text, Some(&system_id))?;
        let config = TreeCursorConfig {
            system_id: Some(system_id),
            ..TreeCursorConfig::default()
        };
        let source = TreeCursor::new(&document, config).with_context(context)?;
        write_events(chain(Box::new(source), args), args, out)
    }
}

fn chain<'a>(source: Box<dyn EventCursor + 'a>, args: &EventsArgs) -> Box<dyn EventCursor + 'a> {
    let mut cursor = source;
    if args.strip_comments {
        cursor = Box::new(CommentStripper::new(cursor));
    }
    if !args.prune.is_empty() {
        debug!(names = ?args.prune, "pruning elements");
        cursor = Box::new(ElementPruner::new(cursor, LocalNames::new(&args.prune)));
    }
    Box::new(EventTracer::labelled(cursor, "output"))
}

fn write_events<W: Write>(
    mut cursor: Box<dyn EventCursor + '_>,
    args: &EventsArgs,
    out: &mut W,
) -> CliResult<usize> {
    let mut depth = 0usize;
    let mut count = 0usize;
    let mut root_skipped = !args.skip_root;
    let mut event = cursor.next()?;
    loop {
        if event.is_end() {
            depth = depth.saturating_sub(1);
        }
        let mut line = describe(&mut *cursor, event)?;
        if args.locations {
            if let Some(location) = cursor.source_location() {
                line.push_str(&format!("  @ {}", location));
            }
        }
        writeln!(out, "{:indent$}{}", "", line, indent = depth * 2)
            .map_err(|e| CliError::io_error("<stdout>", e))?;
        count += 1;

        if event == Event::EndOfInput {
            cursor.close();
            return Ok(count);
        }
        if event.is_start() {
            depth += 1;
        }
        event = if !root_skipped && event == Event::StartElement {
            root_skipped = true;
            cursor.skip_to_matching_end()?
        } else {
            cursor.next()?
        };
    }
}

/// One line of output for the current event.
fn describe(cursor: &mut dyn EventCursor, event: Event) -> CursorResult<String> {
    let mut line = event.to_string();
    match event {
        Event::StartElement => {
            let start = cursor.start_element()?;
            line.push(' ');
            line.push_str(&start.name.display_name());
            for binding in start.namespaces {
                line.push(' ');
                line.push_str(&binding.to_string());
            }
            for attribute in start.attributes {
                line.push_str(&format!(" {}={:?}", attribute.name().display_name(), attribute.value()));
            }
        }
        Event::EndElement => {
            line.push(' ');
            line.push_str(&cursor.node_name()?.display_name());
        }
        Event::ProcessingInstruction => {
            let target = cursor.node_name()?.display_name();
            line.push_str(&format!(" {} {:?}", target, cursor.string_value()?));
        }
        Event::Text | Event::Comment => {
            line.push_str(&format!(" {:?}", cursor.string_value()?));
        }
        _ => {}
    }
    Ok(line)
}
