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

//! CLI command definitions and argument parsing.

use crate::commands;
use crate::error::CliResult;
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Top-level commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Print the event stream of an XML file
    ///
    /// Writes one line per event, indented by nesting depth. Filters are
    /// applied in a fixed order: comments are stripped before elements are
    /// pruned.
    Events(EventsArgs),
}

/// Arguments of the `events` command.
#[derive(Args, Debug, Clone, Default)]
pub struct EventsArgs {
    /// Input file path
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Drop every element with this local name, with its content (repeatable)
    #[arg(long, value_name = "NAME")]
    pub prune: Vec<String>,

    /// Drop comments and processing instructions
    #[arg(long)]
    pub strip_comments: bool,

    /// Skip the content of the document element
    #[arg(long)]
    pub skip_root: bool,

    /// Report protocol violations and continue instead of failing
    #[arg(long)]
    pub tolerant: bool,

    /// Read incrementally instead of parsing the whole file into a tree
    #[arg(long)]
    pub streaming: bool,

    /// Append the source location of each event
    #[arg(long)]
    pub locations: bool,
}

impl Commands {
    /// Execute the command, writing results to stdout.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the input cannot be read or the cursor chain fails.
    pub fn execute(self) -> CliResult<()> {
        match self {
            Commands::Events(args) => commands::events(&args),
        }
    }
}
