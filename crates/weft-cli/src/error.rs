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

//! Structured error types for the Weft CLI.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use weft_core::CursorError;

/// Errors raised while running a command.
#[derive(Error, Debug, Clone)]
pub enum CliError {
    /// Reading the input or writing the output failed.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The file path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// The cursor chain failed.
    #[error("{0}")]
    Cursor(#[from] CursorError),
}

impl CliError {
    /// Wrap an I/O error on `path`.
    pub fn io_error(path: impl Into<PathBuf>, error: io::Error) -> Self {
        CliError::Io {
            path: path.into(),
            message: error.to_string(),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = CliError::io_error("missing.xml", io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.to_string(), "I/O error for 'missing.xml': gone");
    }

    #[test]
    fn test_cursor_error_passes_through() {
        let err: CliError = CursorError::upstream("broken").into();
        assert_eq!(err.to_string(), CursorError::upstream("broken").to_string());
    }
}
