// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for OBJ parsing
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing OBJ text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("Index 0 on line {line} (OBJ indices are 1-based)")]
    ZeroIndex { line: usize },

    #[error("Index on line {line} does not resolve to a 32-bit element index")]
    IndexOverflow { line: usize },
}

impl Error {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Error::Syntax {
            line,
            message: message.into(),
        }
    }
}
