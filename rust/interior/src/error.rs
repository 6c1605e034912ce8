// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for interior generation.
//!
//! Placement failures are not errors: they come back as `false`/`None`.
//! Only configuration loading can fail here.

/// Result type alias for interior operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while setting up interior generation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration file could not be read.
    #[error("failed to read attic config {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for `AtticConfig`.
    #[error("malformed attic config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// A configuration value is out of range.
    #[error("invalid attic config: {0}")]
    InvalidConfig(String),
}
