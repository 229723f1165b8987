// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 U.S. Federal Government (in countries where recognized)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Adapter configuration.
//!
//! Every field has a default, so an empty document is a valid configuration:
//!
//! ```toml
//! [query]
//! program = "powershell.exe"
//! args = ["-NoProfile", "-NonInteractive"]
//! store_path = "Cert:\\LocalMachine"
//! recurse = true
//!
//! [logging]
//! level = "info"
//! json_format = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CertStoreError, Result};
use crate::logging::LogConfig;

/// Complete adapter configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CertStoreConfig {
    /// Certificate query subprocess.
    #[serde(default)]
    pub query: QueryConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LogConfig,
}

impl CertStoreConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| CertStoreError::config(format!("Invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CertStoreError::config(format!("TOML serialize: {e}")))
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CertStoreError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.query.program.trim().is_empty() {
            return Err(CertStoreError::config("query.program must not be empty"));
        }
        if self.query.store_path.trim().is_empty() {
            return Err(CertStoreError::config("query.store_path must not be empty"));
        }
        Ok(())
    }
}

/// How certificates are fetched by thumbprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryConfig {
    /// Program to run.
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments placed before `-Command <script>`.
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// `Cert:` drive path searched for the thumbprint.
    #[serde(default = "default_store_path")]
    pub store_path: String,

    /// Search below `store_path` recursively.
    #[serde(default = "default_recurse")]
    pub recurse: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            store_path: default_store_path(),
            recurse: default_recurse(),
        }
    }
}

impl QueryConfig {
    /// Search a specific store path, e.g. `Cert:\CurrentUser\My`.
    pub fn with_store_path(mut self, path: impl Into<String>) -> Self {
        self.store_path = path.into();
        self
    }

    /// Use a different program, e.g. `pwsh`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Enable or disable recursive search.
    pub fn with_recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }
}

fn default_program() -> String {
    "powershell.exe".to_string()
}

fn default_args() -> Vec<String> {
    vec!["-NoProfile".to_string(), "-NonInteractive".to_string()]
}

fn default_store_path() -> String {
    "Cert:\\LocalMachine".to_string()
}

fn default_recurse() -> bool {
    true
}
