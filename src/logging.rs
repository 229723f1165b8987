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

//! Logging configuration.
//!
//! The crate emits `tracing` events from every store operation. Applications
//! that do not install their own subscriber can call [`init`] (feature
//! `logging`, on by default):
//!
//! ```toml
//! [logging]
//! level = "debug"
//! path = "C:\\ProgramData\\certstore\\certstore.log"
//! json_format = false
//! ```
//!
//! ```no_run
//! use win32_certstore::logging::{self, LogConfig, LogLevel};
//!
//! logging::init(&LogConfig::stderr().with_level(LogLevel::Debug))?;
//! # Ok::<(), win32_certstore::CertStoreError>(())
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Log level for filtering messages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose - all messages.
    Trace = 0,
    /// Debug information.
    Debug = 1,
    /// Informational messages.
    #[default]
    Info = 2,
    /// Warnings.
    #[serde(alias = "warning")]
    Warn = 3,
    /// Errors only.
    Error = 4,
}

impl LogLevel {
    /// Parse from string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Get the level name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }

    /// The matching `tracing` level.
    pub fn to_tracing(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Minimum log level to output.
    #[serde(default)]
    pub level: LogLevel,
    /// Path to log file (None for stderr).
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Use JSON format for log entries.
    #[serde(default)]
    pub json_format: bool,
    /// Include the event target (module path) in log entries.
    #[serde(default)]
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            path: None,
            json_format: false,
            include_target: false,
        }
    }
}

impl LogConfig {
    /// Create a new config for file logging.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    /// Create a new config for stderr logging.
    pub fn stderr() -> Self {
        Self::default()
    }

    /// Set the log level.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Enable JSON format.
    pub fn with_json(mut self) -> Self {
        self.json_format = true;
        self
    }
}

/// Install a global `tracing` subscriber for `config`.
///
/// Fails if the log file cannot be opened or a global subscriber is already
/// installed.
#[cfg(feature = "logging")]
pub fn init(config: &LogConfig) -> crate::error::Result<()> {
    use std::fs::{self, OpenOptions};
    use std::sync::Mutex;

    use crate::error::CertStoreError;

    let builder = tracing_subscriber::fmt()
        .with_max_level(config.level.to_tracing())
        .with_target(config.include_target);

    let result = match &config.path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let writer = Mutex::new(file);

            if config.json_format {
                builder.json().with_writer(writer).try_init()
            } else {
                builder.with_ansi(false).with_writer(writer).try_init()
            }
        }
        None if config.json_format => builder.json().with_writer(std::io::stderr).try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    result.map_err(|e| CertStoreError::config(format!("Failed to install logger: {e}")))
}
