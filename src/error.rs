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

//! Error types for certificate store operations.
//!
//! Every failure is caught at the operation boundary and surfaced as a
//! [`CertStoreError`]. Native failures carry the code and message returned
//! by the platform's last-error lookup.

use std::fmt;

use thiserror::Error;

use crate::native::NativeError;

/// Result type alias using [`CertStoreError`].
pub type Result<T> = std::result::Result<T, CertStoreError>;

/// The store operation a native failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Adding an encoded certificate.
    Add,
    /// Enumerating certificate names.
    List,
    /// Finding and deleting a certificate.
    Delete,
}

impl Operation {
    /// Lowercase label used as the error context.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::List => "list",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while working with a certificate store.
#[derive(Debug, Error)]
pub enum CertStoreError {
    /// Malformed input detected before any native call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The native store API reported a failure.
    #[error("{operation}: native error 0x{code:08X}: {message}")]
    NativeCall {
        /// Operation that failed.
        operation: Operation,
        /// Native error code from the last-error lookup.
        code: u32,
        /// Human-readable message for `code`.
        message: String,
    },

    /// PEM or DER data returned by the store could not be decoded.
    #[error("Certificate parsing error: {0}")]
    Parse(String),

    /// The certificate query subprocess could not run or failed.
    #[error("Certificate query failed: {0}")]
    Query(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON encoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CertStoreError {
    /// Create a validation error with the given message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a native call error from a last-error lookup.
    pub fn native(operation: Operation, error: NativeError) -> Self {
        Self::NativeCall {
            operation,
            code: error.code,
            message: error.message,
        }
    }

    /// Create a parse error with the given message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Create a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the failed operation if this is a native call error.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::NativeCall { operation, .. } => Some(*operation),
            _ => None,
        }
    }

    /// Returns the native error code if this is a native call error.
    pub fn native_code(&self) -> Option<u32> {
        match self {
            Self::NativeCall { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns true if retrying the same call may succeed.
    ///
    /// Native store errors (access denied, not found, duplicate) are not
    /// transient; only subprocess and I/O failures are.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Query(_) | Self::Io(_))
    }
}
