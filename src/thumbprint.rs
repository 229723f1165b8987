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

//! Certificate thumbprints.
//!
//! A thumbprint is the SHA-1 (40 hex digits) or MD5 (32 hex digits) digest of
//! the DER-encoded certificate. User input is often copied from a certificate
//! viewer with colons or spaces between the bytes:
//!
//! ```
//! use win32_certstore::Thumbprint;
//!
//! let tp = Thumbprint::parse("3b:7e:03:27 a1:bf:3c:9a:5e:8c:1a:1c:6e:5e:f6:7b:11:7c:24:22").unwrap();
//! assert_eq!(tp.as_str(), "3B7E0327A1BF3C9A5E8C1A1C6E5EF67B117C2422");
//! ```

use std::fmt;

use crate::error::{CertStoreError, Result};

/// Digest algorithm a thumbprint was computed with, inferred from its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbprintKind {
    /// 20-byte SHA-1 digest.
    Sha1,
    /// 16-byte MD5 digest.
    Md5,
}

impl ThumbprintKind {
    /// Number of hex digits in a thumbprint of this kind.
    pub fn hex_len(&self) -> usize {
        match self {
            Self::Sha1 => 40,
            Self::Md5 => 32,
        }
    }
}

/// A validated, normalized thumbprint: uppercase hex with no separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Thumbprint(String);

impl Thumbprint {
    /// Strip every non-alphanumeric character and uppercase the rest.
    ///
    /// This does not validate; `normalize("AA:BB:CC")` is `"AABBCC"`.
    pub fn normalize(input: &str) -> String {
        input
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_uppercase())
            .collect()
    }

    /// Normalize and validate a SHA-1 or MD5 thumbprint.
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = Self::normalize(input);

        if normalized.is_empty() {
            return Err(CertStoreError::validation("Thumbprint is empty"));
        }

        if let Some(bad) = normalized.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(CertStoreError::validation(format!(
                "Invalid thumbprint '{}': '{}' is not a hex digit",
                input, bad
            )));
        }

        let thumbprint = Self(normalized);
        if thumbprint.kind().is_none() {
            return Err(CertStoreError::validation(format!(
                "Invalid thumbprint length: expected 40 (SHA-1) or 32 (MD5) hex digits, got {}",
                thumbprint.0.len()
            )));
        }

        Ok(thumbprint)
    }

    /// Build a thumbprint from raw digest bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let hex: String = bytes.iter().map(|b| format!("{:02X}", b)).collect();
        Self::parse(&hex)
    }

    /// The normalized hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The digest algorithm, by length.
    pub fn kind(&self) -> Option<ThumbprintKind> {
        match self.0.len() {
            40 => Some(ThumbprintKind::Sha1),
            32 => Some(ThumbprintKind::Md5),
            _ => None,
        }
    }

    /// The digest bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0
            .as_bytes()
            .chunks(2)
            .filter_map(|pair| {
                std::str::from_utf8(pair)
                    .ok()
                    .and_then(|s| u8::from_str_radix(s, 16).ok())
            })
            .collect()
    }

    /// Colon-separated form, as shown by certificate viewers.
    pub fn to_colon_hex(&self) -> String {
        self.0
            .as_bytes()
            .chunks(2)
            .filter_map(|pair| std::str::from_utf8(pair).ok())
            .collect::<Vec<_>>()
            .join(":")
    }
}

impl fmt::Display for Thumbprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Thumbprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Thumbprint {
    type Err = CertStoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
