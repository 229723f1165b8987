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

//! Conversions between [`Certificate`] and its DER and PEM encodings.

use base64::prelude::*;
use der::{Decode, Encode};
use sha1::{Digest, Sha1};
use x509_cert::Certificate;

use crate::error::{CertStoreError, Result};
use crate::thumbprint::Thumbprint;

const PEM_BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const PEM_END: &str = "-----END CERTIFICATE-----";
const PEM_LINE_LEN: usize = 64;

/// Encode a certificate to DER for the native add call.
///
/// The encoding must be non-empty and decode back to a certificate.
pub fn encode_der(certificate: &Certificate) -> Result<Vec<u8>> {
    let der = certificate.to_der().map_err(|e| {
        CertStoreError::validation(format!("Failed to encode certificate: {}", e))
    })?;

    if der.is_empty() {
        return Err(CertStoreError::validation("Certificate encodes to no data"));
    }

    Certificate::from_der(&der).map_err(|e| {
        CertStoreError::validation(format!("Certificate does not round-trip through DER: {}", e))
    })?;

    Ok(der)
}

/// Parse a DER-encoded certificate.
pub fn parse_der(der: &[u8]) -> Result<Certificate> {
    if der.is_empty() {
        return Err(CertStoreError::parse("Empty DER data"));
    }

    Certificate::from_der(der)
        .map_err(|e| CertStoreError::parse(format!("Invalid DER certificate: {}", e)))
}

/// Parse the first `CERTIFICATE` block of PEM text.
///
/// Line endings and line width are not checked, so output from tools that
/// wrap base64 at 76 columns with CRLF is accepted.
pub fn parse_pem(pem: &str) -> Result<Certificate> {
    let start = pem
        .find(PEM_BEGIN)
        .ok_or_else(|| CertStoreError::parse("Missing BEGIN CERTIFICATE line"))?;
    let body = &pem[start + PEM_BEGIN.len()..];
    let end = body
        .find(PEM_END)
        .ok_or_else(|| CertStoreError::parse("Missing END CERTIFICATE line"))?;

    let cleaned: Vec<u8> = body[..end]
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    let der = BASE64_STANDARD
        .decode(&cleaned)
        .map_err(|e| CertStoreError::parse(format!("Invalid base64 in PEM body: {}", e)))?;

    parse_der(&der)
}

/// Encode a certificate as PEM with 64-column lines.
pub fn encode_pem(certificate: &Certificate) -> Result<String> {
    let der = encode_der(certificate)?;
    let encoded = BASE64_STANDARD.encode(&der);

    let mut pem = String::with_capacity(encoded.len() + encoded.len() / PEM_LINE_LEN + 64);
    pem.push_str(PEM_BEGIN);
    pem.push('\n');
    for line in encoded.as_bytes().chunks(PEM_LINE_LEN) {
        // base64 output is ASCII
        pem.push_str(&String::from_utf8_lossy(line));
        pem.push('\n');
    }
    pem.push_str(PEM_END);
    pem.push('\n');

    Ok(pem)
}

/// SHA-1 thumbprint of the certificate's DER encoding.
pub fn sha1_thumbprint(certificate: &Certificate) -> Result<Thumbprint> {
    let der = encode_der(certificate)?;
    Thumbprint::from_bytes(&Sha1::digest(&der))
}
