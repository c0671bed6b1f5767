// Copyright (c) 2023 The MobileCoin Foundation

//! Snapshot of the published attestation certificate revocation status.
//!
//! The status list is a JSON document keyed by certificate serial number in
//! hex:
//!
//! ```json
//! {
//!   "entries": {
//!     "2c8cdddfd5e03bfc": {
//!       "status": "REVOKED",
//!       "expires": "2020-11-13",
//!       "reason": "KEY_COMPROMISE",
//!       "comment": "Key stored on unsecure system"
//!     }
//!   }
//! }
//! ```
//!
//! Fetching the list is up to the caller.

extern crate alloc;

use crate::x509::normalize_serial;
use alloc::collections::BTreeMap;
use alloc::string::String;
use serde::Deserialize;

/// Result type for this module
pub type Result<T> = core::result::Result<T, Error>;

/// Error loading a revocation list
#[derive(displaydoc::Display, Debug)]
pub enum Error {
    /// Error parsing the revocation list JSON: {0}
    Json(serde_json::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

/// The kind of revocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Permanently revoked
    Revoked,
    /// Temporarily suspended
    Suspended,
    /// A status this crate does not know about
    #[serde(other)]
    Other,
}

/// Why a certificate was revoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reason {
    /// No reason given
    #[default]
    Unspecified,
    /// The private key is known to be compromised
    KeyCompromise,
    /// The issuing authority is compromised
    CaCompromise,
    /// The key has been replaced
    Superseded,
    /// The attestation software is vulnerable
    SoftwareFlaw,
    /// A reason this crate does not know about
    #[serde(other)]
    Other,
}

/// One entry of the status list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RevocationStatus {
    /// Whether the certificate is revoked or suspended
    pub status: Status,
    /// Why
    #[serde(default)]
    pub reason: Reason,
    /// Free form explanation
    #[serde(default)]
    pub comment: Option<String>,
    /// Date the entry expires, `YYYY-MM-DD`
    #[serde(default)]
    pub expires: Option<String>,
}

#[derive(Deserialize)]
struct StatusList {
    entries: BTreeMap<String, RevocationStatus>,
}

/// Revoked certificate serial numbers.
///
/// Any entry counts as revoked, including suspended ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevocationList {
    entries: BTreeMap<String, RevocationStatus>,
}

impl RevocationList {
    /// An empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the published JSON status list
    pub fn from_json(json: &str) -> Result<Self> {
        let list: StatusList = serde_json::from_str(json)?;
        let mut revocations = Self::new();
        for (serial, status) in list.entries {
            revocations.insert(&serial, status);
        }
        Ok(revocations)
    }

    /// Add an entry for the hex serial number `serial_hex`
    pub fn insert(&mut self, serial_hex: &str, status: RevocationStatus) {
        self.entries.insert(normalize_hex(serial_hex), status);
    }

    /// The entry for the serial number content octets `serial`
    pub fn lookup(&self, serial: &[u8]) -> Option<&RevocationStatus> {
        self.entries.get(&normalize_serial(serial))
    }

    /// The entry for the hex serial number `serial_hex`
    pub fn lookup_hex(&self, serial_hex: &str) -> Option<&RevocationStatus> {
        self.entries.get(&normalize_hex(serial_hex))
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize_hex(serial_hex: &str) -> String {
    let trimmed = serial_hex.trim().trim_start_matches('0');
    if trimmed.is_empty() {
        String::from("0")
    } else {
        trimmed.to_ascii_lowercase()
    }
}
