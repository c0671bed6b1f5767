// Copyright (c) 2023 The MobileCoin Foundation

//! The Samsung Knox vendor attestation extension.
//!
//! ```text
//! KnoxAttestation ::= SEQUENCE {
//!     challenge       [0] EXPLICIT UTF8String OPTIONAL,
//!     idAttest        [4] EXPLICIT UTF8String OPTIONAL,
//!     integrityStatus [5] EXPLICIT IntegrityStatus OPTIONAL,
//!     attestRecordHash [6] EXPLICIT OCTET STRING OPTIONAL,
//! }
//! ```

extern crate alloc;

use crate::tlv::{self, TlvNode};
use crate::{Error, Result};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use const_oid::ObjectIdentifier;

/// OID of the Knox attestation extension
pub const KNOX_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.4.1.236.11.3.23.7");

/// The decoded Knox attestation extension
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnoxExtension {
    /// The challenge the Knox attestation was generated for
    pub challenge: Option<String>,
    /// Device ID attestation
    pub id_attestation: Option<String>,
    /// Integrity measurements of the device
    pub integrity: Option<IntegrityStatus>,
    /// Hash of the key attestation record
    pub record_hash: Option<Vec<u8>>,
}

/// Device integrity reported by Knox.
///
/// Status values are `0` for normal and `1` for abnormal, see
/// [`crate::labels::knox_status`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityStatus {
    /// `[0]`
    pub trust_boot: Option<i64>,
    /// `[1]`
    pub warranty: Option<i64>,
    /// `[2]`
    pub icd: Option<i64>,
    /// `[3]`
    pub kernel_status: Option<i64>,
    /// `[4]`
    pub system_status: Option<i64>,
    /// `[5]`
    pub auth_result: Option<AuthResult>,
}

/// Authentication of the calling application
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthResult {
    /// `[0]`
    pub caller_auth_result: Option<i64>,
    /// `[1]`
    pub calling_package: Option<String>,
    /// `[2]`
    pub calling_package_signatures: Option<String>,
    /// `[3]`
    pub calling_package_auth_result: Option<i64>,
}

impl KnoxExtension {
    /// Decode from the extension value
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let node = tlv::parse(bytes)?;
        let mut knox = Self::default();
        for (number, value) in tagged_entries(&node)? {
            match number {
                0 => knox.challenge = Some(text(value)?),
                4 => knox.id_attestation = Some(text(value)?),
                5 => knox.integrity = Some(IntegrityStatus::decode(value)?),
                6 => knox.record_hash = Some(value.octets().ok_or(MALFORMED)?.to_vec()),
                _ => log::debug!("Skipping unknown Knox attestation tag {number}"),
            }
        }
        Ok(knox)
    }
}

impl IntegrityStatus {
    fn decode(node: &TlvNode<'_>) -> Result<Self> {
        let mut status = Self::default();
        for (number, value) in tagged_entries(node)? {
            match number {
                0 => status.trust_boot = Some(integer(value)?),
                1 => status.warranty = Some(integer(value)?),
                2 => status.icd = Some(integer(value)?),
                3 => status.kernel_status = Some(integer(value)?),
                4 => status.system_status = Some(integer(value)?),
                5 => status.auth_result = Some(AuthResult::decode(value)?),
                _ => log::debug!("Skipping unknown Knox integrity tag {number}"),
            }
        }
        Ok(status)
    }
}

impl AuthResult {
    fn decode(node: &TlvNode<'_>) -> Result<Self> {
        let mut result = Self::default();
        for (number, value) in tagged_entries(node)? {
            match number {
                0 => result.caller_auth_result = Some(integer(value)?),
                1 => result.calling_package = Some(text(value)?),
                2 => result.calling_package_signatures = Some(text(value)?),
                3 => result.calling_package_auth_result = Some(integer(value)?),
                _ => log::debug!("Skipping unknown Knox auth result tag {number}"),
            }
        }
        Ok(result)
    }
}

const MALFORMED: Error = Error::MalformedAttestationRecord;

/// The `[n] EXPLICIT` entries of a SEQUENCE
fn tagged_entries<'a, 'b>(node: &'b TlvNode<'a>) -> Result<Vec<(u32, &'b TlvNode<'a>)>> {
    node.sequence()
        .ok_or(MALFORMED)?
        .iter()
        .map(|entry| {
            entry
                .explicit()
                .map(|value| (entry.tag().number, value))
                .ok_or(MALFORMED)
        })
        .collect()
}

fn integer(node: &TlvNode<'_>) -> Result<i64> {
    node.integer().ok_or(MALFORMED)
}

fn text(node: &TlvNode<'_>) -> Result<String> {
    node.text().map(ToString::to_string).ok_or(MALFORMED)
}
