// Copyright (c) 2023 The MobileCoin Foundation

//! The key description extension of an attestation certificate.
//!
//! ```text
//! KeyDescription ::= SEQUENCE {
//!     attestationVersion         INTEGER,
//!     attestationSecurityLevel   SecurityLevel,
//!     keyMintVersion             INTEGER,
//!     keyMintSecurityLevel       SecurityLevel,
//!     attestationChallenge       OCTET_STRING,
//!     uniqueId                   OCTET_STRING,
//!     softwareEnforced           AuthorizationList,
//!     hardwareEnforced           AuthorizationList,
//! }
//! ```

extern crate alloc;

use crate::authorization_list::AuthorizationList;
use crate::knox::{KnoxExtension, KNOX_OID};
use crate::tlv::{self, TlvNode};
use crate::x509::Certificate;
use crate::{Error, Result};
use alloc::vec::Vec;
use const_oid::ObjectIdentifier;

/// OID of the key description extension
pub const KEY_DESCRIPTION_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.4.1.11129.2.1.17");

/// OID of the CBOR (EAT) attestation extension, recognized but not decoded
pub const EAT_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.4.1.11129.2.1.25");

/// OID of the remote key provisioning info extension
pub const PROVISIONING_INFO_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.4.1.11129.2.1.30");

const KEY_USAGE_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.15");

/// Where a key or attestation lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityLevel {
    /// Android system software
    Software,
    /// A trusted execution environment
    TrustedEnvironment,
    /// A discrete secure element
    StrongBox,
    /// A value this crate does not know about
    Unrecognized(i64),
}

impl From<i64> for SecurityLevel {
    fn from(value: i64) -> Self {
        match value {
            0 => SecurityLevel::Software,
            1 => SecurityLevel::TrustedEnvironment,
            2 => SecurityLevel::StrongBox,
            other => SecurityLevel::Unrecognized(other),
        }
    }
}

impl From<SecurityLevel> for i64 {
    fn from(level: SecurityLevel) -> Self {
        match level {
            SecurityLevel::Software => 0,
            SecurityLevel::TrustedEnvironment => 1,
            SecurityLevel::StrongBox => 2,
            SecurityLevel::Unrecognized(other) => other,
        }
    }
}

/// The decoded attestation of one certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationRecord {
    /// Version of the attestation schema, see
    /// [`crate::labels::attestation_version`]
    pub attestation_version: i64,
    /// Security level of the attestation
    pub attestation_security_level: SecurityLevel,
    /// Version of the Keymaster or KeyMint implementation, see
    /// [`crate::labels::keymaster_version`]
    pub keymaster_version: i64,
    /// Security level of the Keymaster or KeyMint implementation
    pub keymaster_security_level: SecurityLevel,
    /// The challenge provided when generating the key
    pub attestation_challenge: Vec<u8>,
    /// Privacy sensitive device identifier, only present when requested
    pub unique_id: Option<Vec<u8>>,
    /// Properties enforced by Android
    pub software_enforced: AuthorizationList,
    /// Properties enforced by the secure hardware
    pub tee_enforced: AuthorizationList,
    /// The Samsung Knox extension when present
    pub vendor_extension: Option<KnoxExtension>,
    /// Extensions an attestation certificate is not expected to carry
    pub unexpected_extensions: Vec<ObjectIdentifier>,
}

impl AttestationRecord {
    /// Decode the attestation extensions of `certificate`.
    ///
    /// A certificate carrying both the key description and the EAT extension
    /// is rejected as [`Error::MalformedAttestationRecord`].
    pub fn decode_from_certificate(certificate: &Certificate) -> Result<Self> {
        let extension = certificate
            .extension(&KEY_DESCRIPTION_OID)
            .ok_or(Error::ExtensionNotFound)?;
        if certificate.extension(&EAT_OID).is_some() {
            log::warn!("Certificate carries both ASN.1 and EAT attestations");
            return Err(Error::MalformedAttestationRecord);
        }
        let mut record = Self::from_der(extension.extn_value.as_bytes())?;

        record.vendor_extension = certificate.extension(&KNOX_OID).and_then(|knox| {
            KnoxExtension::from_der(knox.extn_value.as_bytes())
                .map_err(|e| log::warn!("Ignoring malformed Knox extension: {e}"))
                .ok()
        });

        record.unexpected_extensions = certificate
            .extensions()
            .iter()
            .filter(|extension| {
                let oid = extension.extn_id;
                let attestation = [KEY_DESCRIPTION_OID, EAT_OID, KNOX_OID].contains(&oid);
                let expected = (attestation && !extension.critical)
                    || (oid == KEY_USAGE_OID && extension.critical);
                !expected
            })
            .map(|extension| extension.extn_id)
            .collect();

        Ok(record)
    }

    /// Decode the DER of a key description.
    ///
    /// The record carries no vendor extension and no unexpected extensions,
    /// those come from the certificate.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let node = tlv::parse(bytes)?;
        let elements = node.sequence().ok_or(Error::MalformedAttestationRecord)?;

        let (version, security_level, keymaster_version, keymaster_security_level, challenge) =
            match elements {
                [a, b, c, d, e, ..] => (a, b, c, d, e),
                _ => return Err(Error::MalformedAttestationRecord),
            };

        // Some implementations omit the unique ID entirely
        let (unique_id, lists) = match elements.get(5) {
            Some(element) => match element.octets() {
                Some(unique_id) => (Some(unique_id), &elements[6..]),
                None => (None, &elements[5..]),
            },
            None => (None, &elements[5..]),
        };
        let (software_enforced, tee_enforced) = match lists {
            [software, tee, ..] => (software, tee),
            _ => return Err(Error::MalformedAttestationRecord),
        };

        Ok(Self {
            attestation_version: integer(version)?,
            attestation_security_level: integer(security_level)?.into(),
            keymaster_version: integer(keymaster_version)?,
            keymaster_security_level: integer(keymaster_security_level)?.into(),
            attestation_challenge: challenge
                .octets()
                .ok_or(Error::MalformedAttestationRecord)?
                .to_vec(),
            unique_id: unique_id
                .filter(|unique_id| !unique_id.is_empty())
                .map(<[u8]>::to_vec),
            software_enforced: AuthorizationList::try_from(software_enforced)?,
            tee_enforced: AuthorizationList::try_from(tee_enforced)?,
            vendor_extension: None,
            unexpected_extensions: Vec::new(),
        })
    }

    /// Select the record describing the attested key of a chain.
    ///
    /// `chain` is ordered leaf first. With attest keys a chain holds more than
    /// one attestation, the attesting keys grant `ATTEST_KEY`. Walking from
    /// the root toward the leaf, the first record that does not grant
    /// `ATTEST_KEY` is returned, falling back to the record closest to the
    /// leaf.
    pub fn from_chain(chain: &[Certificate]) -> Result<Self> {
        let mut candidate = None;
        let mut leaf_error = None;
        for (index, certificate) in chain.iter().enumerate().rev() {
            match Self::decode_from_certificate(certificate) {
                Ok(record) if !record.is_attest_key() => return Ok(record),
                Ok(record) => candidate = Some(record),
                Err(e) if index == 0 => leaf_error = Some(e),
                Err(Error::ExtensionNotFound) => {}
                Err(e) => log::debug!("Certificate {index} has no usable attestation: {e}"),
            }
        }
        candidate.ok_or_else(|| leaf_error.unwrap_or(Error::ExtensionNotFound))
    }

    /// Whether the attested key may sign other attestations.
    ///
    /// The hardware enforced purposes decide when present, the software
    /// enforced ones otherwise.
    pub fn is_attest_key(&self) -> bool {
        if self.tee_enforced.purposes.is_some() {
            self.tee_enforced.allows_attest_key()
        } else {
            self.software_enforced.allows_attest_key()
        }
    }
}

fn integer(node: &TlvNode<'_>) -> Result<i64> {
    node.integer().ok_or(Error::MalformedAttestationRecord)
}
