// Copyright (c) 2023 The MobileCoin Foundation

//! Certificate wrapper keeping the original DER next to the decoded form

extern crate alloc;

use super::{Error, PublicKey, Result, Signature};
use alloc::string::String;
use alloc::vec::Vec;
use const_oid::ObjectIdentifier;
use core::ops::Range;
use core::time::Duration;
use der::{Decode, DecodePem, Encode, Header, SliceReader};
use sha2::{Digest, Sha256};
use x509_cert::ext::Extension;
use x509_cert::name::Name;
use x509_cert::Certificate as X509Certificate;

/// SHA-256 of a DER encoded `SubjectPublicKeyInfo`
pub type Fingerprint = [u8; 32];

/// A decoded X509 certificate.
///
/// The signature covers the original encoding of the "to be signed" portion,
/// so the DER bytes are kept alongside the decoded certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    der_bytes: Vec<u8>,
    certificate: X509Certificate,
    tbs: Range<usize>,
}

impl Certificate {
    fn new(der_bytes: Vec<u8>, certificate: X509Certificate) -> Result<Self> {
        let mut reader = SliceReader::new(&der_bytes)?;
        let header = Header::decode(&mut reader)?;
        let tbs_offset = u32::from(header.encoded_len()?) as usize;
        let tbs_size = u32::from(certificate.tbs_certificate.encoded_len()?) as usize;
        let tbs = tbs_offset..tbs_offset + tbs_size;
        Ok(Self {
            der_bytes,
            certificate,
            tbs,
        })
    }

    /// The DER encoding of the certificate
    pub fn der_bytes(&self) -> &[u8] {
        &self.der_bytes
    }

    /// The decoded certificate
    pub fn x509_certificate(&self) -> &X509Certificate {
        &self.certificate
    }

    /// The serial number content octets, including any leading sign octet
    pub fn serial_number(&self) -> &[u8] {
        self.certificate.tbs_certificate.serial_number.as_bytes()
    }

    /// The serial number as lowercase hex without leading zeros
    pub fn serial_hex(&self) -> String {
        normalize_serial(self.serial_number())
    }

    /// Start of the validity window as time since the unix epoch
    pub fn not_before(&self) -> Duration {
        self.certificate
            .tbs_certificate
            .validity
            .not_before
            .to_unix_duration()
    }

    /// End of the validity window as time since the unix epoch
    pub fn not_after(&self) -> Duration {
        self.certificate
            .tbs_certificate
            .validity
            .not_after
            .to_unix_duration()
    }

    #[allow(missing_docs)]
    pub fn subject(&self) -> &Name {
        &self.certificate.tbs_certificate.subject
    }

    #[allow(missing_docs)]
    pub fn issuer(&self) -> &Name {
        &self.certificate.tbs_certificate.issuer
    }

    /// The subject public key
    pub fn public_key(&self) -> Result<PublicKey> {
        PublicKey::try_from(&self.certificate.tbs_certificate.subject_public_key_info)
    }

    /// The signature made by the issuer
    pub fn signature(&self) -> Result<Signature> {
        let bytes = self
            .certificate
            .signature
            .as_bytes()
            .ok_or(Error::SignatureDecoding)?;
        Signature::try_from_algorithm_and_signature(&self.certificate.signature_algorithm, bytes)
    }

    /// SHA-256 of the DER encoded subject public key info.
    ///
    /// Keys of any algorithm can be fingerprinted, even those
    /// [`PublicKey`] doesn't support.
    pub fn fingerprint(&self) -> Result<Fingerprint> {
        let spki = self
            .certificate
            .tbs_certificate
            .subject_public_key_info
            .to_der()?;
        Ok(Sha256::digest(spki).into())
    }

    /// All the extensions of the certificate
    pub fn extensions(&self) -> &[Extension] {
        self.certificate
            .tbs_certificate
            .extensions
            .as_deref()
            .unwrap_or_default()
    }

    /// The first extension with `oid`
    pub fn extension(&self, oid: &ObjectIdentifier) -> Option<&Extension> {
        self.extensions()
            .iter()
            .find(|extension| &extension.extn_id == oid)
    }

    /// Verify the certificate was signed by `key`
    pub fn verify_signature(&self, key: &PublicKey) -> Result<()> {
        let signature = self.signature()?;
        let tbs_contents = self
            .der_bytes
            .get(self.tbs.clone())
            .ok_or(Error::SignatureVerification)?;
        key.verify(tbs_contents, &signature)
    }

    /// Check `unix_time` is inside the validity window, bounds included
    pub fn check_validity(&self, unix_time: Duration) -> Result<()> {
        if unix_time < self.not_before() {
            Err(Error::CertificateNotYetValid)
        } else if unix_time > self.not_after() {
            Err(Error::CertificateExpired)
        } else {
            Ok(())
        }
    }
}

/// Normalize a serial number to lowercase hex without leading zeros.
///
/// A zero serial is `"0"`.
pub fn normalize_serial(bytes: &[u8]) -> String {
    let hex = hex::encode(bytes);
    match hex.trim_start_matches('0') {
        "" => String::from("0"),
        trimmed => String::from(trimmed),
    }
}

/// Convert a DER-encoded certificate into a [`Certificate`].
impl TryFrom<&[u8]> for Certificate {
    type Error = Error;

    fn try_from(der_bytes: &[u8]) -> ::core::result::Result<Self, Self::Error> {
        let certificate = X509Certificate::from_der(der_bytes)?;
        Self::new(der_bytes.to_vec(), certificate)
    }
}

/// Convert a PEM-encoded certificate into a [`Certificate`].
impl TryFrom<&str> for Certificate {
    type Error = Error;

    fn try_from(pem: &str) -> ::core::result::Result<Self, Self::Error> {
        let certificate = X509Certificate::from_pem(pem)?;
        Self::try_from(certificate)
    }
}

impl TryFrom<X509Certificate> for Certificate {
    type Error = Error;

    fn try_from(certificate: X509Certificate) -> ::core::result::Result<Self, Self::Error> {
        let der_bytes = certificate.to_der()?;
        Self::new(der_bytes, certificate)
    }
}
