// Copyright (c) 2023 The MobileCoin Foundation

//! Support for the encodings attestation certificate chains are exchanged in

extern crate alloc;

use super::certs::Certificate;
use super::{Error, Result};
use crate::tlv::{self, TagClass, TlvNode};
use alloc::vec::Vec;
use const_oid::ObjectIdentifier;
use x509_cert::Certificate as X509Certificate;

const OID_PKCS7_SIGNED_DATA: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.7.2");

/// An X509 certificate chain ordered from the leaf to the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateChain {
    certificates: Vec<Certificate>,
}

impl CertificateChain {
    /// Create a new certificate chain, the leaf certificate first
    pub fn new(certificates: Vec<Certificate>) -> Self {
        Self { certificates }
    }

    /// Decode a chain detecting its encoding.
    ///
    /// Supported are one or more PEM `CERTIFICATE` blocks, a DER PKCS#7
    /// `SignedData` (as in `.p7b` files), a DER `SEQUENCE OF Certificate` and
    /// DER certificates concatenated back to back.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if let Some(pem) = pem_start(bytes) {
            let certificates = X509Certificate::load_pem_chain(pem)?
                .into_iter()
                .map(Certificate::try_from)
                .collect::<Result<Vec<_>>>()?;
            return Ok(Self::new(certificates));
        }

        let nodes = tlv::parse_sequence(bytes).map_err(|_| Error::UnsupportedChainFormat)?;
        let certificates = match nodes.as_slice() {
            [] => return Err(Error::UnsupportedChainFormat),
            [single] => decode_single(single)?,
            concatenated => concatenated
                .iter()
                .map(|node| Certificate::try_from(node.encoded()))
                .collect::<Result<Vec<_>>>()?,
        };
        Ok(Self::new(certificates))
    }

    /// The certificates, the leaf first
    pub fn certificates(&self) -> &[Certificate] {
        &self.certificates
    }

    /// The leaf certificate
    pub fn leaf(&self) -> Option<&Certificate> {
        self.certificates.first()
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }
}

impl From<CertificateChain> for Vec<Certificate> {
    fn from(chain: CertificateChain) -> Self {
        chain.certificates
    }
}

/// Create a chain from DER encoded certificates, the leaf first
impl TryFrom<&[&[u8]]> for CertificateChain {
    type Error = Error;

    fn try_from(der_certificates: &[&[u8]]) -> ::core::result::Result<Self, Self::Error> {
        let certificates = der_certificates
            .iter()
            .map(|der| Certificate::try_from(*der))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(certificates))
    }
}

/// The PEM text with any leading whitespace removed
fn pem_start(bytes: &[u8]) -> Option<&[u8]> {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace())?;
    let pem = &bytes[start..];
    pem.starts_with(b"-----BEGIN").then_some(pem)
}

/// A lone top level SEQUENCE is a PKCS#7 message, a single certificate or a
/// SEQUENCE OF certificates
fn decode_single(node: &TlvNode<'_>) -> Result<Vec<Certificate>> {
    let children = node.sequence().ok_or(Error::UnsupportedChainFormat)?;
    if let Some(content_type) = children.first() {
        if content_type.is_oid(&OID_PKCS7_SIGNED_DATA) {
            return pkcs7_certificates(children);
        }
    }

    match Certificate::try_from(node.encoded()) {
        Ok(certificate) => Ok(alloc::vec![certificate]),
        Err(_) if !children.is_empty() => children
            .iter()
            .map(|child| Certificate::try_from(child.encoded()))
            .collect::<Result<Vec<_>>>()
            .map_err(|_| Error::UnsupportedChainFormat),
        Err(e) => Err(e),
    }
}

/// The certificates of a PKCS#7 `ContentInfo` holding `SignedData`
///
/// ```text
/// ContentInfo ::= SEQUENCE {
///     contentType ContentType,
///     content [0] EXPLICIT ANY DEFINED BY contentType }
///
/// SignedData ::= SEQUENCE {
///     version CMSVersion,
///     digestAlgorithms DigestAlgorithmIdentifiers,
///     encapContentInfo EncapsulatedContentInfo,
///     certificates [0] IMPLICIT CertificateSet OPTIONAL,
///     crls [1] IMPLICIT RevocationInfoChoices OPTIONAL,
///     signerInfos SignerInfos }
/// ```
fn pkcs7_certificates(content_info: &[TlvNode<'_>]) -> Result<Vec<Certificate>> {
    let signed_data = content_info
        .get(1)
        .and_then(TlvNode::explicit)
        .and_then(TlvNode::sequence)
        .ok_or(Error::UnsupportedChainFormat)?;

    let certificate_set = signed_data.iter().find(|node| {
        let tag = node.tag();
        tag.class == TagClass::ContextSpecific && tag.number == 0 && tag.constructed
    });

    match certificate_set.and_then(TlvNode::children) {
        Some(certificates) => certificates
            .iter()
            .map(|node| Certificate::try_from(node.encoded()))
            .collect(),
        None => Ok(Vec::new()),
    }
}
