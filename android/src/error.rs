// Copyright (c) 2023 The MobileCoin Foundation

//! Errors that can occur while decoding attestation records

use crate::x509;

/// Result type for decoding attestations
pub type Result<T> = core::result::Result<T, Error>;

/// Error decoding an Android key attestation
#[derive(displaydoc::Display, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed DER encoding at byte offset {offset}
    #[allow(missing_docs)]
    MalformedEncoding { offset: usize },
    /// Authorization list entry with tag {tag} has an unexpected type
    #[allow(missing_docs)]
    FieldTypeMismatch { tag: u32 },
    /// The root of trust is not a valid sequence
    MalformedRootOfTrust,
    /// The attestation application ID is not a valid sequence
    MalformedApplicationIdentity,
    /// The certificate does not carry a key description extension
    ExtensionNotFound,
    /// The key description does not have the expected layout
    MalformedAttestationRecord,
    /// Error handling the certificate: {0}
    Certificate(x509::Error),
}

impl From<x509::Error> for Error {
    fn from(e: x509::Error) -> Self {
        Error::Certificate(e)
    }
}
