// Copyright (c) 2023 The MobileCoin Foundation

/// Error type for decoding and verifying certificates.
#[derive(Debug, displaydoc::Display, Clone, PartialEq, Eq)]
pub enum Error {
    /// An error occurred decoding the signature from a certificate
    SignatureDecoding,
    /// The certification signature does not match with the verifying key
    SignatureVerification,
    /// The certificate has expired
    CertificateExpired,
    /// The certificate is not yet valid
    CertificateNotYetValid,
    /// The certificate has been revoked
    CertificateRevoked,
    /// An error occurred decoding the certificate: {0}
    CertificateDecoding(der::Error),
    /// An error occurred decoding the key from a certificate
    KeyDecoding,
    /// The input is not a PEM, PKCS#7 or DER certificate chain
    UnsupportedChainFormat,
}

impl From<der::Error> for Error {
    fn from(src: der::Error) -> Self {
        Error::CertificateDecoding(src)
    }
}
