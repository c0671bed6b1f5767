// Copyright (c) 2023 The MobileCoin Foundation

//! X509 certificate handling for attestation chains

mod algorithm;
mod certs;
mod chain;
mod error;

pub use algorithm::{DigestAlgorithm, PublicKey, Signature};
pub use certs::{normalize_serial, Certificate, Fingerprint};
pub use chain::CertificateChain;
pub use error::Error;

/// Result type for this module
pub type Result<T> = core::result::Result<T, Error>;
