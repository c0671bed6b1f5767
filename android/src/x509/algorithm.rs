// Copyright (c) 2023 The MobileCoin Foundation

//! Algorithm data types used in x509 certificate logic

extern crate alloc;

use super::{Error, Result};
use alloc::vec::Vec;
use const_oid::ObjectIdentifier;
use p256::ecdsa::signature::hazmat::PrehashVerifier;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::Pkcs1v15Sign;
use sha2::{Digest, Sha256, Sha384, Sha512};
use x509_cert::spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};

const OID_PKCS1_RSA_ENCRYPTION: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
const OID_PKCS1_SHA256_WITH_RSA: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.11");
const OID_PKCS1_SHA384_WITH_RSA: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.12");
const OID_PKCS1_SHA512_WITH_RSA: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.13");
const OID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
const OID_SECP256R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
const OID_SECP384R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");
const OID_SECP521R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.35");
const OID_SIG_ECDSA_WITH_SHA256: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.2");
const OID_SIG_ECDSA_WITH_SHA384: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.3");
const OID_SIG_ECDSA_WITH_SHA512: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.4");

/// The message digest of a signature algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl DigestAlgorithm {
    /// Hash `message` with this digest
    pub fn digest(&self, message: &[u8]) -> Vec<u8> {
        match self {
            DigestAlgorithm::Sha256 => Sha256::digest(message).to_vec(),
            DigestAlgorithm::Sha384 => Sha384::digest(message).to_vec(),
            DigestAlgorithm::Sha512 => Sha512::digest(message).to_vec(),
        }
    }

    fn pkcs1v15(&self) -> Pkcs1v15Sign {
        match self {
            DigestAlgorithm::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
            DigestAlgorithm::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
            DigestAlgorithm::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
        }
    }
}

/// Public key used in PKI signature verification
#[derive(Clone)]
pub enum PublicKey {
    /// NIST P-256 public key
    P256(p256::ecdsa::VerifyingKey),
    /// NIST P-384 public key
    P384(p384::ecdsa::VerifyingKey),
    /// NIST P-521 public key, used by the Samsung Knox roots
    P521(p521::ecdsa::VerifyingKey),
    /// RSA public key
    Rsa(rsa::RsaPublicKey),
}

// `p521::ecdsa::VerifyingKey` only derives `Clone`, so these mirror what
// `#[derive(Debug, PartialEq, Eq)]` would produce, using the P-521 key's
// affine point.
impl core::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PublicKey::P256(key) => f.debug_tuple("P256").field(key).finish(),
            PublicKey::P384(key) => f.debug_tuple("P384").field(key).finish(),
            PublicKey::P521(key) => f.debug_tuple("P521").field(key.as_affine()).finish(),
            PublicKey::Rsa(key) => f.debug_tuple("Rsa").field(key).finish(),
        }
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PublicKey::P256(a), PublicKey::P256(b)) => a == b,
            (PublicKey::P384(a), PublicKey::P384(b)) => a == b,
            (PublicKey::P521(a), PublicKey::P521(b)) => a.as_affine() == b.as_affine(),
            (PublicKey::Rsa(a), PublicKey::Rsa(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for PublicKey {}

impl PublicKey {
    /// Verify the `message` and `signature` match this [`PublicKey`]
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<()> {
        match (self, signature) {
            (PublicKey::P256(key), Signature::Ecdsa { digest, der }) => {
                let sig =
                    p256::ecdsa::Signature::from_der(der).map_err(|_| Error::SignatureDecoding)?;
                key.verify_prehash(&digest.digest(message), &sig)
                    .map_err(|_| Error::SignatureVerification)
            }
            (PublicKey::P384(key), Signature::Ecdsa { digest, der }) => {
                let sig =
                    p384::ecdsa::Signature::from_der(der).map_err(|_| Error::SignatureDecoding)?;
                key.verify_prehash(&digest.digest(message), &sig)
                    .map_err(|_| Error::SignatureVerification)
            }
            (PublicKey::P521(key), Signature::Ecdsa { digest, der }) => {
                let sig =
                    p521::ecdsa::Signature::from_der(der).map_err(|_| Error::SignatureDecoding)?;
                key.verify_prehash(&digest.digest(message), &sig)
                    .map_err(|_| Error::SignatureVerification)
            }
            (PublicKey::Rsa(key), Signature::Rsa { digest, bytes }) => {
                let hashed = digest.digest(message);
                key.verify(digest.pkcs1v15(), &hashed, bytes)
                    .map_err(|_| Error::SignatureVerification)
            }
            _ => Err(Error::SignatureVerification),
        }
    }
}

/// Create a [`PublicKey`] from a [`SubjectPublicKeyInfoOwned`]
impl TryFrom<&SubjectPublicKeyInfoOwned> for PublicKey {
    type Error = Error;

    fn try_from(value: &SubjectPublicKeyInfoOwned) -> core::result::Result<Self, Self::Error> {
        let bytes = value
            .subject_public_key
            .as_bytes()
            .ok_or(Error::KeyDecoding)?;
        match value.algorithm.oid {
            OID_EC_PUBLIC_KEY => {
                let curve = value
                    .algorithm
                    .parameters
                    .as_ref()
                    .ok_or(Error::KeyDecoding)?
                    .decode_as::<ObjectIdentifier>()
                    .map_err(|_| Error::KeyDecoding)?;
                match curve {
                    OID_SECP256R1 => {
                        let key = p256::ecdsa::VerifyingKey::from_sec1_bytes(bytes)
                            .map_err(|_| Error::KeyDecoding)?;
                        Ok(PublicKey::P256(key))
                    }
                    OID_SECP384R1 => {
                        let key = p384::ecdsa::VerifyingKey::from_sec1_bytes(bytes)
                            .map_err(|_| Error::KeyDecoding)?;
                        Ok(PublicKey::P384(key))
                    }
                    OID_SECP521R1 => {
                        let key = p521::ecdsa::VerifyingKey::from_sec1_bytes(bytes)
                            .map_err(|_| Error::KeyDecoding)?;
                        Ok(PublicKey::P521(key))
                    }
                    _ => Err(Error::KeyDecoding),
                }
            }
            OID_PKCS1_RSA_ENCRYPTION => {
                let key =
                    rsa::RsaPublicKey::from_pkcs1_der(bytes).map_err(|_| Error::KeyDecoding)?;
                Ok(PublicKey::Rsa(key))
            }
            _ => Err(Error::KeyDecoding),
        }
    }
}

/// Signature used in PKI verification
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Signature {
    /// DER encoded elliptic curve signature.
    ///
    /// The curve is only known once paired with a key, so the DER is decoded
    /// during [`PublicKey::verify`].
    #[allow(missing_docs)]
    Ecdsa { digest: DigestAlgorithm, der: Vec<u8> },
    /// RSA PKCS#1 v1.5 signature
    #[allow(missing_docs)]
    Rsa {
        digest: DigestAlgorithm,
        bytes: Vec<u8>,
    },
}

impl Signature {
    /// Create a [`Signature`] from the `algorithm` and `signature` bytes
    pub fn try_from_algorithm_and_signature(
        algorithm: &AlgorithmIdentifierOwned,
        signature: &[u8],
    ) -> Result<Self> {
        let ecdsa = |digest| Signature::Ecdsa {
            digest,
            der: signature.to_vec(),
        };
        let rsa = |digest| Signature::Rsa {
            digest,
            bytes: signature.to_vec(),
        };
        match algorithm.oid {
            OID_SIG_ECDSA_WITH_SHA256 => Ok(ecdsa(DigestAlgorithm::Sha256)),
            OID_SIG_ECDSA_WITH_SHA384 => Ok(ecdsa(DigestAlgorithm::Sha384)),
            OID_SIG_ECDSA_WITH_SHA512 => Ok(ecdsa(DigestAlgorithm::Sha512)),
            OID_PKCS1_SHA256_WITH_RSA => Ok(rsa(DigestAlgorithm::Sha256)),
            OID_PKCS1_SHA384_WITH_RSA => Ok(rsa(DigestAlgorithm::Sha384)),
            OID_PKCS1_SHA512_WITH_RSA => Ok(rsa(DigestAlgorithm::Sha512)),
            _ => Err(Error::SignatureDecoding),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use der::asn1::BitString;
    use der::Any;
    use p256::ecdsa::signature::hazmat::PrehashSigner;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rsa::pkcs1::EncodeRsaPublicKey;
    use rsa::{RsaPrivateKey, RsaPublicKey};
    use x509_cert::spki::AlgorithmIdentifier;
    use yare::parameterized;

    // Warning one should not copy this size for production code without
    // understanding the security implications.
    // Large enough for a PKCS#1 v1.5 SHA-512 signature while keeping the
    // tests quick.
    const RSA_KEY_BITS: usize = 1024;

    fn ec_subject_public_key(curve: ObjectIdentifier, sec1: &[u8]) -> SubjectPublicKeyInfoOwned {
        SubjectPublicKeyInfoOwned {
            algorithm: AlgorithmIdentifier {
                oid: OID_EC_PUBLIC_KEY,
                parameters: Some(Any::encode_from(&curve).expect("Failed encoding curve")),
            },
            subject_public_key: BitString::from_bytes(sec1).expect("Failed creating bit string"),
        }
    }

    fn rsa_subject_public_key(key: &RsaPublicKey) -> SubjectPublicKeyInfoOwned {
        let der = key.to_pkcs1_der().expect("Failed encoding key");
        SubjectPublicKeyInfoOwned {
            algorithm: AlgorithmIdentifier {
                oid: OID_PKCS1_RSA_ENCRYPTION,
                parameters: None,
            },
            subject_public_key: BitString::from_bytes(der.as_bytes())
                .expect("Failed creating bit string"),
        }
    }

    fn p256_key(seed: u64) -> p256::ecdsa::SigningKey {
        let mut rng = StdRng::seed_from_u64(seed);
        p256::ecdsa::SigningKey::random(&mut rng)
    }

    fn p384_key(seed: u64) -> p384::ecdsa::SigningKey {
        let mut rng = StdRng::seed_from_u64(seed);
        p384::ecdsa::SigningKey::random(&mut rng)
    }

    fn rsa_key(seed: u64) -> RsaPrivateKey {
        let mut rng = StdRng::seed_from_u64(seed);
        RsaPrivateKey::new(&mut rng, RSA_KEY_BITS).expect("failed to generate a key")
    }

    fn p256_signature(
        key: &p256::ecdsa::SigningKey,
        digest: DigestAlgorithm,
        message: &[u8],
    ) -> Signature {
        let sig: p256::ecdsa::Signature = key
            .sign_prehash(&digest.digest(message))
            .expect("failed to sign");
        Signature::Ecdsa {
            digest,
            der: sig.to_der().as_bytes().to_vec(),
        }
    }

    fn rsa_signature(key: &RsaPrivateKey, digest: DigestAlgorithm, message: &[u8]) -> Signature {
        let hashed = digest.digest(message);
        let bytes = key
            .sign(digest.pkcs1v15(), &hashed)
            .expect("failed to sign");
        Signature::Rsa { digest, bytes }
    }

    #[parameterized(
        seed_1 = { 1 },
        seed_2 = { 2 },
        seed_3 = { 3 },
    )]
    fn p256_key_from_subject_public_key(seed: u64) {
        let verifying_key = *p256_key(seed).verifying_key();
        let point = verifying_key.to_encoded_point(false);
        let subject_public_key = ec_subject_public_key(OID_SECP256R1, point.as_bytes());

        assert_eq!(
            PublicKey::try_from(&subject_public_key),
            Ok(PublicKey::P256(verifying_key))
        );
    }

    #[test]
    fn p384_key_from_subject_public_key() {
        let verifying_key = *p384_key(1).verifying_key();
        let point = verifying_key.to_encoded_point(true);
        let subject_public_key = ec_subject_public_key(OID_SECP384R1, point.as_bytes());

        assert_eq!(
            PublicKey::try_from(&subject_public_key),
            Ok(PublicKey::P384(verifying_key))
        );
    }

    #[test]
    fn ec_key_with_mismatched_curve_fails() {
        let verifying_key = *p256_key(1).verifying_key();
        let point = verifying_key.to_encoded_point(false);
        let subject_public_key = ec_subject_public_key(OID_SECP384R1, point.as_bytes());

        assert_eq!(
            PublicKey::try_from(&subject_public_key),
            Err(Error::KeyDecoding)
        );
    }

    #[test]
    fn ec_key_with_unsupported_curve_fails() {
        let verifying_key = *p256_key(1).verifying_key();
        let point = verifying_key.to_encoded_point(false);
        // secp256k1
        let curve = ObjectIdentifier::new_unwrap("1.3.132.0.10");
        let subject_public_key = ec_subject_public_key(curve, point.as_bytes());

        assert_eq!(
            PublicKey::try_from(&subject_public_key),
            Err(Error::KeyDecoding)
        );
    }

    #[test]
    fn ec_key_without_curve_fails() {
        let verifying_key = *p256_key(1).verifying_key();
        let point = verifying_key.to_encoded_point(false);
        let mut subject_public_key = ec_subject_public_key(OID_SECP256R1, point.as_bytes());
        subject_public_key.algorithm.parameters = None;

        assert_eq!(
            PublicKey::try_from(&subject_public_key),
            Err(Error::KeyDecoding)
        );
    }

    #[test]
    fn ecdsa_key_with_invalid_bytes_fails() {
        let verifying_key = *p256_key(1).verifying_key();
        let mut bytes = verifying_key.to_encoded_point(false).as_bytes().to_vec();

        // The first byte is a tag for SEC1. Changing it's value will cause a
        // decoding error.
        bytes[0] -= 1;

        let subject_public_key = ec_subject_public_key(OID_SECP256R1, &bytes);
        assert_eq!(
            PublicKey::try_from(&subject_public_key),
            Err(Error::KeyDecoding)
        );
    }

    #[test]
    fn rsa_key_from_subject_public_key() {
        let verifying_key = RsaPublicKey::from(&rsa_key(1));
        let subject_public_key = rsa_subject_public_key(&verifying_key);

        assert_eq!(
            PublicKey::try_from(&subject_public_key),
            Ok(PublicKey::Rsa(verifying_key))
        );
    }

    #[test]
    fn key_from_unsupported_oid_fails() {
        let verifying_key = RsaPublicKey::from(&rsa_key(1));
        let mut subject_public_key = rsa_subject_public_key(&verifying_key);

        subject_public_key.algorithm = AlgorithmIdentifier {
            oid: ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.2"),
            parameters: None,
        };

        assert_eq!(
            PublicKey::try_from(&subject_public_key),
            Err(Error::KeyDecoding)
        );
    }

    #[parameterized(
        sha256 = { DigestAlgorithm::Sha256 },
        sha384 = { DigestAlgorithm::Sha384 },
        sha512 = { DigestAlgorithm::Sha512 },
    )]
    fn p256_verify(digest: DigestAlgorithm) {
        let signing_key = p256_key(1);
        let public_key = PublicKey::P256(*signing_key.verifying_key());
        let message = b"Hello, world!";
        let signature = p256_signature(&signing_key, digest, message);

        assert_eq!(public_key.verify(message, &signature), Ok(()));
    }

    #[parameterized(
        seed_1 = { 1 },
        seed_2 = { 2 },
        seed_3 = { 3 },
    )]
    fn p384_verify(seed: u64) {
        let signing_key = p384_key(seed);
        let public_key = PublicKey::P384(*signing_key.verifying_key());
        let message = b"Hello, world!";
        let digest = DigestAlgorithm::Sha384;
        let sig: p384::ecdsa::Signature = signing_key
            .sign_prehash(&digest.digest(message))
            .expect("failed to sign");
        let signature = Signature::Ecdsa {
            digest,
            der: sig.to_der().as_bytes().to_vec(),
        };

        assert_eq!(public_key.verify(message, &signature), Ok(()));
    }

    #[test]
    fn ecdsa_wrong_message_fails() {
        let signing_key = p256_key(0);
        let public_key = PublicKey::P256(*signing_key.verifying_key());
        let signature = p256_signature(&signing_key, DigestAlgorithm::Sha256, b"Hello, world!");

        // Note the missing `!` at the end of the message
        assert_eq!(
            public_key.verify(b"Hello, world", &signature),
            Err(Error::SignatureVerification)
        );
    }

    #[test]
    fn ecdsa_wrong_digest_fails() {
        let signing_key = p256_key(0);
        let public_key = PublicKey::P256(*signing_key.verifying_key());
        let message = b"Hello, world!";
        let mut signature = p256_signature(&signing_key, DigestAlgorithm::Sha256, message);
        if let Signature::Ecdsa { digest, .. } = &mut signature {
            *digest = DigestAlgorithm::Sha512;
        }

        assert_eq!(
            public_key.verify(message, &signature),
            Err(Error::SignatureVerification)
        );
    }

    #[test]
    fn ecdsa_signature_on_wrong_curve_fails() {
        let public_key = PublicKey::P384(*p384_key(0).verifying_key());
        let message = b"Hello, world!";
        let signature = p256_signature(&p256_key(0), DigestAlgorithm::Sha256, message);

        assert_eq!(
            public_key.verify(message, &signature),
            Err(Error::SignatureVerification)
        );
    }

    #[test]
    fn fail_to_decode_ecdsa_signature() {
        let signing_key = p256_key(1);
        let public_key = PublicKey::P256(*signing_key.verifying_key());
        let message = b"Goodbye, moon!";
        let mut signature = p256_signature(&signing_key, DigestAlgorithm::Sha256, message);

        // First byte is a DER tag byte changing will cause a decoding error.
        if let Signature::Ecdsa { der, .. } = &mut signature {
            der[0] += 1;
        }

        assert_eq!(
            public_key.verify(message, &signature),
            Err(Error::SignatureDecoding)
        );
    }

    #[test]
    fn ecdsa_wrong_signature_kind_fails() {
        let public_key = PublicKey::P256(*p256_key(0).verifying_key());
        let message = b"Hello, world!";
        let signature = rsa_signature(&rsa_key(0), DigestAlgorithm::Sha256, message);

        assert_eq!(
            public_key.verify(message, &signature),
            Err(Error::SignatureVerification)
        );
    }

    #[parameterized(
        sha256 = { DigestAlgorithm::Sha256 },
        sha384 = { DigestAlgorithm::Sha384 },
        sha512 = { DigestAlgorithm::Sha512 },
    )]
    fn rsa_verify(digest: DigestAlgorithm) {
        let signing_key = rsa_key(1);
        let public_key = PublicKey::Rsa(RsaPublicKey::from(&signing_key));
        let message = b"Hello, world!";
        let signature = rsa_signature(&signing_key, digest, message);

        assert_eq!(public_key.verify(message, &signature), Ok(()));
    }

    #[test]
    fn rsa_wrong_signature_fails() {
        let signing_key = rsa_key(0);
        let public_key = PublicKey::Rsa(RsaPublicKey::from(&signing_key));
        let signature = rsa_signature(&signing_key, DigestAlgorithm::Sha256, b"Hello, world!");

        // Note the lower case 'h' in "hello, world!"
        assert_eq!(
            public_key.verify(b"hello, world!", &signature),
            Err(Error::SignatureVerification)
        );
    }

    #[test]
    fn rsa_wrong_signature_kind_fails() {
        let public_key = PublicKey::Rsa(RsaPublicKey::from(&rsa_key(0)));
        let message = b"Hello, world!";
        let signature = p256_signature(&p256_key(0), DigestAlgorithm::Sha256, message);

        assert_eq!(
            public_key.verify(message, &signature),
            Err(Error::SignatureVerification)
        );
    }

    #[parameterized(
        ecdsa_sha256 = { OID_SIG_ECDSA_WITH_SHA256, true, DigestAlgorithm::Sha256 },
        ecdsa_sha384 = { OID_SIG_ECDSA_WITH_SHA384, true, DigestAlgorithm::Sha384 },
        ecdsa_sha512 = { OID_SIG_ECDSA_WITH_SHA512, true, DigestAlgorithm::Sha512 },
        rsa_sha256 = { OID_PKCS1_SHA256_WITH_RSA, false, DigestAlgorithm::Sha256 },
        rsa_sha384 = { OID_PKCS1_SHA384_WITH_RSA, false, DigestAlgorithm::Sha384 },
        rsa_sha512 = { OID_PKCS1_SHA512_WITH_RSA, false, DigestAlgorithm::Sha512 },
    )]
    fn signature_from_algorithm_and_bytes(
        oid: ObjectIdentifier,
        ecdsa: bool,
        digest: DigestAlgorithm,
    ) {
        let algorithm = AlgorithmIdentifierOwned {
            oid,
            parameters: None,
        };
        let bytes = [1, 2, 3];
        let expected = if ecdsa {
            Signature::Ecdsa {
                digest,
                der: bytes.to_vec(),
            }
        } else {
            Signature::Rsa {
                digest,
                bytes: bytes.to_vec(),
            }
        };

        assert_eq!(
            Signature::try_from_algorithm_and_signature(&algorithm, &bytes),
            Ok(expected)
        );
    }

    #[test]
    fn signature_with_unknown_algorithm_fails() {
        // dsa-with-sha256
        let algorithm = AlgorithmIdentifierOwned {
            oid: ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.3.2"),
            parameters: None,
        };
        assert_eq!(
            Signature::try_from_algorithm_and_signature(&algorithm, &[0; 8]),
            Err(Error::SignatureDecoding)
        );
    }
}
