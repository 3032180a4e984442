use digest::Digest;
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Verification failed: expected {}, got {}",
        hex::encode(.expected),
        hex::encode(.actual)
    )]
    VerificationFailed { expected: Vec<u8>, actual: Vec<u8> },

    #[error("Invalid {algorithm} digest {value:?}: {reason}")]
    InvalidDigest {
        algorithm: DigestAlgorithm,
        value: String,
        reason: String,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    Md5,
    Sha1,
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    /// Length of the raw digest in bytes.
    pub fn output_len(self) -> usize {
        match self {
            DigestAlgorithm::Md5 => 16,
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha384 => 48,
            DigestAlgorithm::Sha512 => 64,
        }
    }

    pub fn decode_hex(self, value: &str) -> Result<Vec<u8>, VerificationError> {
        let invalid = |reason: String| VerificationError::InvalidDigest {
            algorithm: self,
            value: value.to_string(),
            reason,
        };
        let bytes = hex::decode(value.trim()).map_err(|e| invalid(e.to_string()))?;
        if bytes.len() != self.output_len() {
            return Err(invalid(format!(
                "expected {} bytes, got {}",
                self.output_len(),
                bytes.len()
            )));
        }
        Ok(bytes)
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DigestAlgorithm::Md5 => "md5",
            DigestAlgorithm::Sha1 => "sha1",
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Sha384 => "sha384",
            DigestAlgorithm::Sha512 => "sha512",
        };
        f.write_str(name)
    }
}

/// Incremental hasher over one of the supported algorithms.
pub enum ContentDigestHasher {
    Sha1(Sha1),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
    Md5(Md5),
}

impl ContentDigestHasher {
    #[inline]
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        match algorithm {
            DigestAlgorithm::Md5 => ContentDigestHasher::Md5(Md5::new()),
            DigestAlgorithm::Sha1 => ContentDigestHasher::Sha1(Sha1::new()),
            DigestAlgorithm::Sha256 => ContentDigestHasher::Sha256(Sha256::new()),
            DigestAlgorithm::Sha384 => ContentDigestHasher::Sha384(Sha384::new()),
            DigestAlgorithm::Sha512 => ContentDigestHasher::Sha512(Sha512::new()),
        }
    }

    #[inline]
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        match self {
            ContentDigestHasher::Sha1(digest) => Digest::update(digest, data.as_ref()),
            ContentDigestHasher::Sha256(digest) => Digest::update(digest, data.as_ref()),
            ContentDigestHasher::Sha384(digest) => Digest::update(digest, data.as_ref()),
            ContentDigestHasher::Sha512(digest) => Digest::update(digest, data.as_ref()),
            ContentDigestHasher::Md5(digest) => Digest::update(digest, data.as_ref()),
        };
    }

    pub fn finalize(self) -> Vec<u8> {
        match self {
            ContentDigestHasher::Sha1(digest) => digest.finalize().to_vec(),
            ContentDigestHasher::Sha256(digest) => digest.finalize().to_vec(),
            ContentDigestHasher::Sha384(digest) => digest.finalize().to_vec(),
            ContentDigestHasher::Sha512(digest) => digest.finalize().to_vec(),
            ContentDigestHasher::Md5(digest) => digest.finalize().to_vec(),
        }
    }

    pub fn finalize_hex(self) -> String {
        hex::encode(self.finalize())
    }
}

pub struct ContentDigestVerifier {
    hasher: ContentDigestHasher,
    expected_digest: Vec<u8>,
}

impl ContentDigestVerifier {
    #[inline]
    pub fn new(algorithm: DigestAlgorithm, expected_digest: Vec<u8>) -> Self {
        Self {
            hasher: ContentDigestHasher::new(algorithm),
            expected_digest,
        }
    }

    pub fn from_hex(algorithm: DigestAlgorithm, expected: &str) -> Result<Self, VerificationError> {
        Ok(Self::new(algorithm, algorithm.decode_hex(expected)?))
    }

    #[inline]
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        self.hasher.update(data);
    }

    /// Finishes hashing and returns the actual digest as hex when it matches.
    pub fn verify(self) -> Result<String, VerificationError> {
        let actual_digest = self.hasher.finalize();

        if actual_digest == self.expected_digest {
            Ok(hex::encode(actual_digest))
        } else {
            Err(VerificationError::VerificationFailed {
                expected: self.expected_digest,
                actual: actual_digest,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::IntoDeserializer;

    const FAKE_CONTENT_SHA256: &str =
        "98b1ae45059b004178a8eee0c1f6179dcea139c0fd8a69ee47a6f02d97af1f17";

    #[test]
    fn test_hasher_matches_known_digests() {
        let cases = [
            (
                DigestAlgorithm::Md5,
                "3d8b639a5cd4967496a67a327719b7ae",
            ),
            (
                DigestAlgorithm::Sha1,
                "b1dcc9c7b4e2a4429be6de9caf72ec33cf56b9aa",
            ),
            (DigestAlgorithm::Sha256, FAKE_CONTENT_SHA256),
        ];

        for (algorithm, expected) in cases {
            let mut hasher = ContentDigestHasher::new(algorithm);
            hasher.update(b"fake content");
            assert_eq!(hasher.finalize_hex(), expected, "{algorithm}");
        }
    }

    #[test]
    fn test_incremental_updates_match_single_update() {
        let mut split = ContentDigestHasher::new(DigestAlgorithm::Sha512);
        split.update(b"fake ");
        split.update(b"content");

        let mut whole = ContentDigestHasher::new(DigestAlgorithm::Sha512);
        whole.update(b"fake content");

        assert_eq!(split.finalize(), whole.finalize());
    }

    #[test]
    fn test_verifier_accepts_matching_digest() {
        let mut verifier =
            ContentDigestVerifier::from_hex(DigestAlgorithm::Sha256, FAKE_CONTENT_SHA256).unwrap();
        verifier.update(b"fake content");
        assert_eq!(verifier.verify().unwrap(), FAKE_CONTENT_SHA256);
    }

    #[test]
    fn test_verifier_rejects_mismatched_digest() {
        let mut verifier =
            ContentDigestVerifier::from_hex(DigestAlgorithm::Sha256, FAKE_CONTENT_SHA256).unwrap();
        verifier.update(b"other content");

        let err = verifier.verify().unwrap_err();
        assert!(matches!(err, VerificationError::VerificationFailed { .. }));
        assert!(err.to_string().contains(FAKE_CONTENT_SHA256));
    }

    #[test]
    fn test_decode_hex_rejects_wrong_length_and_garbage() {
        assert!(matches!(
            DigestAlgorithm::Sha256.decode_hex("3d8b639a5cd4967496a67a327719b7ae"),
            Err(VerificationError::InvalidDigest { .. })
        ));
        assert!(matches!(
            DigestAlgorithm::Md5.decode_hex("not hex at all"),
            Err(VerificationError::InvalidDigest { .. })
        ));
    }

    #[test]
    fn test_algorithm_display_matches_serde_name() {
        for algorithm in [
            DigestAlgorithm::Md5,
            DigestAlgorithm::Sha1,
            DigestAlgorithm::Sha256,
            DigestAlgorithm::Sha384,
            DigestAlgorithm::Sha512,
        ] {
            let name = algorithm.to_string();
            let deserializer: serde::de::value::StrDeserializer<'_, serde::de::value::Error> =
                name.as_str().into_deserializer();
            assert_eq!(DigestAlgorithm::deserialize(deserializer).unwrap(), algorithm);
        }
    }
}
