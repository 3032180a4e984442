pub mod content_digest_hasher;
mod file_digest;

pub use content_digest_hasher::{
    ContentDigestHasher, ContentDigestVerifier, DigestAlgorithm, VerificationError,
};
pub use file_digest::{DIGEST_BLOCK_SIZE, bytes_digest, file_digest, verify_file_digest};
