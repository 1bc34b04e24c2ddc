//! Hash-name generation.
//!
//! This module provides:
//! - The closed set of digest algorithms ([`DigestAlgorithm`])
//! - Per-algorithm digest capability objects ([`Digester`])
//! - Composition of a hash string with the original extension under a
//!   suffix policy ([`NamingPolicy`], [`compose_name`])
//!
//! The *filename string* is hashed, never the file contents. That keeps the
//! transform deterministic and cheap, but it means two distinct files that
//! share a basename produce the same hash name under a given algorithm; a
//! copy run funneling both into one destination directory overwrites one
//! with the other's bytes.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use blake2::{Blake2b512, Blake2s256};
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Sha3_224, Sha3_256, Sha3_384, Sha3_512, Shake128, Shake256};

use crate::error::EngineError;

/// Output length read from the extendable-output algorithms.
///
/// `shake_128`/`shake_256` have no natural digest length; they are read at
/// a fixed 32 bytes (64 hex characters).
const XOF_OUTPUT_LEN: usize = 32;

/// Supported digest algorithms.
///
/// This is a closed set: every token accepted on the configuration surface
/// maps to exactly one variant, and anything else is rejected up front
/// before any file is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Blake2b,
    Blake2s,
    Md5,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Shake128,
    Shake256,
}

impl DigestAlgorithm {
    /// Every supported algorithm, in canonical listing order.
    pub const ALL: [DigestAlgorithm; 14] = [
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Blake2b,
        Self::Blake2s,
        Self::Md5,
        Self::Sha3_224,
        Self::Sha3_256,
        Self::Sha3_384,
        Self::Sha3_512,
        Self::Shake128,
        Self::Shake256,
    ];

    /// Canonical token for this algorithm, as used on the command line and
    /// as the report column name.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Blake2b => "blake2b",
            Self::Blake2s => "blake2s",
            Self::Md5 => "md5",
            Self::Sha3_224 => "sha3_224",
            Self::Sha3_256 => "sha3_256",
            Self::Sha3_384 => "sha3_384",
            Self::Sha3_512 => "sha3_512",
            Self::Shake128 => "shake_128",
            Self::Shake256 => "shake_256",
        }
    }

    /// The capability object that computes digests for this algorithm.
    pub fn digester(&self) -> Box<dyn Digester> {
        match self {
            Self::Sha1 => Box::new(FixedDigester::<Sha1>::default()),
            Self::Sha224 => Box::new(FixedDigester::<Sha224>::default()),
            Self::Sha256 => Box::new(FixedDigester::<Sha256>::default()),
            Self::Sha384 => Box::new(FixedDigester::<Sha384>::default()),
            Self::Sha512 => Box::new(FixedDigester::<Sha512>::default()),
            Self::Blake2b => Box::new(FixedDigester::<Blake2b512>::default()),
            Self::Blake2s => Box::new(FixedDigester::<Blake2s256>::default()),
            Self::Md5 => Box::new(Md5Digester),
            Self::Sha3_224 => Box::new(FixedDigester::<Sha3_224>::default()),
            Self::Sha3_256 => Box::new(FixedDigester::<Sha3_256>::default()),
            Self::Sha3_384 => Box::new(FixedDigester::<Sha3_384>::default()),
            Self::Sha3_512 => Box::new(FixedDigester::<Sha3_512>::default()),
            Self::Shake128 => Box::new(XofDigester::<Shake128>::default()),
            Self::Shake256 => Box::new(XofDigester::<Shake256>::default()),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|algo| algo.token() == token)
            .ok_or(EngineError::UnsupportedAlgorithm { token })
    }
}

/// Comma-separated list of every supported token, for error messages.
pub fn supported_tokens() -> String {
    DigestAlgorithm::ALL
        .iter()
        .map(|algo| algo.token())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Trait for computing a digest in one shot.
pub trait Digester {
    /// Digest the input and return the raw digest bytes.
    fn digest(&self, data: &[u8]) -> Vec<u8>;
}

/// Digester for the fixed-output RustCrypto algorithms.
struct FixedDigester<D>(PhantomData<D>);

impl<D> Default for FixedDigester<D> {
    fn default() -> Self {
        FixedDigester(PhantomData)
    }
}

impl<D: Digest> Digester for FixedDigester<D> {
    fn digest(&self, data: &[u8]) -> Vec<u8> {
        D::digest(data).to_vec()
    }
}

/// MD5 digester (backed by the md5 crate).
struct Md5Digester;

impl Digester for Md5Digester {
    fn digest(&self, data: &[u8]) -> Vec<u8> {
        md5::compute(data).0.to_vec()
    }
}

/// Digester for the extendable-output algorithms, read at [`XOF_OUTPUT_LEN`].
struct XofDigester<D>(PhantomData<D>);

impl<D> Default for XofDigester<D> {
    fn default() -> Self {
        XofDigester(PhantomData)
    }
}

impl<D: Default + Update + ExtendableOutput> Digester for XofDigester<D> {
    fn digest(&self, data: &[u8]) -> Vec<u8> {
        let mut hasher = D::default();
        hasher.update(data);
        let mut out = vec![0u8; XOF_OUTPUT_LEN];
        hasher.finalize_xof().read(&mut out);
        out
    }
}

/// Compute the lowercase hex digest of a filename string.
///
/// The UTF-8 bytes of `name` are digested; file contents are never read.
pub fn hash_of(name: &str, algorithm: DigestAlgorithm) -> String {
    hex::encode(algorithm.digester().digest(name.as_bytes()))
}

/// How a computed hash string is merged with the original file extension.
///
/// `strip_extension` beats everything; with no flag set the original
/// extension is kept; `extension_tag` replaces the extension with the
/// algorithm token; `prefix_tag` puts the token in front of the hash and
/// combines with `extension_tag` when both are set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NamingPolicy {
    /// Drop the original extension entirely
    pub strip_extension: bool,
    /// Replace the original extension with the algorithm token
    pub extension_tag: bool,
    /// Prefix the hash with the algorithm token
    pub prefix_tag: bool,
}

/// Merge a hash string with suffix metadata under a composition policy.
pub fn compose_name(
    hash_hex: &str,
    original_suffix: &str,
    algorithm: DigestAlgorithm,
    policy: NamingPolicy,
) -> String {
    if policy.strip_extension {
        return hash_hex.to_string();
    }
    match (policy.prefix_tag, policy.extension_tag) {
        (false, false) => format!("{}{}", hash_hex, original_suffix),
        (false, true) => format!("{}.{}", hash_hex, algorithm),
        (true, false) => format!("{}-{}", algorithm, hash_hex),
        (true, true) => format!("{}-{}.{}", algorithm, hash_hex, algorithm),
    }
}

/// Name codec: computes hash-derived filenames under a fixed policy.
///
/// One instance is built per run from the configuration flags and injected
/// into the hashing stage.
#[derive(Debug, Clone, Copy)]
pub struct HashNamer {
    policy: NamingPolicy,
}

impl HashNamer {
    /// Create a codec with the given composition policy.
    pub fn new(policy: NamingPolicy) -> Self {
        HashNamer { policy }
    }

    /// The composition policy in effect.
    pub fn policy(&self) -> NamingPolicy {
        self.policy
    }

    /// Full hash-derived filename for one (filename, algorithm) pair.
    pub fn hash_name(&self, filename: &str, suffix: &str, algorithm: DigestAlgorithm) -> String {
        compose_name(&hash_of(filename, algorithm), suffix, algorithm, self.policy)
    }
}
