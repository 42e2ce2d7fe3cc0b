//! Keypair generation and address handling
//!
//! Provides ed25519 keypair generation, base58 address encoding and
//! validation, and reconstruction of a signing keypair from the 64-byte
//! secret stored in the wallet file.

use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use std::fmt;
use std::str::FromStr;

/// Length of a public key / address in bytes
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Length of the stored secret: 32-byte seed followed by the 32-byte public key
pub const SECRET_KEY_LENGTH: usize = 64;

/// Length of an ed25519 signature in bytes
pub const SIGNATURE_LENGTH: usize = 64;

/// Key and address errors
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("Invalid address '{0}': expected a base58-encoded 32-byte public key")]
    InvalidAddress(String),

    #[error("Invalid secret key length: expected {expected} bytes, got {actual}")]
    InvalidSecretLength { expected: usize, actual: usize },

    #[error("Address {0} is reserved and cannot receive transfers")]
    ReservedAddress(String),

    #[error("Corrupted key material: {0}")]
    Corrupted(String),
}

/// Public account address (ed25519 public key)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; PUBLIC_KEY_LENGTH]);

impl Address {
    pub const fn from_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    /// Base58 form used by wallets and RPC
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }
}

impl FromStr for Address {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = bs58::decode(s.trim())
            .into_vec()
            .map_err(|_| KeyError::InvalidAddress(s.to_string()))?;
        let bytes: [u8; PUBLIC_KEY_LENGTH] = decoded
            .try_into()
            .map_err(|_| KeyError::InvalidAddress(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_base58())
    }
}

/// Validate that a string is a well-formed address
pub fn validate_address(address: &str) -> Result<Address, KeyError> {
    address.parse()
}

/// Raw secret key material as stored in the wallet file
///
/// The `Debug` impl never prints the bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKeyBytes(Vec<u8>);

impl SecretKeyBytes {
    /// Wrap secret bytes, rejecting anything that is not exactly 64 bytes
    pub fn new(bytes: Vec<u8>) -> Result<Self, KeyError> {
        if bytes.len() != SECRET_KEY_LENGTH {
            return Err(KeyError::InvalidSecretLength {
                expected: SECRET_KEY_LENGTH,
                actual: bytes.len(),
            });
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Public key half embedded in the secret
    pub fn embedded_address(&self) -> Address {
        let mut public = [0u8; PUBLIC_KEY_LENGTH];
        public.copy_from_slice(&self.0[PUBLIC_KEY_LENGTH..]);
        Address(public)
    }
}

impl fmt::Debug for SecretKeyBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKeyBytes([REDACTED; {}])", self.0.len())
    }
}

/// Signing keypair
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a fresh keypair from the OS random source
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Rebuild a keypair from a 64-byte secret
    ///
    /// Fails if the public half does not match the key derived from the seed.
    pub fn from_secret(secret: &SecretKeyBytes) -> Result<Self, KeyError> {
        let bytes: &[u8; SECRET_KEY_LENGTH] = secret.as_bytes().try_into().map_err(|_| {
            KeyError::InvalidSecretLength {
                expected: SECRET_KEY_LENGTH,
                actual: secret.as_bytes().len(),
            }
        })?;
        let signing_key = SigningKey::from_keypair_bytes(bytes)
            .map_err(|e| KeyError::Corrupted(e.to_string()))?;
        Ok(Self { signing_key })
    }

    pub fn address(&self) -> Address {
        Address(self.signing_key.verifying_key().to_bytes())
    }

    /// Secret bytes in wallet file layout (seed || public key)
    pub fn secret_bytes(&self) -> SecretKeyBytes {
        SecretKeyBytes(self.signing_key.to_keypair_bytes().to_vec())
    }

    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LENGTH] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}
