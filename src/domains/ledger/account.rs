//! Algorand accounts: addresses, 25-word mnemonics and ed25519 signing keys.

use std::fmt;

use bip39::Language;
use data_encoding::BASE32_NOPAD;
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use sha2::{Digest, Sha512_256};

use super::LedgerError;

/// Length of an encoded address.
pub const ADDRESS_LENGTH: usize = 58;

/// Words in an account mnemonic, checksum word included.
pub const MNEMONIC_WORDS: usize = 25;

const CHECKSUM_LENGTH: usize = 4;

/// SHA-512/256 digest, the hash used throughout the protocol.
pub(crate) fn sha512_256(data: &[u8]) -> [u8; 32] {
    Sha512_256::digest(data).into()
}

/// Encode a public key as a 58-character address.
pub fn encode_address(public_key: &[u8; 32]) -> String {
    let digest = sha512_256(public_key);
    let mut raw = Vec::with_capacity(32 + CHECKSUM_LENGTH);
    raw.extend_from_slice(public_key);
    raw.extend_from_slice(&digest[32 - CHECKSUM_LENGTH..]);
    BASE32_NOPAD.encode(&raw)
}

/// Decode an address into its public key, verifying the checksum.
pub fn decode_address(address: &str) -> Result<[u8; 32], LedgerError> {
    let invalid = || LedgerError::InvalidAddress(address.to_string());
    if address.len() != ADDRESS_LENGTH {
        return Err(invalid());
    }
    let raw = BASE32_NOPAD
        .decode(address.as_bytes())
        .map_err(|_| invalid())?;
    let (key, checksum) = raw.split_at(32);
    let key: [u8; 32] = key.try_into().map_err(|_| invalid())?;
    if sha512_256(&key)[32 - CHECKSUM_LENGTH..] != *checksum {
        return Err(invalid());
    }
    Ok(key)
}

// ============================================================================
// Mnemonics
// ============================================================================

/// Pack bytes into little-endian 11-bit groups.
fn to_u11(bytes: &[u8]) -> Vec<u16> {
    let mut out = Vec::with_capacity(bytes.len() * 8 / 11 + 1);
    let mut acc: u32 = 0;
    let mut bits = 0;
    for byte in bytes {
        acc |= u32::from(*byte) << bits;
        bits += 8;
        if bits >= 11 {
            out.push((acc & 0x7ff) as u16);
            acc >>= 11;
            bits -= 11;
        }
    }
    if bits > 0 {
        out.push(acc as u16);
    }
    out
}

/// Inverse of [`to_u11`].
fn from_u11(groups: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(groups.len() * 11 / 8 + 1);
    let mut acc: u32 = 0;
    let mut bits = 0;
    for group in groups {
        acc |= u32::from(*group) << bits;
        bits += 11;
        while bits >= 8 {
            out.push((acc & 0xff) as u8);
            acc >>= 8;
            bits -= 8;
        }
    }
    if bits > 0 {
        out.push(acc as u8);
    }
    out
}

fn checksum_word(seed: &[u8; 32]) -> u16 {
    let digest = sha512_256(seed);
    to_u11(&digest[..2])[0]
}

/// The 25-word mnemonic of a 32-byte seed.
pub fn mnemonic_from_seed(seed: &[u8; 32]) -> String {
    let words = Language::English.word_list();
    let mut indexes = to_u11(seed);
    indexes.push(checksum_word(seed));
    indexes
        .iter()
        .map(|i| words[usize::from(*i)])
        .collect::<Vec<_>>()
        .join(" ")
}

/// Recover the 32-byte seed from a 25-word mnemonic.
pub fn seed_from_mnemonic(mnemonic: &str) -> Result<[u8; 32], LedgerError> {
    let words: Vec<String> = mnemonic
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    if words.len() != MNEMONIC_WORDS {
        return Err(LedgerError::InvalidMnemonic(format!(
            "expected {} words, got {}",
            MNEMONIC_WORDS,
            words.len()
        )));
    }

    let indexes = words
        .iter()
        .map(|w| {
            Language::English
                .find_word(w)
                .ok_or_else(|| LedgerError::InvalidMnemonic(format!("unknown word '{}'", w)))
        })
        .collect::<Result<Vec<u16>, _>>()?;

    let (key_words, checksum) = indexes.split_at(MNEMONIC_WORDS - 1);
    let mut bytes = from_u11(key_words);
    if bytes.len() != 33 || bytes[32] != 0 {
        return Err(LedgerError::InvalidMnemonic("malformed key words".into()));
    }
    bytes.truncate(32);
    let seed: [u8; 32] = bytes
        .try_into()
        .map_err(|_| LedgerError::InvalidMnemonic("malformed key words".into()))?;

    if checksum_word(&seed) != checksum[0] {
        return Err(LedgerError::InvalidMnemonic("checksum mismatch".into()));
    }
    Ok(seed)
}

// ============================================================================
// Signing accounts
// ============================================================================

/// An account whose private key this process holds.
pub struct SigningAccount {
    key: SigningKey,
    address: String,
}

impl SigningAccount {
    /// A fresh random account.
    pub fn generate() -> Self {
        Self::from_key(SigningKey::generate(&mut OsRng))
    }

    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self::from_key(SigningKey::from_bytes(seed))
    }

    pub fn from_mnemonic(mnemonic: &str) -> Result<Self, LedgerError> {
        Ok(Self::from_seed(&seed_from_mnemonic(mnemonic)?))
    }

    fn from_key(key: SigningKey) -> Self {
        let address = encode_address(&key.verifying_key().to_bytes());
        Self { key, address }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.key.verifying_key().to_bytes()
    }

    pub fn mnemonic(&self) -> String {
        mnemonic_from_seed(&self.key.to_bytes())
    }

    /// Raw ed25519 signature over `message`.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.key.sign(message).to_bytes()
    }
}

impl fmt::Debug for SigningAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningAccount")
            .field("address", &self.address)
            .field("key", &"<redacted>")
            .finish()
    }
}
