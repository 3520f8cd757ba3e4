//! Commitment and Salt for commit-reveal scheme.

use crate::error::RegistryError;
use rand::RngCore;
use rps_ledger::Address;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Secret salt mixed into a commitment. Never empty: an unsalted
/// commitment can be opened by hashing each of the three moves.
#[derive(Clone, PartialEq, Eq)]
pub struct Salt(Vec<u8>);

impl Salt {
    /// Create a new random 32-byte salt
    pub fn random() -> Self {
        let mut bytes = vec![0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Wrap caller-chosen bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, RegistryError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(RegistryError::EmptySalt);
        }
        Ok(Self(bytes))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&str> for Salt {
    type Error = RegistryError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.0.len().min(8);
        write!(f, "Salt({})", hex::encode(&self.0[..n]))
    }
}

impl Serialize for Salt {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        hex::encode(&self.0).serialize(s)
    }
}

impl<'de> Deserialize<'de> for Salt {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let hex_str = String::deserialize(d)?;
        let hex_str = hex_str.strip_prefix("0x").unwrap_or(&hex_str);
        let bytes = hex::decode(hex_str).map_err(serde::de::Error::custom)?;
        Self::new(bytes).map_err(serde::de::Error::custom)
    }
}

/// How a commitment digest is derived from a move.
///
/// Fixed for the lifetime of a registry: switching schemes strands every
/// commitment made under the old one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitmentScheme {
    /// H(move || salt)
    MoveAndSalt,
    /// H(player || move || salt)
    #[default]
    BoundToPlayer,
}

impl CommitmentScheme {
    /// Compute the commitment `player` would have published for this move
    pub fn commit(&self, move_bytes: &[u8], salt: &Salt, player: &Address) -> Commitment {
        match self {
            CommitmentScheme::MoveAndSalt => Commitment::new(move_bytes, salt),
            CommitmentScheme::BoundToPlayer => Commitment::bound(player, move_bytes, salt),
        }
    }

    /// Verify a reveal against a stored commitment
    pub fn verify(
        &self,
        commitment: &Commitment,
        move_bytes: &[u8],
        salt: &Salt,
        player: &Address,
    ) -> bool {
        *commitment == self.commit(move_bytes, salt, player)
    }
}

impl FromStr for CommitmentScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "move_and_salt" => Ok(CommitmentScheme::MoveAndSalt),
            "bound_to_player" => Ok(CommitmentScheme::BoundToPlayer),
            other => Err(format!("unknown commitment scheme: {}", other)),
        }
    }
}

/// Errors parsing a commitment from hex
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommitmentParseError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// Commitment = SHA256 digest over the move and salt
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Commitment([u8; 32]);

impl Commitment {
    /// Create a commitment from move bytes and salt
    pub fn new(move_bytes: &[u8], salt: &Salt) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(move_bytes);
        hasher.update(salt.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Create a commitment bound to the committing player
    pub fn bound(player: &Address, move_bytes: &[u8], salt: &Salt) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(player.as_bytes());
        hasher.update(move_bytes);
        hasher.update(salt.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for Commitment {
    type Err = CommitmentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| CommitmentParseError::InvalidHex(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| CommitmentParseError::InvalidLength(bytes.len()))?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for Commitment {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.to_string().serialize(s)
    }
}

impl<'de> Deserialize<'de> for Commitment {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Address {
        Address::from_bytes([1; 20])
    }

    fn bob() -> Address {
        Address::from_bytes([2; 20])
    }

    #[test]
    fn test_commitment_verification() {
        let salt = Salt::random();
        let commitment = Commitment::new(&[0], &salt);

        assert!(CommitmentScheme::MoveAndSalt.verify(&commitment, &[0], &salt, &alice()));
    }

    #[test]
    fn test_different_moves_different_commitments() {
        let salt = Salt::new("pass").unwrap();
        assert_ne!(Commitment::new(&[0], &salt), Commitment::new(&[1], &salt));
    }

    #[test]
    fn test_different_salts_different_commitments() {
        let commitment1 = Commitment::new(&[0], &Salt::random());
        let commitment2 = Commitment::new(&[0], &Salt::random());

        assert_ne!(commitment1, commitment2);
    }

    #[test]
    fn test_wrong_salt_fails_verification() {
        let commitment = Commitment::new(&[0], &Salt::new("pass").unwrap());

        assert!(!CommitmentScheme::MoveAndSalt.verify(
            &commitment,
            &[0],
            &Salt::new("pas").unwrap(),
            &alice()
        ));
    }

    #[test]
    fn test_bound_commitment_rejects_other_player() {
        let salt = Salt::new("pass").unwrap();
        let scheme = CommitmentScheme::BoundToPlayer;
        let commitment = scheme.commit(&[2], &salt, &alice());

        assert!(scheme.verify(&commitment, &[2], &salt, &alice()));
        assert!(!scheme.verify(&commitment, &[2], &salt, &bob()));
    }

    #[test]
    fn test_move_and_salt_ignores_player() {
        let salt = Salt::new("pass").unwrap();
        let scheme = CommitmentScheme::MoveAndSalt;

        assert_eq!(
            scheme.commit(&[1], &salt, &alice()),
            scheme.commit(&[1], &salt, &bob())
        );
    }

    #[test]
    fn test_commitment_hex_parse() {
        let commitment = Commitment::new(&[0], &Salt::new("pass").unwrap());
        let text = commitment.to_string();
        assert!(text.starts_with("0x"));
        assert_eq!(text.parse::<Commitment>().unwrap(), commitment);
        assert_eq!(text[2..].parse::<Commitment>().unwrap(), commitment);

        assert_eq!(
            "0xabcd".parse::<Commitment>(),
            Err(CommitmentParseError::InvalidLength(2))
        );
    }

    #[test]
    fn test_salt_serializes_as_hex() {
        let salt = Salt::new("pass").unwrap();
        let json = serde_json::to_string(&salt).unwrap();
        assert_eq!(json, "\"70617373\"");
        assert_eq!(serde_json::from_str::<Salt>(&json).unwrap(), salt);
    }

    #[test]
    fn test_empty_salt_is_rejected() {
        assert_eq!(Salt::new(""), Err(RegistryError::EmptySalt));
        assert_eq!(Salt::try_from(""), Err(RegistryError::EmptySalt));
        assert_eq!(Salt::new(Vec::<u8>::new()), Err(RegistryError::EmptySalt));
        assert!(serde_json::from_str::<Salt>("\"\"").is_err());
        assert!(serde_json::from_str::<Salt>("\"0x\"").is_err());

        assert!(!Salt::try_from("p").unwrap().is_empty());
        assert_eq!(serde_json::from_str::<Salt>("\"0x00\"").unwrap().as_bytes(), &[0]);
    }

    #[test]
    fn test_scheme_from_str() {
        assert_eq!(
            "bound_to_player".parse::<CommitmentScheme>(),
            Ok(CommitmentScheme::BoundToPlayer)
        );
        assert!("sha3".parse::<CommitmentScheme>().is_err());
    }
}
