//! EIP-712 typed-data hashing for signed approvals.
//!
//! The domain separator stored by `initialize` and the digest checked by
//! `permit` are both built here, so the two sides can never drift apart.
//! Encoding follows Solidity's `abi.encode`: every field occupies one
//! big-endian 32-byte word, addresses are left-padded with zeros.

use sp_core::{H160, H256, U256};
use sp_io::hashing::keccak_256;
use sp_runtime::RuntimeDebug;
use sp_std::vec::Vec;

/// Type string of the EIP-712 domain.
pub const EIP712_DOMAIN_TYPE: &[u8] =
    b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// Type string of the signed permit message.
pub const PERMIT_TYPE: &[u8] =
    b"Permit(address owner,address spender,uint256 value,uint256 nonce,uint256 deadline)";

/// Version string mixed into the domain separator.
pub const PERMIT_VERSION: &[u8] = b"1";

type Word = [u8; 32];

fn address_word(address: &H160) -> Word {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

fn uint_word(value: U256) -> Word {
    let mut word = [0u8; 32];
    // limbs are little-endian u64s
    for (i, limb) in value.0.iter().enumerate() {
        let end = 32 - i * 8;
        word[end - 8..end].copy_from_slice(&limb.to_be_bytes());
    }
    word
}

fn hash_words(words: &[Word]) -> Word {
    let mut buf = Vec::with_capacity(words.len() * 32);
    for word in words {
        buf.extend_from_slice(word);
    }
    keccak_256(&buf)
}

/// Identity of one ledger deployment, as seen by off-chain signers.
#[derive(Clone, PartialEq, Eq, RuntimeDebug)]
pub struct PermitDomain<'a> {
    pub name: &'a [u8],
    pub version: &'a [u8],
    pub chain_id: u64,
    pub verifying_contract: H160,
}

impl PermitDomain<'_> {
    /// `keccak256(abi.encode(DOMAIN_TYPEHASH, keccak256(name), keccak256(version), chainId, verifyingContract))`
    pub fn separator(&self) -> H256 {
        H256(hash_words(&[
            keccak_256(EIP712_DOMAIN_TYPE),
            keccak_256(self.name),
            keccak_256(self.version),
            uint_word(U256::from(self.chain_id)),
            address_word(&self.verifying_contract),
        ]))
    }
}

/// The structured message an owner signs to grant an allowance.
#[derive(Clone, PartialEq, Eq, RuntimeDebug)]
pub struct Permit {
    pub owner: H160,
    pub spender: H160,
    pub value: U256,
    pub nonce: U256,
    pub deadline: U256,
}

impl Permit {
    pub fn struct_hash(&self) -> H256 {
        H256(hash_words(&[
            keccak_256(PERMIT_TYPE),
            address_word(&self.owner),
            address_word(&self.spender),
            uint_word(self.value),
            uint_word(self.nonce),
            uint_word(self.deadline),
        ]))
    }

    /// `keccak256("\x19\x01" ‖ domainSeparator ‖ structHash)`
    pub fn digest(&self, domain_separator: &H256) -> H256 {
        let mut buf = [0u8; 66];
        buf[0] = 0x19;
        buf[1] = 0x01;
        buf[2..34].copy_from_slice(domain_separator.as_bytes());
        buf[34..].copy_from_slice(self.struct_hash().as_bytes());
        H256(keccak_256(&buf))
    }
}

/// Ethereum-style address of an uncompressed secp256k1 public key.
pub fn address_of_public(public: &[u8; 64]) -> H160 {
    H160::from_slice(&keccak_256(public)[12..])
}

/// Recovers the address that produced `(v, r, s)` over `digest`.
///
/// `v` must be 27 or 28. Returns `None` for any malformed signature.
pub fn recover_signer(digest: &H256, v: u8, r: &H256, s: &H256) -> Option<H160> {
    let recovery_id = match v {
        27 | 28 => v - 27,
        _ => return None,
    };

    let mut signature = [0u8; 65];
    signature[..32].copy_from_slice(r.as_bytes());
    signature[32..64].copy_from_slice(s.as_bytes());
    signature[64] = recovery_id;

    let public = sp_io::crypto::secp256k1_ecdsa_recover(&signature, digest.as_fixed_bytes()).ok()?;
    Some(address_of_public(&public))
}
