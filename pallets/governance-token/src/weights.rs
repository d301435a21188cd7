//! Weights for pallet-governance-token.
//!
//! Hand-set from the storage accesses of each call. `permit` adds the cost of
//! one secp256k1 public key recovery on top of its storage accesses.

use core::marker::PhantomData;
use frame_support::{traits::Get, weights::Weight};

/// Weight functions needed for pallet-governance-token.
pub trait WeightInfo {
    fn initialize() -> Weight;
    fn mint() -> Weight;
    fn transfer() -> Weight;
    fn burn() -> Weight;
    fn approve() -> Weight;
    fn transfer_from() -> Weight;
    fn permit() -> Weight;
}

/// Computational cost of a balance change: two checkpoint writes and the hook.
const BALANCE_CHANGE: u64 = 40_000_000;
/// Computational cost of recovering a secp256k1 signer.
const SIGNER_RECOVERY: u64 = 60_000_000;

/// Weights for pallet-governance-token using the runtime's database weights.
pub struct SubstrateWeight<T>(PhantomData<T>);

impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    /// Reads: RevisionMarker, TokenName, GovernanceHook, HookActive, 2x (Balances,
    /// SnapshotCount, Snapshots, TotalSupply)
    /// Writes: RevisionMarker, DomainSeparator, GovernanceHook, 2x (Balances,
    /// SnapshotCount, Snapshots, TotalSupply)
    fn initialize() -> Weight {
        Weight::from_parts(2 * BALANCE_CHANGE, 0)
            .saturating_add(T::DbWeight::get().reads(12))
            .saturating_add(T::DbWeight::get().writes(11))
    }

    /// Reads: HookActive, Balances, SnapshotCount, Snapshots, GovernanceHook, TotalSupply
    /// Writes: Balances, SnapshotCount, Snapshots, TotalSupply, HookActive
    fn mint() -> Weight {
        Weight::from_parts(BALANCE_CHANGE, 0)
            .saturating_add(T::DbWeight::get().reads(6))
            .saturating_add(T::DbWeight::get().writes(5))
    }

    /// Reads: HookActive, 2x (Balances, SnapshotCount, Snapshots), GovernanceHook
    /// Writes: 2x (Balances, SnapshotCount, Snapshots), HookActive
    fn transfer() -> Weight {
        Weight::from_parts(BALANCE_CHANGE, 0)
            .saturating_add(T::DbWeight::get().reads(8))
            .saturating_add(T::DbWeight::get().writes(7))
    }

    /// Reads: HookActive, Balances, SnapshotCount, Snapshots, GovernanceHook, TotalSupply
    /// Writes: Balances, SnapshotCount, Snapshots, TotalSupply, HookActive
    fn burn() -> Weight {
        Weight::from_parts(BALANCE_CHANGE, 0)
            .saturating_add(T::DbWeight::get().reads(6))
            .saturating_add(T::DbWeight::get().writes(5))
    }

    /// Reads: HookActive
    /// Writes: Allowances
    fn approve() -> Weight {
        Weight::from_parts(10_000_000, 0)
            .saturating_add(T::DbWeight::get().reads(1))
            .saturating_add(T::DbWeight::get().writes(1))
    }

    /// Reads: Allowances, HookActive, 2x (Balances, SnapshotCount, Snapshots), GovernanceHook
    /// Writes: Allowances, 2x (Balances, SnapshotCount, Snapshots), HookActive
    fn transfer_from() -> Weight {
        Weight::from_parts(BALANCE_CHANGE, 0)
            .saturating_add(T::DbWeight::get().reads(9))
            .saturating_add(T::DbWeight::get().writes(8))
    }

    /// Reads: RevisionMarker, Nonces, DomainSeparator, HookActive
    /// Writes: Nonces, Allowances
    fn permit() -> Weight {
        Weight::from_parts(SIGNER_RECOVERY, 0)
            .saturating_add(T::DbWeight::get().reads(4))
            .saturating_add(T::DbWeight::get().writes(2))
    }
}

// For backwards compatibility and tests.
impl WeightInfo for () {
    fn initialize() -> Weight {
        Weight::from_parts(2 * BALANCE_CHANGE, 0)
    }
    fn mint() -> Weight {
        Weight::from_parts(BALANCE_CHANGE, 0)
    }
    fn transfer() -> Weight {
        Weight::from_parts(BALANCE_CHANGE, 0)
    }
    fn burn() -> Weight {
        Weight::from_parts(BALANCE_CHANGE, 0)
    }
    fn approve() -> Weight {
        Weight::from_parts(10_000_000, 0)
    }
    fn transfer_from() -> Weight {
        Weight::from_parts(BALANCE_CHANGE, 0)
    }
    fn permit() -> Weight {
        Weight::from_parts(SIGNER_RECOVERY, 0)
    }
}
