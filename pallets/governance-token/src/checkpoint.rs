//! Per-account balance checkpoint log.
//!
//! Each account owns an append-only list of `(block_height, value)` entries
//! with strictly increasing heights. A second write in the same block
//! overwrites the last entry instead of appending, so the log holds the
//! closing balance of every block in which the account's balance changed.
//! Lookups by height are left to readers of the log.

use codec::{Decode, Encode, MaxEncodedLen};
use frame_support::dispatch::DispatchResult;
use scale_info::TypeInfo;
use sp_runtime::{ArithmeticError, RuntimeDebug};

use crate::{Config, Event, Pallet, SnapshotCount, Snapshots, LOG_TARGET};

/// A recorded balance of one account at one block.
#[derive(Encode, Decode, MaxEncodedLen, TypeInfo, Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub struct Snapshot<BlockNumber> {
    pub block_height: BlockNumber,
    pub value: u128,
}

impl<T: Config> Pallet<T> {
    /// Record `new_value` as `account`'s balance at the current block.
    ///
    /// Emits `SnapshotDone` whether the entry was appended or coalesced.
    pub(crate) fn write_snapshot(
        account: &T::AccountId,
        old_value: u128,
        new_value: u128,
    ) -> DispatchResult {
        let now = frame_system::Pallet::<T>::block_number();
        let count = SnapshotCount::<T>::get(account);

        let last = count.checked_sub(1).and_then(|index| {
            Snapshots::<T>::get(account, index).map(|snapshot| (index, snapshot))
        });

        match last {
            Some((index, mut snapshot)) if snapshot.block_height == now => {
                snapshot.value = new_value;
                Snapshots::<T>::insert(account, index, snapshot);
                log::debug!(
                    target: LOG_TARGET,
                    "Coalesced checkpoint {index} at block {now:?}: {old_value} -> {new_value}"
                );
            },
            _ => {
                let next = count.checked_add(1).ok_or(ArithmeticError::Overflow)?;
                Snapshots::<T>::insert(
                    account,
                    count,
                    Snapshot { block_height: now, value: new_value },
                );
                SnapshotCount::<T>::insert(account, next);
                log::debug!(
                    target: LOG_TARGET,
                    "Appended checkpoint {count} at block {now:?}: {old_value} -> {new_value}"
                );
            },
        }

        Self::deposit_event(Event::SnapshotDone { account: account.clone(), old_value, new_value });
        Ok(())
    }
}
