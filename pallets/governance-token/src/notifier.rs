//! Pre-mutation hook run by every balance-changing ledger path.
//!
//! Order per call: checkpoint `from`, checkpoint `to`, notify the governance
//! hook. Balances are written by the caller only after this returns, so the
//! hook sees the new checkpoints next to the old balances.

use frame_support::{dispatch::DispatchResult, ensure};
use sp_runtime::ArithmeticError;

use crate::{pallet::HookActive, Balances, Config, Error, GovernanceHook, OnTransfer, Pallet};

impl<T: Config> Pallet<T> {
    /// Fails while the governance hook is running.
    pub(crate) fn ensure_not_in_hook() -> DispatchResult {
        ensure!(!HookActive::<T>::get(), Error::<T>::ReentrantCall);
        Ok(())
    }

    /// Checkpoint both sides of a balance change and notify governance.
    ///
    /// `None` is the mint source or burn destination. A self-transfer is a
    /// no-op: no checkpoint and no notification.
    pub(crate) fn before_transfer(
        from: Option<&T::AccountId>,
        to: Option<&T::AccountId>,
        amount: u128,
    ) -> DispatchResult {
        Self::ensure_not_in_hook()?;

        if from == to {
            return Ok(());
        }

        if let Some(from) = from {
            let balance = Balances::<T>::get(from);
            let remaining = balance.checked_sub(amount).ok_or(ArithmeticError::Underflow)?;
            Self::write_snapshot(from, balance, remaining)?;
        }

        if let Some(to) = to {
            let balance = Balances::<T>::get(to);
            let credited = balance.checked_add(amount).ok_or(ArithmeticError::Overflow)?;
            Self::write_snapshot(to, balance, credited)?;
        }

        if let Some(hook) = GovernanceHook::<T>::get() {
            HookActive::<T>::put(true);
            let result = T::OnTransfer::on_transfer(&hook, from, to, amount);
            HookActive::<T>::kill();
            result?;
        }

        Ok(())
    }
}
