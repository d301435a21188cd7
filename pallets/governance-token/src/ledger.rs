//! Plain balance bookkeeping. Every path that moves a balance goes through
//! `before_transfer` first.
//!
//! The public entry points run in their own storage layer, so callers outside
//! a dispatchable get the same all-or-nothing behavior as the extrinsics.

use frame_support::{dispatch::DispatchResult, ensure, storage::with_storage_layer};
use sp_core::H160;
use sp_runtime::{traits::Convert, ArithmeticError};

use crate::{Allowances, Balances, Config, Error, Event, Pallet, TotalSupply};

impl<T: Config> Pallet<T> {
    /// Fails when `who` maps to the null address.
    pub(crate) fn ensure_not_null(who: &T::AccountId) -> DispatchResult {
        ensure!(T::AccountAddress::convert(who.clone()) != H160::zero(), Error::<T>::NullAccount);
        Ok(())
    }

    pub fn do_mint(to: &T::AccountId, amount: u128) -> DispatchResult {
        with_storage_layer(|| {
            Self::ensure_not_null(to)?;
            Self::before_transfer(None, Some(to), amount)?;

            let supply =
                TotalSupply::<T>::get().checked_add(amount).ok_or(ArithmeticError::Overflow)?;
            let balance =
                Balances::<T>::get(to).checked_add(amount).ok_or(ArithmeticError::Overflow)?;
            TotalSupply::<T>::put(supply);
            Balances::<T>::insert(to, balance);

            Self::deposit_event(Event::Minted { to: to.clone(), amount });
            Ok(())
        })
    }

    pub fn do_burn(from: &T::AccountId, amount: u128) -> DispatchResult {
        with_storage_layer(|| {
            Self::before_transfer(Some(from), None, amount)?;

            let balance =
                Balances::<T>::get(from).checked_sub(amount).ok_or(ArithmeticError::Underflow)?;
            let supply =
                TotalSupply::<T>::get().checked_sub(amount).ok_or(ArithmeticError::Underflow)?;
            Balances::<T>::insert(from, balance);
            TotalSupply::<T>::put(supply);

            Self::deposit_event(Event::Burned { from: from.clone(), amount });
            Ok(())
        })
    }

    pub fn do_transfer(from: &T::AccountId, to: &T::AccountId, amount: u128) -> DispatchResult {
        with_storage_layer(|| {
            Self::ensure_not_null(from)?;
            Self::ensure_not_null(to)?;
            Self::before_transfer(Some(from), Some(to), amount)?;

            // Debit first so a self-transfer credits the debited balance
            let from_balance =
                Balances::<T>::get(from).checked_sub(amount).ok_or(ArithmeticError::Underflow)?;
            Balances::<T>::insert(from, from_balance);
            let to_balance =
                Balances::<T>::get(to).checked_add(amount).ok_or(ArithmeticError::Overflow)?;
            Balances::<T>::insert(to, to_balance);

            Self::deposit_event(Event::Transferred { from: from.clone(), to: to.clone(), amount });
            Ok(())
        })
    }

    /// Overwrites the allowance of `spender` over `owner`'s balance.
    pub fn do_approve(owner: &T::AccountId, spender: &T::AccountId, amount: u128) -> DispatchResult {
        Self::ensure_not_in_hook()?;

        Allowances::<T>::insert(owner, spender, amount);
        Self::deposit_event(Event::Approved {
            owner: owner.clone(),
            spender: spender.clone(),
            amount,
        });
        Ok(())
    }

    /// Deducts `amount` from an allowance. `u128::MAX` is never decremented.
    pub(crate) fn spend_allowance(
        owner: &T::AccountId,
        spender: &T::AccountId,
        amount: u128,
    ) -> DispatchResult {
        let current = Allowances::<T>::get(owner, spender);
        if current == u128::MAX {
            return Ok(());
        }
        let remaining = current.checked_sub(amount).ok_or(Error::<T>::InsufficientAllowance)?;
        Allowances::<T>::insert(owner, spender, remaining);
        Ok(())
    }
}
