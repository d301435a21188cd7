//! Benchmarking setup for pallet-governance-token

use super::*;

#[allow(unused)]
use crate::Pallet as GovernanceToken;
use frame_benchmarking::v2::*;
use frame_system::RawOrigin;

/// Give `who` a balance and one checkpoint in an earlier block, so the
/// benchmarked call appends rather than creates the log.
fn seed_account<T: Config>(who: &T::AccountId, amount: u128) {
    Balances::<T>::mutate(who, |balance| *balance += amount);
    TotalSupply::<T>::mutate(|supply| *supply += amount);
    Snapshots::<T>::insert(
        who,
        0,
        Snapshot { block_height: frame_system::Pallet::<T>::block_number(), value: amount },
    );
    SnapshotCount::<T>::insert(who, 1);
    frame_system::Pallet::<T>::set_block_number(
        frame_system::Pallet::<T>::block_number() + 1u32.into(),
    );
}

#[benchmarks]
mod benchmarks {
    use super::*;

    #[benchmark]
    fn initialize() {
        let migrator: T::AccountId = account("migrator", 0, 0);
        let distributor: T::AccountId = account("distributor", 0, 0);
        let hook: T::AccountId = account("governance", 0, 0);
        let origin = T::AdminOrigin::try_successful_origin().expect("Admin origin");

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, migrator.clone(), distributor.clone(), Some(hook));

        assert_eq!(Balances::<T>::get(&migrator), T::MigrationAmount::get());
        assert_eq!(Balances::<T>::get(&distributor), T::DistributionAmount::get());
    }

    #[benchmark]
    fn mint() {
        let recipient: T::AccountId = account("recipient", 0, 0);
        GovernanceHook::<T>::put(account::<T::AccountId>("governance", 0, 0));
        seed_account::<T>(&recipient, 1_000);
        let origin = T::AdminOrigin::try_successful_origin().expect("Admin origin");

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, recipient.clone(), 1_000_000);

        assert_eq!(Balances::<T>::get(&recipient), 1_001_000);
        assert_eq!(SnapshotCount::<T>::get(&recipient), 2);
    }

    #[benchmark]
    fn transfer() {
        let caller: T::AccountId = whitelisted_caller();
        let recipient: T::AccountId = account("recipient", 0, 0);
        GovernanceHook::<T>::put(account::<T::AccountId>("governance", 0, 0));
        seed_account::<T>(&caller, 10_000_000);
        seed_account::<T>(&recipient, 1_000);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), recipient.clone(), 1_000_000);

        assert_eq!(Balances::<T>::get(&recipient), 1_001_000);
        assert_eq!(SnapshotCount::<T>::get(&caller), 2);
    }

    #[benchmark]
    fn burn() {
        let caller: T::AccountId = whitelisted_caller();
        GovernanceHook::<T>::put(account::<T::AccountId>("governance", 0, 0));
        seed_account::<T>(&caller, 10_000_000);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), 1_000_000);

        assert_eq!(Balances::<T>::get(&caller), 9_000_000);
    }

    #[benchmark]
    fn approve() {
        let caller: T::AccountId = whitelisted_caller();
        let spender: T::AccountId = account("spender", 0, 0);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), spender.clone(), 1_000_000);

        assert_eq!(Allowances::<T>::get(&caller, &spender), 1_000_000);
    }

    #[benchmark]
    fn transfer_from() {
        let caller: T::AccountId = whitelisted_caller();
        let owner: T::AccountId = account("owner", 0, 0);
        let recipient: T::AccountId = account("recipient", 0, 0);
        GovernanceHook::<T>::put(account::<T::AccountId>("governance", 0, 0));
        seed_account::<T>(&owner, 10_000_000);
        seed_account::<T>(&recipient, 1_000);
        Allowances::<T>::insert(&owner, &caller, 2_000_000);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), owner.clone(), recipient.clone(), 1_000_000);

        assert_eq!(Allowances::<T>::get(&owner, &caller), 1_000_000);
        assert_eq!(Balances::<T>::get(&recipient), 1_001_000);
    }

    impl_benchmark_test_suite!(GovernanceToken, crate::mock::new_test_ext(), crate::mock::Test);
}
