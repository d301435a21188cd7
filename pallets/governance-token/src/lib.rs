//! # Governance Token Pallet
//!
//! Accounting and authorization core of a fungible ledger used for governance
//! voting power and gas-less approvals.
//!
//! - Every balance change writes a per-account checkpoint `(block, balance)`
//!   before storage is touched; writes in the same block coalesce. External
//!   governance logic reads the log through [`Pallet::snapshot_count_of`] and
//!   [`Pallet::snapshot_of`].
//! - [`Pallet::permit`] turns an EIP-712 signature by the owner into an
//!   allowance, guarded by a per-owner nonce and a deadline.
//! - [`Pallet::initialize`] runs once per logic revision: it derives the permit
//!   domain separator, stores the governance hook and mints the migration and
//!   distribution supply.
//! - A runtime-provided [`OnTransfer`] callback is notified of every balance
//!   change after both checkpoints are written and before balances move.

#![cfg_attr(not(feature = "std"), no_std)]
// Pallet getters are deprecated upstream but remain the read surface here
#![allow(deprecated)]
#![allow(clippy::let_unit_value)]

use frame_support::{
    dispatch::DispatchResult,
    ensure,
    pallet_prelude::*,
    traits::{EnsureOrigin, UnixTime},
};
use frame_system::{ensure_signed, pallet_prelude::*};
use sp_core::{H160, H256, U256};
use sp_runtime::{traits::Convert, ArithmeticError};
use sp_std::prelude::*;

pub use checkpoint::Snapshot;
pub use pallet::*;
pub use weights::WeightInfo;

mod checkpoint;
mod ledger;
mod notifier;
pub mod permit;
pub mod weights;

#[cfg(test)]
mod mock;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

use permit::{Permit, PermitDomain, PERMIT_VERSION};

/// The current storage version.
const STORAGE_VERSION: StorageVersion = StorageVersion::new(1);

/// Logic revision recorded by [`Pallet::initialize`].
pub const LEDGER_REVISION: u32 = 1;

pub(crate) const LOG_TARGET: &str = "pallet-governance-token";

/// Governance callback notified of every balance change.
///
/// `hook` is the target stored at initialization. `None` stands for the mint
/// source or the burn destination. Returning an error aborts the whole call
/// that moved the balance.
///
/// Implementations run while balances still hold their pre-transfer values and
/// must not call back into mutating entry points of this pallet; such calls
/// fail with [`Error::ReentrantCall`].
pub trait OnTransfer<AccountId> {
    fn on_transfer(
        hook: &AccountId,
        from: Option<&AccountId>,
        to: Option<&AccountId>,
        amount: u128,
    ) -> DispatchResult;
}

impl<AccountId> OnTransfer<AccountId> for () {
    fn on_transfer(
        _hook: &AccountId,
        _from: Option<&AccountId>,
        _to: Option<&AccountId>,
        _amount: u128,
    ) -> DispatchResult {
        Ok(())
    }
}

/// One-time setup state of the ledger.
#[derive(
    Encode, Decode, MaxEncodedLen, TypeInfo, Clone, Copy, PartialEq, Eq, RuntimeDebug, Default,
)]
pub enum Initialization {
    #[default]
    Uninitialized,
    InitializedAtRevision(u32),
}

impl Initialization {
    /// Revision that has been initialized, `0` when none has.
    pub fn revision(&self) -> u32 {
        match self {
            Self::Uninitialized => 0,
            Self::InitializedAtRevision(revision) => *revision,
        }
    }
}

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// Origin allowed to mint and to run the one-time initialization.
        type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

        /// Governance callback invoked on every balance change.
        type OnTransfer: OnTransfer<Self::AccountId>;

        /// Clock that permit deadlines are checked against (seconds).
        type TimeProvider: UnixTime;

        /// 20-byte identity an account signs permits with.
        type AccountAddress: Convert<Self::AccountId, H160>;

        /// Chain identity bound into the permit domain separator.
        #[pallet::constant]
        type ChainId: Get<u64>;

        /// Ledger identity bound into the permit domain separator.
        #[pallet::constant]
        type LedgerAddress: Get<H160>;

        /// Supply minted to the migrator by `initialize`.
        #[pallet::constant]
        type MigrationAmount: Get<u128>;

        /// Supply minted to the distributor by `initialize`.
        #[pallet::constant]
        type DistributionAmount: Get<u128>;

        type WeightInfo: WeightInfo;
    }

    #[pallet::pallet]
    #[pallet::storage_version(STORAGE_VERSION)]
    pub struct Pallet<T>(_);

    /// Token name, also the EIP-712 domain name
    #[pallet::storage]
    #[pallet::getter(fn token_name)]
    pub type TokenName<T> = StorageValue<_, BoundedVec<u8, ConstU32<64>>, ValueQuery>;

    /// Token symbol (e.g., "GOV")
    #[pallet::storage]
    #[pallet::getter(fn token_symbol)]
    pub type TokenSymbol<T> = StorageValue<_, BoundedVec<u8, ConstU32<16>>, ValueQuery>;

    /// Token decimals
    #[pallet::storage]
    #[pallet::getter(fn decimals)]
    pub type Decimals<T> = StorageValue<_, u8, ValueQuery>;

    /// Total token supply
    #[pallet::storage]
    #[pallet::getter(fn total_supply)]
    pub type TotalSupply<T> = StorageValue<_, u128, ValueQuery>;

    /// Account balances
    #[pallet::storage]
    #[pallet::getter(fn balance_of)]
    pub type Balances<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, u128, ValueQuery>;

    /// Allowances, keyed by (owner, spender)
    #[pallet::storage]
    #[pallet::getter(fn allowance)]
    pub type Allowances<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        Blake2_128Concat,
        T::AccountId,
        u128,
        ValueQuery,
    >;

    /// Balance checkpoints, keyed by (account, index)
    #[pallet::storage]
    #[pallet::getter(fn snapshot_of)]
    pub type Snapshots<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        Twox64Concat,
        u32,
        Snapshot<BlockNumberFor<T>>,
        OptionQuery,
    >;

    /// Number of checkpoints per account
    #[pallet::storage]
    #[pallet::getter(fn snapshot_count_of)]
    pub type SnapshotCount<T: Config> =
        StorageMap<_, Blake2_128Concat, T::AccountId, u32, ValueQuery>;

    /// Permit nonces
    #[pallet::storage]
    #[pallet::getter(fn nonce_of)]
    pub type Nonces<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, u64, ValueQuery>;

    /// EIP-712 domain separator, written by `initialize`
    #[pallet::storage]
    #[pallet::getter(fn domain_separator)]
    pub type DomainSeparator<T> = StorageValue<_, H256, ValueQuery>;

    /// Initialized logic revision
    #[pallet::storage]
    #[pallet::getter(fn initialization)]
    pub type RevisionMarker<T> = StorageValue<_, Initialization, ValueQuery>;

    /// Target passed to `Config::OnTransfer`, written by `initialize`
    #[pallet::storage]
    #[pallet::getter(fn governance_hook)]
    pub type GovernanceHook<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

    /// Set while the governance callback runs.
    #[pallet::storage]
    pub(super) type HookActive<T> = StorageValue<_, bool, ValueQuery>;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// Ledger initialized for a logic revision
        Initialized {
            revision: u32,
            domain_separator: H256,
            governance_hook: Option<T::AccountId>,
        },
        /// Checkpoint appended or coalesced for an account
        SnapshotDone { account: T::AccountId, old_value: u128, new_value: u128 },
        /// Tokens transferred from one account to another
        Transferred { from: T::AccountId, to: T::AccountId, amount: u128 },
        /// New tokens minted
        Minted { to: T::AccountId, amount: u128 },
        /// Tokens burned
        Burned { from: T::AccountId, amount: u128 },
        /// Allowance set
        Approved { owner: T::AccountId, spender: T::AccountId, amount: u128 },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// This logic revision has already been initialized.
        AlreadyInitialized,
        /// The ledger has not been initialized yet.
        NotInitialized,
        /// Permit owner maps to the null address.
        InvalidOwner,
        /// Permit deadline has passed.
        Expired,
        /// Permit signature was not produced by the owner.
        InvalidSignature,
        InsufficientAllowance,
        /// Balance change to or from an account that maps to the null address.
        NullAccount,
        /// A mutating call was made from inside the governance callback.
        ReentrantCall,
    }

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        #[cfg(feature = "try-runtime")]
        fn try_state(_n: BlockNumberFor<T>) -> Result<(), sp_runtime::TryRuntimeError> {
            Self::do_try_state()
        }
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Run the one-time setup for this logic revision.
        ///
        /// Derives the permit domain separator, stores the governance hook and
        /// mints the migration and distribution supply.
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::initialize())]
        pub fn initialize(
            origin: OriginFor<T>,
            migrator: T::AccountId,
            distributor: T::AccountId,
            governance_hook: Option<T::AccountId>,
        ) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;
            Self::do_initialize(&migrator, &distributor, governance_hook)
        }

        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::mint())]
        pub fn mint(origin: OriginFor<T>, to: T::AccountId, amount: u128) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;
            Self::do_mint(&to, amount)
        }

        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::transfer())]
        pub fn transfer(origin: OriginFor<T>, to: T::AccountId, amount: u128) -> DispatchResult {
            let sender = ensure_signed(origin)?;
            Self::do_transfer(&sender, &to, amount)
        }

        #[pallet::call_index(3)]
        #[pallet::weight(T::WeightInfo::burn())]
        pub fn burn(origin: OriginFor<T>, amount: u128) -> DispatchResult {
            let sender = ensure_signed(origin)?;
            Self::do_burn(&sender, amount)
        }

        #[pallet::call_index(4)]
        #[pallet::weight(T::WeightInfo::approve())]
        pub fn approve(origin: OriginFor<T>, spender: T::AccountId, amount: u128) -> DispatchResult {
            let owner = ensure_signed(origin)?;
            Self::do_approve(&owner, &spender, amount)
        }

        #[pallet::call_index(5)]
        #[pallet::weight(T::WeightInfo::transfer_from())]
        pub fn transfer_from(
            origin: OriginFor<T>,
            owner: T::AccountId,
            to: T::AccountId,
            amount: u128,
        ) -> DispatchResult {
            let spender = ensure_signed(origin)?;
            Self::spend_allowance(&owner, &spender, amount)?;
            Self::do_transfer(&owner, &to, amount)
        }

        /// Set `owner`'s allowance for `spender` from an EIP-712 signature.
        ///
        /// Any signed account may relay the signature. `(v, r, s)` must sign
        /// the permit digest for the owner's current nonce; `v` is 27 or 28.
        #[pallet::call_index(6)]
        #[pallet::weight(T::WeightInfo::permit())]
        #[allow(clippy::too_many_arguments)]
        pub fn permit(
            origin: OriginFor<T>,
            owner: T::AccountId,
            spender: T::AccountId,
            value: U256,
            deadline: U256,
            v: u8,
            r: H256,
            s: H256,
        ) -> DispatchResult {
            ensure_signed(origin)?;
            Self::do_permit(&owner, &spender, value, deadline, v, &r, &s)
        }
    }

    #[pallet::genesis_config]
    #[derive(frame_support::DefaultNoBound)]
    pub struct GenesisConfig<T: Config> {
        /// Token name
        pub token_name: Vec<u8>,
        /// Token symbol
        pub token_symbol: Vec<u8>,
        /// Token decimals
        pub decimals: u8,
        /// Pre-existing balances (account, amount), seeded without checkpoints
        pub initial_balances: Vec<(T::AccountId, u128)>,
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            let name: BoundedVec<u8, ConstU32<64>> =
                self.token_name.clone().try_into().expect("Token name too long (max 64 bytes)");
            TokenName::<T>::put(name);

            let symbol: BoundedVec<u8, ConstU32<16>> =
                self.token_symbol.clone().try_into().expect("Token symbol too long (max 16 bytes)");
            TokenSymbol::<T>::put(symbol);

            Decimals::<T>::put(self.decimals);

            let mut total: u128 = 0;
            for (account, amount) in &self.initial_balances {
                // Repeated accounts accumulate
                Balances::<T>::mutate(account, |balance| *balance = balance.saturating_add(*amount));
                total = total.saturating_add(*amount);
            }
            TotalSupply::<T>::put(total);
        }
    }
}

impl<T: Config> Pallet<T> {
    pub(crate) fn do_initialize(
        migrator: &T::AccountId,
        distributor: &T::AccountId,
        governance_hook: Option<T::AccountId>,
    ) -> DispatchResult {
        ensure!(
            RevisionMarker::<T>::get().revision() < LEDGER_REVISION,
            Error::<T>::AlreadyInitialized
        );
        RevisionMarker::<T>::put(Initialization::InitializedAtRevision(LEDGER_REVISION));

        let name = TokenName::<T>::get();
        let domain_separator = PermitDomain {
            name: name.as_slice(),
            version: PERMIT_VERSION,
            chain_id: T::ChainId::get(),
            verifying_contract: T::LedgerAddress::get(),
        }
        .separator();
        DomainSeparator::<T>::put(domain_separator);

        match &governance_hook {
            Some(hook) => GovernanceHook::<T>::put(hook),
            None => GovernanceHook::<T>::kill(),
        }

        Self::do_mint(migrator, T::MigrationAmount::get())?;
        Self::do_mint(distributor, T::DistributionAmount::get())?;

        log::info!(
            target: LOG_TARGET,
            "Initialized ledger at revision {LEDGER_REVISION}, domain separator {domain_separator:?}"
        );
        Self::deposit_event(Event::Initialized {
            revision: LEDGER_REVISION,
            domain_separator,
            governance_hook,
        });
        Ok(())
    }

    pub(crate) fn do_permit(
        owner: &T::AccountId,
        spender: &T::AccountId,
        value: U256,
        deadline: U256,
        v: u8,
        r: &H256,
        s: &H256,
    ) -> DispatchResult {
        ensure!(
            RevisionMarker::<T>::get() != Initialization::Uninitialized,
            Error::<T>::NotInitialized
        );

        let owner_address = T::AccountAddress::convert(owner.clone());
        ensure!(!owner_address.is_zero(), Error::<T>::InvalidOwner);

        let now = U256::from(T::TimeProvider::now().as_secs());
        ensure!(now <= deadline, Error::<T>::Expired);

        let nonce = Nonces::<T>::get(owner);
        let digest = Self::permit_digest(owner, spender, value, nonce, deadline);
        let signer = permit::recover_signer(&digest, v, r, s);
        ensure!(signer == Some(owner_address), Error::<T>::InvalidSignature);

        ensure!(value <= U256::from(u128::MAX), ArithmeticError::Overflow);
        let amount = value.low_u128();

        // Consume the nonce before the allowance becomes usable
        let next = nonce.checked_add(1).ok_or(ArithmeticError::Overflow)?;
        Nonces::<T>::insert(owner, next);

        log::debug!(
            target: LOG_TARGET,
            "Permit accepted for {owner_address:?} at nonce {nonce}"
        );
        Self::do_approve(owner, spender, amount)
    }

    /// Digest an owner signs to authorize `spender` for `value` at `nonce`.
    pub fn permit_digest(
        owner: &T::AccountId,
        spender: &T::AccountId,
        value: U256,
        nonce: u64,
        deadline: U256,
    ) -> H256 {
        Permit {
            owner: T::AccountAddress::convert(owner.clone()),
            spender: T::AccountAddress::convert(spender.clone()),
            value,
            nonce: U256::from(nonce),
            deadline,
        }
        .digest(&DomainSeparator::<T>::get())
    }

    /// Checks the checkpoint log and supply invariants.
    #[cfg(any(feature = "try-runtime", test))]
    pub(crate) fn do_try_state() -> Result<(), sp_runtime::DispatchError> {
        for (account, count) in SnapshotCount::<T>::iter() {
            let mut previous: Option<BlockNumberFor<T>> = None;
            for index in 0..count {
                let snapshot = Snapshots::<T>::get(&account, index)
                    .ok_or("snapshot count exceeds stored entries")?;
                if let Some(previous) = previous {
                    ensure!(
                        previous < snapshot.block_height,
                        "snapshot heights must strictly increase"
                    );
                }
                previous = Some(snapshot.block_height);
            }
            ensure!(
                Snapshots::<T>::get(&account, count).is_none(),
                "snapshot stored beyond count"
            );
        }

        let sum = Balances::<T>::iter_values()
            .try_fold(0u128, |acc, balance| acc.checked_add(balance))
            .ok_or("balance sum overflows")?;
        ensure!(sum == TotalSupply::<T>::get(), "total supply does not match balances");
        ensure!(!HookActive::<T>::get(), "hook flag left set");
        Ok(())
    }
}
