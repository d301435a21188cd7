use crate as pallet_governance_token;
use crate::OnTransfer;
use core::{cell::RefCell, time::Duration};
use frame_support::{
    derive_impl, parameter_types,
    traits::{ConstU32, ConstU64, UnixTime},
};
use sp_core::{ecdsa, Pair, H160, H256, U256};
use sp_runtime::{
    traits::{BlakeTwo256, Convert, IdentityLookup},
    BuildStorage, DispatchError, DispatchResult,
};
use std::collections::BTreeMap;

type Block = frame_system::mocking::MockBlock<Test>;

// Configure a mock runtime to test the pallet.
frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        GovernanceToken: pallet_governance_token,
    }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
    type BaseCallFilter = frame_support::traits::Everything;
    type BlockWeights = ();
    type BlockLength = ();
    type DbWeight = ();
    type RuntimeOrigin = RuntimeOrigin;
    type RuntimeCall = RuntimeCall;
    type Nonce = u64;
    type Hash = H256;
    type Hashing = BlakeTwo256;
    type AccountId = u64;
    type Lookup = IdentityLookup<Self::AccountId>;
    type Block = Block;
    type RuntimeEvent = RuntimeEvent;
    type BlockHashCount = ConstU64<250>;
    type Version = ();
    type PalletInfo = PalletInfo;
    type AccountData = ();
    type OnNewAccount = ();
    type OnKilledAccount = ();
    type SystemWeightInfo = ();
    type SS58Prefix = ();
    type OnSetCode = ();
    type MaxConsumers = ConstU32<16>;
}

pub const ADMIN: u64 = 1;
pub const MIGRATOR: u64 = 20;
pub const DISTRIBUTOR: u64 = 21;
pub const GOVERNANCE: u64 = 99;

/// Genesis account holding exactly 100 tokens and no checkpoints.
pub const HOLDER: u64 = 4;

/// Timestamp (seconds) every test starts at.
pub const GENESIS_TIME: u64 = 1_700_000_000;

parameter_types! {
    pub const AdminAccount: u64 = ADMIN;
    pub const ChainId: u64 = 42;
    pub LedgerAddress: H160 = H160::repeat_byte(0x11);
    pub const MigrationAmount: u128 = 7_000_000;
    pub const DistributionAmount: u128 = 3_000_000;
}

pub struct EnsureAdmin;
impl frame_support::traits::EnsureOrigin<RuntimeOrigin> for EnsureAdmin {
    type Success = u64;

    fn try_origin(o: RuntimeOrigin) -> Result<Self::Success, RuntimeOrigin> {
        match o.clone().into() {
            Ok(frame_system::RawOrigin::Signed(account)) if account == AdminAccount::get() => {
                Ok(account)
            },
            _ => Err(o),
        }
    }

    #[cfg(feature = "runtime-benchmarks")]
    fn try_successful_origin() -> Result<RuntimeOrigin, ()> {
        Ok(RuntimeOrigin::signed(AdminAccount::get()))
    }
}

/// What the governance hook does after recording a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookMode {
    Accept,
    Reject,
    /// Try to move one token from the hook account back into the ledger.
    Reenter,
}

/// One observed governance notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HookCall {
    pub hook: u64,
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub amount: u128,
    /// `(balance, snapshot_count)` of `from` as seen from inside the hook
    pub from_state: Option<(u128, u32)>,
    /// `(balance, snapshot_count)` of `to` as seen from inside the hook
    pub to_state: Option<(u128, u32)>,
}

pub const HOOK_REJECTION: DispatchError = DispatchError::Other("governance hook rejected");

thread_local! {
    static NOW: RefCell<u64> = const { RefCell::new(GENESIS_TIME) };
    static ADDRESSES: RefCell<BTreeMap<u64, H160>> = const { RefCell::new(BTreeMap::new()) };
    static HOOK_CALLS: RefCell<Vec<HookCall>> = const { RefCell::new(Vec::new()) };
    static HOOK_MODE: RefCell<HookMode> = const { RefCell::new(HookMode::Accept) };
}

pub struct MockTime;
impl UnixTime for MockTime {
    fn now() -> Duration {
        Duration::from_secs(NOW.with(|now| *now.borrow()))
    }
}

pub fn set_now(seconds: u64) {
    NOW.with(|now| *now.borrow_mut() = seconds);
}

/// Accounts without a registered key map to their id as a big-endian address,
/// so account `0` is the null address.
pub struct TestAddresses;
impl Convert<u64, H160> for TestAddresses {
    fn convert(who: u64) -> H160 {
        ADDRESSES
            .with(|addresses| addresses.borrow().get(&who).copied())
            .unwrap_or_else(|| H160::from_low_u64_be(who))
    }
}

pub struct RecordingHook;
impl OnTransfer<u64> for RecordingHook {
    fn on_transfer(
        hook: &u64,
        from: Option<&u64>,
        to: Option<&u64>,
        amount: u128,
    ) -> DispatchResult {
        let observe =
            |who: &u64| (GovernanceToken::balance_of(who), GovernanceToken::snapshot_count_of(who));
        let call = HookCall {
            hook: *hook,
            from: from.copied(),
            to: to.copied(),
            amount,
            from_state: from.map(observe),
            to_state: to.map(observe),
        };
        HOOK_CALLS.with(|calls| calls.borrow_mut().push(call));

        match HOOK_MODE.with(|mode| *mode.borrow()) {
            HookMode::Accept => Ok(()),
            HookMode::Reject => Err(HOOK_REJECTION),
            HookMode::Reenter => GovernanceToken::transfer(RuntimeOrigin::signed(*hook), ADMIN, 1),
        }
    }
}

pub fn set_hook_mode(mode: HookMode) {
    HOOK_MODE.with(|current| *current.borrow_mut() = mode);
}

pub fn hook_calls() -> Vec<HookCall> {
    HOOK_CALLS.with(|calls| calls.borrow().clone())
}

pub fn clear_hook_calls() {
    HOOK_CALLS.with(|calls| calls.borrow_mut().clear());
}

impl pallet_governance_token::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type AdminOrigin = EnsureAdmin;
    type OnTransfer = RecordingHook;
    type TimeProvider = MockTime;
    type AccountAddress = TestAddresses;
    type ChainId = ChainId;
    type LedgerAddress = LedgerAddress;
    type MigrationAmount = MigrationAmount;
    type DistributionAmount = DistributionAmount;
    type WeightInfo = ();
}

/// Sign a 32-byte digest the way an Ethereum wallet does, returning `(v, r, s)`.
pub fn sign_digest(pair: &ecdsa::Pair, digest: &H256) -> (u8, H256, H256) {
    let signature = pair.sign_prehashed(digest.as_fixed_bytes());
    let raw: &[u8] = signature.as_ref();
    (raw[64] + 27, H256::from_slice(&raw[..32]), H256::from_slice(&raw[32..64]))
}

/// Create a signing key for `who` and map `who` to its Ethereum address.
pub fn register_signer(who: u64, seed: u8) -> ecdsa::Pair {
    let pair = ecdsa::Pair::from_seed(&[seed; 32]);
    let probe = H256::repeat_byte(0xEE);
    let (v, r, s) = sign_digest(&pair, &probe);
    let address =
        crate::permit::recover_signer(&probe, v, &r, &s).expect("freshly signed digest recovers");
    ADDRESSES.with(|addresses| addresses.borrow_mut().insert(who, address));
    pair
}

/// Sign a permit for `owner`'s current nonce.
pub fn sign_permit(
    pair: &ecdsa::Pair,
    owner: u64,
    spender: u64,
    value: U256,
    deadline: U256,
) -> (u8, H256, H256) {
    let nonce = GovernanceToken::nonce_of(owner);
    let digest = GovernanceToken::permit_digest(&owner, &spender, value, nonce, deadline);
    sign_digest(pair, &digest)
}

/// Run `initialize` as the admin with the given governance hook.
pub fn initialize_ledger(governance_hook: Option<u64>) {
    frame_support::assert_ok!(GovernanceToken::initialize(
        RuntimeOrigin::signed(ADMIN),
        MIGRATOR,
        DISTRIBUTOR,
        governance_hook,
    ));
}

// Build genesis storage according to the mock runtime.
pub fn new_test_ext() -> sp_io::TestExternalities {
    set_now(GENESIS_TIME);
    set_hook_mode(HookMode::Accept);
    clear_hook_calls();
    ADDRESSES.with(|addresses| addresses.borrow_mut().clear());

    let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

    pallet_governance_token::GenesisConfig::<Test> {
        token_name: b"Test Governance".to_vec(),
        token_symbol: b"TGV".to_vec(),
        decimals: 18,
        initial_balances: vec![(2, 1_000_000), (3, 500_000), (HOLDER, 100)],
    }
    .assimilate_storage(&mut t)
    .unwrap();

    let mut ext = sp_io::TestExternalities::new(t);
    ext.execute_with(|| System::set_block_number(1));
    ext
}
