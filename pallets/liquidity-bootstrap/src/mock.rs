extern crate alloc;

use crate as pallet_liquidity_bootstrap;
use crate::{LiquidityProviderApi, NativeWrapApi, PoolFeesApi, PoolRegistryApi};
use polkadot_sdk::frame_support::traits::fungible::Mutate as NativeMutate;
use polkadot_sdk::frame_support::traits::fungibles::approvals::Mutate as ApprovalsMutate;
use polkadot_sdk::frame_support::traits::fungibles::Mutate;
use polkadot_sdk::frame_support::traits::tokens::{Fortitude, Precision, Preservation};
use polkadot_sdk::frame_support::traits::UnixTime;
use polkadot_sdk::frame_support::{
  construct_runtime, derive_impl, ord_parameter_types, parameter_types,
  traits::{ConstBool, ConstU32, ConstU64, ConstU128, Get},
  PalletId,
};
use polkadot_sdk::frame_system::{self, EnsureSignedBy};
use polkadot_sdk::sp_runtime::{
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup, IntegerSquareRoot},
  BuildStorage, DispatchError, DispatchResult,
};
use primitives::{make_id, well_known, AssetInspector, AssetKind, TYPE_LP};
use std::cell::RefCell;
use std::collections::BTreeMap;

pub const TOKEN: u32 = well_known::LAUNCH_TOKEN;
pub const WRAPPED: u32 = well_known::WRAPPED_NATIVE;

pub const OWNER: u64 = 1;
pub const OUTSIDER: u64 = 2;
pub const TAX_RECIPIENT: u64 = 901;
pub const PROVIDER: u64 = 777;
pub const POOL_SINK: u64 = 888;

pub const TOTAL_SUPPLY: u128 = 1_000_000_000;

thread_local! {
    pub static POOLS: RefCell<BTreeMap<(AssetKind, AssetKind, bool), AssetKind>> = const { RefCell::new(BTreeMap::new()) };
    pub static RESERVES: RefCell<BTreeMap<u32, (u128, u128)>> = const { RefCell::new(BTreeMap::new()) };
    pub static NEXT_LP_INDEX: RefCell<u32> = const { RefCell::new(1) };
    pub static USED_OVERRIDE: RefCell<Option<(u128, u128)>> = const { RefCell::new(None) };
    pub static FAIL_WRAP: RefCell<bool> = const { RefCell::new(false) };
    pub static FAIL_ADD_LIQUIDITY: RefCell<bool> = const { RefCell::new(false) };
    pub static FAIL_CLAIM: RefCell<bool> = const { RefCell::new(false) };
    pub static PENDING_FEES: RefCell<(u128, u128)> = const { RefCell::new((0, 0)) };
    pub static LAST_DEADLINE: RefCell<Option<u64>> = const { RefCell::new(None) };
    pub static REENTER_ON_CLAIM: RefCell<bool> = const { RefCell::new(false) };
    pub static REENTER_RESULT: RefCell<Option<DispatchResult>> = const { RefCell::new(None) };
    pub static NOW_SECS: RefCell<u64> = const { RefCell::new(1_700_000_000) };
}

fn pool_key(asset_a: AssetKind, asset_b: AssetKind, stable: bool) -> (AssetKind, AssetKind, bool) {
  if asset_a < asset_b {
    (asset_a, asset_b, stable)
  } else {
    (asset_b, asset_a, stable)
  }
}

pub fn set_used_override(used_token: u128, used_native: u128) {
  USED_OVERRIDE.with(|o| *o.borrow_mut() = Some((used_token, used_native)));
}

pub fn set_pending_fees(wrapped_amount: u128, token_amount: u128) {
  PENDING_FEES.with(|f| *f.borrow_mut() = (wrapped_amount, token_amount));
}

pub fn last_deadline() -> Option<u64> {
  LAST_DEADLINE.with(|d| *d.borrow())
}

type Block = frame_system::mocking::MockBlock<Test>;

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Balances: polkadot_sdk::pallet_balances,
    Assets: polkadot_sdk::pallet_assets,
    LiquidityBootstrap: pallet_liquidity_bootstrap,
  }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
  type Block = Block;
  type AccountId = u64;
  type Lookup = IdentityLookup<Self::AccountId>;
  type Hash = H256;
  type Hashing = BlakeTwo256;
  type AccountData = polkadot_sdk::pallet_balances::AccountData<u128>;
}

impl polkadot_sdk::pallet_balances::Config for Test {
  type MaxLocks = ();
  type MaxReserves = ();
  type ReserveIdentifier = [u8; 8];
  type Balance = u128;
  type DustRemoval = ();
  type RuntimeEvent = RuntimeEvent;
  type ExistentialDeposit = ConstU128<1>;
  type AccountStore = System;
  type WeightInfo = ();
  type FreezeIdentifier = ();
  type MaxFreezes = ();
  type RuntimeHoldReason = ();
  type RuntimeFreezeReason = ();
  type DoneSlashHandler = ();
}

impl polkadot_sdk::pallet_assets::Config for Test {
  type RuntimeEvent = RuntimeEvent;
  type Balance = u128;
  type AssetId = u32;
  type AssetIdParameter = u32;
  type Currency = Balances;
  type CreateOrigin = polkadot_sdk::frame_support::traits::AsEnsureOriginWithArg<
    frame_system::EnsureSigned<Self::AccountId>,
  >;
  type ForceOrigin = frame_system::EnsureRoot<Self::AccountId>;
  type AssetDeposit = ConstU128<1>;
  type AssetAccountDeposit = ConstU128<1>;
  type MetadataDepositBase = ConstU128<1>;
  type MetadataDepositPerByte = ConstU128<1>;
  type ApprovalDeposit = ConstU128<0>;
  type StringLimit = ConstU32<50>;
  type Freezer = ();
  type Extra = ();
  type ReserveData = ();
  type CallbackHandle = ();
  type WeightInfo = ();
  type RemoveItemsLimit = ConstU32<5>;
  type Holder = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = AssetBenchmarkHelper;
}

#[cfg(feature = "runtime-benchmarks")]
pub struct AssetBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl polkadot_sdk::pallet_assets::BenchmarkHelper<u32, ()> for AssetBenchmarkHelper {
  fn create_asset_id_parameter(id: u32) -> u32 {
    id
  }
  fn create_reserve_id_parameter(_id: u32) -> () {
    ()
  }
}

pub struct MockPoolRegistry;
impl PoolRegistryApi for MockPoolRegistry {
  fn get_pool(asset1: AssetKind, asset2: AssetKind, stable: bool) -> Option<AssetKind> {
    let key = pool_key(asset1, asset2, stable);
    POOLS.with(|p| p.borrow().get(&key).cloned())
  }

  fn create_pool(
    asset1: AssetKind,
    asset2: AssetKind,
    stable: bool,
  ) -> Result<AssetKind, DispatchError> {
    let key = pool_key(asset1, asset2, stable);
    if POOLS.with(|p| p.borrow().contains_key(&key)) {
      return Err(DispatchError::Other("pool already exists"));
    }
    let lp_id = NEXT_LP_INDEX.with(|n| {
      let mut index = n.borrow_mut();
      let id = make_id(TYPE_LP, *index);
      *index += 1;
      id
    });
    Assets::force_create(RuntimeOrigin::root(), lp_id, OWNER, true, 1)?;
    POOLS.with(|p| p.borrow_mut().insert(key, AssetKind::Local(lp_id)));
    RESERVES.with(|r| r.borrow_mut().insert(lp_id, (0, 0)));
    Ok(AssetKind::Local(lp_id))
  }
}

pub struct MockLiquidityProvider;
impl LiquidityProviderApi<u64, u128> for MockLiquidityProvider {
  fn account_id() -> u64 {
    PROVIDER
  }

  fn add_liquidity(
    who: &u64,
    asset1: AssetKind,
    asset2: AssetKind,
    stable: bool,
    amount1_desired: u128,
    amount2_desired: u128,
    _amount1_min: u128,
    _amount2_min: u128,
    recipient: u64,
    deadline: u64,
  ) -> Result<(u128, u128, u128), DispatchError> {
    LAST_DEADLINE.with(|d| *d.borrow_mut() = Some(deadline));
    if FAIL_ADD_LIQUIDITY.with(|f| *f.borrow()) {
      return Err(DispatchError::Other("add_liquidity unavailable"));
    }

    let key = pool_key(asset1, asset2, stable);
    let lp_asset = POOLS
      .with(|p| p.borrow().get(&key).cloned())
      .ok_or(DispatchError::Other("pool not found"))?;
    let lp_id = lp_asset
      .local_id()
      .ok_or(DispatchError::Other("bad lp asset"))?;

    let (used1, used2) = USED_OVERRIDE
      .with(|o| *o.borrow())
      .unwrap_or((amount1_desired, amount2_desired));

    // Spend the granted approvals, exactly like the real router pulls both
    // legs from the caller.
    for (asset, used) in [(asset1, used1), (asset2, used2)] {
      let id = asset
        .local_id()
        .ok_or(DispatchError::Other("native leg unsupported"))?;
      if used > 0 {
        <Assets as ApprovalsMutate<u64>>::transfer_from(id, who, &PROVIDER, &POOL_SINK, used)?;
      }
    }

    let minted = RESERVES.with(|r| {
      let mut reserves = r.borrow_mut();
      let entry = reserves.entry(lp_id).or_insert((0, 0));
      let minted = if entry.0 == 0 && entry.1 == 0 {
        used1.saturating_mul(used2).integer_sqrt()
      } else {
        // Proportional to the smaller share of the existing reserves.
        let share1 = used1.saturating_mul(1_000_000_000) / entry.0.max(1);
        let share2 = used2.saturating_mul(1_000_000_000) / entry.1.max(1);
        share1.min(share2)
      };
      entry.0 += used1;
      entry.1 += used2;
      minted
    });

    if minted > 0 {
      <Assets as Mutate<u64>>::mint_into(lp_id, &recipient, minted)?;
    }
    Ok((used1, used2, minted))
  }
}

pub struct MockNativeWrap;
impl NativeWrapApi<u64> for MockNativeWrap {
  fn wrapped_asset_id() -> u32 {
    WRAPPED
  }

  fn wrap(who: &u64, amount: u128) -> Result<(), DispatchError> {
    if FAIL_WRAP.with(|f| *f.borrow()) {
      return Err(DispatchError::Other("wrap unavailable"));
    }
    <Balances as NativeMutate<u64>>::burn_from(
      who,
      amount,
      Preservation::Expendable,
      Precision::Exact,
      Fortitude::Polite,
    )?;
    <Assets as Mutate<u64>>::mint_into(WRAPPED, who, amount)?;
    Ok(())
  }
}

pub struct MockPoolFees;
impl PoolFeesApi<u64, u128> for MockPoolFees {
  fn claim_fees(who: &u64, _pool: AssetKind) -> Result<(u128, u128), DispatchError> {
    if REENTER_ON_CLAIM.with(|f| *f.borrow()) {
      let inner = LiquidityBootstrap::claim_fees(RuntimeOrigin::signed(OWNER));
      REENTER_RESULT.with(|r| *r.borrow_mut() = Some(inner.map(|_| ())));
    }
    if FAIL_CLAIM.with(|f| *f.borrow()) {
      return Err(DispatchError::Other("claim unavailable"));
    }
    let (wrapped_amount, token_amount) = PENDING_FEES.with(|f| core::mem::take(&mut *f.borrow_mut()));
    if wrapped_amount > 0 {
      <Assets as Mutate<u64>>::mint_into(WRAPPED, who, wrapped_amount)?;
    }
    if token_amount > 0 {
      <Assets as Mutate<u64>>::mint_into(TOKEN, who, token_amount)?;
    }
    Ok((wrapped_amount, token_amount))
  }
}

pub struct MockTime;
impl UnixTime for MockTime {
  fn now() -> core::time::Duration {
    core::time::Duration::from_secs(NOW_SECS.with(|n| *n.borrow()))
  }
}

pub struct BootstrapPalletId;
impl Get<PalletId> for BootstrapPalletId {
  fn get() -> PalletId {
    PalletId(*primitives::pallet_ids::LIQUIDITY_BOOTSTRAP_PALLET_ID)
  }
}

ord_parameter_types! {
  pub const Owner: u64 = OWNER;
}

parameter_types! {
  pub static LaunchSupply: u128 = TOTAL_SUPPLY;
}

impl pallet_liquidity_bootstrap::Config for Test {
  type Assets = Assets;
  type Currency = Balances;
  type PoolRegistry = MockPoolRegistry;
  type LiquidityProvider = MockLiquidityProvider;
  type PoolFees = MockPoolFees;
  type NativeWrap = MockNativeWrap;
  type TimeProvider = MockTime;
  type PalletId = BootstrapPalletId;
  type TokenAssetId = ConstU32<TOKEN>;
  type TotalSupply = LaunchSupply;
  type TaxRecipient = ConstU64<TAX_RECIPIENT>;
  type StablePool = ConstBool<false>;
  type AdminOrigin = EnsureSignedBy<Owner, u64>;
  type WeightInfo = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = BootstrapBenchmarkHelper;
}

#[cfg(feature = "runtime-benchmarks")]
pub struct BootstrapBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl pallet_liquidity_bootstrap::BenchmarkHelper<u64> for BootstrapBenchmarkHelper {
  fn create_asset(asset_id: u32) -> polkadot_sdk::sp_runtime::DispatchResult {
    use polkadot_sdk::frame_support::traits::fungibles::Inspect;
    if !<Assets as Inspect<u64>>::asset_exists(asset_id) {
      Assets::force_create(RuntimeOrigin::root(), asset_id, OWNER, true, 1)?;
    }
    Ok(())
  }
  fn fund_native(who: &u64, amount: u128) -> polkadot_sdk::sp_runtime::DispatchResult {
    <Balances as NativeMutate<u64>>::mint_into(who, amount).map(|_| ())
  }
  fn fund_asset(asset_id: u32, who: &u64, amount: u128) -> polkadot_sdk::sp_runtime::DispatchResult {
    Self::create_asset(asset_id)?;
    <Assets as Mutate<u64>>::mint_into(asset_id, who, amount).map(|_| ())
  }
}

pub fn custody() -> u64 {
  LiquidityBootstrap::account_id()
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  let mut t = frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  polkadot_sdk::pallet_assets::GenesisConfig::<Test> {
    assets: alloc::vec![(TOKEN, OWNER, true, 1), (WRAPPED, OWNER, true, 1)],
    metadata: alloc::vec![],
    accounts: alloc::vec![],
    reserves: alloc::vec![],
    next_asset_id: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  pallet_liquidity_bootstrap::GenesisConfig::<Test>::default()
    .assimilate_storage(&mut t)
    .unwrap();

  let mut ext: polkadot_sdk::sp_io::TestExternalities = t.into();
  ext.execute_with(|| System::set_block_number(1));
  ext
}
