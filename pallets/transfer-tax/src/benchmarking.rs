#![cfg(feature = "runtime-benchmarks")]

use super::*;
use frame::deps::frame_support::traits::{Get, fungibles::Inspect};
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_system::RawOrigin;

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn transfer() {
    let caller: T::AccountId = whitelisted_caller();
    let dest: T::AccountId = account("dest", 0, 0);
    let asset_id = T::TokenAssetId::get();
    let amount: u128 = 1_000_000;

    T::BenchmarkHelper::create_asset(asset_id).unwrap();
    T::BenchmarkHelper::fund_account(&caller, asset_id, amount * 2).unwrap();

    #[extrinsic_call]
    transfer(RawOrigin::Signed(caller), dest.clone(), amount);

    assert!(T::Assets::balance(asset_id, &dest) > 0);
  }

  impl_benchmark_test_suite!(Pallet, crate::mock::new_test_ext(), crate::mock::Test);
}
