#![cfg(feature = "runtime-benchmarks")]

use super::*;
use frame::deps::frame_support::traits::{EnsureOrigin, Get, fungibles::Inspect};
use polkadot_sdk::frame_benchmarking::v2::*;
use primitives::AssetInspector;

const NATIVE_AMOUNT: u128 = 1_000_000_000;
const SLIPPAGE_BPS: u16 = 500;

fn admin_origin_and_caller<T: Config>() -> Result<(T::RuntimeOrigin, T::AccountId), BenchmarkError>
{
  let origin = T::AdminOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;
  let caller =
    T::AdminOrigin::ensure_origin(origin.clone()).map_err(|_| BenchmarkError::Weightless)?;
  Ok((origin, caller))
}

fn prepare_bootstrap<T: Config>(caller: &T::AccountId) -> Result<(), BenchmarkError> {
  T::BenchmarkHelper::create_asset(T::TokenAssetId::get())
    .map_err(|_| BenchmarkError::Stop("asset setup failed"))?;
  T::BenchmarkHelper::create_asset(T::NativeWrap::wrapped_asset_id())
    .map_err(|_| BenchmarkError::Stop("asset setup failed"))?;
  T::BenchmarkHelper::fund_native(caller, NATIVE_AMOUNT * 2)
    .map_err(|_| BenchmarkError::Stop("funding failed"))?;
  if T::Assets::balance(T::TokenAssetId::get(), &Pallet::<T>::account_id()) == 0 {
    T::BenchmarkHelper::fund_asset(
      T::TokenAssetId::get(),
      &Pallet::<T>::account_id(),
      NATIVE_AMOUNT,
    )
    .map_err(|_| BenchmarkError::Stop("funding failed"))?;
  }
  Ok(())
}

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn bootstrap() -> Result<(), BenchmarkError> {
    let (origin, caller) = admin_origin_and_caller::<T>()?;
    prepare_bootstrap::<T>(&caller)?;

    #[extrinsic_call]
    bootstrap(origin as T::RuntimeOrigin, NATIVE_AMOUNT, SLIPPAGE_BPS);

    assert!(Pool::<T>::get().is_some());
    Ok(())
  }

  #[benchmark]
  fn claim_fees() -> Result<(), BenchmarkError> {
    let (origin, caller) = admin_origin_and_caller::<T>()?;
    prepare_bootstrap::<T>(&caller)?;
    Pallet::<T>::bootstrap(origin.clone(), NATIVE_AMOUNT, SLIPPAGE_BPS)
      .map_err(|_| BenchmarkError::Stop("bootstrap failed"))?;
    let pool = Pool::<T>::get().ok_or(BenchmarkError::Stop("pool missing"))?;
    let lp_id = pool
      .lp_asset
      .local_id()
      .ok_or(BenchmarkError::Stop("pool missing"))?;
    T::BenchmarkHelper::fund_asset(lp_id, &Pallet::<T>::account_id(), 1_000)
      .map_err(|_| BenchmarkError::Stop("funding failed"))?;

    #[extrinsic_call]
    claim_fees(origin as T::RuntimeOrigin);

    Ok(())
  }

  impl_benchmark_test_suite!(Pallet, crate::mock::new_test_ext(), crate::mock::Test);
}
