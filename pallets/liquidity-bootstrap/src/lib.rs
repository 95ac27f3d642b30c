//! Liquidity Bootstrap Pallet
//!
//! One-shot state machine that pairs the custody-held launch supply with
//! caller-supplied native currency into an initial liquidity position, then
//! forwards every resulting liquidity-position token to the tax recipient.

#![cfg_attr(not(feature = "std"), no_std)]

pub use pallet::*;

#[cfg(test)]
pub mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

/// Helper for benchmarking — prepares assets and funding in benchmark context
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AccountId> {
  fn create_asset(asset_id: u32) -> frame::deps::sp_runtime::DispatchResult;
  fn fund_native(who: &AccountId, amount: u128) -> frame::deps::sp_runtime::DispatchResult;
  fn fund_asset(
    asset_id: u32,
    who: &AccountId,
    amount: u128,
  ) -> frame::deps::sp_runtime::DispatchResult;
}

#[cfg(feature = "runtime-benchmarks")]
impl<AccountId> BenchmarkHelper<AccountId> for () {
  fn create_asset(_asset_id: u32) -> frame::deps::sp_runtime::DispatchResult {
    Ok(())
  }
  fn fund_native(_who: &AccountId, _amount: u128) -> frame::deps::sp_runtime::DispatchResult {
    Ok(())
  }
  fn fund_asset(
    _asset_id: u32,
    _who: &AccountId,
    _amount: u128,
  ) -> frame::deps::sp_runtime::DispatchResult {
    Ok(())
  }
}

#[frame::pallet]
pub mod pallet {
  use super::WeightInfo;
  use frame::deps::{
    frame_support::{
      storage::with_storage_layer,
      traits::{
        EnsureOrigin, UnixTime,
        fungible::{Inspect as NativeInspect, Mutate as NativeMutate},
        fungibles::{
          Inspect as FungiblesInspect, Mutate as FungiblesMutate,
          approvals::Mutate as ApprovalsMutate,
        },
        tokens::Preservation,
      },
    },
    sp_runtime::{DispatchError, traits::AccountIdConversion},
  };
  use frame::prelude::*;
  use primitives::{AssetInspector, AssetKind, params};

  /// Pool registry/factory collaborator. Pools are looked up before they are
  /// created; the returned identity is the pool's liquidity-position token.
  pub trait PoolRegistryApi {
    fn get_pool(asset1: AssetKind, asset2: AssetKind, stable: bool) -> Option<AssetKind>;

    fn create_pool(
      asset1: AssetKind,
      asset2: AssetKind,
      stable: bool,
    ) -> Result<AssetKind, DispatchError>;
  }

  /// Liquidity-adding collaborator. Consumes up to the desired amounts from
  /// `who` (spending approval is granted beforehand), mints the position to
  /// `recipient` and reports what was actually used.
  pub trait LiquidityProviderApi<AccountId, Balance> {
    /// Spending account the approvals are granted to
    fn account_id() -> AccountId;

    fn add_liquidity(
      who: &AccountId,
      asset1: AssetKind,
      asset2: AssetKind,
      stable: bool,
      amount1_desired: Balance,
      amount2_desired: Balance,
      amount1_min: Balance,
      amount2_min: Balance,
      recipient: AccountId,
      deadline: u64,
    ) -> Result<(Balance, Balance, Balance), DispatchError>;
  }

  /// Fee-claim collaborator of the launched pool. Credits accrued fees to
  /// `who` and reports both legs.
  pub trait PoolFeesApi<AccountId, Balance> {
    fn claim_fees(who: &AccountId, pool: AssetKind) -> Result<(Balance, Balance), DispatchError>;
  }

  /// Exchange-wrap collaborator turning native currency into its
  /// exchange-traded ledger form.
  pub trait NativeWrapApi<AccountId> {
    /// Ledger asset id of the wrapped form
    fn wrapped_asset_id() -> u32;

    fn wrap(who: &AccountId, amount: u128) -> Result<(), DispatchError>;
  }

  /// Configuration trait for the liquidity bootstrap pallet
  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// The ledger collaborator for the launch token, the wrapped native form
    /// and liquidity-position tokens
    type Assets: FungiblesInspect<Self::AccountId, AssetId = u32, Balance = u128>
      + FungiblesMutate<Self::AccountId, AssetId = u32, Balance = u128>
      + ApprovalsMutate<Self::AccountId>;

    /// The currency trait for the native side of the pair
    type Currency: NativeInspect<Self::AccountId, Balance = u128>
      + NativeMutate<Self::AccountId, Balance = u128>;

    /// Pool registry/factory collaborator
    type PoolRegistry: PoolRegistryApi;

    /// Liquidity-adding collaborator
    type LiquidityProvider: LiquidityProviderApi<Self::AccountId, u128>;

    /// Fee-claim collaborator of the launched pool
    type PoolFees: PoolFeesApi<Self::AccountId, u128>;

    /// Exchange-wrap collaborator
    type NativeWrap: NativeWrapApi<Self::AccountId>;

    /// Time source for the liquidity-add execution deadline
    type TimeProvider: UnixTime;

    /// The pallet ID; its derived account is the custody account holding the
    /// launch supply until bootstrap drains it
    #[pallet::constant]
    type PalletId: Get<PalletId>;

    /// The launch token paired against the wrapped native form
    #[pallet::constant]
    type TokenAssetId: Get<u32>;

    /// Launch supply minted into custody at genesis
    #[pallet::constant]
    type TotalSupply: Get<u128>;

    /// Destination of the bootstrapped position and of all claimed fees
    #[pallet::constant]
    type TaxRecipient: Get<Self::AccountId>;

    /// Whether the pair is registered as a stable pool
    #[pallet::constant]
    type StablePool: Get<bool>;

    /// Origin allowed to run the bootstrap and claim fees
    type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin, Success = Self::AccountId>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;

    /// Benchmark helper for creating assets in benchmark context
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: crate::BenchmarkHelper<Self::AccountId>;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(_);

  pub type Balance = u128;

  /// Identity of the launched pool, recorded exactly once.
  #[derive(
    Clone, Copy, Encode, Decode, DecodeWithMemTracking, Eq, PartialEq, RuntimeDebug, TypeInfo,
    MaxEncodedLen,
  )]
  pub struct LaunchedPool<BlockNumber> {
    /// Liquidity-position token identifying the pool
    pub lp_asset: AssetKind,
    /// Block at which the pool identity was recorded
    pub created_at: BlockNumber,
  }

  /// The launched pool, absent until bootstrap records it; never reset
  #[pallet::storage]
  #[pallet::getter(fn launched_pool)]
  pub type Pool<T: Config> = StorageValue<_, LaunchedPool<BlockNumberFor<T>>, OptionQuery>;

  /// Guard rejecting reentrant bootstrap/fee-claim invocations
  #[pallet::storage]
  pub type OperationLock<T: Config> = StorageValue<_, bool, ValueQuery>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// No pool existed for the pair; the registry created one
    PoolCreated { lp_asset: AssetKind },
    /// Bootstrap completed and the whole position was forwarded
    Bootstrapped {
      lp_asset: AssetKind,
      token_contributed: Balance,
      native_contributed: Balance,
      lp_forwarded: Balance,
      destination: T::AccountId,
    },
    /// A step after the pool record failed; the pool stays recorded and the
    /// pulled funds stay in custody with no unwind path
    BootstrapStranded {
      lp_asset: AssetKind,
      reason: DispatchError,
    },
    /// Accrued pool fees were claimed and forwarded
    FeesClaimed {
      wrapped_forwarded: Balance,
      token_forwarded: Balance,
      destination: T::AccountId,
    },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// The pool identity is already recorded
    PoolAlreadyCreated,
    /// No pool has been bootstrapped yet
    PoolNotCreated,
    /// A bootstrap or fee claim is already executing
    ReentrantCall,
    /// The declared native contribution is zero
    ZeroNativeAmount,
    /// Slippage tolerance outside the accepted band
    SlippageOutOfRange,
    /// Custody holds no launch tokens to pair
    NoTokensToPair,
    /// The liquidity add consumed less than the computed minimums
    SlippageExceeded,
    /// The registry failed to create the pool
    PoolCreationFailed,
    /// The wrap collaborator rejected the deposit
    WrapFailed,
    /// The liquidity-adding collaborator rejected the add
    LiquidityAdditionFailed,
    /// The add completed without minting a position
    NoLiquidityMinted,
    /// Custody holds no liquidity-position tokens
    NoPositionHeld,
    /// The fee-claim collaborator rejected the claim
    FeeClaimFailed,
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Pair the entire custody-held token balance with `native_amount`
    /// pulled from the caller into an initial liquidity position.
    ///
    /// Callable at most once for the lifetime of the chain. `slippage_bps`
    /// bounds how far the consumed amounts may fall short of the desired
    /// ones, in basis points.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::bootstrap())]
    pub fn bootstrap(
      origin: OriginFor<T>,
      native_amount: Balance,
      slippage_bps: u16,
    ) -> DispatchResult {
      let who = T::AdminOrigin::ensure_origin(origin)?;
      Self::with_operation_lock(|| Self::do_bootstrap(&who, native_amount, slippage_bps))
    }

    /// Claim accrued fees of the launched pool and forward the proceeds to
    /// the tax recipient. Unrestricted in amount and frequency.
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::claim_fees())]
    pub fn claim_fees(origin: OriginFor<T>) -> DispatchResult {
      let _who = T::AdminOrigin::ensure_origin(origin)?;
      Self::with_operation_lock(|| Self::do_claim_fees())
    }
  }

  impl<T: Config> Pallet<T> {
    /// Custody account derived from the pallet ID
    pub fn account_id() -> T::AccountId {
      T::PalletId::get().into_account_truncating()
    }

    /// Single in-flight operation guard: acquired on entry, released on
    /// every exit path.
    fn with_operation_lock(f: impl FnOnce() -> DispatchResult) -> DispatchResult {
      ensure!(!OperationLock::<T>::get(), Error::<T>::ReentrantCall);
      OperationLock::<T>::put(true);
      let result = f();
      OperationLock::<T>::kill();
      result
    }

    fn min_after_slippage(amount: Balance, slippage_bps: u16) -> Balance {
      amount.saturating_mul(params::BPS_DENOMINATOR - slippage_bps as u128)
        / params::BPS_DENOMINATOR
    }

    fn do_bootstrap(
      who: &T::AccountId,
      native_amount: Balance,
      slippage_bps: u16,
    ) -> DispatchResult {
      ensure!(Pool::<T>::get().is_none(), Error::<T>::PoolAlreadyCreated);
      ensure!(native_amount > 0, Error::<T>::ZeroNativeAmount);
      ensure!(
        (params::MIN_SLIPPAGE_BPS..=params::MAX_SLIPPAGE_BPS).contains(&slippage_bps),
        Error::<T>::SlippageOutOfRange
      );

      let custody = Self::account_id();
      let token_id = T::TokenAssetId::get();
      let token_amount = T::Assets::balance(token_id, &custody);
      ensure!(token_amount > 0, Error::<T>::NoTokensToPair);

      // The declared native contribution is pulled in full or the call
      // aborts here with nothing changed.
      <T::Currency as NativeMutate<T::AccountId>>::transfer(
        who,
        &custody,
        native_amount,
        Preservation::Expendable,
      )?;

      let token_asset = AssetKind::Local(token_id);
      let wrapped_asset = AssetKind::Local(T::NativeWrap::wrapped_asset_id());
      let stable = T::StablePool::get();

      let min_token = Self::min_after_slippage(token_amount, slippage_bps);
      let min_native = Self::min_after_slippage(native_amount, slippage_bps);

      // Query first; create only if absent. The identity is recorded before
      // any further external call so a reentrant invocation cannot run the
      // bootstrap again.
      let lp_asset = match T::PoolRegistry::get_pool(token_asset, wrapped_asset, stable) {
        Some(existing) => existing,
        None => {
          let created = T::PoolRegistry::create_pool(token_asset, wrapped_asset, stable)
            .map_err(|_| Error::<T>::PoolCreationFailed)?;
          Self::deposit_event(Event::PoolCreated { lp_asset: created });
          created
        }
      };
      Pool::<T>::put(LaunchedPool {
        lp_asset,
        created_at: frame_system::Pallet::<T>::block_number(),
      });

      // Everything past the pool record runs in a child storage layer. A
      // failure rolls the layer back but the pool stays recorded and the
      // pulled funds stay in custody. There is no unwind path, and a retry
      // is permanently blocked by the recorded pool.
      let outcome = with_storage_layer::<(Balance, Balance, Balance), DispatchError, _>(|| {
        T::NativeWrap::wrap(&custody, native_amount).map_err(|_| Error::<T>::WrapFailed)?;

        let provider = T::LiquidityProvider::account_id();
        let wrapped_id = T::NativeWrap::wrapped_asset_id();
        T::Assets::approve(token_id, &custody, &provider, token_amount)?;
        T::Assets::approve(wrapped_id, &custody, &provider, native_amount)?;

        let deadline = T::TimeProvider::now()
          .as_secs()
          .saturating_add(params::LIQUIDITY_ADD_DEADLINE_SECS);
        let (used_token, used_native, lp_minted) = T::LiquidityProvider::add_liquidity(
          &custody,
          token_asset,
          wrapped_asset,
          stable,
          token_amount,
          native_amount,
          min_token,
          min_native,
          custody.clone(),
          deadline,
        )
        .map_err(|_| Error::<T>::LiquidityAdditionFailed)?;

        ensure!(
          used_token >= min_token && used_native >= min_native,
          Error::<T>::SlippageExceeded
        );
        ensure!(lp_minted > 0, Error::<T>::NoLiquidityMinted);

        let lp_id = lp_asset.local_id().ok_or(Error::<T>::NoLiquidityMinted)?;
        let lp_balance = T::Assets::balance(lp_id, &custody);
        ensure!(lp_balance > 0, Error::<T>::NoLiquidityMinted);
        T::Assets::transfer(
          lp_id,
          &custody,
          &T::TaxRecipient::get(),
          lp_balance,
          Preservation::Expendable,
        )?;
        Ok((used_token, used_native, lp_balance))
      });

      match outcome {
        Ok((token_contributed, native_contributed, lp_forwarded)) => {
          Self::deposit_event(Event::Bootstrapped {
            lp_asset,
            token_contributed,
            native_contributed,
            lp_forwarded,
            destination: T::TaxRecipient::get(),
          });
          Ok(())
        }
        Err(reason) => {
          Self::deposit_event(Event::BootstrapStranded { lp_asset, reason });
          Ok(())
        }
      }
    }

    fn do_claim_fees() -> DispatchResult {
      let pool = Pool::<T>::get().ok_or(Error::<T>::PoolNotCreated)?;
      let custody = Self::account_id();
      let lp_id = pool.lp_asset.local_id().ok_or(Error::<T>::PoolNotCreated)?;

      let lp_balance = T::Assets::balance(lp_id, &custody);
      ensure!(lp_balance > 0, Error::<T>::NoPositionHeld);

      T::PoolFees::claim_fees(&custody, pool.lp_asset).map_err(|_| Error::<T>::FeeClaimFailed)?;

      let recipient = T::TaxRecipient::get();

      let wrapped_id = T::NativeWrap::wrapped_asset_id();
      let wrapped_balance = T::Assets::balance(wrapped_id, &custody);
      if wrapped_balance > 0 {
        T::Assets::transfer(
          wrapped_id,
          &custody,
          &recipient,
          wrapped_balance,
          Preservation::Expendable,
        )?;
      }

      // Any launch tokens beyond the held position are fee proceeds.
      let token_id = T::TokenAssetId::get();
      let token_balance = T::Assets::balance(token_id, &custody);
      let token_excess = token_balance.saturating_sub(lp_balance);
      if token_excess > 0 {
        T::Assets::transfer(
          token_id,
          &custody,
          &recipient,
          token_excess,
          Preservation::Expendable,
        )?;
      }

      Self::deposit_event(Event::FeesClaimed {
        wrapped_forwarded: wrapped_balance,
        token_forwarded: token_excess,
        destination: recipient,
      });
      Ok(())
    }
  }

  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    #[serde(skip)]
    pub _marker: core::marker::PhantomData<T>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      let custody = Pallet::<T>::account_id();
      frame_system::Pallet::<T>::inc_providers(&custody);
      let supply = T::TotalSupply::get();
      if supply > 0 {
        T::Assets::mint_into(T::TokenAssetId::get(), &custody, supply)
          .expect("launch supply is minted into custody at genesis");
      }
    }
  }
}
