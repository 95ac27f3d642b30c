//! Transfer Tax Pallet
//!
//! Applies a block-height-driven, linearly decaying tax to launch-token
//! transfers and forwards the tax portion to a fixed recipient.

#![cfg_attr(not(feature = "std"), no_std)]

pub use pallet::*;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

/// Helper for benchmarking — creates the launch token and funds holders in
/// benchmark context
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AccountId> {
  fn create_asset(asset_id: u32) -> frame::deps::sp_runtime::DispatchResult;
  fn fund_account(
    who: &AccountId,
    asset_id: u32,
    amount: u128,
  ) -> frame::deps::sp_runtime::DispatchResult;
}

#[cfg(feature = "runtime-benchmarks")]
impl<AccountId> BenchmarkHelper<AccountId> for () {
  fn create_asset(_asset_id: u32) -> frame::deps::sp_runtime::DispatchResult {
    Ok(())
  }
  fn fund_account(
    _who: &AccountId,
    _asset_id: u32,
    _amount: u128,
  ) -> frame::deps::sp_runtime::DispatchResult {
    Ok(())
  }
}

#[frame::pallet]
pub mod pallet {
  use super::WeightInfo;
  use frame::deps::{
    frame_support::traits::{
      fungibles::{Inspect as FungiblesInspect, Mutate as FungiblesMutate},
      tokens::{Fortitude, Precision, Preservation},
    },
    sp_runtime::{
      Percent,
      traits::{Saturating, UniqueSaturatedInto, Zero},
    },
  };
  use frame::prelude::*;

  /// Configuration trait for the transfer tax pallet
  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// The ledger collaborator tracking launch-token balances.
    ///
    /// Approval handling stays inside the ledger; the runtime's ledger is
    /// expected to enforce the conservative approval policy (an approval may
    /// only move between zero and a non-zero value, with guarded
    /// increase/decrease operations). This pallet never touches allowances.
    type Assets: FungiblesInspect<Self::AccountId, AssetId = u32, Balance = u128>
      + FungiblesMutate<Self::AccountId, AssetId = u32, Balance = u128>;

    /// The launch token whose transfers carry the tax
    #[pallet::constant]
    type TokenAssetId: Get<u32>;

    /// Sole destination of every tax posting
    #[pallet::constant]
    type TaxRecipient: Get<Self::AccountId>;

    /// Custody account holding the launch supply before bootstrap; transfers
    /// touching it on either side are exempt from the tax split
    #[pallet::constant]
    type CustodyAccount: Get<Self::AccountId>;

    /// Tax percent in force from deployment until the decay schedule starts
    #[pallet::constant]
    type InitialTaxPercent: Get<u8>;

    /// Number of blocks the initial tax percent stays in force
    #[pallet::constant]
    type InitialDurationBlocks: Get<BlockNumberFor<Self>>;

    /// Block interval between successive tax reductions
    #[pallet::constant]
    type ReductionIntervalBlocks: Get<BlockNumberFor<Self>>;

    /// Percentage points shaved off per elapsed reduction interval
    #[pallet::constant]
    type ReductionStepPercent: Get<u8>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;

    /// Benchmark helper for creating the token in benchmark context
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: crate::BenchmarkHelper<Self::AccountId>;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(_);

  pub type Balance = u128;

  /// Decay lifecycle of the transfer tax.
  ///
  /// `Complete` is terminal: once the computed tax first reaches zero the
  /// phase flips and every later rate query answers zero, regardless of what
  /// the schedule arithmetic would yield.
  #[derive(
    Clone,
    Copy,
    Default,
    Encode,
    Decode,
    DecodeWithMemTracking,
    Eq,
    PartialEq,
    RuntimeDebug,
    TypeInfo,
    MaxEncodedLen,
  )]
  pub enum DecayPhase {
    /// The schedule still yields a non-zero tax
    #[default]
    Active,
    /// The tax has reached zero and stays there
    Complete,
  }

  /// Snapshot of the immutable schedule parameters plus the recorded
  /// deployment block
  #[derive(Clone, Encode, Decode, DecodeWithMemTracking, Eq, PartialEq, RuntimeDebug, TypeInfo)]
  pub struct TaxSchedule<BlockNumber> {
    pub initial_tax_percent: u8,
    pub initial_duration_blocks: BlockNumber,
    pub reduction_interval_blocks: BlockNumber,
    pub reduction_step_percent: u8,
    pub deployment_block: BlockNumber,
  }

  /// Block height recorded when the pallet was built into the chain
  #[pallet::storage]
  #[pallet::getter(fn deployment_block)]
  pub type DeploymentBlock<T: Config> = StorageValue<_, BlockNumberFor<T>, ValueQuery>;

  /// Current decay lifecycle state
  #[pallet::storage]
  #[pallet::getter(fn decay_phase)]
  pub type DecayState<T: Config> = StorageValue<_, DecayPhase, ValueQuery>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// A taxed ledger posting settled
    Transferred {
      from: T::AccountId,
      to: T::AccountId,
      net_amount: Balance,
      tax_amount: Balance,
    },
    /// The decay schedule reached zero; the tax is retired for good
    TaxDecayCompleted { at_block: BlockNumberFor<T> },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// A posting needs at least one concrete endpoint
    InvalidPosting,
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Move launch tokens to `to`, splitting off the current tax.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::transfer())]
    pub fn transfer(origin: OriginFor<T>, to: T::AccountId, amount: Balance) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::settle(Some(&who), Some(&to), amount)
    }
  }

  impl<T: Config> Pallet<T> {
    /// Tax percent in force at `now`, in [0, 100].
    pub fn current_tax(now: BlockNumberFor<T>) -> u8 {
      match DecayState::<T>::get() {
        DecayPhase::Complete => 0,
        DecayPhase::Active => Self::scheduled_tax(now),
      }
    }

    /// Schedule arithmetic alone, ignoring the sticky completion state.
    fn scheduled_tax(now: BlockNumberFor<T>) -> u8 {
      let start = DeploymentBlock::<T>::get().saturating_add(T::InitialDurationBlocks::get());
      if now < start {
        return T::InitialTaxPercent::get();
      }
      let elapsed: u128 = now.saturating_sub(start).unique_saturated_into();
      let interval: u128 = T::ReductionIntervalBlocks::get().unique_saturated_into();
      if interval.is_zero() {
        // Genesis validation rules this out; hold the initial rate if it
        // slips through anyway rather than divide by zero.
        return T::InitialTaxPercent::get();
      }
      let steps = elapsed / interval;
      // Widened domain: the reduction can exceed the initial percent long
      // before u8 arithmetic could represent it.
      let reduction = steps.saturating_mul(T::ReductionStepPercent::get() as u128);
      (T::InitialTaxPercent::get() as u128).saturating_sub(reduction) as u8
    }

    /// Flip the decay state to `Complete` the first time the schedule
    /// reaches zero. Invoked on every transfer before the rate is read.
    pub fn refresh_decay_status(now: BlockNumberFor<T>) {
      if DecayState::<T>::get() == DecayPhase::Active && Self::scheduled_tax(now) == 0 {
        DecayState::<T>::put(DecayPhase::Complete);
        Self::deposit_event(Event::TaxDecayCompleted { at_block: now });
      }
    }

    /// Ledger posting layer.
    ///
    /// A `None` origin mints, a `None` destination burns; both bypass the tax
    /// split entirely. A posting between two accounts settles as a tax
    /// posting to the recipient followed by the net posting to the
    /// destination, unless an endpoint is the custody account or the rate
    /// is zero, in which case the full amount moves in one posting.
    pub fn settle(
      from: Option<&T::AccountId>,
      to: Option<&T::AccountId>,
      amount: Balance,
    ) -> DispatchResult {
      let asset = T::TokenAssetId::get();
      match (from, to) {
        (None, Some(dest)) => {
          T::Assets::mint_into(asset, dest, amount)?;
          Ok(())
        }
        (Some(origin), None) => {
          T::Assets::burn_from(
            asset,
            origin,
            amount,
            Preservation::Expendable,
            Precision::Exact,
            Fortitude::Polite,
          )?;
          Ok(())
        }
        (Some(origin), Some(dest)) => Self::taxed_transfer(origin, dest, amount),
        (None, None) => Err(Error::<T>::InvalidPosting.into()),
      }
    }

    fn taxed_transfer(from: &T::AccountId, to: &T::AccountId, amount: Balance) -> DispatchResult {
      let now = frame_system::Pallet::<T>::block_number();
      Self::refresh_decay_status(now);

      let custody = T::CustodyAccount::get();
      let exempt = *from == custody || *to == custody;
      let rate = if exempt { 0 } else { Self::current_tax(now) };

      let tax_amount = if rate == 0 {
        0
      } else {
        Percent::from_percent(rate).mul_floor(amount)
      };
      let net_amount = amount.saturating_sub(tax_amount);

      let asset = T::TokenAssetId::get();
      if !tax_amount.is_zero() {
        T::Assets::transfer(
          asset,
          from,
          &T::TaxRecipient::get(),
          tax_amount,
          Preservation::Expendable,
        )?;
      }
      T::Assets::transfer(asset, from, to, net_amount, Preservation::Expendable)?;

      Self::deposit_event(Event::Transferred {
        from: from.clone(),
        to: to.clone(),
        net_amount,
        tax_amount,
      });
      Ok(())
    }

    /// The immutable schedule as configured, with the recorded deployment
    /// block
    pub fn schedule() -> TaxSchedule<BlockNumberFor<T>> {
      TaxSchedule {
        initial_tax_percent: T::InitialTaxPercent::get(),
        initial_duration_blocks: T::InitialDurationBlocks::get(),
        reduction_interval_blocks: T::ReductionIntervalBlocks::get(),
        reduction_step_percent: T::ReductionStepPercent::get(),
        deployment_block: DeploymentBlock::<T>::get(),
      }
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
      assert!(
        T::InitialTaxPercent::get() <= primitives::params::MAX_TAX_PERCENT,
        "initial tax percent must not exceed 100",
      );
      assert!(
        !T::ReductionIntervalBlocks::get().is_zero(),
        "reduction interval must be positive",
      );
      DeploymentBlock::<T>::put(frame_system::Pallet::<T>::block_number());
      DecayState::<T>::put(DecayPhase::Active);
    }
  }
}
