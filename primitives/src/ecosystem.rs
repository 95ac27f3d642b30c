//! Ecosystem Constants for the Launch Pallets
//!
//! This module centralizes all system-level constants: pallet IDs for
//! deriving pallet-owned accounts and the fundamental economic parameters of
//! the decaying transfer tax and the one-shot liquidity bootstrap.
//!
//! These constants are the single source of truth for system architecture and
//! are re-used across runtime configurations via the primitives crate.

/// Balance type alias for consistency across the ecosystem
pub type Balance = u128;

/// Pallet identifiers for deriving pallet-owned accounts.
///
/// These IDs are used by Polkadot SDK's `PalletId::into_account_truncating()`
/// to deterministically generate accounts for pallet-specific operations.
pub mod pallet_ids {
  /// Transfer Tax pallet ID (decaying transfer tax engine)
  pub const TRANSFER_TAX_PALLET_ID: &[u8; 8] = b"transtax";

  /// Liquidity Bootstrap pallet ID; its derived account is the custody
  /// account that holds the minted launch supply until bootstrap drains it
  pub const LIQUIDITY_BOOTSTRAP_PALLET_ID: &[u8; 8] = b"liqboot0";
}

/// Economic parameters shared by the launch pallets.
pub mod params {
  use super::Balance;

  /// Basis-point denominator for slippage arithmetic (100% = 10_000 bps).
  pub const BPS_DENOMINATOR: Balance = 10_000;

  /// Lowest accepted slippage tolerance for a liquidity add (0.01%).
  pub const MIN_SLIPPAGE_BPS: u16 = 1;

  /// Highest accepted slippage tolerance for a liquidity add (10%).
  ///
  /// Liquidity adds requesting a wider tolerance are rejected outright: a
  /// tolerance above 10% no longer protects the custody-held supply from a
  /// sandwiched add.
  pub const MAX_SLIPPAGE_BPS: u16 = 1_000;

  /// Upper bound of the transfer-tax domain, in whole percent.
  pub const MAX_TAX_PERCENT: u8 = 100;

  /// Execution deadline handed to the liquidity-adding collaborator,
  /// relative to the current time (1 hour).
  pub const LIQUIDITY_ADD_DEADLINE_SECS: u64 = 3_600;
}
