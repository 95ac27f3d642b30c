use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

/// This enum is the single source of truth for asset classification across the
/// launch pallets, enabling type-safe interactions between the transfer-tax
/// engine, the liquidity bootstrap and the pool collaborators.
///
/// - `Native`: The system's native currency (managed by pallet-balances).
/// - `Local(u32)`: Ledger assets (managed by pallet-assets): the launch
///   token, the wrapped form of the native currency and liquidity-position
///   tokens minted by the pool collaborator.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Default,
  Encode,
  Eq,
  MaxEncodedLen,
  Ord,
  PartialEq,
  PartialOrd,
  TypeInfo,
  Serialize,
  Deserialize,
)]
pub enum AssetKind {
  /// Native currency managed by pallet-balances
  #[default]
  Native,
  /// Ledger asset managed by pallet-assets
  Local(u32),
}

impl From<u32> for AssetKind {
  fn from(asset_id: u32) -> Self {
    AssetKind::Local(asset_id)
  }
}

// Bitmask Architecture for Asset Classification
//
// 32-bit ID Structure:
// [ 4 bits: Type ] [ 28 bits: Index/ID ]
//
// Types:
// 0x1... -> Standard tokens (the launch token, the wrapped native form)
// 0x4... -> Liquidity-position tokens minted by the pool collaborator

pub const MASK_TYPE: u32 = 0xF000_0000;
pub const MASK_INDEX: u32 = 0x0FFF_FFFF;

pub const TYPE_STD: u32 = 0x1000_0000;
pub const TYPE_LP: u32 = 0x4000_0000;

/// Helper trait to inspect AssetKind properties
pub trait AssetInspector {
  fn is_native(&self) -> bool;
  fn local_id(&self) -> Option<u32>;

  // Bitmask checks
  fn is_std(&self) -> bool;
  fn is_lp(&self) -> bool;
}

impl AssetInspector for AssetKind {
  fn is_native(&self) -> bool {
    matches!(self, AssetKind::Native)
  }

  fn local_id(&self) -> Option<u32> {
    match self {
      AssetKind::Local(id) => Some(*id),
      _ => None,
    }
  }

  fn is_std(&self) -> bool {
    match self {
      AssetKind::Local(id) => (id & MASK_TYPE) == TYPE_STD,
      _ => false,
    }
  }

  fn is_lp(&self) -> bool {
    match self {
      AssetKind::Local(id) => (id & MASK_TYPE) == TYPE_LP,
      _ => false,
    }
  }
}

/// Helper to construct compile-time IDs
pub const fn make_id(type_mask: u32, index: u32) -> u32 {
  type_mask | (index & MASK_INDEX)
}

/// Well-known asset constants serving as system defaults
pub mod well_known {
  use super::*;

  /// The launch token whose transfers carry the decaying tax
  pub const LAUNCH_TOKEN: u32 = make_id(TYPE_STD, 1);

  /// Exchange-traded wrapped form of the native currency
  pub const WRAPPED_NATIVE: u32 = make_id(TYPE_STD, 2);
}
