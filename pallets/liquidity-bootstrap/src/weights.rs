#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]
#![allow(missing_docs)]

use polkadot_sdk::frame_support::{traits::Get, weights::Weight};
use core::marker::PhantomData;

pub trait WeightInfo {
	fn bootstrap() -> Weight;
	fn claim_fees() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
	fn bootstrap() -> Weight {
		Weight::from_parts(250_000_000, 10000)
			.saturating_add(T::DbWeight::get().reads(10))
			.saturating_add(T::DbWeight::get().writes(12))
	}
	fn claim_fees() -> Weight {
		Weight::from_parts(120_000_000, 8000)
			.saturating_add(T::DbWeight::get().reads(7))
			.saturating_add(T::DbWeight::get().writes(6))
	}
}

impl WeightInfo for () {
	fn bootstrap() -> Weight {
		Weight::from_parts(250_000_000, 10000)
	}
	fn claim_fees() -> Weight {
		Weight::from_parts(120_000_000, 8000)
	}
}
