// Copyright 2015-2020 Parity Technologies (UK) Ltd.
// This file is part of Open Ethereum.

// Open Ethereum is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// Open Ethereum is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with Open Ethereum.  If not, see <http://www.gnu.org/licenses/>.

//! Block header with seal-aware RLP streaming.

use ethereum_types::{Address, Bloom, H256, U256};
use keccak_hash::keccak;
use rlp::RlpStream;

/// Block number within the chain.
pub type BlockNumber = u64;

/// Whether the seal fields are streamed along with the base header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Seal {
	/// include the seal fields
	With,
	/// exclude the seal fields
	Without,
}

/// A block header.
///
/// The seal entries are kept in their raw RLP form so engine-specific
/// fields pass through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
	parent_hash: H256,
	uncles_hash: H256,
	author: Address,
	state_root: H256,
	transactions_root: H256,
	receipts_root: H256,
	log_bloom: Bloom,
	difficulty: U256,
	number: BlockNumber,
	gas_limit: U256,
	gas_used: U256,
	timestamp: u64,
	extra_data: Vec<u8>,
	seal: Vec<Vec<u8>>,
}

impl Header {
	/// Create a new, default-valued, header.
	pub fn new() -> Self {
		Self::default()
	}

	/// The parent hash.
	pub fn parent_hash(&self) -> &H256 { &self.parent_hash }

	/// The uncles hash.
	pub fn uncles_hash(&self) -> &H256 { &self.uncles_hash }

	/// The author (beneficiary).
	pub fn author(&self) -> &Address { &self.author }

	/// The state root.
	pub fn state_root(&self) -> &H256 { &self.state_root }

	/// The transactions root.
	pub fn transactions_root(&self) -> &H256 { &self.transactions_root }

	/// The receipts root.
	pub fn receipts_root(&self) -> &H256 { &self.receipts_root }

	/// The log bloom.
	pub fn log_bloom(&self) -> &Bloom { &self.log_bloom }

	/// The difficulty.
	pub fn difficulty(&self) -> &U256 { &self.difficulty }

	/// The block number.
	pub fn number(&self) -> BlockNumber { self.number }

	/// The gas limit.
	pub fn gas_limit(&self) -> &U256 { &self.gas_limit }

	/// The gas used.
	pub fn gas_used(&self) -> &U256 { &self.gas_used }

	/// The timestamp.
	pub fn timestamp(&self) -> u64 { self.timestamp }

	/// The extra data.
	pub fn extra_data(&self) -> &[u8] { &self.extra_data }

	/// The raw seal fields.
	pub fn seal(&self) -> &[Vec<u8>] { &self.seal }

	/// Set the parent hash.
	pub fn set_parent_hash(&mut self, parent_hash: H256) { self.parent_hash = parent_hash; }

	/// Set the uncles hash.
	pub fn set_uncles_hash(&mut self, uncles_hash: H256) { self.uncles_hash = uncles_hash; }

	/// Set the author.
	pub fn set_author(&mut self, author: Address) { self.author = author; }

	/// Set the state root.
	pub fn set_state_root(&mut self, state_root: H256) { self.state_root = state_root; }

	/// Set the transactions root.
	pub fn set_transactions_root(&mut self, transactions_root: H256) { self.transactions_root = transactions_root; }

	/// Set the receipts root.
	pub fn set_receipts_root(&mut self, receipts_root: H256) { self.receipts_root = receipts_root; }

	/// Set the log bloom.
	pub fn set_log_bloom(&mut self, log_bloom: Bloom) { self.log_bloom = log_bloom; }

	/// Set the difficulty.
	pub fn set_difficulty(&mut self, difficulty: U256) { self.difficulty = difficulty; }

	/// Set the block number.
	pub fn set_number(&mut self, number: BlockNumber) { self.number = number; }

	/// Set the gas limit.
	pub fn set_gas_limit(&mut self, gas_limit: U256) { self.gas_limit = gas_limit; }

	/// Set the gas used.
	pub fn set_gas_used(&mut self, gas_used: U256) { self.gas_used = gas_used; }

	/// Set the timestamp.
	pub fn set_timestamp(&mut self, timestamp: u64) { self.timestamp = timestamp; }

	/// Set the extra data.
	pub fn set_extra_data(&mut self, extra_data: Vec<u8>) { self.extra_data = extra_data; }

	/// Set the raw seal fields.
	pub fn set_seal(&mut self, seal: Vec<Vec<u8>>) { self.seal = seal; }

	/// RLP of this header, with or without the seal fields.
	pub fn rlp(&self, with_seal: Seal) -> Vec<u8> {
		let mut s = RlpStream::new();
		self.stream_rlp(&mut s, with_seal);
		s.out()
	}

	/// The keccak of the RLP with the seal fields included.
	pub fn hash(&self) -> H256 {
		keccak(self.rlp(Seal::With))
	}

	/// The keccak of the RLP without the seal fields.
	pub fn bare_hash(&self) -> H256 {
		keccak(self.rlp(Seal::Without))
	}

	fn stream_rlp(&self, s: &mut RlpStream, with_seal: Seal) {
		let seal_fields = match with_seal {
			Seal::With => self.seal.len(),
			Seal::Without => 0,
		};
		s.begin_list(13 + seal_fields);
		s.append(&self.parent_hash);
		s.append(&self.uncles_hash);
		s.append(&self.author);
		s.append(&self.state_root);
		s.append(&self.transactions_root);
		s.append(&self.receipts_root);
		s.append(&self.log_bloom);
		s.append(&self.difficulty);
		s.append(&self.number);
		s.append(&self.gas_limit);
		s.append(&self.gas_used);
		s.append(&self.timestamp);
		s.append(&self.extra_data);

		if let Seal::With = with_seal {
			for field in &self.seal {
				s.append_raw(field, 1);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rlp::Rlp;

	#[test]
	fn test_item_counts() {
		let mut header = Header::new();
		header.set_number(7);
		header.set_seal(vec![
			rlp::encode(&H256::zero()),
			rlp::encode(&0u64),
		]);

		let with_seal = header.rlp(Seal::With);
		assert_eq!(Rlp::new(&with_seal).item_count().unwrap(), 15);

		let without_seal = header.rlp(Seal::Without);
		assert_eq!(Rlp::new(&without_seal).item_count().unwrap(), 13);

		assert_ne!(header.hash(), header.bare_hash());
	}

	#[test]
	fn test_hash_tracks_contents() {
		let mut header = Header::new();
		let empty = header.hash();
		header.set_extra_data(b"tracked".to_vec());
		assert_ne!(header.hash(), empty);
	}
}
