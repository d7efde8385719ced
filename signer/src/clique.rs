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

//! Proof-of-authority seal pre-image.
//!
//! A clique signer signs the hash of the header RLP with the trailing
//! 65 byte signature slot excluded from the extra-data. Headers whose
//! extra-data cannot hold the signature are rejected with an error rather
//! than a panic further down in the RLP layer.

use ethereum_types::H256;
use keccak_hash::keccak;

use crate::error::Error;
use crate::header::{Header, Seal};

/// Length of the signer signature at the tail of the extra-data.
pub const SIGNATURE_LENGTH: usize = 65;

/// Returns the seal hash and the RLP it was computed over: the header with
/// the signature trailer stripped and every seal field retained.
pub fn seal_hash_and_rlp(header: &Header) -> Result<(H256, Vec<u8>), Error> {
	let extra = header.extra_data();
	if extra.len() < SIGNATURE_LENGTH {
		return Err(Error::ExtraDataTooShort(extra.len()));
	}

	let mut stripped = header.clone();
	stripped.set_extra_data(extra[..extra.len() - SIGNATURE_LENGTH].to_vec());

	let rlp = stripped.rlp(Seal::With);
	let hash = keccak(&rlp);
	trace!(target: "signer", "clique seal pre-image assembled for block {}", header.number());
	Ok((hash, rlp))
}
