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

//! Intended-validator signing pre-image: `0x19 0x00 ‖ address ‖ payload`.

use ethereum_types::{Address, H256};
use keccak_hash::keccak;
use rustc_hex::FromHex;
use serde_json::Value;

use crate::error::Error;

/// Address of the intended validator and the application payload to sign.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorData {
	/// the contract intended to validate the signature
	pub address: Address,
	/// application specific payload
	pub message: Vec<u8>,
}

impl ValidatorData {
	/// Parses the loose `{"address": "0x…", "message": "0x…"}` request
	/// mapping. The address must decode to exactly 20 bytes and the
	/// message must not be empty.
	pub fn from_value(value: &Value) -> Result<Self, Error> {
		let object = value.as_object().ok_or(Error::NotAnObject)?;

		let address = object.get("address")
			.and_then(Value::as_str)
			.ok_or(Error::AddressNotString)?;
		let address_bytes = decode_hex(address)?;
		if address_bytes.len() != 20 {
			return Err(Error::InvalidAddress(address.to_owned()));
		}

		let message = object.get("message")
			.and_then(Value::as_str)
			.ok_or(Error::MessageNotString)?;
		let message = decode_hex(message)?;
		if message.is_empty() {
			return Err(Error::EmptyMessage);
		}

		Ok(ValidatorData {
			address: Address::from_slice(&address_bytes),
			message,
		})
	}
}

/// Returns the digest and the raw pre-image it was computed over.
pub fn sign_text_validator(data: &ValidatorData) -> (H256, Vec<u8>) {
	let mut preimage = Vec::with_capacity(2 + 20 + data.message.len());
	preimage.extend_from_slice(b"\x19\x00");
	preimage.extend_from_slice(data.address.as_bytes());
	preimage.extend_from_slice(&data.message);
	(keccak(&preimage), preimage)
}

fn decode_hex(text: &str) -> Result<Vec<u8>, Error> {
	if !text.starts_with("0x") {
		return Err(Error::InvalidHex(text.to_owned()));
	}
	text[2..].from_hex().map_err(|_| Error::InvalidHex(text.to_owned()))
}
