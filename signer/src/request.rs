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

//! Signing-format tags and the descriptor handed to confirmation UIs.

use std::fmt;

use eip712::NameValueType;
use ethereum_types::{Address, H256};
use rustc_hex::ToHex;
use serde::Serializer;

/// MIME tag and single-byte discriminator of a recognised signing format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigFormat {
	/// MIME tag carried in sign requests
	pub mime: &'static str,
	/// EIP-191 version byte
	pub byte_version: u8,
}

/// `0x19 0x00` prefixed data with an intended validator.
pub const INTENDED_VALIDATOR: SigFormat = SigFormat { mime: "data/validator", byte_version: 0x00 };
/// EIP-712 structured data.
pub const DATA_TYPED: SigFormat = SigFormat { mime: "data/typed", byte_version: 0x01 };
/// Clique block-header seal.
pub const APPLICATION_CLIQUE: SigFormat = SigFormat { mime: "application/x-clique-header", byte_version: 0x02 };
/// Plain personal message.
pub const TEXT_PLAIN: SigFormat = SigFormat { mime: "text/plain", byte_version: 0x45 };

/// Provenance of a signing request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
	/// remote peer address
	pub remote: String,
	/// local endpoint the request arrived on
	pub local: String,
	/// transport scheme
	pub scheme: String,
	/// user agent announced by the caller
	#[serde(rename = "User-Agent")]
	pub user_agent: String,
	/// origin announced by the caller
	#[serde(rename = "Origin")]
	pub origin: String,
}

impl fmt::Display for Metadata {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match serde_json::to_string(self) {
			Ok(json) => write!(f, "{}", json),
			Err(err) => write!(f, "{}", err),
		}
	}
}

/// Everything a confirmation UI needs to display a signing request: the
/// format tag, the raw bytes to be signed, the flattened message tree and
/// the digest the key will actually operate on.
#[derive(Debug, Clone, Serialize)]
pub struct SignDataRequest {
	/// MIME tag of the signing format
	pub content_type: String,
	/// account the caller wants to sign with
	pub address: Address,
	/// raw bytes to be signed, rendered as 0x-prefixed hex on the wire
	#[serde(serialize_with = "serialize_hex")]
	pub raw_data: Vec<u8>,
	/// flattened name/value/type view of the data
	pub messages: Vec<NameValueType>,
	/// the 32 byte digest handed to the key
	pub hash: H256,
	/// request provenance
	pub meta: Metadata,
}

impl SignDataRequest {
	/// Assembles the outbound descriptor.
	pub fn new(format: SigFormat, address: Address, raw_data: Vec<u8>, messages: Vec<NameValueType>, hash: H256, meta: Metadata) -> Self {
		debug!(target: "signer", "sign request {} for {:?} from {}", format.mime, address, meta);
		SignDataRequest {
			content_type: format.mime.to_owned(),
			address,
			raw_data,
			messages,
			hash,
			meta,
		}
	}
}

fn serialize_hex<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.serialize_str(&format!("0x{}", bytes.to_hex::<String>()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::{from_str, Value};

	#[test]
	fn test_format_tags() {
		assert_eq!(INTENDED_VALIDATOR.byte_version, 0x00);
		assert_eq!(DATA_TYPED.byte_version, 0x01);
		assert_eq!(APPLICATION_CLIQUE.byte_version, 0x02);
		assert_eq!(TEXT_PLAIN.byte_version, 0x45);
		assert_eq!(APPLICATION_CLIQUE.mime, "application/x-clique-header");
	}

	#[test]
	fn test_raw_data_renders_as_hex() {
		let request = SignDataRequest::new(
			TEXT_PLAIN,
			Address::zero(),
			vec![0x19, 0x00, 0xde, 0xad],
			vec![],
			H256::zero(),
			Metadata::default(),
		);
		let serialized = serde_json::to_value(&request).unwrap();
		assert_eq!(serialized["raw_data"], Value::String("0x1900dead".to_owned()));

		let request = SignDataRequest::new(
			TEXT_PLAIN,
			Address::zero(),
			vec![],
			vec![],
			H256::zero(),
			Metadata::default(),
		);
		let serialized = serde_json::to_value(&request).unwrap();
		assert_eq!(serialized["raw_data"], Value::String("0x".to_owned()));
	}

	#[test]
	fn test_metadata_display_and_round_trip() {
		let meta = Metadata {
			remote: "127.0.0.1:8550".to_owned(),
			local: "localhost:8550".to_owned(),
			scheme: "http".to_owned(),
			user_agent: "curl/7.54".to_owned(),
			origin: "localhost".to_owned(),
		};
		let rendered = meta.to_string();
		assert_eq!(rendered.contains(r#""User-Agent":"curl/7.54""#), true);
		assert_eq!(serde_json::from_str::<Metadata>(&rendered).unwrap(), meta);
	}

	#[test]
	fn test_typed_data_descriptor() {
		let typed_data = from_str::<eip712::EIP712>(r#"{
			"primaryType": "Transfer",
			"domain": { "name": "Example", "chainId": 1 },
			"message": { "amount": "10" },
			"types": {
				"Transfer": [
					{ "name": "amount", "type": "uint256" }
				]
			}
		}"#).unwrap();

		let messages = eip712::format(&typed_data).unwrap();
		let hash = eip712::hash_structured_data(typed_data).unwrap();
		let request = SignDataRequest::new(
			DATA_TYPED,
			Address::zero(),
			b"raw".to_vec(),
			messages,
			hash,
			Metadata::default(),
		);

		let serialized = serde_json::to_value(&request).unwrap();
		assert_eq!(serialized["content_type"], Value::String("data/typed".to_owned()));
		assert_eq!(serialized["messages"][0]["name"], Value::String("EIP712Domain".to_owned()));
		assert_eq!(serialized["messages"][1]["type"], Value::String("primary type".to_owned()));
		assert_eq!(serialized["raw_data"], Value::String("0x726177".to_owned()));
		assert_eq!(serialized["meta"]["Origin"], Value::String(String::new()));
	}
}
