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

//! EIP712 structs
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use ethereum_types::{Address, H256, U256};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de;
use serde::Deserializer;
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

pub type MessageTypes = HashMap<String, Vec<FieldType>>;

lazy_static! {
	// a bare identifier with at most one unsized array suffix; fixed-size and
	// multi-dimensional arrays are outside the grammar
	pub(crate) static ref TYPE_REGEX: Regex = Regex::new(r"^[a-zA-Z_$][a-zA-Z_$0-9]*(\[\])?$").unwrap();
	pub(crate) static ref IDENT_REGEX: Regex = Regex::new(r"^[a-zA-Z_$][a-zA-Z_$0-9]*$").unwrap();
	// reference types must start with an uppercase letter
	pub(crate) static ref REFERENCE_REGEX: Regex = Regex::new(r"^[A-Z]\w*(\[\])?$").unwrap();
}

#[derive(Deserialize, Serialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_domain"))]
pub struct EIP712Domain {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub(crate) name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub(crate) version: Option<String>,
	#[serde(default, deserialize_with = "deserialize_chain_id", skip_serializing_if = "Option::is_none")]
	pub(crate) chain_id: Option<U256>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub(crate) verifying_contract: Option<Address>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub(crate) salt: Option<H256>,
}

fn validate_domain(domain: &EIP712Domain) -> Result<(), ValidationError> {
	match (domain.name.as_ref(), domain.version.as_ref(), domain.chain_id, domain.verifying_contract, domain.salt) {
		(None, None, None, None, None) => Err(ValidationError::new("EIP712Domain must include at least one field")),
		_ => Ok(())
	}
}

impl EIP712Domain {
	/// Transient struct definition for this domain: one descriptor per
	/// populated field, in the canonical member order.
	pub(crate) fn members(&self) -> Vec<FieldType> {
		let mut members = Vec::with_capacity(5);
		if self.name.is_some() {
			members.push(FieldType { name: "name".into(), type_: "string".into() });
		}
		if self.version.is_some() {
			members.push(FieldType { name: "version".into(), type_: "string".into() });
		}
		if self.chain_id.is_some() {
			members.push(FieldType { name: "chainId".into(), type_: "uint256".into() });
		}
		if self.verifying_contract.is_some() {
			members.push(FieldType { name: "verifyingContract".into(), type_: "address".into() });
		}
		if self.salt.is_some() {
			members.push(FieldType { name: "salt".into(), type_: "bytes32".into() });
		}
		members
	}
}

/// The `chainId` arrives as whatever the transport produced: a JSON number,
/// a decimal string, or 0x-prefixed hex.
fn deserialize_chain_id<'de, D>(deserializer: D) -> Result<Option<U256>, D::Error>
where
	D: Deserializer<'de>,
{
	struct ChainIdVisitor;

	impl<'de> de::Visitor<'de> for ChainIdVisitor {
		type Value = Option<U256>;

		fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
			write!(formatter, "a chain id as a number, a decimal string or a 0x-prefixed hex string")
		}

		fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
			Ok(Some(U256::from(value)))
		}

		fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
			let parsed = if value.starts_with("0x") {
				U256::from_str(&value[2..])
					.map_err(|_| de::Error::custom(format!("invalid hex chainId '{}'", value)))?
			} else {
				U256::from_dec_str(value)
					.map_err(|_| de::Error::custom(format!("invalid decimal chainId '{}'", value)))?
			};
			Ok(Some(parsed))
		}

		fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
			Ok(None)
		}
	}

	deserializer.deserialize_any(ChainIdVisitor)
}

/// EIP-712 struct
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct EIP712 {
	pub(crate) types: MessageTypes,
	pub(crate) primary_type: String,
	pub(crate) message: Value,
	pub(crate) domain: EIP712Domain,
}

impl Validate for EIP712 {
	fn validate(&self) -> Result<(), ValidationErrors> {
		self.domain.validate()?;
		for field_types in self.types.values() {
			for field_type in field_types {
				field_type.validate()?;
			}
		}
		Ok(())
	}
}

#[derive(Serialize, Deserialize, Validate, Debug, Clone, PartialEq)]
pub struct FieldType {
	#[validate(regex = "IDENT_REGEX")]
	pub name: String,
	#[serde(rename = "type")]
	#[validate(regex = "TYPE_REGEX")]
	pub type_: String,
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::from_str;

	#[test]
	fn test_regex() {
		let test_cases = vec!["unint bytes32", "Seun\\[]", "byte[]uint", "byte[7[]uint][]", "Person[0]", "bytes32[][]", "byte[9]"];
		for case in test_cases {
			assert_eq!(TYPE_REGEX.is_match(case), false)
		}

		let test_cases = vec!["bytes32", "Foo[]", "bytes1", "bytes", "contents", "uint256[]"];
		for case in test_cases {
			assert_eq!(TYPE_REGEX.is_match(case), true)
		}
	}

	#[test]
	fn test_deserialization() {
		let string = r#"{
			"primaryType": "Mail",
			"domain": {
				"name": "Ether Mail",
				"version": "1",
				"chainId": "0x1",
				"verifyingContract": "0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC"
			},
			"message": {
				"from": {
					"name": "Cow",
					"wallet": "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826"
				},
				"to": {
					"name": "Bob",
					"wallet": "0xbBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB"
				},
				"contents": "Hello, Bob!"
			},
			"types": {
				"EIP712Domain": [
					{ "name": "name", "type": "string" },
					{ "name": "version", "type": "string" },
					{ "name": "chainId", "type": "uint256" },
					{ "name": "verifyingContract", "type": "address" }
				],
				"Person": [
					{ "name": "name", "type": "string" },
					{ "name": "wallet", "type": "address" }
				],
				"Mail": [
					{ "name": "from", "type": "Person" },
					{ "name": "to", "type": "Person" },
					{ "name": "contents", "type": "string" }
				]
			}
		}"#;
		let _ = from_str::<EIP712>(string).unwrap();
	}

	#[test]
	fn test_failing_deserialization() {
		let string = r#"{
			"primaryType": "Mail",
			"domain": {
				"name": "Ether Mail",
				"version": "1",
				"chainId": "0x1",
				"verifyingContract": "0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC"
			},
			"message": {
				"contents": "Hello, Bob!"
			},
			"types": {
				"EIP712Domain": [
					{ "name": "name", "type": "string" },
					{ "name": "version", "type": "string" },
					{ "name": "chainId", "type": "7uint256[x] Seun" },
					{ "name": "verifyingContract", "type": "address" }
				],
				"Mail": [
					{ "name": "from amen", "type": "Person" },
					{ "name": "contents", "type": "string" }
				]
			}
		}"#;
		let data = from_str::<EIP712>(string).unwrap();
		assert_eq!(data.validate().is_err(), true);
	}

	#[test]
	fn test_chain_id_formats() {
		for chain_id in &[r#""0x1""#, r#""1""#, "1"] {
			let json = format!(r#"{{ "name": "Example", "chainId": {} }}"#, chain_id);
			let domain = from_str::<EIP712Domain>(&json).unwrap();
			assert_eq!(domain.chain_id, Some(U256::one()));
		}

		let json = r#"{ "name": "Example", "chainId": "0xgg" }"#;
		assert_eq!(from_str::<EIP712Domain>(json).is_err(), true);
	}

	#[test]
	fn domain_needs_at_least_one_field() {
		let domain = from_str::<EIP712Domain>("{}").unwrap();
		assert_eq!(domain.validate().is_err(), true);

		let domain = from_str::<EIP712Domain>(r#"{ "version": "1" }"#).unwrap();
		assert_eq!(domain.validate().is_ok(), true);
	}

	#[test]
	fn domain_members_follow_canonical_order() {
		let domain = from_str::<EIP712Domain>(r#"{
			"salt": "0x0000000000000000000000000000000000000000000000000000000000000001",
			"name": "Example",
			"chainId": 42
		}"#).unwrap();
		let members = domain.members();
		let rendered = members.iter()
			.map(|field| format!("{} {}", field.type_, field.name))
			.collect::<Vec<_>>()
			.join(",");
		assert_eq!(rendered, "string name,uint256 chainId,bytes32 salt");
	}
}
