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

//! Human-readable projection of a typed-data document.
//!
//! Walks the same tree as the value encoder but renders every leaf as a
//! display string for confirmation UIs. Nothing here participates in
//! hashing.

use ethereum_types::Address;
use keccak_hash::keccak;
use rustc_hex::ToHex;
use serde_json::{to_value, Value};

use crate::eip712::{EIP712, MessageTypes};
use crate::encode::{parse_address, parse_integer};
use crate::error::{ErrorKind, Result};
use crate::parser::{parse_type, Type};

/// Name, rendered value and declared type of a single message field. The
/// shape is deliberately simple JSON so UIs can show it without knowing
/// any EIP-712 rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameValueType {
	pub name: String,
	pub value: FormattedValue,
	#[serde(rename = "type")]
	pub typ: String,
}

/// A rendered field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormattedValue {
	/// rendered primitive leaf
	Leaf(String),
	/// rendered array elements, one entry per element
	List(Vec<FormattedValue>),
	/// fields of a nested struct
	Fields(Vec<NameValueType>),
}

impl NameValueType {
	/// Indented dump for terminal confirmation prompts.
	pub fn pprint(&self, depth: usize) -> String {
		let mut output = String::new();
		output.push_str(&"\u{00a0}".repeat(depth * 2));
		output.push_str(&format!("{} [{}]: ", self.name, self.typ));
		match self.value {
			FormattedValue::Leaf(ref value) => {
				output.push_str(&format!("{:?}\n", value));
			}
			FormattedValue::Fields(ref fields) => {
				output.push('\n');
				for field in fields {
					output.push_str(&field.pprint(depth + 1));
				}
			}
			FormattedValue::List(ref items) => {
				output.push('\n');
				for item in items {
					match *item {
						FormattedValue::Leaf(ref value) => {
							output.push_str(&"\u{00a0}".repeat((depth + 1) * 2));
							output.push_str(&format!("{:?}\n", value));
						}
						FormattedValue::Fields(ref fields) => {
							for field in fields {
								output.push_str(&field.pprint(depth + 1));
							}
						}
						// the grammar has no nested arrays
						FormattedValue::List(_) => {}
					}
				}
			}
		}
		output
	}
}

/// Flattens the document into two top-level entries: the domain under the
/// synthetic `EIP712Domain` name and the message under its primary type.
pub fn format(typed_data: &EIP712) -> Result<Vec<NameValueType>> {
	let mut domain_types = MessageTypes::new();
	domain_types.insert("EIP712Domain".to_owned(), typed_data.domain.members());
	let domain_value = to_value(&typed_data.domain)
		.expect("EIP712Domain is a plain field struct; serialization cannot fail; qed");
	let domain = format_data("EIP712Domain", &domain_types, &domain_value)?;
	let message = format_data(&typed_data.primary_type, &typed_data.types, &typed_data.message)?;

	Ok(vec![
		NameValueType {
			name: "EIP712Domain".to_owned(),
			value: FormattedValue::Fields(domain),
			typ: "domain".to_owned(),
		},
		NameValueType {
			name: typed_data.primary_type.clone(),
			value: FormattedValue::Fields(message),
			typ: "primary type".to_owned(),
		},
	])
}

fn format_data(message_type: &str, message_types: &MessageTypes, value: &Value) -> Result<Vec<NameValueType>> {
	let fields = message_types.get(message_type)
		.ok_or_else(|| ErrorKind::NonExistentType)?;
	let empty = serde_json::Map::new();
	let object = value.as_object().unwrap_or(&empty);

	let mut output = Vec::with_capacity(fields.len());
	for field in fields {
		let field_value = object.get(&field.name);
		let rendered = match parse_type(&field.type_)? {
			Type::Array { ref inner } => {
				let items = field_value.and_then(Value::as_array)
					.map(|items| &items[..])
					.unwrap_or(&[]);
				let mut rendered = Vec::with_capacity(items.len());
				for item in items {
					match **inner {
						Type::Custom(ref name) if message_types.contains_key(name) => {
							rendered.push(FormattedValue::Fields(format_data(name, message_types, item)?));
						}
						ref element_type => {
							rendered.push(FormattedValue::Leaf(format_primitive(element_type, item)?));
						}
					}
				}
				FormattedValue::List(rendered)
			}
			Type::Custom(ref name) if message_types.contains_key(name) => {
				match field_value {
					Some(value) if value.is_object() => {
						FormattedValue::Fields(format_data(name, message_types, value)?)
					}
					_ => FormattedValue::Leaf("<nil>".to_owned()),
				}
			}
			ref primitive => {
				match field_value {
					None | Some(&Value::Null) => FormattedValue::Leaf("<nil>".to_owned()),
					Some(value) => FormattedValue::Leaf(format_primitive(primitive, value)?),
				}
			}
		};
		output.push(NameValueType {
			name: field.name.clone(),
			value: rendered,
			typ: field.type_.clone(),
		});
	}
	Ok(output)
}

fn format_primitive(field_type: &Type, value: &Value) -> Result<String> {
	match *field_type {
		Type::Address => {
			let text = value.as_str()
				.ok_or_else(|| ErrorKind::UnexpectedType("address".into(), value.to_string()))?;
			Ok(checksummed(&parse_address(text)?))
		}
		Type::Bool => {
			value.as_bool()
				.map(|flag| flag.to_string())
				.ok_or_else(|| ErrorKind::UnexpectedType("bool".into(), value.to_string()).into())
		}
		Type::String | Type::Bytes | Type::Byte(_) => {
			value.as_str()
				.map(str::to_owned)
				.ok_or_else(|| ErrorKind::UnexpectedType("string".into(), value.to_string()).into())
		}
		Type::Uint(_) | Type::Int(_) => {
			let (negative, magnitude) = parse_integer(&field_type.to_string(), value)?;
			Ok(if negative {
				format!("-{} (-0x{:x})", magnitude, magnitude)
			} else {
				format!("{} (0x{:x})", magnitude, magnitude)
			})
		}
		Type::Custom(ref name) => {
			Err(ErrorKind::UnknownType(name.clone(), value.to_string()))?
		}
		Type::Array { .. } => {
			Err(ErrorKind::UnknownType(field_type.to_string(), value.to_string()))?
		}
	}
}

/// EIP-55 mixed-case rendering of an address.
fn checksummed(address: &Address) -> String {
	let hex: String = address.as_bytes().to_hex();
	let hash = keccak(hex.as_bytes());

	let mut output = String::with_capacity(42);
	output.push_str("0x");
	for (index, character) in hex.chars().enumerate() {
		let nibble = if index % 2 == 0 {
			hash.as_bytes()[index / 2] >> 4
		} else {
			hash.as_bytes()[index / 2] & 0x0f
		};
		if nibble >= 8 {
			output.extend(character.to_uppercase());
		} else {
			output.push(character);
		}
	}
	output
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::from_str;
	use std::str::FromStr;

	#[test]
	fn test_checksummed_address() {
		let address = Address::from_str("cd2a3d9f938e13cd947ec05abc7fe734df8dd826").unwrap();
		assert_eq!(checksummed(&address), "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826");

		let address = Address::from_str("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb").unwrap();
		assert_eq!(checksummed(&address), "0xbBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB");
	}

	#[test]
	fn test_format_mail() {
		let data = from_str::<EIP712>(r#"{
			"primaryType": "Mail",
			"domain": {
				"name": "Ether Mail",
				"version": "1",
				"chainId": 1,
				"verifyingContract": "0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC"
			},
			"message": {
				"from": { "name": "Cow", "wallet": "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826" },
				"to": { "name": "Bob", "wallet": "0xbBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB" },
				"contents": "Hello, Bob!"
			},
			"types": {
				"EIP712Domain": [
					{ "name": "name", "type": "string" },
					{ "name": "chainId", "type": "uint256" }
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
		}"#).unwrap();

		let entries = format(&data).unwrap();
		assert_eq!(entries.len(), 2);
		assert_eq!(entries[0].name, "EIP712Domain");
		assert_eq!(entries[0].typ, "domain");
		assert_eq!(entries[1].name, "Mail");
		assert_eq!(entries[1].typ, "primary type");

		// the domain renders against its populated fields, not the declared entry
		match entries[0].value {
			FormattedValue::Fields(ref fields) => {
				let rendered = fields.iter().map(|field| field.name.as_str()).collect::<Vec<_>>();
				assert_eq!(rendered, vec!["name", "version", "chainId", "verifyingContract"]);
				assert_eq!(fields[2].value, FormattedValue::Leaf("1 (0x1)".to_owned()));
			}
			_ => panic!("expected domain fields"),
		}

		match entries[1].value {
			FormattedValue::Fields(ref fields) => {
				assert_eq!(fields[2].value, FormattedValue::Leaf("Hello, Bob!".to_owned()));
				match fields[0].value {
					FormattedValue::Fields(ref person) => {
						assert_eq!(
							person[1].value,
							FormattedValue::Leaf("0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826".to_owned())
						);
					}
					_ => panic!("expected nested person"),
				}
			}
			_ => panic!("expected message fields"),
		}
	}

	#[test]
	fn test_array_elements_accumulate() {
		let data = from_str::<EIP712>(r#"{
			"primaryType": "Roster",
			"domain": { "name": "Example" },
			"message": {
				"nicknames": ["Cow", "Bob", "Moo"]
			},
			"types": {
				"Roster": [
					{ "name": "nicknames", "type": "string[]" }
				]
			}
		}"#).unwrap();

		let entries = format(&data).unwrap();
		match entries[1].value {
			FormattedValue::Fields(ref fields) => {
				assert_eq!(fields[0].value, FormattedValue::List(vec![
					FormattedValue::Leaf("Cow".to_owned()),
					FormattedValue::Leaf("Bob".to_owned()),
					FormattedValue::Leaf("Moo".to_owned()),
				]));
			}
			_ => panic!("expected message fields"),
		}
	}

	#[test]
	fn test_missing_nested_struct_renders_placeholder() {
		let data = from_str::<EIP712>(r#"{
			"primaryType": "Mail",
			"domain": { "name": "Example" },
			"message": { "contents": "Hello!" },
			"types": {
				"Person": [
					{ "name": "name", "type": "string" }
				],
				"Mail": [
					{ "name": "from", "type": "Person" },
					{ "name": "contents", "type": "string" }
				]
			}
		}"#).unwrap();

		let entries = format(&data).unwrap();
		match entries[1].value {
			FormattedValue::Fields(ref fields) => {
				assert_eq!(fields[0].value, FormattedValue::Leaf("<nil>".to_owned()));
			}
			_ => panic!("expected message fields"),
		}
	}

	#[test]
	fn test_coercion_failures_are_reported() {
		let data = from_str::<EIP712>(r#"{
			"primaryType": "Order",
			"domain": { "name": "Example" },
			"message": { "amount": "not a number" },
			"types": {
				"Order": [
					{ "name": "amount", "type": "uint256" }
				]
			}
		}"#).unwrap();
		assert_eq!(format(&data).is_err(), true);
	}

	#[test]
	fn test_pprint() {
		let entry = NameValueType {
			name: "Mail".to_owned(),
			typ: "primary type".to_owned(),
			value: FormattedValue::Fields(vec![
				NameValueType {
					name: "contents".to_owned(),
					typ: "string".to_owned(),
					value: FormattedValue::Leaf("Hello, Bob!".to_owned()),
				},
			]),
		};
		let printed = entry.pprint(0);
		assert_eq!(printed.contains("Mail [primary type]:"), true);
		assert_eq!(printed.contains("contents [string]: \"Hello, Bob!\""), true);
	}
}
