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

//! Canonical hashing of typed-data documents.
//!
//! `hashStruct(S, message) = keccak256(typeHash(S) ‖ enc(field₁) ‖ … ‖ enc(fieldₙ))`
//! where `typeHash` is the keccak of the textual struct encoding with the
//! primary type first and its transitive dependencies sorted, and every
//! `enc` is exactly 32 bytes.

use ethereum_types::{Address, H256, U256};
use indexmap::IndexSet;
use itertools::Itertools;
use keccak_hash::keccak;
use rustc_hex::FromHex;
use serde_json::{to_value, Value};
use std::str::FromStr;
use validator::Validate;

use crate::eip712::{EIP712, MessageTypes, REFERENCE_REGEX};
use crate::error::{ErrorKind, Result};
use crate::parser::{is_primitive, parse_type, Type};

/// Nesting deeper than this fails cleanly instead of walking a reference
/// cycle the dictionary validator does not reject.
const MAX_NESTING_DEPTH: usize = 100;

/// Digest of the whole document:
/// `keccak256(0x19 0x01 ‖ hashStruct(domain) ‖ hashStruct(message))`.
pub fn hash_structured_data(typed_data: EIP712) -> Result<H256> {
	typed_data.validate()
		.map_err(|errors| ErrorKind::ValidationErrors(format!("{:?}", errors)))?;

	let domain_hash = hash_domain(&typed_data)?;
	let message_hash = hash_message(&typed_data)?;

	let mut preimage = Vec::with_capacity(2 + 32 + 32);
	preimage.extend_from_slice(b"\x19\x01");
	preimage.extend_from_slice(domain_hash.as_bytes());
	preimage.extend_from_slice(message_hash.as_bytes());
	Ok(keccak(&preimage))
}

/// `hashStruct` of the domain descriptor, encoded against the transient
/// `EIP712Domain` definition assembled from its populated fields.
pub fn hash_domain(typed_data: &EIP712) -> Result<H256> {
	typed_data.domain.validate()
		.map_err(|errors| ErrorKind::ValidationErrors(format!("{:?}", errors)))?;

	let mut domain_types = MessageTypes::new();
	domain_types.insert("EIP712Domain".to_owned(), typed_data.domain.members());
	let domain_value = to_value(&typed_data.domain)
		.expect("EIP712Domain is a plain field struct; serialization cannot fail; qed");
	hash_struct("EIP712Domain", &domain_types, &domain_value)
}

/// `hashStruct` of the message tree against the document's primary type.
pub fn hash_message(typed_data: &EIP712) -> Result<H256> {
	hash_struct(&typed_data.primary_type, &typed_data.types, &typed_data.message)
}

fn hash_struct(message_type: &str, message_types: &MessageTypes, value: &Value) -> Result<H256> {
	Ok(keccak(encode_data(message_type, message_types, value, 1)?))
}

/// Checks the type dictionary for structural soundness: non-empty names, no
/// direct self-reference, every reference resolvable, every other spelling a
/// registry primitive. Returns the first violation.
pub(crate) fn validate_types(message_types: &MessageTypes) -> Result<()> {
	for (type_key, fields) in message_types {
		if type_key.is_empty() {
			return Err(ErrorKind::EmptyTypeKey)?;
		}
		for field in fields {
			if field.name.is_empty() {
				return Err(ErrorKind::EmptyFieldName(type_key.clone()))?;
			}
			if field.type_.is_empty() {
				return Err(ErrorKind::EmptyFieldType(type_key.clone()))?;
			}
			if field.type_ == *type_key {
				return Err(ErrorKind::SelfReference(type_key.clone()))?;
			}
			if is_reference_type(&field.type_) {
				if !message_types.contains_key(strip_array_suffix(&field.type_)) {
					return Err(ErrorKind::UndefinedReferenceType(field.type_.clone()))?;
				}
				if !REFERENCE_REGEX.is_match(&field.type_) {
					return Err(ErrorKind::InvalidReferenceType(field.type_.clone()))?;
				}
			} else if !is_primitive(&field.type_) {
				return Err(ErrorKind::UnknownType(type_key.clone(), field.type_.clone()))?;
			}
		}
	}
	Ok(())
}

fn is_reference_type(field_type: &str) -> bool {
	field_type.chars().next().map_or(false, |first| first.is_ascii_uppercase())
}

fn strip_array_suffix(field_type: &str) -> &str {
	if field_type.ends_with("[]") {
		&field_type[..field_type.len() - 2]
	} else {
		field_type
	}
}

/// Transitive closure of struct names reachable from `message_type`, in
/// discovery order. `None` if the root itself is undefined.
pub(crate) fn build_dependencies<'a>(message_type: &'a str, message_types: &'a MessageTypes) -> Option<IndexSet<&'a str>> {
	if message_types.get(message_type).is_none() {
		return None;
	}

	let mut pending = IndexSet::new();
	pending.insert(message_type);
	let mut dependencies = IndexSet::new();

	while let Some(item) = pending.pop() {
		if let Some(fields) = message_types.get(item) {
			dependencies.insert(item);
			for field in fields {
				let field_type = strip_array_suffix(&field.type_);
				if dependencies.contains(field_type) || !message_types.contains_key(field_type) {
					continue;
				}
				pending.insert(field_type);
			}
		}
	}

	Some(dependencies)
}

/// Textual canonical form: the primary type first, the remaining
/// dependencies in lexicographic order, each rendered `Name(type name,…)`.
pub(crate) fn encode_type(message_type: &str, message_types: &MessageTypes) -> Result<String> {
	let mut dependencies = build_dependencies(message_type, message_types)
		.ok_or_else(|| ErrorKind::NonExistentType)?;
	dependencies.remove(message_type);

	let rendered = Some(message_type).into_iter()
		.chain(dependencies.into_iter().sorted())
		.map(|dependency| {
			let fields = message_types.get(dependency)
				.expect("dependencies are collected from this dictionary; qed");
			let members = fields.iter()
				.map(|field| format!("{} {}", field.type_, field.name))
				.join(",");
			format!("{}({})", dependency, members)
		})
		.collect::<String>();
	Ok(rendered)
}

pub(crate) fn type_hash(message_type: &str, message_types: &MessageTypes) -> Result<H256> {
	Ok(keccak(encode_type(message_type, message_types)?))
}

/// `typeHash(S) ‖ enc(field₁) ‖ … ‖ enc(fieldₙ)`, each `enc` 32 bytes.
/// The dictionary is re-validated before anything is hashed.
fn encode_data(message_type: &str, message_types: &MessageTypes, value: &Value, depth: usize) -> Result<Vec<u8>> {
	validate_types(message_types)?;
	if depth > MAX_NESTING_DEPTH {
		return Err(ErrorKind::DepthLimitExceeded(MAX_NESTING_DEPTH))?;
	}

	let fields = message_types.get(message_type)
		.ok_or_else(|| ErrorKind::NonExistentType)?;
	let object = value.as_object()
		.ok_or_else(|| ErrorKind::UnexpectedType("struct".into(), message_type.into()))?;
	if object.len() > fields.len() {
		return Err(ErrorKind::ExcessMessageFields)?;
	}

	let mut buffer = Vec::with_capacity(32 * (1 + fields.len()));
	buffer.extend_from_slice(type_hash(message_type, message_types)?.as_bytes());

	for field in fields {
		let encoded = encode_field(message_types, &field.name, &field.type_, object.get(&field.name), depth)?;
		buffer.extend_from_slice(&encoded);
	}
	Ok(buffer)
}

/// A single 32 byte word per field: arrays and nested structs are folded
/// through the hasher, everything else goes to the primitive encoder. A
/// missing or null primitive encodes as the zero value of its type; a
/// missing struct or array is an error.
fn encode_field(message_types: &MessageTypes, field_name: &str, field_type: &str, value: Option<&Value>, depth: usize) -> Result<Vec<u8>> {
	let parsed = parse_type(field_type)?;

	let encoded = match parsed {
		Type::Array { ref inner } => {
			let items = value.and_then(Value::as_array)
				.ok_or_else(|| ErrorKind::UnexpectedType(field_type.to_owned(), field_name.to_owned()))?;

			let mut concat = Vec::with_capacity(32 * items.len());
			for item in items {
				match **inner {
					Type::Custom(ref name) if message_types.contains_key(name) => {
						concat.extend_from_slice(&encode_data(name, message_types, item, depth + 1)?);
					}
					ref element_type => {
						concat.extend_from_slice(encode_primitive(element_type, field_name, Some(item))?.as_bytes());
					}
				}
			}
			keccak(&concat).as_bytes().to_vec()
		}
		Type::Custom(ref name) if message_types.contains_key(name) => {
			let value = value
				.ok_or_else(|| ErrorKind::UnexpectedType(field_type.to_owned(), field_name.to_owned()))?;
			keccak(encode_data(name, message_types, value, depth + 1)?).as_bytes().to_vec()
		}
		Type::Custom(_) => {
			return Err(ErrorKind::UnknownType(field_name.to_owned(), field_type.to_owned()))?;
		}
		ref primitive => encode_primitive(primitive, field_name, value)?.as_bytes().to_vec(),
	};
	Ok(encoded)
}

/// Width-exact 32 byte encoding of a primitive leaf.
fn encode_primitive(field_type: &Type, field_name: &str, value: Option<&Value>) -> Result<H256> {
	let value = match value {
		None | Some(&Value::Null) => return Ok(zero_value(field_type)),
		Some(value) => value,
	};

	match *field_type {
		Type::Address => {
			let text = value.as_str()
				.ok_or_else(|| ErrorKind::UnexpectedType("address".into(), field_name.into()))?;
			let address = parse_address(text)?;
			let mut word = H256::zero();
			word.as_bytes_mut()[12..].copy_from_slice(address.as_bytes());
			Ok(word)
		}
		Type::Bool => {
			let flag = value.as_bool()
				.ok_or_else(|| ErrorKind::UnexpectedType("bool".into(), field_name.into()))?;
			let mut word = H256::zero();
			word.as_bytes_mut()[31] = flag as u8;
			Ok(word)
		}
		Type::String => {
			let text = value.as_str()
				.ok_or_else(|| ErrorKind::UnexpectedType("string".into(), field_name.into()))?;
			Ok(keccak(text))
		}
		Type::Bytes => {
			let bytes = decode_hex(value, field_name)?;
			Ok(keccak(&bytes))
		}
		Type::Byte(length) => {
			let bytes = decode_hex(value, field_name)?;
			if bytes.len() > length as usize {
				return Err(ErrorKind::BytesTooLong(bytes.len(), format!("bytes{}", length)))?;
			}
			// fixed-size byte strings occupy the high end of the word
			let mut word = H256::zero();
			word.as_bytes_mut()[..bytes.len()].copy_from_slice(&bytes);
			Ok(word)
		}
		Type::Uint(width) => encode_integer(width, false, field_type, value),
		Type::Int(width) => encode_integer(width, true, field_type, value),
		Type::Custom(_) | Type::Array { .. } => {
			Err(ErrorKind::UnknownType(field_name.to_owned(), field_type.to_string()))?
		}
	}
}

fn zero_value(field_type: &Type) -> H256 {
	match *field_type {
		Type::String | Type::Bytes => keccak(b""),
		_ => H256::zero(),
	}
}

pub(crate) fn parse_address(text: &str) -> Result<Address> {
	let digits = if text.starts_with("0x") { &text[2..] } else { text };
	if digits.len() != 40 {
		return Err(ErrorKind::InvalidAddressLength(digits.len()))?;
	}
	Address::from_str(digits).map_err(|_| ErrorKind::HexParseError(text.to_owned()).into())
}

fn decode_hex(value: &Value, field_name: &str) -> Result<Vec<u8>> {
	let text = value.as_str()
		.ok_or_else(|| ErrorKind::UnexpectedType("bytes".into(), field_name.into()))?;
	if !text.starts_with("0x") {
		return Err(ErrorKind::HexParseError(text.to_owned()))?;
	}
	text[2..].from_hex().map_err(|_| ErrorKind::HexParseError(text.to_owned()).into())
}

/// Sign and magnitude of a loosely-typed numeric leaf: a native JSON number
/// (floats only when they equal their integer truncation), a decimal string,
/// or 0x-prefixed hex, each with an optional leading `-`.
pub(crate) fn parse_integer(type_name: &str, value: &Value) -> Result<(bool, U256)> {
	match *value {
		Value::Number(ref number) => {
			if let Some(unsigned) = number.as_u64() {
				return Ok((false, U256::from(unsigned)));
			}
			if let Some(signed) = number.as_i64() {
				return Ok((true, U256::from((-(signed as i128)) as u128)));
			}
			let float = number.as_f64()
				.expect("serde_json numbers are u64, i64 or f64; qed");
			let truncated = float as i64;
			if truncated as f64 == float {
				return if truncated < 0 {
					Ok((true, U256::from((-(truncated as i128)) as u128)))
				} else {
					Ok((false, U256::from(truncated as u64)))
				};
			}
			Err(ErrorKind::InvalidInteger(number.to_string(), type_name.to_owned()))?
		}
		Value::String(ref text) => {
			let (negative, digits) = if text.starts_with('-') {
				(true, &text[1..])
			} else {
				(false, &text[..])
			};
			let magnitude = if digits.starts_with("0x") {
				U256::from_str(&digits[2..])
					.map_err(|_| ErrorKind::HexParseError(text.clone()))?
			} else {
				U256::from_dec_str(digits)
					.map_err(|_| ErrorKind::InvalidInteger(text.clone(), type_name.to_owned()))?
			};
			Ok((negative && !magnitude.is_zero(), magnitude))
		}
		ref other => Err(ErrorKind::InvalidInteger(other.to_string(), type_name.to_owned()))?,
	}
}

fn encode_integer(width: usize, signed: bool, field_type: &Type, value: &Value) -> Result<H256> {
	let type_name = field_type.to_string();
	let (negative, magnitude) = parse_integer(&type_name, value)?;

	let shown = if negative { format!("-{}", magnitude) } else { magnitude.to_string() };
	if magnitude.bits() > width {
		return Err(ErrorKind::IntegerOverflow(shown, type_name))?;
	}
	if negative && !signed {
		return Err(ErrorKind::NegativeUnsigned(shown, type_name))?;
	}

	let word = if negative {
		(!magnitude).overflowing_add(U256::one()).0
	} else {
		magnitude
	};
	let mut bytes = [0u8; 32];
	word.to_big_endian(&mut bytes);
	Ok(H256::from(bytes))
}
