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

//! Solidity type-name parsing

use std::{fmt, result};
use crate::eip712::IDENT_REGEX;
use crate::error::*;

/// Integer widths the encoder accepts for `intN`/`uintN`.
const INTEGER_WIDTHS: [usize; 6] = [8, 16, 32, 64, 128, 256];

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
	Address,
	Bool,
	String,
	Bytes,
	Byte(u8),
	Uint(usize),
	Int(usize),
	Custom(String),
	Array {
		inner: Box<Type>
	}
}

impl From<Type> for String {
	fn from(field_type: Type) -> String {
		match field_type {
			Type::Address => "address".into(),
			Type::Bool => "bool".into(),
			Type::String => "string".into(),
			Type::Bytes => "bytes".into(),
			Type::Byte(len) => format!("bytes{}", len),
			Type::Uint(width) => format!("uint{}", width),
			Type::Int(width) => format!("int{}", width),
			Type::Custom(custom) => custom,
			Type::Array { inner } => {
				let inner: String = (*inner).into();
				format!("{}[]", inner)
			}
		}
	}
}

impl fmt::Display for Type {
	fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
		let item: String = self.clone().into();
		write!(f, "{}", item)
	}
}

/// Parses a type expression against the closed registry: the atomic Solidity
/// spellings, dictionary references (leading uppercase), and a single unsized
/// `[]` suffix on either. Everything else is rejected here, so malformed
/// spellings (`uint24`, `bytes33`, fixed-size or nested arrays) never reach
/// the encoder.
pub(crate) fn parse_type(field_type: &str) -> Result<Type> {
	if field_type.ends_with("[]") {
		let element = &field_type[..field_type.len() - 2];
		let inner = parse_type(element)?;
		if let Type::Array { .. } = inner {
			return Err(ErrorKind::UnexpectedToken("[]".into(), field_type.into()))?;
		}
		return Ok(Type::Array { inner: Box::new(inner) });
	}

	match field_type {
		"address" => return Ok(Type::Address),
		"bool" => return Ok(Type::Bool),
		"string" => return Ok(Type::String),
		"bytes" => return Ok(Type::Bytes),
		"int" => return Ok(Type::Int(256)),
		"uint" => return Ok(Type::Uint(256)),
		_ => {}
	}

	if field_type.starts_with("bytes") {
		let size = &field_type["bytes".len()..];
		return match size.parse::<u8>() {
			Ok(len) if len >= 1 && len <= 32 => Ok(Type::Byte(len)),
			_ => Err(ErrorKind::InvalidBytesSize(size.into()))?
		};
	}

	if field_type.starts_with("uint") {
		let width = &field_type["uint".len()..];
		return match width.parse::<usize>() {
			Ok(width) if INTEGER_WIDTHS.contains(&width) => Ok(Type::Uint(width)),
			_ => Err(ErrorKind::InvalidIntegerSize(width.into()))?
		};
	}

	if field_type.starts_with("int") {
		let width = &field_type["int".len()..];
		return match width.parse::<usize>() {
			Ok(width) if INTEGER_WIDTHS.contains(&width) => Ok(Type::Int(width)),
			_ => Err(ErrorKind::InvalidIntegerSize(width.into()))?
		};
	}

	let leading_uppercase = field_type.chars().next().map_or(false, |first| first.is_ascii_uppercase());
	if leading_uppercase && IDENT_REGEX.is_match(field_type) {
		return Ok(Type::Custom(field_type.to_owned()));
	}

	Err(ErrorKind::UnexpectedToken(field_type.to_owned(), field_type.to_owned()))?
}

/// True iff `field_type` spells a registry primitive, scalar or arrayed.
pub fn is_primitive(field_type: &str) -> bool {
	match parse_type(field_type) {
		Ok(Type::Custom(_)) => false,
		Ok(Type::Array { inner }) => {
			match *inner {
				Type::Custom(_) => false,
				_ => true
			}
		}
		Ok(_) => true,
		Err(_) => false
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parser() {
		let source = "Person[]";
		assert_eq!(parse_type(source).unwrap(), Type::Array { inner: Box::new(Type::Custom("Person".into())) });

		assert_eq!(parse_type("uint").unwrap(), Type::Uint(256));
		assert_eq!(parse_type("int").unwrap(), Type::Int(256));
		assert_eq!(parse_type("uint64").unwrap(), Type::Uint(64));
		assert_eq!(parse_type("bytes1").unwrap(), Type::Byte(1));
		assert_eq!(parse_type("bytes32").unwrap(), Type::Byte(32));
		assert_eq!(parse_type("bytes").unwrap(), Type::Bytes);
		assert_eq!(parse_type("string[]").unwrap(), Type::Array { inner: Box::new(Type::String) });
	}

	#[test]
	fn test_nested_array() {
		assert_eq!(parse_type("bytes[][]").is_err(), true);
		assert_eq!(parse_type("Person[][]").is_err(), true);
	}

	#[test]
	fn test_malformed_types() {
		let test_cases = vec!["unint bytes32", "Seun\\[]", "byte[]uint", "byte[7[]uint][]", "Person[0]",
			"uint24", "int512", "bytes0", "bytes33", "bytes[7]", "Person[7]", ""];
		for case in test_cases {
			assert_eq!(parse_type(case).is_err(), true, "expected '{}' to be rejected", case);
		}
	}

	#[test]
	fn test_is_primitive() {
		let test_cases = vec!["address", "address[]", "bool", "string", "bytes", "bytes7", "bytes32[]",
			"uint", "uint8", "int256", "int128[]"];
		for case in test_cases {
			assert_eq!(is_primitive(case), true, "expected '{}' to be a primitive", case);
		}

		let test_cases = vec!["Person", "Person[]", "uint7", "bytes33", "contents", ""];
		for case in test_cases {
			assert_eq!(is_primitive(case), false, "expected '{}' to be rejected", case);
		}
	}

	#[test]
	fn test_type_display() {
		for spelling in vec!["address", "bytes27", "uint128", "int8", "Mail[]", "bool[]"] {
			assert_eq!(parse_type(spelling).unwrap().to_string(), spelling);
		}
	}
}
