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

//! Crate errors

use std::fmt;
use failure::{Backtrace, Context, Fail};
use serde::ser::{Serialize, Serializer};

pub(crate) type Result<T> = ::std::result::Result<T, Error>;

/// Error type
#[derive(Debug)]
pub struct Error {
	inner: Context<ErrorKind>,
}

impl Fail for Error {
	fn cause(&self) -> Option<&dyn Fail> {
		self.inner.cause()
	}

	fn backtrace(&self) -> Option<&Backtrace> {
		self.inner.backtrace()
	}
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		fmt::Display::fmt(&self.inner, f)
	}
}

impl Error {
	/// extract the error kind
	pub fn kind(&self) -> &ErrorKind {
		self.inner.get_context()
	}
}

impl From<ErrorKind> for Error {
	fn from(kind: ErrorKind) -> Error {
		Error { inner: Context::new(kind) }
	}
}

impl From<Context<ErrorKind>> for Error {
	fn from(inner: Context<ErrorKind>) -> Error {
		Error { inner }
	}
}

impl Serialize for Error {
	fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&format!("{}", self))
	}
}

/// Possible errors encountered while validating and hashing a typed-data document
#[derive(Clone, Fail, Debug, PartialEq)]
pub enum ErrorKind {
	/// the value's runtime shape doesn't match the declared type
	#[fail(display = "Expected type '{}' for field '{}'", _0, _1)]
	UnexpectedType(String, String),
	/// the primary type supplied doesn't exist in the type dictionary
	#[fail(display = "The given primaryType wasn't found in the types field")]
	NonExistentType,
	/// a field was declared with a type outside the registry and the dictionary
	#[fail(display = "The field of '{}' has an unknown type '{}'", _0, _1)]
	UnknownType(String, String),
	/// unexpected token while parsing a type name
	#[fail(display = "Unexpected token '{}' while parsing typename '{}'", _0, _1)]
	UnexpectedToken(String, String),
	/// `bytesN` declared with N outside [1, 32]
	#[fail(display = "Invalid size on bytes: {}", _0)]
	InvalidBytesSize(String),
	/// `intN`/`uintN` declared with an unsupported width
	#[fail(display = "Invalid size on integer: {}", _0)]
	InvalidIntegerSize(String),
	/// the dictionary contains an empty struct name
	#[fail(display = "The type dictionary contains an empty struct name")]
	EmptyTypeKey,
	/// a field descriptor with an empty name
	#[fail(display = "A field of the struct '{}' has an empty name", _0)]
	EmptyFieldName(String),
	/// a field descriptor with an empty type
	#[fail(display = "A field of the struct '{}' has an empty type", _0)]
	EmptyFieldType(String),
	/// a struct field declared with the type of its owning struct
	#[fail(display = "The struct '{}' cannot reference itself", _0)]
	SelfReference(String),
	/// a reference type with no entry in the dictionary
	#[fail(display = "The reference type '{}' is undefined", _0)]
	UndefinedReferenceType(String),
	/// a reference type that doesn't match the reference grammar
	#[fail(display = "Unknown reference type '{}'", _0)]
	InvalidReferenceType(String),
	/// an invalid address was encountered during encoding
	#[fail(display = "Address string should be a 0x-prefixed 40 character string, got length {}", _0)]
	InvalidAddressLength(usize),
	/// a hex parse error occurred
	#[fail(display = "Failed to parse hex '{}'", _0)]
	HexParseError(String),
	/// a value that cannot be coerced into a fixed-width integer
	#[fail(display = "Invalid integer value '{}' for type '{}'", _0, _1)]
	InvalidInteger(String, String),
	/// an integer wider than its declared type
	#[fail(display = "The number '{}' does not fit the declared type '{}'", _0, _1)]
	IntegerOverflow(String, String),
	/// a negative value under an unsigned declared type
	#[fail(display = "Invalid negative value '{}' for unsigned type '{}'", _0, _1)]
	NegativeUnsigned(String, String),
	/// a byte string longer than its `bytesN` declaration
	#[fail(display = "The byte string is {} bytes, too long for type '{}'", _0, _1)]
	BytesTooLong(usize, String),
	/// the message carries more fields than its declared type
	#[fail(display = "There is extra data provided in the message")]
	ExcessMessageFields,
	/// nesting deeper than the encoder is willing to walk
	#[fail(display = "The message exceeds the maximum nesting depth of {}", _0)]
	DepthLimitExceeded(usize),
	/// shape validation failure
	#[fail(display = "{}", _0)]
	ValidationErrors(String),
}
