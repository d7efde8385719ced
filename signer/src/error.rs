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

use failure::Fail;

/// Errors produced while assembling signing pre-images.
#[derive(Debug, Fail, PartialEq)]
pub enum Error {
	/// the header extra-data has no room for the 65 byte signature trailer
	#[fail(display = "clique header extradata too short, {} < 65", _0)]
	ExtraDataTooShort(usize),
	/// validator request body was not a JSON object
	#[fail(display = "validator input is not an object")]
	NotAnObject,
	/// the `address` member is absent or not textual
	#[fail(display = "validator address is not sent as a string")]
	AddressNotString,
	/// the `address` member does not decode to 20 bytes
	#[fail(display = "validator address '{}' is not a 20 byte hex string", _0)]
	InvalidAddress(String),
	/// the `message` member is absent or not textual
	#[fail(display = "message is not sent as a string")]
	MessageNotString,
	/// the `message` member decodes to nothing
	#[fail(display = "message is undefined")]
	EmptyMessage,
	/// not a 0x-prefixed hex string
	#[fail(display = "invalid hex '{}'", _0)]
	InvalidHex(String),
}
