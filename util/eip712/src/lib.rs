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

//! EIP-712 structured data encoding and hashing.
//!
//! A typed-data document carries its own type dictionary, a primary type
//! name, a domain descriptor and the message tree. `hash_structured_data`
//! validates the document and produces the 32 byte digest a signer operates
//! on: `keccak256(0x19 0x01 ‖ hashStruct(domain) ‖ hashStruct(message))`.
//! `hash_domain` and `hash_message` expose the two struct hashes for callers
//! that assemble the prefix themselves, and `format` flattens the same tree
//! into name/value/type triples for confirmation UIs.
//!
//! ```
//! use eip712::hash_structured_data;
//!
//! let json = r#"{
//! 	"primaryType": "Transfer",
//! 	"domain": { "name": "Example", "version": "1", "chainId": "0x1" },
//! 	"message": { "amount": "115792", "target": "0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC" },
//! 	"types": {
//! 		"Transfer": [
//! 			{ "name": "amount", "type": "uint256" },
//! 			{ "name": "target", "type": "address" }
//! 		]
//! 	}
//! }"#;
//! let typed_data = serde_json::from_str(json).unwrap();
//! let digest = hash_structured_data(typed_data).unwrap();
//! assert_eq!(digest.as_bytes().len(), 32);
//! ```

#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate validator_derive;

mod eip712;
mod encode;
mod error;
mod format;
mod parser;

pub use crate::eip712::{EIP712, EIP712Domain, FieldType, MessageTypes};
pub use crate::encode::{hash_domain, hash_message, hash_structured_data};
pub use crate::error::{Error, ErrorKind};
pub use crate::format::{format, FormattedValue, NameValueType};
pub use crate::parser::is_primitive;
