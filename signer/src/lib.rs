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

//! Byte-oriented signing pre-images and the request plumbing around them.
//!
//! Three signing constructions complement the EIP-712 encoder before a key
//! is touched: the intended-validator pre-image
//! (`0x19 0x00 ‖ address ‖ payload`), the clique seal pre-image (the header
//! RLP with the 65 byte signature trailer stripped out of the extra-data),
//! and plain text. `request` carries the MIME tags that discriminate them
//! and the descriptor handed to confirmation UIs.

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

mod clique;
mod error;
mod header;
mod request;
mod validator;

pub use crate::clique::{seal_hash_and_rlp, SIGNATURE_LENGTH};
pub use crate::error::Error;
pub use crate::header::{BlockNumber, Header, Seal};
pub use crate::request::{
	Metadata, SigFormat, SignDataRequest,
	APPLICATION_CLIQUE, DATA_TYPED, INTENDED_VALIDATOR, TEXT_PLAIN,
};
pub use crate::validator::{sign_text_validator, ValidatorData};
