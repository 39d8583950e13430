/*
 * Copyright (C) 2022 taylor.fish <contact@taylor.fish>
 *
 * This file is part of Base38.
 *
 * Base38 is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published
 * by the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Base38 is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with Base38. If not, see <https://www.gnu.org/licenses/>.
 */

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(feature = "doc_cfg", feature(doc_cfg))]

#[macro_use]
mod digit;
pub mod decode;
pub mod encode;
mod iter;
mod prefix;

#[cfg(feature = "alloc")]
extern crate alloc;

const BYTES_PER_CHUNK: usize = 3;
const DIGITS_PER_CHUNK: usize = 5;

// Digits needed for a trailing chunk of 1, 2, or 3 bytes. 38^2 > 2^8,
// 38^4 > 2^16, and 38^5 > 2^24, while 38^3 < 2^16.
const DIGITS_PER_BYTES: [usize; 3] = [2, 4, 5];

const PREFIX: &str = "MT:";
const PREFIX_CHARS: [char; 3] = ['M', 'T', ':'];
const PREFIX_ASCII: [u8; 3] = *b"MT:";

use digit::Digit;

pub use decode::decode_bytes;
pub use decode::decode_chars;
pub use decode::decode_str;

pub use encode::encode_to_bytes;
pub use encode::encode_to_chars;
#[cfg(feature = "alloc")]
pub use encode::encode_to_string;
