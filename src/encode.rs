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

use super::iter::{BaseIterator, Flatten, InspectBaseIterator};
use super::prefix::{add_byte_prefix, add_char_prefix};
use super::prefix::{AddBytePrefix, AddCharPrefix};
use super::Digit;
use super::{BYTES_PER_CHUNK, DIGITS_PER_BYTES, DIGITS_PER_CHUNK};

use core::array;
use core::iter::{Fuse, FusedIterator, Take};

#[cfg(feature = "alloc")]
use alloc::string::String;

/// The number of characters produced when encoding `n` bytes.
///
/// Every chunk of 3 bytes becomes 5 characters; a trailing chunk of 1 or 2
/// bytes becomes 2 or 4 characters.
pub fn encoded_len(n: usize) -> usize {
    n / BYTES_PER_CHUNK * DIGITS_PER_CHUNK + tail_digits(n)
}

fn tail_digits(n: usize) -> usize {
    match n % BYTES_PER_CHUNK {
        0 => 0,
        r => DIGITS_PER_BYTES[r - 1],
    }
}

fn encoded_len_checked(n: usize) -> Option<usize> {
    (n / BYTES_PER_CHUNK)
        .checked_mul(DIGITS_PER_CHUNK)
        .and_then(|len| len.checked_add(tail_digits(n)))
}

struct BytesToUnflatDigits<I>(I);

impl<I> BytesToUnflatDigits<I> {
    pub fn new(iter: I) -> Self {
        Self(iter)
    }
}

impl<I: InspectBaseIterator> InspectBaseIterator for BytesToUnflatDigits<I> {
    type Iter = I::Iter;

    fn base_iterator(&self) -> &Self::Iter {
        self.0.base_iterator()
    }
}

type BytesToUnflatDigitsItem = Take<array::IntoIter<Digit, 5>>;

impl<I> Iterator for BytesToUnflatDigits<I>
where
    I: FusedIterator<Item = u8>,
{
    type Item = BytesToUnflatDigitsItem;

    fn next(&mut self) -> Option<Self::Item> {
        let mut num_bytes = 0;
        let mut value = 0_u32;
        self.0
            .by_ref()
            .map(u32::from)
            .enumerate()
            .take(BYTES_PER_CHUNK)
            .for_each(|(i, b)| {
                num_bytes += 1;
                value |= b << (8 * i);
            });

        if num_bytes == 0 {
            return None;
        }

        let mut digits = [const_digit!(0); DIGITS_PER_CHUNK];
        digits.iter_mut().for_each(|d| {
            // SAFETY: `value % 38` is always less than 38.
            *d = unsafe { Digit::new_unchecked((value % 38) as u8) };
            value /= 38;
        });
        Some(
            IntoIterator::into_iter(digits)
                .take(DIGITS_PER_BYTES[num_bytes - 1]),
        )
    }
}

impl<I: FusedIterator<Item = u8>> FusedIterator for BytesToUnflatDigits<I> {}

/// Iterator returned by [`encode_to_chars`].
pub struct CharEncoder<I> {
    iter: Flatten<
        BytesToUnflatDigits<BaseIterator<Fuse<I>>>,
        BytesToUnflatDigitsItem,
    >,
}

impl<I: Iterator> CharEncoder<I> {
    pub(crate) fn new(iter: I) -> Self {
        Self {
            iter: Flatten::new(BytesToUnflatDigits::new(BaseIterator(
                iter.fuse(),
            ))),
        }
    }
}

impl<I> InspectBaseIterator for CharEncoder<I> {
    type Iter = Fuse<I>;

    fn base_iterator(&self) -> &Self::Iter {
        self.iter.base_iterator()
    }
}

impl<I> Iterator for CharEncoder<I>
where
    I: Iterator<Item = u8>,
{
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(char::from)
    }

    fn fold<B, F>(self, init: B, mut f: F) -> B
    where
        F: FnMut(B, Self::Item) -> B,
    {
        self.iter.fold(init, |b, d| f(b, char::from(d)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.base_iterator().size_hint();
        (
            // The output is never shorter than the input, so `lower` is
            // still a valid bound if the exact length overflows.
            encoded_len_checked(lower).unwrap_or(lower),
            upper.and_then(encoded_len_checked),
        )
    }
}

impl<I: Iterator<Item = u8>> FusedIterator for CharEncoder<I> {}

/// Iterator returned by [`encode_to_bytes`].
pub struct AsciiEncoder<I>(CharEncoder<I>);

impl<I: Iterator> AsciiEncoder<I> {
    pub(crate) fn new(iter: I) -> Self {
        Self(CharEncoder::new(iter))
    }
}

impl<I> Iterator for AsciiEncoder<I>
where
    I: Iterator<Item = u8>,
{
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|c| c as u8)
    }

    fn fold<B, F>(self, init: B, mut f: F) -> B
    where
        F: FnMut(B, Self::Item) -> B,
    {
        self.0.fold(init, |b, c| f(b, c as u8))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<I: Iterator<Item = u8>> FusedIterator for AsciiEncoder<I> {}

pub fn encode_to_chars<I>(bytes: I) -> CharEncoder<I::IntoIter>
where
    I: IntoIterator<Item = u8>,
{
    CharEncoder::new(bytes.into_iter())
}

pub fn encode_to_bytes<I>(bytes: I) -> AsciiEncoder<I::IntoIter>
where
    I: IntoIterator<Item = u8>,
{
    AsciiEncoder::new(bytes.into_iter())
}

#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn encode_to_string<I>(bytes: I) -> String
where
    I: IntoIterator<Item = u8>,
{
    encode_to_chars(bytes).collect()
}

/// Iterator returned by [`encode_to_chars_prefixed`].
pub struct PrefixedCharEncoder<I>(AddCharPrefix<CharEncoder<I>>)
where
    I: Iterator<Item = u8>;

impl<I: Iterator<Item = u8>> Iterator for PrefixedCharEncoder<I> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn fold<B, F>(self, init: B, f: F) -> B
    where
        F: FnMut(B, Self::Item) -> B,
    {
        self.0.fold(init, f)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<I: Iterator<Item = u8>> FusedIterator for PrefixedCharEncoder<I> {}

/// Like [`encode_to_chars`], but emits the `"MT:"` scheme prefix first.
pub fn encode_to_chars_prefixed<I>(
    bytes: I,
) -> PrefixedCharEncoder<I::IntoIter>
where
    I: IntoIterator<Item = u8>,
{
    PrefixedCharEncoder(add_char_prefix(encode_to_chars(bytes)))
}

/// Iterator returned by [`encode_to_bytes_prefixed`].
pub struct PrefixedAsciiEncoder<I>(AddBytePrefix<AsciiEncoder<I>>)
where
    I: Iterator<Item = u8>;

impl<I: Iterator<Item = u8>> Iterator for PrefixedAsciiEncoder<I> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn fold<B, F>(self, init: B, f: F) -> B
    where
        F: FnMut(B, Self::Item) -> B,
    {
        self.0.fold(init, f)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<I: Iterator<Item = u8>> FusedIterator for PrefixedAsciiEncoder<I> {}

/// Like [`encode_to_bytes`], but emits the `"MT:"` scheme prefix first.
pub fn encode_to_bytes_prefixed<I>(
    bytes: I,
) -> PrefixedAsciiEncoder<I::IntoIter>
where
    I: IntoIterator<Item = u8>,
{
    PrefixedAsciiEncoder(add_byte_prefix(encode_to_bytes(bytes)))
}

#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn encode_to_string_prefixed<I>(bytes: I) -> String
where
    I: IntoIterator<Item = u8>,
{
    encode_to_chars_prefixed(bytes).collect()
}
