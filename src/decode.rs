/*
 * Copyright (C) 2021-2022 taylor.fish <contact@taylor.fish>
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

//! Functions and types for decoding base-38 strings.

use super::iter::{BaseIterator, Flatten, InspectBaseIterator};
use super::Digit;
use super::{DIGITS_PER_CHUNK, PREFIX, PREFIX_CHARS};

use core::array;
use core::fmt::{self, Formatter};
use core::iter::{FusedIterator, Take};
use core::str::Chars;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// An error encountered while decoding.
#[non_exhaustive]
#[derive(Debug)]
pub enum DecodeError {
    /// Encountered a character outside the 38-symbol alphabet.
    BadChar(char),
    /// The input was not a valid number of characters. A valid encoding
    /// has a length of 0, 2, or 4 (mod 5).
    BadLength,
    /// The `"MT:"` prefix was required but missing.
    MissingPrefix,
}

use DecodeError as Error;

/// Alias of <code>[Result]\<T, [DecodeError]></code>.
pub type DecodeResult<T> = Result<T, DecodeError>;

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Self::BadChar(c) => write!(f, "bad character: {:?}", c),
            Self::BadLength => write!(f, "bad input length"),
            Self::MissingPrefix => write!(f, "missing {:?} prefix", PREFIX),
        }
    }
}

#[cfg(feature = "std")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "std")))]
impl std::error::Error for DecodeError {}

/// Used by the `decode_*_with` functions to configure the decoding process.
#[non_exhaustive]
#[derive(Clone, Copy)]
pub struct DecodeConfig {
    /// Whether the `"MT:"` prefix must be present. The prefix is always
    /// accepted and stripped; this makes its absence an error.
    /// [default: false]
    pub require_prefix: bool,
}

impl DecodeConfig {
    /// Returns the default configuration.
    pub const fn new() -> Self {
        Self {
            require_prefix: false,
        }
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
enum StripPrefixState {
    Init,
    Buffered { buf: [char; 3], len: u8, pos: u8 },
    Running,
    Done,
}

struct StripPrefix<I> {
    iter: I,
    config: DecodeConfig,
    state: StripPrefixState,
}

impl<I> StripPrefix<I> {
    pub fn new(iter: I, config: DecodeConfig) -> Self {
        Self {
            iter,
            config,
            state: StripPrefixState::Init,
        }
    }
}

impl<I: InspectBaseIterator> InspectBaseIterator for StripPrefix<I> {
    type Iter = I::Iter;

    fn base_iterator(&self) -> &Self::Iter {
        self.iter.base_iterator()
    }
}

impl<I> Iterator for StripPrefix<I>
where
    I: Iterator<Item = char>,
{
    type Item = DecodeResult<char>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            break match self.state {
                StripPrefixState::Init => {
                    let mut buf = ['\0'; 3];
                    let mut len = 0_u8;
                    for slot in &mut buf {
                        match self.iter.next() {
                            Some(c) => {
                                *slot = c;
                                len += 1;
                            }
                            None => break,
                        }
                    }
                    if usize::from(len) == buf.len() && buf == PREFIX_CHARS {
                        self.state = StripPrefixState::Running;
                        continue;
                    }
                    if self.config.require_prefix {
                        self.state = StripPrefixState::Done;
                        Some(Err(Error::MissingPrefix))
                    } else {
                        self.state = StripPrefixState::Buffered {
                            buf,
                            len,
                            pos: 0,
                        };
                        continue;
                    }
                }
                StripPrefixState::Buffered { buf, len, pos } => {
                    if pos < len {
                        self.state = StripPrefixState::Buffered {
                            buf,
                            len,
                            pos: pos + 1,
                        };
                        Some(Ok(buf[usize::from(pos)]))
                    } else if usize::from(len) < buf.len() {
                        // The input ended while looking for the prefix.
                        self.state = StripPrefixState::Done;
                        None
                    } else {
                        self.state = StripPrefixState::Running;
                        continue;
                    }
                }
                StripPrefixState::Running => match self.iter.next() {
                    Some(c) => Some(Ok(c)),
                    None => {
                        self.state = StripPrefixState::Done;
                        None
                    }
                },
                StripPrefixState::Done => None,
            };
        }
    }
}

impl<I: Iterator<Item = char>> FusedIterator for StripPrefix<I> {}

struct CharsToDigits<I>(I);

impl<I> CharsToDigits<I> {
    pub fn new(iter: I) -> Self {
        Self(iter)
    }
}

impl<I: InspectBaseIterator> InspectBaseIterator for CharsToDigits<I> {
    type Iter = I::Iter;

    fn base_iterator(&self) -> &Self::Iter {
        self.0.base_iterator()
    }
}

impl<I> Iterator for CharsToDigits<I>
where
    I: Iterator<Item = DecodeResult<char>>,
{
    type Item = DecodeResult<Digit>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|c| {
            c.and_then(|c| Digit::from_char(c).ok_or(Error::BadChar(c)))
        })
    }
}

impl<I: FusedIterator<Item = DecodeResult<char>>> FusedIterator
    for CharsToDigits<I>
{
}

struct DigitsToUnflatBytes<I>(I);

impl<I> DigitsToUnflatBytes<I> {
    pub fn new(iter: I) -> Self {
        Self(iter)
    }
}

impl<I: InspectBaseIterator> InspectBaseIterator for DigitsToUnflatBytes<I> {
    type Iter = I::Iter;

    fn base_iterator(&self) -> &Self::Iter {
        self.0.base_iterator()
    }
}

type DigitsToUnflatBytesItem = Take<array::IntoIter<DecodeResult<u8>, 3>>;

impl<I> Iterator for DigitsToUnflatBytes<I>
where
    I: Iterator<Item = DecodeResult<Digit>>,
{
    type Item = DigitsToUnflatBytesItem;

    fn next(&mut self) -> Option<Self::Item> {
        let mut value = 0_u32;
        let mut scale = 1_u32;
        let mut len = 0_usize;
        self.0
            .by_ref()
            .take(DIGITS_PER_CHUNK)
            .try_for_each(|d| {
                d.map(|d| {
                    value += u32::from(u8::from(d)) * scale;
                    scale *= 38;
                    len += 1;
                })
            })
            .and(match len {
                0 => Ok(None),
                2 => Ok(Some(1)),
                4 => Ok(Some(2)),
                5 => Ok(Some(3)),
                // A chunk of 1 or 3 digits has no byte decomposition.
                _ => Err(Error::BadLength),
            })
            .map(|opt| {
                opt.map(|num_bytes| {
                    let [a, b, c, _] = value.to_le_bytes();
                    IntoIterator::into_iter([Ok(a), Ok(b), Ok(c)])
                        .take(num_bytes)
                })
            })
            .unwrap_or_else(|e| {
                let arr = [Err(e), Ok(0), Ok(0)];
                Some(IntoIterator::into_iter(arr).take(1))
            })
    }
}

impl<I: FusedIterator<Item = DecodeResult<Digit>>> FusedIterator
    for DigitsToUnflatBytes<I>
{
}

fn size_hint_from_chars_hint(
    hint: (usize, Option<usize>),
) -> (usize, Option<usize>) {
    let (lower, upper) = hint;
    (
        // Each chunk of up to 5 characters yields at least one item, even
        // when it collapses into a single error.
        lower.saturating_sub(PREFIX.len()) / DIGITS_PER_CHUNK,
        // At most 3 bytes per 5 characters, and at most one error item per
        // character, so the character count itself is an upper bound.
        upper,
    )
}

/// Iterator returned by [`decode_chars`].
#[allow(clippy::type_complexity)]
pub struct CharDecoder<I>(
    Flatten<
        DigitsToUnflatBytes<CharsToDigits<StripPrefix<BaseIterator<I>>>>,
        DigitsToUnflatBytesItem,
    >,
);

impl<I> CharDecoder<I> {
    pub(crate) fn new(iter: I, config: DecodeConfig) -> Self {
        Self(Flatten::new(DigitsToUnflatBytes::new(CharsToDigits::new(
            StripPrefix::new(BaseIterator(iter), config),
        ))))
    }
}

impl<I> InspectBaseIterator for CharDecoder<I> {
    type Iter = I;

    fn base_iterator(&self) -> &Self::Iter {
        self.0.base_iterator()
    }
}

impl<I> Iterator for CharDecoder<I>
where
    I: Iterator<Item = char>,
{
    type Item = DecodeResult<u8>;

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
        size_hint_from_chars_hint(self.base_iterator().size_hint())
    }
}

// `StripPrefix` implements `FusedIterator`, so `CharDecoder` also can even
// if `I` doesn't.
impl<I: Iterator<Item = char>> FusedIterator for CharDecoder<I> {}

struct BytesToChars<I>(I);

impl<I> InspectBaseIterator for BytesToChars<I> {
    type Iter = I;

    fn base_iterator(&self) -> &Self::Iter {
        &self.0
    }
}

impl<I> Iterator for BytesToChars<I>
where
    I: Iterator<Item = u8>,
{
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(char::from)
    }

    fn fold<B, F>(self, init: B, mut f: F) -> B
    where
        F: FnMut(B, Self::Item) -> B,
    {
        self.0.fold(init, |b, byte| f(b, char::from(byte)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<I: FusedIterator<Item = u8>> FusedIterator for BytesToChars<I> {}

/// Iterator returned by [`decode_bytes`].
///
/// Bytes outside the ASCII range are never in the alphabet; they are
/// reported as [`DecodeError::BadChar`] of the corresponding Latin-1
/// character.
pub struct BytesDecoder<I>(CharDecoder<BytesToChars<I>>);

impl<I> BytesDecoder<I> {
    pub(crate) fn new(iter: I, config: DecodeConfig) -> Self {
        Self(CharDecoder::new(BytesToChars(iter), config))
    }
}

impl<I> Iterator for BytesDecoder<I>
where
    I: Iterator<Item = u8>,
{
    type Item = DecodeResult<u8>;

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
        size_hint_from_chars_hint(
            self.0.base_iterator().base_iterator().size_hint(),
        )
    }
}

impl<I: FusedIterator<Item = u8>> FusedIterator for BytesDecoder<I> {}

/// Iterator returned by [`decode_str`].
pub struct StrDecoder<'a>(CharDecoder<Chars<'a>>);

impl<'a> StrDecoder<'a> {
    pub(crate) fn new(s: &'a str, config: DecodeConfig) -> Self {
        Self(CharDecoder::new(s.chars(), config))
    }
}

impl<'a> Iterator for StrDecoder<'a> {
    type Item = DecodeResult<u8>;

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
        let len = self.0.base_iterator().as_str().len();
        // `len` counts UTF-8 bytes; there are at least `len / 4` chars.
        size_hint_from_chars_hint((len / 4, Some(len)))
    }
}

impl<'a> FusedIterator for StrDecoder<'a> {}

/// Decodes a sequence of base-38 chars.
pub fn decode_chars<I>(chars: I) -> CharDecoder<I::IntoIter>
where
    I: IntoIterator<Item = char>,
{
    decode_chars_with(chars, DecodeConfig::new())
}

/// Decodes base-38 data from raw bytes.
pub fn decode_bytes<I>(bytes: I) -> BytesDecoder<I::IntoIter>
where
    I: IntoIterator<Item = u8>,
{
    decode_bytes_with(bytes, DecodeConfig::new())
}

/// Decodes a base-38 `str`.
pub fn decode_str(s: &str) -> StrDecoder<'_> {
    decode_str_with(s, DecodeConfig::new())
}

/// Decodes a sequence of base-38 chars with the given config.
///
/// This function is like [`decode_chars`], but takes a configuration object.
pub fn decode_chars_with<I>(
    chars: I,
    config: DecodeConfig,
) -> CharDecoder<I::IntoIter>
where
    I: IntoIterator<Item = char>,
{
    CharDecoder::new(chars.into_iter(), config)
}

/// Decodes base-38 data from raw bytes with the given config.
///
/// This function is like [`decode_bytes`], but takes a configuration object.
pub fn decode_bytes_with<I>(
    bytes: I,
    config: DecodeConfig,
) -> BytesDecoder<I::IntoIter>
where
    I: IntoIterator<Item = u8>,
{
    BytesDecoder::new(bytes.into_iter(), config)
}

/// Decodes a base-38 `str` with the given config.
///
/// This function is like [`decode_str`], but takes a configuration object.
pub fn decode_str_with(s: &str, config: DecodeConfig) -> StrDecoder<'_> {
    StrDecoder::new(s, config)
}

/// Takes a decoder and stores the contents in a [`Vec`].
///
/// This is equivalent to calling [`decoder.collect()`](Iterator::collect).
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn decode_to_vec<D>(decoder: D) -> DecodeResult<Vec<u8>>
where
    D: Iterator<Item = DecodeResult<u8>>,
{
    decoder.collect()
}
