use super::{PREFIX_ASCII, PREFIX_CHARS};
use core::array;
use core::iter::Chain;

pub type AddCharPrefix<I> = Chain<array::IntoIter<char, 3>, I>;

pub fn add_char_prefix<I>(iter: I) -> AddCharPrefix<I>
where
    I: Iterator<Item = char>,
{
    IntoIterator::into_iter(PREFIX_CHARS).chain(iter)
}

pub type AddBytePrefix<I> = Chain<array::IntoIter<u8, 3>, I>;

pub fn add_byte_prefix<I>(iter: I) -> AddBytePrefix<I>
where
    I: Iterator<Item = u8>,
{
    IntoIterator::into_iter(PREFIX_ASCII).chain(iter)
}
