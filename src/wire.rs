//! Byte-exact primitives shared by every higher protocol layer.
//!
//! Every other module reads the wire through `read_exact`/`read_u8`/`read_u16`/
//! `read_u32` and writes through a single buffered `write_all` per logical
//! message, so no layer ever has to reason about partial reads or interleaved
//! writes.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use crate::error::Result;

/// Reads exactly `buf.len()` bytes, failing with [`crate::Error::Transport`] on
/// premature close.
pub fn read_exact<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf)?;
    Ok(())
}

pub fn read_u8<R: Read + ?Sized>(reader: &mut R) -> Result<u8> {
    Ok(reader.read_u8()?)
}

pub fn read_u16<R: Read + ?Sized>(reader: &mut R) -> Result<u16> {
    Ok(reader.read_u16::<BigEndian>()?)
}

pub fn read_u32<R: Read + ?Sized>(reader: &mut R) -> Result<u32> {
    Ok(reader.read_u32::<BigEndian>()?)
}

pub fn read_i32<R: Read + ?Sized>(reader: &mut R) -> Result<i32> {
    Ok(reader.read_i32::<BigEndian>()?)
}

/// Reads a 4-byte big-endian length prefix followed by that many bytes.
pub fn read_string<R: Read + ?Sized>(reader: &mut R) -> Result<String> {
    let length = read_u32(reader)?;
    let mut bytes = vec![0; length as usize];
    read_exact(reader, &mut bytes)?;
    // RFB strings are Latin-1; every byte value maps to the codepoint of the same value.
    Ok(bytes.iter().map(|&b| b as char).collect())
}

pub fn write_u8<W: Write + ?Sized>(writer: &mut W, value: u8) -> Result<()> {
    writer.write_u8(value)?;
    Ok(())
}

pub fn write_u16<W: Write + ?Sized>(writer: &mut W, value: u16) -> Result<()> {
    writer.write_u16::<BigEndian>(value)?;
    Ok(())
}

pub fn write_i32<W: Write + ?Sized>(writer: &mut W, value: i32) -> Result<()> {
    writer.write_i32::<BigEndian>(value)?;
    Ok(())
}

pub fn write_all<W: Write + ?Sized>(writer: &mut W, buf: &[u8]) -> Result<()> {
    writer.write_all(buf)?;
    Ok(())
}
