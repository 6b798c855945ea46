//! The four fixed 32bpp pixel-format records this client supports.
//!
//! Every RFB server pixel format is, in general, a ten-field record (bits
//! per pixel, depth, endianness, true-colour flag, per-channel maxima and
//! shifts). This client only ever negotiates one of four fixed 32bpp/24-depth
//! byte patterns that differ in byte order and channel shift, so rather than
//! modeling the general record we keep the literal 16-byte wire patterns and
//! a name to select among them.

use std::io::{Read, Write};

use crate::wire;
use crate::error::Result;

/// Selects which of the four supported 32bpp channel layouts to negotiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormatName {
    Rgba,
    Bgra,
    Argb,
    Abgr,
}

impl PixelFormatName {
    /// Parses a configuration string (`"rgba"`, `"bgra"`, `"argb"`, `"abgr"`).
    pub fn parse(name: &str) -> Option<PixelFormatName> {
        match name {
            "rgba" => Some(PixelFormatName::Rgba),
            "bgra" => Some(PixelFormatName::Bgra),
            "argb" => Some(PixelFormatName::Argb),
            "abgr" => Some(PixelFormatName::Abgr),
            _ => None,
        }
    }

    /// The literal 16-byte wire record for this variant (spec §6).
    pub fn wire_bytes(self) -> [u8; 16] {
        match self {
            PixelFormatName::Bgra => [
                0x20, 0x18, 0x00, 0x01, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x10, 0x08, 0x00, 0x00,
                0x00, 0x00,
            ],
            PixelFormatName::Rgba => [
                0x20, 0x18, 0x00, 0x01, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0x08, 0x10, 0x00,
                0x00, 0x00,
            ],
            PixelFormatName::Argb => [
                0x20, 0x18, 0x01, 0x01, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x10, 0x08, 0x00, 0x00,
                0x00, 0x00,
            ],
            PixelFormatName::Abgr => [
                0x20, 0x18, 0x01, 0x01, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0x08, 0x10, 0x00,
                0x00, 0x00,
            ],
        }
    }
}

impl Default for PixelFormatName {
    fn default() -> Self {
        PixelFormatName::Rgba
    }
}

/// Writes the `SetPixelFormat` message (type byte `0`, 3 padding bytes, 16-byte record).
pub fn write_set_pixel_format<W: Write>(writer: &mut W, format: PixelFormatName) -> Result<()> {
    wire::write_u8(writer, 0)?;
    wire::write_all(writer, &[0u8; 3])?;
    wire::write_all(writer, &format.wire_bytes())
}

/// The server's own pixel format as sent in `ServerInit`. The client never
/// uses it for decoding (it always forces its own format with
/// `SetPixelFormat`); it is parsed only so the 16 bytes can be consumed off
/// the wire.
pub fn read_and_discard_server_format<R: Read>(reader: &mut R) -> Result<()> {
    let mut buf = [0u8; 16];
    wire::read_exact(reader, &mut buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_bytes_match_spec_table() {
        assert_eq!(
            PixelFormatName::Bgra.wire_bytes(),
            [
                0x20, 0x18, 0x00, 0x01, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x10, 0x08, 0x00, 0x00,
                0x00, 0x00
            ]
        );
        assert_eq!(
            PixelFormatName::Rgba.wire_bytes(),
            [
                0x20, 0x18, 0x00, 0x01, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0x08, 0x10, 0x00,
                0x00, 0x00
            ]
        );
        assert_eq!(
            PixelFormatName::Argb.wire_bytes(),
            [
                0x20, 0x18, 0x01, 0x01, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x10, 0x08, 0x00, 0x00,
                0x00, 0x00
            ]
        );
        assert_eq!(
            PixelFormatName::Abgr.wire_bytes(),
            [
                0x20, 0x18, 0x01, 0x01, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0x08, 0x10, 0x00,
                0x00, 0x00
            ]
        );
    }

    #[test]
    fn parse_round_trips_all_names() {
        for (name, variant) in [
            ("rgba", PixelFormatName::Rgba),
            ("bgra", PixelFormatName::Bgra),
            ("argb", PixelFormatName::Argb),
            ("abgr", PixelFormatName::Abgr),
        ] {
            assert_eq!(PixelFormatName::parse(name), Some(variant));
        }
        assert_eq!(PixelFormatName::parse("nope"), None);
    }

    #[test]
    fn set_pixel_format_message_shape() {
        let mut buf = Vec::new();
        write_set_pixel_format(&mut buf, PixelFormatName::Rgba).unwrap();
        assert_eq!(buf.len(), 20);
        assert_eq!(buf[0], 0);
        assert_eq!(&buf[1..4], &[0, 0, 0]);
        assert_eq!(&buf[4..20], &PixelFormatName::Rgba.wire_bytes());
    }
}
