//! Session initialization: `ClientInit`, `ServerInit`, `SetPixelFormat`,
//! `SetEncodings` (spec §4.3).
//!
//! The server's own pixel format in `ServerInit` is read purely to keep the
//! wire in sync; this client always forces one of its four supported 32bpp
//! layouts right after with `SetPixelFormat`. `SetEncodings` advertises only
//! `Zlib` (6): `Raw` (0) is implicitly supported by every RFB server and
//! need not be listed, and it's the only other encoding this client's
//! framebuffer loop knows how to decode.

use std::io::{Read, Write};

use crate::pixel_format::{self, PixelFormatName};
use crate::wire;
use crate::error::Result;

const ENCODING_ZLIB: i32 = 6;

/// The fixed outcome of a successful session handshake: the server's
/// framebuffer dimensions and its advertised desktop name.
#[derive(Debug, Clone)]
pub struct ServerInit {
    pub framebuffer_width: u16,
    pub framebuffer_height: u16,
    pub name: String,
}

/// Sends `ClientInit`. `shared` set to `true` asks the server not to
/// disconnect any other clients already attached to the desktop, which is
/// the only sane default for a client that only ever observes and injects
/// input rather than claiming exclusive control.
pub fn write_client_init<W: Write>(writer: &mut W, shared: bool) -> Result<()> {
    wire::write_u8(writer, if shared { 1 } else { 0 })
}

/// Reads `ServerInit`: framebuffer size, the server's pixel format (read and
/// discarded), and the desktop name.
pub fn read_server_init<R: Read>(reader: &mut R) -> Result<ServerInit> {
    let framebuffer_width = wire::read_u16(reader)?;
    let framebuffer_height = wire::read_u16(reader)?;
    pixel_format::read_and_discard_server_format(reader)?;
    let name = wire::read_string(reader)?;
    Ok(ServerInit {
        framebuffer_width,
        framebuffer_height,
        name,
    })
}

/// Sends `SetPixelFormat` with the given format, then `SetEncodings`
/// advertising `Zlib` alone.
pub fn configure_session<S: Read + Write>(stream: &mut S, format: PixelFormatName) -> Result<()> {
    pixel_format::write_set_pixel_format(stream, format)?;
    write_set_encodings(stream, &[ENCODING_ZLIB])
}

fn write_set_encodings<W: Write>(writer: &mut W, encodings: &[i32]) -> Result<()> {
    wire::write_u8(writer, 2)?;
    wire::write_all(writer, &[0u8; 1])?;
    wire::write_u16(writer, encodings.len() as u16)?;
    for &encoding in encodings {
        wire::write_i32(writer, encoding)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn client_init_sends_shared_flag() {
        let mut buf = Vec::new();
        write_client_init(&mut buf, true).unwrap();
        assert_eq!(buf, vec![1]);
        let mut buf = Vec::new();
        write_client_init(&mut buf, false).unwrap();
        assert_eq!(buf, vec![0]);
    }

    #[test]
    fn server_init_parses_size_and_name_and_discards_format() {
        let mut bytes = vec![0x05, 0x00, 0x02, 0xD0]; // 1280x720
        bytes.extend(PixelFormatName::Rgba.wire_bytes());
        bytes.extend(&[0, 0, 0, 4]);
        bytes.extend(b"desk");
        let mut cursor = Cursor::new(bytes);
        let init = read_server_init(&mut cursor).unwrap();
        assert_eq!(init.framebuffer_width, 0x0500);
        assert_eq!(init.framebuffer_height, 0x02D0);
        assert_eq!(init.name, "desk");
    }

    #[test]
    fn set_encodings_advertises_zlib_only() {
        let mut buf = Vec::new();
        write_set_encodings(&mut buf, &[ENCODING_ZLIB]).unwrap();
        assert_eq!(buf, vec![2, 0, 0, 1, 0, 0, 0, 6]);
    }

    #[test]
    fn configure_session_sends_pixel_format_then_zlib_only_encodings() {
        let mut buf = Vec::new();
        configure_session(&mut buf, PixelFormatName::Rgba).unwrap();
        let mut expected = vec![0u8];
        expected.extend(&[0u8; 3]);
        expected.extend(PixelFormatName::Rgba.wire_bytes());
        expected.extend(&[2, 0, 0, 1, 0, 0, 0, 6]);
        assert_eq!(buf, expected);
    }
}
