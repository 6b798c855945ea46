//! The framebuffer capture loop (spec §4.6).
//!
//! A capture issues one non-incremental `FramebufferUpdateRequest` and then
//! reads server messages until every cell of the requested rectangle has
//! been painted at least once, since a server is free to answer with
//! several `FramebufferUpdate` messages, each covering only part of the
//! request, and free to interleave unrelated `ServerCutText` messages in
//! between. Each painted cell's alpha byte doubles as a completeness mark
//! (see [`crate::pixelbuffer`]): once every cell in the requested rectangle
//! has alpha 255, the loop is done.
//!
//! `Zlib`-encoded rectangles are decompressed against one
//! [`flate2::Decompress`] instance kept alive for the lifetime of the
//! session: the server treats the compressed byte stream as one continuous
//! deflate stream across every zlib rectangle it ever sends, not as
//! independently-compressed chunks, so the decompressor's window must carry
//! forward between captures exactly as it does between rectangles within a
//! single capture.

use std::io::{Read, Write};

use flate2::{Decompress, FlushDecompress};

use crate::error::{Error, Result};
use crate::pixelbuffer::PixelBuffer;
use crate::wire;
use crate::Rect;

const ENCODING_RAW: i32 = 0;
const ENCODING_ZLIB: i32 = 6;

const MSG_FRAMEBUFFER_UPDATE: u8 = 0;
const MSG_SERVER_CUT_TEXT: u8 = 2;

/// Sends a non-incremental `FramebufferUpdateRequest` covering `rect`.
fn request_update<W: Write>(writer: &mut W, rect: Rect) -> Result<()> {
    wire::write_u8(writer, 3)?;
    wire::write_u8(writer, 0)?; // incremental = false
    wire::write_u16(writer, rect.x as u16)?;
    wire::write_u16(writer, rect.y as u16)?;
    wire::write_u16(writer, rect.width as u16)?;
    wire::write_u16(writer, rect.height as u16)
}

/// Requests and assembles a full capture of `rect` against a `width x
/// height` framebuffer, decoding `Raw` and `Zlib` rectangles into `buffer`
/// and returning once `rect` is fully covered.
pub fn capture<S: Read + Write>(
    stream: &mut S,
    decompress: &mut Decompress,
    buffer: &mut PixelBuffer,
    rect: Rect,
) -> Result<Vec<u8>> {
    request_update(stream, rect)?;
    loop {
        let message_type = wire::read_u8(stream)?;
        match message_type {
            MSG_FRAMEBUFFER_UPDATE => {
                let mut padding = [0u8; 1];
                wire::read_exact(stream, &mut padding)?;
                let count = wire::read_u16(stream)?;
                for _ in 0..count {
                    read_rectangle(stream, decompress, buffer)?;
                }
                if buffer.is_fully_covered(rect) {
                    return Ok(buffer.sub_rect(rect));
                }
            }
            MSG_SERVER_CUT_TEXT => {
                let mut padding = [0u8; 3];
                wire::read_exact(stream, &mut padding)?;
                // Clipboard write-back is out of scope; drain and discard.
                wire::read_string(stream)?;
            }
            other => return Err(Error::UnknownMessageType(other)),
        }
    }
}

fn read_rectangle<S: Read + Write>(
    stream: &mut S,
    decompress: &mut Decompress,
    buffer: &mut PixelBuffer,
) -> Result<()> {
    let x = wire::read_u16(stream)? as u32;
    let y = wire::read_u16(stream)? as u32;
    let width = wire::read_u16(stream)? as u32;
    let height = wire::read_u16(stream)? as u32;
    let encoding = wire::read_i32(stream)?;
    let dst = Rect {
        x,
        y,
        width,
        height,
    };

    let pixel_count = width as usize * height as usize * 4;
    let pixels = match encoding {
        ENCODING_RAW => {
            let mut pixels = vec![0u8; pixel_count];
            wire::read_exact(stream, &mut pixels)?;
            pixels
        }
        ENCODING_ZLIB => {
            let length = wire::read_u32(stream)?;
            let mut compressed = vec![0u8; length as usize];
            wire::read_exact(stream, &mut compressed)?;
            decompress_rect(decompress, &compressed, pixel_count)?
        }
        other => return Err(Error::UnsupportedEncoding(other)),
    };

    buffer.blit(dst, &pixels);
    Ok(())
}

fn decompress_rect(decompress: &mut Decompress, input: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    let mut output = vec![0u8; expected_len];
    let mut input_offset = 0;
    let mut output_offset = 0;
    while output_offset < expected_len {
        let before_in = decompress.total_in();
        let before_out = decompress.total_out();
        decompress
            .decompress(
                &input[input_offset..],
                &mut output[output_offset..],
                FlushDecompress::None,
            )
            .map_err(|error| Error::CorruptRectangle(format!("zlib: {}", error)))?;
        input_offset += (decompress.total_in() - before_in) as usize;
        output_offset += (decompress.total_out() - before_out) as usize;
        if input_offset >= input.len() && output_offset < expected_len {
            return Err(Error::CorruptRectangle(
                "zlib stream ended before the declared pixel count was produced".to_string(),
            ));
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct Duplex {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl Read for Duplex {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for Duplex {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.output.write(buf)
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn raw_update(rect: Rect, fill: u8) -> Vec<u8> {
        let mut bytes = vec![MSG_FRAMEBUFFER_UPDATE, 0, 0, 1];
        bytes.extend((rect.x as u16).to_be_bytes());
        bytes.extend((rect.y as u16).to_be_bytes());
        bytes.extend((rect.width as u16).to_be_bytes());
        bytes.extend((rect.height as u16).to_be_bytes());
        bytes.extend(ENCODING_RAW.to_be_bytes());
        bytes.extend(vec![fill; rect.width as usize * rect.height as usize * 4]);
        bytes
    }

    #[test]
    fn single_raw_rectangle_completes_the_capture() {
        let rect = Rect {
            x: 0,
            y: 0,
            width: 2,
            height: 2,
        };
        let mut stream = Duplex {
            input: Cursor::new(raw_update(rect, 7)),
            output: Vec::new(),
        };
        let mut decompress = Decompress::new(true);
        let mut buffer = PixelBuffer::new(2, 2);
        let captured = capture(&mut stream, &mut decompress, &mut buffer, rect).unwrap();
        assert_eq!(captured, vec![7u8; 16]);
        assert_eq!(&stream.output, &[3, 0, 0, 0, 0, 0, 0, 2, 0, 2]);
    }

    #[test]
    fn server_cut_text_between_updates_is_drained_and_ignored() {
        let rect = Rect {
            x: 0,
            y: 0,
            width: 1,
            height: 1,
        };
        let mut bytes = vec![MSG_SERVER_CUT_TEXT, 0, 0, 0];
        bytes.extend(&[0, 0, 0, 5]);
        bytes.extend(b"hello");
        bytes.extend(raw_update(rect, 1));
        let mut stream = Duplex {
            input: Cursor::new(bytes),
            output: Vec::new(),
        };
        let mut decompress = Decompress::new(true);
        let mut buffer = PixelBuffer::new(1, 1);
        let captured = capture(&mut stream, &mut decompress, &mut buffer, rect).unwrap();
        assert_eq!(captured, vec![1, 1, 1, 255]);
    }

    #[test]
    fn partial_rectangle_does_not_complete_the_capture() {
        let rect = Rect {
            x: 0,
            y: 0,
            width: 2,
            height: 2,
        };
        let small_rect = Rect {
            x: 0,
            y: 0,
            width: 1,
            height: 1,
        };
        let mut bytes = vec![MSG_FRAMEBUFFER_UPDATE, 0, 0, 1];
        bytes.extend((small_rect.x as u16).to_be_bytes());
        bytes.extend((small_rect.y as u16).to_be_bytes());
        bytes.extend((small_rect.width as u16).to_be_bytes());
        bytes.extend((small_rect.height as u16).to_be_bytes());
        bytes.extend(ENCODING_RAW.to_be_bytes());
        bytes.extend(vec![9u8; 4]);
        bytes.extend(raw_update(rect, 5));
        let mut stream = Duplex {
            input: Cursor::new(bytes),
            output: Vec::new(),
        };
        let mut decompress = Decompress::new(true);
        let mut buffer = PixelBuffer::new(2, 2);
        let captured = capture(&mut stream, &mut decompress, &mut buffer, rect).unwrap();
        // Second update overwrites (0,0) entirely, so the final pixel there is 5 not 9.
        assert_eq!(captured, vec![5u8; 16]);
    }

    #[test]
    fn unsupported_encoding_is_rejected() {
        let rect = Rect {
            x: 0,
            y: 0,
            width: 1,
            height: 1,
        };
        let mut bytes = vec![MSG_FRAMEBUFFER_UPDATE, 0, 0, 1];
        bytes.extend((rect.x as u16).to_be_bytes());
        bytes.extend((rect.y as u16).to_be_bytes());
        bytes.extend((rect.width as u16).to_be_bytes());
        bytes.extend((rect.height as u16).to_be_bytes());
        bytes.extend(5i32.to_be_bytes()); // Hextile, unsupported
        let mut stream = Duplex {
            input: Cursor::new(bytes),
            output: Vec::new(),
        };
        let mut decompress = Decompress::new(true);
        let mut buffer = PixelBuffer::new(1, 1);
        let error = capture(&mut stream, &mut decompress, &mut buffer, rect).unwrap_err();
        assert!(matches!(error, Error::UnsupportedEncoding(5)));
    }

    #[test]
    fn zlib_rectangle_decodes_against_a_persistent_stream() {
        use flate2::write::ZlibEncoder;
        use flate2::Compression;
        use std::io::Write as _;

        let rect = Rect {
            x: 0,
            y: 0,
            width: 1,
            height: 1,
        };
        let pixel = vec![3u8, 4, 5, 0];
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&pixel).unwrap();
        let compressed = encoder.finish().unwrap();

        let mut bytes = vec![MSG_FRAMEBUFFER_UPDATE, 0, 0, 1];
        bytes.extend((rect.x as u16).to_be_bytes());
        bytes.extend((rect.y as u16).to_be_bytes());
        bytes.extend((rect.width as u16).to_be_bytes());
        bytes.extend((rect.height as u16).to_be_bytes());
        bytes.extend(ENCODING_ZLIB.to_be_bytes());
        bytes.extend((compressed.len() as u32).to_be_bytes());
        bytes.extend(&compressed);

        let mut stream = Duplex {
            input: Cursor::new(bytes),
            output: Vec::new(),
        };
        let mut decompress = Decompress::new(true);
        let mut buffer = PixelBuffer::new(1, 1);
        let captured = capture(&mut stream, &mut decompress, &mut buffer, rect).unwrap();
        assert_eq!(captured, vec![3, 4, 5, 255]);
    }
}
