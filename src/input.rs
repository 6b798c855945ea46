//! Keyboard and pointer input emission (spec §4.5).
//!
//! Wire framing for `KeyEvent` (type 4) and `PointerEvent` (type 5) follows
//! the core RFB message layout unchanged since protocol version 3.3. The
//! higher-level press/click/write operations here are modelled on
//! `pyvnc_sync.py`'s `SyncVNCClient`. The scoped "hold" guards
//! (`KeyHold`/`MouseHold`) live in `session.rs` instead of here: releasing a
//! held key or button on drop needs to reach back into the owning
//! `Session`'s stream and button-mask state, not just a bare writer, so the
//! guards are defined where that state lives.

use std::io::Write;

use byteorder::{BigEndian, ByteOrder};

use crate::error::Result;
use crate::keysym;
use crate::wire;

pub const BUTTON_LEFT: u8 = 1 << 0;
pub const BUTTON_MIDDLE: u8 = 1 << 1;
pub const BUTTON_RIGHT: u8 = 1 << 2;
pub const BUTTON_SCROLL_UP: u8 = 1 << 3;
pub const BUTTON_SCROLL_DOWN: u8 = 1 << 4;

/// Writes a `KeyEvent` message: type 4, down flag, 2 padding bytes, keysym.
pub fn write_key_event<W: Write>(writer: &mut W, down: bool, keysym: u32) -> Result<()> {
    wire::write_u8(writer, 4)?;
    wire::write_u8(writer, if down { 1 } else { 0 })?;
    wire::write_all(writer, &[0u8; 2])?;
    let mut buf = [0u8; 4];
    BigEndian::write_u32(&mut buf, keysym);
    wire::write_all(writer, &buf)
}

/// Writes a `PointerEvent` message: type 5, button mask, x, y.
pub fn write_pointer_event<W: Write>(
    writer: &mut W,
    button_mask: u8,
    x: u16,
    y: u16,
) -> Result<()> {
    wire::write_u8(writer, 5)?;
    wire::write_u8(writer, button_mask)?;
    wire::write_u16(writer, x)?;
    wire::write_u16(writer, y)
}

/// Sends a full key press (down then up) for a single symbolic key name.
pub fn press<W: Write>(writer: &mut W, key: &str) -> Result<()> {
    let code = keysym::lookup(key)?;
    write_key_event(writer, true, code)?;
    write_key_event(writer, false, code)
}

/// Sends a full press for every character of `text` in order, each resolved
/// through [`keysym::lookup`] via the Latin-1 identity.
pub fn write_text<W: Write>(writer: &mut W, text: &str) -> Result<()> {
    for ch in text.chars() {
        let mut buf = [0u8; 4];
        press(writer, ch.encode_utf8(&mut buf))?;
    }
    Ok(())
}

/// Presses and releases a single mouse button at `(x, y)`, preserving
/// whatever other buttons `base_mask` already has held.
pub fn click<W: Write>(writer: &mut W, base_mask: u8, button: u8, x: u16, y: u16) -> Result<()> {
    write_pointer_event(writer, base_mask | button, x, y)?;
    write_pointer_event(writer, base_mask, x, y)
}

/// Two clicks back to back, as a double click.
pub fn double_click<W: Write>(
    writer: &mut W,
    base_mask: u8,
    button: u8,
    x: u16,
    y: u16,
) -> Result<()> {
    click(writer, base_mask, button, x, y)?;
    click(writer, base_mask, button, x, y)
}

/// Moves the pointer to `(x, y)` without changing which buttons are held.
pub fn move_to<W: Write>(writer: &mut W, base_mask: u8, x: u16, y: u16) -> Result<()> {
    write_pointer_event(writer, base_mask, x, y)
}
