//! Symbolic key names to X11 keysym codes (spec §4.5).
//!
//! X11 keysyms for printable Latin-1 characters are numerically identical to
//! the character's Unicode code point (`'a'` is keysym `0x61`, `'!'` is
//! keysym `0x21`, and so on), so a single printable character is always
//! resolvable without a table lookup. Everything else -- function keys,
//! whitespace control keys, modifiers -- needs a name table, which also
//! carries the handful of convenience aliases (`Ctrl`, `Esc`, `Del`, ...)
//! that map onto the canonical X11 name for the same key.

use crate::error::{Error, Result};

/// Resolves a key name to its X11 keysym code.
///
/// A single-character name resolves via the Latin-1/keysym identity; longer
/// names are looked up in the named-key table, which includes both the
/// canonical X11 names (`Control_L`, `Escape`, `BackSpace`, ...) and a set of
/// shorthand aliases (`Ctrl`, `Esc`, `Del`, `Cmd`, `Super`, `Alt`, `Shift`,
/// `Backspace`, `Space`).
pub fn lookup(name: &str) -> Result<u32> {
    let mut chars = name.chars();
    if let (Some(only), None) = (chars.next(), chars.next()) {
        return Ok(only as u32);
    }
    named_keysym(name).ok_or_else(|| Error::UnknownKey(name.to_string()))
}

fn named_keysym(name: &str) -> Option<u32> {
    Some(match name {
        "BackSpace" | "Backspace" => 0xff08,
        "Tab" => 0xff09,
        "Linefeed" => 0xff0a,
        "Clear" => 0xff0b,
        "Return" | "Enter" => 0xff0d,
        "Pause" => 0xff13,
        "Scroll_Lock" => 0xff14,
        "Sys_Req" => 0xff15,
        "Escape" | "Esc" => 0xff1b,
        "Delete" | "Del" => 0xffff,

        "Home" => 0xff50,
        "Left" => 0xff51,
        "Up" => 0xff52,
        "Right" => 0xff53,
        "Down" => 0xff54,
        "Page_Up" | "PageUp" => 0xff55,
        "Page_Down" | "PageDown" => 0xff56,
        "End" => 0xff57,
        "Begin" => 0xff58,

        "Insert" => 0xff63,
        "Menu" => 0xff67,
        "Cancel" => 0xff69,
        "Find" => 0xff68,
        "Undo" => 0xff65,
        "Redo" => 0xff66,
        "Help" => 0xff6a,
        "Break" => 0xff6b,

        "Num_Lock" => 0xff7f,

        "KP_Space" => 0xff80,
        "KP_Tab" => 0xff89,
        "KP_Enter" => 0xff8d,
        "KP_F1" => 0xff91,
        "KP_F2" => 0xff92,
        "KP_F3" => 0xff93,
        "KP_F4" => 0xff94,
        "KP_Home" => 0xff95,
        "KP_Left" => 0xff96,
        "KP_Up" => 0xff97,
        "KP_Right" => 0xff98,
        "KP_Down" => 0xff99,
        "KP_Page_Up" => 0xff9a,
        "KP_Page_Down" => 0xff9b,
        "KP_End" => 0xff9c,
        "KP_Begin" => 0xff9d,
        "KP_Insert" => 0xff9e,
        "KP_Delete" => 0xff9f,
        "KP_Equal" => 0xffbd,
        "KP_Multiply" => 0xffaa,
        "KP_Add" => 0xffab,
        "KP_Separator" => 0xffac,
        "KP_Subtract" => 0xffad,
        "KP_Decimal" => 0xffae,
        "KP_Divide" => 0xffaf,
        "KP_0" => 0xffb0,
        "KP_1" => 0xffb1,
        "KP_2" => 0xffb2,
        "KP_3" => 0xffb3,
        "KP_4" => 0xffb4,
        "KP_5" => 0xffb5,
        "KP_6" => 0xffb6,
        "KP_7" => 0xffb7,
        "KP_8" => 0xffb8,
        "KP_9" => 0xffb9,

        "F1" => 0xffbe,
        "F2" => 0xffbf,
        "F3" => 0xffc0,
        "F4" => 0xffc1,
        "F5" => 0xffc2,
        "F6" => 0xffc3,
        "F7" => 0xffc4,
        "F8" => 0xffc5,
        "F9" => 0xffc6,
        "F10" => 0xffc7,
        "F11" => 0xffc8,
        "F12" => 0xffc9,
        "F13" => 0xffca,
        "F14" => 0xffcb,
        "F15" => 0xffcc,
        "F16" => 0xffcd,

        "Shift_L" | "Shift" => 0xffe1,
        "Shift_R" => 0xffe2,
        "Control_L" | "Ctrl" => 0xffe3,
        "Control_R" => 0xffe4,
        "Caps_Lock" => 0xffe5,
        "Shift_Lock" => 0xffe6,
        "Meta_L" => 0xffe7,
        "Meta_R" => 0xffe8,
        "Alt_L" | "Alt" => 0xffe9,
        "Alt_R" => 0xffea,
        "Super_L" | "Cmd" | "Super" => 0xffeb,
        "Super_R" => 0xffec,
        "Hyper_L" => 0xffed,
        "Hyper_R" => 0xffee,

        "space" | "Space" => 0x0020,

        _ => return None,
    })
}
