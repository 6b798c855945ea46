//! A client implementation of the RFB (VNC) protocol geared toward
//! screen-automation scripts: connect, capture the framebuffer, move the
//! pointer, click, and type, all over a blocking `Read + Write` transport.
//!
//! ```no_run
//! use rfb_vnc_client::{connect, Point, Rect, MouseButton, SessionConfig};
//!
//! let config = SessionConfig {
//!     host: "192.168.1.50".into(),
//!     password: Some("secret".into()),
//!     ..Default::default()
//! };
//! let mut session = connect(&config).unwrap();
//! session.move_to(Point { x: 100, y: 100 }, false).unwrap();
//! session.click(MouseButton::Left).unwrap();
//! session.write("hello").unwrap();
//! let screenshot = session.capture(None::<Rect>, false).unwrap();
//! ```

mod coords;
mod des;
mod error;
mod framebuffer;
mod handshake;
mod input;
mod keysym;
mod pixel_format;
mod pixelbuffer;
mod session;
mod session_init;
mod wire;

pub use error::{Error, Result};
pub use pixel_format::PixelFormatName;
pub use session::{connect, KeyHold, MouseHold, Session, SessionConfig};

/// A point in either absolute framebuffer pixels or the relative coordinate
/// grid (see [`coords`]), depending on which method it's passed to.
///
/// Fields are `u32` rather than `u16` even though absolute framebuffer pixels
/// never exceed 65535: the relative coordinate grid's dimensions run up to
/// 99900 (spec §4.4), and a `u16` field would make the top third of that
/// grid unrepresentable. Values are narrowed to `u16` only at the wire
/// boundary, once a `Point` denotes an absolute, on-framebuffer coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl From<(u32, u32)> for Point {
    fn from((x, y): (u32, u32)) -> Point {
        Point { x, y }
    }
}

/// A rectangle in either absolute framebuffer pixels or the relative
/// coordinate grid, depending on which method it's passed to. See [`Point`]
/// for why the fields are `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl From<(u32, u32, u32, u32)> for Rect {
    fn from((x, y, width, height): (u32, u32, u32, u32)) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

/// A pointer button, as addressed by [`Session::click`] and friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    ScrollUp,
    ScrollDown,
}

impl MouseButton {
    pub(crate) fn bit(self) -> u8 {
        match self {
            MouseButton::Left => input::BUTTON_LEFT,
            MouseButton::Middle => input::BUTTON_MIDDLE,
            MouseButton::Right => input::BUTTON_RIGHT,
            MouseButton::ScrollUp => input::BUTTON_SCROLL_UP,
            MouseButton::ScrollDown => input::BUTTON_SCROLL_DOWN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_converts_from_tuple() {
        let point: Point = (10, 20).into();
        assert_eq!(point, Point { x: 10, y: 20 });
    }

    #[test]
    fn rect_converts_from_tuple() {
        let rect: Rect = (1, 2, 3, 4).into();
        assert_eq!(
            rect,
            Rect {
                x: 1,
                y: 2,
                width: 3,
                height: 4
            }
        );
    }

    #[test]
    fn mouse_button_bits_are_distinct_and_single() {
        let buttons = [
            MouseButton::Left,
            MouseButton::Middle,
            MouseButton::Right,
            MouseButton::ScrollUp,
            MouseButton::ScrollDown,
        ];
        for button in buttons {
            assert_eq!(button.bit().count_ones(), 1);
        }
        let mut seen = 0u8;
        for button in buttons {
            assert_eq!(seen & button.bit(), 0);
            seen |= button.bit();
        }
    }
}
