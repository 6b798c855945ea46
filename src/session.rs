//! The connected session: handshake orchestration and the public façade
//! methods layered on top of it (spec §4.7, §6).

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use flate2::Decompress;

use crate::coords;
use crate::error::Result;
use crate::framebuffer;
use crate::handshake;
use crate::input;
use crate::keysym;
use crate::pixel_format::PixelFormatName;
use crate::pixelbuffer::PixelBuffer;
use crate::session_init;
use crate::{MouseButton, Point, Rect};

/// Connection parameters: everything [`connect`] needs, including the
/// address to dial (spec §6's enumerated `host`/`port`/`timeout`/
/// `pixel_format`/`password` options).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub pixel_format: PixelFormatName,
    pub shared: bool,
    pub connect_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> SessionConfig {
        SessionConfig {
            host: "localhost".to_string(),
            port: 5900,
            password: None,
            pixel_format: PixelFormatName::default(),
            shared: true,
            connect_timeout: Some(Duration::from_secs(5)),
        }
    }
}

/// A live connection to an RFB server: the handshake has completed, the
/// pixel format and encodings are configured, and the session is ready to
/// capture the framebuffer and inject input.
pub struct Session<S: Read + Write> {
    stream: S,
    decompress: Decompress,
    buffer: PixelBuffer,
    framebuffer_width: u16,
    framebuffer_height: u16,
    name: String,
    pixel_format: PixelFormatName,
    button_mask: u8,
    pointer: Point,
}

/// Connects to `config.host:config.port`, completes the RFB 3.8 handshake
/// (version exchange, security negotiation, session init), and returns a
/// ready [`Session`].
pub fn connect(config: &SessionConfig) -> Result<Session<TcpStream>> {
    let address = format!("{}:{}", config.host, config.port);
    let addr = address
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::AddrNotAvailable, "no address"))?;
    let stream = match config.connect_timeout {
        Some(timeout) => TcpStream::connect_timeout(&addr, timeout)?,
        None => TcpStream::connect(addr)?,
    };
    stream.set_nodelay(true)?;
    Session::from_stream(stream, config)
}

impl<S: Read + Write> Session<S> {
    /// Runs the handshake over an already-established stream and returns a
    /// ready session. Exposed separately from [`connect`] so tests can drive
    /// the handshake over an in-memory duplex.
    pub fn from_stream(mut stream: S, config: &SessionConfig) -> Result<Session<S>> {
        handshake::exchange_protocol_version(&mut stream)?;
        handshake::negotiate_security(&mut stream, config.password.as_deref())?;
        session_init::write_client_init(&mut stream, config.shared)?;
        let init = session_init::read_server_init(&mut stream)?;
        session_init::configure_session(&mut stream, config.pixel_format)?;

        log::debug!(
            "connected to {:?} ({}x{})",
            init.name,
            init.framebuffer_width,
            init.framebuffer_height
        );

        Ok(Session {
            stream,
            decompress: Decompress::new(true),
            buffer: PixelBuffer::new(init.framebuffer_width, init.framebuffer_height),
            framebuffer_width: init.framebuffer_width,
            framebuffer_height: init.framebuffer_height,
            name: init.name,
            pixel_format: config.pixel_format,
            button_mask: 0,
            pointer: Point { x: 0, y: 0 },
        })
    }

    /// The framebuffer's absolute pixel dimensions.
    pub fn size(&self) -> (u16, u16) {
        (self.framebuffer_width, self.framebuffer_height)
    }

    /// The desktop name the server advertised in `ServerInit`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pixel format this session negotiated with `SetPixelFormat`.
    pub fn pixel_format(&self) -> PixelFormatName {
        self.pixel_format
    }

    fn resolve_rect(&self, rect: Option<Rect>, relative: bool) -> Rect {
        match rect {
            None => Rect {
                x: 0,
                y: 0,
                width: self.framebuffer_width as u32,
                height: self.framebuffer_height as u32,
            },
            Some(rect) if relative => {
                coords::relative_to_absolute_rect(rect, self.framebuffer_width, self.framebuffer_height)
            }
            Some(rect) => rect,
        }
    }

    fn resolve_point(&self, point: Point, relative: bool) -> Point {
        if relative {
            coords::relative_to_absolute_point(point, self.framebuffer_width, self.framebuffer_height)
        } else {
            point
        }
    }

    /// Captures `rect` (the whole framebuffer if `None`) and returns it as a
    /// row-major RGBA byte vector. Accepts anything convertible to [`Rect`],
    /// such as a `(u32, u32, u32, u32)` tuple.
    pub fn capture<R: Into<Rect>>(&mut self, rect: Option<R>, relative: bool) -> Result<Vec<u8>> {
        let rect = self.resolve_rect(rect.map(Into::into), relative);
        framebuffer::capture(&mut self.stream, &mut self.decompress, &mut self.buffer, rect)
    }

    /// Moves the pointer to `point` without changing which buttons are held.
    /// Accepts anything convertible to [`Point`], such as a `(u32, u32)`
    /// tuple.
    pub fn move_to<P: Into<Point>>(&mut self, point: P, relative: bool) -> Result<()> {
        let point = self.resolve_point(point.into(), relative);
        input::move_to(&mut self.stream, self.button_mask, point.x as u16, point.y as u16)?;
        self.pointer = point;
        Ok(())
    }

    /// Clicks `button` at the pointer's current position.
    pub fn click(&mut self, button: MouseButton) -> Result<()> {
        input::click(
            &mut self.stream,
            self.button_mask,
            button.bit(),
            self.pointer.x as u16,
            self.pointer.y as u16,
        )
    }

    /// Double-clicks `button` at the pointer's current position.
    pub fn double_click(&mut self, button: MouseButton) -> Result<()> {
        input::double_click(
            &mut self.stream,
            self.button_mask,
            button.bit(),
            self.pointer.x as u16,
            self.pointer.y as u16,
        )
    }

    /// Moves to `point` and clicks `button` there. Accepts anything
    /// convertible to [`Point`].
    pub fn click_at<P: Into<Point>>(
        &mut self,
        point: P,
        button: MouseButton,
        relative: bool,
    ) -> Result<()> {
        self.move_to(point.into(), relative)?;
        self.click(button)
    }

    /// Moves to `point` and double-clicks `button` there. Accepts anything
    /// convertible to [`Point`].
    pub fn double_click_at<P: Into<Point>>(
        &mut self,
        point: P,
        button: MouseButton,
        relative: bool,
    ) -> Result<()> {
        self.move_to(point.into(), relative)?;
        self.double_click(button)
    }

    /// Scrolls the wheel up `repeat` times at the pointer's current position.
    pub fn scroll_up(&mut self, repeat: u32) -> Result<()> {
        for _ in 0..repeat {
            self.click(MouseButton::ScrollUp)?;
        }
        Ok(())
    }

    /// Scrolls the wheel down `repeat` times at the pointer's current
    /// position.
    pub fn scroll_down(&mut self, repeat: u32) -> Result<()> {
        for _ in 0..repeat {
            self.click(MouseButton::ScrollDown)?;
        }
        Ok(())
    }

    /// Presses `keys` together as a chord: every key goes down in order,
    /// then all of them come back up in reverse order, the same as entering
    /// [`Session::hold_key`] with an empty body. `press(&["Ctrl", "c"])`
    /// therefore sends a real Ctrl+C rather than two back-to-back,
    /// non-overlapping key taps.
    pub fn press(&mut self, keys: &[&str]) -> Result<()> {
        let _hold = self.hold_key(keys)?;
        Ok(())
    }

    /// Presses a full run of printable text, one character at a time.
    pub fn write(&mut self, text: &str) -> Result<()> {
        input::write_text(&mut self.stream, text)
    }

    /// Holds `keys` down for the lifetime of the returned guard, releasing
    /// them (in reverse order) whenever it is dropped. The guard dereferences
    /// to this session, so it can be used to drive further interactions
    /// (clicks, moves, even a nested hold) while the keys stay down.
    pub fn hold_key(&mut self, keys: &[&str]) -> Result<KeyHold<'_, S>> {
        KeyHold::new(self, keys)
    }

    /// Holds `button` down at the pointer's current position for the
    /// lifetime of the returned guard, releasing it when dropped. The guard
    /// dereferences to this session, so moving the pointer while it is held
    /// performs a drag.
    pub fn hold_mouse(&mut self, button: MouseButton) -> Result<MouseHold<'_, S>> {
        MouseHold::new(self, button.bit())
    }

    /// Consumes the session, discarding the underlying transport. RFB has no
    /// explicit logout message; a VNC server treats the client going away as
    /// the end of the session.
    pub fn close(self) {}
}

/// A scoped key hold: presses every key in `keys` on construction, in order,
/// and is guaranteed to release them, in reverse order, whenever the guard
/// goes out of scope -- including when the scope exits via an error or a
/// panic. Release failures cannot be propagated from `Drop`; they are
/// logged and otherwise ignored, matching the "best-effort cleanup" the
/// scoped-hold contract promises rather than a second fallible close step.
///
/// Dereferences (mutably) to the held [`Session`], so interactions that
/// should happen while the keys are down -- clicking, moving the pointer,
/// or nesting another hold -- go through the guard itself rather than
/// fighting the borrow checker over the session it came from.
pub struct KeyHold<'a, S: Read + Write> {
    session: &'a mut Session<S>,
    codes: Vec<u32>,
}

impl<'a, S: Read + Write> KeyHold<'a, S> {
    fn new(session: &'a mut Session<S>, keys: &[&str]) -> Result<KeyHold<'a, S>> {
        let mut codes = Vec::with_capacity(keys.len());
        for key in keys {
            let code = keysym::lookup(key)?;
            input::write_key_event(&mut session.stream, true, code)?;
            codes.push(code);
        }
        Ok(KeyHold { session, codes })
    }
}

impl<'a, S: Read + Write> Drop for KeyHold<'a, S> {
    fn drop(&mut self) {
        for &code in self.codes.iter().rev() {
            if let Err(error) = input::write_key_event(&mut self.session.stream, false, code) {
                log::warn!("failed to release held key {:#x}: {}", code, error);
            }
        }
    }
}

impl<'a, S: Read + Write> Deref for KeyHold<'a, S> {
    type Target = Session<S>;
    fn deref(&self) -> &Session<S> {
        self.session
    }
}

impl<'a, S: Read + Write> DerefMut for KeyHold<'a, S> {
    fn deref_mut(&mut self) -> &mut Session<S> {
        self.session
    }
}

/// A scoped mouse-button hold: presses `button` at the pointer's current
/// position on construction and is guaranteed to release it -- restoring
/// the session's button mask to what it was before -- whenever the guard
/// goes out of scope, the same guaranteed-cleanup contract as [`KeyHold`].
///
/// Dereferences (mutably) to the held [`Session`]; moving the pointer
/// through the guard (`guard.move_to(...)`) while the button stays down is
/// how a drag is expressed.
pub struct MouseHold<'a, S: Read + Write> {
    session: &'a mut Session<S>,
    button: u8,
}

impl<'a, S: Read + Write> MouseHold<'a, S> {
    fn new(session: &'a mut Session<S>, button: u8) -> Result<MouseHold<'a, S>> {
        session.button_mask |= button;
        let (x, y) = (session.pointer.x as u16, session.pointer.y as u16);
        input::write_pointer_event(&mut session.stream, session.button_mask, x, y)?;
        Ok(MouseHold { session, button })
    }
}

impl<'a, S: Read + Write> Drop for MouseHold<'a, S> {
    fn drop(&mut self) {
        self.session.button_mask &= !self.button;
        let (x, y) = (self.session.pointer.x as u16, self.session.pointer.y as u16);
        let mask = self.session.button_mask;
        if let Err(error) = input::write_pointer_event(&mut self.session.stream, mask, x, y) {
            log::warn!(
                "failed to release held mouse button {:#x}: {}",
                self.button,
                error
            );
        }
    }
}

impl<'a, S: Read + Write> Deref for MouseHold<'a, S> {
    type Target = Session<S>;
    fn deref(&self) -> &Session<S> {
        self.session
    }
}

impl<'a, S: Read + Write> DerefMut for MouseHold<'a, S> {
    fn deref_mut(&mut self) -> &mut Session<S> {
        self.session
    }
}
