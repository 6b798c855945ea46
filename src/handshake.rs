//! Protocol version negotiation and security handshake (spec §4.1-4.2).
//!
//! Only RFB 3.8 is spoken: the server's version line is read and validated,
//! `RFB 003.008\n` is echoed back regardless of what the server advertised
//! (every RFB server from 3.3 onward accepts a 3.8 client greeting), and the
//! security-type list that follows is negotiated preferring VNC
//! authentication over no authentication -- the opposite order from the
//! core RFB reference client, but the order a scripted automation client
//! wants so that a configured password is always exercised when the server
//! offers a choice. Apple Remote Desktop's own DES/RSA exchange is detected
//! and rejected rather than implemented.

use std::io::{Read, Write};

use crate::des;
use crate::error::{Error, Result};
use crate::wire;

const PROTOCOL_VERSION_LINE: &[u8; 12] = b"RFB 003.008\n";
const PROTOCOL_PREFIX: &[u8; 4] = b"RFB ";

const SECURITY_NONE: u8 = 1;
const SECURITY_VNC: u8 = 2;
const SECURITY_APPLE: u8 = 33;

/// Reads and validates the server's `RFB XXX.YYY\n` greeting, then replies
/// with this client's own fixed 3.8 greeting.
pub fn exchange_protocol_version<S: Read + Write>(stream: &mut S) -> Result<()> {
    let mut line = [0u8; 12];
    wire::read_exact(stream, &mut line)?;
    if &line[0..4] != PROTOCOL_PREFIX {
        return Err(Error::NotRfbServer);
    }
    log::debug!("<- {}", String::from_utf8_lossy(&line).trim_end());
    log::debug!("-> RFB 003.008");
    wire::write_all(stream, PROTOCOL_VERSION_LINE)
}

/// Negotiates a security type and, if required, proves knowledge of the
/// configured password. Returns once the server has confirmed the security
/// result, or an error describing why it did not.
pub fn negotiate_security<S: Read + Write>(stream: &mut S, password: Option<&str>) -> Result<()> {
    let count = wire::read_u8(stream)?;
    if count == 0 {
        let reason = wire::read_string(stream)?;
        return Err(Error::HandshakeRejected(reason));
    }
    let mut offered = vec![0u8; count as usize];
    wire::read_exact(stream, &mut offered)?;
    log::debug!("<- security types {:?}", offered);

    let chosen = choose_security_type(&offered)?;
    wire::write_u8(stream, chosen)?;
    log::debug!("-> security type {}", chosen);

    match chosen {
        SECURITY_NONE => {}
        SECURITY_VNC => perform_vnc_auth(stream, password)?,
        _ => unreachable!("choose_security_type only returns types this client can drive"),
    }

    read_security_result(stream)
}

/// Prefers VNC authentication over no authentication whenever the server
/// offers both, since a script run against a password-protected server
/// should always be required to supply the password rather than silently
/// riding an anonymous session the server happens to also allow. Apple
/// Remote Desktop is recognized so it can be reported clearly rather than
/// falling through to "no supported security type".
fn choose_security_type(offered: &[u8]) -> Result<u8> {
    if offered.contains(&SECURITY_VNC) {
        Ok(SECURITY_VNC)
    } else if offered.contains(&SECURITY_NONE) {
        Ok(SECURITY_NONE)
    } else if offered.contains(&SECURITY_APPLE) {
        Err(Error::UnsupportedAuth(
            "Apple Remote Desktop authentication is not implemented".to_string(),
        ))
    } else {
        Err(Error::UnsupportedAuth(format!(
            "no supported security type in {:?}",
            offered
        )))
    }
}

fn perform_vnc_auth<S: Read + Write>(stream: &mut S, password: Option<&str>) -> Result<()> {
    let password = password.ok_or(Error::PasswordRequired)?;
    let mut challenge = [0u8; 16];
    wire::read_exact(stream, &mut challenge)?;
    let response = des::encrypt_challenge(password, &challenge);
    wire::write_all(stream, &response)
}

/// Reads the `SecurityResult` word. `0` succeeds; `1` and `2` are fixed
/// failure/too-many-attempts results with no reason string following them;
/// any other value is itself the length of a raw reason string that follows
/// (some servers fold the RFB-3.8 reason-length field and an out-of-range
/// result code together rather than sending a clean `1` followed by a
/// separate length).
fn read_security_result<S: Read>(stream: &mut S) -> Result<()> {
    match wire::read_u32(stream)? {
        0 => Ok(()),
        1 => Err(Error::AuthFailed),
        2 => Err(Error::AuthFailedTooManyAttempts),
        other => {
            let mut reason = vec![0u8; other as usize];
            wire::read_exact(stream, &mut reason)?;
            let reason = reason.iter().map(|&b| b as char).collect();
            Err(Error::AuthFailedReason(reason))
        }
    }
}
