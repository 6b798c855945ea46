//! The VNC-specific DES key derivation and challenge encryption used by
//! VNC_AUTH (spec §4.2).
//!
//! VNC mirrors the bit order of every key byte before using it as a DES key;
//! this is a well-known quirk of the original RealVNC implementation that
//! every conformant VNC server and client must reproduce.

use des::cipher::{BlockEncrypt, KeyInit};
use des::Des;

/// Derives the 8-byte DES key VNC uses from a password: take up to the first
/// 8 bytes of the password, NUL-pad to 8, then reverse the bit order of each
/// byte.
pub fn derive_key(password: &str) -> [u8; 8] {
    let mut key = [0u8; 8];
    for (slot, byte) in key.iter_mut().zip(password.as_bytes().iter()) {
        *slot = byte.reverse_bits();
    }
    key
}

/// Encrypts a 16-byte VNC authentication challenge as two independent 8-byte
/// ECB blocks under the derived key.
pub fn encrypt_challenge(password: &str, challenge: &[u8; 16]) -> [u8; 16] {
    let key = derive_key(password);
    let cipher = Des::new_from_slice(&key).expect("DES key is always 8 bytes");

    let mut response = *challenge;
    for block in response.chunks_mut(8) {
        let block: &mut [u8; 8] = block.try_into().expect("chunk of 8 bytes");
        cipher.encrypt_block(block.into());
    }
    response
}
