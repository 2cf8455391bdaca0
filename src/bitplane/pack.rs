use std::fmt::Write as _;

use crate::foundation::error::{InkError, InkResult};

/// Pack booleans MSB-first, eight per byte. The length must be a multiple of 8.
pub fn pack_bits(bits: &[bool]) -> InkResult<Vec<u8>> {
    if bits.len() % 8 != 0 {
        return Err(InkError::input(format!(
            "bit length {} is not a multiple of 8",
            bits.len()
        )));
    }
    Ok(bits
        .chunks_exact(8)
        .map(|chunk| {
            chunk
                .iter()
                .fold(0u8, |byte, &bit| (byte << 1) | u8::from(bit))
        })
        .collect())
}

/// Inverse of [`pack_bits`]. `bit_len` must equal `bytes.len() * 8`.
pub fn unpack_bits(bytes: &[u8], bit_len: usize) -> InkResult<Vec<bool>> {
    if bit_len % 8 != 0 || bit_len != bytes.len() * 8 {
        return Err(InkError::input(format!(
            "bit length {bit_len} does not match {} packed bytes",
            bytes.len()
        )));
    }
    Ok(bytes
        .iter()
        .flat_map(|&b| (0..8).rev().map(move |i| (b >> i) & 1 == 1))
        .collect())
}

/// Render bytes as a C-style listing: `0xAB,` entries, 16 per line.
pub fn to_hex_listing(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 5 + bytes.len() / 16 + 1);
    for line in bytes.chunks(16) {
        for b in line {
            let _ = write!(out, "0x{b:02X},");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/bitplane/pack.rs"]
mod tests;
