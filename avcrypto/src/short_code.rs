//! Short codes: 40-bit values shown to voters as 7 base58 characters, e.g. ballot tracking codes.

use crate::*;

pub const SHORT_CODE_LENGTH: usize = 7;

const SHORT_CODE_BITS: u32 = 40;
const HEX_LENGTH: usize = 10;

/// Convert up to 10 hex characters into a zero-padded base58 short code
pub fn hex_to_short_code(hex: &str) -> Result<String> {
    if hex.is_empty() || hex.len() > HEX_LENGTH || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidEncoding(format!(
            "{:?} is not a hex value of at most {} bits",
            hex, SHORT_CODE_BITS
        )));
    }

    let value = u64::from_str_radix(hex, 16)
        .map_err(|e| Error::InvalidEncoding(format!("{:?}: {}", hex, e)))?;

    let bytes = value.to_be_bytes();
    let significant = &bytes[bytes.iter().take_while(|b| **b == 0).count()..];
    let encoded = bs58::encode(significant).into_string();

    Ok(format!("{:1>width$}", encoded, width = SHORT_CODE_LENGTH))
}

/// Convert a 7 character base58 short code back into 10 hex characters
pub fn short_code_to_hex(short_code: &str) -> Result<String> {
    if short_code.len() != SHORT_CODE_LENGTH {
        return Err(Error::InvalidEncoding(format!(
            "short code {:?} must be {} characters",
            short_code, SHORT_CODE_LENGTH
        )));
    }

    let bytes = bs58::decode(short_code)
        .into_vec()
        .map_err(|e| Error::InvalidEncoding(format!("short code {:?}: {}", short_code, e)))?;

    let significant = &bytes[bytes.iter().take_while(|b| **b == 0).count()..];
    if significant.len() > (SHORT_CODE_BITS / 8) as usize {
        return Err(Error::InvalidEncoding(format!(
            "short code {:?} exceeds {} bits",
            short_code, SHORT_CODE_BITS
        )));
    }

    let value = significant
        .iter()
        .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
    Ok(format!("{:0width$x}", value, width = HEX_LENGTH))
}
