use eyre::{bail, Result};
use std::fmt::Write;
use tracing::error;

/// Decodes a hex string into a vector of bytes
///
/// ```
/// use crucible_common::utils::strings::decode_hex;
///
/// let hex = "48656c6c6f20576f726c64"; // "Hello World" in hex
/// let result = decode_hex(hex).expect("should decode hex");
/// assert_eq!(result, vec![72, 101, 108, 108, 111, 32, 87, 111, 114, 108, 100]);
/// ```
pub fn decode_hex(mut s: &str) -> Result<Vec<u8>> {
    // normalize
    s = s.trim_start_matches("0x").trim();

    if s.is_empty() {
        return Ok(vec![]);
    }

    if s.len() % 2 != 0 {
        bail!("invalid hex string: {}", s);
    }

    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16))
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|_| eyre::eyre!("invalid hex string: {}", s))
}

/// Encodes a vector of bytes into a hex string
///
/// ```
/// use crucible_common::utils::strings::encode_hex;
///
/// let bytes = vec![72, 101, 108, 108, 111, 32, 87, 111, 114, 108, 100];
/// let result = encode_hex(&bytes);
/// assert_eq!(result, "48656c6c6f20576f726c64");
/// ```
pub fn encode_hex(s: &[u8]) -> String {
    s.iter().fold(String::new(), |mut acc, b| {
        write!(acc, "{b:02x}").expect("unable to write");
        acc
    })
}

/// Converts a `0x`-prefixed, zero-padded hex string into the display string it
/// encodes. Trailing zero byte pairs are stripped, then each remaining byte
/// pair becomes one character; byte values of 9 and below are treated as
/// non-printable and dropped.
///
/// Fails if the hex payload has an odd number of digits.
///
/// ```
/// use crucible_common::utils::strings::hex_to_string;
///
/// let result = hex_to_string("0x48656c6c6f000000").expect("should decode hex");
/// assert_eq!(result, "Hello");
/// ```
pub fn hex_to_string(hex: &str) -> Result<String> {
    let payload = strip_trailing_zero_pairs(hex.trim_start_matches("0x"))?;
    Ok(printable_char_codes(payload).into_iter().map(|code| code as char).collect())
}

/// Strips trailing `00` byte pairs from a hex payload, scanning backward and
/// stopping at the first non-zero pair. The first pair is always retained, so
/// an all-zero payload reduces to a single `00`.
///
/// Fails if the payload has an odd number of digits.
///
/// ```
/// use crucible_common::utils::strings::strip_trailing_zero_pairs;
///
/// let result = strip_trailing_zero_pairs("48656c6c6f000000").expect("should strip");
/// assert_eq!(result, "48656c6c6f");
/// ```
pub fn strip_trailing_zero_pairs(s: &str) -> Result<&str> {
    if s.len() % 2 != 0 {
        bail!("wrong hex string: {}", s);
    }

    let mut last_non_zero = 0;
    let mut i = s.len().saturating_sub(2);
    while i >= 2 {
        if &s[i..i + 2] != "00" {
            last_non_zero = i;
            break;
        }
        i -= 2;
    }

    Ok(&s[..s.len().min(last_non_zero + 2)])
}

/// Parses a hex payload into byte values, keeping only printable codes
/// (values above 9). Unparseable pairs are dropped.
///
/// An odd-length payload is logged rather than raised here; the trailing
/// digit is ignored.
///
/// ```
/// use crucible_common::utils::strings::printable_char_codes;
///
/// let result = printable_char_codes("48096c");
/// assert_eq!(result, vec![72, 108]);
/// ```
pub fn printable_char_codes(s: &str) -> Vec<u8> {
    if s.len() % 2 != 0 {
        error!("wrong hex string: {}", s);
    }

    let mut codes = Vec::new();
    let mut i = 0;
    while i + 2 <= s.len() {
        if let Ok(code) = u8::from_str_radix(&s[i..i + 2], 16) {
            if code > 9 {
                codes.push(code);
            }
        }
        i += 2;
    }

    codes
}
