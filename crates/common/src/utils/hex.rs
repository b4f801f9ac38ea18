use super::strings::encode_hex;
use alloy::primitives::{Address, Bytes, FixedBytes, U256};

/// A convenience function which encodes a given EVM type into a sized, lowercase hex string.
pub trait ToLowerHex {
    /// Format the value as a `0x`-prefixed lowercase hex string.
    fn to_lower_hex(&self) -> String;
}

impl ToLowerHex for Bytes {
    fn to_lower_hex(&self) -> String {
        format!("0x{}", encode_hex(self))
    }
}

impl ToLowerHex for Vec<u8> {
    fn to_lower_hex(&self) -> String {
        format!("0x{}", encode_hex(self))
    }
}

impl ToLowerHex for U256 {
    fn to_lower_hex(&self) -> String {
        format!("{:#032x}", self)
    }
}

impl ToLowerHex for FixedBytes<32> {
    fn to_lower_hex(&self) -> String {
        format!("{:#032x}", self)
    }
}

impl ToLowerHex for Address {
    fn to_lower_hex(&self) -> String {
        format!("{:#020x}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::b256;

    #[test]
    fn test_to_lower_hex_bytes() {
        let bytes = Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(bytes.to_lower_hex(), "0xdeadbeef");
    }

    #[test]
    fn test_to_lower_hex_fixed_bytes() {
        let hash = b256!("c699c1e8c7d4ed9b7b8801e8e79defba4b03b795878a3ba7e3752766182b1b36");
        assert_eq!(
            hash.to_lower_hex(),
            "0xc699c1e8c7d4ed9b7b8801e8e79defba4b03b795878a3ba7e3752766182b1b36"
        );
    }
}
