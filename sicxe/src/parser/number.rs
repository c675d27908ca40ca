//! Numeric operand parsing

pub struct NumberParser;

impl NumberParser {
    /// Parse a bare hexadecimal number, as used by `START`.
    pub fn parse_hex(s: &str) -> Result<u32, String> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0X")
            .or_else(|| trimmed.strip_prefix("0x"))
            .unwrap_or(trimmed);
        if digits.is_empty() {
            return Err("empty hexadecimal number".to_string());
        }
        u32::from_str_radix(digits, 16).map_err(|_| format!("Invalid hexadecimal: {}", s))
    }

    /// Parse a signed decimal number (`WORD`, immediates, reservation counts).
    pub fn parse_decimal(s: &str) -> Result<i64, String> {
        let trimmed = s.trim();
        let unsigned = trimmed
            .strip_prefix('-')
            .or_else(|| trimmed.strip_prefix('+'))
            .unwrap_or(trimmed);
        if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("Invalid decimal: {}", s));
        }
        trimmed
            .parse::<i64>()
            .map_err(|_| format!("Invalid decimal: {}", s))
    }

    /// Parse a non-negative decimal count (`RESB`, `RESW`).
    pub fn parse_count(s: &str) -> Result<u32, String> {
        let value = Self::parse_decimal(s)?;
        u32::try_from(value).map_err(|_| format!("count out of range: {}", s))
    }
}
