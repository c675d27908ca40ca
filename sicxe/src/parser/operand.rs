//! Operand text and its prefix grammar

use std::fmt;

/// Raw operand text as written on the line (already case-normalized).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operand {
    text: String,
}

impl Operand {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// `#value`
    pub fn is_immediate(&self) -> bool {
        self.text.starts_with('#')
    }

    /// `@value`
    pub fn is_indirect(&self) -> bool {
        self.text.starts_with('@')
    }

    /// Trailing `,X`, judged on the raw text.
    pub fn is_indexed(&self) -> bool {
        self.text.ends_with(",X")
    }

    /// The part looked up in the symbol table: prefix and `,X` removed.
    pub fn symbol_key(&self) -> &str {
        let s = self.text.as_str();
        let s = s
            .strip_prefix('#')
            .or_else(|| s.strip_prefix('@'))
            .unwrap_or(s);
        let s = s.strip_suffix(",X").unwrap_or(s);
        s.trim()
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// `BYTE` operand: `C'...'` or `X'...'`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ByteLiteral {
    Char(String),
    Hex(String),
}

impl ByteLiteral {
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut chars = text.chars();
        let kind = chars.next();
        let body = chars
            .as_str()
            .strip_prefix('\'')
            .and_then(|r| r.strip_suffix('\''))
            .ok_or_else(|| "expected C'...' or X'...'".to_string())?;
        match kind {
            Some('C') => {
                if body.is_empty() {
                    return Err("empty character literal".to_string());
                }
                if !body.is_ascii() {
                    return Err("character literal must be ASCII".to_string());
                }
                Ok(ByteLiteral::Char(body.to_string()))
            }
            Some('X') => {
                if body.is_empty() || body.len() % 2 != 0 {
                    return Err("hex literal needs an even, non-zero digit count".to_string());
                }
                if !body.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return Err("hex literal contains a non-hex digit".to_string());
                }
                Ok(ByteLiteral::Hex(body.to_ascii_uppercase()))
            }
            _ => Err("expected C'...' or X'...'".to_string()),
        }
    }

    pub fn len(&self) -> u32 {
        match self {
            ByteLiteral::Char(s) => s.len() as u32,
            ByteLiteral::Hex(s) => (s.len() / 2) as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bytes(&self) -> Vec<u8> {
        match self {
            ByteLiteral::Char(s) => s.bytes().collect(),
            ByteLiteral::Hex(s) => s
                .as_bytes()
                .chunks(2)
                .map(|pair| {
                    let hi = (pair[0] as char).to_digit(16).unwrap_or(0);
                    let lo = (pair[1] as char).to_digit(16).unwrap_or(0);
                    (hi * 16 + lo) as u8
                })
                .collect(),
        }
    }
}
