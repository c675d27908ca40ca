//! Error types for the assembler

use std::fmt;

#[derive(Debug)]
pub enum AsmError {
    /// The line's tokens do not form any recognized statement shape.
    Parse { line: usize, text: String },
    DuplicateLabel { line: usize, label: String, address: u32 },
    UnresolvedSymbol { line: usize, symbol: String, address: u32 },
    /// Neither PC-relative nor base-relative displacement reaches the target.
    DisplacementRange { line: usize, operand: String, address: u32 },
    InvalidOpcode { line: usize, mnemonic: String, reason: String },
    InvalidOperand { line: usize, operand: String, reason: String },
    Io(std::io::Error),
}

impl AsmError {
    /// Source line (1-based) the error was raised on, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            AsmError::Parse { line, .. }
            | AsmError::DuplicateLabel { line, .. }
            | AsmError::UnresolvedSymbol { line, .. }
            | AsmError::DisplacementRange { line, .. }
            | AsmError::InvalidOpcode { line, .. }
            | AsmError::InvalidOperand { line, .. } => Some(*line),
            AsmError::Io(_) => None,
        }
    }
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmError::Parse { line, text } => {
                write!(f, "line {}: malformed line: {}", line, text)
            }
            AsmError::DuplicateLabel { line, label, address } => {
                write!(f, "line {} (${:06X}): duplicate label: {}", line, address, label)
            }
            AsmError::UnresolvedSymbol { line, symbol, address } => {
                write!(f, "line {} (${:06X}): label not found: {}", line, address, symbol)
            }
            AsmError::DisplacementRange { line, operand, address } => write!(
                f,
                "line {} (${:06X}): {} is out of PC-relative and base-relative range, use format 4 (+)",
                line, address, operand
            ),
            AsmError::InvalidOpcode { line, mnemonic, reason } => {
                write!(f, "line {}: invalid opcode {}: {}", line, mnemonic, reason)
            }
            AsmError::InvalidOperand { line, operand, reason } => {
                write!(f, "line {}: invalid operand {}: {}", line, operand, reason)
            }
            AsmError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for AsmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AsmError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AsmError {
    fn from(e: std::io::Error) -> Self {
        AsmError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_line_and_location() {
        let err = AsmError::UnresolvedSymbol {
            line: 7,
            symbol: "ALPHA".to_string(),
            address: 0x1003,
        };
        assert_eq!(err.to_string(), "line 7 ($001003): label not found: ALPHA");
        assert_eq!(err.line(), Some(7));
    }

    #[test]
    fn test_displacement_message_suggests_format_4() {
        let err = AsmError::DisplacementRange {
            line: 2,
            operand: "DATA".to_string(),
            address: 0,
        };
        assert!(err.to_string().contains("use format 4"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AsmError = io.into();
        assert!(matches!(err, AsmError::Io(_)));
        assert_eq!(err.line(), None);
    }
}
