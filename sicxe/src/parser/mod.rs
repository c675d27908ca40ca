//! Parser module for assembly source

pub mod lexer;
pub mod number;
pub mod operand;

pub use lexer::{parse_line, parse_source, InstructionLine, Statement};
pub use number::NumberParser;
pub use operand::{ByteLiteral, Operand};
