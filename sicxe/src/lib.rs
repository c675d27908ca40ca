//! Two-pass SIC/XE assembler producing H/T/M/E object records
//!
//! ## Features
//! - **Formats 1–4**, with `+` selecting the extended (format 4) encoding.
//! - **Addressing**: immediate (`#`), indirect (`@`), indexed (`,X`),
//!   PC-relative with base-relative fallback after `BASE`.
//! - **Directives**: `START`, `END`, `BYTE`, `WORD`, `RESB`, `RESW`, `BASE`.
//! - **Object program**: header, text records of at most 30 bytes,
//!   modification records for format 4 references, end record.
//! - **Base SIC** catalog via [`Variant::Sic`].
//!
//! ## Optional Features
//! - `listing`: print or save the assembly listing.
//!
//! ## Basic Usage
//! ```rust
//! use sicxe::Assembler;
//!
//! fn main() -> Result<(), sicxe::AsmError> {
//!     let mut assembler = Assembler::new();
//!     let records = assembler.assemble([
//!         "COPY   START  1000",
//!         "FIRST  LDA    ALPHA",
//!         "ALPHA  WORD   5",
//!         "       END    COPY",
//!     ])?;
//!     assert_eq!(records, vec!["HCOPY  001000000006", "T00100006032000000005", "E001000"]);
//!     Ok(())
//! }
//! ```
//!
//! ## License
//! This project is released under [The Unlicense](https://unlicense.org/).
//! You are free to use it for any purpose, without restriction.

mod addressing;
mod assembler;
mod encoder;
mod error;
mod listing;
mod opcodes;
mod parser;
mod record;
mod symbol;

// Public exports
pub use assembler::{assemble, statement_length, Assembler};
pub use error::AsmError;
pub use listing::{render_listing, ListingLine};
pub use opcodes::{Directive, Format, Instruction, Opcode, OpcodeTables, Variant};
pub use parser::{parse_line, ByteLiteral, InstructionLine, Operand, Statement};
pub use record::{
    end_record, header_record, hex_string, modification_record, text_record, Modification,
    TextRecordBuffer, MAX_TEXT_BYTES,
};
pub use symbol::SymbolTable;
