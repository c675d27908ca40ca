//! Two-pass assembler: address assignment, then encoding and record emission

use std::collections::HashMap;

#[cfg(feature = "listing")]
use std::fs::File;
#[cfg(feature = "listing")]
use std::io::{self, Write};
#[cfg(feature = "listing")]
use std::path::Path;

use crate::encoder::{byte_literal, reserve_count, start_address, word_bytes, Encoder, Site};
use crate::error::AsmError;
use crate::listing::ListingLine;
use crate::opcodes::{Directive, Opcode, OpcodeTables, Variant};
use crate::parser::{parse_source, InstructionLine, Statement};
use crate::record::{
    end_record, header_record, hex_string, Modification, TextRecordBuffer, MAX_TEXT_BYTES,
};
use crate::symbol::SymbolTable;

const WORD_SIZE: u32 = 3;

pub struct Assembler {
    opcodes: OpcodeTables,
    symbols: SymbolTable,
    program_name: String,
    start_address: u32,
    program_length: u32,
    listing: Vec<ListingLine>,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte length of one statement. Both passes advance the location counter
/// through this function only.
pub fn statement_length(inst: &InstructionLine, line: usize) -> Result<u32, AsmError> {
    match inst.opcode {
        Opcode::Machine(_) if inst.extended => Ok(4),
        Opcode::Machine(ins) => Ok(ins.format.bytes()),
        Opcode::Directive(Directive::Word) => Ok(WORD_SIZE),
        Opcode::Directive(Directive::Resw) => reserve_count(inst, line)?
            .checked_mul(WORD_SIZE)
            .ok_or_else(|| overflow(inst, line)),
        Opcode::Directive(Directive::Resb) => reserve_count(inst, line),
        Opcode::Directive(Directive::Byte) => Ok(byte_literal(inst, line)?.len()),
        Opcode::Directive(Directive::Start | Directive::End | Directive::Base) => Ok(0),
    }
}

fn overflow(inst: &InstructionLine, line: usize) -> AsmError {
    AsmError::InvalidOperand {
        line,
        operand: inst.operand.as_ref().map(|op| op.to_string()).unwrap_or_default(),
        reason: "location counter overflow".to_string(),
    }
}

/// Per-run state of the second pass.
struct EmitContext {
    locctr: u32,
    base: u32,
    text: TextRecordBuffer,
    /// Set by RESB/RESW: the next object bytes start a new text record.
    gap: bool,
    modifications: Vec<Modification>,
    records: Vec<String>,
}

impl EmitContext {
    fn new(start: u32) -> Self {
        Self {
            locctr: start,
            base: 0,
            text: TextRecordBuffer::new(start),
            gap: false,
            modifications: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Append object bytes located at the current location counter.
    fn emit(&mut self, bytes: &[u8]) {
        let mut addr = self.locctr;
        for chunk in bytes.chunks(MAX_TEXT_BYTES) {
            if self.gap || !self.text.fits(addr, chunk.len()) {
                self.flush_text();
            }
            self.gap = false;
            self.text.push(addr, chunk);
            addr += chunk.len() as u32;
        }
    }

    fn flush_text(&mut self) {
        if let Some(record) = self.text.flush() {
            self.records.push(record);
        }
    }

    fn finish(mut self, entry: u32) -> Vec<String> {
        self.flush_text();
        let mods: Vec<String> = self.modifications.iter().map(Modification::render).collect();
        self.records.extend(mods);
        self.records.push(end_record(entry));
        self.records
    }
}

impl Assembler {
    pub fn new() -> Self {
        Self::with_variant(Variant::Xe)
    }

    pub fn with_variant(variant: Variant) -> Self {
        Self {
            opcodes: OpcodeTables::new(variant),
            symbols: SymbolTable::new(),
            program_name: String::new(),
            start_address: 0,
            program_length: 0,
            listing: Vec::new(),
        }
    }

    // ===== Public API =====

    /// Assemble ordered source lines into H, T, M and E records.
    pub fn assemble<I, S>(&mut self, lines: I) -> Result<Vec<String>, AsmError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.reset();
        let statements = self.parse_source(lines)?;
        self.first_pass(&statements)?;
        self.second_pass(&statements)
    }

    pub fn assemble_source(&mut self, src: &str) -> Result<Vec<String>, AsmError> {
        self.assemble(src.lines())
    }

    pub fn variant(&self) -> Variant {
        self.opcodes.variant()
    }

    pub fn symbols(&self) -> &HashMap<String, u32> {
        self.symbols.labels()
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn lookup(&self, name: &str) -> Option<u32> {
        self.symbols.get(name)
    }

    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    pub fn start_address(&self) -> u32 {
        self.start_address
    }

    pub fn program_length(&self) -> u32 {
        self.program_length
    }

    /// Statements of the last successful run with their object code.
    pub fn listing(&self) -> &[ListingLine] {
        &self.listing
    }

    pub fn reset(&mut self) {
        self.symbols.clear();
        self.program_name.clear();
        self.start_address = 0;
        self.program_length = 0;
        self.listing.clear();
    }

    // ===== Parsing =====

    pub fn parse_source<I, S>(&self, lines: I) -> Result<Vec<Statement>, AsmError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        parse_source(lines, &self.opcodes)
    }

    // ===== Pass 1 =====

    /// Assign every label an address and measure the program.
    pub fn first_pass(&mut self, statements: &[Statement]) -> Result<(), AsmError> {
        self.symbols.clear();
        self.program_name.clear();
        self.start_address = 0;

        let mut locctr = 0u32;
        for (idx, stmt) in statements.iter().enumerate() {
            let inst = &stmt.inst;
            if inst.opcode == Opcode::Directive(Directive::Start) {
                if idx != 0 {
                    return Err(AsmError::InvalidOpcode {
                        line: stmt.line,
                        mnemonic: "START".to_string(),
                        reason: "START must be the first statement".to_string(),
                    });
                }
                locctr = start_address(inst, stmt.line)?;
                self.start_address = locctr;
                self.program_name = inst.label.clone().unwrap_or_default();
            }

            if let Some(label) = &inst.label {
                self.symbols
                    .insert(label.clone(), locctr)
                    .map_err(|_| AsmError::DuplicateLabel {
                        line: stmt.line,
                        label: label.clone(),
                        address: locctr,
                    })?;
            }

            if inst.opcode == Opcode::Directive(Directive::End) {
                break;
            }
            locctr = locctr
                .checked_add(statement_length(inst, stmt.line)?)
                .ok_or_else(|| overflow(inst, stmt.line))?;
        }

        self.program_length = locctr - self.start_address;
        Ok(())
    }

    // ===== Pass 2 =====

    /// Encode every statement and produce the object program records.
    /// Requires a completed first pass over the same statements.
    pub fn second_pass(&mut self, statements: &[Statement]) -> Result<Vec<String>, AsmError> {
        let encoder = Encoder::new(&self.symbols, self.opcodes.variant());
        let mut ctx = EmitContext::new(self.start_address);
        let mut listing = Vec::with_capacity(statements.len());
        ctx.records.push(header_record(
            &self.program_name,
            self.start_address,
            self.program_length,
        ));

        for stmt in statements {
            let inst = &stmt.inst;
            let len = statement_length(inst, stmt.line)?;
            let site = Site {
                line: stmt.line,
                locctr: ctx.locctr,
                base: ctx.base,
            };
            if let Some(label) = &inst.label {
                debug_assert_eq!(self.symbols.get(label), Some(ctx.locctr));
            }

            let mut object = Vec::new();
            match inst.opcode {
                Opcode::Directive(Directive::Start) => {}
                Opcode::Directive(Directive::End) => {
                    listing.push(listing_line(stmt, site.locctr, &object));
                    break;
                }
                Opcode::Directive(Directive::Base) => {
                    ctx.base = encoder.base_value(inst, site)?;
                }
                Opcode::Directive(Directive::Word) => {
                    object = word_bytes(inst, stmt.line)?.to_vec();
                    ctx.emit(&object);
                }
                Opcode::Directive(Directive::Byte) => {
                    object = byte_literal(inst, stmt.line)?.bytes();
                    ctx.emit(&object);
                }
                Opcode::Directive(Directive::Resb | Directive::Resw) => {
                    ctx.gap = true;
                }
                Opcode::Machine(ins) => {
                    let encoded = encoder.instruction(&ins, inst, site)?;
                    object = encoded.bytes;
                    if let Some(m) = encoded.modification {
                        ctx.modifications.push(m);
                    }
                    ctx.emit(&object);
                }
            }
            debug_assert!(object.is_empty() || object.len() as u32 == len);

            listing.push(listing_line(stmt, site.locctr, &object));
            ctx.locctr += len;
        }

        self.listing = listing;
        Ok(ctx.finish(self.start_address))
    }

    // ===== Listing (feature-gated) =====

    #[cfg(feature = "listing")]
    pub fn print_listing(&self) {
        print!("{}", crate::listing::render_listing(&self.listing));
    }

    #[cfg(feature = "listing")]
    pub fn save_listing<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut f = File::create(path)?;
        f.write_all(crate::listing::render_listing(&self.listing).as_bytes())?;
        Ok(())
    }
}

fn listing_line(stmt: &Statement, address: u32, object: &[u8]) -> ListingLine {
    ListingLine {
        line: stmt.line,
        address,
        source: stmt.source.trim().to_string(),
        object: hex_string(object),
    }
}

/// Assemble SIC/XE source lines with a fresh assembler.
pub fn assemble<I, S>(lines: I) -> Result<Vec<String>, AsmError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Assembler::new().assemble(lines)
}
