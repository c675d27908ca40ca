//! Machine instruction and data encoding

use crate::addressing::{select_displacement, AddrMode, Nixbpe};
use crate::error::AsmError;
use crate::opcodes::{register_code, Format, Instruction, Variant};
use crate::parser::{ByteLiteral, InstructionLine, NumberParser, Operand};
use crate::record::Modification;
use crate::symbol::SymbolTable;

/// Where an instruction is being encoded.
#[derive(Copy, Clone, Debug)]
pub struct Site {
    pub line: usize,
    pub locctr: u32,
    pub base: u32,
}

/// Object bytes for one statement plus any relocation it needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Encoded {
    pub bytes: Vec<u8>,
    pub modification: Option<Modification>,
}

impl Encoded {
    fn plain(bytes: Vec<u8>) -> Self {
        Self { bytes, modification: None }
    }
}

enum Target {
    Address(u32),
    /// Immediate operand that is not a symbol, taken as a decimal value.
    Literal(u32),
}

pub struct Encoder<'a> {
    symbols: &'a SymbolTable,
    variant: Variant,
}

impl<'a> Encoder<'a> {
    pub fn new(symbols: &'a SymbolTable, variant: Variant) -> Self {
        Self { symbols, variant }
    }

    pub fn instruction(
        &self,
        ins: &Instruction,
        inst: &InstructionLine,
        site: Site,
    ) -> Result<Encoded, AsmError> {
        if self.variant == Variant::Sic {
            return self.sic(ins, inst, site).map(Encoded::plain);
        }
        match ins.format {
            Format::One => self.format1(ins, inst, site).map(Encoded::plain),
            Format::Two => self.format2(ins, inst, site).map(Encoded::plain),
            Format::Three if inst.extended => self.format4(ins, inst, site),
            Format::Three => self.format3(ins, inst, site).map(Encoded::plain),
        }
    }

    fn format1(&self, ins: &Instruction, inst: &InstructionLine, site: Site) -> Result<Vec<u8>, AsmError> {
        if let Some(op) = &inst.operand {
            return Err(invalid(site.line, op.as_str(), format!("{} takes no operand", ins.mnemonic)));
        }
        Ok(vec![ins.code])
    }

    fn format2(&self, ins: &Instruction, inst: &InstructionLine, site: Site) -> Result<Vec<u8>, AsmError> {
        let op = required(inst, site.line)?;
        let mut parts = op.as_str().split(',').map(str::trim);
        let first = parts.next().unwrap_or("");
        let second = parts.next();
        if parts.next().is_some() {
            return Err(invalid(site.line, op.as_str(), "at most two registers".to_string()));
        }

        let r1 = match ins.mnemonic {
            "SVC" => small_number(first, 0, 15, site.line)?,
            _ => register(first, site.line)?,
        };
        let r2 = match (ins.mnemonic, second) {
            (_, None) => 0,
            ("SHIFTL" | "SHIFTR", Some(n)) => small_number(n, 1, 16, site.line)? - 1,
            (_, Some(reg)) => register(reg, site.line)?,
        };
        Ok(vec![ins.code, (r1 << 4) | r2])
    }

    fn format3(&self, ins: &Instruction, inst: &InstructionLine, site: Site) -> Result<Vec<u8>, AsmError> {
        let operand = inst.operand.as_ref();
        let mut flags = AddrMode::of(operand).flags(operand);
        let disp: u16 = match operand {
            None => 0,
            Some(op) => match self.target(op, site)? {
                Target::Literal(value) => {
                    if value > 0x0FFF {
                        return Err(AsmError::DisplacementRange {
                            line: site.line,
                            operand: op.to_string(),
                            address: site.locctr,
                        });
                    }
                    value as u16
                }
                Target::Address(target) => {
                    let next = site.locctr + Format::Three.bytes();
                    let disp = select_displacement(target, next, site.base).ok_or_else(|| {
                        AsmError::DisplacementRange {
                            line: site.line,
                            operand: op.to_string(),
                            address: site.locctr,
                        }
                    })?;
                    flags = flags.with(disp.flag());
                    disp.field()
                }
            },
        };
        Ok(vec![
            ins.code | flags.ni(),
            (flags.xbpe() << 4) | ((disp >> 8) as u8 & 0x0F),
            disp as u8,
        ])
    }

    fn format4(&self, ins: &Instruction, inst: &InstructionLine, site: Site) -> Result<Encoded, AsmError> {
        let operand = inst.operand.as_ref();
        let flags = AddrMode::of(operand).flags(operand).with(Nixbpe::E);
        let mut modification = None;
        let address = match operand {
            None => 0,
            Some(op) => {
                let address = match self.target(op, site)? {
                    Target::Address(a) | Target::Literal(a) => a,
                };
                if address > 0xF_FFFF {
                    return Err(invalid(site.line, op.as_str(), "address exceeds 20 bits".to_string()));
                }
                if !op.is_immediate() {
                    modification = Some(Modification {
                        address: site.locctr + 1,
                        half_bytes: 5,
                    });
                }
                address
            }
        };
        Ok(Encoded {
            bytes: vec![
                ins.code | flags.ni(),
                (flags.xbpe() << 4) | ((address >> 16) as u8 & 0x0F),
                (address >> 8) as u8,
                address as u8,
            ],
            modification,
        })
    }

    /// Base SIC: opcode byte, then x-bit and a 15-bit absolute address.
    fn sic(&self, ins: &Instruction, inst: &InstructionLine, site: Site) -> Result<Vec<u8>, AsmError> {
        let (indexed, address) = match &inst.operand {
            None => (false, 0),
            Some(op) => {
                if op.is_immediate() || op.is_indirect() {
                    return Err(invalid(
                        site.line,
                        op.as_str(),
                        "immediate and indirect addressing need SIC/XE".to_string(),
                    ));
                }
                let key = op.symbol_key();
                let address = self.symbols.get(key).ok_or_else(|| AsmError::UnresolvedSymbol {
                    line: site.line,
                    symbol: key.to_string(),
                    address: site.locctr,
                })?;
                if address > 0x7FFF {
                    return Err(invalid(site.line, op.as_str(), "address exceeds 15 bits".to_string()));
                }
                (op.is_indexed(), address)
            }
        };
        let field = (u32::from(indexed) << 15) | address;
        Ok(vec![ins.code, (field >> 8) as u8, field as u8])
    }

    fn target(&self, op: &Operand, site: Site) -> Result<Target, AsmError> {
        let key = op.symbol_key();
        if let Some(address) = self.symbols.get(key) {
            return Ok(Target::Address(address));
        }
        // An immediate that names no symbol is read as a decimal constant.
        if op.is_immediate() {
            if let Ok(value) = NumberParser::parse_decimal(key) {
                return u32::try_from(value)
                    .map(Target::Literal)
                    .map_err(|_| invalid(site.line, op.as_str(), "negative immediate".to_string()));
            }
        }
        Err(AsmError::UnresolvedSymbol {
            line: site.line,
            symbol: key.to_string(),
            address: site.locctr,
        })
    }

    /// Value loaded into the base register by `BASE`.
    pub fn base_value(&self, inst: &InstructionLine, site: Site) -> Result<u32, AsmError> {
        let op = required(inst, site.line)?;
        let key = op.symbol_key();
        if let Some(address) = self.symbols.get(key) {
            return Ok(address);
        }
        match NumberParser::parse_decimal(key) {
            Ok(value) => u32::try_from(value)
                .map_err(|_| invalid(site.line, op.as_str(), "negative base".to_string())),
            Err(_) => Err(AsmError::UnresolvedSymbol {
                line: site.line,
                symbol: key.to_string(),
                address: site.locctr,
            }),
        }
    }
}

/// `WORD n` as a 24-bit two's complement value.
pub fn word_bytes(inst: &InstructionLine, line: usize) -> Result<[u8; 3], AsmError> {
    let op = required(inst, line)?;
    let value = NumberParser::parse_decimal(op.as_str())
        .map_err(|reason| invalid(line, op.as_str(), reason))?;
    if !(-(1 << 23)..(1 << 24)).contains(&value) {
        return Err(invalid(line, op.as_str(), "value does not fit in 24 bits".to_string()));
    }
    let v = (value as u32) & 0xFF_FFFF;
    Ok([(v >> 16) as u8, (v >> 8) as u8, v as u8])
}

pub fn byte_literal(inst: &InstructionLine, line: usize) -> Result<ByteLiteral, AsmError> {
    let op = required(inst, line)?;
    ByteLiteral::parse(op.as_str()).map_err(|reason| invalid(line, op.as_str(), reason))
}

/// Operand of `RESB`/`RESW`.
pub fn reserve_count(inst: &InstructionLine, line: usize) -> Result<u32, AsmError> {
    let op = required(inst, line)?;
    NumberParser::parse_count(op.as_str()).map_err(|reason| invalid(line, op.as_str(), reason))
}

/// Operand of `START`, in hex. A missing operand means address 0.
pub fn start_address(inst: &InstructionLine, line: usize) -> Result<u32, AsmError> {
    match &inst.operand {
        None => Ok(0),
        Some(op) => {
            NumberParser::parse_hex(op.as_str()).map_err(|reason| invalid(line, op.as_str(), reason))
        }
    }
}

fn required(inst: &InstructionLine, line: usize) -> Result<&Operand, AsmError> {
    inst.operand.as_ref().ok_or_else(|| AsmError::InvalidOperand {
        line,
        operand: String::new(),
        reason: format!("{} requires an operand", inst.opcode.mnemonic()),
    })
}

fn register(name: &str, line: usize) -> Result<u8, AsmError> {
    register_code(name).ok_or_else(|| invalid(line, name, "unknown register".to_string()))
}

fn small_number(text: &str, min: i64, max: i64, line: usize) -> Result<u8, AsmError> {
    match NumberParser::parse_decimal(text) {
        Ok(n) if (min..=max).contains(&n) => Ok(n as u8),
        _ => Err(invalid(line, text, format!("expected a number in {}..={}", min, max))),
    }
}

fn invalid(line: usize, operand: &str, reason: String) -> AsmError {
    AsmError::InvalidOperand {
        line,
        operand: operand.to_string(),
        reason,
    }
}
