//! Addressing mode detection and displacement selection

use crate::parser::Operand;

/// nixbpe bits as they sit in the low 6 bits of `(opcode << 4) | xbpe`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Nixbpe(u8);

impl Nixbpe {
    pub const N: u8 = 0b10_0000;
    pub const I: u8 = 0b01_0000;
    pub const X: u8 = 0b00_1000;
    pub const B: u8 = 0b00_0100;
    pub const P: u8 = 0b00_0010;
    pub const E: u8 = 0b00_0001;

    pub fn new() -> Self {
        Nixbpe(0)
    }

    pub fn with(self, bit: u8) -> Self {
        Nixbpe(self.0 | bit)
    }

    /// n and i, to be OR-ed into the opcode byte.
    pub fn ni(self) -> u8 {
        self.0 >> 4
    }

    /// x, b, p and e as one nibble.
    pub fn xbpe(self) -> u8 {
        self.0 & 0x0F
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AddrMode {
    /// n=1 i=1
    Simple,
    /// n=0 i=1
    Immediate,
    /// n=1 i=0
    Indirect,
}

impl AddrMode {
    pub fn of(operand: Option<&Operand>) -> Self {
        match operand {
            Some(op) if op.is_immediate() => AddrMode::Immediate,
            Some(op) if op.is_indirect() => AddrMode::Indirect,
            _ => AddrMode::Simple,
        }
    }

    /// Starting flags for this mode, x-bit included when the raw operand
    /// ends with `,X`.
    pub fn flags(self, operand: Option<&Operand>) -> Nixbpe {
        let flags = match self {
            AddrMode::Simple => Nixbpe::new().with(Nixbpe::N).with(Nixbpe::I),
            AddrMode::Immediate => Nixbpe::new().with(Nixbpe::I),
            AddrMode::Indirect => Nixbpe::new().with(Nixbpe::N),
        };
        match operand {
            Some(op) if op.is_indexed() => flags.with(Nixbpe::X),
            _ => flags,
        }
    }
}

/// A 12-bit displacement and the mode that produced it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Displacement {
    PcRelative(i32),
    BaseRelative(u32),
}

impl Displacement {
    pub fn flag(self) -> u8 {
        match self {
            Displacement::PcRelative(_) => Nixbpe::P,
            Displacement::BaseRelative(_) => Nixbpe::B,
        }
    }

    /// The field as encoded: two's complement for PC-relative offsets.
    pub fn field(self) -> u16 {
        match self {
            Displacement::PcRelative(off) => (off as u16) & 0x0FFF,
            Displacement::BaseRelative(off) => (off as u16) & 0x0FFF,
        }
    }
}

pub fn pc_relative(target: u32, next: u32) -> Option<Displacement> {
    let offset = target as i64 - next as i64;
    (-2048..=2047)
        .contains(&offset)
        .then_some(Displacement::PcRelative(offset as i32))
}

pub fn base_relative(target: u32, base: u32) -> Option<Displacement> {
    let offset = target as i64 - base as i64;
    (0..=4095)
        .contains(&offset)
        .then_some(Displacement::BaseRelative(offset as u32))
}

/// PC-relative first, base-relative second. `None` means only format 4 can
/// reach the target.
pub fn select_displacement(target: u32, next: u32, base: u32) -> Option<Displacement> {
    pc_relative(target, next).or_else(|| base_relative(target, base))
}
