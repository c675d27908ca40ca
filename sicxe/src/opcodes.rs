//! SIC and SIC/XE opcode catalogs, directives and register codes

use std::collections::HashMap;

/// Which machine the catalog describes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Variant {
    /// Base SIC: 26 instructions, all 3 bytes, 15-bit absolute addresses.
    Sic,
    /// SIC/XE: formats 1-4, nixbpe addressing and `BASE`.
    #[default]
    Xe,
}

/// Native instruction format. Format 4 is selected per line with `+`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Format {
    One,
    Two,
    Three,
}

impl Format {
    pub fn bytes(self) -> u32 {
        match self {
            Format::One => 1,
            Format::Two => 2,
            Format::Three => 3,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    Start,
    End,
    Byte,
    Word,
    Resb,
    Resw,
    Base,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: &'static str,
    pub code: u8,
    pub format: Format,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Opcode {
    Machine(Instruction),
    Directive(Directive),
}

impl Opcode {
    pub fn is_directive(&self) -> bool {
        matches!(self, Opcode::Directive(_))
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Machine(ins) => ins.mnemonic,
            Opcode::Directive(d) => match d {
                Directive::Start => "START",
                Directive::End => "END",
                Directive::Byte => "BYTE",
                Directive::Word => "WORD",
                Directive::Resb => "RESB",
                Directive::Resw => "RESW",
                Directive::Base => "BASE",
            },
        }
    }
}

const SIC_INSTRUCTIONS: [(&str, u8); 26] = [
    ("ADD", 0x18), ("AND", 0x40), ("COMP", 0x28), ("DIV", 0x24),
    ("J", 0x3C), ("JEQ", 0x30), ("JGT", 0x34), ("JLT", 0x38), ("JSUB", 0x48),
    ("LDA", 0x00), ("LDCH", 0x50), ("LDL", 0x08), ("LDX", 0x04),
    ("MUL", 0x20), ("OR", 0x44), ("RD", 0xD8), ("RSUB", 0x4C),
    ("STA", 0x0C), ("STCH", 0x54), ("STL", 0x14), ("STSW", 0xE8), ("STX", 0x10),
    ("SUB", 0x1C), ("TD", 0xE0), ("TIX", 0x2C), ("WD", 0xDC),
];

const XE_INSTRUCTIONS: [(&str, u8, Format); 59] = [
    ("ADD", 0x18, Format::Three), ("ADDF", 0x58, Format::Three), ("ADDR", 0x90, Format::Two),
    ("AND", 0x40, Format::Three), ("CLEAR", 0xB4, Format::Two), ("COMP", 0x28, Format::Three),
    ("COMPF", 0x88, Format::Three), ("COMPR", 0xA0, Format::Two), ("DIV", 0x24, Format::Three),
    ("DIVF", 0x64, Format::Three), ("DIVR", 0x9C, Format::Two), ("FIX", 0xC4, Format::One),
    ("FLOAT", 0xC0, Format::One), ("HIO", 0xF4, Format::One), ("J", 0x3C, Format::Three),
    ("JEQ", 0x30, Format::Three), ("JGT", 0x34, Format::Three), ("JLT", 0x38, Format::Three),
    ("JSUB", 0x48, Format::Three), ("LDA", 0x00, Format::Three), ("LDB", 0x68, Format::Three),
    ("LDCH", 0x50, Format::Three), ("LDF", 0x70, Format::Three), ("LDL", 0x08, Format::Three),
    ("LDS", 0x6C, Format::Three), ("LDT", 0x74, Format::Three), ("LDX", 0x04, Format::Three),
    ("LPS", 0xD0, Format::Three), ("MUL", 0x20, Format::Three), ("MULF", 0x60, Format::Three),
    ("MULR", 0x98, Format::Two), ("NORM", 0xC8, Format::One), ("OR", 0x44, Format::Three),
    ("RD", 0xD8, Format::Three), ("RMO", 0xAC, Format::Two), ("RSUB", 0x4C, Format::Three),
    ("SHIFTL", 0xA4, Format::Two), ("SHIFTR", 0xA8, Format::Two), ("SIO", 0xF0, Format::One),
    ("SSK", 0xEC, Format::Three), ("STA", 0x0C, Format::Three), ("STB", 0x78, Format::Three),
    ("STCH", 0x54, Format::Three), ("STF", 0x80, Format::Three), ("STI", 0xD4, Format::Three),
    ("STL", 0x14, Format::Three), ("STS", 0x7C, Format::Three), ("STSW", 0xE8, Format::Three),
    ("STT", 0x84, Format::Three), ("STX", 0x10, Format::Three), ("SUB", 0x1C, Format::Three),
    ("SUBF", 0x5C, Format::Three), ("SUBR", 0x94, Format::Two), ("SVC", 0xB0, Format::Two),
    ("TD", 0xE0, Format::Three), ("TIO", 0xF8, Format::One), ("TIX", 0x2C, Format::Three),
    ("TIXR", 0xB8, Format::Two), ("WD", 0xDC, Format::Three),
];

const REGISTERS: [(&str, u8); 9] = [
    ("A", 0x0), ("X", 0x1), ("L", 0x2), ("B", 0x3), ("S", 0x4),
    ("T", 0x5), ("F", 0x6), ("PC", 0x8), ("SW", 0x9),
];

/// 4-bit register code used in format 2 instructions.
pub fn register_code(name: &str) -> Option<u8> {
    REGISTERS
        .iter()
        .find(|(reg, _)| *reg == name)
        .map(|&(_, code)| code)
}

pub struct OpcodeTables {
    variant: Variant,
    /// Mnemonic (upper case) -> machine instruction or directive
    pub entries: HashMap<&'static str, Opcode>,
}

impl OpcodeTables {
    pub fn new(variant: Variant) -> Self {
        let mut tables = Self {
            variant,
            entries: HashMap::new(),
        };
        tables.init_instructions();
        tables.init_directives();
        tables
    }

    fn init_instructions(&mut self) {
        match self.variant {
            Variant::Sic => {
                for (mnemonic, code) in SIC_INSTRUCTIONS {
                    let ins = Instruction { mnemonic, code, format: Format::Three };
                    self.entries.insert(mnemonic, Opcode::Machine(ins));
                }
            }
            Variant::Xe => {
                for (mnemonic, code, format) in XE_INSTRUCTIONS {
                    let ins = Instruction { mnemonic, code, format };
                    self.entries.insert(mnemonic, Opcode::Machine(ins));
                }
            }
        }
    }

    fn init_directives(&mut self) {
        self.entries.extend([
            ("START", Opcode::Directive(Directive::Start)),
            ("END", Opcode::Directive(Directive::End)),
            ("BYTE", Opcode::Directive(Directive::Byte)),
            ("WORD", Opcode::Directive(Directive::Word)),
            ("RESB", Opcode::Directive(Directive::Resb)),
            ("RESW", Opcode::Directive(Directive::Resw)),
        ]);
        if self.variant == Variant::Xe {
            self.entries.insert("BASE", Opcode::Directive(Directive::Base));
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn get(&self, mnemonic: &str) -> Option<Opcode> {
        self.entries.get(mnemonic).copied()
    }

    pub fn contains(&self, mnemonic: &str) -> bool {
        self.entries.contains_key(mnemonic)
    }
}

impl Default for OpcodeTables {
    fn default() -> Self {
        Self::new(Variant::Xe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine_count(tables: &OpcodeTables) -> usize {
        tables.entries.values().filter(|op| !op.is_directive()).count()
    }

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(machine_count(&OpcodeTables::new(Variant::Sic)), 26);
        assert_eq!(machine_count(&OpcodeTables::new(Variant::Xe)), 59);
    }

    #[test]
    fn test_xe_formats() {
        let tables = OpcodeTables::default();
        let Some(Opcode::Machine(clear)) = tables.get("CLEAR") else {
            panic!("CLEAR missing");
        };
        assert_eq!((clear.code, clear.format), (0xB4, Format::Two));
        let Some(Opcode::Machine(fix)) = tables.get("FIX") else {
            panic!("FIX missing");
        };
        assert_eq!(fix.format.bytes(), 1);
        assert_eq!(tables.get("BASE"), Some(Opcode::Directive(Directive::Base)));
    }

    #[test]
    fn test_sic_has_no_xe_extensions() {
        let tables = OpcodeTables::new(Variant::Sic);
        assert!(!tables.contains("BASE"));
        assert!(!tables.contains("LDB"));
        assert!(tables.contains("RESW"));
    }

    #[test]
    fn test_register_codes() {
        assert_eq!(register_code("A"), Some(0));
        assert_eq!(register_code("T"), Some(5));
        assert_eq!(register_code("SW"), Some(9));
        assert_eq!(register_code("Q"), None);
    }
}
