//! Line tokenizer and statement parser

use super::operand::Operand;
use crate::error::AsmError;
use crate::opcodes::{Format, Opcode, OpcodeTables, Variant};

/// One parsed statement: optional label, opcode, optional operand and the
/// format-4 (`+`) flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstructionLine {
    pub label: Option<String>,
    pub opcode: Opcode,
    pub operand: Option<Operand>,
    pub extended: bool,
}

/// A parsed statement together with where it came from.
#[derive(Clone, Debug)]
pub struct Statement {
    /// 1-based source line number
    pub line: usize,
    pub source: String,
    pub inst: InstructionLine,
}

/// Parse source lines in order, skipping blanks and comments.
pub fn parse_source<I, S>(lines: I, tables: &OpcodeTables) -> Result<Vec<Statement>, AsmError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut statements = Vec::new();
    for (idx, raw) in lines.into_iter().enumerate() {
        let raw = raw.as_ref();
        if let Some(inst) = parse_line(raw, idx + 1, tables)? {
            statements.push(Statement {
                line: idx + 1,
                source: raw.trim_end().to_string(),
                inst,
            });
        }
    }
    Ok(statements)
}

/// Upper-case and split on whitespace. Whitespace inside a `'...'` span does
/// not split a token.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for ch in line.chars() {
        if ch == '\'' {
            quoted = !quoted;
        } else if ch.is_whitespace() && !quoted {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push(ch.to_ascii_uppercase());
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Parse a single line. Blank lines and `.` comments give `Ok(None)`.
pub fn parse_line(
    line: &str,
    line_no: usize,
    tables: &OpcodeTables,
) -> Result<Option<InstructionLine>, AsmError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('.') {
        return Ok(None);
    }

    let mut tokens = tokenize(trimmed);
    if tokens.len() > 3 {
        return Err(AsmError::Parse { line: line_no, text: trimmed.to_string() });
    }

    // `+` marks format 4 on whichever of the first two tokens is the opcode
    let bare = |idx: usize| tokens[idx].strip_prefix('+').unwrap_or(&tokens[idx]);
    let known = |idx: usize| tables.contains(bare(idx));
    let (label_idx, op_idx, operand_idx) = match tokens.len() {
        1 if known(0) => (None, 0, None),
        2 if known(0) => (None, 0, Some(1)),
        2 if known(1) => (Some(0), 1, None),
        3 if known(1) => (Some(0), 1, Some(2)),
        _ => {
            if let Some(token) = tokens.iter().take(2).find(|t| t.starts_with('+')) {
                return Err(AsmError::InvalidOpcode {
                    line: line_no,
                    mnemonic: token.clone(),
                    reason: "not a known mnemonic".to_string(),
                });
            }
            return Err(AsmError::Parse { line: line_no, text: trimmed.to_string() });
        }
    };

    if let Some(idx) = label_idx {
        if tokens[idx].starts_with('+') {
            return Err(AsmError::InvalidOpcode {
                line: line_no,
                mnemonic: tokens[idx].clone(),
                reason: "not a known mnemonic".to_string(),
            });
        }
    }

    let extended = tokens[op_idx].starts_with('+');
    if extended {
        tokens[op_idx].remove(0);
    }

    let mnemonic = &tokens[op_idx];
    let opcode = tables.get(mnemonic).ok_or_else(|| AsmError::InvalidOpcode {
        line: line_no,
        mnemonic: mnemonic.clone(),
        reason: "not a known mnemonic".to_string(),
    })?;

    if extended {
        check_extended(opcode, tables.variant()).map_err(|reason| AsmError::InvalidOpcode {
            line: line_no,
            mnemonic: format!("+{}", mnemonic),
            reason,
        })?;
    }

    Ok(Some(InstructionLine {
        label: label_idx.map(|idx| tokens[idx].clone()),
        opcode,
        operand: operand_idx.map(|idx| Operand::new(tokens[idx].clone())),
        extended,
    }))
}

fn check_extended(opcode: Opcode, variant: Variant) -> Result<(), String> {
    if variant == Variant::Sic {
        return Err("extended format is not available on SIC".to_string());
    }
    match opcode {
        Opcode::Machine(ins) if ins.format == Format::Three => Ok(()),
        Opcode::Machine(_) => Err("format 4 requires a format 3 instruction".to_string()),
        Opcode::Directive(_) => Err("directives have no extended format".to_string()),
    }
}
