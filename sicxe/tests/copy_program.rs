//! End-to-end assembly of complete programs against known object programs.

use sicxe::{AsmError, Assembler, Variant};

const COPY_XE: &str = r#"
COPY     START   0
FIRST    STL     RETADR
         LDB     #LENGTH
         BASE    LENGTH
CLOOP   +JSUB    RDREC
         LDA     LENGTH
         COMP    #0
         JEQ     ENDFIL
        +JSUB    WRREC
         J       CLOOP
ENDFIL   LDA     EOF
         STA     BUFFER
         LDA     #3
         STA     LENGTH
        +JSUB    WRREC
         J       @RETADR
EOF      BYTE    C'EOF'
RETADR   RESW    1
LENGTH   RESW    1
BUFFER   RESB    4096
.
.        SUBROUTINE TO READ RECORD INTO BUFFER
.
RDREC    CLEAR   X
         CLEAR   A
         CLEAR   S
        +LDT     #4096
RLOOP    TD      INPUT
         JEQ     RLOOP
         RD      INPUT
         COMPR   A,S
         JEQ     EXIT
         STCH    BUFFER,X
         TIXR    T
         JLT     RLOOP
EXIT     STX     LENGTH
         RSUB
INPUT    BYTE    X'F1'
.
.        SUBROUTINE TO WRITE RECORD FROM BUFFER
.
WRREC    CLEAR   X
         LDT     LENGTH
WLOOP    TD      OUTPUT
         JEQ     WLOOP
         LDCH    BUFFER,X
         WD      OUTPUT
         TIXR    T
         JLT     WLOOP
         RSUB
OUTPUT   BYTE    X'05'
         END     FIRST
"#;

const COPY_XE_OBJECT: [&str; 10] = [
    "HCOPY  000000001077",
    "T0000001D17202D69202D4B1010360320262900003320074B10105D3F2FEC032010",
    "T00001D130F20160100030F200D4B10105D3E2003454F46",
    "T0010361DB410B400B44075101000E32019332FFADB2013A00433200857C003B850",
    "T0010531D3B2FEA1340004F0000F1B410774000E32011332FFA53C003DF2008B850",
    "T001070073B2FEF4F000005",
    "M00000705",
    "M00001405",
    "M00002705",
    "E000000",
];

#[test]
fn test_copy_program_object_code() {
    let mut assembler = Assembler::new();
    let records = assembler.assemble_source(COPY_XE).unwrap();
    assert_eq!(records, COPY_XE_OBJECT);
}

#[test]
fn test_copy_program_symbols() {
    let mut assembler = Assembler::new();
    assembler.assemble_source(COPY_XE).unwrap();
    assert_eq!(assembler.program_name(), "COPY");
    assert_eq!(assembler.program_length(), 0x1077);
    assert_eq!(assembler.lookup("RETADR"), Some(0x30));
    assert_eq!(assembler.lookup("LENGTH"), Some(0x33));
    assert_eq!(assembler.lookup("BUFFER"), Some(0x36));
    assert_eq!(assembler.lookup("RDREC"), Some(0x1036));
    assert_eq!(assembler.lookup("WRREC"), Some(0x105D));
    assert_eq!(assembler.lookup("OUTPUT"), Some(0x1076));
}

#[test]
fn test_copy_program_lowercase_source() {
    let lower = COPY_XE.to_lowercase();
    let records = Assembler::new().assemble_source(&lower).unwrap();
    assert_eq!(records, COPY_XE_OBJECT);
}

#[test]
fn test_copy_program_listing() {
    let mut assembler = Assembler::new();
    assembler.assemble_source(COPY_XE).unwrap();
    let line = assembler
        .listing()
        .iter()
        .find(|l| l.source.starts_with("STCH"))
        .unwrap();
    assert_eq!(line.address, 0x104E);
    assert_eq!(line.object, "57C003");
}

#[test]
fn test_small_example_from_reference() {
    let records = Assembler::new()
        .assemble(["COPY START 1000", "FIRST LDA ALPHA", "ALPHA WORD 5", "END COPY"])
        .unwrap();
    assert_eq!(records[0], "HCOPY  001000000006");
    // LDA: n=i=1, p=1, displacement 0 to ALPHA at 1003
    assert!(records[1].contains("032000"));
    assert!(records[1].contains("000005"));
    assert_eq!(records.last().unwrap(), "E001000");
}

#[test]
fn test_forward_format4_reference() {
    let records = Assembler::new()
        .assemble([
            "PROG   START 1000",
            "      +LDA   BIGSYM",
            "       RSUB",
            "BIGSYM WORD  9",
            "       END   PROG",
        ])
        .unwrap();
    assert_eq!(
        records,
        vec![
            "HPROG  00100000000A",
            "T0010000A031010074F0000000009",
            "M00100105",
            "E001000",
        ]
    );
    assert_eq!(records.iter().filter(|r| r.starts_with('M')).count(), 1);
}

#[test]
fn test_base_relative_at_offset_2048() {
    let records = Assembler::new()
        .assemble([
            "FALL   START 0",
            "      +LDB   #DATA",
            "       BASE  DATA",
            "       LDA   DATA",
            "       RESB  2048",
            "DATA   WORD  1",
            "       END   FALL",
        ])
        .unwrap();
    assert_eq!(records[1], "T0000000769100807034000");
}

#[test]
fn test_duplicate_label_is_fatal() {
    let err = Assembler::new()
        .assemble(["P START 0", "LOOP RSUB", "LOOP RSUB", "END P"])
        .unwrap_err();
    assert!(matches!(err, AsmError::DuplicateLabel { ref label, .. } if label == "LOOP"));
}

#[test]
fn test_undefined_symbol_is_fatal() {
    let err = Assembler::new()
        .assemble(["P START 0", "LDA MISSING", "END P"])
        .unwrap_err();
    assert!(matches!(err, AsmError::UnresolvedSymbol { line: 2, ref symbol, .. } if symbol == "MISSING"));
}

#[test]
fn test_displacement_out_of_range_is_fatal() {
    let err = Assembler::new()
        .assemble(["P START 0", "LDA DATA", "RESB 5000", "DATA WORD 1", "END P"])
        .unwrap_err();
    assert!(matches!(err, AsmError::DisplacementRange { line: 2, address: 0, .. }));
}

#[test]
fn test_immediate_literal_fallback_is_intentional() {
    // `#100` names no symbol, so it is taken as the constant 100
    let records = Assembler::new()
        .assemble(["P START 0", "LDA #100", "END P"])
        .unwrap();
    assert_eq!(records[1], "T00000003010064");

    // anything else after `#` has to be a symbol
    let err = Assembler::new()
        .assemble(["P START 0", "LDA #ONE", "END P"])
        .unwrap_err();
    assert!(matches!(err, AsmError::UnresolvedSymbol { .. }));
}

#[test]
fn test_lowercase_character_literal_is_upper_cased() {
    let records = Assembler::new()
        .assemble(["P START 0", "E BYTE c'eof'", "END P"])
        .unwrap();
    assert_eq!(records[1], "T00000003454F46");
}

#[test]
fn test_plus_prefixed_operand_is_not_a_symbol() {
    let err = Assembler::new()
        .assemble(["P START 0", "LDA +X1", "X1 WORD 1", "END P"])
        .unwrap_err();
    assert!(matches!(err, AsmError::UnresolvedSymbol { line: 2, ref symbol, .. } if symbol == "+X1"));
}

#[test]
fn test_malformed_line_is_fatal() {
    let err = Assembler::new()
        .assemble(["P START 0", "THIS IS NOT ASSEMBLY", "END P"])
        .unwrap_err();
    assert!(matches!(err, AsmError::Parse { line: 2, .. }));
}

#[test]
fn test_sic_program() {
    let mut assembler = Assembler::with_variant(Variant::Sic);
    let records = assembler
        .assemble([
            "COPY    START   1000",
            "FIRST   STL     RETADR",
            "        LDA     ZERO",
            "        STCH    BUFFER,X",
            "        RSUB",
            "ZERO    WORD    0",
            "RETADR  RESW    1",
            "BUFFER  RESB    16",
            "        END     FIRST",
        ])
        .unwrap();
    assert_eq!(
        records,
        vec![
            "HCOPY  001000000022",
            "T0010000F14100F00100C5490124C0000000000",
            "E001000",
        ]
    );
    assert_eq!(assembler.lookup("BUFFER"), Some(0x1012));
}
