use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use sicxe::{AsmError, Assembler, Variant};

const LONG_ABOUT: &str = "Two-pass SIC/XE assembler.

Reads one source file and writes its object program (H, T, M and E records,
one per line). Assembly errors are reported as `error: line N ($LOCCTR): ...`
and no object file is written.";

#[derive(Parser, Debug)]
#[command(
    name = "sicxe",
    version,
    about = "Two-pass SIC/XE assembler producing H/T/M/E object records",
    long_about = LONG_ABOUT
)]
struct Cli {
    /// Assembly source file
    #[arg(value_name = "FILE", default_value = "input.asm")]
    input: PathBuf,
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        long_help = "Object program file. Defaults to the input path with a .obj extension."
    )]
    output: Option<PathBuf>,
    /// Assemble for the base SIC machine instead of SIC/XE
    #[arg(long = "sic")]
    sic: bool,
    /// Write the assembly listing to FILE
    #[arg(short = 'l', long = "listing", value_name = "FILE")]
    listing: Option<PathBuf>,
    /// Print the symbol table sorted by address
    #[arg(short = 's', long = "symbols")]
    symbols: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), AsmError> {
    let variant = if cli.sic { Variant::Sic } else { Variant::Xe };
    let mut assembler = Assembler::with_variant(variant);

    let source = fs::read_to_string(&cli.input)?;
    let records = assembler.assemble_source(&source)?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| object_path(&cli.input));
    let mut object = records.join("\n");
    object.push('\n');
    fs::write(&output, object)?;

    if let Some(path) = &cli.listing {
        assembler.save_listing(path)?;
    }

    if cli.symbols {
        for (name, address) in assembler.symbol_table().sorted() {
            println!("{:<8} {:06X}", name, address);
        }
    }

    Ok(())
}

fn object_path(input: &Path) -> PathBuf {
    input.with_extension("obj")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn test_default_arguments() {
        let cli = Cli::parse_from(["sicxe"]);
        assert_eq!(cli.input, PathBuf::from("input.asm"));
        assert!(cli.output.is_none());
        assert!(!cli.sic);
        assert!(!cli.symbols);
    }

    #[test]
    fn test_all_arguments() {
        let cli = Cli::parse_from(["sicxe", "prog.asm", "-o", "out.obj", "--sic", "-l", "prog.lst", "-s"]);
        assert_eq!(cli.input, PathBuf::from("prog.asm"));
        assert_eq!(cli.output, Some(PathBuf::from("out.obj")));
        assert!(cli.sic);
        assert_eq!(cli.listing, Some(PathBuf::from("prog.lst")));
        assert!(cli.symbols);
    }

    #[test]
    fn test_object_path_replaces_extension() {
        assert_eq!(object_path(Path::new("dir/copy.asm")), PathBuf::from("dir/copy.obj"));
        assert_eq!(object_path(Path::new("copy")), PathBuf::from("copy.obj"));
    }

    #[test]
    fn test_run_writes_object_and_listing() {
        let dir = std::env::temp_dir().join(format!("sicxe-cli-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let input = dir.join("prog.asm");
        fs::write(&input, "P START 0\nFIRST LDA #3\nEND P\n").unwrap();
        let listing = dir.join("prog.lst");

        let cli = Cli::parse_from([
            OsStr::new("sicxe"),
            input.as_os_str(),
            OsStr::new("-l"),
            listing.as_os_str(),
        ]);
        run(&cli).unwrap();

        let object = fs::read_to_string(dir.join("prog.obj")).unwrap();
        assert_eq!(object, "HP     000000000003\nT00000003010003\nE000000\n");
        assert!(fs::read_to_string(&listing).unwrap().contains("010003"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let cli = Cli::parse_from(["sicxe", "/nonexistent/dir/prog.asm"]);
        assert!(matches!(run(&cli), Err(AsmError::Io(_))));
    }
}
