//! Command-line driver for the decompressor generator.
//!
//! Builds the RV32IC catalog, then performs any of:
//! 1. **Self-test:** round-trip every command through an external assembler
//!    (`--do-self-test`, with `--compiler` and `--objdump`).
//! 2. **Decompressor emission:** write the generated Verilog block
//!    (`--decomp-out`).
//! 3. **Vector emission:** write the generated `TEST_CASE` file
//!    (`--test-cpp-out`).
//!
//! Exit code 0 on success, non-zero on any declaration or self-test failure.

use std::path::PathBuf;
use std::{fs, process};

use clap::Parser;

use rvcgen_core::{Error, SelectionTree, emit, isa, selftest};

#[derive(Parser, Debug)]
#[command(
    name = "rvcgen",
    version,
    about = "Generate a RISC-V C-extension decompressor and its test vectors",
    long_about = "Derives an insn16 -> insn32 Verilog decompressor and a TEST_CASE vector file \
                  from the declarative RV32IC command tables.\n\nExamples:\n  \
                  rvcgen --decomp-out decompressor.v\n  \
                  rvcgen --test-cpp-out test_decomp.h\n  \
                  rvcgen --do-self-test --compiler clang --objdump llvm-objdump"
)]
struct Cli {
    /// Round-trip every command through the external toolchain.
    #[arg(long)]
    do_self_test: bool,

    /// Assembler/compiler executable for self-testing.
    #[arg(long, value_name = "PATH")]
    compiler: Option<String>,

    /// Disassembler executable for self-testing.
    #[arg(long, value_name = "PATH")]
    objdump: Option<String>,

    /// Write the generated Verilog decompressor block here.
    #[arg(long, value_name = "PATH")]
    decomp_out: Option<PathBuf>,

    /// Write the generated TEST_CASE vector file here.
    #[arg(long, value_name = "PATH")]
    test_cpp_out: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(error) = run(&cli) {
        eprintln!("error: {error}");
        let mut source = std::error::Error::source(&error);
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    let catalog = isa::catalog()?;

    if cli.do_self_test {
        let (Some(compiler), Some(objdump)) = (&cli.compiler, &cli.objdump) else {
            eprintln!("error: --do-self-test requires --compiler and --objdump");
            process::exit(2);
        };
        let tools = selftest::Toolchain::locate(compiler, objdump)?;
        selftest::run(&catalog, &tools)?;
    }

    if let Some(path) = &cli.decomp_out {
        let tree = SelectionTree::build(&catalog)?;
        let text = emit::verilog::decompressor(&catalog, &tree, "insn16", "insn32")?;
        fs::write(path, text)?;
        println!("[*] Wrote decompressor: {}", path.display());
    }

    if let Some(path) = &cli.test_cpp_out {
        let text = emit::vectors::test_cases(&catalog)?;
        fs::write(path, text)?;
        println!("[*] Wrote test vectors: {}", path.display());
    }

    Ok(())
}
