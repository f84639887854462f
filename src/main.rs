use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use miette::{bail, IntoDiagnostic, NamedSource, Report, Result};

use lmc::{DebuggerOptions, Program, RunEnvironment};

/// An assembler, interpreter and debugger for the Little Man Computer.
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Quickly provide a `.lmc` file to run
    path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run assembly source or a `.words` file and output to terminal
    Run {
        /// `.lmc`, `.asm` or `.words` file to run
        name: PathBuf,
        /// Input values, consumed before any are read from stdin
        #[arg(short, long = "input", value_name = "VALUE", allow_negative_numbers = true,
              value_parser = clap::value_parser!(i32).range(-999..=999))]
        inputs: Vec<i32>,
        /// Produce minimal output, suited for blackbox tests
        #[arg(short, long)]
        minimal: bool,
    },
    /// Run a program with the debugger
    Debug {
        /// `.lmc`, `.asm` or `.words` file to run
        name: PathBuf,
        /// Read debugger commands from argument
        #[arg(short, long)]
        command: Option<String>,
        /// Input values, consumed before any are read from stdin
        #[arg(short, long = "input", value_name = "VALUE", allow_negative_numbers = true,
              value_parser = clap::value_parser!(i32).range(-999..=999))]
        inputs: Vec<i32>,
        /// Produce minimal output, suited for blackbox tests
        #[arg(short, long)]
        minimal: bool,
    },
    /// Assemble to a `.words` file, one memory word per line
    Compile {
        /// Assembly file to compile
        name: PathBuf,
        /// Destination to output `.words` file
        dest: Option<PathBuf>,
    },
    /// Check an assembly file without running or outputting words
    Check {
        /// File to check
        name: PathBuf,
    },
    /// Print the assembled words, their disassembly, and the symbol table
    Listing {
        /// Assembly file to list
        name: PathBuf,
    },
}

fn main() -> miette::Result<()> {
    use MsgColor::*;
    let args = Args::parse();
    lmc::env::init();

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new() //
                .context_lines(lmc::DIAGNOSTIC_CONTEXT_LINES)
                .build(),
        )
    }))?;

    if let Some(command) = args.command {
        match command {
            Command::Run {
                name,
                inputs,
                minimal,
            } => run(&name, None, &inputs, minimal),
            Command::Debug {
                name,
                command,
                inputs,
                minimal,
            } => run(&name, Some(DebuggerOptions { command }), &inputs, minimal),
            Command::Compile { name, dest } => {
                file_message(Green, "Assembling", &name);
                let src = fs::read_to_string(&name).into_diagnostic()?;
                let program = assemble(&name, src)?;

                let out_file_name = dest.unwrap_or_else(|| name.with_extension("words"));
                fs::write(&out_file_name, program.to_words_text()).into_diagnostic()?;

                message(Green, "Finished", &format!("emit {} words", program.len()));
                file_message(Green, "Saved", &out_file_name);
                Ok(())
            }
            Command::Check { name } => {
                file_message(Green, "Checking", &name);
                let src = fs::read_to_string(&name).into_diagnostic()?;
                let _ = assemble(&name, src)?;
                message(Green, "Success", "no errors found!");
                Ok(())
            }
            Command::Listing { name } => {
                let src = fs::read_to_string(&name).into_diagnostic()?;
                let program = assemble(&name, src)?;
                print!("{}", program.listing());
                if !program.symbols().is_empty() {
                    println!();
                    for (label, address) in program.symbols().iter() {
                        println!("{:<10} {:02}", label, address);
                    }
                }
                Ok(())
            }
        }
    } else if let Some(path) = args.path {
        run(&path, None, &[], false)
    } else {
        println!("\n~ lmc v{VERSION} ~");
        println!("{}", LOGO.truecolor(120, 180, 255).bold());
        println!("{SHORT_INFO}");
        std::process::exit(0);
    }
}

#[allow(unused)]
enum MsgColor {
    Green,
    Cyan,
    Red,
}

fn file_message(color: MsgColor, left: &str, right: &Path) {
    let right = format!("target {}", right.display());
    message(color, left, &right);
}

fn message(color: MsgColor, left: &str, right: &str) {
    let left = match color {
        MsgColor::Green => left.green(),
        MsgColor::Cyan => left.cyan(),
        MsgColor::Red => left.red(),
    };
    println!("{left:>12} {right}");
}

fn run(
    name: &Path,
    debugger_opts: Option<DebuggerOptions>,
    inputs: &[i32],
    minimal: bool,
) -> Result<()> {
    file_message(MsgColor::Green, "Assembling", name);
    let Some(ext) = name.extension() else {
        bail!("File has no extension. Exiting...");
    };
    let src = fs::read_to_string(name).into_diagnostic()?;
    let mut env = match ext.to_str() {
        Some("words") => {
            let program = Program::from_words_text(&src).map_err(|e| with_source(e, name, src))?;
            RunEnvironment::new(program, None, debugger_opts)
        }
        Some("lmc" | "asm") => {
            let program = assemble(name, src.clone())?;
            RunEnvironment::new(program, Some(src), debugger_opts)
        }
        _ => bail!("File has unknown extension. Exiting..."),
    };

    env.set_minimal(minimal);
    env.push_inputs(inputs);

    message(MsgColor::Green, "Running", "loaded program");
    env.run();

    file_message(MsgColor::Green, "Completed", name);
    Ok(())
}

/// Assemble source, attaching the source text to any diagnostic.
fn assemble(name: &Path, src: String) -> Result<Program> {
    lmc::assemble(&src).map_err(|e| with_source(e, name, src))
}

fn with_source<E>(error: E, name: &Path, src: String) -> Report
where
    E: miette::Diagnostic + Send + Sync + 'static,
{
    Report::new(error).with_source_code(NamedSource::new(name.display().to_string(), src))
}

const LOGO: &str = r#"
 _
| |_ __ ___   ___
| | '_ ` _ \ / __|
| | | | | | | (__
|_|_| |_| |_|\___|"#;

const SHORT_INFO: &str = r"
Welcome to lmc, an all-in-one toolchain for the Little Man Computer:
a decimal machine with 100 mailboxes, one accumulator, and a tray for input and output.
Please use `-h` or `--help` to access the usage instructions and documentation.
";

const VERSION: &str = env!("CARGO_PKG_VERSION");
