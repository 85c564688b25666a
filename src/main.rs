use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use bl_refactor::json::{self, JsonStyle};
use bl_refactor::pretty::{self, PrettyConfig};
use bl_refactor::{BLError, Program};
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(name = "blr", about = "Analyze and refactor BL programs")]
struct Cli {
    /// BL program to read. Reads stdin when omitted.
    #[arg(long, short)]
    input: Option<PathBuf>,
    /// Emit JSON instead of BL source or plain text.
    #[arg(long)]
    json: bool,
    /// Spaces per nesting level when printing BL source.
    #[arg(long, default_value_t = 4)]
    indent: usize,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that every call resolves and no primitive is redefined.
    Check,
    /// Print the program back out.
    Print,
    /// Count calls to primitive instructions, or to one named instruction.
    Count {
        /// Count calls to this instruction instead of to primitives.
        #[arg(long)]
        instruction: Option<String>,
    },
    /// Rename an instruction and every call to it.
    Rename {
        old_name: String,
        new_name: String,
    },
    /// Rewrite IF_ELSE statements with negated conditions.
    Simplify,
}

fn read_source(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

/// Print a parse error with the offending line and an underline.
fn report_parse_error(input: &str, err: &BLError) {
    let lines: Vec<&str> = input.lines().collect();
    let line_num = err.begin.line;
    let line_text = lines.get(line_num).unwrap_or(&"");

    eprintln!("ERROR AT LINE {}:", line_num + 1);
    eprintln!("{}", line_text);

    let start_col = err.begin.column;
    let end_col = if err.begin.line == err.end.line && err.end.column > err.begin.column {
        err.end.column
    } else if start_col < line_text.len() {
        line_text.len()
    } else {
        start_col + 1
    };

    let mut underline = " ".repeat(start_col);
    underline.push('^');
    if end_col > start_col + 1 {
        underline.push_str(&"_".repeat(end_col - start_col - 1));
    }

    eprintln!("{}", underline);
    eprintln!("{}", err.message);
}

fn emit_program(program: &Program, cli: &Cli) {
    if cli.json {
        println!("{}", json::program_to_json(program, JsonStyle::Pretty));
    } else {
        let config = PrettyConfig { indent: cli.indent };
        print!("{}", pretty::program_to_string(program, config));
    }
}

fn main() -> Result<()> {
    bl_refactor::init_tracing();
    let cli = Cli::parse();

    let input = read_source(cli.input.as_ref())?;
    let mut program = match bl_refactor::parse_program(&input) {
        Ok(program) => program,
        Err(err) => {
            if cli.json {
                eprintln!("{}", json::errors_to_json(std::slice::from_ref(&err)));
            } else {
                report_parse_error(&input, &err);
            }
            std::process::exit(1);
        }
    };

    match &cli.command {
        Command::Check => {
            let errors = bl_refactor::validate_program(&program);
            if cli.json {
                println!("{}", json::validation_errors_to_json(&errors));
            } else {
                for err in &errors {
                    eprintln!("{}: {} ({})", err.path.join("/"), err.message, err.code);
                }
            }
            if !errors.is_empty() {
                std::process::exit(1);
            }
            info!(program = %program.name, "program is well formed");
        }
        Command::Print => emit_program(&program, &cli),
        Command::Count { instruction } => {
            let count = match instruction {
                Some(name) => bl_refactor::count_of_instruction_calls_in_program(&program, name),
                None => bl_refactor::count_of_primitive_calls_in_program(&program),
            };
            println!("{}", count);
        }
        Command::Rename { old_name, new_name } => {
            bl_refactor::rename_program_instruction(&mut program, old_name, new_name)
                .with_context(|| format!("cannot rename '{}' to '{}'", old_name, new_name))?;
            emit_program(&program, &cli);
        }
        Command::Simplify => {
            bl_refactor::simplify_program(&mut program);
            emit_program(&program, &cli);
        }
    }

    Ok(())
}
