pub mod count;
pub mod error;
pub mod json;
pub mod parser;
pub mod pretty;
pub mod rename;
pub mod simplify;
pub mod tree;
pub mod validate;

pub use count::{
    count_calls, count_of_instruction_calls, count_of_instruction_calls_in_program,
    count_of_primitive_calls, count_of_primitive_calls_in_program, count_program_calls,
};
pub use error::{BLError, Position, RefactorError};
pub use rename::{rename_instruction, rename_program_instruction};
pub use simplify::{simplify_if_else, simplify_program};
pub use tree::{is_primitive, Condition, Kind, Parts, Program, Statement, PRIMITIVE_INSTRUCTIONS};
pub use validate::{validate_program, ValidationError};

// ── Core API ───────────────────────────────────────────────────────

/// Parse BL source containing a full `PROGRAM ... END` definition.
pub fn parse_program(input: &str) -> Result<Program, BLError> {
    parser::parse(input)
}

/// Parse BL source containing a bare sequence of statements into a BLOCK.
pub fn parse_statement(input: &str) -> Result<Statement, BLError> {
    parser::parse_block(input)
}

/// Install a stderr `tracing` subscriber. `RUST_LOG` overrides the default
/// `bl_refactor=warn` filter.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bl_refactor=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
