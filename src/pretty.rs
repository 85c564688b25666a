//! BL source printer.
//!
//! Printing a program the parser built and parsing the text again gives an
//! equal program. Other trees lose shape: nested BLOCKs are flattened, and a
//! non-BLOCK body of IF, IF_ELSE or WHILE parses back wrapped in a BLOCK.

use crate::tree::*;

/// Printer options.
#[derive(Debug, Clone, Copy)]
pub struct PrettyConfig {
    /// Spaces per nesting level.
    pub indent: usize,
}

impl Default for PrettyConfig {
    fn default() -> Self {
        PrettyConfig { indent: 4 }
    }
}

struct Printer {
    buf: String,
    config: PrettyConfig,
    depth: usize,
}

impl Printer {
    fn new(config: PrettyConfig) -> Self {
        Printer {
            buf: String::new(),
            config,
            depth: 0,
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth * self.config.indent {
            self.buf.push(' ');
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    fn nested(&mut self, s: &Statement) {
        self.depth += 1;
        self.write_statement(s);
        self.depth -= 1;
    }

    fn write_program(&mut self, p: &Program) {
        self.line(&format!("PROGRAM {} IS", p.name));
        self.buf.push('\n');
        self.depth += 1;
        for (name, body) in &p.context {
            self.line(&format!("INSTRUCTION {} IS", name));
            self.nested(body);
            self.line(&format!("END {}", name));
            self.buf.push('\n');
        }
        self.depth -= 1;
        self.line("BEGIN");
        self.nested(&p.body);
        self.line(&format!("END {}", p.name));
    }

    /// Children of a BLOCK print at the block's own depth; the block has no
    /// delimiters of its own.
    fn write_statement(&mut self, s: &Statement) {
        match s {
            Statement::Block(children) => {
                for child in children {
                    self.write_statement(child);
                }
            }
            Statement::If { condition, body } => {
                self.line(&format!("IF {} THEN", condition.source_name()));
                self.nested(body);
                self.line("END IF");
            }
            Statement::IfElse {
                condition,
                then_branch,
                else_branch,
            } => {
                self.line(&format!("IF {} THEN", condition.source_name()));
                self.nested(then_branch);
                self.line("ELSE");
                self.nested(else_branch);
                self.line("END IF");
            }
            Statement::While { condition, body } => {
                self.line(&format!("WHILE {} DO", condition.source_name()));
                self.nested(body);
                self.line("END WHILE");
            }
            Statement::Call(name) => self.line(name),
        }
    }
}

/// Render a program as BL source.
pub fn program_to_string(p: &Program, config: PrettyConfig) -> String {
    let mut printer = Printer::new(config);
    printer.write_program(p);
    printer.buf
}

/// Render a statement as BL source, starting at column 0.
pub fn statement_to_string(s: &Statement, config: PrettyConfig) -> String {
    let mut printer = Printer::new(config);
    printer.write_statement(s);
    printer.buf
}
