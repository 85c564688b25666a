use tracing::debug;

use crate::error::{BLError, Position};
use crate::tree::*;
use crate::validate::{is_identifier, KEYWORDS};

/// Parser state: tracks position in the input string.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

/// Parse a complete BL program:
///
/// ```text
/// PROGRAM Name IS
///   INSTRUCTION Foo IS ... END Foo
/// BEGIN
///   ...
/// END Name
/// ```
pub fn parse(input: &str) -> Result<Program, BLError> {
    let mut parser = Parser { input, pos: 0 };
    let program = parser.parse_program()?;
    parser.skip_ws();
    if parser.pos < parser.input.len() {
        return Err(parser.error_point("Unexpected content after END of program".to_string()));
    }
    debug!(
        program = %program.name,
        instructions = program.context.len(),
        "parsed program"
    );
    Ok(program)
}

/// Parse a sequence of statements (no PROGRAM wrapper) into a BLOCK.
pub fn parse_block(input: &str) -> Result<Statement, BLError> {
    let mut parser = Parser { input, pos: 0 };
    let block = parser.parse_block()?;
    parser.skip_ws();
    if parser.pos < parser.input.len() {
        let word = parser.peek_word().unwrap_or("");
        return Err(parser.error_point(format!("Unexpected '{}'", word)));
    }
    Ok(block)
}

impl<'a> Parser<'a> {
    // ── Helpers ──────────────────────────────────────────────────────

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Current position in the source.
    fn position(&self) -> Position {
        let consumed = &self.input[..self.pos];
        let line = consumed.matches('\n').count();
        let last_newline = consumed.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = self.pos - last_newline;
        Position {
            line,
            column,
            offset: self.pos,
        }
    }

    /// Create an error at a single point (current position).
    fn error_point(&self, message: String) -> BLError {
        let pos = self.position();
        BLError::syntax_error(message, pos, pos)
    }

    /// Create an error spanning from `begin` to the current position.
    fn error_span(&self, code: &str, message: String, begin: Position) -> BLError {
        BLError::with_code(code, message, begin, self.position())
    }

    // ── Whitespace & Comments ───────────────────────────────────────

    fn skip_ws(&mut self) {
        loop {
            while let Some(ch) = self.peek_char() {
                if ch.is_whitespace() {
                    self.advance(ch.len_utf8());
                } else {
                    break;
                }
            }
            // Line comments: # to end of line
            if self.peek_char() == Some('#') {
                while let Some(ch) = self.peek_char() {
                    if ch == '\r' || ch == '\n' {
                        break;
                    }
                    self.advance(ch.len_utf8());
                }
            } else {
                break;
            }
        }
    }

    // ── Words ───────────────────────────────────────────────────────

    /// The next word without consuming it, after skipping whitespace.
    fn peek_word(&mut self) -> Option<&'a str> {
        self.skip_ws();
        let rest = self.remaining();
        let len = rest
            .find(|ch: char| !is_word_char(ch))
            .unwrap_or(rest.len());
        if len == 0 {
            None
        } else {
            Some(&rest[..len])
        }
    }

    fn next_word(&mut self) -> Result<&'a str, BLError> {
        match self.peek_word() {
            Some(word) => {
                self.advance(word.len());
                Ok(word)
            }
            None => match self.peek_char() {
                Some(ch) => Err(self.error_point(format!("Unexpected character '{}'", ch))),
                None => Err(self.error_point("Unexpected end of input".to_string())),
            },
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), BLError> {
        self.skip_ws();
        let begin = self.position();
        let word = self.next_word()?;
        if word == keyword {
            Ok(())
        } else {
            Err(BLError::syntax_error(
                format!("Expected '{}' but found '{}'", keyword, word),
                begin,
                self.position(),
            ))
        }
    }

    fn parse_identifier(&mut self) -> Result<String, BLError> {
        self.skip_ws();
        let begin = self.position();
        let word = self.next_word()?;
        if !is_identifier(word) {
            return Err(BLError::syntax_error(
                format!("Expected an identifier but found '{}'", word),
                begin,
                self.position(),
            ));
        }
        Ok(word.to_string())
    }

    /// `END name`, where `name` must repeat the opening name.
    fn expect_end_of(&mut self, name: &str) -> Result<(), BLError> {
        self.expect_keyword("END")?;
        self.skip_ws();
        let begin = self.position();
        let word = self.next_word()?;
        if word != name {
            return Err(self.error_span(
                "bl-parse-end-mismatch",
                format!("Expected 'END {}' but found 'END {}'", name, word),
                begin,
            ));
        }
        Ok(())
    }

    // ── Program & Instructions ──────────────────────────────────────

    fn parse_program(&mut self) -> Result<Program, BLError> {
        self.expect_keyword("PROGRAM")?;
        let name = self.parse_identifier()?;
        self.expect_keyword("IS")?;

        let mut program = Program::new(name.clone());
        while self.peek_word() == Some("INSTRUCTION") {
            let begin = self.position();
            let (instr_name, body) = self.parse_instruction()?;
            if is_primitive(&instr_name) {
                return Err(self.error_span(
                    "bl-parse-primitive-redefinition",
                    format!("Primitive instruction '{}' cannot be redefined", instr_name),
                    begin,
                ));
            }
            if program.context.contains_key(&instr_name) {
                return Err(self.error_span(
                    "bl-parse-duplicate-instruction",
                    format!("Instruction '{}' is already defined", instr_name),
                    begin,
                ));
            }
            program.context.insert(instr_name, body);
        }

        self.expect_keyword("BEGIN")?;
        program.body = self.parse_block()?;
        self.expect_end_of(&name)?;
        Ok(program)
    }

    fn parse_instruction(&mut self) -> Result<(String, Statement), BLError> {
        self.expect_keyword("INSTRUCTION")?;
        let name = self.parse_identifier()?;
        self.expect_keyword("IS")?;
        let body = self.parse_block()?;
        self.expect_end_of(&name)?;
        Ok((name, body))
    }

    // ── Statements ──────────────────────────────────────────────────

    /// Statements up to (not including) the next END or ELSE.
    fn parse_block(&mut self) -> Result<Statement, BLError> {
        let mut children = Vec::new();
        loop {
            match self.peek_word() {
                None if self.peek_char().is_none() => break,
                Some("END") | Some("ELSE") => break,
                _ => children.push(self.parse_statement()?),
            }
        }
        Ok(Statement::Block(children))
    }

    fn parse_statement(&mut self) -> Result<Statement, BLError> {
        self.skip_ws();
        let begin = self.position();
        match self.next_word()? {
            "IF" => {
                let condition = self.parse_condition()?;
                self.expect_keyword("THEN")?;
                let then_branch = self.parse_block()?;
                let stmt = if self.peek_word() == Some("ELSE") {
                    self.expect_keyword("ELSE")?;
                    let else_branch = self.parse_block()?;
                    Statement::if_else(condition, then_branch, else_branch)
                } else {
                    Statement::if_then(condition, then_branch)
                };
                self.expect_keyword("END")?;
                self.expect_keyword("IF")?;
                Ok(stmt)
            }
            "WHILE" => {
                let condition = self.parse_condition()?;
                self.expect_keyword("DO")?;
                let body = self.parse_block()?;
                self.expect_keyword("END")?;
                self.expect_keyword("WHILE")?;
                Ok(Statement::while_loop(condition, body))
            }
            word if is_identifier(word) => Ok(Statement::call(word)),
            word if KEYWORDS.contains(&word) => Err(BLError::syntax_error(
                format!("Unexpected keyword '{}'", word),
                begin,
                self.position(),
            )),
            word => Err(BLError::syntax_error(
                format!("Expected a statement but found '{}'", word),
                begin,
                self.position(),
            )),
        }
    }

    fn parse_condition(&mut self) -> Result<Condition, BLError> {
        self.skip_ws();
        let begin = self.position();
        let word = self.next_word()?;
        Condition::from_source_name(word).ok_or_else(|| {
            self.error_span(
                "bl-parse-unknown-condition",
                format!("Unknown condition '{}'", word),
                begin,
            )
        })
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}
