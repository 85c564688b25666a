use std::fmt::Write;

use crate::error::BLError;
use crate::tree::*;
use crate::validate::ValidationError;

/// JSON formatting style.
#[derive(Clone, Copy)]
pub enum JsonStyle {
    /// Compact: no whitespace between tokens.
    Compact,
    /// Pretty: 2-space indented, one entry per line.
    Pretty,
}

struct JsonWriter {
    buf: String,
    style: JsonStyle,
    depth: usize,
}

impl JsonWriter {
    fn new(style: JsonStyle) -> Self {
        JsonWriter {
            buf: String::new(),
            style,
            depth: 0,
        }
    }

    fn is_pretty(&self) -> bool {
        matches!(self.style, JsonStyle::Pretty)
    }

    fn newline(&mut self) {
        if self.is_pretty() {
            self.buf.push('\n');
            for _ in 0..self.depth {
                self.buf.push_str("  ");
            }
        }
    }

    fn space(&mut self) {
        if self.is_pretty() {
            self.buf.push(' ');
        }
    }

    fn open_object(&mut self) {
        self.buf.push('{');
        self.depth += 1;
    }

    fn close_object(&mut self) {
        self.depth -= 1;
        self.newline();
        self.buf.push('}');
    }

    fn write_program(&mut self, p: &Program) {
        self.open_object();
        let mut first = true;

        self.entry_sep(&mut first);
        self.write_key("name");
        self.write_string_value(&p.name);

        self.entry_sep(&mut first);
        self.write_key("context");
        self.open_object();
        let mut first_instr = true;
        for (name, body) in &p.context {
            self.entry_sep(&mut first_instr);
            self.write_key(name);
            self.write_statement(body);
        }
        if p.context.is_empty() {
            self.depth -= 1;
            self.buf.push('}');
        } else {
            self.close_object();
        }

        self.entry_sep(&mut first);
        self.write_key("body");
        self.write_statement(&p.body);

        self.close_object();
    }

    fn write_statement(&mut self, s: &Statement) {
        self.open_object();
        let mut first = true;

        self.entry_sep(&mut first);
        self.write_key("kind");
        self.write_string_value(s.kind().name());

        if let Some(condition) = s.condition() {
            self.entry_sep(&mut first);
            self.write_key("condition");
            self.write_string_value(condition.name());
        }

        match s {
            Statement::Block(children) => {
                self.entry_sep(&mut first);
                self.write_key("children");
                self.write_array(children);
            }
            Statement::If { body, .. } | Statement::While { body, .. } => {
                self.entry_sep(&mut first);
                self.write_key("body");
                self.write_statement(body);
            }
            Statement::IfElse {
                then_branch,
                else_branch,
                ..
            } => {
                self.entry_sep(&mut first);
                self.write_key("then");
                self.write_statement(then_branch);
                self.entry_sep(&mut first);
                self.write_key("else");
                self.write_statement(else_branch);
            }
            Statement::Call(name) => {
                self.entry_sep(&mut first);
                self.write_key("instruction");
                self.write_string_value(name);
            }
        }

        self.close_object();
    }

    fn write_array(&mut self, arr: &[Statement]) {
        self.buf.push('[');
        self.depth += 1;

        for (i, item) in arr.iter().enumerate() {
            if i > 0 {
                self.buf.push(',');
            }
            self.newline();
            self.write_statement(item);
        }

        self.depth -= 1;
        if !arr.is_empty() {
            self.newline();
        }
        self.buf.push(']');
    }

    fn entry_sep(&mut self, first: &mut bool) {
        if *first {
            *first = false;
        } else {
            self.buf.push(',');
        }
        self.newline();
    }

    fn write_key(&mut self, key: &str) {
        self.write_string_value(key);
        self.buf.push(':');
        self.space();
    }

    fn write_string_value(&mut self, s: &str) {
        self.buf.push('"');
        for ch in s.chars() {
            match ch {
                '"' => self.buf.push_str("\\\""),
                '\\' => self.buf.push_str("\\\\"),
                '\n' => self.buf.push_str("\\n"),
                '\r' => self.buf.push_str("\\r"),
                '\t' => self.buf.push_str("\\t"),
                c if c < '\u{0020}' => {
                    let _ = write!(&mut self.buf, "\\u{:04x}", c as u32);
                }
                c => self.buf.push(c),
            }
        }
        self.buf.push('"');
    }
}

/// Serialize a program to JSON in the given style.
pub fn program_to_json(p: &Program, style: JsonStyle) -> String {
    let mut w = JsonWriter::new(style);
    w.write_program(p);
    w.buf
}

/// Serialize a statement to JSON in the given style.
pub fn statement_to_json(s: &Statement, style: JsonStyle) -> String {
    let mut w = JsonWriter::new(style);
    w.write_statement(s);
    w.buf
}

/// Serialize a list of parse errors to a JSON array string.
pub fn errors_to_json(errors: &[BLError]) -> String {
    let mut w = JsonWriter::new(JsonStyle::Compact);
    w.buf.push('[');
    for (i, err) in errors.iter().enumerate() {
        if i > 0 {
            w.buf.push(',');
        }
        w.buf.push('{');
        w.write_key("code");
        w.write_string_value(&err.code);
        w.buf.push(',');
        w.write_key("message");
        w.write_string_value(&err.message);
        w.buf.push(',');
        w.write_key("begin");
        write_position(&mut w, &err.begin);
        w.buf.push(',');
        w.write_key("end");
        write_position(&mut w, &err.end);
        w.buf.push('}');
    }
    w.buf.push(']');
    w.buf
}

fn write_position(w: &mut JsonWriter, pos: &crate::error::Position) {
    let _ = write!(
        &mut w.buf,
        "{{\"line\":{},\"column\":{},\"offset\":{}}}",
        pos.line, pos.column, pos.offset
    );
}

/// Serialize program validation errors to a JSON array string.
pub fn validation_errors_to_json(errors: &[ValidationError]) -> String {
    let mut w = JsonWriter::new(JsonStyle::Compact);
    w.buf.push('[');
    for (i, err) in errors.iter().enumerate() {
        if i > 0 {
            w.buf.push(',');
        }
        w.buf.push('{');
        w.write_key("code");
        w.write_string_value(err.code);
        w.buf.push(',');
        w.write_key("message");
        w.write_string_value(&err.message);
        w.buf.push(',');
        w.write_key("path");
        w.buf.push('[');
        for (j, segment) in err.path.iter().enumerate() {
            if j > 0 {
                w.buf.push(',');
            }
            w.write_string_value(segment);
        }
        w.buf.push(']');
        w.buf.push('}');
    }
    w.buf.push(']');
    w.buf
}
