use std::sync::OnceLock;

use regex::Regex;

use crate::tree::*;

/// Words with a fixed meaning in BL source. They cannot name instructions.
pub const KEYWORDS: [&str; 10] = [
    "PROGRAM",
    "INSTRUCTION",
    "IS",
    "BEGIN",
    "END",
    "IF",
    "THEN",
    "ELSE",
    "WHILE",
    "DO",
];

fn identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("identifier pattern is valid")
    })
}

/// Check whether `name` is a syntactically valid BL identifier.
pub fn is_identifier(name: &str) -> bool {
    identifier_regex().is_match(name)
        && !KEYWORDS.contains(&name)
        && Condition::from_source_name(name).is_none()
}

// ── Error type ──────────────────────────────────────────────────────

/// A structural problem found in a program.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub message: String,
    /// Where the problem is (e.g. ["INSTRUCTION FindObstacle", "[2]", "else"]).
    pub path: Vec<String>,
    /// Machine-readable error code.
    pub code: &'static str,
}

// ── Program validation ──────────────────────────────────────────────

/// Check the structural invariants of a program: identifiers are well
/// formed, no primitive is redefined, and every call names either a
/// primitive or an instruction in the table.
///
/// Returns an empty vec when the program is well formed.
pub fn validate_program(p: &Program) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !is_identifier(&p.name) {
        errors.push(ValidationError {
            message: format!("Program name \"{}\" is not a valid identifier", p.name),
            path: Vec::new(),
            code: "invalid-identifier",
        });
    }

    for (name, body) in &p.context {
        let mut path = vec![format!("INSTRUCTION {}", name)];
        if is_primitive(name) {
            errors.push(ValidationError {
                message: format!("Primitive instruction \"{}\" cannot be redefined", name),
                path: path.clone(),
                code: "primitive-redefinition",
            });
        } else if !is_identifier(name) {
            errors.push(ValidationError {
                message: format!("Instruction name \"{}\" is not a valid identifier", name),
                path: path.clone(),
                code: "invalid-identifier",
            });
        }
        walk_calls(body, p, &mut path, &mut errors);
    }

    let mut path = vec!["BEGIN".to_string()];
    walk_calls(&p.body, p, &mut path, &mut errors);
    errors
}

/// Recursive walk collecting calls that resolve to nothing.
fn walk_calls(
    s: &Statement,
    p: &Program,
    path: &mut Vec<String>,
    errors: &mut Vec<ValidationError>,
) {
    match s {
        Statement::Block(children) => {
            for (i, child) in children.iter().enumerate() {
                path.push(format!("[{}]", i));
                walk_calls(child, p, path, errors);
                path.pop();
            }
        }
        Statement::If { body, .. } | Statement::While { body, .. } => {
            path.push("body".to_string());
            walk_calls(body, p, path, errors);
            path.pop();
        }
        Statement::IfElse {
            then_branch,
            else_branch,
            ..
        } => {
            path.push("then".to_string());
            walk_calls(then_branch, p, path, errors);
            path.pop();
            path.push("else".to_string());
            walk_calls(else_branch, p, path, errors);
            path.pop();
        }
        Statement::Call(name) => {
            if is_primitive(name) || p.context.contains_key(name) {
                return;
            }
            let (message, code) = if is_identifier(name) {
                (
                    format!("Call to undefined instruction \"{}\"", name),
                    "undefined-instruction",
                )
            } else {
                (
                    format!("Call target \"{}\" is not a valid identifier", name),
                    "invalid-identifier",
                )
            };
            errors.push(ValidationError {
                message,
                path: path.clone(),
                code,
            });
        }
    }
}
