use crate::tree::{is_primitive, Program, Statement};

/// Count the CALL leaves in `s` whose instruction name satisfies `matches`.
pub fn count_calls<F>(s: &Statement, matches: &F) -> usize
where
    F: Fn(&str) -> bool,
{
    match s {
        Statement::Block(children) => children.iter().map(|c| count_calls(c, matches)).sum(),
        Statement::If { body, .. } | Statement::While { body, .. } => count_calls(body, matches),
        Statement::IfElse {
            then_branch,
            else_branch,
            ..
        } => count_calls(then_branch, matches) + count_calls(else_branch, matches),
        Statement::Call(name) => usize::from(matches(name)),
    }
}

/// Number of calls to primitive instructions (move, turnleft, turnright,
/// infect, skip) in `s`.
pub fn count_of_primitive_calls(s: &Statement) -> usize {
    count_calls(s, &is_primitive)
}

/// Number of calls to `instruction` in `s`.
pub fn count_of_instruction_calls(s: &Statement, instruction: &str) -> usize {
    count_calls(s, &|name: &str| name == instruction)
}

/// Count matching calls across the program body and every instruction body.
pub fn count_program_calls<F>(p: &Program, matches: &F) -> usize
where
    F: Fn(&str) -> bool,
{
    let in_context: usize = p.context.values().map(|b| count_calls(b, matches)).sum();
    in_context + count_calls(&p.body, matches)
}

pub fn count_of_primitive_calls_in_program(p: &Program) -> usize {
    count_program_calls(p, &is_primitive)
}

pub fn count_of_instruction_calls_in_program(p: &Program, instruction: &str) -> usize {
    count_program_calls(p, &|name: &str| name == instruction)
}
