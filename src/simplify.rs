use tracing::trace;

use crate::tree::{Program, Statement};

/// Replace every IF_ELSE whose condition is negated (NEXT_IS_NOT_*) with
/// the positive condition and the two branches swapped. Nested statements
/// are simplified too. IF and WHILE conditions are never touched.
pub fn simplify_if_else(s: &mut Statement) {
    match s {
        Statement::Block(children) => {
            for child in children.iter_mut() {
                simplify_if_else(child);
            }
        }
        Statement::If { body, .. } | Statement::While { body, .. } => simplify_if_else(body),
        Statement::IfElse {
            condition,
            then_branch,
            else_branch,
        } => {
            if condition.is_negative() {
                trace!(from = %condition, to = %condition.dual(), "flipped IF_ELSE");
                *condition = condition.dual();
                std::mem::swap(then_branch, else_branch);
            }
            simplify_if_else(then_branch);
            simplify_if_else(else_branch);
        }
        Statement::Call(_) => {}
    }
}

/// Apply [`simplify_if_else`] to the program body and every instruction body.
pub fn simplify_program(p: &mut Program) {
    for body in p.context.values_mut() {
        simplify_if_else(body);
    }
    simplify_if_else(&mut p.body);
}
