use tracing::{debug, trace};

use crate::error::RefactorError;
use crate::tree::{is_primitive, Program, Statement};
use crate::validate::is_identifier;

/// Rename every call to `old_name` in `s` to `new_name`. Everything else is
/// left as it was.
pub fn rename_instruction(s: &mut Statement, old_name: &str, new_name: &str) {
    match s {
        Statement::Block(children) => {
            for child in children.iter_mut() {
                rename_instruction(child, old_name, new_name);
            }
        }
        Statement::If { body, .. } | Statement::While { body, .. } => {
            rename_instruction(body, old_name, new_name)
        }
        Statement::IfElse {
            then_branch,
            else_branch,
            ..
        } => {
            rename_instruction(then_branch, old_name, new_name);
            rename_instruction(else_branch, old_name, new_name);
        }
        Statement::Call(name) => {
            if name == old_name {
                trace!(old = old_name, new = new_name, "renamed call site");
                *name = new_name.to_string();
            }
        }
    }
}

/// Rename the user-defined instruction `old_name` to `new_name`, together
/// with every call to it in the other instruction bodies and in the program
/// body. The renamed definition's own body is moved as is, so a self-call
/// inside it still names `old_name`.
///
/// Preconditions are checked up front; on error `p` is unchanged.
pub fn rename_program_instruction(
    p: &mut Program,
    old_name: &str,
    new_name: &str,
) -> Result<(), RefactorError> {
    if !p.context.contains_key(old_name) {
        return Err(RefactorError::unknown_instruction(old_name));
    }
    if !is_identifier(new_name) {
        return Err(RefactorError::invalid_identifier(new_name));
    }
    if is_primitive(new_name) {
        return Err(RefactorError::primitive_name(new_name));
    }
    if p.context.contains_key(new_name) {
        return Err(RefactorError::name_collision(new_name));
    }

    let context = std::mem::take(&mut p.context);
    p.context = context
        .into_iter()
        .map(|(name, mut body)| {
            // The moved definition keeps its body as written.
            if name == old_name {
                debug!(old = old_name, new = new_name, "re-keyed instruction");
                (new_name.to_string(), body)
            } else {
                rename_instruction(&mut body, old_name, new_name);
                (name, body)
            }
        })
        .collect();

    rename_instruction(&mut p.body, old_name, new_name);
    Ok(())
}
