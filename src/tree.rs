use std::collections::BTreeMap;
use std::fmt;

use crate::error::RefactorError;

/// The five built-in instructions. They are never keys of a program's table.
pub const PRIMITIVE_INSTRUCTIONS: [&str; 5] = ["move", "turnleft", "turnright", "infect", "skip"];

/// Check whether `name` is one of the primitive instructions.
pub fn is_primitive(name: &str) -> bool {
    PRIMITIVE_INSTRUCTIONS.contains(&name)
}

/// A branch predicate. The eight members form four positive/negative pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    NextIsEmpty,
    NextIsNotEmpty,
    NextIsEnemy,
    NextIsNotEnemy,
    NextIsFriend,
    NextIsNotFriend,
    NextIsWall,
    NextIsNotWall,
}

impl Condition {
    pub const ALL: [Condition; 8] = [
        Condition::NextIsEmpty,
        Condition::NextIsNotEmpty,
        Condition::NextIsEnemy,
        Condition::NextIsNotEnemy,
        Condition::NextIsFriend,
        Condition::NextIsNotFriend,
        Condition::NextIsWall,
        Condition::NextIsNotWall,
    ];

    /// The enum-style name, e.g. `NEXT_IS_NOT_WALL`.
    pub fn name(self) -> &'static str {
        match self {
            Condition::NextIsEmpty => "NEXT_IS_EMPTY",
            Condition::NextIsNotEmpty => "NEXT_IS_NOT_EMPTY",
            Condition::NextIsEnemy => "NEXT_IS_ENEMY",
            Condition::NextIsNotEnemy => "NEXT_IS_NOT_ENEMY",
            Condition::NextIsFriend => "NEXT_IS_FRIEND",
            Condition::NextIsNotFriend => "NEXT_IS_NOT_FRIEND",
            Condition::NextIsWall => "NEXT_IS_WALL",
            Condition::NextIsNotWall => "NEXT_IS_NOT_WALL",
        }
    }

    /// The spelling used in BL source, e.g. `next-is-not-wall`.
    pub fn source_name(self) -> &'static str {
        match self {
            Condition::NextIsEmpty => "next-is-empty",
            Condition::NextIsNotEmpty => "next-is-not-empty",
            Condition::NextIsEnemy => "next-is-enemy",
            Condition::NextIsNotEnemy => "next-is-not-enemy",
            Condition::NextIsFriend => "next-is-friend",
            Condition::NextIsNotFriend => "next-is-not-friend",
            Condition::NextIsWall => "next-is-wall",
            Condition::NextIsNotWall => "next-is-not-wall",
        }
    }

    /// Look up a condition by its BL source spelling.
    pub fn from_source_name(s: &str) -> Option<Condition> {
        Condition::ALL.into_iter().find(|c| c.source_name() == s)
    }

    /// True for the `NOT` member of each pair.
    pub fn is_negative(self) -> bool {
        matches!(
            self,
            Condition::NextIsNotEmpty
                | Condition::NextIsNotEnemy
                | Condition::NextIsNotFriend
                | Condition::NextIsNotWall
        )
    }

    /// The other member of this condition's pair.
    pub fn dual(self) -> Condition {
        match self {
            Condition::NextIsEmpty => Condition::NextIsNotEmpty,
            Condition::NextIsNotEmpty => Condition::NextIsEmpty,
            Condition::NextIsEnemy => Condition::NextIsNotEnemy,
            Condition::NextIsNotEnemy => Condition::NextIsEnemy,
            Condition::NextIsFriend => Condition::NextIsNotFriend,
            Condition::NextIsNotFriend => Condition::NextIsFriend,
            Condition::NextIsWall => Condition::NextIsNotWall,
            Condition::NextIsNotWall => Condition::NextIsWall,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The tag of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Block,
    If,
    IfElse,
    While,
    Call,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Block => "BLOCK",
            Kind::If => "IF",
            Kind::IfElse => "IF_ELSE",
            Kind::While => "WHILE",
            Kind::Call => "CALL",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A node of the control-structure tree. Every child is owned by exactly
/// one parent, so the tree is acyclic even when the named-call graph is not.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Block(Vec<Statement>),
    If {
        condition: Condition,
        body: Box<Statement>,
    },
    IfElse {
        condition: Condition,
        then_branch: Box<Statement>,
        else_branch: Box<Statement>,
    },
    While {
        condition: Condition,
        body: Box<Statement>,
    },
    Call(String),
}

/// The empty BLOCK.
impl Default for Statement {
    fn default() -> Self {
        Statement::Block(Vec::new())
    }
}

/// A composite statement taken apart by [`Statement::decompose`].
///
/// `children` is in canonical order: all children for BLOCK, `[body]` for
/// IF and WHILE, `[then, else]` for IF_ELSE.
#[derive(Debug, Clone, PartialEq)]
pub struct Parts {
    pub kind: Kind,
    pub condition: Option<Condition>,
    pub children: Vec<Statement>,
}

impl Statement {
    pub fn block(children: Vec<Statement>) -> Self {
        Statement::Block(children)
    }

    pub fn if_then(condition: Condition, body: Statement) -> Self {
        Statement::If {
            condition,
            body: Box::new(body),
        }
    }

    pub fn if_else(condition: Condition, then_branch: Statement, else_branch: Statement) -> Self {
        Statement::IfElse {
            condition,
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }

    pub fn while_loop(condition: Condition, body: Statement) -> Self {
        Statement::While {
            condition,
            body: Box::new(body),
        }
    }

    pub fn call(name: impl Into<String>) -> Self {
        Statement::Call(name.into())
    }

    pub fn kind(&self) -> Kind {
        match self {
            Statement::Block(_) => Kind::Block,
            Statement::If { .. } => Kind::If,
            Statement::IfElse { .. } => Kind::IfElse,
            Statement::While { .. } => Kind::While,
            Statement::Call(_) => Kind::Call,
        }
    }

    /// The condition of an IF, IF_ELSE or WHILE.
    pub fn condition(&self) -> Option<Condition> {
        match self {
            Statement::If { condition, .. }
            | Statement::IfElse { condition, .. }
            | Statement::While { condition, .. } => Some(*condition),
            Statement::Block(_) | Statement::Call(_) => None,
        }
    }

    /// The instruction name of a CALL.
    pub fn call_name(&self) -> Option<&str> {
        match self {
            Statement::Call(name) => Some(name),
            _ => None,
        }
    }

    /// Take a composite statement apart, moving its children out and
    /// leaving `self` as the empty BLOCK.
    ///
    /// A CALL is a leaf and cannot be decomposed; it is left untouched.
    pub fn decompose(&mut self) -> Result<Parts, RefactorError> {
        let parts = match std::mem::take(self) {
            Statement::Block(children) => Parts {
                kind: Kind::Block,
                condition: None,
                children,
            },
            Statement::If { condition, body } => Parts {
                kind: Kind::If,
                condition: Some(condition),
                children: vec![*body],
            },
            Statement::IfElse {
                condition,
                then_branch,
                else_branch,
            } => Parts {
                kind: Kind::IfElse,
                condition: Some(condition),
                children: vec![*then_branch, *else_branch],
            },
            Statement::While { condition, body } => Parts {
                kind: Kind::While,
                condition: Some(condition),
                children: vec![*body],
            },
            Statement::Call(name) => {
                let err = RefactorError::DecomposeCall { name: name.clone() };
                *self = Statement::Call(name);
                return Err(err);
            }
        };
        Ok(parts)
    }

    /// Build a composite statement back from its parts, checking that the
    /// condition slot and the number of children fit the kind.
    pub fn reassemble(parts: Parts) -> Result<Statement, RefactorError> {
        let Parts {
            kind,
            condition,
            children,
        } = parts;

        let expected = match kind {
            Kind::Call => return Err(RefactorError::ReassembleCall),
            Kind::Block => None,
            Kind::If | Kind::While => Some(1),
            Kind::IfElse => Some(2),
        };
        if let Some(expected) = expected {
            if children.len() != expected {
                return Err(RefactorError::ArityMismatch {
                    kind,
                    expected,
                    found: children.len(),
                });
            }
        }

        let expects_condition = kind != Kind::Block;
        let condition = match (condition, expects_condition) {
            (None, false) => return Ok(Statement::Block(children)),
            (Some(c), true) => c,
            _ => {
                return Err(RefactorError::ConditionMismatch {
                    kind,
                    expects_condition,
                })
            }
        };

        let mut children = children.into_iter();
        let mut next = || children.next().unwrap_or_default();
        Ok(match kind {
            Kind::If => Statement::if_then(condition, next()),
            Kind::While => Statement::while_loop(condition, next()),
            _ => {
                let then_branch = next();
                let else_branch = next();
                Statement::if_else(condition, then_branch, else_branch)
            }
        })
    }
}

/// A BL program: a name, a table of user-defined instructions, and a body.
///
/// Named calls may form cycles through the table (A calls B calls A); the
/// statement trees themselves never do.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub name: String,
    /// Instruction name -> instruction body. Ordering carries no meaning.
    pub context: BTreeMap<String, Statement>,
    pub body: Statement,
}

impl Program {
    pub fn new(name: impl Into<String>) -> Self {
        Program {
            name: name.into(),
            context: BTreeMap::new(),
            body: Statement::default(),
        }
    }

    pub fn with_body(mut self, body: Statement) -> Self {
        self.body = body;
        self
    }

    /// Define a new instruction. Primitive names and names already in the
    /// table are rejected.
    pub fn add_instruction(
        &mut self,
        name: impl Into<String>,
        body: Statement,
    ) -> Result<(), RefactorError> {
        let name = name.into();
        if is_primitive(&name) {
            return Err(RefactorError::PrimitiveName { name });
        }
        if self.context.contains_key(&name) {
            return Err(RefactorError::DuplicateInstruction { name });
        }
        self.context.insert(name, body);
        Ok(())
    }

    pub fn instruction(&self, name: &str) -> Option<&Statement> {
        self.context.get(name)
    }
}
