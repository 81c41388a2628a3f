use crate::{common::builtins::Builtin, common::position::Position, middle::types::Type};

#[derive(Debug)]
pub struct NodeIdGenerator {
    next_id: usize,
}

impl NodeIdGenerator {
    pub fn new() -> Self {
        Self { next_id: 0 }
    }

    pub fn next(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        NodeId(id)
    }
}

impl Default for NodeIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a declaration node. Passes index their own tables by it
/// instead of holding references into the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// What an identifier or operator use resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Declaration(NodeId),
    Builtin(Builtin),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub spelling: String,
    pub position: Position,
    pub declaration: Option<Binding>, // filled in by identification
}

impl Identifier {
    pub fn new(spelling: impl Into<String>, position: Position) -> Self {
        Self {
            spelling: spelling.into(),
            position,
            declaration: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    pub spelling: String,
    pub position: Position,
    pub declaration: Option<Builtin>,
}

impl Operator {
    pub fn new(spelling: impl Into<String>, position: Position) -> Self {
        Self {
            spelling: spelling.into(),
            position,
            declaration: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub command: Command,
    pub position: Position,
}

///
/// Commands
///

#[derive(Debug, Clone, PartialEq)]
pub enum CommandKind {
    Blank,
    Assign(AssignCommand),
    Call(CallCommand),
    Sequence(Vec<Command>),
    If(IfCommand),
    // stands in for the missing branch of an if without `else`
    NoElse,
    Let(LetCommand),
    While(WhileCommand),
    Repeat(RepeatCommand),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub kind: CommandKind,
    pub position: Position,
}

impl Command {
    pub fn new(kind: CommandKind, position: Position) -> Self {
        Self { kind, position }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignCommand {
    pub target: Identifier,
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallCommand {
    pub procedure: Identifier,
    pub parameter: Parameter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfCommand {
    pub condition: Expression,
    pub then_branch: Box<Command>,
    pub else_branch: Box<Command>, // CommandKind::NoElse when absent
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetCommand {
    pub declaration: Declaration,
    pub body: Box<Command>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileCommand {
    pub condition: Expression,
    pub body: Box<Command>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepeatCommand {
    pub body: Box<Command>,
    pub until: Expression,
}

///
/// Expressions
///

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    IntLiteral(String),
    CharLiteral(char),
    Identifier(Identifier),
    Unary(UnaryExpression),
    Binary(BinaryExpression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    pub operator: Operator,
    pub operand: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub left: Box<Expression>,
    pub operator: Operator,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub position: Position,
    pub ty: Option<Type>, // filled in by type checking
}

impl Expression {
    pub fn new(kind: ExpressionKind, position: Position) -> Self {
        Self {
            kind,
            position,
            ty: None,
        }
    }
}

///
/// Declarations
///

#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationKind {
    Const(ConstDeclaration),
    Var(VarDeclaration),
    Type(TypeDeclaration),
    Sequence(Vec<Declaration>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub id: NodeId,
    pub kind: DeclarationKind,
    pub position: Position,
}

impl Declaration {
    /// The name this declaration introduces, `None` for a sequence.
    pub fn identifier(&self) -> Option<&Identifier> {
        match &self.kind {
            DeclarationKind::Const(declaration) => Some(&declaration.identifier),
            DeclarationKind::Var(declaration) => Some(&declaration.identifier),
            DeclarationKind::Type(declaration) => Some(&declaration.identifier),
            DeclarationKind::Sequence(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstDeclaration {
    pub identifier: Identifier,
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclaration {
    pub identifier: Identifier,
    pub type_denoter: TypeDenoter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDeclaration {
    pub identifier: Identifier,
    pub type_denoter: TypeDenoter,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDenoterKind {
    Named(Identifier),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDenoter {
    pub kind: TypeDenoterKind,
    pub position: Position,
}

///
/// Parameters
///

#[derive(Debug, Clone, PartialEq)]
pub enum ParameterKind {
    Blank,
    Value(Expression),
    Var(Identifier),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub kind: ParameterKind,
    pub position: Position,
}
