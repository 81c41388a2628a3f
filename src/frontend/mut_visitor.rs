use super::ast::{
    AssignCommand, BinaryExpression, CallCommand, Command, CommandKind, ConstDeclaration,
    Declaration, DeclarationKind, Expression, ExpressionKind, Identifier, IfCommand, LetCommand,
    Parameter, ParameterKind, Program, RepeatCommand, TypeDeclaration, TypeDenoter,
    TypeDenoterKind, UnaryExpression, VarDeclaration, WhileCommand,
};

/// Depth-first walk over the tree in lexical order.
///
/// `visit_identifier` sees applied occurrences only: the names introduced
/// by declarations are reached through `visit_declaration`.
pub trait MutVisitor: Sized {
    fn visit_program(&mut self, program: &mut Program) {
        walk_program(self, program);
    }

    fn visit_command(&mut self, command: &mut Command) {
        walk_command(self, command);
    }

    fn visit_assignment(&mut self, assignment: &mut AssignCommand) {
        walk_assignment(self, assignment);
    }

    fn visit_call(&mut self, call: &mut CallCommand) {
        walk_call(self, call);
    }

    fn visit_if(&mut self, if_command: &mut IfCommand) {
        walk_if(self, if_command);
    }

    fn visit_let(&mut self, let_command: &mut LetCommand) {
        walk_let(self, let_command);
    }

    fn visit_while(&mut self, while_command: &mut WhileCommand) {
        walk_while(self, while_command);
    }

    fn visit_repeat(&mut self, repeat: &mut RepeatCommand) {
        walk_repeat(self, repeat);
    }

    fn visit_declaration(&mut self, declaration: &mut Declaration) {
        walk_declaration(self, declaration);
    }

    fn visit_type_denoter(&mut self, type_denoter: &mut TypeDenoter) {
        walk_type_denoter(self, type_denoter);
    }

    fn visit_parameter(&mut self, parameter: &mut Parameter) {
        walk_parameter(self, parameter);
    }

    fn visit_expression(&mut self, expression: &mut Expression) {
        walk_expression(self, expression);
    }

    fn visit_unary(&mut self, unary: &mut UnaryExpression) {
        walk_unary(self, unary);
    }

    fn visit_binary(&mut self, binary: &mut BinaryExpression) {
        walk_binary(self, binary);
    }

    fn visit_identifier(&mut self, _identifier: &mut Identifier) {}
}

pub fn walk_program<T: MutVisitor>(vis: &mut T, Program { command, position: _ }: &mut Program) {
    vis.visit_command(command);
}

pub fn walk_command<T: MutVisitor>(vis: &mut T, Command { kind, position: _ }: &mut Command) {
    match kind {
        CommandKind::Blank | CommandKind::NoElse => {}
        CommandKind::Assign(assignment) => vis.visit_assignment(assignment),
        CommandKind::Call(call) => vis.visit_call(call),
        CommandKind::Sequence(commands) => {
            for command in commands {
                vis.visit_command(command);
            }
        }
        CommandKind::If(if_command) => vis.visit_if(if_command),
        CommandKind::Let(let_command) => vis.visit_let(let_command),
        CommandKind::While(while_command) => vis.visit_while(while_command),
        CommandKind::Repeat(repeat) => vis.visit_repeat(repeat),
    }
}

pub fn walk_assignment<T: MutVisitor>(
    vis: &mut T,
    AssignCommand { target, expression }: &mut AssignCommand,
) {
    vis.visit_identifier(target);
    vis.visit_expression(expression);
}

pub fn walk_call<T: MutVisitor>(
    vis: &mut T,
    CallCommand {
        procedure,
        parameter,
    }: &mut CallCommand,
) {
    vis.visit_identifier(procedure);
    vis.visit_parameter(parameter);
}

pub fn walk_if<T: MutVisitor>(
    vis: &mut T,
    IfCommand {
        condition,
        then_branch,
        else_branch,
    }: &mut IfCommand,
) {
    vis.visit_expression(condition);
    vis.visit_command(then_branch);
    vis.visit_command(else_branch);
}

pub fn walk_let<T: MutVisitor>(vis: &mut T, LetCommand { declaration, body }: &mut LetCommand) {
    vis.visit_declaration(declaration);
    vis.visit_command(body);
}

pub fn walk_while<T: MutVisitor>(
    vis: &mut T,
    WhileCommand { condition, body }: &mut WhileCommand,
) {
    vis.visit_expression(condition);
    vis.visit_command(body);
}

pub fn walk_repeat<T: MutVisitor>(vis: &mut T, RepeatCommand { body, until }: &mut RepeatCommand) {
    vis.visit_command(body);
    vis.visit_expression(until);
}

pub fn walk_declaration<T: MutVisitor>(
    vis: &mut T,
    Declaration {
        id: _,
        kind,
        position: _,
    }: &mut Declaration,
) {
    match kind {
        DeclarationKind::Const(ConstDeclaration {
            identifier: _,
            expression,
        }) => vis.visit_expression(expression),
        DeclarationKind::Var(VarDeclaration {
            identifier: _,
            type_denoter,
        }) => vis.visit_type_denoter(type_denoter),
        DeclarationKind::Type(TypeDeclaration {
            identifier: _,
            type_denoter,
        }) => vis.visit_type_denoter(type_denoter),
        DeclarationKind::Sequence(declarations) => {
            for declaration in declarations {
                vis.visit_declaration(declaration);
            }
        }
    }
}

pub fn walk_type_denoter<T: MutVisitor>(
    vis: &mut T,
    TypeDenoter { kind, position: _ }: &mut TypeDenoter,
) {
    match kind {
        TypeDenoterKind::Named(identifier) => vis.visit_identifier(identifier),
    }
}

pub fn walk_parameter<T: MutVisitor>(vis: &mut T, Parameter { kind, position: _ }: &mut Parameter) {
    match kind {
        ParameterKind::Blank => {}
        ParameterKind::Value(expression) => vis.visit_expression(expression),
        ParameterKind::Var(identifier) => vis.visit_identifier(identifier),
    }
}

pub fn walk_expression<T: MutVisitor>(
    vis: &mut T,
    Expression {
        kind,
        position: _,
        ty: _,
    }: &mut Expression,
) {
    match kind {
        ExpressionKind::IntLiteral(_) | ExpressionKind::CharLiteral(_) => {}
        ExpressionKind::Identifier(identifier) => vis.visit_identifier(identifier),
        ExpressionKind::Unary(unary) => vis.visit_unary(unary),
        ExpressionKind::Binary(binary) => vis.visit_binary(binary),
    }
}

pub fn walk_unary<T: MutVisitor>(
    vis: &mut T,
    UnaryExpression {
        operator: _,
        operand,
    }: &mut UnaryExpression,
) {
    vis.visit_expression(operand);
}

pub fn walk_binary<T: MutVisitor>(
    vis: &mut T,
    BinaryExpression {
        left,
        operator: _,
        right,
    }: &mut BinaryExpression,
) {
    vis.visit_expression(left);
    vis.visit_expression(right);
}
