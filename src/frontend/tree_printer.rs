use std::fmt;

use super::ast::{
    Command, CommandKind, Declaration, DeclarationKind, Expression, ExpressionKind, Identifier,
    Parameter, ParameterKind, Program, TypeDenoter, TypeDenoterKind,
};

const INDENT: &str = "  ";

/// Renders the tree one node per line, children indented below their parent.
pub fn print_tree(program: &Program) -> String {
    let mut printer = TreePrinter {
        out: String::new(),
        depth: 0,
    };
    printer.program(program);
    printer.out
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&print_tree(self))
    }
}

struct TreePrinter {
    out: String,
    depth: usize,
}

impl TreePrinter {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn nested(&mut self, text: &str, children: impl FnOnce(&mut Self)) {
        self.line(text);
        self.depth += 1;
        children(self);
        self.depth -= 1;
    }

    fn program(&mut self, program: &Program) {
        self.nested("Program", |p| p.command(&program.command));
    }

    fn command(&mut self, command: &Command) {
        match &command.kind {
            CommandKind::Blank => self.line("EmptyCommand"),
            CommandKind::NoElse => self.line("NoElse"),
            CommandKind::Assign(assign) => self.nested("AssignCommand", |p| {
                p.identifier(&assign.target);
                p.expression(&assign.expression);
            }),
            CommandKind::Call(call) => self.nested("CallCommand", |p| {
                p.identifier(&call.procedure);
                p.parameter(&call.parameter);
            }),
            CommandKind::Sequence(commands) => self.nested("SequentialCommand", |p| {
                for command in commands {
                    p.command(command);
                }
            }),
            CommandKind::If(if_command) => self.nested("IfCommand", |p| {
                p.expression(&if_command.condition);
                p.command(&if_command.then_branch);
                p.command(&if_command.else_branch);
            }),
            CommandKind::Let(let_command) => self.nested("LetCommand", |p| {
                p.declaration(&let_command.declaration);
                p.command(&let_command.body);
            }),
            CommandKind::While(while_command) => self.nested("WhileCommand", |p| {
                p.expression(&while_command.condition);
                p.command(&while_command.body);
            }),
            CommandKind::Repeat(repeat) => self.nested("RepeatCommand", |p| {
                p.command(&repeat.body);
                p.expression(&repeat.until);
            }),
        }
    }

    fn declaration(&mut self, declaration: &Declaration) {
        match &declaration.kind {
            DeclarationKind::Const(constant) => self.nested("ConstDeclaration", |p| {
                p.identifier(&constant.identifier);
                p.expression(&constant.expression);
            }),
            DeclarationKind::Var(variable) => self.nested("VarDeclaration", |p| {
                p.identifier(&variable.identifier);
                p.type_denoter(&variable.type_denoter);
            }),
            DeclarationKind::Type(alias) => self.nested("TypeDeclaration", |p| {
                p.identifier(&alias.identifier);
                p.type_denoter(&alias.type_denoter);
            }),
            DeclarationKind::Sequence(declarations) => {
                self.nested("SequentialDeclaration", |p| {
                    for declaration in declarations {
                        p.declaration(declaration);
                    }
                })
            }
        }
    }

    fn type_denoter(&mut self, type_denoter: &TypeDenoter) {
        match &type_denoter.kind {
            TypeDenoterKind::Named(identifier) => {
                self.nested("TypeDenoter", |p| p.identifier(identifier))
            }
        }
    }

    fn parameter(&mut self, parameter: &Parameter) {
        match &parameter.kind {
            ParameterKind::Blank => self.line("EmptyParameter"),
            ParameterKind::Value(expression) => {
                self.nested("ValueParameter", |p| p.expression(expression))
            }
            ParameterKind::Var(identifier) => {
                self.nested("VarParameter", |p| p.identifier(identifier))
            }
        }
    }

    fn expression(&mut self, expression: &Expression) {
        match &expression.kind {
            ExpressionKind::IntLiteral(spelling) => self.line(&format!("IntLiteral {}", spelling)),
            ExpressionKind::CharLiteral(graphic) => {
                self.line(&format!("CharLiteral '{}'", graphic))
            }
            ExpressionKind::Identifier(identifier) => self.identifier(identifier),
            ExpressionKind::Unary(unary) => {
                let text = format!("UnaryExpression {}", unary.operator.spelling);
                self.nested(&text, |p| p.expression(&unary.operand))
            }
            ExpressionKind::Binary(binary) => {
                let text = format!("BinaryExpression {}", binary.operator.spelling);
                self.nested(&text, |p| {
                    p.expression(&binary.left);
                    p.expression(&binary.right);
                })
            }
        }
    }

    fn identifier(&mut self, identifier: &Identifier) {
        self.line(&format!("Identifier {}", identifier.spelling));
    }
}
