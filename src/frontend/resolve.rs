use std::collections::HashMap;

use log::trace;

use crate::common::{
    builtins::{Builtin, STANDARD_IDENTIFIERS},
    error_reporter::ErrorReporter,
    position::Position,
};

use super::{
    ast::{
        BinaryExpression, Binding, Declaration, Identifier, LetCommand, Program, UnaryExpression,
    },
    mut_visitor::{MutVisitor, walk_declaration, walk_let, walk_program, walk_unary},
};

#[derive(Debug, Default)]
pub struct Scope {
    names: HashMap<String, Binding>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` and keeps the older binding when `name` is taken.
    pub fn register(&mut self, name: &str, binding: Binding) -> bool {
        if self.names.contains_key(name) {
            return false;
        }
        trace!("Declared `{}` -> {:?}", name, binding);
        self.names.insert(name.into(), binding);
        true
    }

    pub fn lookup(&self, name: &str) -> Option<Binding> {
        self.names.get(name).copied()
    }
}

/// Links every applied identifier to the declaration it refers to.
#[derive(Debug)]
pub struct NameResolver {
    scope_stack: Vec<Scope>,
    errors: Vec<(Position, String)>,
}

impl NameResolver {
    pub fn new() -> Self {
        let mut global = Scope::new();
        for (name, builtin) in STANDARD_IDENTIFIERS {
            global.register(name, Binding::Builtin(*builtin));
        }

        Self {
            scope_stack: vec![global],
            errors: vec![],
        }
    }

    pub fn resolve(&mut self, program: &mut Program, reporter: &mut ErrorReporter) {
        walk_program(self, program);

        for (position, message) in self.errors.drain(..) {
            reporter.report(position, message);
        }
    }

    fn report(&mut self, position: Position, message: String) {
        self.errors.push((position, message));
    }

    fn push_scope(&mut self) {
        self.scope_stack.push(Scope::new());
    }

    fn pop_scope(&mut self) {
        self.scope_stack.pop();
    }

    fn declare(&mut self, identifier: &Identifier, binding: Binding) {
        let Some(scope) = self.scope_stack.last_mut() else {
            return;
        };

        if !scope.register(&identifier.spelling, binding) {
            self.report(
                identifier.position,
                format!(
                    "Identifier '{}' is already declared in this scope",
                    identifier.spelling
                ),
            );
        }
    }

    fn lookup(&self, name: &str) -> Option<Binding> {
        self.scope_stack
            .iter()
            .rev()
            .find_map(|scope| scope.lookup(name))
    }
}

impl Default for NameResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MutVisitor for NameResolver {
    fn visit_let(&mut self, let_command: &mut LetCommand) {
        self.push_scope();
        walk_let(self, let_command);
        self.pop_scope();
    }

    fn visit_declaration(&mut self, declaration: &mut Declaration) {
        // the initializer must not see the name it initializes
        walk_declaration(self, declaration);

        if let Some(identifier) = declaration.identifier() {
            self.declare(identifier, Binding::Declaration(declaration.id));
        }
    }

    fn visit_identifier(&mut self, identifier: &mut Identifier) {
        match self.lookup(&identifier.spelling) {
            Some(binding) => {
                trace!(
                    "Resolved `{}` at {} -> {:?}",
                    identifier.spelling, identifier.position, binding
                );
                identifier.declaration = Some(binding);
            }
            None => self.report(
                identifier.position,
                format!("Undeclared identifier '{}'", identifier.spelling),
            ),
        }
    }

    fn visit_unary(&mut self, unary: &mut UnaryExpression) {
        let operator = &mut unary.operator;
        operator.declaration = Builtin::unary_operator(&operator.spelling);
        if operator.declaration.is_none() {
            let message = format!("Undeclared operator '{}'", operator.spelling);
            self.report(operator.position, message);
        }
        walk_unary(self, unary);
    }

    fn visit_binary(&mut self, binary: &mut BinaryExpression) {
        // left operand first to keep diagnostics in source order
        self.visit_expression(&mut binary.left);

        let operator = &mut binary.operator;
        operator.declaration = Builtin::binary_operator(&operator.spelling);
        if operator.declaration.is_none() {
            let message = format!("Undeclared operator '{}'", operator.spelling);
            self.report(operator.position, message);
        }

        self.visit_expression(&mut binary.right);
    }
}
