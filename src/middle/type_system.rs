use std::collections::HashMap;

use log::trace;

use crate::{
    common::{error_reporter::ErrorReporter, position::Position},
    frontend::ast::{
        Binding, Command, CommandKind, Declaration, DeclarationKind, Expression, ExpressionKind,
        Identifier, NodeId, Operator, Parameter, ParameterKind, Program, TypeDenoter,
        TypeDenoterKind,
    },
};

use super::types::{BuiltinEntity, OperatorSignature, ParameterSpec, Type};

#[derive(Debug, Clone, PartialEq)]
pub struct TypeError {
    pub position: Position,
    pub message: String,
}

/// What a resolved identifier denotes once its declaration has been checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Constant(Type),
    Variable(Type),
    Type(Type),
    Procedure(ParameterSpec),
}

/// Checks types bottom-up and annotates every expression with its type.
///
/// Checking never stops at the first error. An expression whose type could
/// not be established is typed `Type::Error` (or left `None` when its name
/// never resolved) and is accepted wherever it appears, so one mistake
/// produces one diagnostic.
#[derive(Debug)]
pub struct TypeChecker {
    // entities of checked declarations, by declaration node
    entities: HashMap<NodeId, Entity>,

    errors: Vec<TypeError>,
}

impl TypeChecker {
    pub fn new() -> Self {
        Self {
            entities: HashMap::new(),
            errors: vec![],
        }
    }

    pub fn check(&mut self, program: &mut Program, reporter: &mut ErrorReporter) {
        self.check_command(&mut program.command);

        for error in self.errors.drain(..) {
            reporter.report(error.position, error.message);
        }
    }

    fn error(&mut self, position: Position, message: String) {
        self.errors.push(TypeError { position, message });
    }

    fn entity_of(&self, identifier: &Identifier) -> Option<Entity> {
        match identifier.declaration? {
            Binding::Declaration(id) => self.entities.get(&id).copied(),
            Binding::Builtin(builtin) => match builtin.entity() {
                BuiltinEntity::Type(ty) => Some(Entity::Type(ty)),
                BuiltinEntity::Constant(ty) => Some(Entity::Constant(ty)),
                BuiltinEntity::Procedure(spec) => Some(Entity::Procedure(spec)),
                BuiltinEntity::Operator(_) => None,
            },
        }
    }

    // reports `found` unless it fits `expected`
    fn expect_type(&mut self, expected: Type, found: Option<Type>, position: Position) {
        if let Some(found) = found {
            if !expected.accepts(found) {
                self.error(
                    position,
                    format!("Type mismatch: expected {} but found {}", expected, found),
                );
            }
        }
    }

    fn check_condition(&mut self, condition: &mut Expression) {
        if let Some(ty) = self.infer_expression(condition) {
            if !Type::Boolean.accepts(ty) {
                self.error(
                    condition.position,
                    format!("Condition must be boolean but found {}", ty),
                );
            }
        }
    }

    fn check_command(&mut self, command: &mut Command) {
        match &mut command.kind {
            CommandKind::Blank | CommandKind::NoElse => {}
            CommandKind::Assign(assign) => {
                let target = match self.entity_of(&assign.target) {
                    Some(Entity::Variable(ty)) => Some(ty),
                    Some(Entity::Constant(_)) => {
                        self.error(
                            assign.target.position,
                            format!("Cannot assign to constant '{}'", assign.target.spelling),
                        );
                        None
                    }
                    Some(_) => {
                        self.error(
                            assign.target.position,
                            format!("'{}' is not a variable", assign.target.spelling),
                        );
                        None
                    }
                    None => None,
                };

                let ty = self.infer_expression(&mut assign.expression);
                if let Some(target) = target {
                    self.expect_type(target, ty, assign.expression.position);
                }
            }
            CommandKind::Call(call) => {
                let spec = match self.entity_of(&call.procedure) {
                    Some(Entity::Procedure(spec)) => Some(spec),
                    Some(_) => {
                        self.error(
                            call.procedure.position,
                            format!("'{}' is not a procedure", call.procedure.spelling),
                        );
                        None
                    }
                    None => None,
                };

                self.check_parameter(&call.procedure.spelling, spec, &mut call.parameter);
            }
            CommandKind::Sequence(commands) => {
                for command in commands {
                    self.check_command(command);
                }
            }
            CommandKind::If(if_command) => {
                self.check_condition(&mut if_command.condition);
                self.check_command(&mut if_command.then_branch);
                self.check_command(&mut if_command.else_branch);
            }
            CommandKind::Let(let_command) => {
                self.check_declaration(&mut let_command.declaration);
                self.check_command(&mut let_command.body);
            }
            CommandKind::While(while_command) => {
                self.check_condition(&mut while_command.condition);
                self.check_command(&mut while_command.body);
            }
            CommandKind::Repeat(repeat) => {
                self.check_command(&mut repeat.body);
                self.check_condition(&mut repeat.until);
            }
        }
    }

    // `spec` is `None` when the callee is not a known procedure; the
    // parameter is still checked on its own then
    fn check_parameter(
        &mut self,
        procedure: &str,
        spec: Option<ParameterSpec>,
        parameter: &mut Parameter,
    ) {
        let position = parameter.position;

        match &mut parameter.kind {
            ParameterKind::Blank => match spec {
                Some(ParameterSpec::Value(_) | ParameterSpec::Var(_)) => {
                    self.error(position, format!("'{}' expects a parameter", procedure));
                }
                Some(ParameterSpec::None) | None => {}
            },
            ParameterKind::Value(expression) => {
                let ty = self.infer_expression(expression);
                match spec {
                    Some(ParameterSpec::Value(expected)) => {
                        self.expect_type(expected, ty, position)
                    }
                    Some(ParameterSpec::Var(_)) => {
                        self.error(position, format!("'{}' expects a var parameter", procedure));
                    }
                    Some(ParameterSpec::None) => {
                        self.error(position, format!("'{}' expects no parameter", procedure));
                    }
                    None => {}
                }
            }
            ParameterKind::Var(identifier) => {
                let ty = match self.entity_of(identifier) {
                    Some(Entity::Variable(ty)) => Some(ty),
                    Some(_) => {
                        self.error(
                            identifier.position,
                            format!("'{}' is not a variable", identifier.spelling),
                        );
                        Some(Type::Error)
                    }
                    None => None,
                };

                match spec {
                    Some(ParameterSpec::Var(expected)) => self.expect_type(expected, ty, position),
                    Some(ParameterSpec::Value(_)) => {
                        self.error(
                            position,
                            format!("'{}' expects a value parameter", procedure),
                        );
                    }
                    Some(ParameterSpec::None) => {
                        self.error(position, format!("'{}' expects no parameter", procedure));
                    }
                    None => {}
                }
            }
        }
    }

    fn check_declaration(&mut self, declaration: &mut Declaration) {
        let entity = match &mut declaration.kind {
            DeclarationKind::Const(constant) => {
                let ty = self.infer_expression(&mut constant.expression);
                Entity::Constant(ty.unwrap_or(Type::Error))
            }
            DeclarationKind::Var(variable) => {
                Entity::Variable(self.denoted_type(&variable.type_denoter))
            }
            DeclarationKind::Type(alias) => Entity::Type(self.denoted_type(&alias.type_denoter)),
            DeclarationKind::Sequence(declarations) => {
                for declaration in declarations {
                    self.check_declaration(declaration);
                }
                return;
            }
        };

        trace!("{:?} is {:?}", declaration.id, entity);
        self.entities.insert(declaration.id, entity);
    }

    fn denoted_type(&mut self, type_denoter: &TypeDenoter) -> Type {
        match &type_denoter.kind {
            TypeDenoterKind::Named(identifier) => match self.entity_of(identifier) {
                Some(Entity::Type(ty)) => ty,
                Some(_) => {
                    self.error(
                        identifier.position,
                        format!("'{}' is not a type", identifier.spelling),
                    );
                    Type::Error
                }
                None => Type::Error,
            },
        }
    }

    pub fn infer_expression(&mut self, expression: &mut Expression) -> Option<Type> {
        let ty = match &mut expression.kind {
            ExpressionKind::IntLiteral(_) => Some(Type::Integer),
            ExpressionKind::CharLiteral(_) => Some(Type::Char),
            ExpressionKind::Identifier(identifier) => match self.entity_of(identifier) {
                Some(Entity::Constant(ty) | Entity::Variable(ty)) => Some(ty),
                Some(Entity::Type(_) | Entity::Procedure(_)) => {
                    self.error(
                        identifier.position,
                        format!("'{}' is not a value", identifier.spelling),
                    );
                    Some(Type::Error)
                }
                None => None,
            },
            ExpressionKind::Unary(unary) => {
                let operand = self.infer_expression(&mut unary.operand);
                self.apply_unary(&unary.operator, operand)
            }
            ExpressionKind::Binary(binary) => {
                let left = self.infer_expression(&mut binary.left);
                let right = self.infer_expression(&mut binary.right);
                self.apply_binary(&binary.operator, left, right)
            }
        };

        expression.ty = ty;
        ty
    }

    fn signature(operator: &Operator) -> Option<OperatorSignature> {
        match operator.declaration?.entity() {
            BuiltinEntity::Operator(signature) => Some(signature),
            _ => None,
        }
    }

    fn apply_unary(&mut self, operator: &Operator, operand: Option<Type>) -> Option<Type> {
        let Some(OperatorSignature::Unary {
            operand: expected,
            result,
        }) = Self::signature(operator)
        else {
            return None;
        };

        match operand {
            Some(ty) if !expected.accepts(ty) => {
                self.error(
                    operator.position,
                    format!(
                        "Operator '{}' cannot be applied to {}",
                        operator.spelling, ty
                    ),
                );
                Some(Type::Error)
            }
            _ => Some(result),
        }
    }

    fn apply_binary(
        &mut self,
        operator: &Operator,
        left: Option<Type>,
        right: Option<Type>,
    ) -> Option<Type> {
        let signature = Self::signature(operator)?;

        let (fits, result) = match signature {
            OperatorSignature::Binary {
                left: expected_left,
                right: expected_right,
                result,
            } => {
                let fits =
                    |ty: Option<Type>, expected: Type| ty.is_none_or(|t| expected.accepts(t));
                (fits(left, expected_left) && fits(right, expected_right), result)
            }
            OperatorSignature::Equality => {
                let fits = match (left, right) {
                    (Some(l), Some(r)) => l.accepts(r),
                    _ => true,
                };
                (fits, Type::Boolean)
            }
            OperatorSignature::Unary { .. } => return None,
        };

        // an operand that already failed is not reported again
        let known = |ty: Option<Type>| ty.filter(|t| *t != Type::Error);
        match (fits, known(left), known(right)) {
            (false, Some(l), Some(r)) => {
                self.error(
                    operator.position,
                    format!(
                        "Operator '{}' cannot be applied to {} and {}",
                        operator.spelling, l, r
                    ),
                );
                Some(Type::Error)
            }
            (false, _, _) => Some(Type::Error),
            (true, _, _) => Some(result),
        }
    }
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}
