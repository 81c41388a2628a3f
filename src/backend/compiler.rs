use std::collections::HashMap;

use log::debug;

use crate::{
    common::{builtins::Builtin, error_reporter::ErrorReporter, position::Position},
    frontend::ast::{
        Binding, Command, CommandKind, Declaration, DeclarationKind, Expression, ExpressionKind,
        Identifier, NodeId, Operator, Parameter, ParameterKind, Program,
    },
};

use super::instruction::{
    Address, CODE_STORE_SIZE, Instruction, MAX_INT, OpCode, Primitive, TargetCode,
};

/// Lowers a checked program to TAM code.
///
/// Variables and constants live on the stack at fixed SB offsets handed out
/// in declaration order. Forward jumps are emitted with a placeholder target
/// and patched once the target address is known.
#[derive(Debug)]
pub struct CodeGenerator {
    code: Vec<Instruction>,

    // stack slot of every declared variable or constant
    offsets: HashMap<NodeId, i32>,
    next_offset: i32,

    errors: Vec<(Position, String)>,
    overflowed: bool,
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self {
            code: vec![],
            offsets: HashMap::new(),
            next_offset: 0,
            errors: vec![],
            overflowed: false,
        }
    }

    pub fn generate(mut self, program: &Program, reporter: &mut ErrorReporter) -> TargetCode {
        self.compile_command(&program.command);
        self.emit(OpCode::Halt);

        for (position, message) in self.errors.drain(..) {
            reporter.report(position, message);
        }

        TargetCode::new(self.code)
    }

    // address the next emitted instruction will get
    fn next_address(&self) -> usize {
        self.code.len()
    }

    fn emit(&mut self, op: OpCode) -> usize {
        let address = self.next_address();
        if address >= CODE_STORE_SIZE {
            if !self.overflowed {
                self.overflowed = true;
                self.errors.push((
                    Position::internal(),
                    "Program is too large for the code store".into(),
                ));
            }
            return address;
        }

        let instruction = Instruction::new(op);
        debug!("{}: {}", address, instruction);
        self.code.push(instruction);
        address
    }

    fn patch(&mut self, address: usize, new_target: usize) {
        if let Some(instruction) = self.code.get_mut(address) {
            match &mut instruction.op {
                OpCode::Jump { target } | OpCode::JumpIf { target, .. } => *target = new_target,
                _ => {}
            }
        }
    }

    fn compile_command(&mut self, command: &Command) {
        match &command.kind {
            CommandKind::Blank | CommandKind::NoElse => {}
            CommandKind::Assign(assign) => {
                self.compile_expression(&assign.expression);
                match self.address_of(&assign.target) {
                    Some(address) => {
                        self.emit(OpCode::Store { size: 1, address });
                    }
                    None => self.cannot_lower(assign.target.position, &assign.target.spelling),
                }
            }
            CommandKind::Call(call) => {
                self.compile_parameter(&call.parameter);
                let primitive = match call.procedure.declaration {
                    Some(Binding::Builtin(builtin)) => Primitive::for_builtin(builtin),
                    _ => None,
                };
                match primitive {
                    Some(primitive) => {
                        self.emit(OpCode::CallPrimitive { primitive });
                    }
                    None => self.cannot_lower(call.procedure.position, &call.procedure.spelling),
                }
            }
            CommandKind::Sequence(commands) => {
                for command in commands {
                    self.compile_command(command);
                }
            }
            CommandKind::If(if_command) => {
                self.compile_expression(&if_command.condition);
                let jump_to_else = self.emit(OpCode::JumpIf {
                    value: 0,
                    target: 0,
                });

                self.compile_command(&if_command.then_branch);
                let jump_to_end = self.emit(OpCode::Jump { target: 0 });

                let else_address = self.next_address();
                self.patch(jump_to_else, else_address);
                self.compile_command(&if_command.else_branch);

                let end_address = self.next_address();
                self.patch(jump_to_end, end_address);
            }
            CommandKind::Let(let_command) => {
                let saved_offset = self.next_offset;
                let words = self.compile_declaration(&let_command.declaration);

                self.compile_command(&let_command.body);

                if words > 0 {
                    self.emit(OpCode::Pop {
                        keep: 0,
                        discard: words,
                    });
                }
                self.next_offset = saved_offset;
            }
            CommandKind::While(while_command) => {
                let jump_to_condition = self.emit(OpCode::Jump { target: 0 });

                let body_address = self.next_address();
                self.compile_command(&while_command.body);

                let condition_address = self.next_address();
                self.patch(jump_to_condition, condition_address);
                self.compile_expression(&while_command.condition);
                self.emit(OpCode::JumpIf {
                    value: 1,
                    target: body_address,
                });
            }
            CommandKind::Repeat(repeat) => {
                let body_address = self.next_address();
                self.compile_command(&repeat.body);
                self.compile_expression(&repeat.until);
                self.emit(OpCode::JumpIf {
                    value: 0,
                    target: body_address,
                });
            }
        }
    }

    // returns the number of stack words the declaration occupies
    fn compile_declaration(&mut self, declaration: &Declaration) -> i32 {
        match &declaration.kind {
            DeclarationKind::Const(constant) => {
                // the initializer's value stays on the stack as the constant
                self.compile_expression(&constant.expression);
                self.allocate(declaration.id);
                1
            }
            DeclarationKind::Var(_) => {
                self.emit(OpCode::Push { words: 1 });
                self.allocate(declaration.id);
                1
            }
            DeclarationKind::Type(_) => 0,
            DeclarationKind::Sequence(declarations) => declarations
                .iter()
                .map(|declaration| self.compile_declaration(declaration))
                .sum(),
        }
    }

    fn cannot_lower(&mut self, position: Position, spelling: &str) {
        self.errors.push((position, format!("Cannot generate code for '{}'", spelling)));
    }

    fn allocate(&mut self, id: NodeId) {
        debug!("{:?} allocated at {}[SB]", id, self.next_offset);
        self.offsets.insert(id, self.next_offset);
        self.next_offset += 1;
    }

    fn address_of(&self, identifier: &Identifier) -> Option<Address> {
        match identifier.declaration? {
            Binding::Declaration(id) => self.offsets.get(&id).copied().map(Address::stack),
            Binding::Builtin(_) => None,
        }
    }

    fn compile_parameter(&mut self, parameter: &Parameter) {
        match &parameter.kind {
            ParameterKind::Blank => {}
            ParameterKind::Value(expression) => self.compile_expression(expression),
            ParameterKind::Var(identifier) => match self.address_of(identifier) {
                Some(address) => {
                    self.emit(OpCode::LoadAddress { address });
                }
                None => self.cannot_lower(identifier.position, &identifier.spelling),
            },
        }
    }

    fn compile_expression(&mut self, expression: &Expression) {
        match &expression.kind {
            ExpressionKind::IntLiteral(spelling) => match spelling.parse::<i32>() {
                Ok(value) if value <= MAX_INT => {
                    self.emit(OpCode::LoadLiteral { value });
                }
                _ => self.errors.push((
                    expression.position,
                    format!("Integer literal {} is too large", spelling),
                )),
            },
            ExpressionKind::CharLiteral(graphic) => {
                self.emit(OpCode::LoadLiteral {
                    value: *graphic as i32,
                });
            }
            ExpressionKind::Identifier(identifier) => self.compile_identifier(identifier),
            ExpressionKind::Unary(unary) => {
                self.compile_expression(&unary.operand);
                self.compile_operator(&unary.operator);
            }
            ExpressionKind::Binary(binary) => {
                self.compile_expression(&binary.left);
                self.compile_expression(&binary.right);
                self.compile_operator(&binary.operator);
            }
        }
    }

    fn compile_identifier(&mut self, identifier: &Identifier) {
        let op = match identifier.declaration {
            Some(Binding::Declaration(_)) => self
                .address_of(identifier)
                .map(|address| OpCode::Load { size: 1, address }),
            Some(Binding::Builtin(Builtin::True)) => Some(OpCode::LoadLiteral { value: 1 }),
            Some(Binding::Builtin(Builtin::False)) => Some(OpCode::LoadLiteral { value: 0 }),
            Some(Binding::Builtin(Builtin::MaxInt)) => Some(OpCode::LoadLiteral { value: MAX_INT }),
            Some(Binding::Builtin(_)) => None,
            None => None,
        };

        match op {
            Some(op) => {
                self.emit(op);
            }
            None => self.cannot_lower(identifier.position, &identifier.spelling),
        }
    }

    fn compile_operator(&mut self, operator: &Operator) {
        let Some(primitive) = operator.declaration.and_then(Primitive::for_builtin) else {
            self.cannot_lower(operator.position, &operator.spelling);
            return;
        };

        if primitive.takes_size() {
            self.emit(OpCode::LoadLiteral { value: 1 });
        }
        self.emit(OpCode::CallPrimitive { primitive });
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}
