//! Instructions of the Triangle Abstract Machine (TAM) and their two
//! external forms: the binary object code and the text listing.

use std::fmt;

use crate::common::builtins::Builtin;

/// Instructions the code store can hold.
pub const CODE_STORE_SIZE: usize = 1024;

/// Largest integer a TAM word holds.
pub const MAX_INT: i32 = 32767;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Cb = 0,
    Ct = 1,
    Pb = 2,
    Pt = 3,
    Sb = 4,
    St = 5,
    Hb = 6,
    Ht = 7,
    Lb = 8,
    Cp = 15,
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Register::Cb => "CB",
            Register::Ct => "CT",
            Register::Pb => "PB",
            Register::Pt => "PT",
            Register::Sb => "SB",
            Register::St => "ST",
            Register::Hb => "HB",
            Register::Ht => "HT",
            Register::Lb => "LB",
            Register::Cp => "CP",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address {
    pub register: Register,
    pub displacement: i32,
}

impl Address {
    pub fn stack(displacement: i32) -> Self {
        Self {
            register: Register::Sb,
            displacement,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.displacement, self.register)
    }
}

/// Routines built into the machine, addressed by their displacement from PB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Not = 2,
    Neg = 7,
    Add = 8,
    Sub = 9,
    Mult = 10,
    Div = 11,
    Lt = 13,
    Le = 14,
    Ge = 15,
    Gt = 16,
    Eq = 17,
    Ne = 18,
    Get = 21,
    Put = 22,
    GetEol = 23,
    PutEol = 24,
    GetInt = 25,
    PutInt = 26,
}

impl Primitive {
    /// The routine implementing a built-in procedure or operator.
    pub fn for_builtin(builtin: Builtin) -> Option<Self> {
        use Builtin as B;
        use Primitive as P;

        let primitive = match builtin {
            B::Put => P::Put,
            B::Get => P::Get,
            B::PutInt => P::PutInt,
            B::GetInt => P::GetInt,
            B::PutEol => P::PutEol,
            B::GetEol => P::GetEol,
            B::Add => P::Add,
            B::Subtract => P::Sub,
            B::Multiply => P::Mult,
            B::Divide => P::Div,
            B::Less => P::Lt,
            B::LessOrEqual => P::Le,
            B::Greater => P::Gt,
            B::GreaterOrEqual => P::Ge,
            B::Equal => P::Eq,
            B::NotEqual => P::Ne,
            B::Negate => P::Neg,
            B::Not => P::Not,
            B::Integer | B::Boolean | B::Char | B::True | B::False | B::MaxInt => return None,
        };
        Some(primitive)
    }

    pub fn displacement(&self) -> i32 {
        *self as i32
    }

    // eq and ne compare values of any size and take it as an extra argument
    pub fn takes_size(&self) -> bool {
        matches!(self, Primitive::Eq | Primitive::Ne)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Not => "not",
            Primitive::Neg => "neg",
            Primitive::Add => "add",
            Primitive::Sub => "sub",
            Primitive::Mult => "mult",
            Primitive::Div => "div",
            Primitive::Lt => "lt",
            Primitive::Le => "le",
            Primitive::Ge => "ge",
            Primitive::Gt => "gt",
            Primitive::Eq => "eq",
            Primitive::Ne => "ne",
            Primitive::Get => "get",
            Primitive::Put => "put",
            Primitive::GetEol => "geteol",
            Primitive::PutEol => "puteol",
            Primitive::GetInt => "getint",
            Primitive::PutInt => "putint",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpCode {
    Load { size: i32, address: Address },        // push `size` words from address
    LoadAddress { address: Address },            // push the address itself
    LoadLiteral { value: i32 },                  // push value
    Store { size: i32, address: Address },       // pop `size` words into address
    CallPrimitive { primitive: Primitive },      // run a built-in routine
    Push { words: i32 },                         // reserve words on top of the stack
    Pop { keep: i32, discard: i32 },             // drop `discard` words under the top `keep`
    Jump { target: usize },                      // goto target[CB]
    JumpIf { value: i32, target: usize },        // pop; goto target[CB] if equal to value
    Halt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub op: OpCode,
}

impl Instruction {
    pub fn new(op: OpCode) -> Self {
        Self { op }
    }

    /// The `(op, r, n, d)` fields of the TAM object format.
    pub fn fields(&self) -> [i32; 4] {
        let cb = Register::Cb as i32;
        match &self.op {
            OpCode::Load { size, address } => {
                [0, address.register as i32, *size, address.displacement]
            }
            OpCode::LoadAddress { address } => {
                [1, address.register as i32, 0, address.displacement]
            }
            OpCode::LoadLiteral { value } => [3, 0, 0, *value],
            OpCode::Store { size, address } => {
                [4, address.register as i32, *size, address.displacement]
            }
            OpCode::CallPrimitive { primitive } => [
                6,
                Register::Pb as i32,
                Register::Sb as i32,
                primitive.displacement(),
            ],
            OpCode::Push { words } => [10, 0, 0, *words],
            OpCode::Pop { keep, discard } => [11, 0, *keep, *discard],
            OpCode::Jump { target } => [12, cb, 0, *target as i32],
            OpCode::JumpIf { value, target } => [14, cb, *value, *target as i32],
            OpCode::Halt => [15, 0, 0, 0],
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.op {
            OpCode::Load { size, address } => write!(f, "LOAD ({}) {}", size, address),
            OpCode::LoadAddress { address } => write!(f, "LOADA {}", address),
            OpCode::LoadLiteral { value } => write!(f, "LOADL {}", value),
            OpCode::Store { size, address } => write!(f, "STORE ({}) {}", size, address),
            OpCode::CallPrimitive { primitive } => write!(f, "CALL {}", primitive.name()),
            OpCode::Push { words } => write!(f, "PUSH {}", words),
            OpCode::Pop { keep, discard } => write!(f, "POP ({}) {}", keep, discard),
            OpCode::Jump { target } => write!(f, "JUMP {}[CB]", target),
            OpCode::JumpIf { value, target } => write!(f, "JUMPIF ({}) {}[CB]", value, target),
            OpCode::Halt => write!(f, "HALT"),
        }
    }
}

/// A complete program for the machine, in code store order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetCode {
    instructions: Vec<Instruction>,
}

impl TargetCode {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Object code: every instruction as four big-endian words.
    pub fn encode(&self) -> Vec<u8> {
        self.instructions
            .iter()
            .flat_map(|instruction| instruction.fields())
            .flat_map(i32::to_be_bytes)
            .collect()
    }

    pub fn listing(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TargetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (address, instruction) in self.instructions.iter().enumerate() {
            writeln!(f, "{}: {}", address, instruction)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_format() {
        let code = TargetCode::new(vec![
            Instruction::new(OpCode::Push { words: 1 }),
            Instruction::new(OpCode::LoadLiteral { value: 4 }),
            Instruction::new(OpCode::Store {
                size: 1,
                address: Address::stack(0),
            }),
            Instruction::new(OpCode::LoadAddress {
                address: Address::stack(2),
            }),
            Instruction::new(OpCode::CallPrimitive {
                primitive: Primitive::PutInt,
            }),
            Instruction::new(OpCode::JumpIf {
                value: 0,
                target: 7,
            }),
            Instruction::new(OpCode::Jump { target: 3 }),
            Instruction::new(OpCode::Pop {
                keep: 0,
                discard: 1,
            }),
            Instruction::new(OpCode::Halt),
        ]);

        assert_eq!(
            code.listing(),
            "0: PUSH 1\n\
             1: LOADL 4\n\
             2: STORE (1) 0[SB]\n\
             3: LOADA 2[SB]\n\
             4: CALL putint\n\
             5: JUMPIF (0) 7[CB]\n\
             6: JUMP 3[CB]\n\
             7: POP (0) 1\n\
             8: HALT\n"
        );
    }

    #[test]
    fn test_encode_is_big_endian_words() {
        let code = TargetCode::new(vec![
            Instruction::new(OpCode::CallPrimitive {
                primitive: Primitive::Add,
            }),
            Instruction::new(OpCode::LoadLiteral { value: -1 }),
        ]);

        let bytes = code.encode();
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[0..16], &[0, 0, 0, 6, 0, 0, 0, 2, 0, 0, 0, 4, 0, 0, 0, 8]);
        assert_eq!(&bytes[28..32], &[0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn test_primitives_for_builtins() {
        assert_eq!(Primitive::for_builtin(Builtin::PutInt), Some(Primitive::PutInt));
        assert_eq!(Primitive::for_builtin(Builtin::GreaterOrEqual), Some(Primitive::Ge));
        assert_eq!(Primitive::for_builtin(Builtin::MaxInt), None);
        assert_eq!(Primitive::GetInt.displacement(), 25);
        assert!(Primitive::Ne.takes_size());
        assert!(!Primitive::Lt.takes_size());
    }
}
