use std::fmt;

use crate::common::builtins::Builtin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Integer,
    Boolean,
    Char,

    // result of an expression that failed to type check
    Error,
}

impl Type {
    /// Whether a value of type `other` may be used where `self` is expected.
    /// The erroneous type fits everywhere so one mistake is reported once.
    pub fn accepts(&self, other: Type) -> bool {
        *self == Type::Error || other == Type::Error || *self == other
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Integer => write!(f, "integer"),
            Type::Boolean => write!(f, "boolean"),
            Type::Char => write!(f, "char"),
            Type::Error => write!(f, "<error>"),
        }
    }
}

/// How a procedure expects to receive its single parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterSpec {
    None,
    Value(Type),
    Var(Type),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorSignature {
    Binary {
        left: Type,
        right: Type,
        result: Type,
    },
    // both operands of any type, as long as they agree
    Equality,
    Unary {
        operand: Type,
        result: Type,
    },
}

/// What a standard-environment name stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinEntity {
    Type(Type),
    Constant(Type),
    Procedure(ParameterSpec),
    Operator(OperatorSignature),
}

impl Builtin {
    pub fn entity(&self) -> BuiltinEntity {
        use Builtin as B;
        use BuiltinEntity as E;
        use OperatorSignature as S;

        let arithmetic = S::Binary {
            left: Type::Integer,
            right: Type::Integer,
            result: Type::Integer,
        };
        let relational = S::Binary {
            left: Type::Integer,
            right: Type::Integer,
            result: Type::Boolean,
        };

        match self {
            B::Integer => E::Type(Type::Integer),
            B::Boolean => E::Type(Type::Boolean),
            B::Char => E::Type(Type::Char),
            B::True | B::False => E::Constant(Type::Boolean),
            B::MaxInt => E::Constant(Type::Integer),
            B::Put => E::Procedure(ParameterSpec::Value(Type::Char)),
            B::Get => E::Procedure(ParameterSpec::Var(Type::Char)),
            B::PutInt => E::Procedure(ParameterSpec::Value(Type::Integer)),
            B::GetInt => E::Procedure(ParameterSpec::Var(Type::Integer)),
            B::PutEol | B::GetEol => E::Procedure(ParameterSpec::None),
            B::Add | B::Subtract | B::Multiply | B::Divide => E::Operator(arithmetic),
            B::Less | B::LessOrEqual | B::Greater | B::GreaterOrEqual => E::Operator(relational),
            B::Equal | B::NotEqual => E::Operator(S::Equality),
            B::Negate => E::Operator(S::Unary {
                operand: Type::Integer,
                result: Type::Integer,
            }),
            B::Not => E::Operator(S::Unary {
                operand: Type::Boolean,
                result: Type::Boolean,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_type_is_compatible_with_everything() {
        assert!(Type::Integer.accepts(Type::Error));
        assert!(Type::Error.accepts(Type::Char));
        assert!(Type::Boolean.accepts(Type::Boolean));
        assert!(!Type::Boolean.accepts(Type::Integer));
    }

    #[test]
    fn test_builtin_entities() {
        assert_eq!(Builtin::Integer.entity(), BuiltinEntity::Type(Type::Integer));
        assert_eq!(
            Builtin::GetInt.entity(),
            BuiltinEntity::Procedure(ParameterSpec::Var(Type::Integer))
        );
        assert_eq!(
            Builtin::Less.entity(),
            BuiltinEntity::Operator(OperatorSignature::Binary {
                left: Type::Integer,
                right: Type::Integer,
                result: Type::Boolean,
            })
        );
    }
}
