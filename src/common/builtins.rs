//! The standard environment: every entity a program can use without
//! declaring it first.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    // types
    Integer,
    Boolean,
    Char,

    // constants
    True,
    False,
    MaxInt,

    // procedures
    Put,
    Get,
    PutInt,
    GetInt,
    PutEol,
    GetEol,

    // binary operators
    Add,
    Subtract,
    Multiply,
    Divide,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Equal,
    NotEqual,

    // unary operators
    Negate,
    Not,
}

/// Names visible in the outermost scope.
pub const STANDARD_IDENTIFIERS: &[(&str, Builtin)] = &[
    ("integer", Builtin::Integer),
    ("boolean", Builtin::Boolean),
    ("char", Builtin::Char),
    ("true", Builtin::True),
    ("false", Builtin::False),
    ("maxint", Builtin::MaxInt),
    ("put", Builtin::Put),
    ("get", Builtin::Get),
    ("putint", Builtin::PutInt),
    ("getint", Builtin::GetInt),
    ("puteol", Builtin::PutEol),
    ("geteol", Builtin::GetEol),
];

impl Builtin {
    pub fn binary_operator(spelling: &str) -> Option<Self> {
        use Builtin as B;
        match spelling {
            "+" => Some(B::Add),
            "-" => Some(B::Subtract),
            "*" => Some(B::Multiply),
            "/" => Some(B::Divide),
            "<" => Some(B::Less),
            "<=" => Some(B::LessOrEqual),
            ">" => Some(B::Greater),
            ">=" => Some(B::GreaterOrEqual),
            "=" => Some(B::Equal),
            "\\=" => Some(B::NotEqual),
            _ => None,
        }
    }

    pub fn unary_operator(spelling: &str) -> Option<Self> {
        match spelling {
            "-" => Some(Builtin::Negate),
            "\\" => Some(Builtin::Not),
            _ => None,
        }
    }

    pub fn spelling(&self) -> &'static str {
        use Builtin as B;
        match self {
            B::Integer => "integer",
            B::Boolean => "boolean",
            B::Char => "char",
            B::True => "true",
            B::False => "false",
            B::MaxInt => "maxint",
            B::Put => "put",
            B::Get => "get",
            B::PutInt => "putint",
            B::GetInt => "getint",
            B::PutEol => "puteol",
            B::GetEol => "geteol",
            B::Add => "+",
            B::Subtract => "-",
            B::Multiply => "*",
            B::Divide => "/",
            B::Less => "<",
            B::LessOrEqual => "<=",
            B::Greater => ">",
            B::GreaterOrEqual => ">=",
            B::Equal => "=",
            B::NotEqual => "\\=",
            B::Negate => "-",
            B::Not => "\\",
        }
    }
}
