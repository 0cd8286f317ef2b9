use std::fmt::Display;

/// Binary operators, including member access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Concat,
    ConcatSpaced,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    And,
    Or,
    Member,
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::Pow => "^",
            BinaryOperator::Concat => "@",
            BinaryOperator::ConcatSpaced => "@@",
            BinaryOperator::Eq => "==",
            BinaryOperator::NotEq => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEq => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEq => ">=",
            BinaryOperator::And => "&",
            BinaryOperator::Or => "|",
            BinaryOperator::Member => ".",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Neg,
    Not,
}

/// Ordered argument list of a call or instantiation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Params {
    pub param_list: Vec<Expr>,
}

impl Params {
    pub fn new(param_list: Vec<Expr>) -> Self {
        Params { param_list }
    }

    pub fn len(&self) -> usize {
        self.param_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.param_list.is_empty()
    }
}

/// A single `name (: Type)? = value` binding of a `let`.
#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub name: String,
    pub annotation: Option<String>,
    pub value: Box<Expr>,
}

/// One `condition => body` arm of an `if`/`elif` chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub condition: Expr,
    pub body: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Str(String),
    Bool(bool),
    Pi,
    E,
    Id(String),

    BinOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expr>,
    },

    Print(Box<Expr>),
    Sqrt(Box<Expr>),
    Sin(Box<Expr>),
    Cos(Box<Expr>),
    Exp(Box<Expr>),
    Log {
        base: Box<Expr>,
        value: Box<Expr>,
    },
    Rand,

    If {
        cases: Vec<Case>,
        default: Option<Box<Expr>>,
    },
    While {
        condition: Box<Expr>,
        body: Box<Expr>,
    },
    For {
        variable: String,
        iterable: Box<Expr>,
        body: Box<Expr>,
    },

    Block(Vec<Expr>),
    Let {
        binding: Assign,
        body: Box<Expr>,
    },
    DestructiveAssign {
        target: Box<Expr>,
        value: Box<Expr>,
    },

    FunctionCall {
        name: String,
        params: Params,
    },
    TypeCall {
        name: String,
        params: Params,
    },

    VectorExt(Vec<Expr>),
    VectorInt {
        expr: Box<Expr>,
        variable: String,
        iterable: Box<Expr>,
    },
    VectorCall {
        vector: Box<Expr>,
        index: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Self {
        Expr::BinOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn call(name: &str, args: Vec<Expr>) -> Self {
        Expr::FunctionCall {
            name: name.to_string(),
            params: Params::new(args),
        }
    }

    pub fn new_instance(name: &str, args: Vec<Expr>) -> Self {
        Expr::TypeCall {
            name: name.to_string(),
            params: Params::new(args),
        }
    }

    pub fn id(name: &str) -> Self {
        Expr::Id(name.to_string())
    }

    /// Single-binding `let name = value in body`.
    pub fn let_in(name: &str, value: Expr, body: Expr) -> Self {
        Expr::Let {
            binding: Assign {
                name: name.to_string(),
                annotation: None,
                value: Box::new(value),
            },
            body: Box::new(body),
        }
    }
}
