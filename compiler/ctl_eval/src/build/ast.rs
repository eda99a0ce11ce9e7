//! Owned syntax tree accepted by [`ProgramBuilder`](super::ProgramBuilder).
//!
//! Names are plain strings here; the builder resolves them to slots,
//! functions and overloads.

use ctl_ir::{ArithOp, CmpOp, Fix, LogicalOp, SeqOp, Span, StepOp, UnaryOp};
use ctl_types::{LogLevel, Type};
use ctl_value::{Value, VarDecl};

/// Field of an input record, output record or lookup result.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldRef {
    Name(String),
    Ordinal(usize),
    /// The whole record.
    Whole,
}

impl From<&str> for FieldRef {
    fn from(name: &str) -> Self {
        FieldRef::Name(name.to_owned())
    }
}

impl From<usize> for FieldRef {
    fn from(ordinal: usize) -> Self {
        FieldRef::Ordinal(ordinal)
    }
}

/// Left-hand side of an assignment or `++`/`--`.
#[derive(Clone, Debug, PartialEq)]
pub enum Target {
    Var(String),
    /// `name[index]`
    Index(String, Box<Expr>),
    /// `name.field`
    Field(String, String),
}

impl Target {
    pub fn var(name: &str) -> Self {
        Target::Var(name.to_owned())
    }

    pub fn index(name: &str, index: Expr) -> Self {
        Target::Index(name.to_owned(), Box::new(index))
    }

    pub fn field(name: &str, field: &str) -> Self {
        Target::Field(name.to_owned(), field.to_owned())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Lit(Value),
    List { elem: Type, items: Vec<Expr> },
    Var(String),
    Index(String, Box<Expr>),
    Field(String, String),
    /// `$in.record.field`
    Input(usize, FieldRef),
    Logical(LogicalOp, Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Compare(CmpOp, Box<Expr>, Box<Expr>),
    Arith(ArithOp, Box<Expr>, Box<Expr>),
    Unary(UnaryOp, Box<Expr>),
    Step(StepOp, Fix, Target),
    IsNull(Box<Expr>),
    Nvl(Box<Expr>, Box<Expr>),
    Nvl2(Box<Expr>, Box<Expr>, Box<Expr>),
    Iif(Box<Expr>, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
    /// `sequence(name, ret).op`
    Sequence(String, SeqOp, Type),
    Lookup {
        table: String,
        keys: Vec<Expr>,
        field: FieldRef,
    },
    LookupNext {
        table: String,
        field: FieldRef,
    },
    LookupFound(String),
    DictGet(Box<Expr>),
    Eval(Box<Expr>),
}

impl Expr {
    pub fn int(value: i32) -> Self {
        Expr::Lit(Value::Integer(value))
    }

    pub fn long(value: i64) -> Self {
        Expr::Lit(Value::Long(value))
    }

    pub fn number(value: f64) -> Self {
        Expr::Lit(Value::Double(value))
    }

    pub fn string(value: &str) -> Self {
        Expr::Lit(Value::string(value))
    }

    pub fn boolean(value: bool) -> Self {
        Expr::Lit(Value::Boolean(value))
    }

    pub fn null() -> Self {
        Expr::Lit(Value::Null)
    }

    pub fn var(name: &str) -> Self {
        Expr::Var(name.to_owned())
    }

    pub fn index(name: &str, index: Expr) -> Self {
        Expr::Index(name.to_owned(), Box::new(index))
    }

    pub fn field(name: &str, field: &str) -> Self {
        Expr::Field(name.to_owned(), field.to_owned())
    }

    pub fn input(record: usize, field: impl Into<FieldRef>) -> Self {
        Expr::Input(record, field.into())
    }

    pub fn list(elem: Type, items: Vec<Expr>) -> Self {
        Expr::List { elem, items }
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::Logical(LogicalOp::And, Box::new(left), Box::new(right))
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::Logical(LogicalOp::Or, Box::new(left), Box::new(right))
    }

    pub fn logical_not(operand: Expr) -> Self {
        Expr::Not(Box::new(operand))
    }

    pub fn compare(op: CmpOp, left: Expr, right: Expr) -> Self {
        Expr::Compare(op, Box::new(left), Box::new(right))
    }

    pub fn arith(op: ArithOp, left: Expr, right: Expr) -> Self {
        Expr::Arith(op, Box::new(left), Box::new(right))
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary(op, Box::new(operand))
    }

    pub fn is_null(operand: Expr) -> Self {
        Expr::IsNull(Box::new(operand))
    }

    pub fn nvl(value: Expr, fallback: Expr) -> Self {
        Expr::Nvl(Box::new(value), Box::new(fallback))
    }

    pub fn nvl2(value: Expr, present: Expr, absent: Expr) -> Self {
        Expr::Nvl2(Box::new(value), Box::new(present), Box::new(absent))
    }

    pub fn iif(cond: Expr, then: Expr, otherwise: Expr) -> Self {
        Expr::Iif(Box::new(cond), Box::new(then), Box::new(otherwise))
    }

    pub fn call(name: &str, args: Vec<Expr>) -> Self {
        Expr::Call(name.to_owned(), args)
    }

    pub fn sequence(name: &str, op: SeqOp, ret: Type) -> Self {
        Expr::Sequence(name.to_owned(), op, ret)
    }

    pub fn lookup(table: &str, keys: Vec<Expr>, field: impl Into<FieldRef>) -> Self {
        Expr::Lookup {
            table: table.to_owned(),
            keys,
            field: field.into(),
        }
    }

    pub fn lookup_next(table: &str, field: impl Into<FieldRef>) -> Self {
        Expr::LookupNext {
            table: table.to_owned(),
            field: field.into(),
        }
    }

    pub fn lookup_found(table: &str) -> Self {
        Expr::LookupFound(table.to_owned())
    }

    pub fn dict_get(key: Expr) -> Self {
        Expr::DictGet(Box::new(key))
    }

    pub fn eval(source: Expr) -> Self {
        Expr::Eval(Box::new(source))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Decl {
        name: String,
        ty: Type,
        decl: VarDecl,
        init: Option<Expr>,
    },
    Assign(Target, Expr),
    /// `$out.record.field := alternative : alternative ...`
    Map {
        record: usize,
        field: FieldRef,
        alternatives: Vec<Expr>,
    },
    /// `$out.N.* = source`: copy same-named fields.
    MapAll {
        record: usize,
        source: Expr,
    },
    Expr(Expr),
    Step(StepOp, Target),
    Block(Vec<Stmt>),
    If {
        cond: Expr,
        then: Vec<Stmt>,
        otherwise: Option<Vec<Stmt>>,
    },
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        step: Option<Box<Stmt>>,
        body: Vec<Stmt>,
    },
    /// Declares `var` for the loop.
    Foreach {
        var: String,
        ty: Type,
        iterable: Expr,
        body: Vec<Stmt>,
    },
    While {
        cond: Expr,
        body: Vec<Stmt>,
    },
    DoWhile {
        body: Vec<Stmt>,
        cond: Expr,
    },
    Switch {
        scrutinee: Expr,
        cases: Vec<(Expr, Vec<Stmt>)>,
        default: Option<Vec<Stmt>>,
    },
    /// A `binding` is declared as a string visible to the body and handler.
    TryCatch {
        body: Vec<Stmt>,
        binding: Option<String>,
        handler: Vec<Stmt>,
    },
    Break,
    Continue,
    Return(Option<Expr>),
    LookupInit(String),
    LookupFree(String),
    DictPut(Expr, Expr),
    DictDelete(Expr),
    Eval(Expr),
    PrintErr {
        message: Expr,
        with_location: bool,
    },
    PrintLog(LogLevel, Expr),
    RaiseError(Expr),
    PrintStack,
    /// Give the wrapped statement an explicit position.
    At(Span, Box<Stmt>),
}

impl Stmt {
    pub fn decl(name: &str, ty: Type) -> Self {
        Stmt::Decl {
            name: name.to_owned(),
            ty,
            decl: VarDecl::default(),
            init: None,
        }
    }

    pub fn decl_init(name: &str, ty: Type, init: Expr) -> Self {
        Stmt::Decl {
            name: name.to_owned(),
            ty,
            decl: VarDecl::default(),
            init: Some(init),
        }
    }

    pub fn assign(name: &str, value: Expr) -> Self {
        Stmt::Assign(Target::var(name), value)
    }

    pub fn map(record: usize, field: impl Into<FieldRef>, alternatives: Vec<Expr>) -> Self {
        Stmt::Map {
            record,
            field: field.into(),
            alternatives,
        }
    }

    pub fn map_all(record: usize, source: Expr) -> Self {
        Stmt::MapAll { record, source }
    }

    pub fn expr(expr: Expr) -> Self {
        Stmt::Expr(expr)
    }

    pub fn incr(name: &str) -> Self {
        Stmt::Step(StepOp::Incr, Target::var(name))
    }

    pub fn if_then(cond: Expr, then: Vec<Stmt>) -> Self {
        Stmt::If {
            cond,
            then,
            otherwise: None,
        }
    }

    pub fn if_else(cond: Expr, then: Vec<Stmt>, otherwise: Vec<Stmt>) -> Self {
        Stmt::If {
            cond,
            then,
            otherwise: Some(otherwise),
        }
    }

    pub fn ret(value: Expr) -> Self {
        Stmt::Return(Some(value))
    }

    pub fn at(line: u32, column: u32, stmt: Stmt) -> Self {
        Stmt::At(Span::new(line, column), Box::new(stmt))
    }
}

/// A user-defined function.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<(String, Type)>,
    pub ret: Type,
    pub body: Vec<Stmt>,
}

impl FunctionDecl {
    pub fn new(name: &str, params: &[(&str, Type)], ret: Type, body: Vec<Stmt>) -> Self {
        FunctionDecl {
            name: name.to_owned(),
            params: params
                .iter()
                .map(|(name, ty)| ((*name).to_owned(), ty.clone()))
                .collect(),
            ret,
            body,
        }
    }
}

/// Top-level program element.
#[derive(Clone, Debug, PartialEq)]
pub enum Item {
    Stmt(Stmt),
    Function(FunctionDecl),
}

impl From<Stmt> for Item {
    fn from(stmt: Stmt) -> Self {
        Item::Stmt(stmt)
    }
}

impl From<FunctionDecl> for Item {
    fn from(func: FunctionDecl) -> Self {
        Item::Function(func)
    }
}
