//! Runtime errors of the executor.
//!
//! # Structured Error Categories
//!
//! [`EvalErrorKind`] is the typed fault; [`ErrorCategory`] groups kinds into
//! the families scripts and hosts reason about. `try/catch` in a script
//! catches every category except [`ErrorCategory::Resource`] and
//! [`ErrorCategory::Fatal`].
//!
//! Factory functions (e.g. [`division_by_zero`]) are the public way to build
//! errors; they fill in both `kind` and `message`.

use std::error::Error;
use std::fmt;

use ctl_ir::Span;
use ctl_stack::StackError;
use ctl_types::Type;
use ctl_value::{Value, ValueError};

/// Failure reported by a host collaborator (native function, sequence,
/// lookup table, dictionary, script compiler).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        HostError {
            message: message.into(),
        }
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for HostError {}

impl From<String> for HostError {
    fn from(message: String) -> Self {
        HostError { message }
    }
}

impl From<&str> for HostError {
    fn from(message: &str) -> Self {
        HostError::new(message)
    }
}

/// Family of an [`EvalErrorKind`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Type,
    NullOperand,
    Index,
    Resource,
    Arithmetic,
    Native,
    User,
    Fatal,
}

impl ErrorCategory {
    /// Name bound to the `catch` variable of a script.
    pub const fn name(self) -> &'static str {
        match self {
            ErrorCategory::Type => "TypeError",
            ErrorCategory::NullOperand => "NullOperandError",
            ErrorCategory::Index => "IndexError",
            ErrorCategory::Resource => "ResourceError",
            ErrorCategory::Arithmetic => "ArithmeticError",
            ErrorCategory::Native => "NativeError",
            ErrorCategory::User => "UserError",
            ErrorCategory::Fatal => "FatalError",
        }
    }

    /// Whether script `try/catch` may handle errors of this family.
    pub const fn is_catchable(self) -> bool {
        !matches!(self, ErrorCategory::Resource | ErrorCategory::Fatal)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of named graph resource.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Sequence,
    LookupTable,
    Dictionary,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::Sequence => "sequence",
            ResourceKind::LookupTable => "lookup table",
            ResourceKind::Dictionary => "dictionary",
        })
    }
}

/// Typed runtime fault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Type
    TypeMismatch {
        expected: String,
        found: String,
    },
    IncompatibleOperands {
        op: String,
        left: String,
        right: String,
    },
    /// A condition evaluated to a non-boolean value.
    InvalidCondition {
        construct: &'static str,
    },
    /// A condition is absent or evaluated to `null`.
    MissingCondition {
        construct: &'static str,
    },
    NotIndexable {
        ty: String,
    },
    NotOrdered {
        ty: String,
    },
    InvalidRegex {
        pattern: String,
        reason: String,
    },

    // Null operands
    NullOperand {
        op: String,
    },

    // Index
    IndexOutOfBounds {
        index: i64,
        len: usize,
    },
    InvalidIndex {
        container: String,
        found: String,
    },
    UnknownField {
        field: String,
    },
    MissingKey,
    FieldFormat {
        field: String,
        reason: String,
    },

    // Resource
    MissingResource {
        kind: ResourceKind,
        name: String,
    },

    // Arithmetic
    DivisionByZero {
        op: String,
    },
    Overflow {
        op: String,
    },

    // Native
    NativeFailure {
        function: String,
        message: String,
    },
    ArityMismatch {
        function: String,
        expected: usize,
        got: usize,
    },
    ResourceFailure {
        kind: ResourceKind,
        name: String,
        message: String,
    },
    CompilerUnavailable,
    EvalCompile {
        message: String,
    },

    // User
    RaisedByUser {
        message: String,
    },

    // Fatal
    StackFault(StackError),
    StackOverflow {
        depth: usize,
    },
    EvalDepthExceeded {
        depth: usize,
    },
    Internal {
        message: String,
    },
}

impl EvalErrorKind {
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::TypeMismatch { .. }
            | Self::IncompatibleOperands { .. }
            | Self::InvalidCondition { .. }
            | Self::MissingCondition { .. }
            | Self::NotIndexable { .. }
            | Self::NotOrdered { .. }
            | Self::InvalidRegex { .. } => ErrorCategory::Type,
            Self::NullOperand { .. } => ErrorCategory::NullOperand,
            Self::IndexOutOfBounds { .. }
            | Self::InvalidIndex { .. }
            | Self::UnknownField { .. }
            | Self::MissingKey
            | Self::FieldFormat { .. } => ErrorCategory::Index,
            Self::MissingResource { .. } => ErrorCategory::Resource,
            Self::DivisionByZero { .. } | Self::Overflow { .. } => ErrorCategory::Arithmetic,
            Self::NativeFailure { .. }
            | Self::ArityMismatch { .. }
            | Self::ResourceFailure { .. }
            | Self::CompilerUnavailable
            | Self::EvalCompile { .. } => ErrorCategory::Native,
            Self::RaisedByUser { .. } => ErrorCategory::User,
            Self::StackFault(_)
            | Self::StackOverflow { .. }
            | Self::EvalDepthExceeded { .. }
            | Self::Internal { .. } => ErrorCategory::Fatal,
        }
    }

    /// Stable diagnostic code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DivisionByZero { .. } => "E6001",
            Self::Overflow { .. } => "E6002",
            Self::TypeMismatch { .. } => "E6010",
            Self::IncompatibleOperands { .. } => "E6011",
            Self::InvalidCondition { .. } => "E6012",
            Self::MissingCondition { .. } => "E6013",
            Self::NotIndexable { .. } => "E6014",
            Self::NotOrdered { .. } => "E6015",
            Self::InvalidRegex { .. } => "E6016",
            Self::NullOperand { .. } => "E6020",
            Self::IndexOutOfBounds { .. } => "E6030",
            Self::InvalidIndex { .. } => "E6031",
            Self::UnknownField { .. } => "E6032",
            Self::MissingKey => "E6033",
            Self::FieldFormat { .. } => "E6034",
            Self::MissingResource { .. } => "E6040",
            Self::NativeFailure { .. } => "E6050",
            Self::ArityMismatch { .. } => "E6051",
            Self::ResourceFailure { .. } => "E6052",
            Self::CompilerUnavailable => "E6053",
            Self::EvalCompile { .. } => "E6054",
            Self::RaisedByUser { .. } => "E6060",
            Self::StackFault(_) => "E6090",
            Self::StackOverflow { .. } => "E6091",
            Self::EvalDepthExceeded { .. } => "E6092",
            Self::Internal { .. } => "E6099",
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected, found } => {
                write!(f, "incompatible data types: expected {expected}, found {found}")
            }
            Self::IncompatibleOperands { op, left, right } => {
                write!(f, "{op} - incompatible literals/expressions ({left}, {right})")
            }
            Self::InvalidCondition { construct } => {
                write!(f, "{construct} - condition does not evaluate to a boolean value")
            }
            Self::MissingCondition { construct } => {
                write!(f, "{construct} - missing or invalid condition")
            }
            Self::NotIndexable { ty } => write!(f, "values of type {ty} cannot be indexed"),
            Self::NotOrdered { ty } => write!(f, "values of type {ty} have no ordering"),
            Self::InvalidRegex { pattern, reason } => {
                write!(f, "invalid regular expression `{pattern}`: {reason}")
            }
            Self::NullOperand { op } => write!(f, "{op} - NULL value not allowed"),
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} is outside current limits (length {len})")
            }
            Self::InvalidIndex { container, found } => {
                write!(f, "invalid index of type {found} for {container}")
            }
            Self::UnknownField { field } => write!(f, "invalid field ID `{field}`"),
            Self::MissingKey => write!(f, "no key defined when assigning to map"),
            Self::FieldFormat { field, reason } => {
                write!(f, "bad data when mapping field `{field}`: {reason}")
            }
            Self::MissingResource { kind, name } => {
                write!(f, "can't obtain {kind} \"{name}\" from graph")
            }
            Self::DivisionByZero { op } => write!(f, "{op} - division by zero"),
            Self::Overflow { op } => write!(f, "{op} - numeric overflow"),
            Self::NativeFailure { function, message } => {
                write!(f, "function {function}: {message}")
            }
            Self::ArityMismatch {
                function,
                expected,
                got,
            } => {
                let word = if *expected == 1 { "argument" } else { "arguments" };
                write!(f, "{function} expects {expected} {word}, got {got}")
            }
            Self::ResourceFailure {
                kind,
                name,
                message,
            } => write!(f, "{kind} \"{name}\": {message}"),
            Self::CompilerUnavailable => {
                write!(f, "eval - no script compiler is configured")
            }
            Self::EvalCompile { message } => {
                write!(f, "can't parse \"eval\" expression: {message}")
            }
            Self::RaisedByUser { message } => write!(f, "Exception raised by user: {message}"),
            Self::StackFault(err) => write!(f, "internal error: {err}"),
            Self::StackOverflow { depth } => {
                write!(f, "maximum call depth exceeded (limit: {depth})")
            }
            Self::EvalDepthExceeded { depth } => {
                write!(f, "eval nested deeper than {depth} levels")
            }
            Self::Internal { message } => write!(f, "internal error: {message}"),
        }
    }
}

/// Secondary information attached to an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalNote {
    pub message: String,
    pub span: Option<Span>,
}

impl EvalNote {
    pub fn new(message: impl Into<String>) -> Self {
        EvalNote {
            message: message.into(),
            span: None,
        }
    }

    pub fn with_span(message: impl Into<String>, span: Span) -> Self {
        EvalNote {
            message: message.into(),
            span: Some(span),
        }
    }
}

/// One call in a backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    pub name: String,
    /// Where the call was made.
    pub span: Option<Span>,
}

/// Snapshot of the internal call stack at an error site, innermost first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        EvalBacktrace { frames }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "stack backtrace:")?;
        for (i, frame) in self.frames.iter().enumerate() {
            write!(f, "  {i}: {}", frame.name)?;
            if let Some(span) = frame.span {
                write!(f, " at {span}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A runtime fault, positioned at the node that raised it.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// For factory-built errors, `kind.to_string()` plus any context.
    pub message: String,
    pub span: Option<Span>,
    /// Rendered offending operand values.
    pub operands: Vec<String>,
    pub backtrace: Option<EvalBacktrace>,
    pub notes: Vec<EvalNote>,
}

impl EvalError {
    pub fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        EvalError {
            kind,
            message,
            span: None,
            operands: Vec::new(),
            backtrace: None,
            notes: Vec::new(),
        }
    }

    #[inline]
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    #[inline]
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Whether script `try/catch` handles this error.
    #[inline]
    pub fn is_catchable(&self) -> bool {
        self.category().is_catchable()
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        self.backtrace = Some(backtrace);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: EvalNote) -> Self {
        self.notes.push(note);
        self
    }

    #[must_use]
    pub fn with_operands(mut self, operands: &[&Value]) -> Self {
        self.operands = operands.iter().map(|v| v.to_string()).collect();
        self
    }

    /// Name the variable an access fault happened on.
    #[must_use]
    pub fn in_variable(mut self, name: &str, ty: &Type) -> Self {
        self.message = format!("{} (variable `{name}` of type {ty})", self.message);
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(span) = self.span.filter(|s| !s.is_dummy()) {
            write!(f, " on {span}")?;
        }
        if !self.operands.is_empty() {
            write!(f, " [operands: {}]", self.operands.join(", "))?;
        }
        Ok(())
    }
}

impl Error for EvalError {}

impl From<ValueError> for EvalError {
    fn from(err: ValueError) -> Self {
        let kind = match err {
            ValueError::TypeMismatch { expected, found } => {
                EvalErrorKind::TypeMismatch { expected, found }
            }
            ValueError::IncompatibleOperands { op, left, right } => {
                EvalErrorKind::IncompatibleOperands {
                    op: op.to_owned(),
                    left,
                    right,
                }
            }
            ValueError::NullOperand { op } => EvalErrorKind::NullOperand { op: op.to_owned() },
            ValueError::IndexOutOfRange { index, len } => {
                EvalErrorKind::IndexOutOfBounds { index, len }
            }
            ValueError::NotIndexable { ty } => EvalErrorKind::NotIndexable { ty },
            ValueError::InvalidIndex { container, found } => {
                EvalErrorKind::InvalidIndex { container, found }
            }
            ValueError::UnknownField { field } => EvalErrorKind::UnknownField { field },
            ValueError::MissingKey => EvalErrorKind::MissingKey,
            ValueError::DivisionByZero { op } => {
                EvalErrorKind::DivisionByZero { op: op.to_owned() }
            }
            ValueError::Overflow { op } => EvalErrorKind::Overflow { op: op.to_owned() },
            ValueError::NotOrdered { ty } => EvalErrorKind::NotOrdered { ty },
            ValueError::FieldFormat { field, reason } => {
                EvalErrorKind::FieldFormat { field, reason }
            }
        };
        EvalError::from_kind(kind)
    }
}

impl From<StackError> for EvalError {
    fn from(err: StackError) -> Self {
        EvalError::from_kind(EvalErrorKind::StackFault(err))
    }
}

/// Result of evaluation.
pub type EvalResult<T = ()> = Result<T, EvalError>;

// Type errors

#[cold]
pub fn type_mismatch(expected: &str, found: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.to_owned(),
        found: found.type_of().to_string(),
    })
    .with_operands(&[found])
}

#[cold]
pub fn incompatible_operands(op: &str, left: &Value, right: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IncompatibleOperands {
        op: op.to_owned(),
        left: left.type_of().to_string(),
        right: right.type_of().to_string(),
    })
    .with_operands(&[left, right])
}

#[cold]
pub fn invalid_condition(construct: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidCondition { construct })
}

#[cold]
pub fn missing_condition(construct: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MissingCondition { construct })
}

#[cold]
pub fn not_indexable(name: &str, ty: &Type) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotIndexable { ty: ty.to_string() }).in_variable(name, ty)
}

#[cold]
pub fn invalid_regex(pattern: &str, reason: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidRegex {
        pattern: pattern.to_owned(),
        reason: reason.to_owned(),
    })
}

// Null operands

#[cold]
pub fn null_operand(op: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NullOperand { op: op.to_owned() })
}

// Index errors

#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds { index, len })
}

// Resource errors

#[cold]
pub fn missing_resource(kind: ResourceKind, name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MissingResource {
        kind,
        name: name.to_owned(),
    })
}

#[cold]
pub fn resource_failure(kind: ResourceKind, name: &str, err: &HostError) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ResourceFailure {
        kind,
        name: name.to_owned(),
        message: err.message.clone(),
    })
}

// Arithmetic errors

#[cold]
pub fn division_by_zero(op: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero { op: op.to_owned() })
}

#[cold]
pub fn overflow(op: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Overflow { op: op.to_owned() })
}

// Native errors

#[cold]
pub fn native_failure(function: &str, err: &HostError) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NativeFailure {
        function: function.to_owned(),
        message: err.message.clone(),
    })
}

#[cold]
pub fn arity_mismatch(function: &str, expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        function: function.to_owned(),
        expected,
        got,
    })
}

#[cold]
pub fn compiler_unavailable() -> EvalError {
    EvalError::from_kind(EvalErrorKind::CompilerUnavailable)
}

#[cold]
pub fn eval_compile_failed(err: &HostError) -> EvalError {
    EvalError::from_kind(EvalErrorKind::EvalCompile {
        message: err.message.clone(),
    })
}

// User errors

#[cold]
pub fn raised_by_user(message: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::RaisedByUser {
        message: message.to_owned(),
    })
}

// Fatal errors

#[cold]
pub fn recursion_limit_exceeded(limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { depth: limit })
}

#[cold]
pub fn eval_depth_exceeded(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::EvalDepthExceeded { depth })
}

#[cold]
pub fn internal(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Internal {
        message: message.into(),
    })
}
