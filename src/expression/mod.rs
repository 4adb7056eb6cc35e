//! # Expression Evaluator
//!
//! This module parses algebraic expressions of one free variable (`x`) and any
//! number of named parameters, compiles them once against a parameter shape,
//! and evaluates the compiled form repeatedly over a real-or-complex value
//! domain.
//!
//! ## Grammar
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('^' unary)?
//! primary := number | call | identifier | '(' expr ')'
//! call    := identifier '(' expr (',' expr)* ')'
//! ```
//!
//! Binary operators are left-associative except `^`, which is
//! right-associative and binds tighter than unary minus (`-x^2 == -(x^2)`).
//!
//! ## Example Usage
//!
//! ```rust
//! use formula_explorer::expression::{Binding, CompiledExpression, ParameterShape};
//!
//! let shape = ParameterShape::new(["a", "b"]);
//! let compiled = CompiledExpression::compile("a * x + b", &shape).unwrap();
//!
//! let values = [2.0, 1.0];
//! let binding = Binding::new(&shape, &values, 3.0).unwrap();
//! let y = compiled.evaluate(&binding).unwrap();
//! assert_eq!(y.to_real(1e-10), Some(7.0));
//! ```

pub mod ast;
pub mod builtins;
pub mod compile;
pub mod parser;
pub mod value;

use thiserror::Error;

pub use ast::{BinaryOp, Expression, UnaryOp};
pub use builtins::{constant, Arity, Function, FREE_VARIABLE};
pub use compile::{Binding, CompiledExpression, ParameterShape};
pub use value::{Value, IMAGINARY_TOLERANCE};

/// Error that can occur during expression parsing, compilation or evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Failed to parse expression: {message}")]
    ParseError { message: String },

    #[error("Expression is empty")]
    EmptyExpression,

    #[error("Mismatched parentheses at position {position}")]
    UnbalancedParentheses { position: usize },

    #[error("Undefined variable: {name}")]
    UndefinedVariable { name: String },

    #[error("Undefined function: {name}")]
    UndefinedFunction { name: String },

    #[error("{name}() expects {expected} argument(s), got {found}")]
    ArityMismatch {
        name: String,
        expected: Arity,
        found: usize,
    },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Invalid operation: {message}")]
    InvalidOperation { message: String },

    #[error("Parameter name '{name}' is reserved for the free variable")]
    ReservedName { name: String },

    #[error("Parameter '{name}' is defined more than once")]
    DuplicateParameter { name: String },

    #[error("Binding has {found} parameter values but the shape has {expected}")]
    ShapeMismatch { expected: usize, found: usize },
}

/// Result type for expression operations
pub type ExprResult<T> = Result<T, ExpressionError>;
