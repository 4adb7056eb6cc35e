//! Syntax tree produced by the expression parser

use super::parser;
use super::ExprResult;

/// Expression AST node
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Constant number
    Number(f64),

    /// Variable, parameter or constant reference
    Variable(String),

    /// Unary operations
    Unary(UnaryOp, Box<Expression>),

    /// Binary operations
    Binary(BinaryOp, Box<Expression>, Box<Expression>),

    /// Function call
    Function(String, Vec<Expression>),
}

/// Unary operations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    /// Negation (-)
    Neg,
}

/// Binary operations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryOp {
    /// Addition (+)
    Add,

    /// Subtraction (-)
    Sub,

    /// Multiplication (*)
    Mul,

    /// Division (/)
    Div,

    /// Power (^)
    Pow,
}

impl BinaryOp {
    pub(crate) fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Self::Add),
            '-' => Some(Self::Sub),
            '*' => Some(Self::Mul),
            '/' => Some(Self::Div),
            '^' => Some(Self::Pow),
            _ => None,
        }
    }
}

impl Expression {
    /// Parse an expression from a string
    ///
    /// # Examples
    ///
    /// ```
    /// use formula_explorer::expression::{BinaryOp, Expression};
    ///
    /// let expr = Expression::parse("a - b - c").unwrap();
    /// match expr {
    ///     Expression::Binary(BinaryOp::Sub, lhs, _) => {
    ///         assert!(matches!(*lhs, Expression::Binary(BinaryOp::Sub, _, _)));
    ///     }
    ///     _ => panic!("expected a subtraction"),
    /// }
    /// ```
    pub fn parse(input: &str) -> ExprResult<Self> {
        parser::parse_expression(input)
    }

    /// Find all variable names used in the expression, sorted and deduplicated
    pub fn variables(&self) -> Vec<String> {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars.sort();
        vars.dedup();
        vars
    }

    /// Find all function names called in the expression, sorted and deduplicated
    pub fn functions(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_functions(&mut names);
        names.sort();
        names.dedup();
        names
    }

    fn collect_variables(&self, vars: &mut Vec<String>) {
        match self {
            Self::Number(_) => {}
            Self::Variable(name) => vars.push(name.clone()),
            Self::Unary(_, expr) => expr.collect_variables(vars),
            Self::Binary(_, left, right) => {
                left.collect_variables(vars);
                right.collect_variables(vars);
            }
            Self::Function(_, args) => {
                for arg in args {
                    arg.collect_variables(vars);
                }
            }
        }
    }

    fn collect_functions(&self, names: &mut Vec<String>) {
        match self {
            Self::Number(_) | Self::Variable(_) => {}
            Self::Unary(_, expr) => expr.collect_functions(names),
            Self::Binary(_, left, right) => {
                left.collect_functions(names);
                right.collect_functions(names);
            }
            Self::Function(name, args) => {
                names.push(name.clone());
                for arg in args {
                    arg.collect_functions(names);
                }
            }
        }
    }
}
