//! Whitelisted functions and constants of the expression language

use num_complex::Complex64;
use std::fmt;

use super::value::Value;
use super::{ExprResult, ExpressionError};

/// Name of the free variable sampled along the x axis
pub const FREE_VARIABLE: &str = "x";

/// Look up a built-in constant by name
pub fn constant(name: &str) -> Option<f64> {
    match name {
        "e" => Some(std::f64::consts::E),
        "pi" => Some(std::f64::consts::PI),
        _ => None,
    }
}

/// Number of arguments a function accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many arguments
    Exactly(usize),

    /// Between `min` and `max` arguments (inclusive)
    Between(usize, usize),

    /// At least this many arguments
    AtLeast(usize),
}

impl Arity {
    /// Whether `count` arguments satisfy this arity
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exactly(n) => count == n,
            Self::Between(min, max) => (min..=max).contains(&count),
            Self::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "{}", n),
            Self::Between(min, max) => write!(f, "{} to {}", min, max),
            Self::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

/// Built-in functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    /// Natural logarithm, or `log(x, base)` with two arguments
    Log,
    Log10,
    Sqrt,
    Abs,
    Max,
    Min,
}

impl Function {
    /// All built-in functions
    pub const ALL: [Function; 13] = [
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Sinh,
        Function::Cosh,
        Function::Tanh,
        Function::Exp,
        Function::Log,
        Function::Log10,
        Function::Sqrt,
        Function::Abs,
        Function::Max,
        Function::Min,
    ];

    /// Look up a function by the name used in expressions
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Name used in expressions
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Log10 => "log10",
            Self::Sqrt => "sqrt",
            Self::Abs => "abs",
            Self::Max => "max",
            Self::Min => "min",
        }
    }

    /// Accepted argument count
    pub fn arity(self) -> Arity {
        match self {
            Self::Log => Arity::Between(1, 2),
            Self::Max | Self::Min => Arity::AtLeast(1),
            _ => Arity::Exactly(1),
        }
    }

    /// Check an argument count against the arity
    pub fn check_arity(self, count: usize) -> ExprResult<()> {
        if self.arity().accepts(count) {
            Ok(())
        } else {
            Err(ExpressionError::ArityMismatch {
                name: self.name().to_string(),
                expected: self.arity(),
                found: count,
            })
        }
    }

    /// Apply the function to evaluated arguments
    pub fn apply(self, args: &[Value]) -> ExprResult<Value> {
        self.check_arity(args.len())?;

        let value = match self {
            Self::Sin => args[0].map(f64::sin, Complex64::sin),
            Self::Cos => args[0].map(f64::cos, Complex64::cos),
            Self::Tan => args[0].map(f64::tan, Complex64::tan),
            Self::Sinh => args[0].map(f64::sinh, Complex64::sinh),
            Self::Cosh => args[0].map(f64::cosh, Complex64::cosh),
            Self::Tanh => args[0].map(f64::tanh, Complex64::tanh),
            Self::Exp => args[0].map(f64::exp, Complex64::exp),
            Self::Log => match args.get(1) {
                Some(base) => args[0].ln().checked_div(base.ln())?,
                None => args[0].ln(),
            },
            Self::Log10 => args[0].log10(),
            Self::Sqrt => args[0].sqrt(),
            Self::Abs => args[0].abs(),
            Self::Max => Value::Real(extremum(self, args, f64::max)?),
            Self::Min => Value::Real(extremum(self, args, f64::min)?),
        };
        Ok(value)
    }
}

/// Fold real arguments with `pick`, propagating NaN
fn extremum(function: Function, args: &[Value], pick: fn(f64, f64) -> f64) -> ExprResult<f64> {
    let mut acc: Option<f64> = None;
    for arg in args {
        let v = arg.comparable(function.name())?;
        acc = Some(match acc {
            None => v,
            Some(a) if a.is_nan() || v.is_nan() => f64::NAN,
            Some(a) => pick(a, v),
        });
    }
    acc.ok_or_else(|| ExpressionError::ArityMismatch {
        name: function.name().to_string(),
        expected: function.arity(),
        found: 0,
    })
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
