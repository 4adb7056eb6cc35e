//! Real-or-complex values produced during evaluation
//!
//! Arithmetic stays in the reals as long as every operand is real and the
//! operation is defined there. Square roots and logarithms of negative
//! numbers, and negative bases raised to non-integer powers, step into the
//! complex plane; complex values then propagate through the remaining
//! operations. A result is only plottable when it classifies back to a
//! finite real (see [`Value::to_real`]).

use num_complex::Complex64;
use std::ops::{Add, Mul, Neg, Sub};

use super::{ExprResult, ExpressionError};

/// Largest imaginary magnitude still treated as a real result
pub const IMAGINARY_TOLERANCE: f64 = 1e-10;

/// A value in the evaluation domain
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// Real number
    Real(f64),

    /// Complex number
    Complex(Complex64),
}

impl Value {
    /// Widen to a complex number
    pub fn to_complex(self) -> Complex64 {
        match self {
            Self::Real(v) => Complex64::new(v, 0.0),
            Self::Complex(z) => z,
        }
    }

    /// Whether the value is held as a real number
    pub fn is_real(&self) -> bool {
        matches!(self, Self::Real(_))
    }

    /// Classify the value as a plottable real
    ///
    /// Returns `Some(y)` for finite reals and for complex values whose imaginary
    /// part is below `tolerance` in magnitude (reduced to the real part).
    /// Returns `None` for NaN, infinities, and genuinely complex values.
    ///
    /// # Examples
    ///
    /// ```
    /// use formula_explorer::expression::Value;
    /// use num_complex::Complex64;
    ///
    /// assert_eq!(Value::Real(2.0).to_real(1e-10), Some(2.0));
    /// assert_eq!(Value::Real(f64::NAN).to_real(1e-10), None);
    /// assert_eq!(Value::Complex(Complex64::new(-4.0, 1e-15)).to_real(1e-10), Some(-4.0));
    /// assert_eq!(Value::Complex(Complex64::new(0.0, 2.0)).to_real(1e-10), None);
    /// ```
    pub fn to_real(self, tolerance: f64) -> Option<f64> {
        let y = match self {
            Self::Real(v) => v,
            Self::Complex(z) if z.im.abs() < tolerance => z.re,
            Self::Complex(_) => return None,
        };
        y.is_finite().then_some(y)
    }

    /// Real part for comparisons; fails for values with a non-negligible imaginary part
    pub(crate) fn comparable(self, function: &str) -> ExprResult<f64> {
        match self {
            Self::Real(v) => Ok(v),
            Self::Complex(z) if z.im.abs() < IMAGINARY_TOLERANCE => Ok(z.re),
            Self::Complex(z) => Err(ExpressionError::InvalidOperation {
                message: format!("{}() cannot compare complex value {}", function, z),
            }),
        }
    }

    /// Division, failing on an exact zero divisor
    pub fn checked_div(self, rhs: Value) -> ExprResult<Value> {
        match (self, rhs) {
            (_, Self::Real(d)) if d == 0.0 => Err(ExpressionError::DivisionByZero),
            (Self::Real(n), Self::Real(d)) => Ok(Self::Real(n / d)),
            (n, d) => {
                let d = d.to_complex();
                if d.re == 0.0 && d.im == 0.0 {
                    Err(ExpressionError::DivisionByZero)
                } else {
                    Ok(Self::Complex(n.to_complex() / d))
                }
            }
        }
    }

    /// Exponentiation
    pub fn pow(self, exponent: Value) -> Value {
        match (self, exponent) {
            (Self::Real(base), Self::Real(exp)) => {
                if base >= 0.0 || exp.fract() == 0.0 || base.is_nan() {
                    Self::Real(base.powf(exp))
                } else {
                    Self::Complex(Complex64::new(base, 0.0).powf(exp))
                }
            }
            (base, exp) => Self::Complex(base.to_complex().powc(exp.to_complex())),
        }
    }

    /// Square root
    pub fn sqrt(self) -> Value {
        match self {
            Self::Real(v) if v >= 0.0 => Self::Real(v.sqrt()),
            Self::Real(v) if v < 0.0 => Self::Complex(Complex64::new(0.0, (-v).sqrt())),
            Self::Real(v) => Self::Real(v.sqrt()),
            Self::Complex(z) => Self::Complex(z.sqrt()),
        }
    }

    /// Natural logarithm
    pub fn ln(self) -> Value {
        match self {
            Self::Real(v) if v >= 0.0 || v.is_nan() => Self::Real(v.ln()),
            other => Self::Complex(other.to_complex().ln()),
        }
    }

    /// Base-10 logarithm
    pub fn log10(self) -> Value {
        match self {
            Self::Real(v) if v >= 0.0 || v.is_nan() => Self::Real(v.log10()),
            other => Self::Complex(other.to_complex().log10()),
        }
    }

    /// Absolute value (modulus for complex values)
    pub fn abs(self) -> Value {
        match self {
            Self::Real(v) => Self::Real(v.abs()),
            Self::Complex(z) => Self::Real(z.norm()),
        }
    }

    /// Apply a function that is defined on both the reals and the complex plane
    pub(crate) fn map(self, real: fn(f64) -> f64, complex: fn(Complex64) -> Complex64) -> Value {
        match self {
            Self::Real(v) => Self::Real(real(v)),
            Self::Complex(z) => Self::Complex(complex(z)),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl Neg for Value {
    type Output = Value;

    fn neg(self) -> Value {
        match self {
            Self::Real(v) => Self::Real(-v),
            Self::Complex(z) => Self::Complex(-z),
        }
    }
}

impl Add for Value {
    type Output = Value;

    fn add(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Self::Real(a), Self::Real(b)) => Self::Real(a + b),
            (a, b) => Self::Complex(a.to_complex() + b.to_complex()),
        }
    }
}

impl Sub for Value {
    type Output = Value;

    fn sub(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Self::Real(a), Self::Real(b)) => Self::Real(a - b),
            (a, b) => Self::Complex(a.to_complex() - b.to_complex()),
        }
    }
}

impl Mul for Value {
    type Output = Value;

    fn mul(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Self::Real(a), Self::Real(b)) => Self::Real(a * b),
            (a, b) => Self::Complex(a.to_complex() * b.to_complex()),
        }
    }
}
