//! Compilation of a syntax tree against a parameter shape
//!
//! Compiling resolves every identifier once: to the free variable, to a
//! parameter slot, to a built-in constant, or to an unresolved name that
//! fails when evaluated. Function names and argument counts are checked here
//! so that a compiled expression can only fail at evaluation time on values.

use super::ast::{BinaryOp, Expression, UnaryOp};
use super::builtins::{constant, Function, FREE_VARIABLE};
use super::value::Value;
use super::{ExprResult, ExpressionError};

/// Ordered parameter names an expression is compiled against
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ParameterShape {
    names: Vec<String>,
}

impl ParameterShape {
    /// Create a shape from parameter names, in binding order
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Parameter names in binding order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the shape has no parameters
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Slot index of a parameter name (first occurrence)
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Check that no parameter uses the free variable name and that names are unique
    pub fn validate(&self) -> ExprResult<()> {
        for (i, name) in self.names.iter().enumerate() {
            if name == FREE_VARIABLE {
                return Err(ExpressionError::ReservedName { name: name.clone() });
            }
            if self.names[..i].contains(name) {
                return Err(ExpressionError::DuplicateParameter { name: name.clone() });
            }
        }
        Ok(())
    }
}

/// Values bound for one evaluation: parameter values in shape order plus `x`
///
/// A binding only borrows the parameter values immutably, so each sample
/// evaluates against its own binding and nothing can leak between samples.
#[derive(Debug, Clone, Copy)]
pub struct Binding<'a> {
    params: &'a [f64],
    x: f64,
}

impl<'a> Binding<'a> {
    /// Bind parameter values and the free variable
    ///
    /// Fails when the shape is invalid (reserved or duplicate names) or when
    /// the number of values does not match the shape.
    pub fn new(shape: &ParameterShape, params: &'a [f64], x: f64) -> ExprResult<Self> {
        shape.validate()?;
        if params.len() != shape.len() {
            return Err(ExpressionError::ShapeMismatch {
                expected: shape.len(),
                found: params.len(),
            });
        }
        Ok(Self { params, x })
    }

    /// Value of the free variable
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Value of the parameter in `slot`
    pub fn param(&self, slot: usize) -> Option<f64> {
        self.params.get(slot).copied()
    }
}

/// Where an identifier's value comes from
#[derive(Debug, Clone, PartialEq)]
enum Slot {
    FreeVariable,
    Parameter(usize),
    Constant(f64),
    Unresolved(String),
}

/// Compiled expression node
#[derive(Debug, Clone, PartialEq)]
enum Node {
    Literal(f64),
    Load(Slot),
    Unary(UnaryOp, Box<Node>),
    Binary(BinaryOp, Box<Node>, Box<Node>),
    Call(Function, Vec<Node>),
}

/// An expression compiled once for repeated evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    source: String,
    shape: ParameterShape,
    root: Node,
}

impl CompiledExpression {
    /// Parse and compile an expression against a parameter shape
    ///
    /// # Errors
    ///
    /// Returns an error if the expression does not parse, calls an unknown
    /// function, or calls a function with the wrong number of arguments.
    /// Identifiers that resolve to nothing are not errors here; they fail
    /// with [`ExpressionError::UndefinedVariable`] when evaluated.
    pub fn compile(source: &str, shape: &ParameterShape) -> ExprResult<Self> {
        let expression = Expression::parse(source)?;
        let root = lower(&expression, shape)?;
        Ok(Self {
            source: source.to_string(),
            shape: shape.clone(),
            root,
        })
    }

    /// Source text the expression was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parameter shape the expression was compiled against
    pub fn shape(&self) -> &ParameterShape {
        &self.shape
    }

    /// Identifiers that did not resolve to `x`, a parameter or a constant
    pub fn unresolved(&self) -> Vec<String> {
        let mut names = Vec::new();
        collect_unresolved(&self.root, &mut names);
        names.sort();
        names.dedup();
        names
    }

    /// Evaluate against a binding
    pub fn evaluate(&self, binding: &Binding<'_>) -> ExprResult<Value> {
        eval(&self.root, binding)
    }
}

fn lower(expression: &Expression, shape: &ParameterShape) -> ExprResult<Node> {
    let node = match expression {
        Expression::Number(n) => Node::Literal(*n),
        Expression::Variable(name) => Node::Load(resolve(name, shape)),
        Expression::Unary(op, operand) => Node::Unary(*op, Box::new(lower(operand, shape)?)),
        Expression::Binary(op, left, right) => Node::Binary(
            *op,
            Box::new(lower(left, shape)?),
            Box::new(lower(right, shape)?),
        ),
        Expression::Function(name, args) => {
            let function = Function::lookup(name)
                .ok_or_else(|| ExpressionError::UndefinedFunction { name: name.clone() })?;
            function.check_arity(args.len())?;
            let args = args
                .iter()
                .map(|arg| lower(arg, shape))
                .collect::<ExprResult<Vec<_>>>()?;
            Node::Call(function, args)
        }
    };
    Ok(node)
}

/// Resolution order: free variable, parameters (shadowing constants), constants
fn resolve(name: &str, shape: &ParameterShape) -> Slot {
    if name == FREE_VARIABLE {
        Slot::FreeVariable
    } else if let Some(slot) = shape.index_of(name) {
        Slot::Parameter(slot)
    } else if let Some(value) = constant(name) {
        Slot::Constant(value)
    } else {
        Slot::Unresolved(name.to_string())
    }
}

fn collect_unresolved(node: &Node, names: &mut Vec<String>) {
    match node {
        Node::Literal(_) => {}
        Node::Load(Slot::Unresolved(name)) => names.push(name.clone()),
        Node::Load(_) => {}
        Node::Unary(_, operand) => collect_unresolved(operand, names),
        Node::Binary(_, left, right) => {
            collect_unresolved(left, names);
            collect_unresolved(right, names);
        }
        Node::Call(_, args) => {
            for arg in args {
                collect_unresolved(arg, names);
            }
        }
    }
}

fn eval(node: &Node, binding: &Binding<'_>) -> ExprResult<Value> {
    match node {
        Node::Literal(n) => Ok(Value::Real(*n)),

        Node::Load(slot) => match slot {
            Slot::FreeVariable => Ok(Value::Real(binding.x())),
            Slot::Parameter(index) => binding.param(*index).map(Value::Real).ok_or_else(|| {
                ExpressionError::ShapeMismatch {
                    expected: index + 1,
                    found: binding.params.len(),
                }
            }),
            Slot::Constant(value) => Ok(Value::Real(*value)),
            Slot::Unresolved(name) => Err(ExpressionError::UndefinedVariable { name: name.clone() }),
        },

        Node::Unary(op, operand) => {
            let value = eval(operand, binding)?;
            match op {
                UnaryOp::Neg => Ok(-value),
            }
        }

        Node::Binary(op, left, right) => {
            let lhs = eval(left, binding)?;
            let rhs = eval(right, binding)?;

            match op {
                BinaryOp::Add => Ok(lhs + rhs),
                BinaryOp::Sub => Ok(lhs - rhs),
                BinaryOp::Mul => Ok(lhs * rhs),
                BinaryOp::Div => lhs.checked_div(rhs),
                BinaryOp::Pow => Ok(lhs.pow(rhs)),
            }
        }

        Node::Call(function, args) => {
            let evaluated = args
                .iter()
                .map(|arg| eval(arg, binding))
                .collect::<ExprResult<Vec<_>>>()?;
            function.apply(&evaluated)
        }
    }
}
