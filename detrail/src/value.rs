//! Lowered expression values.
//!
//! Arguments and declared defaults are lowered out of the AST into a small
//! tagged value tree before being compared. The tree covers the expression
//! forms that can be proven equal by content alone: literals, names, dotted
//! paths, negated numbers, and container displays of those. Everything else
//! lowers to [`ArgValue::Opaque`], which compares equal to nothing - not even
//! to itself - so an undecidable comparison always keeps the argument.

use ruff_python_ast::{self as ast, Expr};

/// A value expression, lowered for content comparison.
#[derive(Debug, Clone)]
pub enum ArgValue {
    /// The `None` literal.
    None,
    /// The `...` literal.
    Ellipsis,
    /// `True` or `False`.
    Bool(bool),
    /// Integer literal, in the lexer's canonical decimal form
    /// (`1_000` and `1000` lower identically).
    Int(String),
    /// Float literal.
    Float(f64),
    /// Complex literal.
    Complex {
        /// Real part.
        real: f64,
        /// Imaginary part.
        imag: f64,
    },
    /// String literal (cooked value; quoting style and implicit
    /// concatenation are insignificant).
    Str(String),
    /// Bytes literal, in its canonical escaped form.
    Bytes(String),
    /// A bare name.
    Name(String),
    /// A dotted path of names, e.g. `module.CONST`.
    Path(Vec<String>),
    /// A negated numeric literal.
    Neg(Box<ArgValue>),
    /// Tuple display.
    Tuple(Vec<ArgValue>),
    /// List display.
    List(Vec<ArgValue>),
    /// Set display.
    Set(Vec<ArgValue>),
    /// Dict display; a `None` key is a `**` expansion entry.
    Dict(Vec<(Option<ArgValue>, ArgValue)>),
    /// Anything whose value cannot be established from the text alone.
    Opaque,
}

impl ArgValue {
    /// Whether `self` and `other` provably denote the same value.
    ///
    /// Unprovable is unequal: `Opaque` on either side fails, and so do
    /// mismatched variants (`1` vs `1.0` stays distinguishable in Python,
    /// so they do not compare equal here).
    #[must_use]
    pub fn proven_equal(&self, other: &ArgValue) -> bool {
        match (self, other) {
            (Self::None, Self::None) | (Self::Ellipsis, Self::Ellipsis) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            // Exact literal equality, not arithmetic closeness. NaN fails
            // the comparison, which keeps the argument.
            #[allow(clippy::float_cmp)]
            (Self::Float(a), Self::Float(b)) => a == b,
            #[allow(clippy::float_cmp)]
            (
                Self::Complex { real: ar, imag: ai },
                Self::Complex { real: br, imag: bi },
            ) => ar == br && ai == bi,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Name(a), Self::Name(b)) => a == b,
            (Self::Path(a), Self::Path(b)) => a == b,
            (Self::Neg(a), Self::Neg(b)) => a.proven_equal(b),
            (Self::Tuple(a), Self::Tuple(b))
            | (Self::List(a), Self::List(b))
            | (Self::Set(a), Self::Set(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.proven_equal(y))
            }
            (Self::Dict(a), Self::Dict(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|((ka, va), (kb, vb))| {
                        let keys_match = match (ka, kb) {
                            (Some(x), Some(y)) => x.proven_equal(y),
                            (None, None) => true,
                            _ => false,
                        };
                        keys_match && va.proven_equal(vb)
                    })
            }
            _ => false,
        }
    }
}

/// Lowers an AST expression into an [`ArgValue`].
#[must_use]
pub fn lower(expr: &Expr) -> ArgValue {
    match expr {
        Expr::NoneLiteral(_) => ArgValue::None,
        Expr::EllipsisLiteral(_) => ArgValue::Ellipsis,
        Expr::BooleanLiteral(node) => ArgValue::Bool(node.value),
        Expr::NumberLiteral(node) => match &node.value {
            ast::Number::Int(i) => ArgValue::Int(i.to_string()),
            ast::Number::Float(f) => ArgValue::Float(*f),
            ast::Number::Complex { real, imag } => ArgValue::Complex {
                real: *real,
                imag: *imag,
            },
        },
        Expr::StringLiteral(node) => ArgValue::Str(node.value.to_string()),
        Expr::BytesLiteral(node) => {
            ArgValue::Bytes(String::from_utf8_lossy(&node.value.bytes().collect::<Vec<u8>>()).into_owned())
        }
        Expr::Name(node) => ArgValue::Name(node.id.to_string()),
        Expr::Attribute(_) => lower_dotted_path(expr).map_or(ArgValue::Opaque, ArgValue::Path),
        Expr::UnaryOp(node) if matches!(node.op, ast::UnaryOp::USub) => {
            match lower(&node.operand) {
                value @ (ArgValue::Int(_) | ArgValue::Float(_) | ArgValue::Complex { .. }) => {
                    ArgValue::Neg(Box::new(value))
                }
                _ => ArgValue::Opaque,
            }
        }
        Expr::Tuple(node) => ArgValue::Tuple(node.elts.iter().map(lower).collect()),
        Expr::List(node) => ArgValue::List(node.elts.iter().map(lower).collect()),
        Expr::Set(node) => ArgValue::Set(node.elts.iter().map(lower).collect()),
        Expr::Dict(node) => ArgValue::Dict(
            node.items
                .iter()
                .map(|item| (item.key.as_ref().map(lower), lower(&item.value)))
                .collect(),
        ),
        _ => ArgValue::Opaque,
    }
}

/// Flattens a chain of attribute accesses over a base name into `["a", "b", "c"]`.
/// Any other base (a call, a subscript) makes the path unprovable.
fn lower_dotted_path(expr: &Expr) -> Option<Vec<String>> {
    match expr {
        Expr::Name(node) => Some(vec![node.id.to_string()]),
        Expr::Attribute(node) => {
            let mut path = lower_dotted_path(&node.value)?;
            path.push(node.attr.to_string());
            Some(path)
        }
        _ => None,
    }
}
