//! Call-site data contracts.
//!
//! A [`CallSite`] is a per-node snapshot of one call expression: its callee
//! shape, its positional arguments lowered to [`ArgValue`]s, and the byte
//! ranges needed to edit the source afterwards. Nothing here outlives the
//! evaluation of a single AST node.

use crate::value::ArgValue;
use ruff_text_size::TextRange;

/// How a call names its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callee {
    /// A bare function call, `f(...)`.
    Function {
        /// The function name.
        name: String,
    },
    /// A call through `self`, `self.m(...)`.
    Method {
        /// The method name.
        name: String,
    },
    /// A call through a class name, `C.m(...)`, or through `cls` inside a
    /// class body (which binds the same way).
    Static {
        /// The class name.
        class: String,
        /// The method name.
        name: String,
    },
    /// A call through an arbitrary receiver expression, `obj.m(...)`.
    /// The receiver's type is unknown, so no signature can be attached.
    Receiver {
        /// The method name.
        name: String,
    },
    /// A call whose target is not a name at all (a call result, a subscript,
    /// a lambda). Nothing can be verified about such a target.
    Dynamic,
}

impl Callee {
    /// Human-readable target name for findings.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::Function { name } | Self::Receiver { name } => name.clone(),
            Self::Method { name } => format!("self.{name}"),
            Self::Static { class, name } => format!("{class}.{name}"),
            Self::Dynamic => "<dynamic>".to_owned(),
        }
    }
}

/// A single positional argument of a call.
#[derive(Debug, Clone)]
pub struct CallArg {
    /// 0-based position in the argument list.
    pub position: usize,
    /// The lowered value expression.
    pub value: ArgValue,
    /// Whether this is a `*spread` argument. Spread arguments have no fixed
    /// arity, so their position (and everything after it) must be kept.
    pub starred: bool,
    /// Byte range of the argument expression in the source.
    pub range: TextRange,
}

/// One call expression, captured for analysis.
#[derive(Debug, Clone)]
pub struct CallSite {
    /// The callee shape.
    pub callee: Callee,
    /// Positional arguments, in order.
    pub args: Vec<CallArg>,
    /// Whether the call also carries keyword arguments. Keyword arguments are
    /// not positional; their presence disables planning for the whole call.
    pub has_keywords: bool,
    /// Byte range of the whole call expression.
    pub range: TextRange,
    /// Byte range of the parenthesized argument list, parentheses included.
    pub arguments_range: TextRange,
}

/// The set of argument positions to delete from a call.
///
/// Always empty or a contiguous suffix of the argument list: positional
/// binding means an argument may only be dropped when everything after it is
/// dropped too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalPlan {
    first: usize,
    total: usize,
}

impl RemovalPlan {
    /// The empty plan for a call with `total` arguments.
    #[must_use]
    pub fn empty(total: usize) -> Self {
        Self {
            first: total,
            total,
        }
    }

    /// The plan removing positions `first..total`.
    #[must_use]
    pub fn suffix(first: usize, total: usize) -> Self {
        Self {
            first: first.min(total),
            total,
        }
    }

    /// Whether nothing is removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first >= self.total
    }

    /// Number of removed positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.total - self.first
    }

    /// First removed position, if any.
    #[must_use]
    pub fn first_removed(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.first)
    }

    /// Whether every argument of the call is removed.
    #[must_use]
    pub fn removes_all(&self) -> bool {
        self.first == 0 && self.total > 0
    }

    /// The removed positions, ascending.
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.first..self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_is_a_suffix() {
        let plan = RemovalPlan::suffix(2, 5);
        assert_eq!(plan.positions().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.first_removed(), Some(2));
        assert!(!plan.removes_all());
    }

    #[test]
    fn empty_plan() {
        let plan = RemovalPlan::empty(3);
        assert!(plan.is_empty());
        assert_eq!(plan.len(), 0);
        assert_eq!(plan.first_removed(), None);
        assert_eq!(plan.positions().count(), 0);
    }

    #[test]
    fn full_plan() {
        let plan = RemovalPlan::suffix(0, 2);
        assert!(plan.removes_all());
        assert_eq!(plan.positions().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn suffix_clamps_past_the_end() {
        let plan = RemovalPlan::suffix(7, 3);
        assert!(plan.is_empty());
    }
}
