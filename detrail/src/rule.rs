//! The trailing-default-argument rule.
//!
//! Two pure functions: [`is_eligible`] decides whether a call is worth
//! analyzing at all, and [`plan`] computes the maximal trailing run of
//! arguments that provably repeat their parameter defaults. Whenever
//! information is incomplete the answer degrades to "keep the argument";
//! the rule never guesses.

use crate::call::{CallSite, Callee, RemovalPlan};
use crate::constants::get_python_builtins;
use crate::signatures::DefaultMap;

/// Whether a call expression is a candidate for rewriting.
///
/// - A call with no positional arguments has nothing to remove.
/// - A bare call to a builtin name is rejected: builtins have no
///   introspectable declaration, and a wrong removal would silently change
///   behavior.
/// - A dynamic target (calling a call result, a subscript, a lambda) cannot
///   be verified to be a function symbol at all.
/// - Method and static calls are always candidates; when the signature index
///   cannot see the target, the planner simply finds nothing to remove.
#[must_use]
pub fn is_eligible(call: &CallSite) -> bool {
    if call.args.is_empty() {
        return false;
    }
    match &call.callee {
        Callee::Dynamic => false,
        Callee::Function { name } => !get_python_builtins().contains(name.as_str()),
        Callee::Method { .. } | Callee::Static { .. } | Callee::Receiver { .. } => true,
    }
}

/// Computes the removal plan for a call given its per-position defaults.
///
/// A position must be kept when it has no known default or when the argument
/// does not provably equal the default. The plan is the open suffix after the
/// highest kept position, so every planned position carries a known, matching
/// default by construction. Keyword arguments are outside the positional
/// model, and a `*spread` makes the parameter index of every later argument
/// depend on the spread's runtime length; either form disables planning for
/// the whole call.
#[must_use]
pub fn plan(call: &CallSite, defaults: &DefaultMap) -> RemovalPlan {
    let total = call.args.len();
    if total == 0 || call.has_keywords || call.args.iter().any(|arg| arg.starred) {
        return RemovalPlan::empty(total);
    }

    let mut last_kept: Option<usize> = None;
    for arg in &call.args {
        let kept = defaults
            .get(arg.position)
            .is_none_or(|default| !arg.value.proven_equal(default));
        if kept {
            last_kept = Some(arg.position);
        }
    }

    let first_removed = last_kept.map_or(0, |kept| kept + 1);
    RemovalPlan::suffix(first_removed, total)
}
