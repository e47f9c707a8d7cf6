//! Per-file rule driver.
//!
//! Walks a parsed module, feeds every call expression through the
//! gate -> resolver -> planner pipeline, and turns non-empty plans into
//! byte-range deletions. Each node is visited exactly once; a single pass is
//! enough because rewriting is idempotent.

use crate::call::{CallArg, CallSite, Callee};
use crate::constants::RULE_ID;
use crate::fix::Edit;
use crate::rule;
use crate::signatures::SignatureIndex;
use crate::utils::LineIndex;
use crate::value::{self, ArgValue};
use compact_str::CompactString;
use ruff_python_ast::{self as ast, Expr, Stmt};
use ruff_text_size::Ranged;
use rustc_hash::FxHashSet;
use serde::Serialize;
use smallvec::SmallVec;
use std::path::{Path, PathBuf};

/// A single rewritable call site found in a file.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    /// ID of the rule that triggered the finding.
    pub rule_id: String,
    /// Description of the redundancy.
    pub message: String,
    /// File where the call was found.
    pub file: PathBuf,
    /// Line number.
    pub line: usize,
    /// Column number.
    pub col: usize,
    /// Call target, for display.
    pub callee: String,
    /// Number of trailing arguments that repeat their defaults.
    pub removable: usize,
}

/// Findings and edits produced by one pass over a file.
#[derive(Debug, Default)]
pub struct DriveOutcome {
    /// One finding per rewritable call.
    pub findings: Vec<Finding>,
    /// One deletion per rewritable call. Removed arguments never contain
    /// further rewritable calls (a call makes a value unprovable), so the
    /// edits are disjoint by construction.
    pub edits: Vec<Edit>,
}

/// Visitor that applies the rule to every call expression in a module.
pub struct RuleDriver<'a> {
    index: &'a SignatureIndex,
    line_index: &'a LineIndex,
    ignored_lines: &'a FxHashSet<usize>,
    file: &'a Path,
    /// Stack of enclosing class names, for resolving `self.m(...)`.
    class_stack: SmallVec<[CompactString; 4]>,
    outcome: DriveOutcome,
}

impl<'a> RuleDriver<'a> {
    /// Creates a driver for one file.
    #[must_use]
    pub fn new(
        index: &'a SignatureIndex,
        line_index: &'a LineIndex,
        ignored_lines: &'a FxHashSet<usize>,
        file: &'a Path,
    ) -> Self {
        Self {
            index,
            line_index,
            ignored_lines,
            file,
            class_stack: SmallVec::new(),
            outcome: DriveOutcome::default(),
        }
    }

    /// Runs the pass over a module body.
    #[must_use]
    pub fn drive(mut self, module: &[Stmt]) -> DriveOutcome {
        for stmt in module {
            self.visit_stmt(stmt);
        }
        self.outcome
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::FunctionDef(node) => {
                for decorator in &node.decorator_list {
                    self.visit_expr(&decorator.expression);
                }
                self.visit_parameters(&node.parameters);
                for s in &node.body {
                    self.visit_stmt(s);
                }
            }
            Stmt::ClassDef(node) => {
                for decorator in &node.decorator_list {
                    self.visit_expr(&decorator.expression);
                }
                if let Some(arguments) = &node.arguments {
                    for base in &arguments.args {
                        self.visit_expr(base);
                    }
                    for keyword in &arguments.keywords {
                        self.visit_expr(&keyword.value);
                    }
                }
                self.class_stack
                    .push(CompactString::from(node.name.as_str()));
                for s in &node.body {
                    self.visit_stmt(s);
                }
                self.class_stack.pop();
            }
            Stmt::If(node) => {
                self.visit_expr(&node.test);
                for s in &node.body {
                    self.visit_stmt(s);
                }
                for clause in &node.elif_else_clauses {
                    if let Some(test) = &clause.test {
                        self.visit_expr(test);
                    }
                    for s in &clause.body {
                        self.visit_stmt(s);
                    }
                }
            }
            Stmt::For(node) => {
                self.visit_expr(&node.iter);
                for s in &node.body {
                    self.visit_stmt(s);
                }
                for s in &node.orelse {
                    self.visit_stmt(s);
                }
            }
            Stmt::While(node) => {
                self.visit_expr(&node.test);
                for s in &node.body {
                    self.visit_stmt(s);
                }
                for s in &node.orelse {
                    self.visit_stmt(s);
                }
            }
            Stmt::Try(node) => {
                for s in &node.body {
                    self.visit_stmt(s);
                }
                for handler in &node.handlers {
                    let ast::ExceptHandler::ExceptHandler(h) = handler;
                    if let Some(type_) = &h.type_ {
                        self.visit_expr(type_);
                    }
                    for s in &h.body {
                        self.visit_stmt(s);
                    }
                }
                for s in &node.orelse {
                    self.visit_stmt(s);
                }
                for s in &node.finalbody {
                    self.visit_stmt(s);
                }
            }
            Stmt::With(node) => {
                for item in &node.items {
                    self.visit_expr(&item.context_expr);
                }
                for s in &node.body {
                    self.visit_stmt(s);
                }
            }
            Stmt::Match(node) => {
                self.visit_expr(&node.subject);
                for case in &node.cases {
                    if let Some(guard) = &case.guard {
                        self.visit_expr(guard);
                    }
                    for s in &case.body {
                        self.visit_stmt(s);
                    }
                }
            }
            Stmt::Expr(node) => self.visit_expr(&node.value),
            Stmt::Assign(node) => {
                self.visit_expr(&node.value);
                for target in &node.targets {
                    self.visit_expr(target);
                }
            }
            Stmt::AnnAssign(node) => {
                if let Some(value) = &node.value {
                    self.visit_expr(value);
                }
                self.visit_expr(&node.target);
            }
            Stmt::AugAssign(node) => {
                self.visit_expr(&node.value);
                self.visit_expr(&node.target);
            }
            Stmt::Return(node) => {
                if let Some(value) = &node.value {
                    self.visit_expr(value);
                }
            }
            Stmt::Raise(node) => {
                if let Some(exc) = &node.exc {
                    self.visit_expr(exc);
                }
                if let Some(cause) = &node.cause {
                    self.visit_expr(cause);
                }
            }
            Stmt::Assert(node) => {
                self.visit_expr(&node.test);
                if let Some(msg) = &node.msg {
                    self.visit_expr(msg);
                }
            }
            Stmt::Delete(node) => {
                for target in &node.targets {
                    self.visit_expr(target);
                }
            }
            _ => {}
        }
    }

    fn visit_parameters(&mut self, parameters: &ast::Parameters) {
        for param in parameters
            .posonlyargs
            .iter()
            .chain(&parameters.args)
            .chain(&parameters.kwonlyargs)
        {
            if let Some(default) = &param.default {
                self.visit_expr(default);
            }
            if let Some(annotation) = &param.parameter.annotation {
                self.visit_expr(annotation);
            }
        }
        if let Some(vararg) = &parameters.vararg {
            if let Some(annotation) = &vararg.annotation {
                self.visit_expr(annotation);
            }
        }
        if let Some(kwarg) = &parameters.kwarg {
            if let Some(annotation) = &kwarg.annotation {
                self.visit_expr(annotation);
            }
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Call(node) => {
                self.handle_call(node);
                self.visit_expr(&node.func);
                for arg in &node.arguments.args {
                    self.visit_expr(arg);
                }
                for keyword in &node.arguments.keywords {
                    self.visit_expr(&keyword.value);
                }
            }
            Expr::Attribute(node) => self.visit_expr(&node.value),
            Expr::BinOp(node) => {
                self.visit_expr(&node.left);
                self.visit_expr(&node.right);
            }
            Expr::UnaryOp(node) => self.visit_expr(&node.operand),
            Expr::BoolOp(node) => {
                for v in &node.values {
                    self.visit_expr(v);
                }
            }
            Expr::Compare(node) => {
                self.visit_expr(&node.left);
                for comparator in &node.comparators {
                    self.visit_expr(comparator);
                }
            }
            Expr::If(node) => {
                self.visit_expr(&node.test);
                self.visit_expr(&node.body);
                self.visit_expr(&node.orelse);
            }
            Expr::Named(node) => {
                self.visit_expr(&node.target);
                self.visit_expr(&node.value);
            }
            Expr::List(node) => {
                for elt in &node.elts {
                    self.visit_expr(elt);
                }
            }
            Expr::Tuple(node) => {
                for elt in &node.elts {
                    self.visit_expr(elt);
                }
            }
            Expr::Set(node) => {
                for elt in &node.elts {
                    self.visit_expr(elt);
                }
            }
            Expr::Dict(node) => {
                for item in &node.items {
                    if let Some(key) = &item.key {
                        self.visit_expr(key);
                    }
                    self.visit_expr(&item.value);
                }
            }
            Expr::Subscript(node) => {
                self.visit_expr(&node.value);
                self.visit_expr(&node.slice);
            }
            Expr::Slice(node) => {
                if let Some(lower) = &node.lower {
                    self.visit_expr(lower);
                }
                if let Some(upper) = &node.upper {
                    self.visit_expr(upper);
                }
                if let Some(step) = &node.step {
                    self.visit_expr(step);
                }
            }
            Expr::Starred(node) => self.visit_expr(&node.value),
            Expr::Yield(node) => {
                if let Some(value) = &node.value {
                    self.visit_expr(value);
                }
            }
            Expr::YieldFrom(node) => self.visit_expr(&node.value),
            Expr::Await(node) => self.visit_expr(&node.value),
            Expr::Lambda(node) => {
                if let Some(parameters) = &node.parameters {
                    self.visit_parameters(parameters);
                }
                self.visit_expr(&node.body);
            }
            Expr::ListComp(node) => {
                self.visit_expr(&node.elt);
                self.visit_generators(&node.generators);
            }
            Expr::SetComp(node) => {
                self.visit_expr(&node.elt);
                self.visit_generators(&node.generators);
            }
            Expr::DictComp(node) => {
                if let Some(key) = &node.key {
                    self.visit_expr(key);
                }
                self.visit_expr(&node.value);
                self.visit_generators(&node.generators);
            }
            Expr::Generator(node) => {
                self.visit_expr(&node.elt);
                self.visit_generators(&node.generators);
            }
            _ => {}
        }
    }

    fn visit_generators(&mut self, generators: &[ast::Comprehension]) {
        for generator in generators {
            self.visit_expr(&generator.iter);
            for if_expr in &generator.ifs {
                self.visit_expr(if_expr);
            }
        }
    }

    fn handle_call(&mut self, node: &ast::ExprCall) {
        let site = self.lower_call(node);
        if !rule::is_eligible(&site) {
            return;
        }

        let line = self.line_index.line_index(site.range.start());
        if self.ignored_lines.contains(&line) {
            return;
        }

        let enclosing = self.class_stack.last().map(CompactString::as_str);
        let defaults = self
            .index
            .defaults_for(&site.callee, enclosing, site.args.len());
        let plan = rule::plan(&site, &defaults);
        let Some(first_removed) = plan.first_removed() else {
            return;
        };

        let edit = if plan.removes_all() {
            // Replace the whole parenthesized list so interior whitespace
            // disappears along with the arguments.
            Edit::new(
                site.arguments_range.start().to_usize(),
                site.arguments_range.end().to_usize(),
                "()",
            )
        } else {
            let prev_end = site.args[first_removed - 1].range.end().to_usize();
            let last_end = site.args[site.args.len() - 1].range.end().to_usize();
            Edit::delete(prev_end, last_end)
        };

        let callee = site.callee.display_name();
        let noun = if plan.len() == 1 {
            "argument repeats its declared default".to_owned()
        } else {
            format!("{} arguments repeat their declared defaults", plan.len())
        };
        self.outcome.findings.push(Finding {
            rule_id: RULE_ID.to_owned(),
            message: format!("Trailing {noun} in call to `{callee}`"),
            file: self.file.to_path_buf(),
            line,
            col: self.line_index.column_index(site.range.start()),
            callee,
            removable: plan.len(),
        });
        self.outcome.edits.push(edit);
    }

    fn lower_call(&self, node: &ast::ExprCall) -> CallSite {
        let args = node
            .arguments
            .args
            .iter()
            .enumerate()
            .map(|(position, expr)| match expr {
                Expr::Starred(_) => CallArg {
                    position,
                    value: ArgValue::Opaque,
                    starred: true,
                    range: expr.range(),
                },
                _ => CallArg {
                    position,
                    value: value::lower(expr),
                    starred: false,
                    range: expr.range(),
                },
            })
            .collect();

        CallSite {
            callee: self.classify_callee(&node.func),
            args,
            has_keywords: !node.arguments.keywords.is_empty(),
            range: node.range(),
            arguments_range: node.arguments.range(),
        }
    }

    fn classify_callee(&self, func: &Expr) -> Callee {
        match func {
            Expr::Name(name) => Callee::Function {
                name: name.id.to_string(),
            },
            Expr::Attribute(attr) => {
                let method = attr.attr.to_string();
                if let Expr::Name(base) = &*attr.value {
                    let base_id = base.id.as_str();
                    if base_id == "self" && !self.class_stack.is_empty() {
                        return Callee::Method { name: method };
                    }
                    // `cls.m(...)` reaches the method the same way the class
                    // name does.
                    if base_id == "cls" {
                        if let Some(class) = self.class_stack.last() {
                            return Callee::Static {
                                class: class.to_string(),
                                name: method,
                            };
                        }
                    }
                    if self.index.is_class(base_id) {
                        return Callee::Static {
                            class: base_id.to_owned(),
                            name: method,
                        };
                    }
                }
                Callee::Receiver { name: method }
            }
            _ => Callee::Dynamic,
        }
    }
}
