//! Signature index.
//!
//! Maps call targets to the parameter defaults declared in the same module.
//! The index is built once per file, before the rule runs, and stays
//! immutable for the whole pass. Resolution is deliberately conservative:
//! a target the index cannot see, a decorated definition (the wrapper may
//! change the signature), or a name bound more than once all resolve to
//! nothing, and the planner then finds nothing to remove.

use crate::call::Callee;
use crate::value::{self, ArgValue};
use compact_str::CompactString;
use ruff_python_ast::{self as ast, Stmt};
use rustc_hash::{FxHashMap, FxHashSet};

/// One declared positional parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    /// Parameter name.
    pub name: String,
    /// Declared default, lowered. `None` when the parameter has no default;
    /// an unprovable default lowers to `ArgValue::Opaque`, which never
    /// matches, so both cases keep the argument.
    pub default: Option<ArgValue>,
}

/// Positional parameters of one function or method declaration.
#[derive(Debug, Clone)]
pub struct FunctionSig {
    /// Positional-only and regular parameters, in declaration order.
    pub params: Vec<ParamSpec>,
}

/// How a method binds its first parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Plain method: `self` is bound when called on an instance.
    Instance,
    /// `@staticmethod`: no implicit first parameter.
    Static,
    /// `@classmethod`: `cls` is bound however the method is reached.
    Class,
}

/// A method declaration inside a class body.
#[derive(Debug, Clone)]
pub struct MethodSig {
    /// The parameter list.
    pub sig: FunctionSig,
    /// The binding kind.
    pub kind: MethodKind,
}

/// A recorded symbol: either one reliable declaration or a name that was
/// bound more than once (or decorated) and must not be trusted.
#[derive(Debug, Clone)]
enum Slot<T> {
    Known(T),
    Ambiguous,
}

/// Per-call mapping from argument position to the declared default.
///
/// Absence at a position means "no known default"; the planner cannot tell
/// that apart from "no default at all", and both keep the argument.
#[derive(Debug, Clone, Default)]
pub struct DefaultMap {
    slots: Vec<Option<ArgValue>>,
}

impl DefaultMap {
    /// A map with no known defaults for a call with `len` arguments.
    #[must_use]
    pub fn empty(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    /// Builds a map directly from per-position slots.
    #[must_use]
    pub fn from_slots(slots: Vec<Option<ArgValue>>) -> Self {
        Self { slots }
    }

    /// Projects a signature onto call positions. Call position `k` maps to
    /// parameter `k + shift`; the shift accounts for an implicitly bound
    /// `self`/`cls`. Positions past the declared parameters stay unknown.
    #[must_use]
    pub fn from_signature(sig: &FunctionSig, shift: usize, arg_count: usize) -> Self {
        let slots = (0..arg_count)
            .map(|position| {
                sig.params
                    .get(position + shift)
                    .and_then(|param| param.default.clone())
            })
            .collect();
        Self { slots }
    }

    /// The known default at a call position, if any.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&ArgValue> {
        self.slots.get(position).and_then(Option::as_ref)
    }
}

/// Index of the declarations visible at module level.
#[derive(Debug, Default)]
pub struct SignatureIndex {
    functions: FxHashMap<String, Slot<FunctionSig>>,
    methods: FxHashMap<(CompactString, CompactString), Slot<MethodSig>>,
    classes: FxHashSet<String>,
}

impl SignatureIndex {
    /// Builds the index from a module body.
    ///
    /// Only module-level `def`s and classes are indexed; a call to a nested
    /// or imported function simply resolves to nothing. A name that is also
    /// the target of an assignment is dropped again - the binding the call
    /// actually reaches is unknowable without data flow.
    #[must_use]
    pub fn build(module: &[Stmt]) -> Self {
        let mut index = Self::default();
        let mut assigned: FxHashSet<String> = FxHashSet::default();

        for stmt in module {
            match stmt {
                Stmt::FunctionDef(def) => index.record_function(def),
                Stmt::ClassDef(def) => index.record_class(def),
                Stmt::Assign(node) => {
                    for target in &node.targets {
                        if let ast::Expr::Name(name) = target {
                            assigned.insert(name.id.to_string());
                        }
                    }
                }
                Stmt::AnnAssign(node) => {
                    if let ast::Expr::Name(name) = &*node.target {
                        assigned.insert(name.id.to_string());
                    }
                }
                _ => {}
            }
        }

        for name in &assigned {
            if let Some(slot) = index.functions.get_mut(name) {
                *slot = Slot::Ambiguous;
            }
            index.classes.remove(name);
        }

        index
    }

    /// Whether `name` is an indexed class.
    #[must_use]
    pub fn is_class(&self, name: &str) -> bool {
        self.classes.contains(name)
    }

    /// Resolves a callee to its per-position defaults for a call with
    /// `arg_count` positional arguments. `enclosing_class` is the class whose
    /// body the call appears in, used for `self.m(...)` targets.
    #[must_use]
    pub fn defaults_for(
        &self,
        callee: &Callee,
        enclosing_class: Option<&str>,
        arg_count: usize,
    ) -> DefaultMap {
        let resolved: Option<(&FunctionSig, usize)> = match callee {
            Callee::Function { name } => {
                if self.classes.contains(name.as_str()) {
                    // Constructor call: defaults come from __init__, with the
                    // instance bound past the argument list.
                    self.method(name, "__init__").and_then(|m| match m.kind {
                        MethodKind::Instance => Some((&m.sig, 1)),
                        MethodKind::Static | MethodKind::Class => None,
                    })
                } else {
                    self.function(name).map(|sig| (sig, 0))
                }
            }
            Callee::Static { class, name } => self.method(class, name).map(|m| match m.kind {
                MethodKind::Class => (&m.sig, 1),
                // Reaching a plain method through the class passes the
                // instance explicitly, so positions line up unshifted.
                MethodKind::Instance | MethodKind::Static => (&m.sig, 0),
            }),
            Callee::Method { name } => enclosing_class.and_then(|class| {
                self.method(class, name).map(|m| match m.kind {
                    MethodKind::Instance | MethodKind::Class => (&m.sig, 1),
                    MethodKind::Static => (&m.sig, 0),
                })
            }),
            Callee::Receiver { .. } | Callee::Dynamic => None,
        };

        match resolved {
            Some((sig, shift)) => DefaultMap::from_signature(sig, shift, arg_count),
            None => DefaultMap::empty(arg_count),
        }
    }

    fn function(&self, name: &str) -> Option<&FunctionSig> {
        match self.functions.get(name)? {
            Slot::Known(sig) => Some(sig),
            Slot::Ambiguous => None,
        }
    }

    fn method(&self, class: &str, name: &str) -> Option<&MethodSig> {
        let key = (CompactString::from(class), CompactString::from(name));
        match self.methods.get(&key)? {
            Slot::Known(sig) => Some(sig),
            Slot::Ambiguous => None,
        }
    }

    fn record_function(&mut self, def: &ast::StmtFunctionDef) {
        let name = def.name.to_string();
        // A decorated def is indexed as ambiguous: the wrapper may accept a
        // different argument list than the declaration shows.
        let slot = if def.decorator_list.is_empty() {
            Slot::Known(FunctionSig {
                params: extract_params(&def.parameters),
            })
        } else {
            Slot::Ambiguous
        };
        insert_or_poison(&mut self.functions, name, slot);
    }

    fn record_class(&mut self, def: &ast::StmtClassDef) {
        // Decorated classes (@dataclass and friends) can synthesize or
        // replace methods; skip the whole class.
        if !def.decorator_list.is_empty() {
            return;
        }

        let class = def.name.to_string();
        self.classes.insert(class.clone());

        for stmt in &def.body {
            if let Stmt::FunctionDef(method) = stmt {
                let kind = match method_kind(method) {
                    Some(kind) => kind,
                    None => {
                        let key = (
                            CompactString::from(class.as_str()),
                            CompactString::from(method.name.as_str()),
                        );
                        self.methods.insert(key, Slot::Ambiguous);
                        continue;
                    }
                };
                let key = (
                    CompactString::from(class.as_str()),
                    CompactString::from(method.name.as_str()),
                );
                let slot = Slot::Known(MethodSig {
                    sig: FunctionSig {
                        params: extract_params(&method.parameters),
                    },
                    kind,
                });
                insert_or_poison(&mut self.methods, key, slot);
            }
        }
    }
}

/// Classifies a method's binding from its decorators. `None` means the
/// decoration is not understood and the method must not be trusted.
fn method_kind(def: &ast::StmtFunctionDef) -> Option<MethodKind> {
    match def.decorator_list.as_slice() {
        [] => Some(MethodKind::Instance),
        [decorator] => match &decorator.expression {
            ast::Expr::Name(name) if name.id.as_str() == "staticmethod" => {
                Some(MethodKind::Static)
            }
            ast::Expr::Name(name) if name.id.as_str() == "classmethod" => Some(MethodKind::Class),
            _ => None,
        },
        _ => None,
    }
}

/// Positional-only and regular parameters, in order.
fn extract_params(parameters: &ast::Parameters) -> Vec<ParamSpec> {
    parameters
        .posonlyargs
        .iter()
        .chain(&parameters.args)
        .map(|param| ParamSpec {
            name: param.parameter.name.to_string(),
            default: param.default.as_deref().map(value::lower),
        })
        .collect()
}

fn insert_or_poison<K: std::hash::Hash + Eq, T>(
    map: &mut FxHashMap<K, Slot<T>>,
    key: K,
    slot: Slot<T>,
) {
    use std::collections::hash_map::Entry;
    match map.entry(key) {
        Entry::Vacant(entry) => {
            entry.insert(slot);
        }
        Entry::Occupied(mut entry) => {
            // Redefinition: the call site could reach either binding.
            entry.insert(Slot::Ambiguous);
        }
    }
}
