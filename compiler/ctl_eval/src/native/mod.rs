//! Native (host) functions.
//!
//! A [`NativeRegistry`] holds every overload a program may call. Front-ends
//! resolve a call to one overload at build time by minimal total type
//! [`distance`]; the chosen [`NativeId`] is stored in the call node and the
//! executor dispatches on it without further checks.

mod stdlib;

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use ctl_ir::{NativeId, Span};
use ctl_types::{distance, Name, NativeType, Type, TypeError, DISTANCE_MAX, TYPE_VARIABLE_DISTANCE};
use ctl_value::Value;
use rustc_hash::FxHashMap;

use crate::errors::HostError;
use crate::logger::ScriptLogger;

pub use stdlib::register_stdlib;

/// What a native function sees of its caller.
pub struct CallContext<'a> {
    pub function: &'a str,
    /// Position of the call node.
    pub span: Span,
    pub logger: &'a dyn ScriptLogger,
}

/// A host function callable from scripts.
pub trait NativeFunction: Send + Sync {
    fn call(&self, args: &[Value], ctx: &CallContext<'_>) -> Result<Value, HostError>;
}

impl<F> NativeFunction for F
where
    F: Fn(&[Value], &CallContext<'_>) -> Result<Value, HostError> + Send + Sync,
{
    fn call(&self, args: &[Value], ctx: &CallContext<'_>) -> Result<Value, HostError> {
        self(args, ctx)
    }
}

/// Declared shape of one overload.
#[derive(Clone, Debug, PartialEq)]
pub struct NativeSignature {
    pub name: Name,
    pub params: Vec<Type>,
    pub ret: Type,
    /// The last parameter repeats.
    pub varargs: bool,
}

impl NativeSignature {
    /// Whether `argc` arguments fit this signature.
    pub fn accepts_arity(&self, argc: usize) -> bool {
        if self.varargs {
            argc >= self.params.len()
        } else {
            argc == self.params.len()
        }
    }
}

impl fmt::Display for NativeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        if self.varargs {
            f.write_str("...")?;
        }
        write!(f, ") : {}", self.ret)
    }
}

/// Why [`NativeRegistry::resolve`] found no unique overload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveError {
    Unknown { name: String },
    NoMatch { name: String, args: Vec<String> },
    Ambiguous { name: String },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::Unknown { name } => write!(f, "function {name} is not declared"),
            ResolveError::NoMatch { name, args } => write!(
                f,
                "function {name} is not applicable for the arguments ({})",
                args.join(", ")
            ),
            ResolveError::Ambiguous { name } => write!(f, "function '{name}' is ambiguous"),
        }
    }
}

impl Error for ResolveError {}

/// The overload picked for a call site.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved {
    pub id: NativeId,
    /// Result type with the call's type variables substituted.
    pub ret: Type,
}

struct NativeEntry {
    signature: NativeSignature,
    function: Arc<dyn NativeFunction>,
}

/// All native overloads known to an executor.
#[derive(Default)]
pub struct NativeRegistry {
    entries: Vec<NativeEntry>,
    by_name: FxHashMap<Name, Vec<usize>>,
}

impl NativeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in string and container functions.
    pub fn with_stdlib() -> Self {
        let mut registry = Self::new();
        register_stdlib(&mut registry);
        registry
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a closure under a host-described signature. A trailing
    /// array parameter makes the overload variadic.
    pub fn register<F>(
        &mut self,
        name: &str,
        params: &[NativeType],
        ret: &NativeType,
        f: F,
    ) -> Result<NativeId, TypeError>
    where
        F: Fn(&[Value], &CallContext<'_>) -> Result<Value, HostError> + Send + Sync + 'static,
    {
        self.register_function(name, params, ret, Arc::new(f))
    }

    /// Like [`register`](Self::register), for shared function objects.
    pub fn register_function(
        &mut self,
        name: &str,
        params: &[NativeType],
        ret: &NativeType,
        function: Arc<dyn NativeFunction>,
    ) -> Result<NativeId, TypeError> {
        let varargs = matches!(params.last(), Some(NativeType::Array(_)));
        let params = params
            .iter()
            .map(Type::from_native)
            .collect::<Result<Vec<_>, _>>()?;
        let ret = Type::from_native(ret)?;
        Ok(self.register_typed(
            NativeSignature {
                name: Name::from(name),
                params,
                ret,
                varargs,
            },
            function,
        ))
    }

    /// Register with a signature already expressed in CTL types.
    pub fn register_typed(
        &mut self,
        signature: NativeSignature,
        function: Arc<dyn NativeFunction>,
    ) -> NativeId {
        let index = self.entries.len();
        self.by_name
            .entry(Arc::clone(&signature.name))
            .or_default()
            .push(index);
        self.entries.push(NativeEntry {
            signature,
            function,
        });
        NativeId(index as u32)
    }

    pub fn signature(&self, id: NativeId) -> Option<&NativeSignature> {
        self.entries.get(id.0 as usize).map(|e| &e.signature)
    }

    pub fn get(&self, id: NativeId) -> Option<(&NativeSignature, &dyn NativeFunction)> {
        self.entries
            .get(id.0 as usize)
            .map(|e| (&e.signature, e.function.as_ref()))
    }

    /// Whether any overload carries `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Pick the overload of `name` closest to `args`.
    pub fn resolve(&self, name: &str, args: &[Type]) -> Result<Resolved, ResolveError> {
        let candidates = self.by_name.get(name).ok_or_else(|| ResolveError::Unknown {
            name: name.to_owned(),
        })?;
        let mut best: Option<(u32, usize, FxHashMap<Name, Type>)> = None;
        let mut ambiguous = false;
        for &index in candidates {
            let Some((score, bindings)) = call_distance(&self.entries[index].signature, args)
            else {
                continue;
            };
            let min = best.as_ref().map(|(min, _, _)| *min);
            match min {
                Some(min) if score > min => {}
                Some(min) if score == min => ambiguous = true,
                _ => {
                    ambiguous = false;
                    best = Some((score, index, bindings));
                }
            }
        }
        let Some((_, index, bindings)) = best else {
            return Err(ResolveError::NoMatch {
                name: name.to_owned(),
                args: args.iter().map(ToString::to_string).collect(),
            });
        };
        if ambiguous {
            return Err(ResolveError::Ambiguous {
                name: name.to_owned(),
            });
        }
        Ok(Resolved {
            id: NativeId(index as u32),
            ret: substitute(&self.entries[index].signature.ret, &bindings),
        })
    }
}

impl fmt::Debug for NativeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| e.signature.to_string()))
            .finish()
    }
}

/// Distance of one argument to one parameter. `object` parameters accept
/// anything at the same cost as a type variable.
pub(crate) fn param_distance(from: &Type, to: &Type) -> u32 {
    if to.is_object() && !from.is_void() {
        return if from.is_object() { 0 } else { TYPE_VARIABLE_DISTANCE };
    }
    distance(from, to)
}

/// Record what `param` binds its type variables to; `false` on a clash.
fn bind(param: &Type, arg: &Type, bindings: &mut FxHashMap<Name, Type>) -> bool {
    match (param, arg) {
        (Type::TypeVar(name), _) => {
            if arg.is_null() {
                return true;
            }
            match bindings.get(name) {
                Some(bound) => bound == arg,
                None => {
                    bindings.insert(Arc::clone(name), arg.clone());
                    true
                }
            }
        }
        (Type::List(p), Type::List(a)) => bind(p, a, bindings),
        (Type::Map(pk, pv), Type::Map(ak, av)) => bind(pk, ak, bindings) && bind(pv, av, bindings),
        _ => true,
    }
}

fn substitute(ty: &Type, bindings: &FxHashMap<Name, Type>) -> Type {
    match ty {
        Type::TypeVar(name) => bindings.get(name).cloned().unwrap_or(Type::Object),
        Type::List(elem) => Type::list(substitute(elem, bindings)),
        Type::Map(k, v) => Type::map(substitute(k, bindings), substitute(v, bindings)),
        other => other.clone(),
    }
}

/// Total distance of `args` to `sig`, or `None` when it does not apply.
/// Variadic overloads cost one extra point, so fixed-arity overloads win
/// ties.
fn call_distance(sig: &NativeSignature, args: &[Type]) -> Option<(u32, FxHashMap<Name, Type>)> {
    if !sig.accepts_arity(args.len()) {
        return None;
    }
    let mut bindings = FxHashMap::default();
    let mut total: u32 = 0;
    for (i, arg) in args.iter().enumerate() {
        let param = sig.params.get(i).or(sig.params.last())?;
        let d = param_distance(arg, param);
        if d == DISTANCE_MAX || !bind(param, arg, &mut bindings) {
            return None;
        }
        total = total.saturating_add(d);
    }
    if sig.varargs {
        total = total.saturating_add(1);
    }
    Some((total, bindings))
}

#[cfg(test)]
mod tests;
