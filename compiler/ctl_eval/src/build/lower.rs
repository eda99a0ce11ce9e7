//! Syntax tree to [`Program`] lowering.

use std::sync::Arc;

use ctl_ir::{
    ArithOp, CallTarget, Case, DictOp, EvalMode, FieldSel, Fix, FuncId, FunctionDef, GlobalInfo,
    Locality, LookupOp, NodeId, NodeKind, Param, Program, Slot, Span, VarRef,
};
use ctl_scope::{SlotInfo, SymbolTable};
use ctl_types::{Name, RecordSchema, Type, DISTANCE_MAX, TYPE_VARIABLE_DISTANCE};
use ctl_value::VarDecl;
use rustc_hash::FxHashMap;

use super::ast::{Expr, FieldRef, FunctionDecl, Item, Stmt, Target};
use super::BuildError;
use crate::native::{param_distance, NativeRegistry, ResolveError};

/// Signature of a declared internal function.
struct FunctionSig {
    id: FuncId,
    params: Vec<Type>,
    ret: Type,
}

/// State of one lowering pass.
pub(super) struct Lowerer<'a> {
    natives: &'a NativeRegistry,
    inputs: &'a [Arc<RecordSchema>],
    outputs: &'a [Arc<RecordSchema>],
    program: Program,
    symbols: SymbolTable,
    functions: FxHashMap<Name, Vec<FunctionSig>>,
    /// Last line handed out to a statement.
    line: u32,
    /// Position of the statement being lowered; expressions inherit it.
    span: Span,
    /// Position requested by [`Stmt::At`] for the next statement.
    pinned: Option<Span>,
}

impl<'a> Lowerer<'a> {
    pub(super) fn new(
        natives: &'a NativeRegistry,
        inputs: &'a [Arc<RecordSchema>],
        outputs: &'a [Arc<RecordSchema>],
    ) -> Self {
        Lowerer {
            natives,
            inputs,
            outputs,
            program: Program::new(),
            symbols: SymbolTable::new(),
            functions: FxHashMap::default(),
            line: 0,
            span: Span::new(1, 1),
            pinned: None,
        }
    }

    pub(super) fn finish(mut self, root: NodeId) -> Program {
        self.program.set_root(root);
        self.program
    }

    /// Redeclare the globals of `enclosing` so they resolve to the same
    /// slots. A name declared twice (in sibling blocks) resolves to the
    /// later declaration.
    pub(super) fn inherit_globals(&mut self, enclosing: &Program) -> Result<(), BuildError> {
        for global in enclosing.globals() {
            let info = match self.symbols.declare(&global.name, global.ty.clone()) {
                Ok(info) => info,
                Err(_) => {
                    self.symbols.enter_block();
                    self.symbols.declare(&global.name, global.ty.clone())?
                }
            };
            if info.slot != Slot::global(global.slot) {
                return Err(BuildError::GlobalLayout {
                    name: global.name.to_string(),
                });
            }
            self.program.add_global(global.clone());
        }
        Ok(())
    }

    /// Register every function header so calls may precede declarations.
    /// Ids follow declaration order, which is the order bodies are added.
    pub(super) fn declare_functions(&mut self, items: &[Item]) -> Result<(), BuildError> {
        let mut next = self.program.functions().len();
        for item in items {
            let Item::Function(func) = item else {
                continue;
            };
            let params: Vec<Type> = func.params.iter().map(|(_, ty)| ty.clone()).collect();
            let overloads = self.functions.entry(Name::from(func.name.as_str())).or_default();
            if overloads.iter().any(|sig| sig.params == params) {
                return Err(BuildError::DuplicateFunction {
                    name: func.name.clone(),
                });
            }
            overloads.push(FunctionSig {
                id: FuncId(next as u32),
                params,
                ret: func.ret.clone(),
            });
            next += 1;
        }
        Ok(())
    }

    /// Lower top-level items into the root block.
    pub(super) fn lower_items(&mut self, items: &[Item]) -> Result<NodeId, BuildError> {
        let mut stmts = Vec::new();
        for item in items {
            match item {
                Item::Stmt(stmt) => stmts.push(self.lower_stmt(stmt)?),
                Item::Function(func) => self.lower_function(func)?,
            }
        }
        Ok(self.program.alloc(NodeKind::Block(stmts), Span::new(1, 1)))
    }

    fn lower_function(&mut self, func: &FunctionDecl) -> Result<(), BuildError> {
        self.next_span();
        let span = self.span;
        self.symbols.enter_function(&func.name);
        let mut params = Vec::with_capacity(func.params.len());
        for (name, ty) in &func.params {
            self.declare(name, ty)?;
            params.push(Param {
                name: Name::from(name.as_str()),
                ty: ty.clone(),
            });
        }
        let body = self.lower_stmts(&func.body)?;
        let body = self.program.alloc(NodeKind::Block(body), span);
        let local_count = self.symbols.exit_function();
        self.program.add_function(FunctionDef {
            name: Name::from(func.name.as_str()),
            params,
            ret: func.ret.clone(),
            body,
            local_count,
        });
        Ok(())
    }

    fn next_span(&mut self) {
        self.span = self.pinned.take().unwrap_or_else(|| {
            self.line += 1;
            Span::new(self.line, 1)
        });
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        self.program.alloc(kind, self.span)
    }

    fn declare(&mut self, name: &str, ty: &Type) -> Result<SlotInfo, BuildError> {
        if ty.is_void() {
            return Err(BuildError::VoidVariable {
                name: name.to_owned(),
            });
        }
        let info = self.symbols.declare(name, ty.clone())?;
        if info.slot.locality == Locality::Global {
            self.program.add_global(GlobalInfo {
                name: Name::from(name),
                ty: ty.clone(),
                slot: info.slot.index,
            });
        }
        Ok(info)
    }

    fn resolve(&self, name: &str) -> Result<(VarRef, Type), BuildError> {
        let info = self
            .symbols
            .resolve(name)
            .ok_or_else(|| BuildError::UndeclaredVariable {
                name: name.to_owned(),
            })?;
        Ok((VarRef::new(Name::from(name), info.slot), info.ty))
    }

    fn lower_stmts(&mut self, stmts: &[Stmt]) -> Result<Vec<NodeId>, BuildError> {
        stmts.iter().map(|stmt| self.lower_stmt(stmt)).collect()
    }

    /// A nested statement list with its own scope.
    fn lower_block(&mut self, stmts: &[Stmt]) -> Result<NodeId, BuildError> {
        self.symbols.enter_block();
        let lowered = self.lower_stmts(stmts);
        self.symbols.exit_block();
        let lowered = lowered?;
        Ok(self.alloc(NodeKind::Block(lowered)))
    }

    fn scoped<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, BuildError>,
    ) -> Result<T, BuildError> {
        self.symbols.enter_block();
        let result = f(self);
        self.symbols.exit_block();
        result
    }

    fn lower_stmt(&mut self, stmt: &Stmt) -> Result<NodeId, BuildError> {
        if let Stmt::At(span, inner) = stmt {
            self.pinned = Some(*span);
            return self.lower_stmt(inner);
        }
        let outer = self.span;
        self.next_span();
        let lowered = self.lower_stmt_kind(stmt);
        self.span = outer;
        lowered
    }

    fn lower_stmt_kind(&mut self, stmt: &Stmt) -> Result<NodeId, BuildError> {
        let span = self.span;
        let kind = match stmt {
            Stmt::Decl {
                name,
                ty,
                decl,
                init,
            } => {
                // The initializer cannot see the variable it initializes.
                let init = init
                    .as_ref()
                    .map(|init| self.lower_expr(init).map(|(id, _)| id))
                    .transpose()?;
                let info = self.declare(name, ty)?;
                NodeKind::VarDecl {
                    var: VarRef::new(Name::from(name.as_str()), info.slot),
                    ty: ty.clone(),
                    decl: *decl,
                    init,
                }
            }
            Stmt::Assign(target, value) => {
                let (target, _) = self.lower_target(target)?;
                let (value, _) = self.lower_expr(value)?;
                NodeKind::Assign { target, value }
            }
            Stmt::Map {
                record,
                field,
                alternatives,
            } => {
                let schema = schema_at(self.outputs, *record)?;
                let (field, _) = field_sel(schema, field)?;
                let alternatives = alternatives
                    .iter()
                    .map(|alt| self.lower_expr(alt).map(|(id, _)| id))
                    .collect::<Result<_, _>>()?;
                NodeKind::Mapping {
                    record: *record,
                    field,
                    alternatives,
                }
            }
            Stmt::MapAll { record, source } => {
                schema_at(self.outputs, *record)?;
                let (source, _) = self.lower_expr(source)?;
                NodeKind::WildcardMapping {
                    record: *record,
                    source,
                }
            }
            Stmt::Expr(expr) => return self.lower_expr(expr).map(|(id, _)| id),
            Stmt::Step(op, target) => {
                let (target, _) = self.lower_target(target)?;
                NodeKind::Step {
                    op: *op,
                    fix: Fix::Statement,
                    target,
                }
            }
            Stmt::Block(stmts) => return self.lower_block(stmts),
            Stmt::If {
                cond,
                then,
                otherwise,
            } => {
                let (cond, _) = self.lower_expr(cond)?;
                let then = self.lower_block(then)?;
                let otherwise = otherwise
                    .as_ref()
                    .map(|stmts| self.lower_block(stmts))
                    .transpose()?;
                NodeKind::If {
                    cond,
                    then,
                    otherwise,
                }
            }
            Stmt::For {
                init,
                cond,
                step,
                body,
            } => {
                // Variables declared by the init clause belong to the loop.
                return self.scoped(|this| {
                    let init = init.as_deref().map(|s| this.lower_stmt(s)).transpose()?;
                    let cond = cond
                        .as_ref()
                        .map(|c| this.lower_expr(c).map(|(id, _)| id))
                        .transpose()?;
                    let step = step.as_deref().map(|s| this.lower_stmt(s)).transpose()?;
                    let body = this.lower_block(body)?;
                    let node = this.program.alloc(
                        NodeKind::For {
                            init,
                            cond,
                            step,
                            body,
                        },
                        span,
                    );
                    Ok(node)
                });
            }
            Stmt::Foreach {
                var,
                ty,
                iterable,
                body,
            } => {
                return self.scoped(|this| {
                    let (iterable, _) = this.lower_expr(iterable)?;
                    let info = this.declare(var, ty)?;
                    let var = VarRef::new(Name::from(var.as_str()), info.slot);
                    let decl = this.program.alloc(
                        NodeKind::VarDecl {
                            var: var.clone(),
                            ty: ty.clone(),
                            decl: VarDecl::default(),
                            init: None,
                        },
                        span,
                    );
                    let body = this.lower_block(body)?;
                    let foreach = this.program.alloc(
                        NodeKind::Foreach {
                            var,
                            iterable,
                            body,
                        },
                        span,
                    );
                    Ok(this.program.alloc(NodeKind::Block(vec![decl, foreach]), span))
                });
            }
            Stmt::While { cond, body } => {
                let (cond, _) = self.lower_expr(cond)?;
                let body = self.lower_block(body)?;
                NodeKind::While { cond, body }
            }
            Stmt::DoWhile { body, cond } => {
                let body = self.lower_block(body)?;
                let (cond, _) = self.lower_expr(cond)?;
                NodeKind::DoWhile { body, cond }
            }
            Stmt::Switch {
                scrutinee,
                cases,
                default,
            } => {
                let (scrutinee, _) = self.lower_expr(scrutinee)?;
                let mut lowered = Vec::with_capacity(cases.len());
                for (value, body) in cases {
                    let (value, _) = self.lower_expr(value)?;
                    let body = self.lower_block(body)?;
                    lowered.push(Case { value, body });
                }
                let default = default
                    .as_ref()
                    .map(|stmts| self.lower_block(stmts))
                    .transpose()?;
                NodeKind::Switch {
                    scrutinee,
                    cases: lowered,
                    default,
                }
            }
            Stmt::TryCatch {
                body,
                binding,
                handler,
            } => return self.lower_try_catch(body, binding.as_deref(), handler),
            Stmt::Break => NodeKind::Break,
            Stmt::Continue => NodeKind::Continue,
            Stmt::Return(value) => NodeKind::Return(
                value
                    .as_ref()
                    .map(|v| self.lower_expr(v).map(|(id, _)| id))
                    .transpose()?,
            ),
            Stmt::LookupInit(table) => NodeKind::Lookup {
                table: Name::from(table.as_str()),
                op: LookupOp::Init,
            },
            Stmt::LookupFree(table) => NodeKind::Lookup {
                table: Name::from(table.as_str()),
                op: LookupOp::Free,
            },
            Stmt::DictPut(key, value) => {
                let (key, _) = self.lower_expr(key)?;
                let (value, _) = self.lower_expr(value)?;
                NodeKind::Dictionary(DictOp::Put(key, value))
            }
            Stmt::DictDelete(key) => {
                let (key, _) = self.lower_expr(key)?;
                NodeKind::Dictionary(DictOp::Delete(key))
            }
            Stmt::Eval(source) => {
                let (source, _) = self.lower_expr(source)?;
                NodeKind::Eval {
                    source,
                    mode: EvalMode::Statements,
                }
            }
            Stmt::PrintErr {
                message,
                with_location,
            } => {
                let (message, _) = self.lower_expr(message)?;
                NodeKind::PrintErr {
                    message,
                    with_location: *with_location,
                }
            }
            Stmt::PrintLog(level, message) => {
                let (message, _) = self.lower_expr(message)?;
                NodeKind::PrintLog {
                    level: *level,
                    message,
                }
            }
            Stmt::RaiseError(message) => NodeKind::RaiseError(self.lower_expr(message)?.0),
            Stmt::PrintStack => NodeKind::PrintStack,
            Stmt::At(span, inner) => {
                self.pinned = Some(*span);
                return self.lower_stmt(inner);
            }
        };
        Ok(self.program.alloc(kind, span))
    }

    /// `try { body } catch (binding) { handler }`. The binding is declared
    /// in a block around the statement.
    fn lower_try_catch(
        &mut self,
        body: &[Stmt],
        binding: Option<&str>,
        handler: &[Stmt],
    ) -> Result<NodeId, BuildError> {
        let span = self.span;
        self.scoped(|this| {
            let mut stmts = Vec::with_capacity(2);
            let binding = match binding {
                Some(name) => {
                    let info = this.declare(name, &Type::String)?;
                    let var = VarRef::new(Name::from(name), info.slot);
                    stmts.push(this.program.alloc(
                        NodeKind::VarDecl {
                            var: var.clone(),
                            ty: Type::String,
                            decl: VarDecl::default(),
                            init: None,
                        },
                        span,
                    ));
                    Some(var)
                }
                None => None,
            };
            let body = this.lower_block(body)?;
            let handler = this.lower_block(handler)?;
            stmts.push(this.program.alloc(
                NodeKind::TryCatch {
                    body,
                    binding,
                    handler,
                },
                span,
            ));
            Ok(this.program.alloc(NodeKind::Block(stmts), span))
        })
    }

    fn lower_target(&mut self, target: &Target) -> Result<(VarRef, Type), BuildError> {
        match target {
            Target::Var(name) => self.resolve(name),
            Target::Index(name, index) => self.lower_indexed(name, index),
            Target::Field(name, field) => self.lower_field(name, field),
        }
    }

    fn lower_indexed(&mut self, name: &str, index: &Expr) -> Result<(VarRef, Type), BuildError> {
        let (var, ty) = self.resolve(name)?;
        let (index, _) = self.lower_expr(index)?;
        Ok((var.indexed(index), element_type(&ty)))
    }

    fn lower_field(&self, name: &str, field: &str) -> Result<(VarRef, Type), BuildError> {
        let (var, ty) = self.resolve(name)?;
        let field_ty = record_field_type(&ty, field);
        Ok((var.field(field), field_ty))
    }

    /// Lower an expression; also returns its static type, [`Type::Object`]
    /// where only the runtime knows.
    pub(super) fn lower_expr(&mut self, expr: &Expr) -> Result<(NodeId, Type), BuildError> {
        let (kind, ty) = match expr {
            Expr::Lit(value) => (NodeKind::Literal(value.clone()), value.type_of()),
            Expr::List { elem, items } => {
                let items = items
                    .iter()
                    .map(|item| self.lower_expr(item).map(|(id, _)| id))
                    .collect::<Result<_, _>>()?;
                (
                    NodeKind::ListLiteral {
                        elem: elem.clone(),
                        items,
                    },
                    Type::list(elem.clone()),
                )
            }
            Expr::Var(name) => {
                let (var, ty) = self.resolve(name)?;
                (NodeKind::Var(var), ty)
            }
            Expr::Index(name, index) => {
                let (var, ty) = self.lower_indexed(name, index)?;
                (NodeKind::Var(var), ty)
            }
            Expr::Field(name, field) => {
                let (var, ty) = self.lower_field(name, field)?;
                (NodeKind::Var(var), ty)
            }
            Expr::Input(record, field) => {
                let schema = schema_at(self.inputs, *record)?;
                let (field, ty) = field_sel(schema, field)?;
                (
                    NodeKind::InputField {
                        record: *record,
                        field,
                    },
                    ty,
                )
            }
            Expr::Logical(op, left, right) => {
                let (left, _) = self.lower_expr(left)?;
                let (right, _) = self.lower_expr(right)?;
                (
                    NodeKind::Logical {
                        op: *op,
                        left,
                        right,
                    },
                    Type::Boolean,
                )
            }
            Expr::Not(operand) => (NodeKind::Not(self.lower_expr(operand)?.0), Type::Boolean),
            Expr::Compare(op, left, right) => {
                let (left, _) = self.lower_expr(left)?;
                let (right, _) = self.lower_expr(right)?;
                (
                    NodeKind::Compare {
                        op: *op,
                        left,
                        right,
                    },
                    Type::Boolean,
                )
            }
            Expr::Arith(op, left, right) => {
                let (left, left_ty) = self.lower_expr(left)?;
                let (right, right_ty) = self.lower_expr(right)?;
                (
                    NodeKind::Arith {
                        op: *op,
                        left,
                        right,
                    },
                    arith_type(*op, &left_ty, &right_ty),
                )
            }
            Expr::Unary(op, operand) => {
                let (operand, ty) = self.lower_expr(operand)?;
                (NodeKind::Unary { op: *op, operand }, ty)
            }
            Expr::Step(op, fix, target) => {
                let (target, ty) = self.lower_target(target)?;
                (
                    NodeKind::Step {
                        op: *op,
                        fix: *fix,
                        target,
                    },
                    ty,
                )
            }
            Expr::IsNull(operand) => (NodeKind::IsNull(self.lower_expr(operand)?.0), Type::Boolean),
            Expr::Nvl(value, fallback) => {
                let (value, value_ty) = self.lower_expr(value)?;
                let (fallback, fallback_ty) = self.lower_expr(fallback)?;
                (
                    NodeKind::Nvl { value, fallback },
                    common_type(&value_ty, &fallback_ty),
                )
            }
            Expr::Nvl2(value, present, absent) => {
                let (value, _) = self.lower_expr(value)?;
                let (present, present_ty) = self.lower_expr(present)?;
                let (absent, absent_ty) = self.lower_expr(absent)?;
                (
                    NodeKind::Nvl2 {
                        value,
                        present,
                        absent,
                    },
                    common_type(&present_ty, &absent_ty),
                )
            }
            Expr::Iif(cond, then, otherwise) => {
                let (cond, _) = self.lower_expr(cond)?;
                let (then, then_ty) = self.lower_expr(then)?;
                let (otherwise, otherwise_ty) = self.lower_expr(otherwise)?;
                (
                    NodeKind::Iif {
                        cond,
                        then,
                        otherwise,
                    },
                    common_type(&then_ty, &otherwise_ty),
                )
            }
            Expr::Call(name, args) => return self.lower_call(name, args),
            Expr::Sequence(name, op, ret) => {
                if !matches!(ret, Type::Integer | Type::Long | Type::String) {
                    return Err(BuildError::InvalidSequenceType { ty: ret.clone() });
                }
                (
                    NodeKind::Sequence {
                        name: Name::from(name.as_str()),
                        op: *op,
                        ret: ret.clone(),
                    },
                    ret.clone(),
                )
            }
            Expr::Lookup { table, keys, field } => {
                let keys = keys
                    .iter()
                    .map(|key| self.lower_expr(key).map(|(id, _)| id))
                    .collect::<Result<_, _>>()?;
                let (field, ty) = field_sel(None, field)?;
                (
                    NodeKind::Lookup {
                        table: Name::from(table.as_str()),
                        op: LookupOp::Get { keys, field },
                    },
                    ty,
                )
            }
            Expr::LookupNext { table, field } => {
                let (field, ty) = field_sel(None, field)?;
                (
                    NodeKind::Lookup {
                        table: Name::from(table.as_str()),
                        op: LookupOp::Next { field },
                    },
                    ty,
                )
            }
            Expr::LookupFound(table) => (
                NodeKind::Lookup {
                    table: Name::from(table.as_str()),
                    op: LookupOp::NumFound,
                },
                Type::Integer,
            ),
            Expr::DictGet(key) => (
                NodeKind::Dictionary(DictOp::Get(self.lower_expr(key)?.0)),
                Type::String,
            ),
            Expr::Eval(source) => (
                NodeKind::Eval {
                    source: self.lower_expr(source)?.0,
                    mode: EvalMode::Expression,
                },
                Type::Object,
            ),
        };
        Ok((self.alloc(kind), ty))
    }

    /// Internal functions shadow natives of the same name.
    fn lower_call(&mut self, name: &str, args: &[Expr]) -> Result<(NodeId, Type), BuildError> {
        let mut ids = Vec::with_capacity(args.len());
        let mut types = Vec::with_capacity(args.len());
        for arg in args {
            let (id, ty) = self.lower_expr(arg)?;
            ids.push(id);
            types.push(ty);
        }
        let (target, ret) = match self.functions.get(name) {
            Some(overloads) => {
                let sig = pick_internal(name, overloads, &types)?;
                (CallTarget::Internal(sig.id), sig.ret.clone())
            }
            None => {
                let resolved = self.natives.resolve(name, &types)?;
                (CallTarget::Native(resolved.id), resolved.ret)
            }
        };
        let ret = if ret.is_void() { Type::Null } else { ret };
        let id = self.alloc(NodeKind::Call { target, args: ids });
        Ok((id, ret))
    }
}

/// Closest internal overload by total distance. Arguments whose type is
/// only known at runtime match any parameter; the call checks them.
fn pick_internal<'s>(
    name: &str,
    overloads: &'s [FunctionSig],
    args: &[Type],
) -> Result<&'s FunctionSig, ResolveError> {
    let mut best: Option<(u32, &FunctionSig)> = None;
    let mut ambiguous = false;
    for sig in overloads.iter().filter(|sig| sig.params.len() == args.len()) {
        let mut total: u32 = 0;
        let mut applies = true;
        for (arg, param) in args.iter().zip(&sig.params) {
            let d = if arg.is_object() && !param.is_void() {
                TYPE_VARIABLE_DISTANCE
            } else {
                param_distance(arg, param)
            };
            if d == DISTANCE_MAX {
                applies = false;
                break;
            }
            total = total.saturating_add(d);
        }
        if !applies {
            continue;
        }
        match best {
            Some((min, _)) if total > min => {}
            Some((min, _)) if total == min => ambiguous = true,
            _ => {
                ambiguous = false;
                best = Some((total, sig));
            }
        }
    }
    match best {
        Some(_) if ambiguous => Err(ResolveError::Ambiguous {
            name: name.to_owned(),
        }),
        Some((_, sig)) => Ok(sig),
        None => Err(ResolveError::NoMatch {
            name: name.to_owned(),
            args: args.iter().map(ToString::to_string).collect(),
        }),
    }
}

/// Layout of record `record`, when layouts were declared at all.
fn schema_at(
    schemas: &[Arc<RecordSchema>],
    record: usize,
) -> Result<Option<&Arc<RecordSchema>>, BuildError> {
    if schemas.is_empty() {
        return Ok(None);
    }
    schemas
        .get(record)
        .map(Some)
        .ok_or(BuildError::UnknownRecord { record })
}

fn field_sel(
    schema: Option<&Arc<RecordSchema>>,
    field: &FieldRef,
) -> Result<(FieldSel, Type), BuildError> {
    let unknown = |schema: &RecordSchema, field: String| BuildError::UnknownField {
        record: schema.name().to_owned(),
        field,
    };
    match (field, schema) {
        (FieldRef::Whole, schema) => Ok((FieldSel::Whole, Type::Record(schema.cloned()))),
        (FieldRef::Name(name), None) => Ok((FieldSel::Name(Name::from(name.as_str())), Type::Object)),
        (FieldRef::Name(name), Some(schema)) => {
            let meta = schema
                .field_position(name)
                .and_then(|pos| schema.field(pos))
                .ok_or_else(|| unknown(schema, name.clone()))?;
            Ok((FieldSel::Name(Arc::clone(&meta.name)), meta.ty.clone()))
        }
        (FieldRef::Ordinal(ordinal), None) => Ok((FieldSel::Ordinal(*ordinal), Type::Object)),
        (FieldRef::Ordinal(ordinal), Some(schema)) => {
            let meta = schema
                .field(*ordinal)
                .ok_or_else(|| unknown(schema, ordinal.to_string()))?;
            Ok((FieldSel::Ordinal(*ordinal), meta.ty.clone()))
        }
    }
}

fn element_type(container: &Type) -> Type {
    match container {
        Type::List(elem) => (**elem).clone(),
        Type::Map(_, value) => (**value).clone(),
        Type::ByteArray => Type::Integer,
        _ => Type::Object,
    }
}

fn record_field_type(record: &Type, field: &str) -> Type {
    record
        .schema()
        .and_then(|schema| schema.field_position(field).and_then(|pos| schema.field(pos)))
        .map_or(Type::Object, |meta| meta.ty.clone())
}

fn common_type(a: &Type, b: &Type) -> Type {
    match a.promote_with(b) {
        Type::Error => Type::Object,
        ty => ty,
    }
}

/// `+` with a string operand concatenates.
fn arith_type(op: ArithOp, left: &Type, right: &Type) -> Type {
    if op == ArithOp::Add && (*left == Type::String || *right == Type::String) {
        return Type::String;
    }
    common_type(left, right)
}
