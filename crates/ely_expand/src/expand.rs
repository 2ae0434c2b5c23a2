//! The expander: rewrite syntax under the current scope set.
//!
//! [`Expander::expand_once`] rewrites a list form whose head identifier
//! resolves in the binding map, and reports "no rewrite" otherwise;
//! [`Expander::expand_all`] drives that to a fixed point. The expander
//! owns the one mutable scope set of the session and only changes it under
//! a scope guard, so binding forms always restore it on exit.
//!
//! Copies made for transformers share interned symbols and atmosphere but
//! are fresh nodes in the arena. Template instantiation unions the
//! binding's scope set onto every identifier introduced from the template,
//! which is what keeps macro-introduced names from colliding with
//! use-site names.

use ely_base::Interner;
use ely_syntax::{
    Identifier, List, ScopeGuard, ScopeGenerator, ScopeSet, Syntax, SyntaxContext,
};

use crate::binding::{Binding, BindingKind, BindingMap, Transformer};

/// Deep-copies a node into the arena. Symbols, atmosphere slices and scope
/// annotations are shared; list spines are fresh.
pub fn copy_syntax<'a>(ctx: SyntaxContext<'a>, node: &Syntax<'a>) -> Syntax<'a> {
    match node {
        Syntax::List(list) => {
            let children: Vec<Syntax<'a>> = list
                .children
                .iter()
                .map(|child| copy_syntax(ctx, child))
                .collect();
            Syntax::List(List::new(
                list.open,
                list.close,
                ctx.syntax.alloc_slice(children),
                list.poisoned(),
            ))
        }
        other => *other,
    }
}

/// Copies a node with `intro` unioned into every identifier's scope
/// annotation. Non-identifier leaves are copied unchanged.
pub fn apply_scopes<'a>(ctx: SyntaxContext<'a>, node: &Syntax<'a>, intro: &ScopeSet) -> Syntax<'a> {
    match node {
        Syntax::Identifier(identifier) => {
            let merged = ScopeSet::from_scopes(identifier.scopes.iter().copied())
                .add_scopes(intro.as_slice());
            Syntax::Identifier(Identifier::with_scopes(
                identifier.token,
                merged.alloc_in(ctx.scopes),
                identifier.poisoned(),
            ))
        }
        Syntax::List(list) => {
            let children: Vec<Syntax<'a>> = list
                .children
                .iter()
                .map(|child| apply_scopes(ctx, child, intro))
                .collect();
            Syntax::List(List::new(
                list.open,
                list.close,
                ctx.syntax.alloc_slice(children),
                list.poisoned(),
            ))
        }
        other => *other,
    }
}

/// Rewrites syntax by resolving head identifiers against a binding map.
pub struct Expander<'a, 'i> {
    ctx: SyntaxContext<'a>,
    interner: &'i mut Interner,
    bindings: BindingMap<'a>,
    current: ScopeSet,
    generator: ScopeGenerator,
}

impl<'a, 'i> Expander<'a, 'i> {
    /// Creates an expander with the builtin forms registered.
    pub fn new(ctx: SyntaxContext<'a>, interner: &'i mut Interner) -> Self {
        let mut expander = Expander {
            ctx,
            interner,
            bindings: BindingMap::new(),
            current: ScopeSet::new(),
            generator: ScopeGenerator::new(),
        };
        expander.add_builtins();
        expander
    }

    pub fn context(&self) -> SyntaxContext<'a> {
        self.ctx
    }

    /// The scope set currently in effect.
    pub fn current_scopes(&self) -> &ScopeSet {
        &self.current
    }

    pub fn bindings(&self) -> &BindingMap<'a> {
        &self.bindings
    }

    /// Interns text in the session interner, e.g. for names a transformer
    /// fabricates.
    pub fn intern(&mut self, text: &str) -> ely_base::Symbol {
        self.interner.intern(text)
    }

    /// Registers a transformer under `name` with the current scope set.
    pub fn add_builtin(&mut self, name: &str, transformer: Transformer<'a>) {
        let symbol = self.interner.intern(name);
        self.bindings
            .insert(symbol, Binding::transformer(self.current.clone(), transformer));
    }

    /// Performs at most one rewrite. `None` means no rewrite happened:
    /// non-list forms, the empty list, non-identifier heads and unresolved
    /// identifiers all pass through untouched.
    pub fn expand_once(&mut self, form: &'a Syntax<'a>) -> Option<&'a Syntax<'a>> {
        let list = match form {
            Syntax::List(list) => list,
            _ => return None,
        };
        // the empty form rewrites to nothing, explicitly
        let (head, operands) = list.children.split_first()?;
        let identifier = head.as_identifier()?;

        let use_scopes = self.current.add_scopes(identifier.scopes);
        let binding = self
            .bindings
            .resolve(identifier.token.text, &use_scopes)?
            .clone();

        match binding.kind {
            BindingKind::Transformer(transformer) => {
                let copies: Vec<Syntax<'a>> = operands
                    .iter()
                    .map(|operand| copy_syntax(self.ctx, operand))
                    .collect();
                let operands = self.ctx.syntax.alloc_slice(copies);
                Some(transformer(self, form, operands))
            }
            BindingKind::Template(template) => {
                let instantiated = apply_scopes(self.ctx, template, &binding.scopes);
                Some(self.ctx.syntax.alloc(instantiated))
            }
        }
    }

    /// Rewrites until no binding applies; the input is otherwise passed
    /// through unchanged.
    pub fn expand_all(&mut self, form: &'a Syntax<'a>) -> &'a Syntax<'a> {
        let mut current = form;
        while let Some(next) = self.expand_once(current) {
            current = next;
        }
        current
    }

    fn add_builtins(&mut self) {
        let define: Transformer<'a> = std::rc::Rc::new(expand_define);
        self.add_builtin("define", define);
    }
}

/// The builtin `define`: `(define name form)`.
///
/// Installs a template binding for `name` under the scope set of the
/// definition site. The template is annotated inside a fresh scope guard,
/// so names it introduces carry a scope no use site has and cannot
/// capture user bindings. Rewrites to an empty residue form; any shape
/// violation yields poisoned syntax instead.
fn expand_define<'a, 'i>(
    expander: &mut Expander<'a, 'i>,
    _form: &'a Syntax<'a>,
    operands: &'a [Syntax<'a>],
) -> &'a Syntax<'a> {
    if operands.len() != 2 {
        return Syntax::poison(expander.ctx);
    }
    let name = match operands[0].as_identifier() {
        Some(identifier) => identifier,
        None => return Syntax::poison(expander.ctx),
    };

    let definition_scopes = expander.current.clone();
    let template = {
        let guard = ScopeGuard::new(&mut expander.generator, &mut expander.current);
        let annotated = apply_scopes(expander.ctx, &operands[1], guard.set());
        expander.ctx.syntax.alloc(annotated)
    };

    expander
        .bindings
        .insert(name.token.text, Binding::template(definition_scopes, template));

    Syntax::empty_form(expander.ctx)
}
