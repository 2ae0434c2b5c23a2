//! Bindings and the scope-set resolving binding map.
//!
//! A binding pairs a scope set with either a transformer function or a
//! syntax template. Bindings for one symbol are kept in insertion order;
//! resolution picks the binding whose scope set is a subset of the use
//! site's and whose subset cardinality is maximal, with ties going to the
//! earliest insertion.

use std::rc::Rc;

use ely_base::Symbol;
use ely_syntax::{ScopeSet, Syntax};
use rustc_hash::FxHashMap;

use crate::expand::Expander;

/// A transformer: syntax in, syntax out.
///
/// The expander passes itself so builtins can mint scopes and install
/// bindings, the original form, and arena copies of the form's operands.
/// A transformer that detects misuse returns poisoned syntax; it never
/// panics.
pub type TransformerFn<'a> =
    dyn for<'i> Fn(&mut Expander<'a, 'i>, &'a Syntax<'a>, &'a [Syntax<'a>]) -> &'a Syntax<'a> + 'a;

/// Shared handle to a transformer, cloned out of the map for invocation.
pub type Transformer<'a> = Rc<TransformerFn<'a>>;

/// What a binding resolves to.
#[derive(Clone)]
pub enum BindingKind<'a> {
    /// A function invoked by the expander.
    Transformer(Transformer<'a>),
    /// A syntax template substituted under hygiene.
    Template(&'a Syntax<'a>),
}

/// A scope set paired with a transformer or template.
#[derive(Clone)]
pub struct Binding<'a> {
    pub scopes: ScopeSet,
    pub kind: BindingKind<'a>,
}

impl<'a> Binding<'a> {
    pub fn transformer(scopes: ScopeSet, transformer: Transformer<'a>) -> Self {
        Binding {
            scopes,
            kind: BindingKind::Transformer(transformer),
        }
    }

    pub fn template(scopes: ScopeSet, template: &'a Syntax<'a>) -> Self {
        Binding {
            scopes,
            kind: BindingKind::Template(template),
        }
    }
}

/// Insertion-ordered bindings per symbol, resolved by scope-set subset.
#[derive(Default)]
pub struct BindingMap<'a> {
    map: FxHashMap<Symbol, Vec<Binding<'a>>>,
}

impl<'a> BindingMap<'a> {
    pub fn new() -> Self {
        BindingMap {
            map: FxHashMap::default(),
        }
    }

    /// Appends a binding for `symbol`, after any existing ones.
    pub fn insert(&mut self, symbol: Symbol, binding: Binding<'a>) {
        self.map.entry(symbol).or_default().push(binding);
    }

    /// Finds the best binding for `symbol` at a use site.
    ///
    /// Only bindings whose scope set is a subset of `use_scopes` are
    /// candidates; among those the largest subset wins and ties go to the
    /// earliest-inserted binding. `None` when nothing matches.
    pub fn resolve(&self, symbol: Symbol, use_scopes: &ScopeSet) -> Option<&Binding<'a>> {
        let bindings = self.map.get(&symbol)?;
        let mut best: Option<(usize, &Binding<'a>)> = None;
        for binding in bindings {
            if let Some(size) = binding.scopes.subset_size(use_scopes) {
                // strict comparison keeps the earlier binding on ties
                if best.map_or(true, |(best_size, _)| size > best_size) {
                    best = Some((size, binding));
                }
            }
        }
        best.map(|(_, binding)| binding)
    }

    /// Number of symbols with at least one binding.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
