//! Hygiene scopes and scope sets.
//!
//! A [`Scope`] is an opaque id for one lexical context introduced by a
//! binding form. Syntax objects are annotated with the set of scopes in
//! effect where they were introduced; binding resolution later compares
//! these sets, following the sets-of-scopes formulation of hygiene.
//!
//! [`ScopeSet`] is a small sorted set with value semantics: the annotation
//! operations ([`ScopeSet::add_scope`], [`ScopeSet::add_scopes`]) return a
//! new set and never mutate their input. The expander's one mutable set is
//! only ever changed under a [`ScopeGuard`], whose borrow structure makes
//! release order LIFO by construction.

use ely_base::Arena;

/// An opaque, dense scope id minted by a [`ScopeGenerator`].
///
/// Equality and ordering are id equality and ordering; ids are unique per
/// generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Scope(u32);

impl Scope {
    pub fn id(self) -> u32 {
        self.0
    }
}

/// Mints scopes with monotonically increasing ids.
///
/// One generator lives for one expansion session; scopes from different
/// generators must not be mixed.
#[derive(Debug, Default)]
pub struct ScopeGenerator {
    current: u32,
}

impl ScopeGenerator {
    pub fn new() -> Self {
        ScopeGenerator { current: 0 }
    }

    /// Returns a fresh scope, distinct from every scope minted before.
    pub fn next(&mut self) -> Scope {
        let scope = Scope(self.current);
        self.current += 1;
        scope
    }
}

/// An ordered set of scopes with value semantics.
///
/// Stored as a sorted, deduplicated vector; iteration order is ascending
/// id order, which makes equality and hashing deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopeSet {
    scopes: Vec<Scope>,
}

impl ScopeSet {
    pub fn new() -> Self {
        ScopeSet { scopes: Vec::new() }
    }

    /// Builds a set from arbitrary (possibly unsorted, duplicated) scopes.
    pub fn from_scopes(scopes: impl IntoIterator<Item = Scope>) -> Self {
        let mut set = ScopeSet::new();
        for scope in scopes {
            set.insert(scope);
        }
        set
    }

    pub fn size(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Scope> + '_ {
        self.scopes.iter().copied()
    }

    pub fn as_slice(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn contains(&self, scope: Scope) -> bool {
        self.scopes.binary_search(&scope).is_ok()
    }

    /// Returns `true` if every scope of `self` is in `other`.
    pub fn subset_of(&self, other: &ScopeSet) -> bool {
        self.scopes.iter().all(|&s| other.contains(s))
    }

    /// Returns the subset cardinality when `self` is a subset of `other`.
    ///
    /// `None` means "not a subset"; `Some(0)` is the empty set, which is
    /// trivially a subset of everything. Callers must not conflate the two.
    pub fn subset_size(&self, other: &ScopeSet) -> Option<usize> {
        self.subset_of(other).then_some(self.scopes.len())
    }

    /// Returns a new set with `scope` added. The input is not mutated.
    #[must_use]
    pub fn add_scope(&self, scope: Scope) -> ScopeSet {
        let mut next = self.clone();
        next.insert(scope);
        next
    }

    /// Returns a new set with every scope of `scopes` added.
    #[must_use]
    pub fn add_scopes(&self, scopes: &[Scope]) -> ScopeSet {
        let mut next = self.clone();
        for &scope in scopes {
            next.insert(scope);
        }
        next
    }

    /// In-place insertion; used by the scope guard.
    pub fn insert(&mut self, scope: Scope) {
        if let Err(at) = self.scopes.binary_search(&scope) {
            self.scopes.insert(at, scope);
        }
    }

    /// In-place removal; returns whether the scope was present.
    pub fn remove(&mut self, scope: Scope) -> bool {
        match self.scopes.binary_search(&scope) {
            Ok(at) => {
                self.scopes.remove(at);
                true
            }
            Err(_) => false,
        }
    }

    /// Copies the set into an arena as a plain sorted slice, the form kept
    /// on syntax nodes.
    pub fn alloc_in<'a>(&self, arena: &'a Arena<Scope>) -> &'a [Scope] {
        arena.alloc_slice(self.scopes.iter().copied())
    }
}

/// Scoped acquisition of a fresh scope.
///
/// Construction mints a scope and inserts it into the borrowed set; drop
/// removes it. Because the guard holds the `&mut ScopeSet`, a nested guard
/// can only be created through [`ScopeGuard::set_mut`], which makes
/// out-of-order release unrepresentable.
pub struct ScopeGuard<'s> {
    scope: Scope,
    set: &'s mut ScopeSet,
}

impl<'s> ScopeGuard<'s> {
    pub fn new(generator: &mut ScopeGenerator, set: &'s mut ScopeSet) -> Self {
        let scope = generator.next();
        set.insert(scope);
        ScopeGuard { scope, set }
    }

    /// The scope introduced by this guard.
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// The guarded set, including this guard's scope.
    pub fn set(&self) -> &ScopeSet {
        self.set
    }

    /// Mutable access to the guarded set, e.g. for nesting another guard.
    pub fn set_mut(&mut self) -> &mut ScopeSet {
        self.set
    }
}

impl<'s> Drop for ScopeGuard<'s> {
    fn drop(&mut self) {
        self.set.remove(self.scope);
    }
}

/// Runs `f` with a fresh scope added to `set`, removing it afterwards.
pub fn with_new_scope<R>(
    generator: &mut ScopeGenerator,
    set: &mut ScopeSet,
    f: impl FnOnce(Scope, &mut ScopeSet) -> R,
) -> R {
    let mut guard = ScopeGuard::new(generator, set);
    let scope = guard.scope();
    f(scope, guard.set_mut())
}
