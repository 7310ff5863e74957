//! Reference resolution and change propagation.
//!
//! # Algorithm
//!
//! [`propagate`] runs one pass for an attribute whose raw input just changed:
//!
//! 1. Every attribute that transitively references the changed key is
//!    collected by walking dependents depth-first.
//! 2. The changed attribute's raw input is tokenized and every `{group.name}`
//!    token is replaced by the current resolved value of that attribute.
//! 3. The collected attributes are recomputed the same way, each exactly
//!    once. An attribute is recomputed after every collected attribute it
//!    references, and ties go in key order.
//!
//! Each step produces a new [`Store`] revision; the input store is never
//! touched. When a pass fails, nothing is returned but the error, and the
//! caller keeps the store it started from.
//!
//! # Cycles
//!
//! The collecting walk carries the path of keys it is currently following. A
//! dependent that is already on the path closes a cycle, and the pass fails
//! with [`ResolveError::CyclicReference`] before anything is recomputed.
//! Shared dependencies that are not cycles (two paths into the same
//! attribute) are collected once and recomputed after both of their inputs.

use std::collections::BTreeSet;

use tracing::{debug, trace, warn};

use crate::error::ResolveError;
use crate::key::AttrKey;
use crate::store::Store;

/// Result of a propagation pass.
#[derive(Debug, Clone)]
pub struct Propagation {
    /// The resolved revision.
    pub store: Store,
    /// Keys recomputed, in order, starting with the changed key. Each key
    /// appears once.
    pub wave: Vec<AttrKey>,
}

impl Propagation {
    /// The distinct keys recomputed, in first-seen order.
    pub fn updated(&self) -> Vec<&AttrKey> {
        let mut seen = BTreeSet::new();
        self.wave.iter().filter(|key| seen.insert(*key)).collect()
    }
}

/// Recomputes `changed` and everything that transitively references it.
pub fn resolve(store: &Store, changed: &AttrKey) -> Result<Store, ResolveError> {
    propagate(store, changed).map(|p| p.store)
}

/// Like [`resolve`], also reporting the propagation wave.
pub fn propagate(store: &Store, changed: &AttrKey) -> Result<Propagation, ResolveError> {
    let result = run_pass(store, changed);
    match &result {
        Ok(propagation) => {
            debug!(key = %changed, recomputed = propagation.wave.len(), "resolution pass complete")
        }
        Err(err) => warn!(key = %changed, error = %err, "resolution pass aborted"),
    }
    result
}

fn run_pass(store: &Store, changed: &AttrKey) -> Result<Propagation, ResolveError> {
    store.get(changed)?;
    let affected = collect_dependents(store, changed)?;

    let mut pass = Pass {
        store: store.clone(),
        wave: Vec::with_capacity(affected.len() + 1),
        done: BTreeSet::new(),
        affected,
    };
    pass.recompute(changed)?;
    let pending: Vec<AttrKey> = pass.affected.iter().cloned().collect();
    for key in &pending {
        pass.visit(key)?;
    }

    Ok(Propagation {
        store: pass.store,
        wave: pass.wave,
    })
}

/// Every key that transitively references `changed`, excluding `changed`.
fn collect_dependents(store: &Store, changed: &AttrKey) -> Result<BTreeSet<AttrKey>, ResolveError> {
    let mut walk = DependentWalk {
        store,
        path: Vec::new(),
        found: BTreeSet::new(),
    };
    walk.visit(changed)?;
    Ok(walk.found)
}

struct DependentWalk<'a> {
    store: &'a Store,
    path: Vec<AttrKey>,
    found: BTreeSet<AttrKey>,
}

impl DependentWalk<'_> {
    fn visit(&mut self, key: &AttrKey) -> Result<(), ResolveError> {
        self.path.push(key.clone());

        for dependent in self.store.dependents(key) {
            if self.path.contains(&dependent) {
                let mut path = self.path.clone();
                path.push(dependent);
                return Err(ResolveError::CyclicReference { path });
            }
            // a key already found off the path has been fully walked
            if self.found.insert(dependent.clone()) {
                self.visit(&dependent)?;
            }
        }

        self.path.pop();
        Ok(())
    }
}

struct Pass {
    store: Store,
    wave: Vec<AttrKey>,
    done: BTreeSet<AttrKey>,
    affected: BTreeSet<AttrKey>,
}

impl Pass {
    /// Recomputes `key` after the affected keys it references.
    fn visit(&mut self, key: &AttrKey) -> Result<(), ResolveError> {
        if self.done.contains(key) {
            return Ok(());
        }
        let raw = self.store.get(key)?.raw_input().to_string();
        for reference in swatch_refparser::references(&raw) {
            let target = AttrKey::from_reference(&reference);
            if self.affected.contains(&target) {
                self.visit(&target)?;
            }
        }
        self.recompute(key)
    }

    fn recompute(&mut self, key: &AttrKey) -> Result<(), ResolveError> {
        let raw = self.store.get(key)?.raw_input();
        let resolved = substitute(&self.store, key, raw)?;
        debug!(key = %key, value = %resolved, "recomputed");
        self.store = self.store.with_resolved(key, resolved)?;
        self.wave.push(key.clone());
        self.done.insert(key.clone());
        Ok(())
    }
}

/// Replaces every reference in `raw` with the referenced resolved value.
fn substitute(store: &Store, from: &AttrKey, raw: &str) -> Result<String, ResolveError> {
    swatch_refparser::substitute(raw, |reference| {
        let target = AttrKey::from_reference(reference);
        match store.try_get(&target) {
            Some(attribute) => {
                trace!(from = %from, to = %target, "substituted reference");
                Ok(attribute.resolved_value().to_string())
            }
            None => Err(ResolveError::UnresolvedReference {
                from: from.clone(),
                to: target,
            }),
        }
    })
}

/// Recomputes every attribute, dependencies first.
///
/// Used when a store is seeded or restored and no single attribute changed.
/// Fails on the first unresolved reference or cycle found.
pub fn resolve_all(store: &Store) -> Result<Store, ResolveError> {
    let mut walk = FullWalk {
        store: store.clone(),
        done: BTreeSet::new(),
        path: Vec::new(),
    };
    let keys: Vec<AttrKey> = store.keys().cloned().collect();
    for key in &keys {
        walk.visit(key)?;
    }
    Ok(walk.store)
}

/// Checks that every reference in the store resolves and that there are no
/// cycles, without producing a new revision.
pub fn check_references(store: &Store) -> Result<(), ResolveError> {
    resolve_all(store).map(|_| ())
}

struct FullWalk {
    store: Store,
    done: BTreeSet<AttrKey>,
    path: Vec<AttrKey>,
}

impl FullWalk {
    fn visit(&mut self, key: &AttrKey) -> Result<(), ResolveError> {
        if self.done.contains(key) {
            return Ok(());
        }
        if let Some(start) = self.path.iter().position(|k| k == key) {
            let mut path = self.path[start..].to_vec();
            path.push(key.clone());
            return Err(ResolveError::CyclicReference { path });
        }

        self.path.push(key.clone());
        let raw = self.store.get(key)?.raw_input().to_string();
        for reference in swatch_refparser::references(&raw) {
            let target = AttrKey::from_reference(&reference);
            if !self.store.contains(&target) {
                return Err(ResolveError::UnresolvedReference {
                    from: key.clone(),
                    to: target,
                });
            }
            self.visit(&target)?;
        }
        self.path.pop();

        let resolved = substitute(&self.store, key, &raw)?;
        self.store = self.store.with_resolved(key, resolved)?;
        self.done.insert(key.clone());
        Ok(())
    }
}
