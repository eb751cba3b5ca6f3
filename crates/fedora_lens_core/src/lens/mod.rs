//! Composable bidirectional accessors.
//!
//! # Responsibility
//! - Define the `Lens` get/put contract and its composition.
//! - Provide the runtime path segments used by attribute declarations.
//!
//! # Invariants
//! - `get` never mutates its source.
//! - `put` returns a new source; parts outside the focus are untouched.
//! - Well-behaved lenses satisfy get-put, put-get and put-put, and
//!   `compose` preserves them.
//!
//! # See also
//! - `bridge` for how declared paths are folded into one lens per attribute.

use std::marker::PhantomData;

pub mod segment;

pub use segment::{Node, NodeKind, Segment, SegmentParseError, ValueShape};

/// Get/put pair focusing on an `A` inside an `S`.
pub trait Lens<S, A> {
    /// Projects the focused part out of `source`.
    fn get(&self, source: &S) -> A;

    /// Returns `source` with the focused part replaced by `value`.
    fn put(&self, source: &S, value: A) -> S;
}

impl<S, A, L> Lens<S, A> for &L
where
    L: Lens<S, A> + ?Sized,
{
    fn get(&self, source: &S) -> A {
        (**self).get(source)
    }

    fn put(&self, source: &S, value: A) -> S {
        (**self).put(source, value)
    }
}

impl<S, A, L> Lens<S, A> for Box<L>
where
    L: Lens<S, A> + ?Sized,
{
    fn get(&self, source: &S) -> A {
        (**self).get(source)
    }

    fn put(&self, source: &S, value: A) -> S {
        (**self).put(source, value)
    }
}

/// Type-erased lens over the runtime node universe.
pub type NodeLens = Box<dyn Lens<Node, Node> + Send + Sync>;

/// `outer` then `inner`, focusing through an intermediate `B`.
pub struct Composed<O, I, B> {
    outer: O,
    inner: I,
    _focus: PhantomData<fn() -> B>,
}

impl<S, B, A, O, I> Lens<S, A> for Composed<O, I, B>
where
    O: Lens<S, B>,
    I: Lens<B, A>,
{
    fn get(&self, source: &S) -> A {
        self.inner.get(&self.outer.get(source))
    }

    fn put(&self, source: &S, value: A) -> S {
        let part = self.outer.get(source);
        let updated = self.inner.put(&part, value);
        self.outer.put(source, updated)
    }
}

/// Composes two lenses: `outer` locates a substructure, `inner` focuses
/// within it.
pub fn compose<S, B, A, O, I>(outer: O, inner: I) -> Composed<O, I, B>
where
    O: Lens<S, B>,
    I: Lens<B, A>,
{
    Composed {
        outer,
        inner,
        _focus: PhantomData,
    }
}

/// Focuses on the whole source.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<S: Clone> Lens<S, S> for Identity {
    fn get(&self, source: &S) -> S {
        source.clone()
    }

    fn put(&self, _source: &S, value: S) -> S {
        value
    }
}

/// Lens backed by a pair of closures.
pub struct FnLens<G, P> {
    getter: G,
    putter: P,
}

impl<S, A, G, P> Lens<S, A> for FnLens<G, P>
where
    G: Fn(&S) -> A,
    P: Fn(&S, A) -> S,
{
    fn get(&self, source: &S) -> A {
        (self.getter)(source)
    }

    fn put(&self, source: &S, value: A) -> S {
        (self.putter)(source, value)
    }
}

/// Builds a lens from a getter and a putter.
pub fn lens<S, A, G, P>(getter: G, putter: P) -> FnLens<G, P>
where
    G: Fn(&S) -> A,
    P: Fn(&S, A) -> S,
{
    FnLens { getter, putter }
}

#[cfg(test)]
mod tests {
    use super::{compose, lens, Identity, Lens};

    type Pair = (i32, (String, bool));

    fn first() -> impl Lens<Pair, i32> {
        lens(|s: &Pair| s.0, |s: &Pair, v: i32| (v, s.1.clone()))
    }

    fn second() -> impl Lens<Pair, (String, bool)> {
        lens(
            |s: &Pair| s.1.clone(),
            |s: &Pair, v: (String, bool)| (s.0, v),
        )
    }

    fn name() -> impl Lens<(String, bool), String> {
        lens(
            |s: &(String, bool)| s.0.clone(),
            |s: &(String, bool), v: String| (v, s.1),
        )
    }

    #[test]
    fn composed_get_reaches_nested_focus() {
        let source: Pair = (1, ("a".to_string(), true));
        let path = compose(second(), name());
        assert_eq!(path.get(&source), "a");
    }

    #[test]
    fn composed_put_preserves_unrelated_parts() {
        let source: Pair = (7, ("a".to_string(), true));
        let path = compose(second(), name());
        let updated = path.put(&source, "b".to_string());
        assert_eq!(updated, (7, ("b".to_string(), true)));
        assert_eq!(source.1 .0, "a");
    }

    #[test]
    fn identity_is_neutral_under_composition() {
        let source: Pair = (3, ("x".to_string(), false));
        let left = compose(Identity, first());
        let right = compose(first(), Identity);
        assert_eq!(left.get(&source), first().get(&source));
        assert_eq!(right.put(&source, 9), first().put(&source, 9));
    }

    #[test]
    fn boxed_and_borrowed_lenses_compose() {
        let source: Pair = (3, ("x".to_string(), false));
        let boxed: Box<dyn Lens<Pair, (String, bool)>> = Box::new(second());
        let inner = name();
        let path = compose(boxed, &inner);
        assert_eq!(path.put(&source, "y".to_string()).1 .0, "y");
    }
}
