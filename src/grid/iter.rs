//! Predicate-filtered cursors over the `(i, j, k)` space of a grid.
//!
//! [`GenericElementIterator`] walks a grid with `K` varying fastest, then
//! `J`, then `I`, visiting only the elements its [`ElementPredicate`]
//! accepts. It is both an explicit cursor (`initialise`, `is_done`,
//! `current`, `advance`) and an ordinary [`Iterator`]. On exhaustion the
//! position wraps back to the start, so two exhausted cursors over the same
//! window compare equal.

use std::fmt;
use std::iter::FusedIterator;

use crate::element::base::BaseElement;
use crate::element::capability::{ElementCapability, NoDofs};
use crate::geology::formation::Formation;
use crate::grid::formation_grid::FormationElementGrid;
use crate::topology::index::Index3;

/// Decides which elements an iterator visits.
pub trait ElementPredicate: Clone + Default {
    fn matches<C: ElementCapability>(&self, element: &BaseElement<C>) -> bool;
}

/// Accepts every element.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PredicateTrue;

impl ElementPredicate for PredicateTrue {
    #[inline]
    fn matches<C: ElementCapability>(&self, _element: &BaseElement<C>) -> bool {
        true
    }
}

/// Accepts elements whose layer element is active.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PredicateIsActive;

impl ElementPredicate for PredicateIsActive {
    #[inline]
    fn matches<C: ElementCapability>(&self, element: &BaseElement<C>) -> bool {
        element.is_active()
    }
}

/// Every element of a subdomain grid.
pub type ElementIterator<'g, F> = GenericElementIterator<'g, PredicateTrue, NoDofs, F>;

/// The active elements of a subdomain grid.
pub type ActiveElementIterator<'g, F> = GenericElementIterator<'g, PredicateIsActive, NoDofs, F>;

/// Cursor over the elements of a [`FormationElementGrid`] that satisfy `P`.
pub struct GenericElementIterator<'g, P, C, F>
where
    P: ElementPredicate,
    C: ElementCapability,
    F: Formation,
{
    grid: Option<&'g FormationElementGrid<C, F>>,
    start: Index3,
    end: Index3,
    current: Index3,
    complete: bool,
    predicate: P,
}

impl<'g, P, C, F> GenericElementIterator<'g, P, C, F>
where
    P: ElementPredicate,
    C: ElementCapability,
    F: Formation,
{
    /// A cursor positioned at the first matching element of `grid`.
    pub fn new(grid: &'g FormationElementGrid<C, F>, include_ghosts: bool) -> Self {
        let mut iter = Self::default();
        iter.initialise(grid, include_ghosts);
        iter
    }

    /// Attach to `grid` and move to the first matching element, or to the
    /// done state if none matches.
    pub fn initialise(&mut self, grid: &'g FormationElementGrid<C, F>, include_ghosts: bool) {
        self.grid = Some(grid);
        self.start = Index3::new(
            grid.first_i(include_ghosts),
            grid.first_j(include_ghosts),
            grid.first_k(),
        );
        self.end = Index3::new(
            grid.last_i(include_ghosts),
            grid.last_j(include_ghosts),
            grid.last_k(),
        );
        self.current = self.start;
        self.complete = false;
        if !self.current_matches() {
            self.advance();
        }
    }

    /// True before initialisation and after exhaustion.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.complete
    }

    /// Position of the current element, `None` when done.
    #[inline]
    pub fn position(&self) -> Option<Index3> {
        (!self.complete).then_some(self.current)
    }

    /// The element under the cursor.
    ///
    /// # Panics
    /// If the cursor is done.
    #[track_caller]
    pub fn current(&self) -> &'g BaseElement<C> {
        match self.grid {
            Some(grid) if !self.complete => grid.element(self.current.i, self.current.j, self.current.k),
            _ => panic!("dereferenced an element iterator that is done"),
        }
    }

    /// Move to the next matching element.
    pub fn advance(&mut self) -> &mut Self {
        if self.complete {
            return self;
        }
        loop {
            self.step();
            if self.complete || self.current_matches() {
                break;
            }
        }
        self
    }

    /// Advance and return the state from before the move.
    pub fn post_increment(&mut self) -> Self {
        let before = self.clone();
        self.advance();
        before
    }

    /// Advance `n` times, stopping early on exhaustion.
    pub fn advance_by(&mut self, n: usize) -> &mut Self {
        for _ in 0..n {
            if self.complete {
                break;
            }
            self.advance();
        }
        self
    }

    fn step(&mut self) {
        let (start, end) = (self.start, self.end);
        let c = &mut self.current;
        if c.k < end.k {
            c.k += 1;
        } else if c.j < end.j {
            c.k = start.k;
            c.j += 1;
        } else if c.i < end.i {
            c.k = start.k;
            c.j = start.j;
            c.i += 1;
        } else {
            *c = start;
            self.complete = true;
        }
    }

    fn current_matches(&self) -> bool {
        match self.grid {
            Some(grid) => {
                let element = grid.element(self.current.i, self.current.j, self.current.k);
                self.predicate.matches(element)
            }
            None => false,
        }
    }
}

impl<P, C, F> Default for GenericElementIterator<'_, P, C, F>
where
    P: ElementPredicate,
    C: ElementCapability,
    F: Formation,
{
    fn default() -> Self {
        Self {
            grid: None,
            start: Index3::default(),
            end: Index3::default(),
            current: Index3::default(),
            complete: true,
            predicate: P::default(),
        }
    }
}

impl<P, C, F> Clone for GenericElementIterator<'_, P, C, F>
where
    P: ElementPredicate,
    C: ElementCapability,
    F: Formation,
{
    fn clone(&self) -> Self {
        Self {
            grid: self.grid,
            start: self.start,
            end: self.end,
            current: self.current,
            complete: self.complete,
            predicate: self.predicate.clone(),
        }
    }
}

impl<P, C, F> PartialEq for GenericElementIterator<'_, P, C, F>
where
    P: ElementPredicate,
    C: ElementCapability,
    F: Formation,
{
    fn eq(&self, other: &Self) -> bool {
        let same_grid = match (self.grid, other.grid) {
            (Some(a), Some(b)) => std::ptr::eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_grid
            && self.start == other.start
            && self.end == other.end
            && self.current == other.current
            && self.complete == other.complete
    }
}

impl<P, C, F> fmt::Debug for GenericElementIterator<'_, P, C, F>
where
    P: ElementPredicate,
    C: ElementCapability,
    F: Formation,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericElementIterator")
            .field("bound", &self.grid.is_some())
            .field("start", &self.start)
            .field("end", &self.end)
            .field("current", &self.current)
            .field("complete", &self.complete)
            .finish()
    }
}

impl<'g, P, C, F> Iterator for GenericElementIterator<'g, P, C, F>
where
    P: ElementPredicate,
    C: ElementCapability,
    F: Formation,
{
    type Item = &'g BaseElement<C>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.complete {
            return None;
        }
        let element = self.current();
        self.advance();
        Some(element)
    }
}

impl<P, C, F> FusedIterator for GenericElementIterator<'_, P, C, F>
where
    P: ElementPredicate,
    C: ElementCapability,
    F: Formation,
{
}
