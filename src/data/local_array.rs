//! Dense arrays addressed by *global* indices over a local window.
//!
//! [`LocalArray3`] stores one value per `(i, j, k)` of a ghost-extended
//! window `[first_i..=last_i] x [first_j..=last_j] x [first_k..=last_k]`,
//! with `k` varying fastest in memory. [`LocalArray2`] is the lateral
//! counterpart. Indexing outside the window is a programmer error and
//! panics; [`LocalArray3::get`] is the non-panicking lookup.

use crate::data::layout::GridLayout;
use crate::topology::index::Index3;
use itertools::iproduct;
use std::ops::{Index, IndexMut, RangeInclusive};

/// Dense 3-D storage over a closed global index window.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalArray3<T> {
    first: [usize; 3],
    len: [usize; 3],
    data: Vec<T>,
}

impl<T> LocalArray3<T> {
    /// Allocate the window `ranges[0] x ranges[1] x ranges[2]`, initialising
    /// each cell from its global position.
    ///
    /// # Panics
    /// If any range is empty.
    pub fn from_fn<G>(ranges: [RangeInclusive<usize>; 3], mut init: G) -> Self
    where
        G: FnMut(usize, usize, usize) -> T,
    {
        let first = [*ranges[0].start(), *ranges[1].start(), *ranges[2].start()];
        let len = [
            Self::range_len(&ranges[0]),
            Self::range_len(&ranges[1]),
            Self::range_len(&ranges[2]),
        ];
        let mut data = Vec::with_capacity(len[0] * len[1] * len[2]);
        for (i, j, k) in iproduct!(ranges[0].clone(), ranges[1].clone(), ranges[2].clone()) {
            data.push(init(i, j, k));
        }
        Self { first, len, data }
    }

    /// Allocate over the ghost-extended lateral window of `layout` and the
    /// depth range `0..depth`.
    pub fn over_layout<G>(layout: &GridLayout, depth: usize, init: G) -> Self
    where
        G: FnMut(usize, usize, usize) -> T,
    {
        assert!(depth > 0, "LocalArray3 needs at least one layer in depth");
        Self::from_fn(
            [layout.range_i(true), layout.range_j(true), 0..=depth - 1],
            init,
        )
    }

    fn range_len(range: &RangeInclusive<usize>) -> usize {
        assert!(
            range.start() <= range.end(),
            "LocalArray3 range {range:?} is empty"
        );
        range.end() - range.start() + 1
    }

    #[inline]
    fn offset(&self, i: usize, j: usize, k: usize) -> Option<usize> {
        let di = i.checked_sub(self.first[0]).filter(|&d| d < self.len[0])?;
        let dj = j.checked_sub(self.first[1]).filter(|&d| d < self.len[1])?;
        let dk = k.checked_sub(self.first[2]).filter(|&d| d < self.len[2])?;
        Some((di * self.len[1] + dj) * self.len[2] + dk)
    }

    /// First global index along `axis` (0 = I, 1 = J, 2 = K).
    #[inline]
    pub fn first(&self, axis: usize) -> usize {
        self.first[axis]
    }

    /// Last global index along `axis`, inclusive.
    #[inline]
    pub fn last(&self, axis: usize) -> usize {
        self.first[axis] + self.len[axis] - 1
    }

    #[inline]
    pub fn length(&self, axis: usize) -> usize {
        self.len[axis]
    }

    #[inline]
    pub fn range(&self, axis: usize) -> RangeInclusive<usize> {
        self.first(axis)..=self.last(axis)
    }

    /// Number of stored values.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn contains(&self, i: usize, j: usize, k: usize) -> bool {
        self.offset(i, j, k).is_some()
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<&T> {
        self.offset(i, j, k).map(|o| &self.data[o])
    }

    #[inline]
    pub fn get_mut(&mut self, i: usize, j: usize, k: usize) -> Option<&mut T> {
        self.offset(i, j, k).map(move |o| &mut self.data[o])
    }

    /// Global positions of every stored value, in storage order (K fastest).
    pub fn positions(&self) -> impl Iterator<Item = Index3> + '_ {
        iproduct!(self.range(0), self.range(1), self.range(2))
            .map(|(i, j, k)| Index3::new(i, j, k))
    }

    /// Values in storage order.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.data.iter()
    }

    /// Mutable values in storage order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.data.iter_mut()
    }

    #[track_caller]
    fn offset_or_panic(&self, i: usize, j: usize, k: usize) -> usize {
        match self.offset(i, j, k) {
            Some(o) => o,
            None => panic!(
                "index ({i}, {j}, {k}) outside local window {:?} x {:?} x {:?}",
                self.range(0),
                self.range(1),
                self.range(2)
            ),
        }
    }
}

impl<T: Clone> LocalArray3<T> {
    /// Allocate the window filled with `value`.
    pub fn filled(ranges: [RangeInclusive<usize>; 3], value: T) -> Self {
        Self::from_fn(ranges, |_, _, _| value.clone())
    }

    /// Overwrite every value.
    pub fn fill(&mut self, value: T) {
        self.data.iter_mut().for_each(|v| *v = value.clone());
    }
}

impl<T> Index<(usize, usize, usize)> for LocalArray3<T> {
    type Output = T;

    #[inline]
    #[track_caller]
    fn index(&self, (i, j, k): (usize, usize, usize)) -> &T {
        let o = self.offset_or_panic(i, j, k);
        &self.data[o]
    }
}

impl<T> IndexMut<(usize, usize, usize)> for LocalArray3<T> {
    #[inline]
    #[track_caller]
    fn index_mut(&mut self, (i, j, k): (usize, usize, usize)) -> &mut T {
        let o = self.offset_or_panic(i, j, k);
        &mut self.data[o]
    }
}

impl<T> Index<Index3> for LocalArray3<T> {
    type Output = T;

    #[inline]
    #[track_caller]
    fn index(&self, p: Index3) -> &T {
        &self[(p.i, p.j, p.k)]
    }
}

impl<T> IndexMut<Index3> for LocalArray3<T> {
    #[inline]
    #[track_caller]
    fn index_mut(&mut self, p: Index3) -> &mut T {
        &mut self[(p.i, p.j, p.k)]
    }
}

/// Dense 2-D storage over a closed global lateral window.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalArray2<T> {
    first: [usize; 2],
    len: [usize; 2],
    data: Vec<T>,
}

impl<T> LocalArray2<T> {
    /// Allocate over the ghost-extended window of `layout`.
    pub fn over_layout<G>(layout: &GridLayout, mut init: G) -> Self
    where
        G: FnMut(usize, usize) -> T,
    {
        let first = [layout.first_i(true), layout.first_j(true)];
        let len = [layout.length_i(true), layout.length_j(true)];
        let data = iproduct!(layout.range_i(true), layout.range_j(true))
            .map(|(i, j)| init(i, j))
            .collect();
        Self { first, len, data }
    }

    #[inline]
    fn offset(&self, i: usize, j: usize) -> Option<usize> {
        let di = i.checked_sub(self.first[0]).filter(|&d| d < self.len[0])?;
        let dj = j.checked_sub(self.first[1]).filter(|&d| d < self.len[1])?;
        Some(di * self.len[1] + dj)
    }

    #[inline]
    pub fn contains(&self, i: usize, j: usize) -> bool {
        self.offset(i, j).is_some()
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<&T> {
        self.offset(i, j).map(|o| &self.data[o])
    }

    #[inline]
    pub fn get_mut(&mut self, i: usize, j: usize) -> Option<&mut T> {
        self.offset(i, j).map(move |o| &mut self.data[o])
    }
}

impl<T> Index<(usize, usize)> for LocalArray2<T> {
    type Output = T;

    #[inline]
    #[track_caller]
    fn index(&self, (i, j): (usize, usize)) -> &T {
        match self.offset(i, j) {
            Some(o) => &self.data[o],
            None => panic!("index ({i}, {j}) outside local lateral window"),
        }
    }
}

impl<T> IndexMut<(usize, usize)> for LocalArray2<T> {
    #[inline]
    #[track_caller]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        match self.offset(i, j) {
            Some(o) => &mut self.data[o],
            None => panic!("index ({i}, {j}) outside local lateral window"),
        }
    }
}
