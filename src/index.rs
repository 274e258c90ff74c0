use core::{fmt, iter::FusedIterator};

use crate::{invalid_index, storage::Header};

const TAIL_BIT: usize = 1 << (usize::BITS - 1);

/// A position in a [`Deque`](crate::Deque).
///
/// An index names a slot of the deque's buffer, tagged with the region (head
/// or tail) it belongs to. Indices order the same way the elements iterate,
/// and they carry no reference to the deque, so they survive any mutation that
/// doesn't move elements between slots: pushes that fit in the current
/// capacity, pops at the opposite end, and in-place writes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Index(usize);

impl Index {
    #[inline]
    pub(crate) const fn head(offset: usize) -> Self {
        debug_assert!(offset & TAIL_BIT == 0);
        Self(offset)
    }

    #[inline]
    pub(crate) const fn tail(offset: usize) -> Self {
        debug_assert!(offset & TAIL_BIT == 0);
        Self(offset | TAIL_BIT)
    }

    /// Whether the index points into the tail region, i.e. the part of the
    /// buffer that wrapped around to its start.
    #[inline]
    pub const fn is_tail(self) -> bool {
        self.0 & TAIL_BIT != 0
    }

    /// The slot offset within the buffer.
    #[inline]
    pub const fn offset(self) -> usize {
        self.0 & !TAIL_BIT
    }
}

impl fmt::Debug for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let region = if self.is_tail() { "Tail" } else { "Head" };
        f.debug_tuple(region).field(&self.offset()).finish()
    }
}

impl Header {
    #[inline]
    pub(crate) fn start_index(&self) -> Index {
        Index::head(self.head_start)
    }

    #[inline]
    pub(crate) fn end_index(&self) -> Index {
        if self.tail_count > 0 {
            Index::tail(self.tail_count)
        } else {
            Index::head(self.head_end)
        }
    }

    /// Whether `i` names a live element.
    #[inline]
    pub(crate) fn contains(&self, i: Index) -> bool {
        let o = i.offset();
        if i.is_tail() {
            o < self.tail_count
        } else {
            self.head_start <= o && o < self.head_end
        }
    }

    /// Distance of `i` from the start index. Panics unless `start <= i <= end`.
    #[track_caller]
    pub(crate) fn position(&self, i: Index) -> usize {
        let o = i.offset();
        if i.is_tail() {
            if self.tail_count > 0 && o <= self.tail_count {
                return o + self.head_len();
            }
        } else if self.head_start <= o && (o < self.head_end || (o == self.head_end && self.tail_count == 0))
        {
            return o - self.head_start;
        }
        invalid_index(i)
    }

    /// The index at logical position `position`, where `len()` maps to the end
    /// index.
    #[inline]
    pub(crate) fn index_at(&self, position: usize) -> Index {
        debug_assert!(position <= self.len());
        let head_len = self.head_len();
        if position < head_len {
            Index::head(self.head_start + position)
        } else if self.tail_count > 0 {
            Index::tail(position - head_len)
        } else {
            Index::head(self.head_end)
        }
    }

    #[track_caller]
    pub(crate) fn index_after(&self, i: Index) -> Index {
        let o = i.offset();
        if i.is_tail() {
            if o < self.tail_count {
                return Index::tail(o + 1);
            }
        } else if self.head_start <= o && o < self.head_end {
            return if o + 1 == self.capacity && self.tail_count > 0 {
                Index::tail(0)
            } else {
                Index::head(o + 1)
            };
        }
        invalid_index(i)
    }

    #[track_caller]
    pub(crate) fn index_before(&self, i: Index) -> Index {
        let o = i.offset();
        if i.is_tail() {
            if self.tail_count > 0 && o <= self.tail_count {
                return if o == 0 { Index::head(self.capacity - 1) } else { Index::tail(o - 1) };
            }
        } else if self.head_start < o && (o < self.head_end || (o == self.head_end && self.tail_count == 0)) {
            return Index::head(o - 1);
        }
        invalid_index(i)
    }

    #[track_caller]
    pub(crate) fn index_offset(&self, i: Index, n: isize) -> Index {
        let target = (self.position(i) as isize).checked_add(n);
        match target {
            Some(p) if p >= 0 && p as usize <= self.len() => self.index_at(p as usize),
            _ => invalid_index(i),
        }
    }

    #[track_caller]
    pub(crate) fn index_offset_limited(&self, i: Index, n: isize, limit: Index) -> Option<Index> {
        let from = self.position(i) as isize;
        let limit = self.position(limit) as isize;
        let crosses = if n >= 0 {
            limit >= from && n > limit - from
        } else {
            limit <= from && n < limit - from
        };
        if crosses {
            None
        } else {
            Some(self.index_offset(i, n))
        }
    }

    #[track_caller]
    pub(crate) fn distance(&self, from: Index, to: Index) -> isize {
        self.position(to) as isize - self.position(from) as isize
    }
}

/// Iterator over the indices of a deque's elements, see
/// [`Deque::indices`](crate::Deque::indices).
///
/// It holds a copy of the layout rather than a borrow, so the deque can be
/// mutated in place while looping.
#[derive(Clone, Debug)]
pub struct Indices {
    header: Header,
    next: Index,
    end: Index,
}

impl Indices {
    #[inline]
    pub(crate) fn new(header: Header) -> Self {
        Self { header, next: header.start_index(), end: header.end_index() }
    }
}

impl Iterator for Indices {
    type Item = Index;

    #[inline]
    fn next(&mut self) -> Option<Index> {
        if self.next == self.end {
            return None;
        }
        let i = self.next;
        self.next = self.header.index_after(i);
        Some(i)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl DoubleEndedIterator for Indices {
    #[inline]
    fn next_back(&mut self) -> Option<Index> {
        if self.next == self.end {
            return None;
        }
        self.end = self.header.index_before(self.end);
        Some(self.end)
    }
}

impl ExactSizeIterator for Indices {
    #[inline]
    fn len(&self) -> usize {
        self.header.distance(self.next, self.end) as usize
    }
}

impl FusedIterator for Indices {}
