//! A double-ended queue with copy-on-write value semantics.
//!
//! [`Deque`] is a ring buffer: amortized O(1) pushes and pops at both ends and
//! O(1) random access. Cloning a deque is O(1) and shares the buffer; the first
//! mutation through a shared deque copies it.
//!
//! ```
//! use cowdeque::deque;
//!
//! let mut a = deque![1, 2, 3];
//! let b = a.clone();
//! a.push_front(0);
//! assert_eq!(a, [0, 1, 2, 3]);
//! assert_eq!(b, [1, 2, 3]);
//! ```

extern crate alloc;

use std::io;

use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    mem::{self, MaybeUninit},
    ops::{self, Range},
    ptr, slice,
};

mod index;
mod iter;
#[cfg(feature = "serde")]
mod serde;
mod storage;

pub use index::{Index, Indices};
pub use iter::{IntoIter, Iter, IterMut};

use storage::{Dropper, Storage};

/// Creates a [`Deque`] containing the arguments, like `vec!`.
#[macro_export]
macro_rules! deque {
    () => {
        $crate::Deque::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::Deque::from(::std::vec![$elem; $n])
    };
    ($($x:expr),+ $(,)?) => {
        $crate::Deque::from([$($x),+])
    };
}

pub struct Deque<T> {
    storage: Storage<T>,
}

impl<T> Deque<T> {
    /// Creates an empty deque. This does not allocate.
    #[inline]
    pub fn new() -> Self {
        Self { storage: Storage::empty() }
    }

    #[inline]
    fn from_storage(storage: Storage<T>) -> Self {
        storage.header().debug_check();
        Self { storage }
    }

    /// Creates a deque with room for at least `capacity` elements, filled by
    /// `init` through a [`SlotWriter`].
    ///
    /// If `init` returns an error, every element written so far is dropped
    /// before the error is returned.
    pub fn try_with_capacity_init<E, F>(capacity: usize, init: F) -> Result<Self, E>
    where
        F: FnOnce(&mut SlotWriter<'_, T>) -> Result<(), E>,
    {
        let mut storage = Storage::allocate(capacity);
        init(&mut SlotWriter { storage: &mut storage })?;
        Ok(Self::from_storage(storage))
    }

    /// Creates a deque with exactly `capacity` slots, handing them to `init`
    /// uninitialized along with a counter of how many it has filled.
    ///
    /// Whether `init` succeeds or fails, the first `*initialized` slots are
    /// taken to be initialized afterwards; on failure they are dropped before
    /// the error is returned.
    ///
    /// # Safety
    /// When `init` returns or unwinds, the first `*initialized` slots must hold
    /// valid values, and `*initialized` must not exceed `capacity`. Slots
    /// reported as initialized are dropped if `init` panics.
    pub unsafe fn from_uninit_capacity<E, F>(capacity: usize, init: F) -> Result<Self, E>
    where
        F: FnOnce(&mut [MaybeUninit<T>], &mut usize) -> Result<(), E>,
    {
        /// Drops the slots `init` reported as written if it unwinds.
        struct InitGuard<T> {
            data: *mut T,
            capacity: usize,
            initialized: *const usize,
        }

        impl<T> Drop for InitGuard<T> {
            fn drop(&mut self) {
                unsafe {
                    let n = (*self.initialized).min(self.capacity);
                    ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.data, n));
                }
            }
        }

        let mut storage = Storage::allocate_exact(capacity);
        let buf = slice::from_raw_parts_mut(storage.data() as *mut MaybeUninit<T>, capacity);
        let mut count = 0;
        let initialized: *mut usize = &mut count;
        let guard = InitGuard { data: storage.data(), capacity, initialized };
        let result = init(buf, &mut *initialized);
        mem::forget(guard);
        let initialized = *initialized;
        assert!(
            initialized <= capacity,
            "initializer reported {initialized} elements for a capacity of {capacity}"
        );
        if initialized > 0 {
            storage.header_mut().head_end = initialized;
        }
        result.map(|()| Self::from_storage(storage))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.storage.header().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many elements the buffer can hold.
    ///
    /// Even when `len() < capacity()`, pushing may still allocate if the buffer
    /// is shared with a clone.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.header().capacity
    }

    /// Whether the elements sit in one contiguous run of the buffer.
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        !self.storage.header().is_split()
    }

    #[inline]
    pub fn as_slices(&self) -> (&[T], &[T]) {
        self.storage.slices()
    }

    /// The elements as one slice, or `None` if they currently wrap around the
    /// end of the buffer (see [`make_contiguous`](Self::make_contiguous)).
    #[inline]
    pub fn as_contiguous(&self) -> Option<&[T]> {
        match self.as_slices() {
            (a, []) => Some(a),
            _ => None,
        }
    }

    #[inline]
    pub fn front(&self) -> Option<&T> {
        let (a, _) = self.as_slices();
        a.first()
    }

    #[inline]
    pub fn back(&self) -> Option<&T> {
        let (a, b) = self.as_slices();
        b.last().or_else(|| a.last())
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&T> {
        let (a, b) = self.as_slices();
        if idx < a.len() {
            a.get(idx)
        } else {
            b.get(idx - a.len())
        }
    }

    /// The element at `i`, or `None` if `i` doesn't name a live element.
    #[inline]
    pub fn get_at(&self, i: Index) -> Option<&T> {
        if self.storage.header().contains(i) {
            Some(unsafe { &*self.storage.data().add(i.offset()) })
        } else {
            None
        }
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        let (a, b) = self.as_slices();
        Iter { i1: a.iter(), i2: b.iter() }
    }

    /// The index of the first element, equal to `end_index()` when empty.
    #[inline]
    pub fn start_index(&self) -> Index {
        self.storage.header().start_index()
    }

    /// The index one past the last element.
    #[inline]
    pub fn end_index(&self) -> Index {
        self.storage.header().end_index()
    }

    /// # Panics
    /// If `i` is `end_index()` or not an index of this deque.
    #[inline]
    #[track_caller]
    pub fn index_after(&self, i: Index) -> Index {
        self.storage.header().index_after(i)
    }

    /// # Panics
    /// If `i` is `start_index()` or not an index of this deque.
    #[inline]
    #[track_caller]
    pub fn index_before(&self, i: Index) -> Index {
        self.storage.header().index_before(i)
    }

    /// Moves `i` by `n` positions, which may be negative.
    ///
    /// # Panics
    /// If the result would fall outside `start_index()..=end_index()`.
    #[inline]
    #[track_caller]
    pub fn index_offset(&self, i: Index, n: isize) -> Index {
        self.storage.header().index_offset(i, n)
    }

    /// Like [`index_offset`](Self::index_offset), but returns `None` if the
    /// move would pass `limit`.
    #[inline]
    #[track_caller]
    pub fn index_offset_limited(&self, i: Index, n: isize, limit: Index) -> Option<Index> {
        self.storage.header().index_offset_limited(i, n, limit)
    }

    /// The number of steps from `from` to `to`, negative if `to` comes first.
    #[inline]
    #[track_caller]
    pub fn distance(&self, from: Index, to: Index) -> isize {
        self.storage.header().distance(from, to)
    }

    /// The indices of all elements, front to back.
    ///
    /// The iterator doesn't borrow the deque, so elements can be written
    /// through those indices while looping.
    #[inline]
    pub fn indices(&self) -> Indices {
        Indices::new(*self.storage.header())
    }

    /// Removes every element. With `keep_capacity`, a buffer that isn't shared
    /// is kept for reuse; otherwise the deque goes back to the unallocated
    /// empty state.
    pub fn remove_all(&mut self, keep_capacity: bool) {
        if !keep_capacity || !self.storage.is_unique() {
            self.storage = Storage::empty();
            return;
        }
        unsafe {
            let h = *self.storage.header();
            let head = self.storage.slots_mut(h.head_start..h.head_end);
            let tail = self.storage.slots_mut(0..h.tail_count);
            *self.storage.header_mut() = storage::Header::new(h.capacity);
            let _tail = Dropper(tail);
            ptr::drop_in_place(head);
        }
    }

    /// Removes every element, keeping the buffer if it isn't shared.
    #[inline]
    pub fn clear(&mut self) {
        self.remove_all(true)
    }
}

impl<T: Clone> Deque<T> {
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_storage(Storage::allocate(capacity))
    }

    /// Makes sure no other deque shares the buffer, copying it at the same
    /// capacity and layout if needed. Indices stay valid.
    #[inline]
    fn make_unique(&mut self) {
        if !self.storage.is_unique() && !self.storage.is_singleton() {
            self.storage = self.storage.clone_layout_preserving();
        }
    }

    /// Makes sure the buffer is unshared and holds at least `min_capacity`
    /// elements. A reallocation grows geometrically unless `exact`.
    fn make_unique_with_capacity(&mut self, min_capacity: usize, exact: bool) {
        let capacity = self.capacity();
        if capacity >= min_capacity {
            self.make_unique();
            return;
        }
        let new_capacity = if exact { min_capacity } else { grown_capacity(capacity, min_capacity) };
        self.storage.relinearize(new_capacity);
    }

    /// Reserves room for at least `additional` more elements, growing
    /// geometrically.
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        let new_len = self.len().checked_add(additional).unwrap_or_else(|| capacity_overflow());
        self.make_unique_with_capacity(new_len, false);
    }

    /// Makes sure the buffer is unshared and can hold `min_capacity` elements
    /// in total. If it already can and isn't shared, this does nothing.
    #[inline]
    pub fn reserve_capacity(&mut self, min_capacity: usize) {
        self.make_unique_with_capacity(min_capacity, true);
    }

    #[inline]
    fn reserve_for_push(&mut self) {
        let len = self.len();
        if len == self.capacity() || !self.storage.is_unique() {
            self.make_unique_with_capacity(len.checked_add(1).unwrap_or_else(|| capacity_overflow()), false);
        }
    }

    /// Rearranges the elements into one contiguous run and returns it.
    pub fn make_contiguous(&mut self) -> &mut [T] {
        if self.storage.header().is_split() {
            let capacity = self.capacity();
            self.storage.relinearize(capacity);
        } else {
            self.make_unique();
        }
        unsafe { self.storage.slices_mut().0 }
    }

    #[inline]
    pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        self.make_unique();
        unsafe { self.storage.slices_mut() }
    }

    /// Mutable version of [`as_contiguous`](Self::as_contiguous).
    #[inline]
    pub fn as_contiguous_mut(&mut self) -> Option<&mut [T]> {
        if self.storage.header().is_split() {
            return None;
        }
        Some(self.as_mut_slices().0)
    }

    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        let (a, _) = self.as_mut_slices();
        a.first_mut()
    }

    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        let (a, b) = self.as_mut_slices();
        match b.last_mut() {
            Some(t) => Some(t),
            None => a.last_mut(),
        }
    }

    #[inline]
    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        if idx >= self.len() {
            return None;
        }
        let (a, b) = self.as_mut_slices();
        if idx < a.len() {
            a.get_mut(idx)
        } else {
            b.get_mut(idx - a.len())
        }
    }

    /// Mutable version of [`get_at`](Self::get_at). Copies a shared buffer
    /// at its current layout, so `i` keeps naming the same element.
    #[inline]
    pub fn get_at_mut(&mut self, i: Index) -> Option<&mut T> {
        if !self.storage.header().contains(i) {
            return None;
        }
        self.make_unique();
        Some(unsafe { &mut *self.storage.data().add(i.offset()) })
    }

    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let (a, b) = self.as_mut_slices();
        IterMut { i1: a.iter_mut(), i2: b.iter_mut() }
    }

    /// # Safety
    /// The buffer must be unshared and have a free slot.
    #[inline]
    unsafe fn push_back_unchecked(&mut self, value: T) {
        let h = *self.storage.header();
        if h.head_end < h.capacity {
            self.storage.initialize(h.head_end, value);
            self.storage.header_mut().head_end += 1;
        } else {
            self.storage.initialize(h.tail_count, value);
            self.storage.header_mut().tail_count += 1;
        }
    }

    #[inline]
    pub fn push_back(&mut self, value: T) {
        self.reserve_for_push();
        // SAFETY: reserve_for_push() made the buffer unique with len < capacity
        unsafe { self.push_back_unchecked(value) }
    }

    #[inline]
    pub fn push_front(&mut self, value: T) {
        self.reserve_for_push();
        let h = *self.storage.header();
        unsafe {
            if h.head_start > 0 {
                self.storage.initialize(h.head_start - 1, value);
                self.storage.header_mut().head_start -= 1;
            } else {
                // no room before the head: start a new head at the end of the
                // buffer and let the old one become the tail
                let last = h.capacity - 1;
                self.storage.initialize(last, value);
                let hm = self.storage.header_mut();
                hm.tail_count = h.head_len();
                hm.head_start = last;
                hm.head_end = h.capacity;
            }
        }
    }

    /// Writes items from `iter` into the free slots behind the back, without
    /// reallocating. Returns `true` once the iterator is exhausted.
    ///
    /// # Safety
    /// The buffer must be unshared.
    unsafe fn fill_back<I: Iterator<Item = T>>(&mut self, iter: &mut I) -> bool {
        let data = self.storage.data();
        let h = *self.storage.header();
        if h.tail_count == 0 {
            for offset in h.head_end..h.capacity {
                match iter.next() {
                    Some(t) => {
                        data.add(offset).write(t);
                        self.storage.header_mut().head_end = offset + 1;
                    }
                    None => return true,
                }
            }
            if self.storage.header().head_start == 0 {
                return false;
            }
        }
        let h = *self.storage.header();
        for offset in h.tail_count..h.head_start {
            match iter.next() {
                Some(t) => {
                    data.add(offset).write(t);
                    self.storage.header_mut().tail_count = offset + 1;
                }
                None => return true,
            }
        }
        false
    }

    /// Inserts the items of `iter`, in order, in front of the first element.
    ///
    /// ```
    /// use cowdeque::deque;
    ///
    /// let mut d = deque![3, 4];
    /// d.extend_front([1, 2]);
    /// assert_eq!(d, [1, 2, 3, 4]);
    /// ```
    pub fn extend_front<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        if self.is_empty() {
            return self.extend(iter);
        }
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        let h = *self.storage.header();
        if lower > 0 && self.storage.is_unique() && lower <= h.capacity - h.len() {
            // SAFETY: the buffer is unique and has `lower` free slots
            unsafe { self.prepend_in_place(iter, lower) }
        } else {
            self.prepend_into_fresh(iter, lower)
        }
    }

    /// # Safety
    /// The buffer must be unshared, non-empty, with at least `n` free slots.
    unsafe fn prepend_in_place<I: Iterator<Item = T>>(&mut self, mut iter: I, n: usize) {
        /// Owns items written in front of the head that the header doesn't
        /// cover yet.
        struct PrefixGuard<T> {
            data: *mut T,
            segments: [Range<usize>; 2],
        }

        impl<T> PrefixGuard<T> {
            fn written(&self) -> usize {
                self.segments[0].len() + self.segments[1].len()
            }
        }

        impl<T> Drop for PrefixGuard<T> {
            fn drop(&mut self) {
                let [first, second] = &self.segments;
                unsafe {
                    let _second = Dropper(ptr::slice_from_raw_parts_mut(self.data.add(second.start), second.len()));
                    ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.data.add(first.start), first.len()));
                }
            }
        }

        let h = *self.storage.header();
        let data = self.storage.data();

        // The slots logically in front of the head, in iteration order.
        let targets = if n <= h.head_start {
            [h.head_start - n..h.head_start, 0..0]
        } else {
            debug_assert_eq!(h.tail_count, 0);
            let wrapped = n - h.head_start;
            [h.capacity - wrapped..h.capacity, 0..h.head_start]
        };

        let mut guard = PrefixGuard {
            data,
            segments: [targets[0].start..targets[0].start, targets[1].start..targets[1].start],
        };
        'fill: for (segment, target) in targets.iter().enumerate() {
            for offset in target.clone() {
                match iter.next() {
                    Some(t) => {
                        data.add(offset).write(t);
                        guard.segments[segment].end = offset + 1;
                    }
                    None => break 'fill,
                }
            }
        }

        if guard.written() < n {
            // The iterator came up short; take the items back and push them
            // one at a time.
            let mut placed = Vec::with_capacity(guard.written());
            for segment in mem::take(&mut guard.segments) {
                placed.extend(segment.map(|offset| data.add(offset).read()));
            }
            mem::forget(guard);
            for t in placed.into_iter().rev() {
                self.push_front(t);
            }
            return;
        }

        match iter.next() {
            None => {
                mem::forget(guard);
                let hm = self.storage.header_mut();
                if n <= h.head_start {
                    hm.head_start -= n;
                } else {
                    hm.tail_count = h.head_end;
                    hm.head_start = targets[0].start;
                    hm.head_end = h.capacity;
                }
            }
            Some(overflow) => {
                // The size hint was only a lower bound. Start over in a larger
                // buffer holding the new items, then the old ones.
                let (rest, _) = iter.size_hint();
                let needed = h.len().saturating_add(n).saturating_add(1).saturating_add(rest);
                let mut fresh = Self::from_storage(Storage::allocate(grown_capacity(h.capacity, needed)));
                let dst = fresh.storage.data();
                let mut len = 0;
                for segment in &guard.segments {
                    ptr::copy_nonoverlapping(data.add(segment.start), dst.add(len), segment.len());
                    len += segment.len();
                }
                fresh.storage.header_mut().head_end = len;
                mem::forget(guard);
                fresh.push_back(overflow);
                fresh.extend(iter);
                fresh.extend(mem::take(self));
                *self = fresh;
            }
        }
    }

    fn prepend_into_fresh<I: Iterator<Item = T>>(&mut self, mut iter: I, lower: usize) {
        let Some(first) = iter.next() else { return };
        let needed = self.len().saturating_add(lower).saturating_add(1);
        let mut fresh = Self::from_storage(Storage::allocate(grown_capacity(self.capacity(), needed)));
        fresh.push_back(first);
        fresh.extend(iter);
        fresh.extend(mem::take(self));
        *self = fresh;
    }

    #[inline]
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        self.make_unique();
        unsafe {
            let h = self.storage.header_mut();
            let offset = h.head_start;
            h.head_start += 1;
            if h.head_start == h.head_end {
                h.promote_tail();
            }
            Some(self.storage.move_out(offset))
        }
    }

    #[inline]
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        self.make_unique();
        unsafe {
            let h = self.storage.header_mut();
            let offset = if h.tail_count > 0 {
                h.tail_count -= 1;
                h.tail_count
            } else {
                h.head_end -= 1;
                let offset = h.head_end;
                if h.head_start == h.head_end {
                    h.promote_tail();
                }
                offset
            };
            Some(self.storage.move_out(offset))
        }
    }

    /// # Panics
    /// If the deque is empty.
    #[inline]
    #[track_caller]
    pub fn remove_first(&mut self) -> T {
        self.pop_front().unwrap_or_else(|| empty_removal())
    }

    /// # Panics
    /// If the deque is empty.
    #[inline]
    #[track_caller]
    pub fn remove_last(&mut self) -> T {
        self.pop_back().unwrap_or_else(|| empty_removal())
    }

    /// Drops the first `k` elements.
    ///
    /// # Panics
    /// If `k > len()`.
    #[track_caller]
    pub fn remove_first_n(&mut self, k: usize) {
        let len = self.len();
        if k > len {
            removal_out_of_range(k, len)
        }
        if k == 0 {
            return;
        }
        self.make_unique();
        unsafe {
            let before = *self.storage.header();
            let from_head = k.min(before.head_len());
            let from_tail = k - from_head;
            let head = self.storage.slots_mut(before.head_start..before.head_start + from_head);
            let tail = self.storage.slots_mut(0..from_tail);

            let h = self.storage.header_mut();
            h.head_start += from_head;
            if h.head_start == h.head_end {
                h.promote_tail();
                h.head_start = from_tail;
                if h.head_start == h.head_end {
                    h.promote_tail();
                }
            }

            let _tail = Dropper(tail);
            ptr::drop_in_place(head);
        }
    }

    /// Drops the last `k` elements.
    ///
    /// # Panics
    /// If `k > len()`.
    #[track_caller]
    pub fn remove_last_n(&mut self, k: usize) {
        let len = self.len();
        if k > len {
            removal_out_of_range(k, len)
        }
        if k == 0 {
            return;
        }
        self.make_unique();
        unsafe {
            let before = *self.storage.header();
            let from_tail = k.min(before.tail_count);
            let from_head = k - from_tail;
            let tail = self.storage.slots_mut(before.tail_count - from_tail..before.tail_count);
            let head = self.storage.slots_mut(before.head_end - from_head..before.head_end);

            let h = self.storage.header_mut();
            h.tail_count -= from_tail;
            h.head_end -= from_head;
            if h.head_start == h.head_end {
                h.promote_tail();
            }

            let _head = Dropper(head);
            ptr::drop_in_place(tail);
        }
    }
}

/// Sequential writer over the uninitialized slots of a deque under
/// construction, see [`Deque::try_with_capacity_init`].
pub struct SlotWriter<'a, T> {
    storage: &'a mut Storage<T>,
}

impl<'a, T> SlotWriter<'a, T> {
    /// Appends `value`, or hands it back if every slot is filled.
    #[inline]
    pub fn push(&mut self, value: T) -> Result<(), T> {
        let h = *self.storage.header();
        if h.head_end == h.capacity {
            return Err(value);
        }
        unsafe {
            self.storage.initialize(h.head_end, value);
            self.storage.header_mut().head_end += 1;
        }
        Ok(())
    }

    /// How many slots have been filled.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.header().head_end
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.header().capacity
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.len()
    }
}

impl<T> Clone for Deque<T> {
    /// Shares the buffer; no elements are copied until one side mutates.
    #[inline]
    fn clone(&self) -> Self {
        Self { storage: self.storage.clone() }
    }
}

impl<T> Default for Deque<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for Deque<T> {
    fn from(mut v: Vec<T>) -> Self {
        let len = v.len();
        unsafe {
            v.set_len(0);
            Self::from_storage(Storage::from_raw_parts_moved(v.as_ptr(), len))
        }
    }
}

impl<T, const N: usize> From<[T; N]> for Deque<T> {
    #[inline]
    fn from(arr: [T; N]) -> Self {
        let arr = mem::ManuallyDrop::new(arr);
        unsafe { Self::from_storage(Storage::from_raw_parts_moved(arr.as_ptr(), N)) }
    }
}

impl<T: Clone> From<Deque<T>> for Vec<T> {
    #[inline]
    fn from(d: Deque<T>) -> Self {
        d.into_iter().collect()
    }
}

impl<T: Clone> Extend<T> for Deque<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let mut iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        loop {
            // SAFETY: reserve() above or in the previous round left the buffer unique
            if unsafe { self.fill_back(&mut iter) } {
                return;
            }
            match iter.next() {
                Some(t) => {
                    self.reserve(iter.size_hint().0.saturating_add(1));
                    unsafe { self.push_back_unchecked(t) }
                }
                None => return,
            }
        }
    }
}

impl<'a, T: 'a + Copy> Extend<&'a T> for Deque<T> {
    #[inline]
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied())
    }
}

impl<T: Clone> FromIterator<T> for Deque<T> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut d = Self::new();
        d.extend(iter);
        d
    }
}

impl<T: fmt::Debug> fmt::Debug for Deque<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq<U>, U> PartialEq<Deque<U>> for Deque<T> {
    fn eq(&self, other: &Deque<U>) -> bool {
        if self.len() != other.len() {
            return false;
        }
        if self.is_empty() || self.storage.ptr_eq(&other.storage) {
            return true;
        }
        let (a, b) = self.as_slices();
        let (c, d) = other.as_slices();
        match a.len().cmp(&c.len()) {
            Ordering::Equal => a == c && b == d,
            Ordering::Less => {
                let front = a.len();
                let mid = c.len() - front;
                let (c_front, c_mid) = c.split_at(front);
                let (b_mid, b_back) = b.split_at(mid);
                a == c_front && b_mid == c_mid && b_back == d
            }
            Ordering::Greater => {
                let front = c.len();
                let mid = a.len() - front;
                let (a_front, a_mid) = a.split_at(front);
                let (d_mid, d_back) = d.split_at(mid);
                a_front == c && a_mid == d_mid && b == d_back
            }
        }
    }
}

impl<T: PartialEq<U>, U> PartialEq<[U]> for Deque<T> {
    #[inline]
    fn eq(&self, other: &[U]) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let (a, b) = self.as_slices();
        let (c, d) = other.split_at(a.len());
        a == c && b == d
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<[U; N]> for Deque<T> {
    #[inline]
    fn eq(&self, other: &[U; N]) -> bool {
        self == other.as_slice()
    }
}

impl<T: PartialEq<U>, U> PartialEq<Vec<U>> for Deque<T> {
    #[inline]
    fn eq(&self, other: &Vec<U>) -> bool {
        self == other.as_slice()
    }
}

impl<T: PartialOrd> PartialOrd for Deque<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other)
    }
}

impl<T: Ord> Ord for Deque<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other)
    }
}

impl<T: Eq> Eq for Deque<T> {}

impl<T: Hash> Hash for Deque<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        self.iter().for_each(|t| t.hash(state));
    }
}

impl<T> ops::Index<usize> for Deque<T> {
    type Output = T;

    #[inline]
    #[track_caller]
    fn index(&self, index: usize) -> &Self::Output {
        match self.get(index) {
            Some(t) => t,
            None => out_of_bounds(index, self.len()),
        }
    }
}

impl<T: Clone> ops::IndexMut<usize> for Deque<T> {
    #[inline]
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        let len = self.len();
        match self.get_mut(index) {
            Some(t) => t,
            None => out_of_bounds(index, len),
        }
    }
}

impl<T> ops::Index<Index> for Deque<T> {
    type Output = T;

    #[inline]
    #[track_caller]
    fn index(&self, index: Index) -> &Self::Output {
        match self.get_at(index) {
            Some(t) => t,
            None => invalid_index(index),
        }
    }
}

impl<T: Clone> ops::IndexMut<Index> for Deque<T> {
    #[inline]
    #[track_caller]
    fn index_mut(&mut self, index: Index) -> &mut Self::Output {
        match self.get_at_mut(index) {
            Some(t) => t,
            None => invalid_index(index),
        }
    }
}

impl io::Write for Deque<u8> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.extend(buf);
        Ok(buf.len())
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Read for Deque<u8> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let (a, _) = self.as_slices();
        let n = a.len().min(buf.len());
        buf[..n].copy_from_slice(&a[..n]);
        self.remove_first_n(n);
        Ok(n)
    }
}

impl<T: Clone> IntoIterator for Deque<T> {
    type Item = T;

    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self)
    }
}

impl<'a, T> IntoIterator for &'a Deque<T> {
    type Item = &'a T;

    type IntoIter = Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T: Clone> IntoIterator for &'a mut Deque<T> {
    type Item = &'a mut T;

    type IntoIter = IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// The capacity for a buffer that must hold `needed` elements: unchanged if
/// it already fits, otherwise at least doubled.
#[inline]
fn grown_capacity(capacity: usize, needed: usize) -> usize {
    if needed <= capacity {
        capacity
    } else {
        needed.max(capacity.saturating_mul(2))
    }
}

#[cold]
#[track_caller]
pub(crate) fn capacity_overflow() -> ! {
    panic!("capacity overflow");
}

#[cold]
#[track_caller]
pub(crate) fn invalid_index(i: Index) -> ! {
    panic!("index out of range: {i:?}");
}

#[cold]
#[track_caller]
fn out_of_bounds(index: usize, len: usize) -> ! {
    panic!("index out of bounds: the len is {len} but the index is {index}");
}

#[cold]
#[track_caller]
fn empty_removal() -> ! {
    panic!("cannot remove an element from an empty deque");
}

#[cold]
#[track_caller]
fn removal_out_of_range(k: usize, len: usize) -> ! {
    panic!("cannot remove {k} elements from a deque of length {len}");
}
