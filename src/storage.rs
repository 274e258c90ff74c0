use alloc::alloc::{alloc, dealloc, handle_alloc_error, Layout};

use core::{
    marker::PhantomData,
    mem,
    ops::Range,
    ptr::{self, NonNull},
    slice,
    sync::atomic::{self, AtomicUsize, Ordering::*},
};

use crate::capacity_overflow;

/// Describes which slots of an arena are live.
///
/// The head occupies `head_start..head_end`. A non-empty tail occupies
/// `0..tail_count` and is only present while the head is anchored at the end
/// of the arena (`head_end == capacity`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Header {
    pub(crate) capacity: usize,
    pub(crate) head_start: usize,
    pub(crate) head_end: usize,
    pub(crate) tail_count: usize,
}

impl Header {
    #[inline]
    pub(crate) const fn new(capacity: usize) -> Self {
        Self { capacity, head_start: 0, head_end: 0, tail_count: 0 }
    }

    #[inline]
    pub(crate) const fn head_len(&self) -> usize {
        self.head_end - self.head_start
    }

    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.head_len() + self.tail_count
    }

    #[inline]
    pub(crate) const fn is_split(&self) -> bool {
        self.tail_count > 0
    }

    /// Called whenever the head runs dry: the tail (possibly empty) becomes
    /// the new head, anchored at offset 0.
    #[inline]
    pub(crate) fn promote_tail(&mut self) {
        self.head_start = 0;
        self.head_end = self.tail_count;
        self.tail_count = 0;
    }

    #[inline]
    pub(crate) fn debug_check(&self) {
        debug_assert!(self.head_start <= self.head_end && self.head_end <= self.capacity);
        debug_assert!(self.len() <= self.capacity);
        debug_assert!(
            self.tail_count == 0 || (self.head_end == self.capacity && self.head_start < self.head_end),
            "tail present without a head anchored at the end: {self:?}"
        );
        debug_assert!(self.head_start < self.head_end || self.head_start == 0);
    }
}

/// The start of every allocation, followed (after padding) by the slots.
struct ControlBlock {
    refs: AtomicUsize,
    header: Header,
}

/// Shared by every deque that has no capacity of its own. Never written to.
static EMPTY: ControlBlock = ControlBlock { refs: AtomicUsize::new(1), header: Header::new(0) };

/// A reference-counted handle to one arena of `T` slots and its [`Header`].
///
/// Cloning the handle only bumps the count. Anything that writes to the
/// arena or header requires `is_unique()`.
pub(crate) struct Storage<T> {
    ptr: NonNull<ControlBlock>,
    _marker: PhantomData<T>,
}

/// Drops the contents of a slot range, even when it is unwound through.
pub(crate) struct Dropper<T>(pub(crate) *mut [T]);

impl<T> Drop for Dropper<T> {
    fn drop(&mut self) {
        unsafe { ptr::drop_in_place(self.0) }
    }
}

impl<T> Storage<T> {
    const MIN_NON_ZERO_CAP: usize = if mem::size_of::<T>() == 1 {
        8
    } else if mem::size_of::<T>() <= 1024 {
        4
    } else {
        1
    };

    #[inline]
    pub(crate) fn empty() -> Self {
        Self {
            ptr: NonNull::from(&EMPTY),
            _marker: PhantomData,
        }
    }

    /// Allocates room for at least `min_capacity` elements.
    pub(crate) fn allocate(min_capacity: usize) -> Self {
        if min_capacity == 0 {
            return Self::empty();
        }
        Self::allocate_exact(min_capacity.max(Self::MIN_NON_ZERO_CAP))
    }

    /// Allocates room for exactly `capacity` elements.
    pub(crate) fn allocate_exact(capacity: usize) -> Self {
        if capacity == 0 {
            return Self::empty();
        }
        let (layout, _) = Self::layout(capacity);
        // SAFETY: the layout always includes the control block, so its size is non-zero.
        let raw = unsafe { alloc(layout) } as *mut ControlBlock;
        let Some(ptr) = NonNull::new(raw) else { handle_alloc_error(layout) };
        unsafe {
            ptr.as_ptr().write(ControlBlock { refs: AtomicUsize::new(1), header: Header::new(capacity) });
        }
        Self { ptr, _marker: PhantomData }
    }

    /// Moves the first `len` values behind `src` into a fresh allocation.
    ///
    /// # Safety
    /// `src` must be valid for `len` reads, and the caller must not use or drop
    /// those values afterwards.
    pub(crate) unsafe fn from_raw_parts_moved(src: *const T, len: usize) -> Self {
        let mut storage = Self::allocate(len);
        if len > 0 {
            ptr::copy_nonoverlapping(src, storage.data(), len);
            storage.header_mut().head_end = len;
        }
        storage
    }

    #[inline]
    fn layout(capacity: usize) -> (Layout, usize) {
        if mem::size_of::<T>() == 0 && capacity > isize::MAX as usize {
            capacity_overflow()
        }
        match Layout::array::<T>(capacity).and_then(|slots| Layout::new::<ControlBlock>().extend(slots)) {
            Ok((layout, offset)) if layout.size() <= isize::MAX as usize => (layout, offset),
            _ => capacity_overflow(),
        }
    }

    #[inline]
    pub(crate) fn is_singleton(&self) -> bool {
        ptr::eq(self.ptr.as_ptr(), &EMPTY)
    }

    #[inline]
    pub(crate) fn is_unique(&self) -> bool {
        !self.is_singleton() && self.block().refs.load(Acquire) == 1
    }

    #[inline]
    pub(crate) fn ptr_eq<U>(&self, other: &Storage<U>) -> bool {
        self.ptr == other.ptr
    }

    #[cfg(test)]
    pub(crate) fn as_ptr(&self) -> *const () {
        self.ptr.as_ptr() as *const ()
    }

    #[inline]
    fn block(&self) -> &ControlBlock {
        // SAFETY: the pointer always refers to a live control block, `EMPTY` included.
        unsafe { self.ptr.as_ref() }
    }

    #[inline]
    pub(crate) fn header(&self) -> &Header {
        &self.block().header
    }

    /// # Safety
    /// The handle must be unique (which also rules out the singleton).
    #[inline]
    #[track_caller]
    pub(crate) unsafe fn header_mut(&mut self) -> &mut Header {
        debug_assert!(self.is_unique());
        &mut (*self.ptr.as_ptr()).header
    }

    /// Pointer to slot 0.
    #[inline]
    pub(crate) fn data(&self) -> *mut T {
        if self.is_singleton() {
            return NonNull::dangling().as_ptr();
        }
        let (_, offset) = Self::layout(0);
        // SAFETY: the slots start `offset` bytes into the allocation.
        unsafe { (self.ptr.as_ptr() as *mut u8).add(offset) as *mut T }
    }

    /// # Safety
    /// `offset < capacity`, the slot is uninitialized and the handle is unique.
    /// The caller records the slot as live in the header afterwards.
    #[inline]
    pub(crate) unsafe fn initialize(&mut self, offset: usize, value: T) {
        debug_assert!(offset < self.header().capacity);
        self.data().add(offset).write(value)
    }

    /// # Safety
    /// The slot holds a value that the header no longer records as live.
    #[inline]
    pub(crate) unsafe fn move_out(&mut self, offset: usize) -> T {
        debug_assert!(offset < self.header().capacity);
        self.data().add(offset).read()
    }

    /// # Safety
    /// `range` must lie within `0..capacity`.
    #[inline]
    pub(crate) unsafe fn slots_mut(&mut self, range: Range<usize>) -> *mut [T] {
        ptr::slice_from_raw_parts_mut(self.data().add(range.start), range.len())
    }

    #[inline]
    pub(crate) fn slices(&self) -> (&[T], &[T]) {
        let h = self.header();
        let data = self.data();
        // SAFETY: the header records exactly these two ranges as initialized.
        unsafe {
            (
                slice::from_raw_parts(data.add(h.head_start), h.head_len()),
                slice::from_raw_parts(data, h.tail_count),
            )
        }
    }

    /// # Safety
    /// The handle must be unique.
    #[inline]
    pub(crate) unsafe fn slices_mut(&mut self) -> (&mut [T], &mut [T]) {
        debug_assert!(self.is_singleton() || self.is_unique());
        let h = *self.header();
        let data = self.data();
        (
            slice::from_raw_parts_mut(data.add(h.head_start), h.head_len()),
            slice::from_raw_parts_mut(data, h.tail_count),
        )
    }

    /// Moves (when unique) or clones the live elements into a new allocation of
    /// at least `capacity` slots, laid out as a single head starting at 0.
    pub(crate) fn relinearize(&mut self, capacity: usize)
    where
        T: Clone,
    {
        let len = self.header().len();
        debug_assert!(capacity >= len);
        let mut fresh = Self::allocate(capacity);
        let dst = fresh.data();

        if self.is_unique() {
            let (a, b) = self.slices();
            let (a_ptr, a_len, b_ptr, b_len) = (a.as_ptr(), a.len(), b.as_ptr(), b.len());
            unsafe {
                ptr::copy_nonoverlapping(a_ptr, dst, a_len);
                ptr::copy_nonoverlapping(b_ptr, dst.add(a_len), b_len);
                if len > 0 {
                    fresh.header_mut().head_end = len;
                }
                // the values now belong to `fresh`
                let old_capacity = self.header().capacity;
                *self.header_mut() = Header::new(old_capacity);
            }
        } else {
            let (a, b) = self.slices();
            for (i, item) in a.iter().chain(b).enumerate() {
                unsafe {
                    dst.add(i).write(item.clone());
                    fresh.header_mut().head_end += 1;
                }
            }
        }

        *self = fresh;
    }

    /// Clones the live elements into an allocation of the same capacity, at the
    /// same offsets, so every index stays meaningful.
    pub(crate) fn clone_layout_preserving(&self) -> Self
    where
        T: Clone,
    {
        let h = *self.header();
        let mut fresh = Self::allocate_exact(h.capacity);
        if h.len() == 0 {
            return fresh;
        }
        let dst = fresh.data();
        let (head, tail) = self.slices();

        // The header grows one slot at a time so a panicking `clone()` only
        // drops what was already written.
        unsafe {
            let fh = fresh.header_mut();
            fh.head_start = h.head_start;
            fh.head_end = h.head_start;
        }
        for item in head {
            unsafe {
                let end = fresh.header().head_end;
                dst.add(end).write(item.clone());
                fresh.header_mut().head_end = end + 1;
            }
        }
        for (i, item) in tail.iter().enumerate() {
            unsafe {
                dst.add(i).write(item.clone());
                fresh.header_mut().tail_count = i + 1;
            }
        }
        fresh
    }
}

impl<T> Clone for Storage<T> {
    #[inline]
    fn clone(&self) -> Self {
        if !self.is_singleton() {
            // See `Arc::clone` for why `Relaxed` suffices and why we abort.
            let old = self.block().refs.fetch_add(1, Relaxed);
            if old > isize::MAX as usize {
                std::process::abort();
            }
        }
        Self { ptr: self.ptr, _marker: PhantomData }
    }
}

impl<T> Drop for Storage<T> {
    fn drop(&mut self) {
        struct DeallocGuard {
            ptr: *mut u8,
            layout: Layout,
        }

        impl Drop for DeallocGuard {
            fn drop(&mut self) {
                unsafe { dealloc(self.ptr, self.layout) }
            }
        }

        if self.is_singleton() {
            return;
        }
        if self.block().refs.fetch_sub(1, Release) != 1 {
            return;
        }
        atomic::fence(Acquire);

        let h = *self.header();
        let (layout, _) = Self::layout(h.capacity);
        let _guard = DeallocGuard { ptr: self.ptr.as_ptr() as *mut u8, layout };

        if mem::needs_drop::<T>() {
            unsafe {
                let head = self.slots_mut(h.head_start..h.head_end);
                let tail = self.slots_mut(0..h.tail_count);
                let _tail = Dropper(tail);
                ptr::drop_in_place(head);
            }
        }
    }
}

unsafe impl<T: Send + Sync> Send for Storage<T> {}

unsafe impl<T: Send + Sync> Sync for Storage<T> {}
