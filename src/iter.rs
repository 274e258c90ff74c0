use core::{fmt, iter::FusedIterator, mem, slice};

use crate::Deque;

/// Borrowing iterator over a [`Deque`], the head slice first, then the tail.
pub struct Iter<'a, T> {
    pub(crate) i1: slice::Iter<'a, T>,
    pub(crate) i2: slice::Iter<'a, T>,
}

/// Mutably borrowing iterator over a [`Deque`].
pub struct IterMut<'a, T> {
    pub(crate) i1: slice::IterMut<'a, T>,
    pub(crate) i2: slice::IterMut<'a, T>,
}

/// Owning iterator over a [`Deque`].
///
/// Elements are moved out when the deque's storage is not shared, and cloned
/// otherwise.
#[derive(Clone, Debug)]
pub struct IntoIter<T>(pub(crate) Deque<T>);

// Both borrowing iterators walk `i1` and swap in `i2` once it runs dry, so
// `i1` always holds the front of what's left (and `i2` the back when
// iterating in reverse).
macro_rules! two_slice_iter {
    ($name:ident, $item:ty) => {
        impl<'a, T> Iterator for $name<'a, T> {
            type Item = $item;

            #[inline]
            fn next(&mut self) -> Option<$item> {
                self.i1.next().or_else(|| {
                    mem::swap(&mut self.i1, &mut self.i2);
                    self.i1.next()
                })
            }

            #[inline]
            fn size_hint(&self) -> (usize, Option<usize>) {
                let len = self.i1.len() + self.i2.len();
                (len, Some(len))
            }

            fn nth(&mut self, n: usize) -> Option<$item> {
                let skip = self.i1.len();
                if n < skip {
                    return self.i1.nth(n);
                }
                mem::swap(&mut self.i1, &mut self.i2);
                self.i2 = Default::default();
                self.i1.nth(n - skip)
            }

            #[inline]
            fn count(self) -> usize {
                self.len()
            }

            #[inline]
            fn last(mut self) -> Option<$item> {
                self.next_back()
            }

            fn fold<B, F: FnMut(B, $item) -> B>(self, init: B, mut f: F) -> B {
                let front = self.i1.fold(init, &mut f);
                self.i2.fold(front, f)
            }
        }

        impl<'a, T> DoubleEndedIterator for $name<'a, T> {
            #[inline]
            fn next_back(&mut self) -> Option<$item> {
                self.i2.next_back().or_else(|| {
                    mem::swap(&mut self.i1, &mut self.i2);
                    self.i2.next_back()
                })
            }

            fn rfold<B, F: FnMut(B, $item) -> B>(self, init: B, mut f: F) -> B {
                let back = self.i2.rfold(init, &mut f);
                self.i1.rfold(back, f)
            }
        }

        impl<'a, T> ExactSizeIterator for $name<'a, T> {}

        impl<'a, T> FusedIterator for $name<'a, T> {}

        impl<'a, T: fmt::Debug> fmt::Debug for $name<'a, T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.i1.as_slice()).field(&self.i2.as_slice()).finish()
            }
        }
    };
}

two_slice_iter!(Iter, &'a T);
two_slice_iter!(IterMut, &'a mut T);

impl<'a, T> Clone for Iter<'a, T> {
    #[inline]
    fn clone(&self) -> Self {
        Self { i1: self.i1.clone(), i2: self.i2.clone() }
    }
}

impl<'a, T> IterMut<'a, T> {
    /// A borrowing view of the elements not yet yielded.
    #[inline]
    pub fn as_iter(&self) -> Iter<'_, T> {
        Iter { i1: self.i1.as_slice().iter(), i2: self.i2.as_slice().iter() }
    }
}

impl<T: Clone> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.0.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len(), Some(self.0.len()))
    }
}

impl<T: Clone> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.0.pop_back()
    }
}

impl<T: Clone> ExactSizeIterator for IntoIter<T> {}

impl<T: Clone> FusedIterator for IntoIter<T> {}
