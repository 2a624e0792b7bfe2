//! # sequence
//!
//! re-invokable generator sequences and the begin/end cursor interface
//!

use std::fmt;
use std::sync::Arc;

use crate::builder::Builder;
use crate::gen_impl::Generator;
use crate::scope::Scope;

/// a forward only, single pass pull cursor
///
/// cursors compare equal when they walk the same underlying sequence
/// instance, every end of sequence cursor equals every other
pub trait Cursor: PartialEq {
    /// the value type
    type Item;

    /// the value the cursor currently points to
    fn get(&self) -> Option<&Self::Item>;

    /// advance one step, may block
    fn increment(&mut self);

    /// check if this is the end of sequence cursor
    fn is_end(&self) -> bool;
}

/// a lazy sequence exposed as a begin/end pair of cursors
pub trait Enumerable {
    /// the value type
    type Item;
    /// the cursor type
    type Cursor: Cursor<Item = Self::Item>;

    /// a cursor positioned on the first value
    fn begin(&self) -> Self::Cursor;

    /// the end of sequence cursor
    fn end(&self) -> Self::Cursor;
}

impl<T: Send + 'static> Cursor for Generator<T> {
    type Item = T;

    #[inline]
    fn get(&self) -> Option<&T> {
        Generator::get(self)
    }

    #[inline]
    fn increment(&mut self) {
        Generator::increment(self)
    }

    #[inline]
    fn is_end(&self) -> bool {
        self.is_done()
    }
}

/// A lazily evaluated sequence backed by a generator body.
///
/// Every iteration invokes the body again from scratch on a fresh worker, so
/// a sequence can be walked any number of times, also concurrently. Nothing
/// runs until an iteration pulls its first value.
///
/// ```
/// use generator_seq::Gn;
///
/// let seq = Gn::sequence(|mut s| {
///     s.yield_(1);
///     s.yield_(2);
/// });
///
/// assert_eq!(seq.iter().count(), 2);
/// assert_eq!(seq.iter().last(), Some(2));
/// ```
pub struct Sequence<T> {
    body: Arc<dyn Fn(Scope<T>) + Send + Sync>,
    builder: Builder,
}

impl<T> Clone for Sequence<T> {
    fn clone(&self) -> Self {
        Sequence {
            body: self.body.clone(),
            builder: self.builder.clone(),
        }
    }
}

impl<T: Send + 'static> Sequence<T> {
    /// create a sequence with the default worker settings
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Scope<T>) + Send + Sync + 'static,
    {
        Self::with_builder(Builder::new(), f)
    }

    pub(crate) fn with_builder<F>(builder: Builder, f: F) -> Self
    where
        F: Fn(Scope<T>) + Send + Sync + 'static,
    {
        Sequence {
            body: Arc::new(f),
            builder,
        }
    }

    /// a not yet started generator for a fresh invocation of the body
    pub fn iter(&self) -> Generator<T> {
        let body = self.body.clone();
        self.builder.clone().generator(move |s| body(s))
    }

    /// a fresh invocation advanced to its first value
    pub fn begin(&self) -> Generator<T> {
        let mut g = self.iter();
        g.increment();
        g
    }

    /// the end of sequence cursor
    #[inline]
    pub fn end(&self) -> Generator<T> {
        Generator::end()
    }
}

impl<T: Send + 'static> Enumerable for Sequence<T> {
    type Item = T;
    type Cursor = Generator<T>;

    fn begin(&self) -> Generator<T> {
        Sequence::begin(self)
    }

    fn end(&self) -> Generator<T> {
        Sequence::end(self)
    }
}

impl<T: Send + 'static> IntoIterator for Sequence<T> {
    type Item = T;
    type IntoIter = Generator<T>;

    fn into_iter(self) -> Generator<T> {
        self.iter()
    }
}

impl<'a, T: Send + 'static> IntoIterator for &'a Sequence<T> {
    type Item = T;
    type IntoIter = Generator<T>;

    fn into_iter(self) -> Generator<T> {
        self.iter()
    }
}

impl<T> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Sequence<{}> {{ ... }}", std::any::type_name::<T>())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // walk a begin/end pair the way cursor based combinators do
    fn count_between<C: Cursor>(mut cur: C, end: C) -> usize {
        let mut n = 0;
        while cur != end {
            n += 1;
            cur.increment();
        }
        n
    }

    #[test]
    fn test_begin_end() {
        let seq = Sequence::new(|mut s| s.yield_from(0..5));
        assert_eq!(count_between(seq.begin(), seq.end()), 5);

        let b = seq.begin();
        assert_eq!(b.get(), Some(&0));
        assert!(!b.is_end());
        assert!(seq.end().is_end());
    }

    #[test]
    fn test_empty_begin_is_end() {
        let seq = Sequence::<i32>::new(|_| {});
        assert!(seq.begin() == seq.end());
        assert!(seq.begin().is_end());
    }

    #[test]
    fn test_begin_is_lazy_per_invocation() {
        let runs = Arc::new(AtomicUsize::new(0));
        let r = runs.clone();
        let seq = Sequence::new(move |mut s| {
            r.fetch_add(1, Ordering::SeqCst);
            s.yield_(());
        });

        let it = seq.iter();
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        drop(it);
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        let _first = seq.begin();
        let _second = seq.begin();
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_fresh_invocations_differ() {
        let seq = Sequence::new(|mut s| s.yield_(1));
        let a = seq.begin();
        let b = seq.begin();
        assert!(a != b);
    }
}
