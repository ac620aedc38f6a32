//! Ordered composition of the handles produced by enumeration callbacks.
//!
//! A callback either produces nothing or hands back a handle (a future, an
//! iterator, a task of some kind). [`Series`] keeps the handles in the order
//! they were produced so they can be driven one after another.

use std::future::Future;

/// Result of an enumeration callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emit<H> {
    /// The callback produced no handle.
    Nothing,
    /// The callback produced a handle to be sequenced.
    Handle(H),
}

impl<H> From<Option<H>> for Emit<H> {
    fn from(value: Option<H>) -> Self {
        match value {
            Some(h) => Emit::Handle(h),
            None => Emit::Nothing,
        }
    }
}

impl<H> From<()> for Emit<H> {
    fn from(_: ()) -> Self {
        Emit::Nothing
    }
}

/// Handles in production order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series<H> {
    handles: Vec<H>,
}

impl<H> Series<H> {
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    pub fn push(&mut self, handle: H) {
        self.handles.push(handle);
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, H> {
        self.handles.iter()
    }

    /// `None` when nothing was collected, matching the "no handle" outcome
    /// of an enumeration.
    pub fn into_option(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }
}

impl<H> Default for Series<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> IntoIterator for Series<H> {
    type Item = H;
    type IntoIter = std::vec::IntoIter<H>;

    fn into_iter(self) -> Self::IntoIter {
        self.handles.into_iter()
    }
}

impl<H> FromIterator<H> for Series<H> {
    fn from_iter<T: IntoIterator<Item = H>>(iter: T) -> Self {
        Self {
            handles: iter.into_iter().collect(),
        }
    }
}

impl<F: Future> Series<F> {
    /// Await each future in turn; the next one is not polled until the
    /// previous one has completed.
    pub async fn run(self) -> Vec<F::Output> {
        let mut outputs = Vec::with_capacity(self.handles.len());
        for handle in self.handles {
            outputs.push(handle.await);
        }
        outputs
    }
}

impl<I: IntoIterator> Series<I> {
    /// Concatenate iterator handles into one stream of items, exhausting each
    /// handle before moving to the next.
    pub fn chain(self) -> impl Iterator<Item = I::Item> {
        self.handles.into_iter().flatten()
    }
}
