//! Typed windows over host array storage

use std::fmt;
use std::marker::PhantomData;

use datum_bridge_core::{ArrayElement, BridgeError};

use crate::memory::ArrayMemoryHandle;
use crate::Result;

/// Whether a view may write to the storage it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutability {
    ReadOnly,
    Writable,
}

/// Zero-copy window of `dimension` elements over a shared handle
///
/// Reads are always available. Writes need a [`Mutability::Writable`] view
/// that is the only holder of its storage: clones of a view share the
/// handle, and a second wrap of the same address (converting one datum
/// twice) adds another record. Either blocks writes with `SharedView`
/// until all but one holder is dropped.
#[derive(Clone)]
pub struct TypedArrayView<'h, T: ArrayElement> {
    handle: ArrayMemoryHandle<'h>,
    dimension: usize,
    mutability: Mutability,
    _element: PhantomData<T>,
}

impl<'h, T: ArrayElement> TypedArrayView<'h, T> {
    /// Create a view over the first `dimension` elements of `handle`
    pub fn new(handle: ArrayMemoryHandle<'h>, dimension: usize, mutable: bool) -> Result<Self> {
        if handle.element_kind() != T::element_kind() {
            return Err(BridgeError::ElementTypeMismatch {
                declared: T::type_oid(),
                actual: handle.element_kind().oid(),
            }
            .into());
        }
        if dimension > handle.len() {
            return Err(BridgeError::InsufficientBuffer.into());
        }

        let mutability = if mutable {
            Mutability::Writable
        } else {
            Mutability::ReadOnly
        };

        Ok(Self {
            handle,
            dimension,
            mutability,
            _element: PhantomData,
        })
    }

    /// Number of elements in the view
    pub fn len(&self) -> usize {
        self.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.dimension == 0
    }

    pub fn mutability(&self) -> Mutability {
        self.mutability
    }

    pub fn is_writable(&self) -> bool {
        self.mutability == Mutability::Writable
    }

    /// Read-only copy of this view sharing the same handle
    pub fn read_only(&self) -> Self {
        Self {
            mutability: Mutability::ReadOnly,
            ..self.clone()
        }
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Result<T> {
        self.as_slice()
            .get(index)
            .copied()
            .ok_or_else(|| self.out_of_range(index))
    }

    /// Overwrite the element at `index` in host storage
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        let len = self.dimension;
        let slot = self
            .as_mut_slice()?
            .get_mut(index)
            .ok_or(BridgeError::OutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    /// All elements as a slice of host storage
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: wrap() checked non-null, alignment and byte size for
        // handle.len() elements, and new() checked dimension <= handle.len().
        // Writes need the only live record for this address, borrowed
        // mutably, so no mutable slice can coexist with this one. Wraps made
        // during such a borrow are excluded by wrap()'s contract.
        unsafe { std::slice::from_raw_parts(self.handle.as_ptr() as *const T, self.dimension) }
    }

    /// All elements as a mutable slice of host storage
    pub fn as_mut_slice(&mut self) -> Result<&mut [T]> {
        if !self.is_writable() {
            return Err(BridgeError::ReadOnlyView.into());
        }
        if !self.handle.is_unique() {
            return Err(BridgeError::SharedView.into());
        }

        // SAFETY: same region checks as as_slice(); this is the only record
        // for the address and it stays borrowed mutably for the lifetime of
        // the returned slice
        Ok(unsafe {
            std::slice::from_raw_parts_mut(self.handle.as_ptr() as *mut T, self.dimension)
        })
    }

    /// Overwrite every element with `src`, which must match the view's length
    pub fn fill_from(&mut self, src: &[T]) -> Result<()> {
        let len = self.dimension;
        let target = self.as_mut_slice()?;
        if src.len() != len {
            return Err(BridgeError::OutOfRange {
                index: src.len(),
                len,
            }
            .into());
        }
        target.copy_from_slice(src);
        Ok(())
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = T> + '_ {
        self.as_slice().iter().copied()
    }

    /// Copy the elements out of host storage
    pub fn to_vec(&self) -> Vec<T> {
        self.as_slice().to_vec()
    }

    /// Handle the view reads through
    pub fn handle(&self) -> &ArrayMemoryHandle<'h> {
        &self.handle
    }

    /// Number of handles sharing the view's storage record
    pub fn ref_count(&self) -> usize {
        self.handle.ref_count()
    }

    pub fn as_ptr(&self) -> *const T {
        self.handle.as_ptr() as *const T
    }

    fn out_of_range(&self, index: usize) -> crate::Error {
        BridgeError::OutOfRange {
            index,
            len: self.dimension,
        }
        .into()
    }
}

impl<T: ArrayElement> PartialEq for TypedArrayView<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: ArrayElement> fmt::Debug for TypedArrayView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedArrayView")
            .field("len", &self.dimension)
            .field("mutability", &self.mutability)
            .field("refs", &self.ref_count())
            .field("values", &self.as_slice())
            .finish()
    }
}
