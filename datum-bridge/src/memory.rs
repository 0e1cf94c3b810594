//! Non-owning handle over host array storage
//!
//! The host allocates and frees array storage; the bridge only refers to it.
//! [`ArrayMemoryHandle`] records where the storage is and how many elements
//! of which kind it holds, and is shared between views through an atomic
//! reference count. Dropping the last handle releases the record, never
//! the storage.
//!
//! Every live record is also counted per storage address, so a handle can
//! tell when the same storage was wrapped again (for instance by converting
//! one datum twice) and refuse writes while that is the case.

use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use datum_bridge_core::{BridgeError, ElementKind};
use hashbrown::HashMap;

use crate::Result;

/// Live region records per storage address
fn live_regions() -> MutexGuard<'static, HashMap<usize, usize>> {
    static LIVE: OnceLock<Mutex<HashMap<usize, usize>>> = OnceLock::new();
    LIVE.get_or_init(Default::default)
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct Region {
    ptr: NonNull<u8>,
    len: usize,
    element: ElementKind,
}

impl Region {
    fn register(ptr: NonNull<u8>, len: usize, element: ElementKind) -> Self {
        *live_regions().entry(ptr.as_ptr() as usize).or_insert(0) += 1;
        Self { ptr, len, element }
    }

    fn address(&self) -> usize {
        self.ptr.as_ptr() as usize
    }
}

impl Drop for Region {
    fn drop(&mut self) {
        let mut live = live_regions();
        if let Some(count) = live.get_mut(&self.address()) {
            *count -= 1;
            if *count == 0 {
                live.remove(&self.address());
            }
        }
    }
}

// SAFETY: Region is a plain address record. It never dereferences the
// pointer itself; all access goes through views that bounds-check and
// whose validity is tied to the host scope lifetime.
unsafe impl Send for Region {}
unsafe impl Sync for Region {}

/// Shared, non-owning reference to host-allocated array storage
///
/// `'h` is the host scope that owns the storage. No handle, and nothing
/// built from one, can outlive it.
#[derive(Clone)]
pub struct ArrayMemoryHandle<'h> {
    region: Arc<Region>,
    _scope: PhantomData<&'h [u8]>,
}

impl<'h> ArrayMemoryHandle<'h> {
    /// Wrap host storage holding `len` elements of `element`
    ///
    /// # Safety
    ///
    /// `ptr` must point at `len * element.size_bytes()` bytes of storage
    /// that the host keeps allocated and unmoved for the whole of `'h`, and
    /// does not write while views built from this handle are alive.
    ///
    /// The same storage must not be wrapped again while a slice obtained
    /// from [`TypedArrayView::as_mut_slice`](crate::TypedArrayView::as_mut_slice)
    /// is borrowed. Wraps made before that point are detected and block the
    /// write; a wrap made during the borrow cannot be.
    pub unsafe fn wrap(ptr: *mut u8, len: usize, element: ElementKind) -> Result<Self> {
        let ptr = NonNull::new(ptr).ok_or(BridgeError::NullPointer)?;
        if (ptr.as_ptr() as usize) % element.align_bytes() != 0 {
            return Err(BridgeError::ArrayAlignment.into());
        }
        len.checked_mul(element.size_bytes())
            .filter(|&bytes| bytes <= isize::MAX as usize)
            .ok_or(BridgeError::ArraySizeOverflow)?;

        Ok(Self {
            region: Arc::new(Region::register(ptr, len, element)),
            _scope: PhantomData,
        })
    }

    /// Start of the storage
    pub fn as_ptr(&self) -> *mut u8 {
        self.region.ptr.as_ptr()
    }

    /// Number of elements in the storage
    pub fn len(&self) -> usize {
        self.region.len
    }

    pub fn is_empty(&self) -> bool {
        self.region.len == 0
    }

    /// Element type tag of the storage
    pub fn element_kind(&self) -> ElementKind {
        self.region.element
    }

    /// Number of live handles sharing this storage record
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.region)
    }

    /// Whether this is the only handle to the storage
    ///
    /// False while the record is shared with a clone, or while another
    /// record wraps the same address. Takes `&mut self` so that no clone
    /// can be created while the answer is being acted on.
    pub fn is_unique(&mut self) -> bool {
        let Some(region) = Arc::get_mut(&mut self.region) else {
            return false;
        };
        live_regions().get(&region.address()).copied() == Some(1)
    }

    /// Number of live records wrapping the same address as this one
    pub fn wrap_count(&self) -> usize {
        live_regions()
            .get(&self.region.address())
            .copied()
            .unwrap_or(0)
    }

    /// Whether two handles refer to the same storage record
    pub fn same_region(&self, other: &ArrayMemoryHandle<'_>) -> bool {
        Arc::ptr_eq(&self.region, &other.region)
    }
}

impl fmt::Debug for ArrayMemoryHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayMemoryHandle")
            .field("ptr", &self.region.ptr)
            .field("len", &self.region.len)
            .field("element", &self.region.element)
            .field("refs", &self.ref_count())
            .finish()
    }
}
