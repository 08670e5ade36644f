//! Backing storage descriptors shared by the read-only and mutable views.
//!
//! A view is backed either directly, by a slice covering exactly the strided extent, or indirectly, by a
//! [ByteOwner] plus a byte offset.  The indirect form never caches an address: every access goes back through the owner.
//! Everything above this module is written against these descriptors and does not care which form it has.
use std::mem::{align_of, size_of};
use std::num::NonZeroUsize;

use bytemuck::{AnyBitPattern, Pod};

use crate::copy::strided_extent;
use crate::owner::{ByteOwner, ByteOwnerMut};

/// Which kind of backing storage a view has.
#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::IsVariant)]
pub enum Shape {
    /// A borrowed slice.
    Direct,

    /// A host-managed container plus a byte offset.
    Indirect,
}

/// Turns the bytes of an indirect owner back into `T`.
///
/// Captured at construction, where `T: AnyBitPattern` is known, so that the views themselves need no bytemuck bounds.
pub(crate) struct Resolver<T> {
    element: fn(&[u8]) -> &T,
    run: fn(&[u8]) -> &[T],
}

impl<T> Clone for Resolver<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Resolver<T> {}

impl<T: AnyBitPattern> Resolver<T> {
    fn new() -> Self {
        Self {
            element: bytemuck::from_bytes::<T>,
            run: bytemuck::cast_slice::<u8, T>,
        }
    }
}

pub(crate) enum Storage<'a, T> {
    Direct {
        /// Exactly the strided extent; the first element is `span[0]`.
        span: &'a [T],
        length: usize,
    },
    Indirect {
        owner: &'a dyn ByteOwner,
        byte_offset: usize,
        length: usize,
        resolver: Resolver<T>,
    },
}

impl<T> Clone for Storage<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Storage<'_, T> {}

/// The strided extent of a view of `length` elements.
///
/// Cursors are `isize`, so the length must fit in one; the extent must fit in a `usize`.  Once the extent is known to fit
/// inside the backing storage, `index * stride` cannot overflow for any `index < length`.
///
/// # Panics
///
/// If either bound is violated.
fn view_extent(length: usize, stride: NonZeroUsize) -> usize {
    assert!(
        length <= isize::MAX as usize,
        "A view of {} elements is too long to enumerate",
        length
    );
    strided_extent(length, stride)
}

/// Assert that `bytes` can hold a strided run of `length` `T` starting at `byte_offset`.
fn check_owner_bytes<T>(bytes: &[u8], byte_offset: usize, length: usize, stride: NonZeroUsize) {
    assert!(
        size_of::<T>() != 0,
        "Zero-sized elements cannot be addressed through a byte owner"
    );

    let end = view_extent(length, stride)
        .checked_mul(size_of::<T>())
        .and_then(|x| x.checked_add(byte_offset));
    assert!(
        matches!(end, Some(e) if e <= bytes.len()),
        "Owner of {} bytes cannot hold {} elements of {} bytes at stride {} from offset {}",
        bytes.len(),
        length,
        size_of::<T>(),
        stride,
        byte_offset
    );

    if length != 0 {
        let address = bytes.as_ptr() as usize + byte_offset;
        assert_eq!(
            address % align_of::<T>(),
            0,
            "Byte offset {} is not aligned for an element with alignment {}",
            byte_offset,
            align_of::<T>()
        );
    }
}

impl<'a, T> Storage<'a, T> {
    /// # Panics
    ///
    /// If `source` is shorter than the strided extent of `length` elements.
    pub(crate) fn direct(source: &'a [T], length: usize, stride: NonZeroUsize) -> Self {
        let extent = view_extent(length, stride);
        assert!(
            source.len() >= extent,
            "Source of {} elements cannot hold {} elements at stride {}",
            source.len(),
            length,
            stride
        );
        Storage::Direct {
            span: &source[..extent],
            length,
        }
    }

    /// # Panics
    ///
    /// If the owner is too small, the offset is misaligned for `T`, or `T` is zero-sized.
    pub(crate) fn indirect(
        owner: &'a dyn ByteOwner,
        byte_offset: usize,
        length: usize,
        stride: NonZeroUsize,
    ) -> Self
    where
        T: AnyBitPattern,
    {
        check_owner_bytes::<T>(owner.bytes(), byte_offset, length, stride);
        Storage::Indirect {
            owner,
            byte_offset,
            length,
            resolver: Resolver::new(),
        }
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        match self {
            Storage::Direct { length, .. } => *length,
            Storage::Indirect { length, .. } => *length,
        }
    }

    pub(crate) fn shape(&self) -> Shape {
        match self {
            Storage::Direct { .. } => Shape::Direct,
            Storage::Indirect { .. } => Shape::Indirect,
        }
    }

    /// Get the `index`th element of the strided run.
    ///
    /// # Panics
    ///
    /// If `index` falls outside the run's extent.
    #[inline(always)]
    pub(crate) fn element(&self, index: usize, stride: NonZeroUsize) -> &'a T {
        match *self {
            Storage::Direct { span, .. } => &span[index * stride.get()],
            Storage::Indirect {
                owner,
                byte_offset,
                resolver,
                ..
            } => {
                let start = byte_offset + index * stride.get() * size_of::<T>();
                (resolver.element)(&owner.bytes()[start..start + size_of::<T>()])
            }
        }
    }

    /// Like [Self::element], without bounds checks on the direct path.
    ///
    /// # Safety
    ///
    /// `index` must be less than the length of the storage.
    #[inline(always)]
    pub(crate) unsafe fn element_unchecked(&self, index: usize, stride: NonZeroUsize) -> &'a T {
        match *self {
            Storage::Direct { span, .. } => unsafe { span.get_unchecked(index * stride.get()) },
            Storage::Indirect { .. } => self.element(index, stride),
        }
    }

    /// Get the entire strided extent as a typed slice, whose `i * stride`th entries are the elements of the run.
    ///
    /// For indirect storage this resolves the owner's bytes again.
    pub(crate) fn run(&self, stride: NonZeroUsize) -> &'a [T] {
        match *self {
            Storage::Direct { span, .. } => span,
            Storage::Indirect {
                owner,
                byte_offset,
                length,
                resolver,
            } => {
                let extent_bytes = strided_extent(length, stride) * size_of::<T>();
                (resolver.run)(&owner.bytes()[byte_offset..byte_offset + extent_bytes])
            }
        }
    }
}

pub(crate) enum StorageMut<'a, T> {
    Direct {
        span: &'a mut [T],
        length: usize,
    },
    Indirect {
        owner: &'a mut dyn ByteOwnerMut,
        byte_offset: usize,
        length: usize,
        resolver: Resolver<T>,
        element_mut: fn(&mut [u8]) -> &mut T,
    },
}

impl<'a, T> StorageMut<'a, T> {
    /// # Panics
    ///
    /// If `source` is shorter than the strided extent of `length` elements.
    pub(crate) fn direct(source: &'a mut [T], length: usize, stride: NonZeroUsize) -> Self {
        let extent = view_extent(length, stride);
        assert!(
            source.len() >= extent,
            "Source of {} elements cannot hold {} elements at stride {}",
            source.len(),
            length,
            stride
        );
        StorageMut::Direct {
            span: &mut source[..extent],
            length,
        }
    }

    /// # Panics
    ///
    /// Under the same conditions as [Storage::indirect].
    pub(crate) fn indirect(
        owner: &'a mut dyn ByteOwnerMut,
        byte_offset: usize,
        length: usize,
        stride: NonZeroUsize,
    ) -> Self
    where
        T: Pod,
    {
        check_owner_bytes::<T>(owner.bytes(), byte_offset, length, stride);
        StorageMut::Indirect {
            owner,
            byte_offset,
            length,
            resolver: Resolver::new(),
            element_mut: bytemuck::from_bytes_mut::<T>,
        }
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        match self {
            StorageMut::Direct { length, .. } => *length,
            StorageMut::Indirect { length, .. } => *length,
        }
    }

    /// Reborrow this storage as read-only storage with the same descriptor.
    pub(crate) fn as_shared(&self) -> Storage<'_, T> {
        match self {
            StorageMut::Direct { span, length } => Storage::Direct {
                span: &span[..],
                length: *length,
            },
            StorageMut::Indirect {
                owner,
                byte_offset,
                length,
                resolver,
                ..
            } => Storage::Indirect {
                owner: owner.as_byte_owner(),
                byte_offset: *byte_offset,
                length: *length,
                resolver: *resolver,
            },
        }
    }

    /// Give up write access for the rest of `'a`.
    pub(crate) fn into_shared(self) -> Storage<'a, T> {
        match self {
            StorageMut::Direct { span, length } => Storage::Direct { span, length },
            StorageMut::Indirect {
                owner,
                byte_offset,
                length,
                resolver,
                ..
            } => {
                let owner: &'a dyn ByteOwnerMut = owner;
                Storage::Indirect {
                    owner: owner.as_byte_owner(),
                    byte_offset,
                    length,
                    resolver,
                }
            }
        }
    }

    /// # Panics
    ///
    /// If `index` falls outside the run's extent.
    #[inline(always)]
    pub(crate) fn element_mut(&mut self, index: usize, stride: NonZeroUsize) -> &mut T {
        match self {
            StorageMut::Direct { span, .. } => &mut span[index * stride.get()],
            StorageMut::Indirect {
                owner,
                byte_offset,
                element_mut,
                ..
            } => {
                let start = *byte_offset + index * stride.get() * size_of::<T>();
                (*element_mut)(&mut owner.bytes_mut()[start..start + size_of::<T>()])
            }
        }
    }
}
