use std::iter::FusedIterator;
use std::num::NonZeroUsize;

use bytemuck::AnyBitPattern;

use crate::copy::{copy_strided, strided_extent};
use crate::error::{Error, Result};
use crate::owner::ByteOwner;
use crate::storage::{Shape, Storage};
use crate::view_mut::StridedViewMut;

/// A read-only cursor over `length` elements of `T` spaced `stride` elements apart.
///
/// The view starts positioned before its first element.  Each call to [StridedView::advance] moves it forward by one;
/// once it returns true, [StridedView::current] is the element at the new position.  There is no way to rewind: get a
/// fresh view (or clone one which has not been advanced) to enumerate again.  The view is also an [Iterator], which is
/// usually the more convenient way to drive it.
///
/// Bulk operations ([StridedView::copy_to], [StridedView::try_copy_to], [StridedView::to_vec]) always cover the whole
/// view and ignore the cursor.
pub struct StridedView<'a, T> {
    storage: Storage<'a, T>,
    stride: NonZeroUsize,

    /// -1 before the first advance, `length` once exhausted.
    position: isize,
}

impl<'a, T> StridedView<'a, T> {
    /// View `length` elements of `source`, starting at `source[0]` and taking every `stride`th element.
    ///
    /// # Panics
    ///
    /// If `source` is too short to contain the last element, if the strided extent overflows `usize`, or if `length` is
    /// more than `isize::MAX`.
    pub fn new(source: &'a [T], length: usize, stride: NonZeroUsize) -> Self {
        Self::from_storage(Storage::direct(source, length, stride), stride)
    }

    /// View `length` elements of raw memory starting at `ptr` and spaced `stride` elements apart.
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null, aligned, and valid for reads of the whole strided extent for `'a`, and that memory must
    /// not be written through any other alias while the view exists.
    pub unsafe fn from_raw_parts(ptr: *const T, length: usize, stride: NonZeroUsize) -> Self {
        let extent = strided_extent(length, stride);
        let source = unsafe { std::slice::from_raw_parts(ptr, extent) };
        Self::new(source, length, stride)
    }

    /// View `length` elements stored inside `owner`, starting `byte_offset` bytes into it.
    ///
    /// The owner is consulted again on every access; no address is cached.
    ///
    /// # Panics
    ///
    /// If the owner's bytes cannot hold the strided run at that offset (including when its size overflows `usize`), if
    /// the offset is not aligned for `T`, or if `T` is zero-sized.
    pub fn from_owner(
        owner: &'a dyn ByteOwner,
        byte_offset: usize,
        length: usize,
        stride: NonZeroUsize,
    ) -> Self
    where
        T: AnyBitPattern,
    {
        log::trace!(
            "Indirect strided view: {} elements of {} bytes, stride {}, byte offset {}",
            length,
            std::mem::size_of::<T>(),
            stride,
            byte_offset
        );
        Self::from_storage(
            Storage::indirect(owner, byte_offset, length, stride),
            stride,
        )
    }

    /// Get a read-only view of the same elements as `view`, at the same position.
    ///
    /// Advancing the returned view does not move `view`.
    pub fn from_mut<'b>(view: &'b StridedViewMut<'a, T>) -> StridedView<'b, T> {
        view.as_read_only()
    }

    pub(crate) fn from_storage(storage: Storage<'a, T>, stride: NonZeroUsize) -> Self {
        Self::from_parts(storage, stride, -1)
    }

    pub(crate) fn from_parts(storage: Storage<'a, T>, stride: NonZeroUsize, position: isize) -> Self {
        debug_assert!(position >= -1 && position <= storage.len() as isize);
        Self {
            storage,
            stride,
            position,
        }
    }

    /// Move to the next element.  Returns whether there is one.
    ///
    /// Once this returns false it keeps returning false.
    #[inline(always)]
    pub fn advance(&mut self) -> bool {
        let len = self.len() as isize;
        if self.position < len {
            self.position += 1;
        }
        self.position < len
    }

    /// Get the element at the current position.
    ///
    /// # Panics
    ///
    /// If the view has not been advanced yet, or is exhausted.
    #[inline(always)]
    pub fn current(&self) -> &'a T {
        assert!(
            self.position >= 0 && (self.position as usize) < self.len(),
            "No current element at position {} of a view with {} elements",
            self.position,
            self.len()
        );
        self.storage.element(self.position as usize, self.stride)
    }

    /// Get the element at the current position without checking that there is one.
    ///
    /// # Safety
    ///
    /// The last call to [Self::advance] must have returned true.
    #[inline(always)]
    pub unsafe fn current_unchecked(&self) -> &'a T {
        debug_assert!(self.position >= 0 && (self.position as usize) < self.len());
        unsafe {
            self.storage
                .element_unchecked(self.position as usize, self.stride)
        }
    }

    /// The cursor: -1 before the first advance, [Self::len] once exhausted.
    pub fn position(&self) -> isize {
        self.position
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stride(&self) -> NonZeroUsize {
        self.stride
    }

    pub fn shape(&self) -> Shape {
        self.storage.shape()
    }

    /// How many more successful advances are possible.
    pub fn remaining(&self) -> usize {
        (self.len() as isize - (self.position + 1)).max(0) as usize
    }

    /// Copy every element of the view, in order, to the front of `destination`.
    ///
    /// Fails without writing anything if `destination` is shorter than the view.
    pub fn copy_to(&self, destination: &mut [T]) -> Result<()>
    where
        T: Copy,
    {
        let length = self.len();
        if destination.len() < length {
            log::debug!(
                "Rejecting copy of {} strided elements into a destination of {}",
                length,
                destination.len()
            );
            return Err(Error::destination_too_short(length, destination.len()));
        }

        if length == 0 {
            return Ok(());
        }

        copy_strided(self.storage.run(self.stride), self.stride, length, destination);
        Ok(())
    }

    /// Like [Self::copy_to], but reports failure as `false`.
    pub fn try_copy_to(&self, destination: &mut [T]) -> bool
    where
        T: Copy,
    {
        self.copy_to(destination).is_ok()
    }

    /// Copy every element of the view into a new vec of exactly [Self::len] elements.
    ///
    /// An empty view produces an empty vec without allocating.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Copy,
    {
        if self.is_empty() {
            return Vec::new();
        }

        let mut out = vec![*self.storage.element(0, self.stride); self.len()];
        // The destination is exactly long enough, so this cannot fail.
        let copied = self.try_copy_to(&mut out[..]);
        debug_assert!(copied);
        out
    }
}

impl<T> Clone for StridedView<'_, T> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage,
            stride: self.stride,
            position: self.position,
        }
    }
}

impl<T> std::fmt::Debug for StridedView<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedView")
            .field("shape", &self.shape())
            .field("len", &self.len())
            .field("stride", &self.stride)
            .field("position", &self.position)
            .finish()
    }
}

impl<'a, T> Iterator for StridedView<'a, T> {
    type Item = &'a T;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.advance() {
            // Safety: advance just returned true.
            Some(unsafe { self.current_unchecked() })
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for StridedView<'_, T> {}

impl<T> FusedIterator for StridedView<'_, T> {}

impl<'a, T> From<StridedViewMut<'a, T>> for StridedView<'a, T> {
    fn from(value: StridedViewMut<'a, T>) -> Self {
        value.into_read_only()
    }
}
