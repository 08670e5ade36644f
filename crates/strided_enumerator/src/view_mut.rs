use std::num::NonZeroUsize;

use bytemuck::Pod;

use crate::owner::ByteOwnerMut;
use crate::storage::{Shape, StorageMut};
use crate::view::StridedView;

/// The write-capable sibling of [StridedView].
///
/// This has the same cursor as [StridedView] and exists mostly so that there is something to convert from: a read-only
/// view over memory which is also reachable for writing must come from here, through
/// [StridedViewMut::as_read_only] or [StridedViewMut::into_read_only].
pub struct StridedViewMut<'a, T> {
    storage: StorageMut<'a, T>,
    stride: NonZeroUsize,
    position: isize,
}

impl<'a, T> StridedViewMut<'a, T> {
    /// # Panics
    ///
    /// Under the same conditions as [StridedView::new].
    pub fn new(source: &'a mut [T], length: usize, stride: NonZeroUsize) -> Self {
        Self {
            storage: StorageMut::direct(source, length, stride),
            stride,
            position: -1,
        }
    }

    /// # Panics
    ///
    /// Under the same conditions as [StridedView::from_owner].
    pub fn from_owner_mut(
        owner: &'a mut dyn ByteOwnerMut,
        byte_offset: usize,
        length: usize,
        stride: NonZeroUsize,
    ) -> Self
    where
        T: Pod,
    {
        Self {
            storage: StorageMut::indirect(owner, byte_offset, length, stride),
            stride,
            position: -1,
        }
    }

    pub fn advance(&mut self) -> bool {
        let len = self.len() as isize;
        if self.position < len {
            self.position += 1;
        }
        self.position < len
    }

    fn check_position(&self) -> usize {
        assert!(
            self.position >= 0 && (self.position as usize) < self.len(),
            "No current element at position {} of a view with {} elements",
            self.position,
            self.len()
        );
        self.position as usize
    }

    /// # Panics
    ///
    /// If the view has not been advanced yet, or is exhausted.
    pub fn current(&self) -> &T {
        let index = self.check_position();
        self.storage.as_shared().element(index, self.stride)
    }

    /// # Panics
    ///
    /// If the view has not been advanced yet, or is exhausted.
    pub fn current_mut(&mut self) -> &mut T {
        let index = self.check_position();
        self.storage.element_mut(index, self.stride)
    }

    pub fn position(&self) -> isize {
        self.position
    }

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
        self.storage.as_shared().shape()
    }

    /// Borrow a read-only view of the same elements, starting at this view's current position.
    ///
    /// The two cursors are independent.
    pub fn as_read_only(&self) -> StridedView<'_, T> {
        StridedView::from_parts(self.storage.as_shared(), self.stride, self.position)
    }

    /// Give up write access, keeping the current position.
    pub fn into_read_only(self) -> StridedView<'a, T> {
        StridedView::from_parts(self.storage.into_shared(), self.stride, self.position)
    }
}

impl<T> std::fmt::Debug for StridedViewMut<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedViewMut")
            .field("shape", &self.shape())
            .field("len", &self.len())
            .field("stride", &self.stride)
            .field("position", &self.position)
            .finish()
    }
}
