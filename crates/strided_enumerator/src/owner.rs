//! Host-managed containers which can back an indirect view.
//!
//! An indirect view never holds a pointer into its container.  Instead it holds the container and a byte offset, and
//! asks the container for its bytes every time it needs an address.  Anything which can hand out its storage as a byte
//! slice may act as an owner; typed buffers of plain-old-data are provided here via [bytemuck].
use bytemuck::Pod;

/// A container whose storage can be viewed as bytes.
///
/// Implementations must return the same logical contents on every call for as long as the container is borrowed.  The
/// slice may live at a different address on each call; views recompute addresses for exactly this reason.
pub trait ByteOwner {
    fn bytes(&self) -> &[u8];
}

/// Get an owner as a `&dyn ByteOwner`.
///
/// Implemented for every sized [ByteOwner].  It is a supertrait of [ByteOwnerMut] so that a `&dyn ByteOwnerMut` can be
/// handed to a read-only view.
pub trait AsByteOwner {
    fn as_byte_owner(&self) -> &dyn ByteOwner;
}

impl<O: ByteOwner> AsByteOwner for O {
    #[inline(always)]
    fn as_byte_owner(&self) -> &dyn ByteOwner {
        self
    }
}

/// A container whose storage can also be written through as bytes.
pub trait ByteOwnerMut: ByteOwner + AsByteOwner {
    fn bytes_mut(&mut self) -> &mut [u8];
}

impl<E: Pod> ByteOwner for Vec<E> {
    #[inline(always)]
    fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self[..])
    }
}

impl<E: Pod> ByteOwnerMut for Vec<E> {
    #[inline(always)]
    fn bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self[..])
    }
}

impl<E: Pod> ByteOwner for Box<[E]> {
    #[inline(always)]
    fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self[..])
    }
}

impl<E: Pod> ByteOwnerMut for Box<[E]> {
    #[inline(always)]
    fn bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self[..])
    }
}

impl<E: Pod, const N: usize> ByteOwner for [E; N] {
    #[inline(always)]
    fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self[..])
    }
}

impl<E: Pod, const N: usize> ByteOwnerMut for [E; N] {
    #[inline(always)]
    fn bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self[..])
    }
}
