//! Read-only enumeration of elements spaced at a fixed stride.
//!
//! A [StridedView] walks `length` elements of `T` which live `stride` elements apart inside some larger region, e.g.
//! one channel of interleaved audio or one column of a row-major matrix.  It never copies, allocates or owns anything
//! while enumerating; the only allocating operation is [StridedView::to_vec].
//!
//! Views come in two shapes, which behave identically:
//!
//! - Direct views borrow a slice.  This is what you want almost all of the time.
//! - Indirect views borrow a host-managed container implementing [ByteOwner] and hold a byte offset into it.  The
//!   container is asked for its bytes on every access, so an owner whose storage is not at a fixed address still works.
//!   Elements must be plain old data ([bytemuck::AnyBitPattern]) for this shape.
//!
//! The write-capable sibling is [StridedViewMut], and the only way to get a read-only view of memory which is also
//! reachable through it is [StridedViewMut::as_read_only] (or [StridedView::from_mut], or [From]).
pub mod copy;
mod error;
mod owner;
mod storage;
mod view;
mod view_mut;

pub use error::{Error, Result};
pub use owner::{AsByteOwner, ByteOwner, ByteOwnerMut};
pub use storage::Shape;
pub use view::StridedView;
pub use view_mut::StridedViewMut;
