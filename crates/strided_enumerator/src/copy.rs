//! The raw strided block copy.
//!
//! Both functions here copy `length` elements spaced `stride` apart, starting at `source[0]`, into the densely packed
//! front of `destination`.  They are the only way views move elements in bulk, so the direct and indirect shapes share
//! them once the indirect shape has resolved its bytes to a typed slice.
use std::num::NonZeroUsize;

/// Number of source elements a strided run of `length` elements touches, first through last inclusive.
///
/// Returns `None` if that count does not fit in a `usize`.
#[inline(always)]
pub fn checked_strided_extent(length: usize, stride: NonZeroUsize) -> Option<usize> {
    if length == 0 {
        return Some(0);
    }

    (length - 1)
        .checked_mul(stride.get())
        .and_then(|x| x.checked_add(1))
}

/// Like [checked_strided_extent], for runs known to be addressable.
///
/// # Panics
///
/// If the extent overflows `usize`.
#[inline(always)]
pub fn strided_extent(length: usize, stride: NonZeroUsize) -> usize {
    match checked_strided_extent(length, stride) {
        Some(x) => x,
        None => panic!(
            "A strided run of {} elements at stride {} overflows the address space",
            length, stride
        ),
    }
}

/// Copy `length` elements spaced `stride` apart from `source` to the front of `destination`.
///
/// A stride of 1 is a single block copy.
///
/// # Panics
///
/// If `source` is shorter than the strided extent of `length` elements, or `destination` is shorter than `length`.
#[inline]
pub fn copy_strided<T: Copy>(
    source: &[T],
    stride: NonZeroUsize,
    length: usize,
    destination: &mut [T],
) {
    if stride.get() == 1 {
        destination[..length].copy_from_slice(&source[..length]);
        return;
    }

    copy_strided_general(source, stride, length, destination);
}

/// [copy_strided] without the contiguous fast path.
///
/// # Panics
///
/// Under the same conditions as [copy_strided].
pub fn copy_strided_general<T: Copy>(
    source: &[T],
    stride: NonZeroUsize,
    length: usize,
    destination: &mut [T],
) {
    let extent = strided_extent(length, stride);
    assert!(
        source.len() >= extent,
        "source of {} elements cannot hold a strided run spanning {}",
        source.len(),
        extent
    );

    for (dest, src) in destination[..length]
        .iter_mut()
        .zip(source[..extent].iter().step_by(stride.get()))
    {
        *dest = *src;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn nz(x: usize) -> NonZeroUsize {
        NonZeroUsize::new(x).unwrap()
    }

    #[test]
    fn test_extent() {
        assert_eq!(strided_extent(0, nz(3)), 0);
        assert_eq!(strided_extent(1, nz(3)), 1);
        assert_eq!(strided_extent(5, nz(2)), 9);
        assert_eq!(strided_extent(4, nz(1)), 4);
    }

    #[test]
    fn test_extent_overflow() {
        assert_eq!(checked_strided_extent(3, nz(1 << (usize::BITS - 1))), None);
        assert_eq!(checked_strided_extent(2, nz(usize::MAX)), None);
        assert_eq!(checked_strided_extent(1, nz(usize::MAX)), Some(1));
        assert_eq!(
            checked_strided_extent(usize::MAX, nz(1)),
            Some(usize::MAX)
        );
    }

    #[test]
    #[should_panic(expected = "overflows the address space")]
    fn test_extent_overflow_panics() {
        strided_extent(3, nz(1 << (usize::BITS - 1)));
    }

    #[test]
    fn test_every_other() {
        let source = (10..20).collect::<Vec<u32>>();
        let mut dest = [0u32; 5];
        copy_strided(&source[..], nz(2), 5, &mut dest[..]);
        assert_eq!(dest, [10, 12, 14, 16, 18]);
    }

    #[test]
    fn test_leaves_tail_of_destination_alone() {
        let source = [1u8, 2, 3, 4, 5, 6];
        let mut dest = [9u8; 5];
        copy_strided(&source[..], nz(3), 2, &mut dest[..]);
        assert_eq!(dest, [1, 4, 9, 9, 9]);
    }

    #[test]
    fn test_zero_length_touches_nothing() {
        let mut dest: [u8; 0] = [];
        copy_strided::<u8>(&[], nz(4), 0, &mut dest[..]);
        copy_strided_general::<u8>(&[], nz(4), 0, &mut dest[..]);
    }

    #[test]
    #[should_panic]
    fn test_short_source_panics() {
        let source = [0u8; 4];
        let mut dest = [0u8; 3];
        copy_strided(&source[..], nz(2), 3, &mut dest[..]);
    }

    proptest! {
        #[test]
        fn contiguous_fast_path_matches_general(source in proptest::collection::vec(any::<u64>(), 0..64)) {
            let length = source.len();
            let mut fast = vec![0u64; length];
            let mut general = vec![0u64; length];
            copy_strided(&source[..], nz(1), length, &mut fast[..]);
            copy_strided_general(&source[..], nz(1), length, &mut general[..]);
            prop_assert_eq!(&fast, &general);
            prop_assert_eq!(&fast, &source);
        }

        #[test]
        fn strided_copy_picks_every_nth(
            source in proptest::collection::vec(any::<i32>(), 1..128),
            stride in 1usize..8,
        ) {
            let stride = nz(stride);
            let length = (source.len() - 1) / stride.get() + 1;
            let mut dest = vec![0i32; length];
            copy_strided(&source[..], stride, length, &mut dest[..]);

            let expected = source.iter().copied().step_by(stride.get()).collect::<Vec<_>>();
            prop_assert_eq!(dest, expected);
        }
    }
}
