use std::cell::Cell;
use std::num::NonZeroUsize;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use strided_enumerator::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn nz(x: usize) -> NonZeroUsize {
    NonZeroUsize::new(x).unwrap()
}

/// Generate a source, a stride, and a length which fits in the source at that stride.
fn source_stride_length() -> impl Strategy<Value = (Vec<u32>, usize, usize)> {
    (proptest::collection::vec(any::<u32>(), 0..96), 1usize..9).prop_flat_map(|(source, stride)| {
        let max_len = if source.is_empty() {
            0
        } else {
            (source.len() - 1) / stride + 1
        };
        (Just(source), Just(stride), 0..=max_len)
    })
}

/// An owner which counts how often it is asked for its bytes.
struct CountingOwner {
    data: Vec<u32>,
    calls: Cell<usize>,
}

impl ByteOwner for CountingOwner {
    fn bytes(&self) -> &[u8] {
        self.calls.set(self.calls.get() + 1);
        bytemuck::cast_slice(&self.data[..])
    }
}

#[test]
fn indirect_views_go_back_to_the_owner_every_time() {
    let owner = CountingOwner {
        data: (0..8).collect(),
        calls: Cell::new(0),
    };
    let mut view = StridedView::<u32>::from_owner(&owner, 0, 4, nz(2));
    let after_construction = owner.calls.get();

    assert!(view.advance());
    assert_eq!(*view.current(), 0);
    assert_eq!(*view.current(), 0);
    assert!(view.advance());
    assert_eq!(*view.current(), 2);
    assert_eq!(owner.calls.get(), after_construction + 3);
}

#[test]
fn documented_example() {
    init_logging();
    let source = (10..20).collect::<Vec<u32>>();
    let view = StridedView::new(&source[..], 5, nz(2));

    let mut exact = [0u32; 5];
    view.copy_to(&mut exact[..]).unwrap();
    assert_eq!(exact, [10, 12, 14, 16, 18]);
    assert_eq!(view.copied().collect::<Vec<_>>(), vec![10, 12, 14, 16, 18]);
}

proptest! {
    #[test]
    fn advance_succeeds_exactly_len_times((source, stride, length) in source_stride_length(), extra in 0usize..5) {
        let mut view = StridedView::new(&source[..], length, nz(stride));
        for call in 0..(length + extra) {
            let advanced = view.advance();
            prop_assert_eq!(advanced, call < length);
            prop_assert_eq!(view.position(), (call as isize).min(length as isize));
        }
    }

    #[test]
    fn current_visits_base_plus_i_times_stride((source, stride, length) in source_stride_length()) {
        let mut view = StridedView::new(&source[..], length, nz(stride));
        let mut i = 0;
        while view.advance() {
            prop_assert!(std::ptr::eq(view.current(), &source[i * stride]));
            i += 1;
        }
        prop_assert_eq!(i, length);
    }

    #[test]
    fn copy_to_matches_enumeration((source, stride, length) in source_stride_length(), slack in 0usize..4) {
        init_logging();
        let view = StridedView::new(&source[..], length, nz(stride));
        let mut dest = vec![0u32; length + slack];
        prop_assert!(view.try_copy_to(&mut dest[..]));
        let enumerated = view.clone().copied().collect::<Vec<_>>();
        prop_assert_eq!(&dest[..length], &enumerated[..]);
        prop_assert_eq!(view.to_vec(), enumerated);
    }

    #[test]
    fn short_destinations_are_untouched((source, stride, length) in source_stride_length(), short_by in 1usize..4) {
        init_logging();
        prop_assume!(length > 0);
        let view = StridedView::new(&source[..], length, nz(stride));
        let mut dest = vec![0xdeadbeefu32; length.saturating_sub(short_by)];

        let err = view.copy_to(&mut dest[..]).unwrap_err();
        prop_assert!(err.is_destination_too_short());
        prop_assert!(dest.iter().all(|x| *x == 0xdeadbeef));

        prop_assert!(!view.try_copy_to(&mut dest[..]));
        prop_assert!(dest.iter().all(|x| *x == 0xdeadbeef));
    }

    #[test]
    fn materialized_views_reread_identically((source, stride, length) in source_stride_length()) {
        let view = StridedView::new(&source[..], length, nz(stride));
        let owned = view.to_vec();
        prop_assert_eq!(owned.len(), length);

        let reread = StridedView::new(&owned[..], owned.len(), nz(1));
        prop_assert_eq!(reread.copied().collect::<Vec<_>>(), view.copied().collect::<Vec<_>>());
    }

    #[test]
    fn direct_and_indirect_agree((source, stride, length) in source_stride_length(), skip in 0usize..4) {
        prop_assume!(skip <= source.len());
        let remaining = source.len() - skip;
        let length = if remaining == 0 { 0 } else { length.min((remaining - 1) / stride + 1) };

        let direct = StridedView::new(&source[skip..], length, nz(stride));
        let indirect = StridedView::<u32>::from_owner(&source, skip * 4, length, nz(stride));

        prop_assert_eq!(direct.to_vec(), indirect.to_vec());

        let mut from_direct = vec![0u32; length];
        let mut from_indirect = vec![0u32; length];
        direct.copy_to(&mut from_direct[..]).unwrap();
        indirect.copy_to(&mut from_indirect[..]).unwrap();
        prop_assert_eq!(&from_direct, &from_indirect);

        prop_assert_eq!(direct.copied().collect::<Vec<_>>(), indirect.copied().collect::<Vec<_>>());
    }

    #[test]
    fn conversion_preserves_sequence_and_position(
        (mut source, stride, length) in source_stride_length(),
        advances in 0usize..6,
    ) {
        let expected = StridedView::new(&source[..], length, nz(stride)).to_vec();
        let mut mutable = StridedViewMut::new(&mut source[..], length, nz(stride));
        for _ in 0..advances {
            mutable.advance();
        }
        let position = mutable.position();

        let mut read_only = mutable.as_read_only();
        prop_assert_eq!(read_only.position(), position);
        prop_assert_eq!(read_only.to_vec(), expected.clone());
        let rest = read_only.by_ref().copied().collect::<Vec<_>>();
        let skipped = (position + 1) as usize;
        prop_assert_eq!(&rest[..], &expected[skipped.min(length)..]);
        prop_assert_eq!(read_only.position(), length as isize);

        prop_assert_eq!(mutable.position(), position);
    }
}
