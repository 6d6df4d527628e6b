use orderpacker_lib::Packer;
use proptest::prelude::*;

fn box_lists() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(1u64..=5_000, 1..6)
}

proptest! {
    #[test]
    fn never_under_ships(boxes in box_lists(), items in 0u64..200_000) {
        let packer = Packer::with_boxes(boxes).unwrap();
        let packed = packer.pack_order(items);
        prop_assert!(packed.iter().sum::<u64>() >= items);
    }

    #[test]
    fn boxes_come_largest_first(boxes in box_lists(), items in 1u64..200_000) {
        let packer = Packer::with_boxes(boxes).unwrap();
        let packed = packer.pack_order(items);
        prop_assert!(!packed.is_empty());
        prop_assert!(packed.windows(2).all(|pair| pair[0] >= pair[1]));
        prop_assert!(packed.iter().all(|b| packer.boxes().as_slice().contains(b)));
    }

    #[test]
    fn box_count_stays_within_smallest_box_bound(
        boxes in box_lists(),
        items in 0u64..200_000,
        extra in 0u64..200_000,
    ) {
        let packer = Packer::with_boxes(boxes).unwrap();
        let count = packer.box_count(items);
        prop_assert_eq!(count, packer.pack_order(items).len() as u64);
        prop_assert!(count <= packer.max_box_count(items + extra));
    }

    #[test]
    fn bounded_packing_matches_unbounded(boxes in box_lists(), items in 0u64..200_000) {
        let packer = Packer::with_boxes(boxes).unwrap();
        let bound = packer.max_box_count(items);
        prop_assert_eq!(packer.try_pack_order(items, bound).unwrap(), packer.pack_order(items));
    }

    #[test]
    fn single_size_rounds_up(size in 1u64..=5_000, items in 1u64..200_000) {
        let packer = Packer::with_boxes([size]).unwrap();
        let expected = vec![size; items.div_ceil(size) as usize];
        prop_assert_eq!(packer.pack_order(items), expected);
    }

    #[test]
    fn normalization_does_not_change_results(boxes in box_lists(), items in 0u64..200_000) {
        let mut normalized = boxes.clone();
        normalized.sort_unstable();
        normalized.dedup();

        let raw = Packer::with_boxes(boxes).unwrap();
        let clean = Packer::with_boxes(normalized).unwrap();
        prop_assert_eq!(raw.pack_order(items), clean.pack_order(items));
    }

    #[test]
    fn zero_in_any_position_is_rejected(mut boxes in box_lists(), at in 0usize..6) {
        let at = at.min(boxes.len());
        boxes.insert(at, 0);
        prop_assert!(Packer::with_boxes(boxes).is_err());
    }
}
