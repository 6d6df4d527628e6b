//! Greedy box selection.
//!
//! A [`Packer`] owns a validated [`BoxSet`] and answers
//! [`Packer::pack_order`] queries against it. The scan walks the box set
//! from the largest capacity down, filling with whole boxes and finishing
//! with a single box that covers whatever is left once the scan reaches the
//! smallest capacity.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Box capacities used when no explicit set is configured.
pub const DEFAULT_BOXES: [u64; 5] = [250, 500, 1000, 2000, 5000];

/// Default cap on the length of a single packing result.
pub const DEFAULT_MAX_BOXES: u64 = 1_000_000;

/// Strictly ascending, duplicate-free, non-empty list of positive capacities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BoxSet(Vec<u64>);

impl BoxSet {
    /// Sort and de-duplicate `boxes`, rejecting empty input and zero capacities.
    pub fn new(boxes: impl IntoIterator<Item = u64>) -> Result<Self> {
        let mut boxes: Vec<u64> = boxes.into_iter().collect();
        boxes.sort_unstable();
        boxes.dedup();

        match boxes.first() {
            None => Err(Error::empty_box_set()),
            Some(0) => Err(Error::zero_capacity()),
            Some(_) => Ok(Self(boxes)),
        }
    }

    /// The default set, [`DEFAULT_BOXES`].
    pub fn default_set() -> Self {
        Self(DEFAULT_BOXES.to_vec())
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; construction rejects empty sets.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn smallest(&self) -> u64 {
        self.0[0]
    }

    pub fn largest(&self) -> u64 {
        self.0[self.0.len() - 1]
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = u64> + '_ {
        self.0.iter().copied()
    }
}

impl<'de> Deserialize<'de> for BoxSet {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let boxes = Vec::<u64>::deserialize(deserializer)?;
        BoxSet::new(boxes).map_err(serde::de::Error::custom)
    }
}

/// Construction options for a [`Packer`].
///
/// `boxes: None` resolves to [`DEFAULT_BOXES`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boxes: Option<Vec<u64>>,
}

impl PackerConfig {
    pub fn with_boxes(boxes: impl IntoIterator<Item = u64>) -> Self {
        Self {
            boxes: Some(boxes.into_iter().collect()),
        }
    }
}

/// Immutable greedy packer over a single [`BoxSet`].
///
/// Holds no interior mutability, so one instance can be shared across
/// threads behind an `Arc` and queried concurrently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packer {
    boxes: BoxSet,
}

impl Default for Packer {
    fn default() -> Self {
        Self {
            boxes: BoxSet::default_set(),
        }
    }
}

impl Packer {
    /// Build a packer from `config`, validating the box set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBoxSet`] when the configured list is empty or
    /// contains a zero capacity.
    pub fn new(config: PackerConfig) -> Result<Self> {
        let boxes = match config.boxes {
            Some(boxes) => BoxSet::new(boxes)?,
            None => BoxSet::default_set(),
        };
        Ok(Self { boxes })
    }

    /// Shorthand for `Packer::new(PackerConfig::with_boxes(boxes))`.
    pub fn with_boxes(boxes: impl IntoIterator<Item = u64>) -> Result<Self> {
        Self::new(PackerConfig::with_boxes(boxes))
    }

    pub fn from_box_set(boxes: BoxSet) -> Self {
        Self { boxes }
    }

    /// The normalized box set this packer operates on.
    pub fn boxes(&self) -> &BoxSet {
        &self.boxes
    }

    /// Choose boxes whose combined capacity covers `quantity`.
    ///
    /// Boxes are returned largest first. A zero quantity yields no boxes.
    /// With a single capacity `k` the result is `ceil(quantity / k)` boxes of
    /// size `k`. Otherwise the set is scanned from the largest capacity down:
    /// every box that fits is taken as many times as it divides the remaining
    /// quantity, and once the scan reaches the smallest capacity the leftover
    /// is covered by one box, the smallest capacity that is still at least
    /// the leftover.
    ///
    /// # Panics
    ///
    /// Panics if the result does not fit in memory, which a small smallest
    /// box and a huge `quantity` can cause. Use [`Packer::try_pack_order`]
    /// where `quantity` is caller controlled.
    pub fn pack_order(&self, quantity: u64) -> Vec<u64> {
        let mut result = Vec::new();
        expand_runs(self.runs(quantity), &mut result);
        result
    }

    /// Like [`Packer::pack_order`], but refuses results longer than
    /// `max_boxes` before allocating them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooManyBoxes`] when the order needs more than
    /// `max_boxes` boxes or more than fit in a `Vec` on this target.
    pub fn try_pack_order(&self, quantity: u64, max_boxes: u64) -> Result<Vec<u64>> {
        let runs = self.runs(quantity);
        let required = total_boxes(&runs);

        let len = usize::try_from(required)
            .ok()
            .filter(|_| required <= max_boxes)
            .ok_or_else(|| Error::too_many_boxes(required, max_boxes))?;

        let mut result = Vec::with_capacity(len);
        expand_runs(runs, &mut result);
        Ok(result)
    }

    /// Number of boxes [`Packer::pack_order`] returns for `quantity`,
    /// computed without building the list.
    pub fn box_count(&self, quantity: u64) -> u64 {
        total_boxes(&self.runs(quantity))
    }

    /// Largest [`Packer::box_count`] over every quantity up to `max_items`.
    ///
    /// No order up to `max_items` needs more than
    /// `ceil(max_items / smallest)` boxes.
    pub fn max_box_count(&self, max_items: u64) -> u64 {
        max_items.div_ceil(self.boxes.smallest())
    }

    /// The greedy scan as `(capacity, count)` runs, largest capacity first.
    ///
    /// There is at most one run per capacity plus the closing box, so this
    /// stays small whatever the quantity.
    fn runs(&self, quantity: u64) -> Vec<(u64, u64)> {
        if quantity == 0 {
            return Vec::new();
        }

        let boxes = self.boxes.as_slice();

        if let [only] = boxes {
            return vec![(*only, quantity.div_ceil(*only))];
        }

        let mut runs = Vec::with_capacity(boxes.len());
        let mut remaining = quantity;

        for (index, &capacity) in boxes.iter().enumerate().rev() {
            if index == 0 {
                runs.push((self.smallest_covering(remaining), 1));
                break;
            }

            if capacity > remaining {
                continue;
            }

            runs.push((capacity, remaining / capacity));

            remaining %= capacity;
            if remaining == 0 {
                break;
            }
        }

        runs
    }

    /// Smallest capacity in the set that is at least `remaining`.
    ///
    /// Only called at the bottom of the scan, where `remaining` is below the
    /// second-smallest capacity, so a covering box always exists.
    fn smallest_covering(&self, remaining: u64) -> u64 {
        self.boxes
            .iter()
            .find(|&capacity| capacity >= remaining)
            .unwrap_or_else(|| self.boxes.largest())
    }
}

fn expand_runs(runs: Vec<(u64, u64)>, result: &mut Vec<u64>) {
    for (capacity, count) in runs {
        for _ in 0..count {
            result.push(capacity);
        }
    }
}

fn total_boxes(runs: &[(u64, u64)]) -> u64 {
    runs.iter()
        .fold(0u64, |total, &(_, count)| total.saturating_add(count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidBoxSetReason;

    fn default_packer() -> Packer {
        Packer::new(PackerConfig::default()).expect("default boxes are valid")
    }

    #[test]
    fn test_box_set_sorts_and_dedups() {
        let set = BoxSet::new([500, 250, 500, 1000, 250]).unwrap();
        assert_eq!(set.as_slice(), &[250, 500, 1000]);
        assert_eq!(set.smallest(), 250);
        assert_eq!(set.largest(), 1000);
        assert_eq!(set.len(), 3);
        assert!(!set.is_empty());
    }

    #[test]
    fn test_box_set_rejects_empty() {
        let err = BoxSet::new(Vec::new()).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidBoxSet {
                reason: InvalidBoxSetReason::Empty
            }
        );
    }

    #[test]
    fn test_box_set_rejects_zero() {
        let err = BoxSet::new([250, 0, 500]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidBoxSet {
                reason: InvalidBoxSetReason::ZeroCapacity
            }
        );
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn test_box_set_deserialize_validates() {
        let set: BoxSet = serde_json::from_str("[3, 1, 2, 2]").unwrap();
        assert_eq!(set.as_slice(), &[1, 2, 3]);

        assert!(serde_json::from_str::<BoxSet>("[]").is_err());
        assert!(serde_json::from_str::<BoxSet>("[0, 5]").is_err());
    }

    #[test]
    fn test_packer_config_none_uses_defaults() {
        let packer = default_packer();
        assert_eq!(packer.boxes().as_slice(), &DEFAULT_BOXES);
        assert_eq!(packer, Packer::default());
    }

    #[test]
    fn test_packer_config_deserializes_without_boxes() {
        let config: PackerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PackerConfig::default());
    }

    #[test]
    fn test_pack_zero_items() {
        assert!(default_packer().pack_order(0).is_empty());
    }

    #[test]
    fn test_pack_default_scenarios() {
        let packer = default_packer();
        assert_eq!(packer.pack_order(1), vec![250]);
        assert_eq!(packer.pack_order(250), vec![250]);
        assert_eq!(packer.pack_order(251), vec![500]);
        assert_eq!(packer.pack_order(501), vec![500, 250]);
        assert_eq!(packer.pack_order(12001), vec![5000, 5000, 2000, 250]);
    }

    #[test]
    fn test_pack_exact_multiple_stops_early() {
        let packer = default_packer();
        assert_eq!(packer.pack_order(10_000), vec![5000, 5000]);
        assert_eq!(packer.pack_order(7000), vec![5000, 2000]);
    }

    #[test]
    fn test_pack_remainder_just_above_smallest_rounds_up() {
        let packer = default_packer();
        // 751 leaves 251 after the 500 box, which needs the next box up.
        assert_eq!(packer.pack_order(751), vec![500, 500]);
    }

    #[test]
    fn test_pack_custom_small_set() {
        let packer = Packer::with_boxes([1, 2, 4]).unwrap();
        assert_eq!(packer.pack_order(7), vec![4, 2, 1]);
        assert_eq!(packer.pack_order(3), vec![2, 1]);
    }

    #[test]
    fn test_pack_single_box_rounds_up() {
        let packer = Packer::with_boxes([3]).unwrap();
        assert_eq!(packer.pack_order(7), vec![3, 3, 3]);
        assert_eq!(packer.pack_order(6), vec![3, 3]);
        assert_eq!(packer.pack_order(1), vec![3]);
    }

    #[test]
    fn test_box_count_matches_pack_order() {
        let packer = default_packer();
        for items in [0, 1, 250, 251, 501, 751, 10_000, 12001] {
            assert_eq!(
                packer.box_count(items),
                packer.pack_order(items).len() as u64,
                "items = {items}"
            );
        }
    }

    #[test]
    fn test_try_pack_order_within_limit() {
        let packer = default_packer();
        assert_eq!(
            packer.try_pack_order(12001, 4).unwrap(),
            vec![5000, 5000, 2000, 250]
        );
        assert!(packer.try_pack_order(0, 0).unwrap().is_empty());
    }

    #[test]
    fn test_try_pack_order_refuses_before_allocating() {
        let packer = Packer::with_boxes([1]).unwrap();
        let err = packer.try_pack_order(u64::MAX, DEFAULT_MAX_BOXES).unwrap_err();
        assert_eq!(
            err,
            Error::TooManyBoxes {
                required: u64::MAX,
                limit: DEFAULT_MAX_BOXES
            }
        );
    }

    #[test]
    fn test_max_box_count_uses_smallest_box() {
        let packer = default_packer();
        assert_eq!(packer.max_box_count(100_000_000), 400_000);
        assert_eq!(packer.max_box_count(0), 0);

        let ones = Packer::with_boxes([1, 7]).unwrap();
        assert_eq!(ones.max_box_count(100_000_000), 100_000_000);
    }

    #[test]
    fn test_pack_quantity_below_every_box() {
        let packer = Packer::with_boxes([100, 40]).unwrap();
        assert_eq!(packer.pack_order(10), vec![40]);
        assert_eq!(packer.pack_order(41), vec![100]);
    }
}
