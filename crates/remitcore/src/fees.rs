//! Fixed Kwacha fee-bracket table and lookup.
//!
//! Brackets are inclusive on both ends, non-overlapping and sorted by
//! ascending lower bound. Amounts that fall in a gap between brackets, or
//! outside the global bounds, have no determinable fee — that is an explicit
//! "no match", never a zero fee.

/// One inclusive Kwacha range mapped to a flat fee.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeBracket {
    pub low: f64,
    pub high: f64,
    pub fee: f64,
}

impl FeeBracket {
    /// True when `amount` lies within the inclusive `[low, high]` range.
    pub fn contains(&self, amount: f64) -> bool {
        self.low <= amount && amount <= self.high
    }
}

/// Ordered list of disjoint fee brackets.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeTable {
    brackets: Vec<FeeBracket>,
}

impl FeeTable {
    /// Wraps a bracket list. Callers must supply brackets sorted by ascending
    /// lower bound with no overlaps; `standard()` is the production table.
    pub fn new(brackets: Vec<FeeBracket>) -> Self {
        debug_assert!(
            brackets.windows(2).all(|w| w[0].high < w[1].low),
            "fee brackets must be sorted and disjoint"
        );
        Self { brackets }
    }

    /// The production fee table, amounts in Kwacha.
    pub fn standard() -> Self {
        Self::new(
            [
                (100.0, 450.0, 25.0),
                (500.0, 1_500.0, 50.0),
                (1_600.0, 3_400.0, 100.0),
                (3_500.0, 6_400.0, 150.0),
                (6_500.0, 10_000.0, 325.0),
                (10_001.0, 15_000.0, 500.0),
                (15_001.0, 20_000.0, 700.0),
                (20_001.0, 40_000.0, 1_000.0),
            ]
            .into_iter()
            .map(|(low, high, fee)| FeeBracket { low, high, fee })
            .collect(),
        )
    }

    /// Returns the first bracket containing `amount`, or `None` when the
    /// amount falls in a gap or outside the global bounds. Linear scan; the
    /// table has single-digit length and brackets are disjoint, so at most
    /// one bracket can match.
    pub fn fee_for(&self, amount: f64) -> Option<&FeeBracket> {
        self.brackets.iter().find(|b| b.contains(amount))
    }

    /// Lowest supported Kwacha amount.
    pub fn min_kwacha(&self) -> f64 {
        self.brackets.first().map_or(0.0, |b| b.low)
    }

    /// Highest supported Kwacha amount.
    pub fn max_kwacha(&self) -> f64 {
        self.brackets.last().map_or(0.0, |b| b.high)
    }

    pub fn brackets(&self) -> &[FeeBracket] {
        &self.brackets
    }
}

impl Default for FeeTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_bounds() {
        let table = FeeTable::standard();
        assert_eq!(table.min_kwacha(), 100.0);
        assert_eq!(table.max_kwacha(), 40_000.0);
        assert_eq!(table.brackets().len(), 8);
    }

    #[test]
    fn fee_lookup_matches_expected_brackets() {
        let table = FeeTable::standard();

        let b = table.fee_for(6_500.0).unwrap();
        assert_eq!(b.fee, 325.0);
        assert_eq!((b.low, b.high), (6_500.0, 10_000.0));

        let b = table.fee_for(450.0).unwrap();
        assert_eq!(b.fee, 25.0);
    }

    #[test]
    fn amounts_outside_global_bounds_have_no_fee() {
        let table = FeeTable::standard();
        assert!(table.fee_for(99.0).is_none());
        assert!(table.fee_for(40_001.0).is_none());
    }

    #[test]
    fn gap_between_brackets_has_no_fee() {
        let table = FeeTable::standard();
        // 450 is the top of the first bracket, 500 the bottom of the second.
        assert!(table.fee_for(451.0).is_none());
        assert!(table.fee_for(499.99).is_none());
        assert!(table.fee_for(500.0).is_some());
    }

    #[test]
    fn inclusive_bounds_match_on_both_ends() {
        let table = FeeTable::standard();
        for b in table.brackets() {
            assert_eq!(table.fee_for(b.low).unwrap().fee, b.fee);
            assert_eq!(table.fee_for(b.high).unwrap().fee, b.fee);
        }
    }

    #[test]
    fn no_amount_matches_two_brackets() {
        let table = FeeTable::standard();
        // Scan the whole supported range in 0.5 K steps.
        let mut amount = table.min_kwacha();
        while amount <= table.max_kwacha() {
            let matches = table.brackets().iter().filter(|b| b.contains(amount)).count();
            assert!(matches <= 1, "amount {} matched {} brackets", amount, matches);
            amount += 0.5;
        }
    }
}
