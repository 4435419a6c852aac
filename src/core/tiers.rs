//! PC-008: Tiered usage — split one usage total across ascending price tiers.
//!
//! Boundaries `[b1, b2, ..., bN]` define N+1 tiers: `[0, b1)`, `[b1, b2)`, ...,
//! `[bN, ∞)`. Arithmetic is exact `Decimal`; the quantities always sum to the
//! total for a non-negative total and strictly ascending, non-negative boundaries.

use rust_decimal::Decimal;

/// Quantity falling into each tier; always `boundaries.len() + 1` entries.
pub fn tier_quantities(total: Decimal, boundaries: &[Decimal]) -> Vec<Decimal> {
    let mut quantities = Vec::with_capacity(boundaries.len() + 1);
    let mut lower = Decimal::ZERO;
    for &upper in boundaries {
        quantities.push((total.min(upper) - lower).max(Decimal::ZERO));
        lower = upper;
    }
    quantities.push((total - lower).max(Decimal::ZERO));
    quantities
}

/// One tier's share of a usage total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierBucket {
    pub index: usize,
    /// Usage amount at which this tier starts (price filter anchor)
    pub start: Decimal,
    pub quantity: Decimal,
}

impl TierBucket {
    /// Whether a priced line item should be emitted for this tier.
    /// Tier 0 always is, so a price lookup exists even for zero usage.
    pub fn is_emitted(&self) -> bool {
        self.index == 0 || !self.quantity.is_zero()
    }
}

/// Like `tier_quantities`, with each tier's start amount attached.
pub fn tier_buckets(total: Decimal, boundaries: &[Decimal]) -> Vec<TierBucket> {
    let starts = std::iter::once(Decimal::ZERO).chain(boundaries.iter().copied());
    tier_quantities(total, boundaries)
        .into_iter()
        .zip(starts)
        .enumerate()
        .map(|(index, (quantity, start))| TierBucket {
            index,
            start,
            quantity,
        })
        .collect()
}

/// Boundaries from whole numbers, for constructor tables.
pub fn boundaries(values: &[i64]) -> Vec<Decimal> {
    values.iter().copied().map(Decimal::from).collect()
}
