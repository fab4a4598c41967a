// Chart derivation
// Pure functions turning already-computed aggregates into display geometry.
// No store access; everything here is deterministic given its inputs (the
// trend curve takes an RNG for its jitter, seedable in tests).

pub mod pie;
pub mod trend;

pub use pie::{pie_slices, PieSlice};
pub use trend::{synthesize_trend, TrendChart, TrendPoint};
