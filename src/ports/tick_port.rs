//! Tick data source port trait.

use crate::domain::error::QuantickError;
use crate::domain::sample::PriceSample;

pub trait TickPort {
    /// Fetch the full tick series for a symbol, oldest first.
    fn fetch_ticks(&self, symbol: &str) -> Result<Vec<PriceSample>, QuantickError>;
}
