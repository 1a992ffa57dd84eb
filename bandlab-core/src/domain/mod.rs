//! Domain types: bars and the price-source selector.

pub mod bar;
pub mod price_source;

pub use bar::Bar;
pub use price_source::PriceSource;
