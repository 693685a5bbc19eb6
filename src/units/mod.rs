pub mod constants;
pub mod table;

pub use constants::{default_conversions, DEFAULT_CONVERSIONS, UNIT_OPTIONS};
pub use table::ConversionTable;
