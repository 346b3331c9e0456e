pub mod row;
pub mod snapshot;

pub use row::{COLUMNS, OptionChainRow, OptionSide};
pub use snapshot::{OptionLeg, RawSnapshot, Records, StrikeRecord};
