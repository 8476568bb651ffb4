pub mod a1_notation;
pub mod cell_position;
pub mod cell_range;
pub mod column;
pub mod coordinate;
pub mod locator;
pub mod options;
pub mod records;
pub mod row;
pub mod spreadsheet;
