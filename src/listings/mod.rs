mod json_path;
mod row;

pub use json_path::lookup;
pub use row::{map_listing, CellValue, Row, COLUMNS, COLUMN_COUNT};
