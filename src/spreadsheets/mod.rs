pub mod listings_xlsx;

pub use listings_xlsx::{RowSink, SheetWriter};
