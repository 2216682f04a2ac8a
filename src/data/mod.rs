//! Tabular results: the in-memory result set, decoding of result files, and
//! the column normalizations charts need.

mod decode;
mod normalize;
mod types;

pub use decode::parse_csv;
pub use normalize::{to_categorical, to_temporal, Coercion};
pub use types::{ColumnInfo, ColumnType, ResultSet, Row, Value};
