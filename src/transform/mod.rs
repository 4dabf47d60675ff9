pub mod fields;
pub mod line;

pub use fields::{FIELD_NAMES, NULL_TOKEN};
pub use line::line_to_json;
