/// Output schema of the ICSA observation feed. Values from a data row are
/// mapped onto these keys by position, and the order here is the key order
/// of every emitted JSON record.
pub const FIELD_NAMES: [&str; 2] = ["observation_date", "icsa"];

/// Raw field value meaning "omit this key". Exact match only: `NULL` or
/// `" null"` are ordinary values.
pub const NULL_TOKEN: &str = "null";
