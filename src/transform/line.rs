use serde_json::{Map, Value};

use crate::transform::fields::{FIELD_NAMES, NULL_TOKEN};

/// Convert one raw CSV data line into a JSON object string.
///
/// Splits on `,` with no quote or escape handling and keeps each segment
/// verbatim. Segments are mapped onto [`FIELD_NAMES`] by position; a segment
/// equal to [`NULL_TOKEN`] drops its key, segments past the last field name
/// have no key to land on and are dropped. Never fails: a malformed line
/// yields a partial (possibly empty) object.
pub fn line_to_json(line: &str) -> String {
    let mut record = Map::new();
    for (name, value) in FIELD_NAMES.iter().zip(line.split(',')) {
        if value == NULL_TOKEN {
            continue;
        }
        record.insert((*name).to_string(), Value::String(value.to_string()));
    }
    Value::Object(record).to_string()
}
