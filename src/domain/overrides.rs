use serde_json::{Map, Value};

use crate::domain::error::StackError;

/// Sets `value` at the dotted `path` inside `target`.
///
/// Missing object keys are created. Numeric segments address existing array
/// elements; they never grow an array.
pub fn apply(target: &mut Value, path: &str, value: Value) -> Result<(), StackError> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(invalid(path, "empty path segment"));
    }

    let Some((last, parents)) = segments.split_last() else {
        return Err(invalid(path, "empty path"));
    };

    let mut cursor = target;
    for segment in parents {
        cursor = descend(cursor, segment, path)?;
    }

    match cursor {
        Value::Object(map) => {
            map.insert((*last).to_owned(), value);
            Ok(())
        }
        Value::Array(items) => {
            let index = array_index(last, items.len(), path)?;
            items[index] = value;
            Ok(())
        }
        _ => Err(invalid(path, format!("`{last}` lands inside a scalar value"))),
    }
}

fn descend<'a>(
    cursor: &'a mut Value,
    segment: &str,
    path: &str,
) -> Result<&'a mut Value, StackError> {
    match cursor {
        Value::Object(map) => Ok(map
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()))),
        Value::Array(items) => {
            let index = array_index(segment, items.len(), path)?;
            Ok(&mut items[index])
        }
        _ => Err(invalid(path, format!("`{segment}` traverses a scalar value"))),
    }
}

fn array_index(segment: &str, len: usize, path: &str) -> Result<usize, StackError> {
    let index: usize = segment
        .parse()
        .map_err(|_| invalid(path, format!("`{segment}` is not an array index")))?;

    if index >= len {
        return Err(invalid(
            path,
            format!("index {index} is out of range for an array of {len}"),
        ));
    }

    Ok(index)
}

fn invalid(path: &str, reason: impl Into<String>) -> StackError {
    StackError::InvalidOverride {
        path: path.to_owned(),
        reason: reason.into(),
    }
}
