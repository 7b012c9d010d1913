//! Deterministic logical ids derived from construct paths.

use crate::domain::error::StackError;

/// Path component that is dropped entirely (neither rendered nor hashed).
pub const HIDDEN_ID: &str = "Default";
/// Path component that is hashed but not rendered in the readable part.
pub const HIDDEN_FROM_HUMAN_ID: &str = "Resource";

const HASH_LEN: usize = 8;
const MAX_HUMAN_LEN: usize = 240;
const MAX_ID_LEN: usize = 255;

pub fn allocate(path: &[&str]) -> Result<String, StackError> {
    let components: Vec<&str> = path
        .iter()
        .copied()
        .filter(|component| *component != HIDDEN_ID)
        .collect();

    if components.is_empty() {
        return Err(StackError::EmptyPath);
    }

    if components.len() == 1 {
        let candidate = remove_non_alphanumeric(components[0]);
        if candidate.len() <= MAX_ID_LEN {
            return Ok(candidate);
        }
    }

    let human: String = remove_dupes(&components)
        .into_iter()
        .filter(|component| *component != HIDDEN_FROM_HUMAN_ID)
        .map(remove_non_alphanumeric)
        .collect::<String>()
        .chars()
        .take(MAX_HUMAN_LEN)
        .collect();

    Ok(format!("{human}{}", path_hash(&components)))
}

fn path_hash(components: &[&str]) -> String {
    let digest = md5::compute(components.join("/").as_bytes());
    format!("{digest:x}")[..HASH_LEN].to_ascii_uppercase()
}

fn remove_non_alphanumeric(component: &str) -> String {
    component
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

// "Foo/FooBar/Bar" style repetition adds nothing to the readable id.
fn remove_dupes<'a>(components: &[&'a str]) -> Vec<&'a str> {
    let mut kept: Vec<&'a str> = Vec::with_capacity(components.len());
    for component in components {
        match kept.last() {
            Some(previous) if previous.ends_with(component) => {}
            _ => kept.push(component),
        }
    }
    kept
}
