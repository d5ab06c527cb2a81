use serde::{de, Deserialize, Deserializer};

use crate::errors::AppError;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

/// Accepts an id sent either as a JSON number or as a numeric string.
/// Blank strings and `null` are treated as absent.
pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Number(n)) => i32::try_from(n)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("id {} is out of range", n))),
        Some(RawId::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(RawId::Text(s)) => s
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid id: {}", s))),
    }
}

fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Parses an `ids=1,2,3` query value. Empty segments are skipped, as are
/// integers no row can carry because they overflow the id column.
pub fn parse_id_list(raw: &str) -> Result<Vec<i32>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse::<i32>() {
            Ok(id) => Some(Ok(id)),
            Err(_) if is_integer_literal(s) => None,
            Err(_) => Some(Err(AppError::InvalidInput(format!("Invalid id in list: {}", s)))),
        })
        .collect()
}
