//! Lenient serde helpers for the backend's loosely typed JSON.
//!
//! Telemetry rows may carry numeric fields as numbers, numeric strings, or
//! not at all; a record is never rejected for a malformed metric. Manual
//! scores use 0 on the wire to mean "unscored" (the scale is 1-5), which is
//! decoded to `None` so unset never gets mistaken for a real score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Missing, null, or non-numeric values become 0.0.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(match v {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    })
}

/// Missing, null, negative, or non-numeric values become 0.
pub(crate) fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(match v {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let t = s.trim();
            t.parse::<u64>()
                .ok()
                .or_else(|| t.parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f as u64))
                .unwrap_or(0)
        }
        _ => 0,
    })
}

/// Decode a 1-5 score; 0, null, or anything unparsable means "unscored".
pub(crate) fn opt_score<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(score_from_value(v.as_ref()))
}

pub(crate) fn score_from_value(v: Option<&Value>) -> Option<u8> {
    match v {
        Some(Value::Number(n)) => n.as_u64().filter(|s| (1..=5).contains(s)).map(|s| s as u8),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|s| (1..=5).contains(s))
            .map(|s| s as u8),
        _ => None,
    }
}

/// Encode an optional score back to the wire, where unset is 0.
pub(crate) fn score_to_wire<S>(score: &Option<u8>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u8(score.unwrap_or(0))
}

pub(crate) fn opt_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "super::lenient_f64")]
        cost: f64,
        #[serde(default, deserialize_with = "super::lenient_u64")]
        latency_ms: u64,
    }

    #[test]
    fn numeric_strings_parse() {
        let row: Row = serde_json::from_str(r#"{"cost":"0.01","latency_ms":"250"}"#).unwrap();
        assert_eq!(row.cost, 0.01);
        assert_eq!(row.latency_ms, 250);
    }

    #[test]
    fn missing_and_garbage_become_zero() {
        let row: Row = serde_json::from_str(r#"{"cost":null,"latency_ms":"fast"}"#).unwrap();
        assert_eq!(row.cost, 0.0);
        assert_eq!(row.latency_ms, 0);

        let row: Row = serde_json::from_str("{}").unwrap();
        assert_eq!(row.cost, 0.0);
        assert_eq!(row.latency_ms, 0);
    }

    #[test]
    fn zero_score_is_unset() {
        use serde_json::json;
        assert_eq!(super::score_from_value(Some(&json!(0))), None);
        assert_eq!(super::score_from_value(Some(&json!(4))), Some(4));
        assert_eq!(super::score_from_value(Some(&json!(9))), None);
        assert_eq!(super::score_from_value(None), None);
    }
}
