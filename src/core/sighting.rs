use std::collections::HashMap;

use chrono::{DateTime, NaiveTime, Utc};
use serde::Serialize;

use crate::core::error::SubmitError;
use crate::core::form::{
    CONFIDENCE_LEVEL, SIGHTING_DESC, SIGHTING_TAGS, SIGHTING_TITLE, SIGHTING_TYPE, SIGHTING_VALUE,
};

/// Timestamp layout the ingestion API expects: UTC with microseconds and a
/// literal `Z`, e.g. `2026-08-06T09:41:05.123456Z`.
pub const API_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Wire shape of a sighting entity. The nesting is fixed by the platform
/// schema; every field is mandatory on the wire even when the form treats it
/// as optional.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SightingDocument {
    pub data: SightingData,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SightingData {
    pub data: SightingDetails,
    pub meta: SightingMeta,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SightingDetails {
    pub value: String,
    pub description: String,
    pub timestamp: String,
    pub confidence: String,
    pub title: String,
    pub security_control: SecurityControl,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SecurityControl {
    #[serde(rename = "type")]
    pub control_type: String,
    pub time: ObservationWindow,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ObservationWindow {
    pub start_time: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SightingMeta {
    pub tags: Vec<String>,
    pub ingest_time: String,
}

impl SightingDocument {
    /// Build a sighting from the parsed form. Constructed fresh per request;
    /// a missing required field fails with the offending key.
    pub fn build(
        form: &HashMap<String, String>,
        now: DateTime<Utc>,
    ) -> Result<SightingDocument, SubmitError> {
        let required = |key: &'static str| {
            form.get(key)
                .cloned()
                .ok_or(SubmitError::MissingField(key))
        };

        let stamp = format_api_time(now);
        let window_start = day_start(now);
        // The platform receives the raw tags string as a single tag, passed
        // through character by character.
        let tags = vec![required(SIGHTING_TAGS)?.chars().collect::<String>()];

        Ok(SightingDocument {
            data: SightingData {
                data: SightingDetails {
                    value: required(SIGHTING_VALUE)?,
                    description: required(SIGHTING_DESC)?,
                    timestamp: stamp.clone(),
                    confidence: required(CONFIDENCE_LEVEL)?,
                    title: required(SIGHTING_TITLE)?,
                    security_control: SecurityControl {
                        control_type: required(SIGHTING_TYPE)?,
                        time: ObservationWindow {
                            start_time: window_start,
                        },
                    },
                },
                meta: SightingMeta {
                    tags,
                    ingest_time: stamp,
                },
            },
        })
    }
}

pub fn format_api_time(time: DateTime<Utc>) -> String {
    time.format(API_TIME_FORMAT).to_string()
}

/// Midnight UTC of `now`'s calendar date, in the API layout. The observation
/// window opens at the start of the current day while the record timestamps
/// keep full time-of-day precision.
fn day_start(now: DateTime<Utc>) -> String {
    now.date_naive()
        .and_time(NaiveTime::MIN)
        .format(API_TIME_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn full_form() -> HashMap<String, String> {
        let pairs = [
            (SIGHTING_VALUE, "198.51.100.7"),
            (SIGHTING_DESC, "Beacon to known C2"),
            (CONFIDENCE_LEVEL, "high"),
            (SIGHTING_TITLE, "C2 beacon observed"),
            (SIGHTING_TAGS, "soc,ir"),
            (SIGHTING_TYPE, "firewall"),
        ];
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn pinned_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 6, 14, 30, 45).unwrap()
            + chrono::Duration::microseconds(123456)
    }

    #[test]
    fn timestamps_carry_the_pinned_now() {
        let doc = SightingDocument::build(&full_form(), pinned_now()).unwrap();
        assert_eq!(doc.data.data.timestamp, "2026-08-06T14:30:45.123456Z");
        assert_eq!(doc.data.meta.ingest_time, "2026-08-06T14:30:45.123456Z");
    }

    #[test]
    fn window_opens_at_midnight_of_the_same_day() {
        let doc = SightingDocument::build(&full_form(), pinned_now()).unwrap();
        assert_eq!(
            doc.data.data.security_control.time.start_time,
            "2026-08-06T00:00:00.000000Z"
        );
    }

    #[test]
    fn form_fields_land_in_the_fixed_shape() {
        let doc = SightingDocument::build(&full_form(), pinned_now()).unwrap();
        assert_eq!(doc.data.data.value, "198.51.100.7");
        assert_eq!(doc.data.data.description, "Beacon to known C2");
        assert_eq!(doc.data.data.confidence, "high");
        assert_eq!(doc.data.data.title, "C2 beacon observed");
        assert_eq!(doc.data.data.security_control.control_type, "firewall");
    }

    // Pins the inherited behavior: the tags value is not split on any
    // delimiter, it becomes one tag verbatim.
    #[test]
    fn tag_string_is_forwarded_verbatim_as_one_tag() {
        let doc = SightingDocument::build(&full_form(), pinned_now()).unwrap();
        assert_eq!(doc.data.meta.tags, vec!["soc,ir".to_string()]);
    }

    #[test]
    fn missing_required_field_names_the_key() {
        let mut form = full_form();
        form.remove(SIGHTING_TITLE);
        let err = SightingDocument::build(&form, pinned_now()).unwrap_err();
        match err {
            SubmitError::MissingField(key) => assert_eq!(key, SIGHTING_TITLE),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn document_serializes_to_the_platform_schema() {
        let doc = SightingDocument::build(&full_form(), pinned_now()).unwrap();
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["data"]["data"]["value"], "198.51.100.7");
        assert_eq!(json["data"]["data"]["security_control"]["type"], "firewall");
        assert_eq!(
            json["data"]["data"]["security_control"]["time"]["start_time"],
            "2026-08-06T00:00:00.000000Z"
        );
        assert_eq!(json["data"]["meta"]["ingest_time"], "2026-08-06T14:30:45.123456Z");
    }
}
