//! Event record schema and the closed category set.
//!
//! Records are deserialized with the original JSON field names (`radiusKm`,
//! `type`). Category tags are parsed through [`TypeTag`] so that out-of-set
//! values survive loading and can be reported by validation instead of
//! killing the deserializer mid-file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Geographic position of an event, WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// The closed set of event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    War,
    Earthquake,
    Terror,
    Archaeology,
    Fire,
    Disaster,
    Tsunami,
    Meteorite,
    Epidemic,
    ManMadeDisaster,
}

impl EventType {
    /// Every member of the closed set, in display order.
    pub const ALL: [EventType; 10] = [
        EventType::War,
        EventType::Earthquake,
        EventType::Terror,
        EventType::Archaeology,
        EventType::Fire,
        EventType::Disaster,
        EventType::Tsunami,
        EventType::Meteorite,
        EventType::Epidemic,
        EventType::ManMadeDisaster,
    ];

    /// Kebab-case wire name, matching the JSON representation.
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::War => "war",
            EventType::Earthquake => "earthquake",
            EventType::Terror => "terror",
            EventType::Archaeology => "archaeology",
            EventType::Fire => "fire",
            EventType::Disaster => "disaster",
            EventType::Tsunami => "tsunami",
            EventType::Meteorite => "meteorite",
            EventType::Epidemic => "epidemic",
            EventType::ManMadeDisaster => "man-made-disaster",
        }
    }

    /// Fixed remap table for category drift observed in legacy datasets.
    /// Applied only on explicit request (`validate --fix`), never silently.
    pub fn remap_legacy(raw: &str) -> Option<EventType> {
        match raw.trim().to_lowercase().as_str() {
            "culture" | "science" => Some(EventType::Archaeology),
            "man-made disaster" => Some(EventType::Disaster),
            _ => None,
        }
    }
}

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownEventType(s.to_string()))
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `type` value outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown event type `{0}`")]
pub struct UnknownEventType(pub String);

/// Category tag as found on disk. Unknown strings are preserved verbatim so
/// validation can surface them with a remap suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeTag {
    Known(EventType),
    Unknown(String),
}

impl TypeTag {
    pub fn known(&self) -> Option<EventType> {
        match self {
            TypeTag::Known(t) => Some(*t),
            TypeTag::Unknown(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TypeTag::Known(t) => t.as_str(),
            TypeTag::Unknown(raw) => raw.as_str(),
        }
    }
}

impl From<String> for TypeTag {
    fn from(raw: String) -> Self {
        match raw.parse::<EventType>() {
            Ok(t) => TypeTag::Known(t),
            Err(_) => TypeTag::Unknown(raw),
        }
    }
}

impl From<TypeTag> for String {
    fn from(tag: TypeTag) -> Self {
        match tag {
            TypeTag::Known(t) => t.as_str().to_string(),
            TypeTag::Unknown(raw) => raw,
        }
    }
}

/// One historical-event entry in the dataset.
///
/// `id` is assigned at creation time by the curation process and never
/// regenerated here. Optional fields are omitted from serialized output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: TypeTag,

    /// Human-readable name; may embed a year or year range.
    pub title: String,

    /// ISO-style country code or name.
    pub country: String,

    /// Map placement, required.
    pub pos: LatLng,

    /// Short free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,

    /// Long description; presence and length are a quality signal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc_long: Option<String>,

    /// External reference URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki: Option<String>,

    /// Single year, range ("1939-1945"), era-marked ("400-bc"),
    /// or open range ("2011-present").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub casualties: Option<u64>,

    /// Geographic extent in kilometers; decides area vs point rendering.
    #[serde(rename = "radiusKm", default, skip_serializing_if = "Option::is_none")]
    pub radius_km: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Fatal input-validation failures raised before the pure pipeline runs.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("record `{id}` has an empty title; normalization is undefined for absent titles")]
    EmptyTitle { id: String },
}
