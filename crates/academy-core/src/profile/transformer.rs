//! Profile normalization.
//!
//! Reshapes signup forms, login payloads and previously stored profiles into
//! one canonical [`Profile`]. The transformation never fails: every missing
//! value becomes the type's empty default.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::model::{AcademyInfo, Location, PersonalInfo, Profile};
use crate::error::Result;

/// Role assigned when neither source supplies one.
pub const DEFAULT_ROLE: &str = "admin";

/// Raw user payload as sent by the signup form or returned by the backend.
///
/// Field names follow the backend (`first_name`); the camelCase spellings
/// used by the forms are accepted as aliases.
///
/// Backends are not consistent about scalar types: numbers and booleans are
/// read as their text, other shapes count as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawUserData {
    #[serde(deserialize_with = "lenient_text")]
    pub username: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(alias = "firstName", deserialize_with = "lenient_text")]
    pub first_name: Option<String>,
    #[serde(alias = "lastName", deserialize_with = "lenient_text")]
    pub last_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub role: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub club: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(alias = "profileImage", deserialize_with = "lenient_text")]
    pub profile_image: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub country: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub state: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub city: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub address: Option<String>,
    #[serde(alias = "postalCode", deserialize_with = "lenient_text")]
    pub postal_code: Option<String>,
    /// Present on mixed payloads; its fields win over the computed ones.
    #[serde(
        rename = "academyInfo",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_academy"
    )]
    pub academy_info: Option<AcademyInfo>,
}

/// Explicitly tagged transformer input.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileInput {
    /// Already in canonical shape (possibly partial; defaults were applied
    /// when it was parsed).
    Canonical(Profile),
    /// Backend or signup payload.
    Raw(RawUserData),
}

/// Raw keys that mark a document as a backend payload even when it also
/// carries an `academyInfo` object.
const RAW_KEYS: &[&str] = &[
    "username",
    "first_name",
    "last_name",
    "firstName",
    "lastName",
    "email",
    "club",
    "role",
    "phone",
];

impl ProfileInput {
    /// Classifies an untyped JSON document.
    ///
    /// Only meant for data that arrives without a type: backend payloads and
    /// profile blobs written before schema versioning. A document with
    /// `personalInfo` is canonical; one with only `academyInfo` is canonical
    /// unless it also carries raw top-level fields, in which case it is a
    /// mixed raw payload. `null` members are treated as missing, and so are
    /// members of the wrong type; only a non-object document is an error.
    pub fn from_json(value: Value) -> Result<Self> {
        let value = strip_nulls(value);
        let object = match value {
            Value::Object(object) => object,
            Value::Null => Map::new(),
            other => {
                return Err(crate::error::AcademyError::json(format!(
                    "expected a JSON object for user data, found {}",
                    json_kind(&other)
                )));
            }
        };

        let has_personal = object.contains_key("personalInfo");
        let has_academy = object.contains_key("academyInfo");
        let has_raw = RAW_KEYS.iter().any(|key| object.contains_key(*key));

        if has_personal || (has_academy && !has_raw) {
            Ok(Self::Canonical(conform(&Value::Object(object))))
        } else {
            Ok(Self::Raw(serde_json::from_value(Value::Object(object))?))
        }
    }
}

/// Converts any supported input into a canonical [`Profile`].
///
/// `signup` is a secondary source for raw inputs (the form values typed at
/// signup); it is ignored for canonical inputs. Values are copied as given:
/// a blank value counts as missing but surrounding whitespace is kept.
pub fn transform(input: ProfileInput, signup: &RawUserData) -> Profile {
    match input {
        ProfileInput::Canonical(profile) => profile,
        ProfileInput::Raw(user) => from_raw(user, signup),
    }
}

fn from_raw(user: RawUserData, signup: &RawUserData) -> Profile {
    let first_name = pick(&[&user.first_name, &signup.first_name]);
    let last_name = pick(&[&user.last_name, &signup.last_name]);

    let full_name = match (first_name, last_name) {
        (Some(first), Some(last)) => format!("{} {}", first, last),
        _ => pick(&[&user.username, &signup.username])
            .unwrap_or_default()
            .to_string(),
    };

    let personal_info = PersonalInfo {
        first_name: first_name.unwrap_or_default().to_string(),
        last_name: last_name.unwrap_or_default().to_string(),
        full_name,
        email: owned(&[&user.email, &signup.email]),
        phone: owned(&[&user.phone, &signup.phone]),
        profile_image: owned(&[&user.profile_image, &signup.profile_image]),
        role: pick(&[&user.role, &signup.role])
            .unwrap_or(DEFAULT_ROLE)
            .to_string(),
        status: owned(&[&user.status, &signup.status]),
    };

    let location = Location {
        country: owned(&[&user.country, &signup.country]),
        state: owned(&[&user.state, &signup.state]),
        city: owned(&[&user.city, &signup.city]),
        address: owned(&[&user.address, &signup.address]),
        postal_code: owned(&[&user.postal_code, &signup.postal_code]),
    };

    let club = pick(&[&user.club, &signup.club]).map(str::to_string);
    let academy_info = match user.academy_info {
        Some(mut academy) => {
            if academy.name.trim().is_empty() {
                academy.name = club.unwrap_or_default();
            }
            academy
        }
        None => {
            let existing = signup
                .academy_info
                .as_ref()
                .map(|a| a.name.as_str())
                .filter(|name| !name.trim().is_empty());
            AcademyInfo {
                name: club
                    .or_else(|| existing.map(str::to_string))
                    .unwrap_or_default(),
                ..Default::default()
            }
        }
    };

    Profile {
        personal_info,
        location,
        academy_info,
        preferences: Default::default(),
    }
}

/// First non-blank candidate.
fn pick<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|c| c.as_deref())
        .find(|s| !s.trim().is_empty())
}

fn owned(candidates: &[&Option<String>]) -> String {
    pick(candidates).unwrap_or_default().to_string()
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(&Value::deserialize(deserializer)?))
}

fn lenient_academy<'de, D>(deserializer: D) -> std::result::Result<Option<AcademyInfo>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => Some(conform(&value)),
        _ => None,
    })
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reads `value` as a `T`, member by member.
///
/// Each member of `T::default()` is taken from `value` when the types agree
/// (numbers and booleans are accepted as text, `"true"`/`"false"` as
/// booleans) and keeps its default otherwise. Lists are lists of text.
fn conform<T>(value: &Value) -> T
where
    T: Default + Serialize + DeserializeOwned,
{
    let Ok(template) = serde_json::to_value(T::default()) else {
        return T::default();
    };
    serde_json::from_value(conform_value(&template, Some(value))).unwrap_or_default()
}

fn conform_value(template: &Value, input: Option<&Value>) -> Value {
    match (template, input) {
        (Value::Object(fields), _) => Value::Object(
            fields
                .iter()
                .map(|(key, field)| {
                    let member = input.and_then(|i| i.get(key));
                    (key.clone(), conform_value(field, member))
                })
                .collect(),
        ),
        (Value::String(_), Some(value)) => scalar_text(value)
            .map(Value::String)
            .unwrap_or_else(|| template.clone()),
        (Value::Bool(_), Some(Value::Bool(b))) => Value::Bool(*b),
        (Value::Bool(_), Some(Value::String(s))) if s.eq_ignore_ascii_case("true") => {
            Value::Bool(true)
        }
        (Value::Array(_), Some(Value::Array(items))) => Value::Array(
            items
                .iter()
                .filter_map(scalar_text)
                .map(Value::String)
                .collect(),
        ),
        _ => template.clone(),
    }
}

/// Removes `null` object members and array elements, recursively.
pub fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .filter(|v| !v.is_null())
                .map(strip_nulls)
                .collect(),
        ),
        other => other,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
