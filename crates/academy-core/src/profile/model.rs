//! Profile domain model.
//!
//! The canonical, fully-populated user record. Every nested struct has a
//! `Default` and is deserialized with `#[serde(default)]`, so a profile read
//! from any partial document still has every field.

use serde::{Deserialize, Serialize};

use super::role::Role;

/// Canonical normalized user record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub personal_info: PersonalInfo,
    pub location: Location,
    pub academy_info: AcademyInfo,
    pub preferences: Preferences,
}

impl Profile {
    /// Parsed role of the profile owner.
    pub fn role(&self) -> Role {
        Role::parse(&self.personal_info.role)
    }

    /// Name shown in navbars: full name, else email.
    pub fn display_name(&self) -> &str {
        if self.personal_info.full_name.trim().is_empty() {
            &self.personal_info.email
        } else {
            &self.personal_info.full_name
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub profile_image: String,
    pub role: String,
    pub status: String,
}

impl PersonalInfo {
    /// Recomputes `full_name` from first and last name when both are set.
    pub fn refresh_full_name(&mut self) {
        let first = self.first_name.trim();
        let last = self.last_name.trim();
        if !first.is_empty() && !last.is_empty() {
            self.full_name = format!("{} {}", first, last);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    pub country: String,
    pub state: String,
    pub city: String,
    pub address: String,
    pub postal_code: String,
}

impl Location {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AcademyInfo {
    pub name: String,
    pub logo: String,
    pub founded: String,
    pub country: String,
    pub state: String,
    pub city: String,
    pub postal_code: String,
    pub address: String,
    pub achievements: String,
    pub age_groups: Vec<String>,
    pub tenues: Tenues,
    pub staff: Staff,
    pub facilities: Facilities,
    pub philosophy: String,
    pub contact: Contact,
}

impl AcademyInfo {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Home and away kits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tenues {
    pub home_kit: String,
    pub away_kit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Staff {
    pub technical_director: String,
    pub head_coach: String,
    pub fitness_coach: String,
    pub medical_staff: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Facilities {
    pub stadium_name: String,
    pub stadium_location: String,
    pub gym: bool,
    pub cafeteria: bool,
    pub dormitory: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    pub phone: String,
    pub email: String,
    pub facebook: String,
    pub instagram: String,
    pub website: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub timezone: String,
    pub languages: Vec<String>,
}

impl Preferences {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_serializes_every_key() {
        let value = serde_json::to_value(Profile::default()).unwrap();

        assert_eq!(value["academyInfo"]["staff"]["headCoach"], json!(""));
        assert_eq!(value["academyInfo"]["facilities"]["gym"], json!(false));
        assert_eq!(value["academyInfo"]["ageGroups"], json!([]));
        assert_eq!(value["academyInfo"]["tenues"]["awayKit"], json!(""));
        assert_eq!(value["location"]["postalCode"], json!(""));
        assert_eq!(value["preferences"]["languages"], json!([]));
    }

    #[test]
    fn test_partial_document_fills_siblings() {
        let profile: Profile = serde_json::from_value(json!({
            "academyInfo": { "staff": { "headCoach": "Sami" } }
        }))
        .unwrap();

        assert_eq!(profile.academy_info.staff.head_coach, "Sami");
        assert_eq!(profile.academy_info.staff.fitness_coach, "");
        assert!(!profile.academy_info.facilities.gym);
    }

    #[test]
    fn test_refresh_full_name_needs_both_parts() {
        let mut info = PersonalInfo {
            first_name: "Amine".to_string(),
            full_name: "old".to_string(),
            ..Default::default()
        };
        info.refresh_full_name();
        assert_eq!(info.full_name, "old");

        info.last_name = "Trabelsi".to_string();
        info.refresh_full_name();
        assert_eq!(info.full_name, "Amine Trabelsi");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let mut profile = Profile::default();
        profile.personal_info.email = "a@b.com".to_string();
        assert_eq!(profile.display_name(), "a@b.com");
    }
}
