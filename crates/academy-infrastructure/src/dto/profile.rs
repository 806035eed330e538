//! Profile DTOs and migrations

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, MigratesTo, Versioned};

use academy_core::profile::{AcademyInfo, Location, PersonalInfo, Preferences, Profile};

/// Profile V1.0.0 (personal info, location and academy only).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileV1_0 {
    pub personal_info: PersonalInfo,
    pub location: Location,
    pub academy_info: AcademyInfo,
}

/// Profile V1.1.0 (added preferences).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.1.0")]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileV1_1 {
    pub personal_info: PersonalInfo,
    pub location: Location,
    pub academy_info: AcademyInfo,
    pub preferences: Preferences,
}

/// Type alias for the latest Profile version.
pub type ProfileDTO = ProfileV1_1;

// ============================================================================
// Migration implementations
// ============================================================================

/// Migration from ProfileV1_0 to ProfileV1_1.
impl MigratesTo<ProfileV1_1> for ProfileV1_0 {
    fn migrate(self) -> ProfileV1_1 {
        ProfileV1_1 {
            personal_info: self.personal_info,
            location: self.location,
            academy_info: self.academy_info,
            preferences: Preferences::default(),
        }
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

impl IntoDomain<Profile> for ProfileV1_1 {
    fn into_domain(self) -> Profile {
        Profile {
            personal_info: self.personal_info,
            location: self.location,
            academy_info: self.academy_info,
            preferences: self.preferences,
        }
    }
}

impl FromDomain<Profile> for ProfileV1_1 {
    fn from_domain(profile: Profile) -> Self {
        ProfileV1_1 {
            personal_info: profile.personal_info,
            location: profile.location,
            academy_info: profile.academy_info,
            preferences: profile.preferences,
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates a Migrator for the stored profile document.
///
/// # Migration Path
///
/// - V1.0 → V1.1: Adds empty `preferences`
/// - V1.1 → Profile: Converts DTO to domain model
pub fn create_profile_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let profile_path = version_migrate::Migrator::define("profile")
        .from::<ProfileV1_0>()
        .step::<ProfileV1_1>()
        .into_with_save::<Profile>();

    migrator
        .register(profile_path)
        .expect("Failed to register profile migration path");

    migrator
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_v1_0_gets_empty_preferences() {
        let migrator = create_profile_migrator();
        let stored = json!({
            "version": "1.0.0",
            "personalInfo": { "fullName": "Sami Trabelsi", "role": "coach" },
            "academyInfo": { "name": "Etoile", "facilities": { "gym": true } }
        });

        let profile: Profile = migrator.load_flat_from("profile", stored).unwrap();
        assert_eq!(profile.personal_info.full_name, "Sami Trabelsi");
        assert!(profile.academy_info.facilities.gym);
        assert!(profile.academy_info.staff.head_coach.is_empty());
        assert_eq!(profile.preferences, Preferences::default());
    }

    #[test]
    fn test_save_writes_latest_version() {
        let migrator = create_profile_migrator();
        let mut profile = Profile::default();
        profile.preferences.timezone = "Africa/Tunis".to_string();

        let saved = migrator.save_domain_flat("profile", &profile).unwrap();
        let value: serde_json::Value = serde_json::from_str(&saved).unwrap();
        assert_eq!(value["version"], "1.1.0");
        assert_eq!(value["preferences"]["timezone"], "Africa/Tunis");

        let reloaded: Profile = migrator.load_flat_from("profile", value).unwrap();
        assert_eq!(reloaded, profile);
    }
}
