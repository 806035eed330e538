//! Profile settings.
//!
//! Each settings tab replaces one section of the stored profile and writes
//! the whole document back.

use std::sync::Arc;

use tracing::info;

use academy_core::error::{AcademyError, Result};
use academy_core::profile::{
    AcademyInfo, Location, PersonalInfo, Preferences, Profile, ProfileRepository,
};
use academy_core::store::keys;
use academy_core::validation::FormErrors;

pub struct ProfileService {
    profiles: Arc<dyn ProfileRepository>,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    /// The stored profile, or `NotFound` when nobody is signed in.
    pub async fn get_profile(&self) -> Result<Profile> {
        self.profiles
            .load()
            .await?
            .ok_or_else(|| AcademyError::not_found("Profile", keys::USER))
    }

    /// Replaces the personal section. The role cannot be changed here and
    /// the full name is recomputed from first and last name.
    pub async fn update_personal_info(&self, mut info: PersonalInfo) -> Result<Profile> {
        let mut errors = FormErrors::new();
        errors.required_email("email", &info.email);
        errors.optional_phone("phone", &info.phone);
        errors.finish()?;

        self.modify("personalInfo", move |profile| {
            info.role = std::mem::take(&mut profile.personal_info.role);
            info.refresh_full_name();
            profile.personal_info = info;
        })
        .await
    }

    pub async fn update_location(&self, location: Location) -> Result<Profile> {
        self.modify("location", move |profile| profile.location = location)
            .await
    }

    /// Replaces the academy section; contact email and phone must be valid
    /// when present.
    pub async fn update_academy_info(&self, academy: AcademyInfo) -> Result<Profile> {
        let mut errors = FormErrors::new();
        errors.require("name", &academy.name, "Academy name");
        errors.optional_email("contact.email", &academy.contact.email);
        errors.optional_phone("contact.phone", &academy.contact.phone);
        errors.finish()?;

        self.modify("academyInfo", move |profile| profile.academy_info = academy)
            .await
    }

    pub async fn update_preferences(&self, preferences: Preferences) -> Result<Profile> {
        self.modify("preferences", move |profile| {
            profile.preferences = preferences
        })
        .await
    }

    async fn modify<F>(&self, section: &str, f: F) -> Result<Profile>
    where
        F: FnOnce(&mut Profile),
    {
        let mut profile = self.get_profile().await?;
        f(&mut profile);
        self.profiles.save(&profile).await?;
        info!(section, "Profile updated");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use academy_core::profile::Contact;
    use academy_infrastructure::{JsonProfileRepository, LocalStorage};
    use tempfile::TempDir;

    async fn service_with_profile(temp_dir: &TempDir) -> ProfileService {
        let repo = JsonProfileRepository::new(LocalStorage::new(temp_dir.path()));
        let mut profile = Profile::default();
        profile.personal_info.email = "admin@club.tn".to_string();
        profile.personal_info.role = "admin".to_string();
        repo.save(&profile).await.unwrap();
        ProfileService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn test_update_personal_info_keeps_role() {
        let temp_dir = TempDir::new().unwrap();
        let service = service_with_profile(&temp_dir).await;

        let updated = service
            .update_personal_info(PersonalInfo {
                first_name: "Leila".to_string(),
                last_name: "Ben Ali".to_string(),
                email: "leila@club.tn".to_string(),
                phone: "98765432".to_string(),
                role: "player".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.personal_info.full_name, "Leila Ben Ali");
        assert_eq!(updated.personal_info.role, "admin");
        assert_eq!(service.get_profile().await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_invalid_phone_is_rejected_without_writing() {
        let temp_dir = TempDir::new().unwrap();
        let service = service_with_profile(&temp_dir).await;
        let before = service.get_profile().await.unwrap();

        let err = service
            .update_personal_info(PersonalInfo {
                email: "admin@club.tn".to_string(),
                phone: "12-34".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err.field_errors()[0].field, "phone");
        assert_eq!(service.get_profile().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_update_academy_info_validates_contact() {
        let temp_dir = TempDir::new().unwrap();
        let service = service_with_profile(&temp_dir).await;

        let mut academy = AcademyInfo {
            name: "Étoile du Sahel".to_string(),
            contact: Contact {
                email: "contact@".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = service.update_academy_info(academy.clone()).await.unwrap_err();
        assert_eq!(err.field_errors()[0].field, "contact.email");

        academy.contact.email = "contact@etoile.tn".to_string();
        let updated = service.update_academy_info(academy).await.unwrap();
        assert_eq!(updated.academy_info.name, "Étoile du Sahel");
    }

    #[tokio::test]
    async fn test_sections_are_independent() {
        let temp_dir = TempDir::new().unwrap();
        let service = service_with_profile(&temp_dir).await;

        service
            .update_location(Location {
                city: "Sousse".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        let updated = service
            .update_preferences(Preferences {
                timezone: "Africa/Tunis".to_string(),
                languages: vec!["ar".to_string(), "fr".to_string()],
            })
            .await
            .unwrap();

        assert_eq!(updated.location.city, "Sousse");
        assert_eq!(updated.preferences.languages, vec!["ar", "fr"]);
        assert_eq!(updated.personal_info.email, "admin@club.tn");
    }

    #[tokio::test]
    async fn test_update_without_profile_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonProfileRepository::new(LocalStorage::new(temp_dir.path()));
        let service = ProfileService::new(Arc::new(repo));

        let err = service
            .update_location(Location::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
