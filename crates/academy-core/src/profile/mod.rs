//! Profile domain module.
//!
//! # Module Structure
//!
//! - `model`: Canonical profile record and its nested sections
//! - `role`: Parsed role of the profile owner
//! - `transformer`: Normalization of signup/login payloads into a profile
//! - `repository`: Profile persistence trait
//!
//! # Usage
//!
//! ```
//! use academy_core::profile::{transform, ProfileInput, RawUserData};
//!
//! let raw = RawUserData {
//!     username: Some("bob".to_string()),
//!     club: Some("Espérance".to_string()),
//!     ..Default::default()
//! };
//! let profile = transform(ProfileInput::Raw(raw), &RawUserData::default());
//! assert_eq!(profile.personal_info.full_name, "bob");
//! assert_eq!(profile.academy_info.name, "Espérance");
//! assert_eq!(profile.personal_info.role, "admin");
//! ```

mod model;
pub mod repository;
mod role;
mod transformer;

pub use model::{
    AcademyInfo, Contact, Facilities, Location, PersonalInfo, Preferences, Profile, Staff, Tenues,
};
pub use repository::ProfileRepository;
pub use role::Role;
pub use transformer::{DEFAULT_ROLE, ProfileInput, RawUserData, strip_nulls, transform};
