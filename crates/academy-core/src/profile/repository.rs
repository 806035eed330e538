//! Profile repository trait.
//!
//! Defines the interface for persisting the signed-in user's profile.

use tokio::sync::broadcast;

use super::model::Profile;
use crate::error::Result;
use crate::store::StorageEvent;

/// An abstract repository for the current user's profile.
///
/// The profile is a single document that is always overwritten wholesale;
/// there are no partial patches.
///
/// # Implementation Notes
///
/// Implementations should handle:
/// - Schema versioning and migrations
/// - Reporting corrupt documents as errors instead of returning defaults
#[async_trait::async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Loads the stored profile.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Profile))`: A profile is stored
    /// - `Ok(None)`: Nobody is signed in
    /// - `Err(AcademyError)`: The stored document could not be read or migrated
    async fn load(&self) -> Result<Option<Profile>>;

    /// Replaces the stored profile.
    async fn save(&self, profile: &Profile) -> Result<()>;

    /// Removes the stored profile (sign-out).
    async fn clear(&self) -> Result<()>;

    /// Subscribes to changes of the profile document.
    fn subscribe(&self) -> broadcast::Receiver<StorageEvent>;
}
