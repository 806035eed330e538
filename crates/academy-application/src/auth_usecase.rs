//! Authentication use case.
//!
//! Turns login and signup replies into a stored profile and session token.

use std::sync::Arc;

use tracing::{debug, info, warn};

use academy_core::auth::{AuthApi, AuthSession, LoginForm, SignupForm, TokenStore};
use academy_core::error::Result;
use academy_core::profile::{
    AcademyInfo, Profile, ProfileInput, ProfileRepository, RawUserData, transform,
};

/// Use case behind the login, signup and sign-out screens.
///
/// Every successful call leaves the stored profile and token in sync with
/// the returned [`AuthSession`].
pub struct AuthUseCase {
    api: Arc<dyn AuthApi>,
    profiles: Arc<dyn ProfileRepository>,
    tokens: Arc<dyn TokenStore>,
}

impl AuthUseCase {
    pub fn new(
        api: Arc<dyn AuthApi>,
        profiles: Arc<dyn ProfileRepository>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            api,
            profiles,
            tokens,
        }
    }

    /// Signs in and stores the normalized profile.
    ///
    /// Sections the backend does not send (academy, location, preferences)
    /// are kept from the profile previously stored for the same email.
    pub async fn login(&self, form: &LoginForm) -> Result<AuthSession> {
        form.validate()?;
        let request = form.to_request();
        let response = self.api.login(&request).await?;

        let secondary = RawUserData {
            email: Some(request.email.clone()),
            ..Default::default()
        };
        let input = match response.user {
            Some(user) => ProfileInput::from_json(user)?,
            None => ProfileInput::Raw(secondary.clone()),
        };
        let mut profile = transform(input, &secondary);

        if let Some(previous) = self.previous_profile().await {
            carry_over(&mut profile, previous);
        }

        self.tokens.save_token(&response.token).await?;
        self.profiles.save(&profile).await?;
        info!(email = %profile.personal_info.email, role = %profile.role(), "Signed in");

        Ok(AuthSession {
            token: Some(response.token),
            profile,
        })
    }

    /// Registers a new account and stores its profile.
    ///
    /// When the backend does not echo the user, the profile is built from
    /// the form values alone.
    pub async fn signup(&self, form: &SignupForm) -> Result<AuthSession> {
        form.validate()?;
        let response = self.api.signup(&form.to_request()).await?;

        let signup_data = form.to_user_data();
        let input = match response.user {
            Some(user) => ProfileInput::from_json(user)?,
            None => ProfileInput::Raw(RawUserData::default()),
        };
        let profile = transform(input, &signup_data);

        match response.token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => self.tokens.save_token(token).await?,
            None => debug!("Signup reply carried no token"),
        }
        self.profiles.save(&profile).await?;
        info!(email = %profile.personal_info.email, role = %profile.role(), "Signed up");

        Ok(AuthSession {
            token: response.token.filter(|t| !t.is_empty()),
            profile,
        })
    }

    /// Clears the stored token and profile.
    pub async fn logout(&self) -> Result<()> {
        self.tokens.clear_token().await?;
        self.profiles.clear().await?;
        info!("Signed out");
        Ok(())
    }

    /// The stored session, if a profile is stored.
    pub async fn current_session(&self) -> Result<Option<AuthSession>> {
        let Some(profile) = self.profiles.load().await? else {
            return Ok(None);
        };
        let token = self.tokens.load_token().await?;
        Ok(Some(AuthSession { token, profile }))
    }

    /// A stored profile that cannot be read must not block signing in.
    async fn previous_profile(&self) -> Option<Profile> {
        match self.profiles.load().await {
            Ok(previous) => previous,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable stored profile");
                None
            }
        }
    }
}

/// Fills empty sections of `profile` from `previous` when both belong to the
/// same email.
fn carry_over(profile: &mut Profile, previous: Profile) {
    let email = profile.personal_info.email.trim();
    let previous_email = previous.personal_info.email.trim();
    if !email.is_empty() && !email.eq_ignore_ascii_case(previous_email) {
        return;
    }

    // A raw login payload yields at most the academy name
    let name_only = AcademyInfo {
        name: profile.academy_info.name.clone(),
        ..Default::default()
    };
    if profile.academy_info == name_only
        && (name_only.name.is_empty() || name_only.name == previous.academy_info.name)
    {
        profile.academy_info = previous.academy_info;
    }
    if profile.location.is_empty() {
        profile.location = previous.location;
    }
    if profile.preferences.is_empty() {
        profile.preferences = previous.preferences;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use academy_core::auth::{LoginRequest, LoginResponse, SignupRequest, SignupResponse};
    use academy_core::error::AcademyError;
    use academy_core::profile::{Location, Preferences};
    use academy_core::store::StorageEvent;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use tokio::sync::broadcast;

    struct StubApi {
        login_user: Option<Value>,
        signup_reply: SignupResponse,
    }

    #[async_trait]
    impl AuthApi for StubApi {
        async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
            if request.password == "wrong" {
                return Err(AcademyError::api(Some(401), "Invalid credentials"));
            }
            Ok(LoginResponse {
                token: "tok-login".to_string(),
                user: self.login_user.clone(),
            })
        }

        async fn signup(&self, _request: &SignupRequest) -> Result<SignupResponse> {
            Ok(self.signup_reply.clone())
        }
    }

    #[derive(Default)]
    struct MemoryProfiles {
        profile: Mutex<Option<Profile>>,
    }

    #[async_trait]
    impl ProfileRepository for MemoryProfiles {
        async fn load(&self) -> Result<Option<Profile>> {
            Ok(self.profile.lock().unwrap().clone())
        }

        async fn save(&self, profile: &Profile) -> Result<()> {
            *self.profile.lock().unwrap() = Some(profile.clone());
            Ok(())
        }

        async fn clear(&self) -> Result<()> {
            *self.profile.lock().unwrap() = None;
            Ok(())
        }

        fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
            broadcast::channel(1).1
        }
    }

    #[derive(Default)]
    struct MemoryTokens {
        token: Mutex<Option<String>>,
    }

    #[async_trait]
    impl TokenStore for MemoryTokens {
        async fn load_token(&self) -> Result<Option<String>> {
            Ok(self.token.lock().unwrap().clone())
        }

        async fn save_token(&self, token: &str) -> Result<()> {
            *self.token.lock().unwrap() = Some(token.to_string());
            Ok(())
        }

        async fn clear_token(&self) -> Result<()> {
            *self.token.lock().unwrap() = None;
            Ok(())
        }
    }

    fn setup(api: StubApi) -> (AuthUseCase, Arc<MemoryProfiles>, Arc<MemoryTokens>) {
        let profiles = Arc::new(MemoryProfiles::default());
        let tokens = Arc::new(MemoryTokens::default());
        let usecase = AuthUseCase::new(Arc::new(api), profiles.clone(), tokens.clone());
        (usecase, profiles, tokens)
    }

    fn login_form(password: &str) -> LoginForm {
        LoginForm {
            email: "coach@club.tn".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_normalizes_raw_user() {
        let (usecase, profiles, tokens) = setup(StubApi {
            login_user: Some(json!({
                "first_name": "Sami",
                "last_name": "Trabelsi",
                "email": "coach@club.tn",
                "role": "coach",
                "club": "Club Africain",
                "phone": null
            })),
            signup_reply: SignupResponse::default(),
        });

        let session = usecase.login(&login_form("secret")).await.unwrap();

        assert!(session.is_authenticated());
        assert_eq!(session.profile.personal_info.full_name, "Sami Trabelsi");
        assert_eq!(session.profile.personal_info.role, "coach");
        assert_eq!(session.profile.academy_info.name, "Club Africain");
        assert_eq!(session.profile.personal_info.phone, "");
        assert_eq!(profiles.load().await.unwrap(), Some(session.profile));
        assert_eq!(tokens.load_token().await.unwrap().as_deref(), Some("tok-login"));
    }

    #[tokio::test]
    async fn test_login_accepts_numeric_user_fields() {
        let (usecase, profiles, _) = setup(StubApi {
            login_user: Some(json!({
                "first_name": "Sami",
                "last_name": "Trabelsi",
                "email": "coach@club.tn",
                "phone": 22123456,
                "role": 2,
                "academyInfo": {"name": "Club Africain", "facilities": {"gym": "yes"}}
            })),
            signup_reply: SignupResponse::default(),
        });

        let session = usecase.login(&login_form("secret")).await.unwrap();

        assert_eq!(session.profile.personal_info.phone, "22123456");
        assert_eq!(session.profile.personal_info.role, "2");
        assert_eq!(session.profile.academy_info.name, "Club Africain");
        assert!(!session.profile.academy_info.facilities.gym);
        assert_eq!(profiles.load().await.unwrap(), Some(session.profile));
    }

    #[tokio::test]
    async fn test_login_keeps_stored_sections() {
        let (usecase, profiles, _) = setup(StubApi {
            login_user: Some(json!({"email": "coach@club.tn", "club": "Club Africain"})),
            signup_reply: SignupResponse::default(),
        });

        let mut stored = Profile::default();
        stored.personal_info.email = "coach@club.tn".to_string();
        stored.academy_info = AcademyInfo {
            name: "Club Africain".to_string(),
            founded: "1920".to_string(),
            ..Default::default()
        };
        stored.location = Location {
            city: "Tunis".to_string(),
            ..Default::default()
        };
        stored.preferences = Preferences {
            timezone: "Africa/Tunis".to_string(),
            languages: vec!["fr".to_string()],
        };
        profiles.save(&stored).await.unwrap();

        let session = usecase.login(&login_form("secret")).await.unwrap();
        assert_eq!(session.profile.academy_info.founded, "1920");
        assert_eq!(session.profile.location.city, "Tunis");
        assert_eq!(session.profile.preferences.timezone, "Africa/Tunis");
    }

    #[tokio::test]
    async fn test_login_ignores_other_users_sections() {
        let (usecase, profiles, _) = setup(StubApi {
            login_user: Some(json!({"email": "coach@club.tn"})),
            signup_reply: SignupResponse::default(),
        });

        let mut stored = Profile::default();
        stored.personal_info.email = "someone@else.tn".to_string();
        stored.location.city = "Sfax".to_string();
        profiles.save(&stored).await.unwrap();

        let session = usecase.login(&login_form("secret")).await.unwrap();
        assert!(session.profile.location.is_empty());
    }

    #[tokio::test]
    async fn test_login_rejects_invalid_form_before_calling_backend() {
        let (usecase, _, tokens) = setup(StubApi {
            login_user: None,
            signup_reply: SignupResponse::default(),
        });

        let form = LoginForm {
            email: "not-an-email".to_string(),
            password: String::new(),
        };
        let err = usecase.login(&form).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.field_errors().len(), 2);
        assert!(tokens.load_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_failure_stores_nothing() {
        let (usecase, profiles, tokens) = setup(StubApi {
            login_user: None,
            signup_reply: SignupResponse::default(),
        });

        let err = usecase.login(&login_form("wrong")).await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid credentials");
        assert!(profiles.load().await.unwrap().is_none());
        assert!(tokens.load_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_signup_without_echo_uses_form() {
        let (usecase, _, tokens) = setup(StubApi {
            login_user: None,
            signup_reply: SignupResponse {
                token: None,
                user: None,
            },
        });

        let form = SignupForm {
            username: "bob".to_string(),
            email: "bob@club.tn".to_string(),
            password: "pw".to_string(),
            confirm_password: "pw".to_string(),
            club: "Espérance".to_string(),
            ..Default::default()
        };
        let session = usecase.signup(&form).await.unwrap();

        assert!(!session.is_authenticated());
        assert!(tokens.load_token().await.unwrap().is_none());
        assert_eq!(session.profile.personal_info.full_name, "bob");
        assert_eq!(session.profile.personal_info.email, "bob@club.tn");
        assert_eq!(session.profile.personal_info.role, "admin");
        assert_eq!(session.profile.academy_info.name, "Espérance");
    }

    #[tokio::test]
    async fn test_signup_password_mismatch() {
        let (usecase, _, _) = setup(StubApi {
            login_user: None,
            signup_reply: SignupResponse::default(),
        });

        let form = SignupForm {
            username: "bob".to_string(),
            email: "bob@club.tn".to_string(),
            password: "pw".to_string(),
            confirm_password: "other".to_string(),
            ..Default::default()
        };
        let err = usecase.signup(&form).await.unwrap_err();
        assert!(
            err.field_errors()
                .iter()
                .any(|e| e.field == "confirmPassword")
        );
    }

    #[tokio::test]
    async fn test_logout_and_current_session() {
        let (usecase, _, _) = setup(StubApi {
            login_user: Some(json!({"email": "coach@club.tn"})),
            signup_reply: SignupResponse::default(),
        });

        assert!(usecase.current_session().await.unwrap().is_none());
        usecase.login(&login_form("secret")).await.unwrap();

        let session = usecase.current_session().await.unwrap().unwrap();
        assert_eq!(session.token.as_deref(), Some("tok-login"));

        usecase.logout().await.unwrap();
        assert!(usecase.current_session().await.unwrap().is_none());
    }
}
