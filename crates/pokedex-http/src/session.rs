//! Session management for authenticated Pokédex operations.

use std::sync::{Arc, RwLock};

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use pokedex_core::claims;
use pokedex_core::error::{AuthError, Error};
use pokedex_core::tokens::{AccessToken, RefreshToken, TokenPair};
use pokedex_core::{
    ApiUrl, Credentials, NoticeLevel, Notifier, Registration, Result, TokenStore, User,
};

use crate::client::{HttpClient, RequestBody};
use crate::endpoints::{
    CHANGE_PASSWORD, ChangePasswordRequest, OBTAIN_TOKEN, ObtainTokenRequest, REFRESH_TOKEN,
    REGISTER, RefreshTokenRequest, RefreshTokenResponse, RegisterRequest, TokenPairResponse,
    USER_PROFILE,
};

/// A session against a Pokédex backend.
///
/// All authenticated operations flow through a `Session`. It owns the
/// current token pair and user profile, persists tokens through its
/// [`TokenStore`], and reports outcomes through its [`Notifier`].
///
/// # Thread Safety
///
/// Sessions are cheap to clone (they share internal state through an `Arc`)
/// and safe to use from multiple tasks. Token refresh is serialized
/// internally so concurrent requests trigger a single refresh.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use pokedex_core::{ApiUrl, Credentials, MemoryTokenStore, NullNotifier};
/// use pokedex_http::Session;
///
/// # async fn example() -> pokedex_core::Result<()> {
/// let api = ApiUrl::new("http://localhost:8000")?;
/// let session = Session::new(api, Arc::new(MemoryTokenStore::new()), Arc::new(NullNotifier));
///
/// let user = session
///     .login(&Credentials::new("ash@example.com", "pikapika"))
///     .await?;
/// println!("logged in as {}", user.full_name());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    client: HttpClient,
    store: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<SessionState>,
    // Serializes refreshes so concurrent 401s trigger one endpoint call.
    refresh_gate: Mutex<()>,
}

#[derive(Default)]
struct SessionState {
    user: Option<User>,
    tokens: Option<TokenPair>,
}

/// Whether a send is the first attempt or the post-refresh resend.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Initial,
    Retried,
}

impl Session {
    /// Create a session with no restored state.
    pub fn new(api: ApiUrl, store: Arc<dyn TokenStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                client: HttpClient::new(api),
                store,
                notifier,
                state: RwLock::new(SessionState::default()),
                refresh_gate: Mutex::new(()),
            }),
        }
    }

    /// Create a session and resolve any tokens held by the store.
    ///
    /// A stored pair with a usable access token is installed and the profile
    /// fetched; an expired access token with a live refresh token is renewed
    /// first; a fully expired pair logs the session out.
    pub async fn initialize(
        api: ApiUrl,
        store: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let session = Self::new(api, store, notifier);
        session.restore().await;
        session
    }

    #[instrument(skip(self), fields(api = %self.inner.client.api()))]
    async fn restore(&self) {
        let stored = match self.inner.store.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Failed to load stored tokens");
                None
            }
        };

        let Some(pair) = stored else {
            debug!("No stored tokens");
            return;
        };

        let access_expired = claims::is_expired(pair.access.as_str());

        if access_expired && claims::is_expired(pair.refresh.as_str()) {
            info!("Stored tokens expired, logging out");
            self.logout();
            return;
        }

        if access_expired {
            info!("Stored access token expired, refreshing");
            match self.request_refresh(&pair.refresh).await {
                Ok(response) => {
                    self.install_tokens(Self::renewed_pair(pair, response));
                    if let Err(e) = self.fetch_user_profile().await {
                        warn!(error = %e, "Profile fetch after refresh failed, logging out");
                        self.logout();
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Token refresh during restore failed, logging out");
                    self.logout();
                }
            }
            return;
        }

        // Access token still usable: install it before the profile fetch,
        // and keep it even if that fetch fails. A profile-endpoint glitch
        // is not evidence the credentials are bad.
        {
            let mut state = self.inner.state.write().unwrap();
            state.tokens = Some(pair);
        }
        if let Err(e) = self.fetch_user_profile().await {
            warn!(error = %e, "Profile fetch failed, keeping stored tokens");
        }
    }

    /// Log in with email and password.
    ///
    /// On success the token pair is installed, the profile fetched, and a
    /// success notice raised. On failure the error summary is surfaced
    /// through the notifier and the error propagates.
    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<User> {
        info!("Logging in");

        let request = ObtainTokenRequest {
            email: credentials.email(),
            password: credentials.password(),
        };

        let response: TokenPairResponse =
            match self.inner.client.post_json(OBTAIN_TOKEN, &request).await {
                Ok(response) => response,
                Err(e) => {
                    self.notify_error(&e);
                    return Err(e);
                }
            };

        self.install_tokens(TokenPair::new(
            AccessToken::new(response.access),
            RefreshToken::new(response.refresh),
        ));

        let user = match self.fetch_user_profile().await {
            Ok(user) => user,
            Err(e) => {
                // Tokens stay installed; only the profile fetch failed.
                self.notify_error(&e);
                return Err(e);
            }
        };

        self.inner
            .notifier
            .notify(NoticeLevel::Success, "Logged in successfully");
        Ok(user)
    }

    /// Create an account and log in with the returned token pair.
    #[instrument(skip(self, registration), fields(email = %registration.email()))]
    pub async fn register(&self, registration: &Registration) -> Result<User> {
        info!("Registering account");

        let request = RegisterRequest {
            first_name: registration.first_name(),
            last_name: registration.last_name(),
            email: registration.email(),
            password: registration.password(),
        };

        let response: TokenPairResponse =
            match self.inner.client.post_json(REGISTER, &request).await {
                Ok(response) => response,
                Err(e) => {
                    self.notify_error(&e);
                    return Err(e);
                }
            };

        self.install_tokens(TokenPair::new(
            AccessToken::new(response.access),
            RefreshToken::new(response.refresh),
        ));

        let user = match self.fetch_user_profile().await {
            Ok(user) => user,
            Err(e) => {
                self.notify_error(&e);
                return Err(e);
            }
        };

        self.inner
            .notifier
            .notify(NoticeLevel::Success, "Account created successfully");
        Ok(user)
    }

    /// Log out, clearing the user, the tokens, and the persisted pair.
    ///
    /// Never fails: store errors are logged and the in-memory state is
    /// cleared regardless.
    #[instrument(skip(self))]
    pub fn logout(&self) {
        info!("Logging out");

        {
            let mut state = self.inner.state.write().unwrap();
            state.user = None;
            state.tokens = None;
        }

        if let Err(e) = self.inner.store.clear() {
            warn!(error = %e, "Failed to clear token store");
        }

        self.inner.notifier.notify(NoticeLevel::Info, "Logged out");
    }

    /// Refresh the access token using the stored refresh token.
    ///
    /// Returns the new access token. An expired refresh token or a rejected
    /// refresh call logs the session out before the error is returned.
    #[instrument(skip(self))]
    pub async fn refresh_access_token(&self) -> Result<AccessToken> {
        let current = {
            let state = self.inner.state.read().unwrap();
            state.tokens.clone()
        };
        let Some(pair) = current else {
            return Err(AuthError::NoRefreshToken.into());
        };

        let _guard = self.inner.refresh_gate.lock().await;

        // Another caller may have refreshed while we waited on the gate.
        {
            let state = self.inner.state.read().unwrap();
            if let Some(tokens) = &state.tokens {
                if tokens.access != pair.access {
                    debug!("Token already refreshed by a concurrent caller");
                    return Ok(tokens.access.clone());
                }
            }
        }

        if claims::is_expired(pair.refresh.as_str()) {
            info!("Refresh token expired, logging out");
            self.logout();
            return Err(AuthError::RefreshTokenExpired.into());
        }

        match self.request_refresh(&pair.refresh).await {
            Ok(response) => {
                let renewed = Self::renewed_pair(pair, response);
                let access = renewed.access.clone();
                self.install_tokens(renewed);
                debug!("Access token refreshed");
                Ok(access)
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed, logging out");
                self.logout();
                Err(AuthError::RefreshFailed {
                    detail: e.to_string(),
                }
                .into())
            }
        }
    }

    /// Fetch the authenticated user's profile and store it on the session.
    #[instrument(skip(self))]
    pub async fn fetch_user_profile(&self) -> Result<User> {
        let token = self.access_token().ok_or(AuthError::NoAccessToken)?;

        let user: User = self
            .inner
            .client
            .get_json_authed(USER_PROFILE, &token)
            .await?;
        debug!(user = user.id, "Profile fetched");

        {
            let mut state = self.inner.state.write().unwrap();
            state.user = Some(user.clone());
        }
        Ok(user)
    }

    /// Change the authenticated user's password.
    #[instrument(skip_all)]
    pub async fn change_password(&self, new_password: &str, confirm_password: &str) -> Result<()> {
        let request = ChangePasswordRequest {
            new_password,
            confirm_password,
        };
        let body = RequestBody::Json(serde_json::to_value(&request)?);

        self.execute(Method::POST, CHANGE_PASSWORD, body).await?;

        self.inner
            .notifier
            .notify(NoticeLevel::Success, "Password changed successfully");
        Ok(())
    }

    /// Probe the backend health endpoint.
    pub async fn health_check(&self) -> Result<()> {
        self.inner.client.health().await
    }

    // ========================================================================
    // Authenticated Request Execution
    // ========================================================================

    /// Execute an authenticated request against an endpoint path.
    ///
    /// Attaches the bearer header, refreshes the access token up front when
    /// it is near expiry, and retries exactly once after a 401 by refreshing
    /// and resending. JSON responses come back parsed, with an empty body
    /// decoded as an empty object; anything else comes back as raw text.
    #[instrument(skip(self, body))]
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<serde_json::Value> {
        let mut token = self.access_token().ok_or(AuthError::NoAccessToken)?;

        if claims::needs_refresh(token.as_str()) {
            debug!("Access token near expiry, refreshing before request");
            token = self.refresh_access_token().await?;
        }

        let mut attempt = Attempt::Initial;
        loop {
            let response = self
                .inner
                .client
                .send_authed(method.clone(), path, &body, &token)
                .await?;

            let status = response.status();

            if status == StatusCode::UNAUTHORIZED && attempt == Attempt::Initial {
                warn!("Received 401, refreshing token and retrying");
                token = match self.refresh_access_token().await {
                    Ok(token) => token,
                    Err(e) => {
                        // refresh_access_token has already logged out.
                        debug!(error = %e, "Refresh during retry failed");
                        return Err(AuthError::AuthenticationFailed.into());
                    }
                };
                attempt = Attempt::Retried;
                continue;
            }

            if status.is_success() {
                return HttpClient::parse_success(response).await;
            }

            return Err(HttpClient::failure(response, attempt == Attempt::Retried).await);
        }
    }

    /// Execute an authenticated request and decode the JSON result.
    pub async fn execute_as<R>(&self, method: Method, path: &str, body: RequestBody) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let value = self.execute(method, path, body).await?;
        Ok(serde_json::from_value(value)?)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Returns the authenticated user, if the profile has been fetched.
    pub fn user(&self) -> Option<User> {
        self.inner.state.read().unwrap().user.clone()
    }

    /// True when a user profile is loaded.
    ///
    /// Tokens may be present without a profile (the fetch failed); those
    /// are visible through [`Self::access_token`].
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.read().unwrap().user.is_some()
    }

    /// The current access token, if any.
    pub fn access_token(&self) -> Option<AccessToken> {
        self.inner
            .state
            .read()
            .unwrap()
            .tokens
            .as_ref()
            .map(|pair| pair.access.clone())
    }

    /// The current refresh token, if any.
    pub fn refresh_token(&self) -> Option<RefreshToken> {
        self.inner
            .state
            .read()
            .unwrap()
            .tokens
            .as_ref()
            .map(|pair| pair.refresh.clone())
    }

    /// The API this session talks to.
    pub fn api(&self) -> &ApiUrl {
        self.inner.client.api()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Persist a token pair and make it the session's current credentials.
    ///
    /// Store failures are logged and do not fail the installation; the
    /// session keeps working from memory.
    fn install_tokens(&self, pair: TokenPair) {
        if let Err(e) = self.inner.store.save(&pair) {
            warn!(error = %e, "Failed to persist tokens");
        }
        let mut state = self.inner.state.write().unwrap();
        state.tokens = Some(pair);
    }

    async fn request_refresh(&self, refresh: &RefreshToken) -> Result<RefreshTokenResponse> {
        let request = RefreshTokenRequest {
            refresh: refresh.as_str(),
        };
        self.inner.client.post_json(REFRESH_TOKEN, &request).await
    }

    /// Build the pair after a refresh, adopting a rotated refresh token if
    /// the backend sent one.
    fn renewed_pair(current: TokenPair, response: RefreshTokenResponse) -> TokenPair {
        let access = AccessToken::new(response.access);
        match response.refresh {
            Some(rotated) => TokenPair::new(access, RefreshToken::new(rotated)),
            None => current.with_access(access),
        }
    }

    fn notify_error(&self, error: &Error) {
        self.inner
            .notifier
            .notify(NoticeLevel::Error, &failure_message(error));
    }
}

/// Human-readable message for a failed operation.
fn failure_message(error: &Error) -> String {
    match error {
        Error::Request(failure) => failure.summary(),
        other => other.to_string(),
    }
}

// Custom Debug impl that hides sensitive data
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("api", self.inner.client.api())
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}
