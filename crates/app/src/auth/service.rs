//! Auth service.

use async_trait::async_trait;
use jiff::SignedDuration;
use mockall::automock;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::auth::{
    Actor, AuthServiceError, Claims, LoginOutcome, LogoutOutcome, NewUser, Password,
    PresentedCredentials, Principal, ProfileUpdate, Session, SessionBootstrap, TokenIssuer,
    TokenKind, TokenPair, User, UserId,
    password::{hash_password, password_is_acceptable, verify_password},
    repository::{NewUserRecord, PgAuthRepository},
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
    tokens: TokenIssuer,
    session_ttl: SignedDuration,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool, tokens: TokenIssuer, session_ttl: SignedDuration) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
            tokens,
            session_ttl,
        }
    }

    /// Create a staff account.
    ///
    /// # Errors
    ///
    /// Returns an error if validation, hashing or the insert fails.
    pub async fn create_staff_user(&self, user: NewUser) -> Result<User, AuthServiceError> {
        self.create_user(user, true).await
    }

    /// Delete expired sessions and refresh-token blacklist entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn purge_expired(&self) -> Result<(u64, u64), AuthServiceError> {
        Ok(self.repository.purge_expired().await?)
    }

    async fn create_user(&self, user: NewUser, is_staff: bool) -> Result<User, AuthServiceError> {
        validate_new_user(&user)?;

        let password_hash = hash_password(&user.password)?;

        let created = self
            .repository
            .create_user(NewUserRecord {
                mobile_number: user.mobile_number.clone(),
                alternate_mobile_number: user.alternate_mobile_number.clone(),
                password_hash,
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                email: user.email.clone(),
                is_staff,
            })
            .await?;

        info!(user_id = %created.id, is_staff, "user created");

        Ok(created)
    }

    async fn active_principal(&self, user: UserId) -> Result<Principal, AuthServiceError> {
        match self.repository.get_user(user).await? {
            Some(user) if user.is_active => Ok(Principal {
                user_id: user.id,
                is_staff: user.is_staff,
            }),
            Some(_) | None => Err(AuthServiceError::AuthenticationRequired),
        }
    }

    async fn principal_from_access(&self, token: &str) -> Result<Principal, AuthServiceError> {
        let claims = self
            .tokens
            .decode(token, TokenKind::Access)
            .map_err(|error| {
                debug!("access token rejected: {error}");

                AuthServiceError::AuthenticationRequired
            })?;

        let user = claims
            .user_id()
            .map_err(|_| AuthServiceError::AuthenticationRequired)?;

        self.active_principal(user).await
    }

    async fn principal_from_refresh(
        &self,
        token: &str,
    ) -> Result<(Principal, Claims), AuthServiceError> {
        let claims = self
            .tokens
            .decode(token, TokenKind::Refresh)
            .map_err(|error| {
                debug!("refresh token rejected: {error}");

                AuthServiceError::AuthenticationRequired
            })?;

        if self.repository.is_refresh_token_blacklisted(claims.jti).await? {
            debug!(jti = %claims.jti, "refresh token is blacklisted");

            return Err(AuthServiceError::AuthenticationRequired);
        }

        let user = claims
            .user_id()
            .map_err(|_| AuthServiceError::AuthenticationRequired)?;

        let principal = self.active_principal(user).await?;

        Ok((principal, claims))
    }

    async fn live_session(
        &self,
        credentials: &PresentedCredentials,
    ) -> Result<Option<Session>, AuthServiceError> {
        let Some(session) = credentials.session_id() else {
            return Ok(None);
        };

        Ok(self.repository.find_live_session(session).await?)
    }

    async fn create_session(&self) -> Result<Session, AuthServiceError> {
        let session = self.repository.create_session(self.session_ttl).await?;

        info!(session_id = %session.id, "anonymous session created");

        Ok(session)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_dual(
        &self,
        credentials: &PresentedCredentials,
    ) -> Result<Actor, AuthServiceError> {
        for token in credentials.access_token_candidates() {
            match self.principal_from_access(token).await {
                Ok(principal) => return Ok(Actor::AuthenticatedUser(principal)),
                Err(AuthServiceError::AuthenticationRequired) => {}
                Err(error) => return Err(error),
            }
        }

        match self.live_session(credentials).await? {
            Some(session) => Ok(Actor::AnonymousSession(session.id)),
            None => Err(AuthServiceError::AuthenticationRequired),
        }
    }

    async fn authenticate_token(
        &self,
        credentials: &PresentedCredentials,
    ) -> Result<Principal, AuthServiceError> {
        for token in credentials.access_token_candidates() {
            match self.principal_from_access(token).await {
                Ok(principal) => return Ok(principal),
                Err(AuthServiceError::AuthenticationRequired) => {}
                Err(error) => return Err(error),
            }
        }

        Err(AuthServiceError::AuthenticationRequired)
    }

    async fn authenticate_refresh(&self, refresh_token: &str) -> Result<Principal, AuthServiceError> {
        self.principal_from_refresh(refresh_token)
            .await
            .map(|(principal, _)| principal)
    }

    async fn bootstrap_session(
        &self,
        credentials: &PresentedCredentials,
    ) -> Result<SessionBootstrap, AuthServiceError> {
        if let Some(token) = credentials.refresh_token() {
            match self.principal_from_refresh(token).await {
                Ok((principal, _)) => {
                    let (access_token, _) =
                        self.tokens.issue(principal.user_id, TokenKind::Access)?;

                    return Ok(SessionBootstrap::AccessRefreshed { access_token });
                }
                Err(AuthServiceError::AuthenticationRequired) => {
                    debug!("refresh token unusable during session bootstrap, using session");
                }
                Err(error) => return Err(error),
            }
        }

        if let Some(session) = self.live_session(credentials).await? {
            return Ok(SessionBootstrap::SessionCreated {
                session,
                reused: true,
            });
        }

        Ok(SessionBootstrap::SessionCreated {
            session: self.create_session().await?,
            reused: false,
        })
    }

    async fn register(&self, user: NewUser) -> Result<LoginOutcome, AuthServiceError> {
        let user = self.create_user(user, false).await?;
        let tokens = self.tokens.issue_pair(user.id)?;

        Ok(LoginOutcome { user, tokens })
    }

    async fn login(
        &self,
        mobile_number: &str,
        password: &Password,
    ) -> Result<LoginOutcome, AuthServiceError> {
        let Some(stored) = self
            .repository
            .find_credentials_by_mobile_number(mobile_number)
            .await?
        else {
            return Err(AuthServiceError::InvalidCredentials);
        };

        if !stored.user.is_active || !verify_password(password, &stored.password_hash) {
            return Err(AuthServiceError::InvalidCredentials);
        }

        let tokens = self.tokens.issue_pair(stored.user.id)?;

        info!(user_id = %stored.user.id, "user logged in");

        Ok(LoginOutcome {
            user: stored.user,
            tokens,
        })
    }

    async fn logout(
        &self,
        credentials: &PresentedCredentials,
    ) -> Result<LogoutOutcome, AuthServiceError> {
        let mut refresh_revoked = false;

        if let Some(token) = credentials.refresh_token() {
            match self.tokens.decode(token, TokenKind::Refresh) {
                Ok(claims) => {
                    if let Ok(user) = claims.user_id() {
                        refresh_revoked = self
                            .repository
                            .blacklist_refresh_token(claims.jti, user, claims.exp)
                            .await?;
                    }
                }
                Err(error) => debug!("nothing to revoke at logout: {error}"),
            }
        }

        if let Some(session) = credentials.session_id() {
            self.repository.delete_session(session).await?;
        }

        let session = self.create_session().await?;

        Ok(LogoutOutcome {
            session,
            refresh_revoked,
        })
    }

    async fn rotate_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenPair, AuthServiceError> {
        let (principal, claims) = self.principal_from_refresh(refresh_token).await?;

        let revoked = self
            .repository
            .blacklist_refresh_token(claims.jti, principal.user_id, claims.exp)
            .await?;

        // Lost a race with a concurrent rotation of the same token.
        if !revoked {
            return Err(AuthServiceError::AuthenticationRequired);
        }

        Ok(self.tokens.issue_pair(principal.user_id)?)
    }

    async fn get_user(&self, user: UserId) -> Result<User, AuthServiceError> {
        self.repository
            .get_user(user)
            .await?
            .ok_or(AuthServiceError::NotFound)
    }

    async fn update_profile(
        &self,
        user: UserId,
        update: ProfileUpdate,
    ) -> Result<User, AuthServiceError> {
        if let Some(alternate) = update.alternate_mobile_number.as_deref()
            && !is_valid_mobile_number(alternate)
        {
            return Err(AuthServiceError::InvalidData(INVALID_MOBILE_NUMBER));
        }

        Ok(self.repository.update_user_profile(user, update).await?)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a caller that may be either a token holder or an anonymous session.
    async fn authenticate_dual(
        &self,
        credentials: &PresentedCredentials,
    ) -> Result<Actor, AuthServiceError>;

    /// Resolve a caller that must hold a valid access token. Sessions are ignored.
    async fn authenticate_token(
        &self,
        credentials: &PresentedCredentials,
    ) -> Result<Principal, AuthServiceError>;

    /// Resolve the holder of a valid, non-blacklisted refresh token.
    async fn authenticate_refresh(&self, refresh_token: &str) -> Result<Principal, AuthServiceError>;

    /// Issue a new access token for a refresh-token holder, or reuse/create an anonymous session.
    async fn bootstrap_session(
        &self,
        credentials: &PresentedCredentials,
    ) -> Result<SessionBootstrap, AuthServiceError>;

    /// Create a customer account and issue its first token pair.
    async fn register(&self, user: NewUser) -> Result<LoginOutcome, AuthServiceError>;

    /// Verify a mobile number and password and issue a token pair.
    async fn login(
        &self,
        mobile_number: &str,
        password: &Password,
    ) -> Result<LoginOutcome, AuthServiceError>;

    /// Revoke whatever refresh token was presented and start a fresh anonymous session.
    async fn logout(
        &self,
        credentials: &PresentedCredentials,
    ) -> Result<LogoutOutcome, AuthServiceError>;

    /// Blacklist a refresh token and issue a replacement pair.
    async fn rotate_refresh_token(&self, refresh_token: &str)
    -> Result<TokenPair, AuthServiceError>;

    /// Fetch a user profile.
    async fn get_user(&self, user: UserId) -> Result<User, AuthServiceError>;

    /// Update the mutable profile fields of a user.
    async fn update_profile(
        &self,
        user: UserId,
        update: ProfileUpdate,
    ) -> Result<User, AuthServiceError>;
}

impl Principal {
    /// Gate a staff-only operation.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::Forbidden`] for non-staff principals.
    pub fn require_staff(self) -> Result<Self, AuthServiceError> {
        if self.is_staff {
            Ok(self)
        } else {
            Err(AuthServiceError::Forbidden)
        }
    }
}

const INVALID_MOBILE_NUMBER: &str = "Enter a valid 10-digit mobile number starting with 6-9";

/// Indian mobile numbers: ten digits, the first being 6-9.
#[must_use]
pub fn is_valid_mobile_number(value: &str) -> bool {
    value.len() == 10
        && value.chars().all(|c| c.is_ascii_digit())
        && value.starts_with(['6', '7', '8', '9'])
}

fn validate_new_user(user: &NewUser) -> Result<(), AuthServiceError> {
    if !is_valid_mobile_number(&user.mobile_number) {
        return Err(AuthServiceError::InvalidData(INVALID_MOBILE_NUMBER));
    }

    if let Some(alternate) = user.alternate_mobile_number.as_deref()
        && !is_valid_mobile_number(alternate)
    {
        return Err(AuthServiceError::InvalidData(INVALID_MOBILE_NUMBER));
    }

    if user.password != user.password_confirm {
        return Err(AuthServiceError::InvalidData("Passwords don't match"));
    }

    if !password_is_acceptable(&user.password) {
        return Err(AuthServiceError::InvalidData(
            "Password must be at least 8 characters and not entirely numeric",
        ));
    }

    Ok(())
}
