use super::claims::{AccessClaims, Claims, ExpiringClaims, RefreshClaims, TokenKind};
use crate::error::{AuthError, AuthResult};
use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use taskdeck_commons::{Clock, UserId};
use taskdeck_configs::AuthSettings;

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeys {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Issues, verifies and rotates access/refresh tokens.
///
/// Stateless apart from its keys, so a single instance is shared across all
/// workers behind an `Arc`.
pub struct TokenService {
    clock: Arc<dyn Clock>,
    access: SigningKeys,
    refresh: SigningKeys,
    access_ttl: Duration,
    refresh_ttl: Duration,
    validation: Validation,
}

impl TokenService {
    pub fn new(
        clock: Arc<dyn Clock>,
        access_secret: &str,
        refresh_secret: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock in `decode_claims`.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.required_spec_claims = ["exp".to_string()].into_iter().collect();

        Self {
            clock,
            access: SigningKeys::from_secret(access_secret),
            refresh: SigningKeys::from_secret(refresh_secret),
            access_ttl,
            refresh_ttl,
            validation,
        }
    }

    /// Build from server settings (15 minute / 7 day lifetimes by default).
    pub fn from_settings(settings: &AuthSettings, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            clock,
            &settings.access_token_secret,
            &settings.refresh_token_secret,
            Duration::minutes(settings.access_token_ttl_minutes),
            Duration::days(settings.refresh_token_ttl_days),
        )
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Issue an access token for `owner_id`.
    ///
    /// Deterministic for a fixed clock and secret.
    pub fn issue_access_token(&self, owner_id: &UserId, email: &str) -> AuthResult<String> {
        let (iat, exp) = self.lifetime(self.access_ttl);
        let claims = AccessClaims {
            owner_id: owner_id.clone(),
            email: email.to_string(),
            iat,
            exp,
        };
        sign(&claims, &self.access.encoding)
    }

    /// Issue a refresh token for `owner_id`, signed with the refresh secret.
    pub fn issue_refresh_token(&self, owner_id: &UserId) -> AuthResult<String> {
        let (iat, exp) = self.lifetime(self.refresh_ttl);
        let claims = RefreshClaims {
            owner_id: owner_id.clone(),
            iat,
            exp,
        };
        sign(&claims, &self.refresh.encoding)
    }

    /// Verify a token of the given kind.
    ///
    /// Fails on signature mismatch, malformed payload, or `now >= exp`.
    pub fn verify(&self, token: &str, kind: TokenKind) -> AuthResult<Claims> {
        match kind {
            TokenKind::Access => self.verify_access(token).map(Claims::Access),
            TokenKind::Refresh => self.verify_refresh(token).map(Claims::Refresh),
        }
    }

    pub fn verify_access(&self, token: &str) -> AuthResult<AccessClaims> {
        self.decode_claims(token, &self.access.decoding)
    }

    pub fn verify_refresh(&self, token: &str) -> AuthResult<RefreshClaims> {
        self.decode_claims(token, &self.refresh.decoding)
    }

    /// Verify a refresh token and mint a new access token for its owner.
    ///
    /// Refresh claims carry no email, so the caller supplies the one to
    /// embed. Whether the owner still exists is not checked here.
    pub fn rotate_access(&self, refresh_token: &str, email: &str) -> AuthResult<String> {
        let refresh = self.verify_refresh(refresh_token)?;
        self.issue_access_token(&refresh.owner_id, email)
    }

    fn lifetime(&self, ttl: Duration) -> (u64, u64) {
        let now = self.clock.now().timestamp();
        let iat = u64::try_from(now).unwrap_or(0);
        let exp = u64::try_from(now + ttl.num_seconds()).unwrap_or(0);
        (iat, exp)
    }

    fn decode_claims<T>(&self, token: &str, key: &DecodingKey) -> AuthResult<T>
    where
        T: DeserializeOwned + ExpiringClaims,
    {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let token_data = decode::<T>(token, key, &self.validation).map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::MalformedToken(e.to_string()),
        })?;

        let claims = token_data.claims;
        if claims.owner().as_str().is_empty() {
            return Err(AuthError::MissingClaim("ownerId".to_string()));
        }

        let now = self.clock.now().timestamp();
        if now >= claims.exp() as i64 {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}

fn sign<T: Serialize>(claims: &T, key: &EncodingKey) -> AuthResult<String> {
    encode(&Header::new(Algorithm::HS256), claims, key)
        .map_err(|e| AuthError::TokenEncoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use taskdeck_commons::ManualClock;

    fn service_at(clock: Arc<ManualClock>) -> TokenService {
        TokenService::new(
            clock,
            "access-secret",
            "refresh-secret",
            Duration::minutes(15),
            Duration::days(7),
        )
    }

    fn fixed_clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 6, 12, 0, 0).unwrap()))
    }

    #[test]
    fn test_access_token_round_trip() {
        let clock = fixed_clock();
        let tokens = service_at(clock.clone());
        let owner = UserId::new("u_1");

        let token = tokens.issue_access_token(&owner, "ada@example.com").unwrap();
        let claims = tokens.verify_access(&token).unwrap();

        assert_eq!(claims.owner_id, owner);
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_issue_is_deterministic() {
        let clock = fixed_clock();
        let tokens = service_at(clock);
        let owner = UserId::new("u_1");

        let a = tokens.issue_access_token(&owner, "ada@example.com").unwrap();
        let b = tokens.issue_access_token(&owner, "ada@example.com").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_refresh_lifetime_is_seven_days() {
        let tokens = service_at(fixed_clock());
        let token = tokens.issue_refresh_token(&UserId::new("u_1")).unwrap();
        let claims = tokens.verify_refresh(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_kinds_are_not_interchangeable() {
        let tokens = service_at(fixed_clock());
        let owner = UserId::new("u_1");

        let access = tokens.issue_access_token(&owner, "ada@example.com").unwrap();
        let refresh = tokens.issue_refresh_token(&owner).unwrap();

        assert_eq!(tokens.verify(&access, TokenKind::Refresh), Err(AuthError::InvalidSignature));
        assert_eq!(tokens.verify(&refresh, TokenKind::Access), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn test_expiry_boundary() {
        let clock = fixed_clock();
        let tokens = service_at(clock.clone());
        let token = tokens.issue_access_token(&UserId::new("u_1"), "a@b.io").unwrap();

        clock.advance(Duration::minutes(15) - Duration::seconds(1));
        assert!(tokens.verify_access(&token).is_ok());

        clock.advance(Duration::seconds(1));
        assert_eq!(tokens.verify_access(&token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn test_rotate_access_binds_refresh_owner() {
        let clock = fixed_clock();
        let tokens = service_at(clock.clone());
        let owner = UserId::new("u_9");
        let refresh = tokens.issue_refresh_token(&owner).unwrap();

        clock.advance(Duration::days(2));
        let access = tokens.rotate_access(&refresh, "nine@example.com").unwrap();
        let claims = tokens.verify_access(&access).unwrap();

        assert_eq!(claims.owner_id, owner);
        assert_eq!(claims.iat as i64, clock.now().timestamp());
    }

    #[test]
    fn test_rotate_rejects_expired_refresh() {
        let clock = fixed_clock();
        let tokens = service_at(clock.clone());
        let refresh = tokens.issue_refresh_token(&UserId::new("u_1")).unwrap();

        clock.advance(Duration::days(7));
        assert_eq!(tokens.rotate_access(&refresh, "a@b.io"), Err(AuthError::TokenExpired));
    }

    #[test]
    fn test_garbage_is_malformed_not_panic() {
        let tokens = service_at(fixed_clock());
        assert_eq!(tokens.verify_access(""), Err(AuthError::MissingToken));
        assert!(matches!(tokens.verify_access("not-a-jwt"), Err(AuthError::MalformedToken(_))));
        assert!(matches!(
            tokens.verify_access("eyJhbGciOiJIUzI1NiJ9.e30"),
            Err(AuthError::MalformedToken(_))
        ));
    }
}
