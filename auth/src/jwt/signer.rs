use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use super::claims::Claims;
use super::claims::Identity;
use super::errors::JwtError;
use super::handler::JwtHandler;

/// The two token classes. Each one is signed with its own secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Access,
    Refresh,
}

impl TokenClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenClass::Access => "access",
            TokenClass::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Secret and lifetime for one token class.
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub ttl: Duration,
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// A signed token together with the instant it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Access and refresh token minted for the same subject at the same instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

/// Signs and verifies both token classes.
///
/// Issuer, audience and algorithm are shared; secret and lifetime are per
/// class. The caller always names the class, it is never read back from the
/// token itself.
pub struct TokenSigner {
    issuer: String,
    audience: String,
    access: JwtHandler,
    access_ttl: Duration,
    refresh: JwtHandler,
    refresh_ttl: Duration,
}

impl TokenSigner {
    /// Build a signer for both classes.
    ///
    /// # Errors
    /// * `MissingSecret` - Either secret is empty
    /// * `SharedSecret` - Both classes were given the same secret
    pub fn new(
        issuer: &str,
        audience: &str,
        access: TokenSettings,
        refresh: TokenSettings,
    ) -> Result<Self, JwtError> {
        let signer = Self {
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            access: JwtHandler::new(
                TokenClass::Access.as_str(),
                access.secret.as_bytes(),
                issuer,
                audience,
            )?,
            access_ttl: access.ttl,
            refresh: JwtHandler::new(
                TokenClass::Refresh.as_str(),
                refresh.secret.as_bytes(),
                issuer,
                audience,
            )?,
            refresh_ttl: refresh.ttl,
        };

        // One class must never verify under the other's key
        if access.secret == refresh.secret {
            return Err(JwtError::SharedSecret);
        }

        Ok(signer)
    }

    fn handler(&self, class: TokenClass) -> &JwtHandler {
        match class {
            TokenClass::Access => &self.access,
            TokenClass::Refresh => &self.refresh,
        }
    }

    /// Lifetime configured for a class.
    pub fn ttl(&self, class: TokenClass) -> Duration {
        match class {
            TokenClass::Access => self.access_ttl,
            TokenClass::Refresh => self.refresh_ttl,
        }
    }

    /// Sign a token of `class` for `identity`, valid from `issued_at` for the
    /// class lifetime.
    ///
    /// # Errors
    /// * `ExpiryOutOfRange` - The class lifetime overflows from `issued_at`
    /// * `EncodingFailed` - Token encoding failed
    pub fn sign(
        &self,
        class: TokenClass,
        identity: &Identity,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, JwtError> {
        let claims = Claims::for_identity(
            identity,
            &self.issuer,
            &self.audience,
            issued_at,
            self.ttl(class),
        )?;
        let token = self.handler(class).encode(&claims)?;

        Ok(IssuedToken {
            token,
            expires_at: claims.expires_at(),
        })
    }

    /// Sign both classes for `identity` with a shared issued-at.
    pub fn sign_pair(
        &self,
        identity: &Identity,
        issued_at: DateTime<Utc>,
    ) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access: self.sign(TokenClass::Access, identity, issued_at)?,
            refresh: self.sign(TokenClass::Refresh, identity, issued_at)?,
        })
    }

    /// Verify a token against the secret of `class`.
    ///
    /// # Errors
    /// * `TokenExpired` - Past expiry
    /// * `InvalidToken` - Signed with another secret, or bad issuer,
    ///   audience, algorithm or format
    pub fn verify(&self, class: TokenClass, token: &str) -> Result<Claims, JwtError> {
        self.handler(class).decode(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new(
            "issuer",
            "audience",
            TokenSettings {
                secret: "access_secret_at_least_32_bytes_long!".to_string(),
                ttl: Duration::minutes(15),
            },
            TokenSettings {
                secret: "refresh_secret_at_least_32_bytes_long".to_string(),
                ttl: Duration::days(7),
            },
        )
        .expect("Failed to build signer")
    }

    fn identity() -> Identity {
        Identity {
            id: "42".to_string(),
            email: "a@x.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    #[test]
    fn test_sign_and_verify_each_class() {
        let signer = signer();

        for class in [TokenClass::Access, TokenClass::Refresh] {
            let issued = signer.sign(class, &identity(), Utc::now()).unwrap();
            let claims = signer.verify(class, &issued.token).unwrap();

            assert_eq!(claims.identity(), identity());
            assert_eq!(claims.iss, "issuer");
            assert_eq!(claims.aud, "audience");
            assert_eq!(claims.exp, issued.expires_at.timestamp());
        }
    }

    #[test]
    fn test_cross_class_rejected() {
        let signer = signer();
        let pair = signer.sign_pair(&identity(), Utc::now()).unwrap();

        assert!(matches!(
            signer.verify(TokenClass::Access, &pair.refresh.token),
            Err(JwtError::InvalidToken(_))
        ));
        assert!(matches!(
            signer.verify(TokenClass::Refresh, &pair.access.token),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_pair_shares_issued_at_and_subject() {
        let signer = signer();
        let pair = signer.sign_pair(&identity(), Utc::now()).unwrap();

        let access = signer.verify(TokenClass::Access, &pair.access.token).unwrap();
        let refresh = signer
            .verify(TokenClass::Refresh, &pair.refresh.token)
            .unwrap();

        assert_eq!(access.sub, refresh.sub);
        assert_eq!(access.iat, refresh.iat);
        assert_eq!(access.exp - access.iat, 15 * 60);
        assert_eq!(refresh.exp - refresh.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_expired_always_reported_as_expired() {
        let signer = signer();

        for hours_ago in [1, 2, 24, 24 * 365] {
            let issued_at = Utc::now() - Duration::hours(hours_ago);
            let issued = signer
                .sign(TokenClass::Access, &identity(), issued_at)
                .unwrap();

            assert_eq!(
                signer.verify(TokenClass::Access, &issued.token),
                Err(JwtError::TokenExpired)
            );
        }
    }

    #[test]
    fn test_missing_refresh_secret() {
        let result = TokenSigner::new(
            "issuer",
            "audience",
            TokenSettings {
                secret: "access_secret_at_least_32_bytes_long!".to_string(),
                ttl: Duration::minutes(15),
            },
            TokenSettings {
                secret: String::new(),
                ttl: Duration::days(7),
            },
        );

        assert!(matches!(result, Err(JwtError::MissingSecret(label)) if label == "refresh"));
    }

    #[test]
    fn test_shared_secret_rejected() {
        let secret = "same_secret_for_both_classes_32_bytes".to_string();

        let result = TokenSigner::new(
            "issuer",
            "audience",
            TokenSettings {
                secret: secret.clone(),
                ttl: Duration::minutes(15),
            },
            TokenSettings {
                secret,
                ttl: Duration::days(7),
            },
        );

        assert!(matches!(result, Err(JwtError::SharedSecret)));
    }

    #[test]
    fn test_sign_with_overflowing_ttl() {
        let signer = signer();
        let near_end = DateTime::<Utc>::MAX_UTC - Duration::days(1);

        assert_eq!(
            signer.sign(TokenClass::Refresh, &identity(), near_end),
            Err(JwtError::ExpiryOutOfRange)
        );
    }
}
