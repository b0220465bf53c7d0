use anyhow::{bail, Result};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: i64,
}

/// Extracts the `exp` claim (seconds since epoch) from a JWT.
///
/// The signature is NOT verified: the server is the only authority on the
/// token, this is only used to notice locally that it has run out.
pub fn token_expiry(token: &str) -> Result<i64> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.set_required_spec_claims(&["exp"]);

    let key = DecodingKey::from_secret(&[]);
    match decode::<ExpiryClaims>(token, &key, &validation) {
        Ok(data) => Ok(data.claims.exp),
        Err(e) => bail!("decode token expiry failed: {e}"),
    }
}

/// Whether the token is expired at `now`. A token whose expiry cannot be
/// read counts as expired.
pub fn is_expired_at(token: &str, now: i64) -> bool {
    match token_expiry(token) {
        Ok(exp) => now >= exp,
        Err(_) => true,
    }
}

#[cfg(test)]
pub mod tests {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    use crate::time::current_timestamp;

    use super::*;

    #[derive(Serialize)]
    struct Claims<'a> {
        sub: &'a str,
        roles: Vec<&'a str>,
        exp: i64,
        iat: i64,
    }

    /// A token signed with a key the client never sees, expiring at `exp`.
    pub fn new_token(exp: i64) -> String {
        let claims = Claims {
            sub: "alice",
            roles: vec!["ROLE_CLIENT"],
            exp,
            iat: exp - 3600,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"server side secret"),
        )
        .unwrap()
    }

    pub fn valid_token() -> String {
        new_token(current_timestamp() + 3600)
    }

    pub fn expired_token() -> String {
        new_token(current_timestamp() - 60)
    }

    #[test]
    fn test_token_expiry() {
        let token = new_token(1_900_000_000);
        assert_eq!(token_expiry(&token).unwrap(), 1_900_000_000);
    }

    #[test]
    fn test_is_expired_at() {
        let token = new_token(1_000);
        assert!(!is_expired_at(&token, 999));
        assert!(is_expired_at(&token, 1_000));
        assert!(is_expired_at(&token, 5_000));
    }

    #[test]
    fn test_undecodable_is_expired() {
        let now = current_timestamp();
        for token in ["", "not-a-jwt", "a.b.c", "eyJhbGciOiJIUzI1NiJ9.e30.sig"] {
            assert!(token_expiry(token).is_err(), "{token}");
            assert!(is_expired_at(token, now), "{token}");
        }
    }

    #[test]
    fn test_missing_exp_is_expired() {
        #[derive(Serialize)]
        struct NoExp {
            sub: String,
        }
        let token = encode(
            &Header::default(),
            &NoExp {
                sub: String::from("alice"),
            },
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        assert!(token_expiry(&token).is_err());
        assert!(is_expired_at(&token, 0));
    }
}
