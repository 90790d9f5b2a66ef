use axum::http::{header, HeaderMap};

use super::token::TokenConfig;
use super::types::{AppRole, SessionClaims};
use crate::shared::AppError;

/// Signed-in at all: the token must carry a subject.
pub fn require_signed_in(claims: &SessionClaims) -> Result<(), AppError> {
    if claims.sub.is_empty() {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

/// Member access: MEMBER and ADMIN pass, anyone else is forbidden.
pub fn require_member(claims: &SessionClaims) -> Result<(), AppError> {
    require_signed_in(claims)?;
    match claims.role {
        AppRole::Member | AppRole::Admin => Ok(()),
        AppRole::Visitor => Err(AppError::Forbidden),
    }
}

pub fn is_admin(claims: &SessionClaims) -> bool {
    claims.role == AppRole::Admin
}

/// Owner-or-admin check used by mutating room/idea routes.
pub fn can_edit(claims: &SessionClaims, owner_id: &str) -> bool {
    is_admin(claims) || claims.sub == owner_id
}

/// Extracts and validates the bearer token, then applies the member gate.
///
/// Runs before any subscription or repository access: a missing or invalid
/// token is a 401, a valid token without member role is a 403. Either way
/// the caller never touches the bus.
pub fn authorize_member(
    headers: &HeaderMap,
    token_config: &TokenConfig,
) -> Result<SessionClaims, AppError> {
    let token = bearer_token(headers).ok_or(AppError::Unauthorized)?;
    let claims = token_config
        .validate_token(token)
        .map_err(|_| AppError::Unauthorized)?;
    require_member(&claims)?;
    Ok(claims)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn claims(role: AppRole) -> SessionClaims {
        SessionClaims {
            sub: "user-1".to_string(),
            name: Some("alice".to_string()),
            role,
            exp: 2_000_000_000,
            iat: 1_000_000_000,
        }
    }

    #[rstest]
    #[case(AppRole::Member, true)]
    #[case(AppRole::Admin, true)]
    #[case(AppRole::Visitor, false)]
    fn test_require_member_by_role(#[case] role: AppRole, #[case] allowed: bool) {
        let result = require_member(&claims(role));
        assert_eq!(result.is_ok(), allowed);
    }

    #[test]
    fn test_empty_subject_is_unauthorized() {
        let mut c = claims(AppRole::Member);
        c.sub = String::new();
        assert!(matches!(require_member(&c), Err(AppError::Unauthorized)));
    }

    #[rstest]
    #[case(AppRole::Admin, "someone-else", true)]
    #[case(AppRole::Member, "user-1", true)]
    #[case(AppRole::Member, "someone-else", false)]
    fn test_can_edit(#[case] role: AppRole, #[case] owner: &str, #[case] expected: bool) {
        assert_eq!(can_edit(&claims(role), owner), expected);
    }

    #[test]
    fn test_authorize_member_with_valid_token() {
        let config = TokenConfig::new();
        let token = config
            .create_token("user-1".to_string(), None, AppRole::Member)
            .unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );

        let claims = authorize_member(&headers, &config).unwrap();
        assert_eq!(claims.sub, "user-1");
    }

    #[test]
    fn test_authorize_member_missing_header() {
        let config = TokenConfig::new();
        let headers = HeaderMap::new();
        assert!(matches!(
            authorize_member(&headers, &config),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_authorize_member_garbage_token() {
        let config = TokenConfig::new();
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            "Bearer not-a-jwt".parse().unwrap(),
        );
        assert!(matches!(
            authorize_member(&headers, &config),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_authorize_member_visitor_token_is_forbidden() {
        let config = TokenConfig::new();
        let token = config
            .create_token("user-1".to_string(), None, AppRole::Visitor)
            .unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );
        assert!(matches!(
            authorize_member(&headers, &config),
            Err(AppError::Forbidden)
        ));
    }
}
