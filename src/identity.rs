use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::HeaderMap;
use actix_web::{FromRequest, HttpRequest};
use uuid::Uuid;

use crate::domain::user::Role;
use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const USER_ROLE_HEADER: &str = "X-User-Role";

/// The caller's identity as asserted by the upstream gateway. The gateway
/// authenticates the caller and forwards these headers; this service only
/// enforces authorization.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

impl Identity {
    pub fn require(&self, roles: &[Role]) -> Result<(), AppError> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    /// Owners see their own records; reviewers (doctor, admin) see all.
    pub fn can_view(&self, owner: Uuid) -> bool {
        self.user_id == owner || matches!(self.role, Role::Doctor | Role::HospitalAdmin)
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, AppError> {
    headers
        .get(name)
        .ok_or_else(|| AppError::Unauthorized("No identity provided".to_string()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized(format!("Invalid {name} header")))
}

fn parse_identity(headers: &HeaderMap) -> Result<Identity, AppError> {
    let user_id = header_str(headers, USER_ID_HEADER)?
        .parse::<Uuid>()
        .map_err(|_| AppError::Unauthorized(format!("Invalid {USER_ID_HEADER} header")))?;
    let role = header_str(headers, USER_ROLE_HEADER)?
        .parse::<Role>()
        .map_err(|_| AppError::Unauthorized(format!("Invalid {USER_ROLE_HEADER} header")))?;
    Ok(Identity { user_id, role })
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Identity, AppError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(parse_identity(req.headers()))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[test]
    fn parses_valid_identity_headers() {
        let user_id = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, user_id.to_string()))
            .insert_header((USER_ROLE_HEADER, "DOCTOR"))
            .to_http_request();

        let identity = parse_identity(req.headers()).expect("should parse");
        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.role, Role::Doctor);
    }

    #[test]
    fn missing_headers_are_unauthorized() {
        let req = TestRequest::default().to_http_request();
        let err = parse_identity(req.headers()).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn malformed_user_id_is_unauthorized() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "not-a-uuid"))
            .insert_header((USER_ROLE_HEADER, "PATIENT"))
            .to_http_request();
        assert!(matches!(
            parse_identity(req.headers()),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn unknown_role_is_unauthorized() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, Uuid::new_v4().to_string()))
            .insert_header((USER_ROLE_HEADER, "SUPERUSER"))
            .to_http_request();
        assert!(matches!(
            parse_identity(req.headers()),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn role_gate_allows_and_denies() {
        let identity = Identity {
            user_id: Uuid::new_v4(),
            role: Role::Patient,
        };
        assert!(identity.require(&[Role::Patient, Role::Doctor]).is_ok());
        assert!(matches!(
            identity.require(&[Role::HospitalAdmin]),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn owners_and_reviewers_can_view() {
        let owner = Uuid::new_v4();
        let patient = Identity { user_id: owner, role: Role::Patient };
        let stranger = Identity { user_id: Uuid::new_v4(), role: Role::Patient };
        let doctor = Identity { user_id: Uuid::new_v4(), role: Role::Doctor };

        assert!(patient.can_view(owner));
        assert!(!stranger.can_view(owner));
        assert!(doctor.can_view(owner));
    }
}
