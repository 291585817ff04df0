use super::*;
use uuid::Uuid;

#[test]
fn status_codes_match_variants() {
    assert_eq!(ApiError::BadRequest(String::new()).status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(ApiError::unauthorized().status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(ApiError::Forbidden(String::new()).status_code(), StatusCode::FORBIDDEN);
    assert_eq!(ApiError::NotFound(String::new()).status_code(), StatusCode::NOT_FOUND);
    assert_eq!(ApiError::Conflict(String::new()).status_code(), StatusCode::CONFLICT);
    assert_eq!(ApiError::Internal(String::new()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(ApiError::Database(sqlx::Error::RowNotFound).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn client_errors_expose_their_message() {
    let body = ApiError::BadRequest("Passwords do not match".into()).body();
    assert_eq!(body, ErrorBody { status: 400, error: "Passwords do not match".into() });
}

#[test]
fn server_errors_hide_their_cause() {
    let body = ApiError::Internal("argon2 exploded".into()).body();
    assert_eq!(body.status, 500);
    assert!(!body.error.contains("argon2"));

    let body = ApiError::Database(sqlx::Error::PoolTimedOut).body();
    assert_eq!(body.error, INTERNAL_MESSAGE);
}

#[test]
fn user_errors_map_to_http_semantics() {
    assert_eq!(ApiError::from(UserError::EmailTaken).status_code(), StatusCode::CONFLICT);
    assert_eq!(ApiError::from(UserError::InvalidEmail).status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        ApiError::from(UserError::Password(PasswordError::TooShort)).status_code(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        ApiError::from(UserError::Password(PasswordError::Hash("x".into()))).status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn application_errors_map_to_http_semantics() {
    let id = Uuid::nil();
    assert_eq!(ApiError::from(ApplicationError::NotFound(id)).status_code(), StatusCode::NOT_FOUND);
    assert_eq!(ApiError::from(ApplicationError::Forbidden(id)).status_code(), StatusCode::FORBIDDEN);
    let invalid = ApiError::from(ApplicationError::Invalid("School is required".into()));
    assert_eq!(invalid.body().error, "School is required");
}

#[tokio::test]
async fn into_response_writes_error_body() {
    use http_body_util::BodyExt;

    let response = ApiError::Conflict("taken".into()).into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, ErrorBody { status: 409, error: "taken".into() });
}
