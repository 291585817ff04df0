use super::*;
use shared::Role;

fn input() -> ApplicationInput {
    ApplicationInput {
        school: "  Purdue ".to_owned(),
        major: "Computer Science".to_owned(),
        graduation_year: 2026,
        essay: " I like building things. ".to_owned(),
    }
}

fn user(role: Role) -> User {
    User {
        id: Uuid::new_v4(),
        name: "Viewer".to_owned(),
        email: "viewer@example.com".to_owned(),
        role,
        created_at: "2024-01-01T00:00:00Z".to_owned(),
    }
}

fn application_for(user_id: Uuid) -> Application {
    Application {
        id: Uuid::new_v4(),
        user_id,
        applicant_name: "Applicant".to_owned(),
        applicant_email: "applicant@example.com".to_owned(),
        school: "Purdue".to_owned(),
        major: "CS".to_owned(),
        graduation_year: 2026,
        essay: String::new(),
        status: Status::Submitted,
        created_at: "2024-01-01T00:00:00Z".to_owned(),
        updated_at: "2024-01-01T00:00:00Z".to_owned(),
    }
}

// =============================================================================
// validate_input
// =============================================================================

#[test]
fn validate_input_trims_text_fields() {
    let cleaned = validate_input(&input()).unwrap();
    assert_eq!(cleaned.school, "Purdue");
    assert_eq!(cleaned.essay, "I like building things.");
    assert_eq!(cleaned.graduation_year, 2026);
}

#[test]
fn validate_input_requires_school_and_major() {
    let mut bad = input();
    bad.school = "   ".to_owned();
    let err = validate_input(&bad).unwrap_err().to_string();
    assert_eq!(err, "School is required");

    let mut bad = input();
    bad.major = String::new();
    assert_eq!(validate_input(&bad).unwrap_err().to_string(), "Major is required");
}

#[test]
fn validate_input_bounds_graduation_year() {
    let mut bad = input();
    bad.graduation_year = 1900;
    assert!(matches!(validate_input(&bad), Err(ApplicationError::Invalid(_))));
    bad.graduation_year = MAX_GRADUATION_YEAR;
    assert!(validate_input(&bad).is_ok());
}

#[test]
fn validate_input_bounds_lengths() {
    let mut bad = input();
    bad.school = "s".repeat(MAX_FIELD_LEN + 1);
    assert!(validate_input(&bad).is_err());

    let mut bad = input();
    bad.essay = "e".repeat(MAX_ESSAY_LEN + 1);
    assert!(validate_input(&bad).is_err());
}

// =============================================================================
// can_view
// =============================================================================

#[test]
fn owner_and_admin_can_view() {
    let owner = user(Role::User);
    let app = application_for(owner.id);
    assert!(can_view(&owner, &app));
    assert!(can_view(&user(Role::Admin), &app));
}

#[test]
fn other_user_cannot_view() {
    let app = application_for(Uuid::new_v4());
    assert!(!can_view(&user(Role::User), &app));
}

#[test]
fn application_error_display() {
    let id = Uuid::nil();
    assert!(ApplicationError::NotFound(id).to_string().contains("not found"));
    assert!(ApplicationError::Forbidden(id).to_string().contains("not allowed"));
}

// =============================================================================
// Live database
// =============================================================================

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn resubmission_keeps_status_and_admin_can_transition() {
    use crate::state::test_helpers::{integration_pool, seed_user};

    let pool = integration_pool().await;
    let applicant = seed_user(&pool, "applicant@example.com", Role::User).await;
    let admin = seed_user(&pool, "admin@example.com", Role::Admin).await;

    let first = upsert_application(&pool, applicant.id, &input()).await.expect("upsert");
    assert_eq!(first.status, Status::Submitted);

    let reviewed = update_status(&pool, first.id, Status::Reviewed).await.expect("update_status");
    assert_eq!(reviewed.status, Status::Reviewed);

    let mut edited = input();
    edited.major = "Mathematics".to_owned();
    let second = upsert_application(&pool, applicant.id, &edited).await.expect("upsert");
    assert_eq!(second.id, first.id);
    assert_eq!(second.major, "Mathematics");
    assert_eq!(second.status, Status::Reviewed);

    let own = list_applications(&pool, &applicant, None).await.expect("list");
    assert_eq!(own.len(), 1);
    let all_reviewed = list_applications(&pool, &admin, Some(Status::Reviewed)).await.expect("list");
    assert!(all_reviewed.iter().any(|a| a.id == first.id));
    let none_accepted = list_applications(&pool, &admin, Some(Status::Accepted)).await.expect("list");
    assert!(none_accepted.is_empty());

    let stranger = seed_user(&pool, "stranger@example.com", Role::User).await;
    let denied = get_application(&pool, first.id, &stranger).await;
    assert!(matches!(denied, Err(ApplicationError::Forbidden(_))));

    let missing = update_status(&pool, Uuid::new_v4(), Status::Accepted).await;
    assert!(matches!(missing, Err(ApplicationError::NotFound(_))));
}
