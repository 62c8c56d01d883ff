//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variables: DATABASE_URL, JWT_SECRET (REDIS_URL optional)
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, check_test_env, fixtures::*, TestServer, TestStudent,
};
use reqwest::StatusCode;

async fn create_application(
    server: &TestServer,
    student: &TestStudent,
    universities: Vec<i64>,
) -> ApplicationResponse {
    let response = server
        .post_auth(
            "/api/v1/applications",
            &student.token,
            &CreateApplicationRequest::with_universities(universities),
        )
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn invite(
    server: &TestServer,
    student: &TestStudent,
    application_id: &str,
    email: &str,
) -> InvitationResponse {
    let response = server
        .post_auth(
            &format!("/api/v1/applications/{application_id}/invitations"),
            &student.token,
            &CreateInvitationRequest::to(email),
        )
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn confirm(server: &TestServer, token: &str) -> reqwest::Response {
    server
        .post(
            &format!("/api/v1/invitations/{token}/confirm"),
            &ConfirmInvitationRequest::valid(),
        )
        .await
        .unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], "healthy");
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_student_routes_require_a_token() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .post(
            "/api/v1/applications/123/invitations",
            &CreateInvitationRequest::to("rec@test.com"),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "MISSING_AUTHORIZATION");

    let response = server
        .get_auth("/api/v1/applications", "not-a-jwt")
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Invitations
// ============================================================================

#[tokio::test]
async fn test_create_and_list_invitations() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let student = server.new_student().unwrap();
    let app = create_application(&server, &student, vec![1, 2]).await;
    let email = unique_email();

    let invitation = invite(&server, &student, &app.id, &email).await;
    assert_eq!(invitation.status, "invited");
    assert_eq!(invitation.application_id, app.id);
    assert_eq!(invitation.recommender_email, email);
    assert_eq!(invitation.token().len(), 43);

    let response = server
        .get_auth(
            &format!("/api/v1/applications/{}/invitations", app.id),
            &student.token,
        )
        .await
        .unwrap();
    let listed: Vec<InvitationResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, invitation.id);
}

#[tokio::test]
async fn test_list_is_empty_for_new_application() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let student = server.new_student().unwrap();
    let app = create_application(&server, &student, vec![]).await;

    let response = server
        .get_auth(
            &format!("/api/v1/applications/{}/invitations", app.id),
            &student.token,
        )
        .await
        .unwrap();
    let listed: Vec<InvitationResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_invalid_email_is_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let student = server.new_student().unwrap();
    let app = create_application(&server, &student, vec![]).await;

    let response = server
        .post_auth(
            &format!("/api/v1/applications/{}/invitations", app.id),
            &student.token,
            &CreateInvitationRequest::to("no-at-sign"),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_concurrent_duplicate_invitations() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let student = server.new_student().unwrap();
    let app = create_application(&server, &student, vec![]).await;
    let path = format!("/api/v1/applications/{}/invitations", app.id);
    let body = CreateInvitationRequest::to(&unique_email());

    let (first, second) = tokio::join!(
        server.post_auth(&path, &student.token, &body),
        server.post_auth(&path, &student.token, &body),
    );
    let mut statuses = [first.unwrap().status(), second.unwrap().status()];
    statuses.sort();

    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);
}

#[tokio::test]
async fn test_other_students_application_is_not_found() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.new_student().unwrap();
    let intruder = server.new_student().unwrap();
    let app = create_application(&server, &owner, vec![]).await;
    let invitation = invite(&server, &owner, &app.id, &unique_email()).await;

    let response = server
        .get_auth(
            &format!("/api/v1/applications/{}/invitations", app.id),
            &intruder.token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server
        .delete_auth(
            &format!("/api/v1/applications/{}/invitations/{}", app.id, invitation.id),
            &intruder.token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_bad_path_ids_are_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let student = server.new_student().unwrap();

    let response = server
        .get_auth("/api/v1/applications/not-a-number/invitations", &student.token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_PATH_PARAMETER");

    let app = create_application(&server, &student, vec![]).await;
    let response = server
        .delete_auth(
            &format!("/api/v1/applications/{}/invitations/not-a-number", app.id),
            &student.token,
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "UNKNOWN_INVITATION");
}

// ============================================================================
// Public token endpoints
// ============================================================================

#[tokio::test]
async fn test_view_invitation_by_token() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let student = server.new_student().unwrap();
    let app = create_application(&server, &student, vec![4, 5, 6]).await;
    let invitation = invite(&server, &student, &app.id, &unique_email()).await;

    let response = server
        .get(&format!("/api/v1/invitations/{}", invitation.token()))
        .await
        .unwrap();
    let view: InvitationViewResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(view.id, invitation.id);
    assert_eq!(view.status, "invited");
    assert_eq!(view.application.legal_name, "Jordan Rivera");
    assert_eq!(view.application.university_count, 3);
}

#[tokio::test]
async fn test_unknown_tokens_are_not_found() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    for token in ["garbage", "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"] {
        let response = server
            .get(&format!("/api/v1/invitations/{token}"))
            .await
            .unwrap();
        assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

        let response = confirm(&server, token).await;
        assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
    }
}

#[tokio::test]
async fn test_weak_password_is_rejected_without_side_effects() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let student = server.new_student().unwrap();
    let app = create_application(&server, &student, vec![]).await;
    let invitation = invite(&server, &student, &app.id, &unique_email()).await;

    let weak = ConfirmInvitationRequest {
        password: "password".to_string(),
        ..ConfirmInvitationRequest::valid()
    };
    let response = server
        .post(
            &format!("/api/v1/invitations/{}/confirm", invitation.token()),
            &weak,
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "WEAK_PASSWORD");

    // still pending, so a valid confirmation goes through
    let response = confirm(&server, invitation.token()).await;
    assert_status(response, StatusCode::CREATED).await.unwrap();
}

#[tokio::test]
async fn test_concurrent_confirmations_have_one_winner() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let student = server.new_student().unwrap();
    let app = create_application(&server, &student, vec![]).await;
    let invitation = invite(&server, &student, &app.id, &unique_email()).await;

    let (a, b) = tokio::join!(
        confirm(&server, invitation.token()),
        confirm(&server, invitation.token()),
    );
    let mut statuses = [a.status(), b.status()];
    statuses.sort();

    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::BAD_REQUEST]);
}

// ============================================================================
// Resend and delete
// ============================================================================

#[tokio::test]
async fn test_resend_pending_invitation() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let student = server.new_student().unwrap();
    let app = create_application(&server, &student, vec![]).await;
    let invitation = invite(&server, &student, &app.id, &unique_email()).await;

    let response = server
        .post_empty_auth(
            &format!(
                "/api/v1/applications/{}/invitations/{}/resend",
                app.id, invitation.id
            ),
            &student.token,
        )
        .await
        .unwrap();
    let resent: ResendInvitationResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(resent.message, "Invitation resent");
    assert_eq!(resent.invitation.resend_count, 1);
    assert_eq!(resent.invitation.token(), invitation.token());
    assert!(resent.invitation.invitation_expires_at >= invitation.invitation_expires_at);
}

#[tokio::test]
async fn test_delete_invitation_kills_the_link() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let student = server.new_student().unwrap();
    let app = create_application(&server, &student, vec![]).await;
    let email = unique_email();
    let invitation = invite(&server, &student, &app.id, &email).await;
    let path = format!("/api/v1/applications/{}/invitations/{}", app.id, invitation.id);

    let response = server.delete_auth(&path, &student.token).await.unwrap();
    let ack: MessageResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(ack.message, "Invitation deleted");

    let response = server
        .get(&format!("/api/v1/invitations/{}", invitation.token()))
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server.delete_auth(&path, &student.token).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    // the same recommender can be invited again
    let again = invite(&server, &student, &app.id, &email).await;
    assert_ne!(again.id, invitation.id);
}

// ============================================================================
// University snapshot
// ============================================================================

#[tokio::test]
async fn test_universities_lock_after_confirmation() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let student = server.new_student().unwrap();
    let app = create_application(&server, &student, vec![7, 8]).await;
    let invitation = invite(&server, &student, &app.id, &unique_email()).await;

    let response = confirm(&server, invitation.token()).await;
    let profile: RecommenderProfileResponse =
        assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(profile.university_ids, vec![7, 8]);

    let response = server
        .put_auth(
            &format!("/api/v1/applications/{}/universities", app.id),
            &student.token,
            &UpdateUniversitiesRequest {
                university_ids: vec![9],
            },
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "APPLICATION_LOCKED");
}

// ============================================================================
// End to end
// ============================================================================

#[tokio::test]
async fn test_invitation_lifecycle() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let student = server.new_student().unwrap();
    let app = create_application(&server, &student, vec![101, 202]).await;
    let email = unique_email();
    let invitations_path = format!("/api/v1/applications/{}/invitations", app.id);

    // invite
    let invitation = invite(&server, &student, &app.id, &email).await;
    assert_eq!(invitation.status, "invited");

    // duplicate
    let response = server
        .post_auth(&invitations_path, &student.token, &CreateInvitationRequest::to(&email))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "ALREADY_INVITED");

    // confirm
    let response = confirm(&server, invitation.token()).await;
    let profile: RecommenderProfileResponse =
        assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(profile.invitation_id, invitation.id);
    assert_eq!(profile.email, email);
    assert!(!profile.confirmed_at.is_empty());

    // second confirm
    let response = confirm(&server, invitation.token()).await;
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVITATION_NOT_PENDING");

    // delete after confirmation
    let response = server
        .delete_auth(
            &format!("{invitations_path}/{}", invitation.id),
            &student.token,
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVITATION_NOT_PENDING");

    // student sees the confirmation
    let response = server
        .get_auth(&invitations_path, &student.token)
        .await
        .unwrap();
    let listed: Vec<InvitationResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, "confirmed");
    assert!(listed[0].confirmed_at.is_some());
    assert_eq!(listed[0].recommender_profile_id.as_deref(), Some(profile.id.as_str()));
}
