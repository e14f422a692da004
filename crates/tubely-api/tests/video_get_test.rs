mod helpers;

use helpers::auth::bearer;
use helpers::{api_path, setup_test_app};
use tubely_core::VideoResponse;
use uuid::Uuid;

#[tokio::test]
async fn test_get_own_video() {
    let app = setup_test_app();
    let owner = Uuid::new_v4();
    let draft = app.videos.insert_draft(owner);

    let response = app
        .client()
        .get(&api_path(&format!("/videos/{}", draft.id)))
        .add_header("Authorization", bearer(owner))
        .await;

    assert_eq!(response.status_code(), 200);
    let video: VideoResponse = response.json();
    assert_eq!(video.id, draft.id);
    assert_eq!(video.title, draft.title);
    assert!(video.video_url.is_none());
}

#[tokio::test]
async fn test_get_video_of_another_user() {
    let app = setup_test_app();
    let draft = app.videos.insert_draft(Uuid::new_v4());

    let response = app
        .client()
        .get(&api_path(&format!("/videos/{}", draft.id)))
        .add_header("Authorization", bearer(Uuid::new_v4()))
        .await;

    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_get_video_not_found() {
    let app = setup_test_app();

    let response = app
        .client()
        .get(&api_path(&format!("/videos/{}", Uuid::new_v4())))
        .add_header("Authorization", bearer(Uuid::new_v4()))
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_health_and_openapi_are_public() {
    let app = setup_test_app();

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "not_configured");
    assert_eq!(body["storage"], "s3");

    let response = app.client().get(&api_path("/openapi.json")).await;
    assert_eq!(response.status_code(), 200);
    let spec: serde_json::Value = response.json();
    assert!(spec["paths"]["/api/videos/{video_id}/upload"].is_object());
}
