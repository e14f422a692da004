use chrono::Duration;
use tubely_api::auth::JwtAuthenticator;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-at-least-32-bytes";

/// Access token for `user_id`, signed the way the test server expects.
pub fn token_for(user_id: Uuid) -> String {
    JwtAuthenticator::new(TEST_JWT_SECRET, "tubely-access")
        .issue(user_id, Duration::hours(1))
        .unwrap()
}

pub fn bearer(user_id: Uuid) -> String {
    format!("Bearer {}", token_for(user_id))
}
