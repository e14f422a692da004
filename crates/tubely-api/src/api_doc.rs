//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use tubely_core::models;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tubely API",
        version = "0.1.0",
        description = "Video ingestion API. Uploaded MP4 files are probed for aspect ratio, stored under an aspect-partitioned key and linked to their video record."
    ),
    paths(
        handlers::video_upload::upload_video,
        handlers::video_get::get_video,
    ),
    components(
        schemas(
            models::VideoResponse,
            models::AspectBucket,
            error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "videos", description = "Video record lookup and video file upload")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_upload_route() {
        let spec = ApiDoc::openapi();
        assert!(spec.paths.paths.contains_key("/api/videos/{video_id}/upload"));
        assert!(spec.paths.paths.contains_key("/api/videos/{video_id}"));
    }
}
