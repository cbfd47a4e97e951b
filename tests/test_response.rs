use filament::http::response::{ResponseBuilder, ResponseHead, StatusCode, error_body};
use filament::http::writer::file_head;

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::Forbidden.as_u16(), 403);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::Forbidden.reason_phrase(), "Forbidden");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
}

#[test]
fn test_response_builder_keeps_order() {
    let head = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .content_length(4)
        .header("X-Custom", "value")
        .build();

    let names: Vec<&str> = head.headers.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(names, ["Content-Type", "Content-Length", "X-Custom"]);
}

#[test]
fn test_response_builder_replaces_duplicate_header() {
    let head = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Length", "999")
        .header("content-length", "4")
        .build();

    assert_eq!(head.headers.len(), 1);
    assert_eq!(head.header("Content-Length"), Some("4"));
}

#[test]
fn test_response_builder_optional_header() {
    let head = ResponseBuilder::new(StatusCode::Ok)
        .optional_header("Content-Type", None)
        .optional_header("X-Present", Some("yes"))
        .build();

    assert_eq!(head.header("Content-Type"), None);
    assert_eq!(head.header("X-Present"), Some("yes"));
}

#[test]
fn test_error_head_matches_body() {
    let body = error_body(StatusCode::NotFound);
    let head = ResponseHead::error(StatusCode::NotFound, body.len());

    assert_eq!(body, "404 Not Found\n");
    assert_eq!(head.status, StatusCode::NotFound);
    assert_eq!(head.header("Content-Type"), Some("text/plain"));
    assert_eq!(head.header("Content-Length"), Some("14"));
}

#[test]
fn test_file_head_uncompressed() {
    let head = file_head(Some("text/css"), 42, false, 31_536_000);

    assert_eq!(head.status, StatusCode::Ok);
    assert_eq!(head.header("Content-Type"), Some("text/css"));
    assert_eq!(head.header("Content-Length"), Some("42"));
    assert_eq!(head.header("Cache-Control"), Some("max-age=31536000"));
    assert_eq!(head.header("Content-Encoding"), None);
    assert_eq!(head.header("Vary"), None);
}

#[test]
fn test_file_head_gzipped() {
    let head = file_head(Some("application/json"), 17, true, 60);

    assert_eq!(head.header("Content-Encoding"), Some("gzip"));
    assert_eq!(head.header("Vary"), Some("Accept-Encoding"));
    assert_eq!(head.header("Content-Length"), Some("17"));
    assert_eq!(head.header("Cache-Control"), Some("max-age=60"));
}
