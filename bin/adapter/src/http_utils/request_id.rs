use http::{HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use ulid::Ulid;

pub static REQUEST_ID_HEADER_NAME: HeaderName = HeaderName::from_static("x-request-id");

/// Generates a ULID for requests arriving without an `x-request-id` header.
#[derive(Debug, Clone)]
pub struct RequestIdGenerator;

impl MakeRequestId for RequestIdGenerator {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Ulid::new().to_string())
            .ok()
            .map(RequestId::new)
    }
}
