#[cfg(test)]
mod body_limit_e2e_tests {
    use axum::body::Body;
    use graphql_http_adapter::{ExecutionResult, GraphQLHttpLayer};
    use http::{Request, StatusCode};
    use serde_json::json;

    use crate::testkit::{app_with_layer, post, send, RecordingExecutor};

    fn limited_app(executor: RecordingExecutor) -> axum::Router {
        app_with_layer(
            GraphQLHttpLayer::<()>::builder(executor)
                .max_request_body_size(32)
                .build(),
        )
    }

    #[tokio::test]
    async fn should_return_payload_too_large_if_body_exceeds_limit() {
        let executor = RecordingExecutor::new(ExecutionResult::from_data(json!({})));
        let app = limited_app(executor.clone());

        let query = format!(r#"{{"query":"{{ {} }}"}}"#, "a ".repeat(64));
        let res = send(app, post("/graphql", Some("application/json"), query)).await;

        assert_eq!(res.status, StatusCode::PAYLOAD_TOO_LARGE);
        insta::assert_snapshot!(res.pretty_json_without_tracing(), @r###"
        {
          "errors": [
            {
              "message": "Request body exceeds the maximum allowed size while reading the stream"
            }
          ]
        }
        "###);
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn should_reject_oversized_content_length_before_reading() {
        let executor = RecordingExecutor::new(ExecutionResult::from_data(json!({})));
        let app = limited_app(executor.clone());

        let req = Request::builder()
            .method("POST")
            .uri("/graphql")
            .header("content-type", "application/graphql")
            .header("content-length", "4096")
            .body(Body::from("{ a }"))
            .expect("request should build");
        let res = send(app, req).await;

        assert_eq!(res.status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            res.json(),
            json!({
                "errors": [
                    { "message": "Content-Length exceeds the maximum allowed size: 32" }
                ]
            })
        );
    }

    #[tokio::test]
    async fn should_accept_body_within_limit() {
        let executor = RecordingExecutor::new(ExecutionResult::from_data(json!({})));
        let app = limited_app(executor.clone());

        let res = send(app, post("/graphql", Some("application/graphql"), "{ a }")).await;

        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(executor.calls().len(), 1);
    }
}
