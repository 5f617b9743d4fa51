#[cfg(test)]
mod routing_e2e_tests {
    use axum::body::Body;
    use graphql_http_adapter::{ExecutionResult, GraphQLHttpLayer, GraphQLRequest};
    use http::{Request, StatusCode};
    use serde_json::json;

    use crate::testkit::{
        app_with_executor, app_with_layer, get, send, RecordingExecutor, NEXT_HANDLER_BODY,
    };

    #[tokio::test]
    async fn should_pass_other_paths_to_next_service() {
        let executor = RecordingExecutor::<()>::new(ExecutionResult::from_data(json!({})));

        for uri in ["/health", "/graphqlx?query=%7Ba%7D", "/"] {
            let res = send(app_with_executor(executor.clone()), get(uri)).await;

            assert_eq!(res.status, StatusCode::IM_A_TEAPOT, "uri: {}", uri);
            assert_eq!(res.text(), NEXT_HANDLER_BODY);
        }

        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn should_pass_websocket_upgrades_to_next_service() {
        let executor = RecordingExecutor::<()>::new(ExecutionResult::from_data(json!({})));
        let app = app_with_executor(executor.clone());

        let req = Request::builder()
            .method("GET")
            .uri("/graphql")
            .header("connection", "Upgrade")
            .header("upgrade", "websocket")
            .header("sec-websocket-protocol", "graphql-transport-ws")
            .body(Body::empty())
            .expect("request should build");
        let res = send(app, req).await;

        assert_eq!(res.status, StatusCode::IM_A_TEAPOT);
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn should_match_endpoint_case_insensitively_and_by_segment() {
        let executor = RecordingExecutor::<()>::new(ExecutionResult::from_data(json!({})));

        for uri in ["/GraphQL?query=%7Ba%7D", "/graphql/?query=%7Ba%7D", "/graphql/v1?query=%7Ba%7D"] {
            let res = send(app_with_executor(executor.clone()), get(uri)).await;
            assert_eq!(res.status, StatusCode::OK, "uri: {}", uri);
        }

        assert_eq!(executor.calls().len(), 3);
    }

    #[tokio::test]
    async fn should_serve_custom_endpoint() {
        let executor = RecordingExecutor::<()>::new(ExecutionResult::from_data(json!({})));
        let layer = GraphQLHttpLayer::<()>::builder(executor.clone())
            .endpoint("/api/graphql")
            .build();
        assert_eq!(layer.endpoint(), "/api/graphql");

        let res = send(app_with_layer(layer.clone()), get("/api/graphql?query=%7Ba%7D")).await;
        assert_eq!(res.status, StatusCode::OK);

        let res = send(app_with_layer(layer), get("/graphql?query=%7Ba%7D")).await;
        assert_eq!(res.status, StatusCode::IM_A_TEAPOT);

        assert_eq!(executor.calls().len(), 1);
    }

    #[tokio::test]
    async fn should_execute_empty_request_for_other_methods() {
        let executor = RecordingExecutor::<()>::new(ExecutionResult::from_error(
            "Must provide query string.",
        ));
        let app = app_with_executor(executor.clone());

        let req = Request::builder()
            .method("PUT")
            .uri("/graphql?query=%7Bignored%7D")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"query":"{ignored}"}"#))
            .expect("request should build");
        let res = send(app, req).await;

        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(executor.single_call().request, GraphQLRequest::default());
    }

    #[tokio::test]
    async fn should_handle_requests_that_are_not_websocket_handshakes() {
        let executor = RecordingExecutor::<()>::new(ExecutionResult::from_data(json!({})));

        let post_with_upgrade = Request::builder()
            .method("POST")
            .uri("/graphql")
            .header("connection", "Upgrade")
            .header("upgrade", "websocket")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"query":"{a}"}"#))
            .expect("request should build");
        let res = send(app_with_executor(executor.clone()), post_with_upgrade).await;
        assert_eq!(res.status, StatusCode::OK);

        let get_without_connection_upgrade = Request::builder()
            .method("GET")
            .uri("/graphql?query=%7Bb%7D")
            .header("upgrade", "websocket")
            .body(Body::empty())
            .expect("request should build");
        let res = send(app_with_executor(executor.clone()), get_without_connection_upgrade).await;
        assert_eq!(res.status, StatusCode::OK);

        let queries: Vec<Option<String>> = executor
            .calls()
            .into_iter()
            .map(|call| call.request.query)
            .collect();
        assert_eq!(queries, vec![Some("{a}".to_string()), Some("{b}".to_string())]);
    }
}
