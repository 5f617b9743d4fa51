#[cfg(test)]
mod http_post_e2e_tests {
    use graphql_http_adapter::{
        ExecutionResult, GraphQLHttpLayer, GraphQLRequest, JsonResponseWriter,
    };
    use http::StatusCode;
    use serde_json::json;

    use crate::testkit::{
        app_with_executor, app_with_layer, json_post, post, send, RecordingExecutor,
    };

    #[tokio::test]
    async fn should_execute_json_body() {
        let executor = RecordingExecutor::<()>::new(ExecutionResult::from_data(
            json!({ "b": "B" }),
        ));
        let app = app_with_executor(executor.clone());

        let res = send(
            app,
            json_post(
                "/graphql",
                &json!({
                    "query": "query A { a } query B { b }",
                    "operationName": "B",
                    "variables": { "first": 2, "after": null }
                }),
            ),
        )
        .await;

        assert_eq!(res.status, StatusCode::OK);
        insta::assert_snapshot!(res.pretty_json_without_tracing(), @r###"
        {
          "data": {
            "b": "B"
          }
        }
        "###);

        let call = executor.single_call();
        assert_eq!(call.request.query.as_deref(), Some("query A { a } query B { b }"));
        assert_eq!(call.request.operation_name.as_deref(), Some("B"));
        assert_eq!(
            call.request.variables.map(serde_json::Value::Object),
            Some(json!({ "first": 2, "after": null }))
        );
    }

    #[tokio::test]
    async fn should_accept_json_with_charset() {
        let executor = RecordingExecutor::<()>::new(ExecutionResult::from_data(json!({})));
        let app = app_with_executor(executor.clone());

        let res = send(
            app,
            post(
                "/graphql",
                Some("application/json; charset=utf-8"),
                r#"{"query":"{a}"}"#,
            ),
        )
        .await;

        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(executor.single_call().request, GraphQLRequest::from_query("{a}"));
    }

    #[tokio::test]
    async fn should_execute_application_graphql_body() {
        let executor = RecordingExecutor::<()>::new(ExecutionResult::from_data(json!({})));
        let app = app_with_executor(executor.clone());

        let res = send(
            app,
            post("/graphql", Some("application/graphql"), "{ hero { name } }"),
        )
        .await;

        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(
            executor.single_call().request,
            GraphQLRequest::from_query("{ hero { name } }")
        );
    }

    #[tokio::test]
    async fn should_reject_unsupported_media_type() {
        let executor = RecordingExecutor::<()>::new(ExecutionResult::from_data(json!({})));
        let app = app_with_executor(executor.clone());

        let res = send(app, post("/graphql", Some("text/plain"), "{ a }")).await;

        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        insta::assert_snapshot!(res.pretty_json_without_tracing(), @r###"
        {
          "errors": [
            {
              "message": "Invalid 'Content-Type' header: non-supported media type. Must be of 'application/json' or 'application/graphql'."
            }
          ]
        }
        "###);
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn should_reject_unparsable_content_type() {
        let executor = RecordingExecutor::<()>::new(ExecutionResult::from_data(json!({})));
        let app = app_with_executor(executor.clone());

        let res = send(app, post("/graphql", Some("not a media type"), "{ a }")).await;

        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        insta::assert_snapshot!(res.pretty_json_without_tracing(), @r###"
        {
          "errors": [
            {
              "message": "Invalid 'Content-Type' header: value 'not a media type' could not be parsed."
            }
          ]
        }
        "###);
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn should_reject_missing_content_type() {
        let executor = RecordingExecutor::<()>::new(ExecutionResult::from_data(json!({})));
        let app = app_with_executor(executor.clone());

        let res = send(app, post("/graphql", None, r#"{"query":"{a}"}"#)).await;

        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            res.json(),
            json!({
                "errors": [
                    { "message": "Invalid 'Content-Type' header: value '' could not be parsed." }
                ]
            })
        );
    }

    #[tokio::test]
    async fn should_reject_malformed_json_body() {
        let executor = RecordingExecutor::<()>::new(ExecutionResult::from_data(json!({})));
        let app = app_with_executor(executor.clone());

        let res = send(app, post("/graphql", Some("application/json"), "{\"query\":")).await;

        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        insta::assert_snapshot!(res.pretty_json_without_tracing(), @r###"
        {
          "errors": [
            {
              "message": "Failed to parse GraphQL request payload"
            }
          ]
        }
        "###);
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn should_reject_non_utf8_graphql_body() {
        let executor = RecordingExecutor::<()>::new(ExecutionResult::from_data(json!({})));
        let app = app_with_executor(executor.clone());

        let res = send(
            app,
            post("/graphql", Some("application/graphql"), vec![0xff_u8, 0xfe, 0xfd]),
        )
        .await;

        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn should_render_rejections_through_configured_writer() {
        let executor = RecordingExecutor::<()>::new(ExecutionResult::from_data(json!({})));
        let layer = GraphQLHttpLayer::<()>::builder(executor.clone())
            .response_writer(JsonResponseWriter::indented())
            .build();

        let res = send(
            app_with_layer(layer),
            post("/graphql", Some("text/plain"), "{ a }"),
        )
        .await;

        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            res.headers.get("content-type").and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        insta::assert_snapshot!(res.text(), @r###"
        {
          "errors": [
            {
              "message": "Invalid 'Content-Type' header: non-supported media type. Must be of 'application/json' or 'application/graphql'."
            }
          ]
        }
        "###);
        assert!(executor.calls().is_empty());
    }
}
