//! Integration tests for the remote content provider against a mock API

use festwish_core::config::{FestwishConfig, RemoteConfig, ResolverMode};
use festwish_core::resolver::{ContentRequest, ContentResolver, RemoteResolver};
use festwish_core::session::Session;
use festwish_core::wish::WishDraft;
use festwish_core::{EntityKind, ResolveError};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver_for(server: &MockServer, session: Session) -> RemoteResolver {
    RemoteResolver::new(
        RemoteConfig {
            base_url: server.uri(),
            timeout_seconds: 5,
            ..Default::default()
        },
        session,
    )
    .unwrap()
}

#[tokio::test]
async fn test_resolves_backend_shaped_bundle() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/content"))
        .and(query_param("festival_id", "holi-id"))
        .and(query_param("relationship_id", "friend-id"))
        .and(header("cache-control", "no-cache"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"message_text": "Happy Holi!", "tone": "warm"},
            "quote": {"quote_text": "Colours are the smiles of nature.", "author": "Leigh Hunt"},
            "image": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = resolver_for(&server, Session::anonymous());
    let bundle = resolver
        .resolve_content("holi-id", Some("friend-id"))
        .await
        .unwrap();

    assert_eq!(bundle.message.unwrap().text, "Happy Holi!");
    assert_eq!(bundle.quote.unwrap().author.as_deref(), Some("Leigh Hunt"));
    assert!(bundle.image.is_none());
}

#[tokio::test]
async fn test_null_optional_fields_still_resolve() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"message_text": "Happy Diwali!", "tone": null},
            "quote": null,
            "image": {"image_url": "https://img/diwali.png", "alt_text": null}
        })))
        .mount(&server)
        .await;

    let resolver = resolver_for(&server, Session::anonymous());
    let bundle = resolver
        .resolve_content("diwali-id", Some("friend-id"))
        .await
        .unwrap();

    assert_eq!(bundle.message.unwrap().tone, "");
    assert!(bundle.quote.is_none());
    let image = bundle.image.unwrap();
    assert_eq!(image.url, "https://img/diwali.png");
    assert_eq!(image.alt, "");
}

#[tokio::test]
async fn test_every_call_reaches_the_backend() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(3)
        .mount(&server)
        .await;

    let resolver = resolver_for(&server, Session::anonymous());
    for _ in 0..3 {
        let bundle = resolver.resolve_content("holi-id", None).await.unwrap();
        assert!(bundle.is_empty());
    }
}

#[tokio::test]
async fn test_tone_is_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/content"))
        .and(query_param("tone", "funny"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": null})))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = resolver_for(&server, Session::anonymous());
    let bundle = resolver
        .resolve_content_by_tone("holi-id", Some("friend-id"), "funny")
        .await
        .unwrap();
    assert!(bundle.message.is_none());
}

#[tokio::test]
async fn test_bearer_token_from_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/content"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = resolver_for(&server, Session::with_token("secret-token"));
    resolver
        .resolve(&ContentRequest::new("holi-id"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_404_maps_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/content"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"detail": "Festival with id 'nope' not found"})),
        )
        .mount(&server)
        .await;

    let resolver = resolver_for(&server, Session::anonymous());
    let err = resolver.resolve_content("nope", None).await.unwrap_err();

    assert!(matches!(
        err,
        ResolveError::NotFound {
            kind: EntityKind::Festival,
            ..
        }
    ));
}

#[tokio::test]
async fn test_server_error_maps_to_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/content"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let resolver = resolver_for(&server, Session::anonymous());
    let err = resolver.resolve_content("holi-id", None).await.unwrap_err();
    assert!(err.is_unavailable());
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_undecodable_body_maps_to_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/content"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let resolver = resolver_for(&server, Session::anonymous());
    let err = resolver.resolve_content("holi-id", None).await.unwrap_err();
    assert!(err.is_unavailable());
}

#[tokio::test]
async fn test_unreachable_backend_is_unavailable() {
    // Bind then drop to get a port nobody listens on
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let resolver = RemoteResolver::new(
        RemoteConfig {
            base_url: format!("http://127.0.0.1:{port}"),
            timeout_seconds: 2,
            ..Default::default()
        },
        Session::anonymous(),
    )
    .unwrap();

    let err = resolver.resolve_content("holi-id", None).await.unwrap_err();
    assert!(err.is_unavailable());
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn test_config_selects_remote_provider() {
    let server = MockServer::start().await;

    let config = FestwishConfig {
        mode: ResolverMode::Remote,
        remote: RemoteConfig {
            base_url: server.uri(),
            ..Default::default()
        },
        ..Default::default()
    };

    let resolver = config.build_resolver(Session::anonymous()).unwrap();
    assert_eq!(resolver.name(), "remote");
}

fn backend_draft(custom_message: Option<&str>) -> WishDraft {
    WishDraft {
        festival_id: "6f1c2a9e-8d3b-4f57-9a61-0c2e5b7d4a10".to_string(),
        relationship_id: "b0d4e8a2-3c6f-4e19-8b75-2f9a1d6c3e84".to_string(),
        recipient_name: None,
        custom_message: custom_message.map(str::to_string),
    }
}

#[tokio::test]
async fn test_preview_goes_to_the_backend() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wishes/preview"))
        .and(query_param("festival_id", "6f1c2a9e-8d3b-4f57-9a61-0c2e5b7d4a10"))
        .and(query_param("relationship_id", "b0d4e8a2-3c6f-4e19-8b75-2f9a1d6c3e84"))
        .and(query_param("custom_message", "Happy Onam!"))
        .and(header("cache-control", "no-cache"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message_text": "Happy Onam!",
            "image_url": "",
            "quote_text": "Every flower is a soul blossoming in nature.",
            "quote_author": null,
            "festival_name": "Onam",
            "relationship_name": "Neighbour",
            "recipient_name": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = resolver_for(&server, Session::anonymous());
    let preview = resolver
        .preview(&backend_draft(Some("  Happy Onam!  ")))
        .await
        .unwrap();

    assert_eq!(preview.festival_name, "Onam");
    assert_eq!(preview.relationship_name, "Neighbour");
    assert_eq!(preview.message_text.as_deref(), Some("Happy Onam!"));
    assert_eq!(preview.image_url, None);
    assert_eq!(preview.quote_author, None);
}

#[tokio::test]
async fn test_preview_unknown_relationship_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wishes/preview"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "detail": "Relationship with id 'b0d4e8a2-3c6f-4e19-8b75-2f9a1d6c3e84' not found"
        })))
        .mount(&server)
        .await;

    let resolver = resolver_for(&server, Session::anonymous());
    let err = resolver.preview(&backend_draft(None)).await.unwrap_err();

    assert!(matches!(
        err,
        ResolveError::NotFound {
            kind: EntityKind::Relationship,
            ..
        }
    ));
}

#[tokio::test]
async fn test_remote_config_preview_skips_local_catalog() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wishes/preview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message_text": "Happy Pongal!",
            "image_url": "https://cdn.example.com/pongal.png",
            "festival_name": "Pongal",
            "relationship_name": "Brother"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = FestwishConfig {
        mode: ResolverMode::Remote,
        remote: RemoteConfig {
            base_url: server.uri(),
            ..Default::default()
        },
        ..Default::default()
    };

    let resolver = config.build_resolver(Session::anonymous()).unwrap();
    let preview = resolver.preview(&backend_draft(None)).await.unwrap();
    assert_eq!(preview.festival_name, "Pongal");
    assert_eq!(
        preview.image_url.as_deref(),
        Some("https://cdn.example.com/pongal.png")
    );
}
