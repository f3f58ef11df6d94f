#![allow(clippy::unwrap_used)]

use orgauth::authn::{
    AcceptOrgUsersHandler, AllowList, AuthenticationChain, AuthenticationError, CaseConversion,
    ChainError, ConvertCasePrincipalNameTransformer, Credential, CredentialNormalizer,
    FailureKind, HttpTokenExchange, NoOpPasswordEncoder, TOKEN_ATTRIBUTE, TokenExchangeOptions,
};
use serde_json::json;
use std::{net::TcpListener, sync::Arc, time::Duration};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn chain(server: &MockServer, users: AllowList, timeout: Duration) -> AuthenticationChain {
    let exchange = HttpTokenExchange::new(
        "orgauth-test",
        &server.uri(),
        TokenExchangeOptions {
            timeout,
            connect_timeout: Duration::from_secs(1),
        },
    )
    .unwrap();

    let handler = AcceptOrgUsersHandler::new("accept-org-users", users, Arc::new(exchange));

    AuthenticationChain::new().with_handler(Arc::new(handler))
}

fn last_error(error: &ChainError) -> &AuthenticationError {
    &error.failures().last().unwrap().error
}

#[tokio::test]
async fn test_login_attaches_token() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost in this environment");
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/acme/token"))
        .and(body_json(json!({"username": "alice", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("tok-123"))
        .expect(1)
        .mount(&server)
        .await;

    let chain = chain(
        &server,
        AllowList::new([("alice", "secret")]),
        Duration::from_secs(5),
    );

    let result = chain
        .authenticate(&Credential::new("acme", "alice", "secret"))
        .await
        .unwrap();

    assert_eq!(result.handler, "accept-org-users");
    assert_eq!(result.organization, "acme");
    assert_eq!(result.principal.id(), "alice");
    assert_eq!(result.principal.attribute(TOKEN_ATTRIBUTE), Some(&json!("tok-123")));
    assert_eq!(result.principal.attributes().len(), 1);
}

#[tokio::test]
async fn test_wrong_password_never_calls_token_service() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost in this environment");
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("tok-123"))
        .expect(0)
        .mount(&server)
        .await;

    let chain = chain(
        &server,
        AllowList::new([("alice", "secret")]),
        Duration::from_secs(5),
    );

    let error = chain
        .authenticate(&Credential::new("acme", "alice", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(error.kind(), Some(FailureKind::BadCredentials));
    assert!(matches!(last_error(&error), AuthenticationError::PasswordMismatch));

    let error = chain
        .authenticate(&Credential::new("acme", "bob", "secret"))
        .await
        .unwrap_err();

    assert_eq!(error.kind(), Some(FailureKind::IdentityNotFound));
    assert!(matches!(last_error(&error), AuthenticationError::UnknownUser(user) if user == "bob"));
}

#[tokio::test]
async fn test_empty_allow_list() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost in this environment");
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("tok-123"))
        .expect(0)
        .mount(&server)
        .await;

    let chain = chain(&server, AllowList::default(), Duration::from_secs(5));

    let error = chain
        .authenticate(&Credential::new("acme", "alice", "secret"))
        .await
        .unwrap_err();

    assert_eq!(error.kind(), Some(FailureKind::ConfigurationEmpty));
}

#[tokio::test]
async fn test_token_service_rejection() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost in this environment");
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/acme/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "nope"})))
        .expect(1)
        .mount(&server)
        .await;

    let chain = chain(
        &server,
        AllowList::new([("alice", "secret")]),
        Duration::from_secs(5),
    );

    let error = chain
        .authenticate(&Credential::new("acme", "alice", "secret"))
        .await
        .unwrap_err();

    assert_eq!(error.kind(), Some(FailureKind::IdentityNotFound));
    match last_error(&error) {
        AuthenticationError::TokenExchange {
            organization,
            source,
        } => {
            assert_eq!(organization, "acme");
            assert!(source.is_rejection());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_token_service_timeout() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost in this environment");
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("tok-123")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let chain = chain(
        &server,
        AllowList::new([("alice", "secret")]),
        Duration::from_millis(200),
    );

    let error = chain
        .authenticate(&Credential::new("acme", "alice", "secret"))
        .await
        .unwrap_err();

    assert_eq!(error.kind(), Some(FailureKind::IdentityNotFound));
    assert!(matches!(
        last_error(&error),
        AuthenticationError::TokenExchange { .. }
    ));
}

#[tokio::test]
async fn test_token_service_receives_original_username() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost in this environment");
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/acme/token"))
        .and(body_json(json!({"username": "Alice", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("tok-456"))
        .expect(1)
        .mount(&server)
        .await;

    let exchange = HttpTokenExchange::new(
        "orgauth-test",
        &server.uri(),
        TokenExchangeOptions::default(),
    )
    .unwrap();

    let handler = AcceptOrgUsersHandler::new(
        "accept-org-users",
        AllowList::new([("alice", "secret")]),
        Arc::new(exchange),
    )
    .with_normalizer(CredentialNormalizer::new(
        Arc::new(ConvertCasePrincipalNameTransformer::new(CaseConversion::Lower)),
        Arc::new(NoOpPasswordEncoder),
    ));

    let chain = AuthenticationChain::new().with_handler(Arc::new(handler));

    let result = chain
        .authenticate(&Credential::new("acme", "Alice", "secret"))
        .await
        .unwrap();

    assert_eq!(result.principal.id(), "alice");
    assert_eq!(result.principal.attribute(TOKEN_ATTRIBUTE), Some(&json!("tok-456")));
}
