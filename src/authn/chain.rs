use super::{
    credential::Credential,
    error::{ChainError, HandlerFailure},
    handler::AuthenticationHandler,
    principal::HandlerResult,
};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Ordered list of strategies; the first success wins.
#[derive(Clone, Default)]
pub struct AuthenticationChain {
    handlers: Vec<Arc<dyn AuthenticationHandler>>,
}

impl AuthenticationChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_handler(mut self, handler: Arc<dyn AuthenticationHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run supporting handlers in order, each on its own copy of `credential`.
    ///
    /// # Errors
    /// `NoSupportingHandler` if nothing accepts the credential, otherwise
    /// `Failed` with every handler's rejection in the order tried.
    #[instrument(skip(self), fields(handlers = self.handlers.len()))]
    pub async fn authenticate(&self, credential: &Credential) -> Result<HandlerResult, ChainError> {
        let mut failures = Vec::new();

        for handler in &self.handlers {
            if !handler.supports(credential) {
                debug!("{} does not support credential", handler.name());
                continue;
            }

            let mut attempt = credential.clone();

            match handler.authenticate(&mut attempt).await {
                Ok(result) => return Ok(result),
                Err(error) => {
                    debug!("{} failed: {} ({})", handler.name(), error, error.kind());
                    failures.push(HandlerFailure {
                        handler: handler.name().to_string(),
                        error,
                    });
                }
            }
        }

        if failures.is_empty() {
            Err(ChainError::NoSupportingHandler)
        } else {
            Err(ChainError::Failed(failures))
        }
    }
}

impl std::fmt::Debug for AuthenticationChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.handlers.iter().map(|handler| handler.name()).collect();
        f.debug_struct("AuthenticationChain")
            .field("handlers", &names)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::authn::{
        allow_list::AllowList,
        error::FailureKind,
        handler::{AcceptOrgUsersHandler, tests::StubExchange},
    };

    fn accept(name: &str, users: &[(&str, &str)], exchange: Arc<StubExchange>) -> Arc<AcceptOrgUsersHandler> {
        Arc::new(AcceptOrgUsersHandler::new(
            name,
            AllowList::new(users.iter().copied()),
            exchange,
        ))
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let first = StubExchange::returning("tok-first");
        let second = StubExchange::returning("tok-second");
        let chain = AuthenticationChain::new()
            .with_handler(accept("first", &[("alice", "secret")], first.clone()))
            .with_handler(accept("second", &[("alice", "secret")], second.clone()));

        let result = chain
            .authenticate(&Credential::new("acme", "alice", "secret"))
            .await
            .unwrap();

        assert_eq!(result.handler, "first");
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 0);
    }

    #[tokio::test]
    async fn test_falls_through_to_next_handler() {
        let first = StubExchange::returning("tok-first");
        let second = StubExchange::returning("tok-second");
        let chain = AuthenticationChain::new()
            .with_handler(accept("staff", &[("carol", "pw")], first.clone()))
            .with_handler(accept("students", &[("alice", "secret")], second.clone()));

        let result = chain
            .authenticate(&Credential::new("acme", "alice", "secret"))
            .await
            .unwrap();

        assert_eq!(result.handler, "students");
        assert_eq!(result.principal.id(), "alice");
        assert_eq!(first.calls(), 0);
    }

    #[tokio::test]
    async fn test_collects_failures_in_order() {
        let chain = AuthenticationChain::new()
            .with_handler(accept("empty", &[], StubExchange::returning("tok")))
            .with_handler(accept("strict", &[("alice", "secret")], StubExchange::returning("tok")));

        let error = chain
            .authenticate(&Credential::new("acme", "alice", "wrong"))
            .await
            .unwrap_err();

        let failures = error.failures();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].handler, "empty");
        assert_eq!(failures[0].error.kind(), FailureKind::ConfigurationEmpty);
        assert_eq!(failures[1].handler, "strict");
        assert_eq!(error.kind(), Some(FailureKind::BadCredentials));
    }

    #[tokio::test]
    async fn test_each_handler_sees_raw_credential() {
        let chain = AuthenticationChain::new()
            .with_handler(accept("one", &[("bob", "x")], StubExchange::returning("tok")))
            .with_handler(accept("two", &[("Alice", "secret")], StubExchange::returning("tok")));

        let credential = Credential::new("acme", "Alice", "secret");
        let result = chain.authenticate(&credential).await.unwrap();

        assert_eq!(result.principal.id(), "Alice");
        assert_eq!(credential.username(), "Alice");
    }

    #[tokio::test]
    async fn test_no_supporting_handler() {
        let exchange = StubExchange::returning("tok");
        let chain = AuthenticationChain::new().with_handler(accept(
            "accept",
            &[("alice", "secret")],
            exchange.clone(),
        ));

        let error = chain
            .authenticate(&Credential::new("", "alice", "secret"))
            .await
            .unwrap_err();

        assert!(matches!(error, ChainError::NoSupportingHandler));
        assert_eq!(exchange.calls(), 0);

        let empty = AuthenticationChain::new();
        assert!(empty.is_empty());
        assert!(matches!(
            empty
                .authenticate(&Credential::new("acme", "alice", "secret"))
                .await,
            Err(ChainError::NoSupportingHandler)
        ));
    }
}
