use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub type Attributes = BTreeMap<String, Value>;

/// Verified identity produced by a successful authentication.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Principal {
    id: String,
    attributes: Attributes,
}

impl Principal {
    #[must_use]
    pub fn new(id: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            id: id.into(),
            attributes,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}

pub trait PrincipalFactory: Send + Sync {
    fn create_principal(&self, id: &str, attributes: Attributes) -> Principal;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPrincipalFactory;

impl PrincipalFactory for DefaultPrincipalFactory {
    fn create_principal(&self, id: &str, attributes: Attributes) -> Principal {
        Principal::new(id, attributes)
    }
}

/// Successful outcome of one handler.
#[derive(Debug, Clone, Serialize)]
pub struct HandlerResult {
    pub handler: String,
    pub organization: String,
    pub principal: Principal,
}
