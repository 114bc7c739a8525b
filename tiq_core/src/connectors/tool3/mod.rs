use crate::config::Settings;
use crate::connectors::rest::{AuthScheme, Endpoint, RestSource};
use crate::error::SourceError;
use crate::federated::SourceResult;
use crate::SourceAdapter;
use async_trait::async_trait;

const ENDPOINT: Endpoint = Endpoint {
    path: "/investigate",
    query_param: "indicator",
    auth: AuthScheme::Key,
};

pub struct Tool3Connector {
    rest: RestSource,
}

impl Tool3Connector {
    pub fn new(settings: &Settings) -> Result<Self, SourceError> {
        let rest = RestSource::new(&settings.tool3, ENDPOINT, settings.timeout)?;
        Ok(Self { rest })
    }
}

#[async_trait]
impl SourceAdapter for Tool3Connector {
    fn name(&self) -> &'static str {
        "tool3"
    }
    fn credential_key(&self) -> &'static str {
        self.rest.api_key_var()
    }
    fn has_credential(&self) -> bool {
        self.rest.has_api_key()
    }

    async fn query(&self, indicator: &str) -> SourceResult {
        SourceResult::from_fetch(self.name(), self.rest.get_json(indicator).await)
    }
}
