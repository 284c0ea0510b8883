use crate::domain::model::{Sample, SampleRequest};
use crate::domain::ports::{ConfigProvider, SampleRepository};
use crate::utils::error::{IceError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use url::Url;

pub const SESSION_HEADER: &str = "X-ICE-Authentication-SessionId";

/// Sample collections come back either bare or wrapped in a `data` field.
#[derive(Deserialize)]
#[serde(untagged)]
enum SamplesPayload {
    List(Vec<Sample>),
    Wrapped { data: Vec<Sample> },
}

impl SamplesPayload {
    fn into_samples(self) -> Vec<Sample> {
        match self {
            SamplesPayload::List(samples) | SamplesPayload::Wrapped { data: samples } => samples,
        }
    }
}

pub struct RestSampleRepository {
    client: Client,
    base_url: Url,
    session_id: Option<String>,
}

impl RestSampleRepository {
    pub fn new(base_url: &str, session_id: Option<String>) -> Result<Self> {
        crate::utils::validation::validate_url("server.endpoint", base_url)?;

        let mut normalized = base_url.to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url = Url::parse(&normalized).map_err(|e| IceError::InvalidConfigValueError {
            field: "server.endpoint".to_string(),
            value: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client: Client::new(),
            base_url,
            session_id,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.api_endpoint(), config.session_id().map(str::to_string))
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| IceError::ValidationError {
                message: format!("Cannot build URL for {}: {}", path, e),
            })
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.session_id {
            Some(session_id) => builder.header(SESSION_HEADER, session_id),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = self.authorize(builder).send().await?;
        let status = response.status();
        tracing::debug!("Registry responded with {}", status);

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IceError::PersistenceError {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn read_samples(response: Response) -> Result<Vec<Sample>> {
        let body = response.bytes().await?;
        let payload: SamplesPayload = serde_json::from_slice(&body)?;
        Ok(payload.into_samples())
    }
}

#[async_trait]
impl SampleRepository for RestSampleRepository {
    async fn list(&self, entry_id: i64) -> Result<Vec<Sample>> {
        let url = self.url(&format!("rest/parts/{}/samples", entry_id))?;
        tracing::debug!("Listing samples: GET {}", url);
        let response = self.send(self.client.get(url)).await?;
        Self::read_samples(response).await
    }

    async fn create(&self, entry_id: i64, sample: &Sample) -> Result<Vec<Sample>> {
        let url = self.url(&format!("rest/parts/{}/samples", entry_id))?;
        tracing::debug!("Creating sample: POST {}", url);
        let response = self.send(self.client.post(url).json(sample)).await?;
        Self::read_samples(response).await
    }

    async fn delete(&self, entry_id: i64, sample_id: i64) -> Result<()> {
        let url = self.url(&format!("rest/parts/{}/samples/{}", entry_id, sample_id))?;
        tracing::debug!("Deleting sample: DELETE {}", url);
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn request(&self, request: &SampleRequest) -> Result<()> {
        let url = self.url("rest/samples/requests")?;
        tracing::debug!("Requesting sample: POST {}", url);
        self.send(self.client.post(url).json(request)).await?;
        Ok(())
    }
}
