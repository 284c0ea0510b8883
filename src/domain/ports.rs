use crate::domain::model::{Sample, SampleRequest};
use crate::domain::plate::PlateGeometry;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Server-side store of samples, keyed by the entry they belong to.
#[async_trait]
pub trait SampleRepository: Send + Sync {
    async fn list(&self, entry_id: i64) -> Result<Vec<Sample>>;
    /// Persists `sample` and returns the entry's updated sample collection.
    async fn create(&self, entry_id: i64, sample: &Sample) -> Result<Vec<Sample>>;
    async fn delete(&self, entry_id: i64, sample_id: i64) -> Result<()>;
    async fn request(&self, request: &SampleRequest) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn session_id(&self) -> Option<&str>;
    fn plate_geometry(&self) -> PlateGeometry;
    fn addgene_base_url(&self) -> &str;
}
