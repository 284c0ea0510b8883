use crate::domain::model::{Account, LocationType, Sample};
use crate::utils::error::{IceError, Result};
use url::Url;

pub const DEFAULT_ADDGENE_BASE_URL: &str = "https://www.addgene.org/";

fn is_addgene(sample: &Sample) -> bool {
    sample.root_kind() == Some(&LocationType::AddGene)
}

/// Whether the entry is distributed through AddGene rather than internal stock.
pub fn is_addgene_sample(samples: &[Sample]) -> bool {
    samples.iter().any(is_addgene)
}

/// Catalog id of the first AddGene sample, in input order.
pub fn addgene_link(samples: &[Sample]) -> Option<&str> {
    samples
        .iter()
        .find(|sample| is_addgene(sample))
        .and_then(|sample| sample.location.as_ref())
        .map(|root| root.display.as_str())
}

pub fn addgene_url(base_url: &str, samples: &[Sample]) -> Result<Option<Url>> {
    let Some(catalog_id) = addgene_link(samples) else {
        return Ok(None);
    };

    let base = Url::parse(base_url).map_err(|e| IceError::InvalidConfigValueError {
        field: "addgene.base_url".to_string(),
        value: base_url.to_string(),
        reason: e.to_string(),
    })?;
    let url = base.join(catalog_id).map_err(|e| IceError::ValidationError {
        message: format!("AddGene id {:?} does not form a URL: {}", catalog_id, e),
    })?;
    Ok(Some(url))
}

pub fn has_comments(samples: &[Sample]) -> bool {
    samples.iter().any(|sample| !sample.comments.is_empty())
}

/// Deletion is reserved to administrators viewing the local registry.
pub fn can_delete(account: Option<&Account>, remote: bool) -> bool {
    !remote && account.is_some_and(|account| account.is_admin)
}
