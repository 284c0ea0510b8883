use crate::domain::plate::CellCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of container a location node stands for. The set is open: tags the
/// registry adds later survive a round trip as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LocationType {
    Well,
    Tube,
    AddGene,
    Plate96,
    Shelf,
    BoxIndexed,
    Scheme,
    Other(String),
}

impl LocationType {
    pub fn as_str(&self) -> &str {
        match self {
            LocationType::Well => "WELL",
            LocationType::Tube => "TUBE",
            LocationType::AddGene => "ADDGENE",
            LocationType::Plate96 => "PLATE96",
            LocationType::Shelf => "SHELF",
            LocationType::BoxIndexed => "BOX_INDEXED",
            LocationType::Scheme => "SCHEME",
            LocationType::Other(tag) => tag,
        }
    }
}

impl From<&str> for LocationType {
    fn from(tag: &str) -> Self {
        match tag {
            "WELL" => LocationType::Well,
            "TUBE" => LocationType::Tube,
            "ADDGENE" => LocationType::AddGene,
            "PLATE96" => LocationType::Plate96,
            "SHELF" => LocationType::Shelf,
            "BOX_INDEXED" => LocationType::BoxIndexed,
            "SCHEME" => LocationType::Scheme,
            other => LocationType::Other(other.to_string()),
        }
    }
}

impl From<String> for LocationType {
    fn from(tag: String) -> Self {
        LocationType::from(tag.as_str())
    }
}

impl From<LocationType> for String {
    fn from(kind: LocationType) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One level of physical containment. The chain is owned top-down, so it
/// cannot form a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationNode {
    #[serde(rename = "type")]
    pub kind: LocationType,
    #[serde(default)]
    pub display: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child: Option<Box<LocationNode>>,
}

impl LocationNode {
    pub fn new(kind: LocationType, display: impl Into<String>) -> Self {
        Self {
            kind,
            display: display.into(),
            child: None,
        }
    }

    pub fn well(code: CellCode) -> Self {
        Self::new(LocationType::Well, code.to_string())
    }

    pub fn tube(barcode: impl Into<String>) -> Self {
        Self::new(LocationType::Tube, barcode)
    }

    pub fn addgene(catalog_id: impl Into<String>) -> Self {
        Self::new(LocationType::AddGene, catalog_id)
    }

    pub fn with_child(mut self, child: LocationNode) -> Self {
        self.child = Some(Box::new(child));
        self
    }

    /// Walks from this node down through its children.
    pub fn iter(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    pub fn find(&self, kind: &LocationType) -> Option<&LocationNode> {
        self.iter().find(|node| &node.kind == kind)
    }

    pub fn depth(&self) -> usize {
        self.iter().count()
    }
}

impl<'a> IntoIterator for &'a LocationNode {
    type Item = &'a LocationNode;
    type IntoIter = Chain<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Chain<'a> {
    next: Option<&'a LocationNode>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a LocationNode;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.child.as_deref();
        Some(current)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Depositor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl Account {
    pub fn as_depositor(&self) -> Depositor {
        Depositor {
            id: Some(self.id),
            email: self.email.clone(),
        }
    }
}

/// A physical specimen of a registry entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Cell the location was recorded against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CellCode>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub location: Option<LocationNode>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub depositor: Depositor,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub in_cart: bool,
}

impl Sample {
    pub fn for_depositor(depositor: Depositor) -> Self {
        Self {
            depositor,
            ..Default::default()
        }
    }

    pub fn root_kind(&self) -> Option<&LocationType> {
        self.location.as_ref().map(|root| &root.kind)
    }

    /// Iterates the location chain; empty when the sample has no location.
    pub fn chain(&self) -> impl Iterator<Item = &LocationNode> {
        self.location.iter().flat_map(|root| root.iter())
    }

    pub fn find_location(&self, kind: &LocationType) -> Option<&LocationNode> {
        self.chain().find(|node| &node.kind == kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SampleRequestType {
    LiquidCulture,
    StreakOnAgarPlate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRef {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleRequest {
    pub request_type: SampleRequestType,
    pub growth_temperature: u8,
    pub part_data: PartRef,
    pub plate_description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_location_type_tags() {
        assert_eq!(LocationType::from("WELL"), LocationType::Well);
        assert_eq!(LocationType::from("ADDGENE"), LocationType::AddGene);
        assert_eq!(
            LocationType::from("FREEZER"),
            LocationType::Other("FREEZER".to_string())
        );
        assert_eq!(LocationType::Other("FREEZER".to_string()).as_str(), "FREEZER");
        assert_eq!(LocationType::BoxIndexed.to_string(), "BOX_INDEXED");
    }

    #[test]
    fn test_chain_walk() {
        let root = LocationNode::new(LocationType::Well, "305").with_child(LocationNode::tube("B1"));
        let kinds: Vec<&LocationType> = root.iter().map(|n| &n.kind).collect();
        assert_eq!(kinds, vec![&LocationType::Well, &LocationType::Tube]);
        assert_eq!(root.depth(), 2);
        assert_eq!(root.find(&LocationType::Tube).unwrap().display, "B1");
        assert!(root.find(&LocationType::AddGene).is_none());
    }

    #[test]
    fn test_sample_without_location_has_empty_chain() {
        let sample = Sample::default();
        assert_eq!(sample.chain().count(), 0);
        assert!(sample.root_kind().is_none());
        assert!(sample.find_location(&LocationType::Well).is_none());
    }

    #[test]
    fn test_sample_wire_shape() {
        let value = json!({
            "id": 42,
            "code": "305",
            "label": "pSB1C3",
            "location": {
                "type": "WELL",
                "display": "305",
                "child": {"type": "TUBE", "display": "TB0001"}
            },
            "comments": [{"id": 1, "message": "glycerol stock"}],
            "depositor": {"id": 7, "email": "lab@example.org"},
            "creationTime": 1420070400000i64,
            "inCart": true
        });

        let sample: Sample = serde_json::from_value(value).unwrap();
        assert_eq!(sample.id, Some(42));
        assert_eq!(sample.code.unwrap().to_string(), "305");
        assert_eq!(sample.find_location(&LocationType::Tube).unwrap().display, "TB0001");
        assert_eq!(sample.depositor.email, "lab@example.org");
        assert_eq!(sample.creation_time.unwrap().timestamp_millis(), 1420070400000);
        assert!(sample.in_cart);

        let written = serde_json::to_value(&sample).unwrap();
        assert_eq!(written["location"]["child"]["type"], "TUBE");
        assert!(written["location"]["child"].get("child").is_none());
    }

    #[test]
    fn test_request_wire_shape() {
        let request = SampleRequest {
            request_type: SampleRequestType::StreakOnAgarPlate,
            growth_temperature: 37,
            part_data: PartRef { id: 12 },
            plate_description: "LB Kan50".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["requestType"], "STREAK_ON_AGAR_PLATE");
        assert_eq!(value["growthTemperature"], 37);
        assert_eq!(value["partData"]["id"], 12);
    }
}
