/// Descriptive record minted alongside a snapshot image.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    pub id: u64,
    /// Milliseconds since the unix epoch.
    pub timestamp: i64,
    pub total_changes: usize,
    pub participant_count: usize,
    pub participants: Vec<String>,
    pub canvas_size: usize,
    pub color_palette: Vec<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub attributes: Vec<Attribute>,
}

impl SnapshotMetadata {
    pub fn attribute(&self, trait_type: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|attribute| attribute.trait_type == trait_type)
            .map(|attribute| &attribute.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: AttributeValue,
}

impl Attribute {
    pub fn new(trait_type: &str, value: impl Into<AttributeValue>) -> Self {
        Self {
            trait_type: trait_type.to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(u64),
    Text(String),
}

impl From<u64> for AttributeValue {
    fn from(value: u64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<usize> for AttributeValue {
    fn from(value: usize) -> Self {
        AttributeValue::Number(value as u64)
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}
