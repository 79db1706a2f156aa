//! Recipe data as served by the backend.

use serde::{Deserialize, Deserializer, Serialize};

/// A dish published by the recipe API. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "imageUrl")]
    pub image: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub diet: String,
    /// Minutes.
    #[serde(default)]
    pub cook_time: u32,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub servings: u32,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A browsable recipe category.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub count: Option<u32>,
}

/// One page of list results in canonical form, whatever shape the server used.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecipePage {
    pub recipes: Vec<Recipe>,
    pub total: u64,
    pub has_more: bool,
    pub page: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Int(i64),
    Float(f64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::Text(s) => s,
            StringOrNumber::Int(n) => n.to_string(),
            StringOrNumber::Float(n) => n.to_string(),
        }
    }
}

/// Identifiers arrive as strings or numbers depending on the backend.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(String::from))
}
