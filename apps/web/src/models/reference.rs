use serde::{Deserialize, Serialize};

/// A `{ _id, name }` lookup row as served by the reference endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl NamedRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

pub type Category = NamedRef;
pub type Specialty = NamedRef;
pub type Skill = NamedRef;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_reference_list() {
        let raw = r#"[{"_id":"c1","name":"Design"},{"_id":"c2"}]"#;
        let items: Vec<Category> = serde_json::from_str(raw).unwrap();
        assert_eq!(items[0], NamedRef::new("c1", "Design"));
        assert_eq!(items[1].name, "");
    }
}
