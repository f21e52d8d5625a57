use serde::{Deserialize, Deserializer};

/// Reads an explicit `null` (`~`) the same way as a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Doc {
        #[serde(default, deserialize_with = "null_as_default")]
        items: Vec<i64>,
    }

    #[test]
    fn null_and_missing_read_as_empty() {
        let doc: Doc = serde_yaml::from_str("items: ~").unwrap();
        assert!(doc.items.is_empty());
        let doc: Doc = serde_yaml::from_str("items: null").unwrap();
        assert!(doc.items.is_empty());
        let doc: Doc = serde_yaml::from_str("{}").unwrap();
        assert!(doc.items.is_empty());
        let doc: Doc = serde_yaml::from_str("items: [-1, 2]").unwrap();
        assert_eq!(doc.items, vec![-1, 2]);
        assert!(serde_yaml::from_str::<Doc>("items: not-a-list").is_err());
    }
}
