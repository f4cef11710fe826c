use std::path::Path;

use crate::domain::{models::Property, StoreError};

use super::InMemoryPropertyStore;

/// Parse a JSON array of property records.
pub fn parse_seed(json: &str) -> Result<InMemoryPropertyStore, StoreError> {
    let properties: Vec<Property> =
        serde_json::from_str(json).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    Ok(InMemoryPropertyStore::new(properties))
}

/// Read and parse a seed file.
pub async fn load_seed(path: impl AsRef<Path>) -> Result<InMemoryPropertyStore, StoreError> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StoreError::Unavailable(format!("{}: {}", path.display(), e)))?;

    let store = parse_seed(&json)?;
    if store.is_empty() {
        tracing::warn!("Seed file {} contains no properties", path.display());
    }
    tracing::info!("Loaded {} properties from {}", store.len(), path.display());
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::outbound::PropertyStore;

    #[tokio::test]
    async fn round_trips_every_field() {
        let json = r#"[{
            "pin": "17-10-100-100-0000",
            "year": 2024,
            "class_code": "5-97",
            "address": "233 S WACKER DR",
            "latitude": 41.8789,
            "longitude": -87.6359,
            "zip_code": "60606",
            "ward_num": 42,
            "community_area_name": "LOOP",
            "tax_park_district_name": "CHICAGO PARK DISTRICT",
            "env_airport_noise_dnl": 52.5
        }]"#;

        let store = parse_seed(json).unwrap();
        let found = store.find_by_pin("17-10-100-100-0000").await.unwrap().unwrap();

        let mut expected = Property::new("17-10-100-100-0000");
        expected.year = Some(2024);
        expected.class_code = Some("5-97".to_string());
        expected.address = Some("233 S WACKER DR".to_string());
        expected.latitude = Some(41.8789);
        expected.longitude = Some(-87.6359);
        expected.zip_code = Some("60606".to_string());
        expected.ward_num = Some(42);
        expected.community_area_name = Some("LOOP".to_string());
        expected.tax.tax_park_district_name = Some("CHICAGO PARK DISTRICT".to_string());
        expected.environment.env_airport_noise_dnl = Some(52.5);

        assert_eq!(found, expected);
    }

    #[test]
    fn malformed_seed_is_corrupt() {
        let err = parse_seed("{not json").unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[tokio::test]
    async fn bundled_seed_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/properties.json");
        let store = load_seed(path).await.unwrap();

        assert!(!store.is_empty());
        let found = store.find_by_pin("17-10-100-100-0000").await.unwrap().unwrap();
        assert_eq!(found.pin10, "1710100100");
    }

    #[tokio::test]
    async fn empty_seed_loads_empty_store() {
        let path = std::env::temp_dir().join(format!("empty-seed-{}.json", std::process::id()));
        tokio::fs::write(&path, "[]").await.unwrap();

        let store = load_seed(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let err = load_seed("/nonexistent/properties.json").await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
