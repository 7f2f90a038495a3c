//! Store configuration and fixed tagging constants.

use ai_llm_service::error_handler::var_or;

use crate::errors::TaggerError;

/// Default MongoDB address when `MONGO_URI` is unset.
pub const DEFAULT_MONGO_URI: &str = "mongodb://127.0.0.1:27017";
/// Database holding tagged questions.
pub const DATABASE: &str = "paper_gen";
/// Collection holding tagged questions.
pub const COLLECTION: &str = "questions";
/// Records returned by the listing helper when no limit is given.
pub const DEFAULT_LIST_LIMIT: u64 = 5;

/// Where tagged questions are stored.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Connection string, e.g. `mongodb://127.0.0.1:27017`.
    pub mongo_uri: String,
    /// Target database name.
    pub database: String,
    /// Target collection name.
    pub collection: String,
}

impl StoreConfig {
    /// `MONGO_URI` (or the local default) with the fixed database/collection.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`StoreConfig::from_env`] over an arbitrary variable lookup.
    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            mongo_uri: var_or(get("MONGO_URI"), DEFAULT_MONGO_URI),
            database: DATABASE.to_string(),
            collection: COLLECTION.to_string(),
        }
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), TaggerError> {
        if !(self.mongo_uri.starts_with("mongodb://") || self.mongo_uri.starts_with("mongodb+srv://"))
        {
            return Err(TaggerError::Config(
                "MONGO_URI must start with mongodb:// or mongodb+srv://".into(),
            ));
        }
        if self.database.trim().is_empty() {
            return Err(TaggerError::Config("database is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(TaggerError::Config("collection is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(uri: &str) -> StoreConfig {
        StoreConfig {
            mongo_uri: uri.into(),
            database: DATABASE.into(),
            collection: COLLECTION.into(),
        }
    }

    #[test]
    fn defaults_target_paper_gen_questions() {
        let c = StoreConfig::from_lookup(|_| None);
        assert_eq!(c.mongo_uri, "mongodb://127.0.0.1:27017");
        assert_eq!(c.database, "paper_gen");
        assert_eq!(c.collection, "questions");
        assert_eq!(DEFAULT_LIST_LIMIT, 5);
    }

    #[test]
    fn mongo_uri_is_the_only_override() {
        let c = StoreConfig::from_lookup(|name| match name {
            "MONGO_URI" => Some("mongodb+srv://cluster.example.net".into()),
            _ => Some("ignored".into()),
        });
        assert_eq!(c.mongo_uri, "mongodb+srv://cluster.example.net");
        assert_eq!(c.database, DATABASE);
        assert_eq!(c.collection, COLLECTION);

        let blank = StoreConfig::from_lookup(|_| Some("  ".into()));
        assert_eq!(blank.mongo_uri, DEFAULT_MONGO_URI);
    }

    #[test]
    fn accepts_mongo_schemes() {
        assert!(cfg(DEFAULT_MONGO_URI).validate().is_ok());
        assert!(cfg("mongodb+srv://cluster.example.net").validate().is_ok());
    }

    #[test]
    fn rejects_other_schemes_and_empty_names() {
        assert!(matches!(
            cfg("http://127.0.0.1:27017").validate(),
            Err(TaggerError::Config(_))
        ));
        let mut c = cfg(DEFAULT_MONGO_URI);
        c.collection = " ".into();
        assert!(c.validate().is_err());
    }
}
