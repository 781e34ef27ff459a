//! MongoDB backend and the startup connectivity probe.

use std::time::Duration;

use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, Tls, TlsOptions};
use mongodb::{Client, Collection};
use tracing::{info, warn};

use super::StorageError;
use crate::models::prediction::PredictionRecord;

pub const DATABASE_NAME: &str = "heart_disease_db";
pub const COLLECTION_NAME: &str = "user_predictions";

const PROBE_TIMEOUT: Duration = Duration::from_millis(5000);
/// Failure reasons are capped so a TLS chain dump doesn't flood the log.
const REASON_CAP: usize = 120;

/// TLS trust strategies, tried in order. Different network environments
/// need different trust configurations, so the probe tries each cheaply
/// instead of requiring the right one upfront.
const STRATEGIES: [TrustStrategy; 3] = [
    TrustStrategy::InsecureTls,
    TrustStrategy::AllowInvalidCerts,
    TrustStrategy::DefaultTrust,
];

#[derive(Debug, Clone, Copy)]
enum TrustStrategy {
    /// Invalid certificates and hostnames both accepted.
    InsecureTls,
    /// Invalid certificates accepted, hostnames still verified.
    AllowInvalidCerts,
    /// The driver's default trust store, options untouched.
    DefaultTrust,
}

impl TrustStrategy {
    fn label(self) -> &'static str {
        match self {
            TrustStrategy::InsecureTls => "tlsInsecure",
            TrustStrategy::AllowInvalidCerts => "tlsAllowInvalidCertificates",
            TrustStrategy::DefaultTrust => "default trust store",
        }
    }

    fn apply(self, options: &mut ClientOptions) {
        let mut tls = TlsOptions::default();
        match self {
            TrustStrategy::InsecureTls => {
                tls.allow_invalid_certificates = Some(true);
                tls.allow_invalid_hostnames = Some(true);
            }
            TrustStrategy::AllowInvalidCerts => {
                tls.allow_invalid_certificates = Some(true);
            }
            TrustStrategy::DefaultTrust => return,
        }
        options.tls = Some(Tls::Enabled(tls));
    }
}

/// MongoDB-backed record store over a fixed collection.
pub struct MongoStore {
    collection: Collection<PredictionRecord>,
}

impl MongoStore {
    pub async fn append(&self, record: &PredictionRecord) -> Result<(), StorageError> {
        self.collection.insert_one(record, None).await?;
        Ok(())
    }

    /// Every stored record. Deserializing into the typed record drops the
    /// collection's internal `_id` field.
    pub async fn list_all(&self) -> Result<Vec<PredictionRecord>, StorageError> {
        let cursor = self.collection.find(None, None).await?;
        Ok(cursor.try_collect().await?)
    }
}

/// Try each trust strategy in order against the given URI. The first whose
/// admin ping succeeds supplies the store; if all fail, return `None` so
/// the caller can fall back to local storage.
///
/// Runs exactly once, at process start.
pub async fn probe(uri: &str) -> Option<MongoStore> {
    for (attempt, strategy) in STRATEGIES.iter().enumerate() {
        info!("MongoDB connection attempt {}: {}", attempt + 1, strategy.label());
        match try_connect(uri, *strategy).await {
            Ok(client) => {
                info!("connected to MongoDB with {}", strategy.label());
                let collection = client
                    .database(DATABASE_NAME)
                    .collection::<PredictionRecord>(COLLECTION_NAME);
                return Some(MongoStore { collection });
            }
            Err(error) => {
                warn!(
                    "MongoDB connection attempt failed: {}",
                    truncate_reason(&error.to_string())
                );
            }
        }
    }
    None
}

async fn try_connect(uri: &str, strategy: TrustStrategy) -> mongodb::error::Result<Client> {
    let mut options = ClientOptions::parse(uri).await?;
    options.server_selection_timeout = Some(PROBE_TIMEOUT);
    options.connect_timeout = Some(PROBE_TIMEOUT);
    strategy.apply(&mut options);

    let client = Client::with_options(options)?;
    // Liveness probe; connection setup alone proves nothing with lazy drivers.
    client
        .database("admin")
        .run_command(doc! {"ping": 1}, None)
        .await?;
    Ok(client)
}

fn truncate_reason(reason: &str) -> String {
    reason.chars().take(REASON_CAP).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_reason_is_untouched() {
        assert_eq!(truncate_reason("connection refused"), "connection refused");
    }

    #[test]
    fn long_reason_is_capped_at_120_chars() {
        let long = "x".repeat(500);
        assert_eq!(truncate_reason(&long).chars().count(), 120);
    }

    #[test]
    fn strategies_are_ordered_most_permissive_first() {
        assert_eq!(STRATEGIES[0].label(), "tlsInsecure");
        assert_eq!(STRATEGIES[1].label(), "tlsAllowInvalidCertificates");
        assert_eq!(STRATEGIES[2].label(), "default trust store");
    }

    #[tokio::test]
    async fn probe_returns_none_for_unreachable_uri() {
        // Nothing listens on this port; every strategy must fail without
        // an error escaping.
        let result = probe("mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=100").await;
        assert!(result.is_none());
    }
}
