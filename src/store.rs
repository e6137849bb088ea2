//! Read-only access to stored credit applications.

use log::{debug, info};
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::options::{ClientOptions, ServerAddress};
use mongodb::sync::{Client, Collection};

use crate::config::StoreConfig;
use crate::error::GenerationError;
use crate::record::ApplicationRecord;

/// Collection holding the application records.
pub const APPLICATIONS_COLLECTION: &str = "solicitudes_credito";

/// Source of application records, looked up by identifier.
pub trait RecordStore {
    /// Fetches the record for `id`, returning `Ok(None)` when it does not exist.
    fn find_application(&self, id: &str) -> Result<Option<ApplicationRecord>, GenerationError>;
}

/// MongoDB-backed [`RecordStore`] using the synchronous driver API.
///
/// The client is owned by the store, so dropping the store closes the
/// connection pool.
pub struct MongoStore {
    _client: Client,
    collection: Collection<Document>,
}

impl MongoStore {
    /// Connects to the configured server and verifies it answers a `ping`.
    ///
    /// The driver connects lazily, so without the ping an unreachable server
    /// would only surface on the first query.
    pub fn connect(config: &StoreConfig) -> Result<Self, GenerationError> {
        info!(
            "Connecting to MongoDB at {}:{} (database '{}')",
            config.host, config.port, config.database
        );

        let options = ClientOptions::builder()
            .hosts(vec![ServerAddress::Tcp {
                host: config.host.clone(),
                port: Some(config.port),
            }])
            .server_selection_timeout(config.server_selection_timeout)
            .build();
        let client = Client::with_options(options).map_err(GenerationError::connection)?;

        let database = client.database(&config.database);
        database
            .run_command(doc! { "ping": 1 }, None)
            .map_err(GenerationError::connection)?;

        let collection = database.collection::<Document>(APPLICATIONS_COLLECTION);
        Ok(Self {
            _client: client,
            collection,
        })
    }
}

impl RecordStore for MongoStore {
    fn find_application(&self, id: &str) -> Result<Option<ApplicationRecord>, GenerationError> {
        let filter = doc! { "_id": { "$in": id_candidates(id) } };
        debug!("Looking up application with filter {}", filter);

        let document = self
            .collection
            .find_one(filter, None)
            .map_err(GenerationError::connection)?;

        document.map(ApplicationRecord::from_document).transpose()
    }
}

/// Values an `_id` may be stored as for the given identifier.
///
/// Records created by the web application use string identifiers, but records
/// imported directly into MongoDB carry native ObjectIds, and callers may pass
/// numeric ids. MongoDB compares numbers across types, so one `Int64` also
/// matches `Int32` and `Double` ids of the same value.
pub fn id_candidates(id: &str) -> Vec<Bson> {
    let mut candidates = vec![Bson::String(id.to_owned())];
    if let Ok(oid) = ObjectId::parse_str(id) {
        candidates.push(Bson::ObjectId(oid));
    }
    if let Ok(number) = id.parse::<i64>() {
        candidates.push(Bson::Int64(number));
    }
    candidates
}
