use crate::config::mongo_conf::MongoConfig;
use crate::model::lead::Lead;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{error, info};

/// Write side of the lead store. Leads are insert-only: once stored they
/// belong to the back office, so there is no update or delete here.
#[async_trait]
pub trait LeadRepository: Send + Sync {
    async fn create(&self, lead: Lead) -> RepositoryResult<Lead>;
}

pub struct MongoLeadRepository {
    collection: mongodb::Collection<Lead>,
}

impl MongoLeadRepository {
    /// Create a new MongoLeadRepository using MongoConfig
    pub async fn new(config: &MongoConfig) -> Result<Self, RepositoryError> {
        use mongodb::{options::{ClientOptions, Credential}, Client};

        let mut client_options = ClientOptions::parse(&config.uri).await?;
        client_options.app_name = Some("EstimateBackend".to_string());
        client_options.max_pool_size = Some(config.pool_size);
        client_options.connect_timeout = Some(std::time::Duration::from_secs(config.connection_timeout_secs));
        client_options.server_selection_timeout =
            Some(std::time::Duration::from_secs(config.connection_timeout_secs));

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            client_options.credential = Some(
                Credential::builder()
                    .username(username.clone())
                    .password(password.clone())
                    .build(),
            );
        }

        let client = Client::with_options(client_options)?;
        let collection = client
            .database(&config.database)
            .collection::<Lead>(&config.lead_collection);
        info!(collection = %config.lead_collection, "Lead repository ready");
        Ok(MongoLeadRepository { collection })
    }
}

#[async_trait]
impl LeadRepository for MongoLeadRepository {
    #[tracing::instrument(skip(self, lead), fields(service_type = %lead.service_type, images = lead.image_count()))]
    async fn create(&self, lead: Lead) -> RepositoryResult<Lead> {
        info!("Inserting lead");
        let mut new_lead = lead;
        new_lead.id = Some(ObjectId::new());
        new_lead.created_at = Some(chrono::Utc::now().to_rfc3339());

        match self.collection.insert_one(&new_lead, None).await {
            Ok(_) => {
                info!(id = ?new_lead.id, "Lead inserted");
                Ok(new_lead)
            }
            Err(e) => {
                error!("Failed to insert lead: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }
}
