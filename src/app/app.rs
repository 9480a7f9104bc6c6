use axum::Router;
use std::sync::Arc;
use tracing::info;

use crate::config::{AppConfig, EstimateConfig, MongoConfig, StorageConfig};
use crate::handler::lead_handler::EstimateState;
use crate::repository::lead_repo::MongoLeadRepository;
use crate::router::lead_router::lead_router;
use crate::router::page_router::page_router;
use crate::service::lead_service::{LeadService, LeadServiceImpl};
use crate::service::upload_service::StorageImageUploader;
use crate::util::storage::StorageService;

pub struct App {
    config: AppConfig,
    router: Router,
}

impl App {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let config = AppConfig::from_env();
        let estimate_config = EstimateConfig::from_env()?;
        let mongo_config = MongoConfig::from_env()?;
        let storage_config = StorageConfig::from_env()?;

        let storage = Arc::new(StorageService::new(storage_config).await?);
        let uploader = Arc::new(StorageImageUploader::new(storage));
        let lead_repo = Arc::new(MongoLeadRepository::new(&mongo_config).await?);
        let lead_service: Arc<dyn LeadService> =
            Arc::new(LeadServiceImpl::new(lead_repo, uploader, &estimate_config));

        let state = Arc::new(EstimateState {
            lead_service,
            config: estimate_config,
        });

        Ok(App {
            config,
            router: Self::create_router(state),
        })
    }

    pub fn create_router(state: Arc<EstimateState>) -> Router {
        page_router().merge(lead_router(state))
    }

    pub async fn start(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = self.config.bind_addr()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("🚀 Server running at http://{}", addr);
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}
