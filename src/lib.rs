pub mod config;
pub mod db;
pub mod dtos;
pub mod error;
pub mod models;
pub mod service;
pub mod utils;

use std::sync::Arc;

pub use config::Config;
pub use db::{
    FileBackend, MemoryBackend, StorageBackend, StoreClient, StoreError, CATEGORIES_KEY,
    CURRENT_USER_KEY, PROJECTS_KEY, USERS_KEY,
};
pub use dtos::{CreateProjectDto, FilterUserDto, LoginUserDto, RegisterUserDto};
pub use error::{AppError, ErrorMessage};
pub use models::projectmodel::{Category, Project, ProjectStatus, Proposal, ProposalStatus};
pub use models::usermodel::{
    AdminProfile, ClientProfile, FreelancerProfile, PortfolioItem, Rating, UserAccount, UserRole,
};
pub use service::marketplace::MarketplaceService;
pub use service::session::SessionManager;

/// Application facade: configuration, session, and marketplace operations
/// wired over one shared store.
#[derive(Debug)]
pub struct App {
    pub env: Config,
    pub session: SessionManager,
    pub marketplace: MarketplaceService,
}

impl App {
    /// Wire the services over an explicit backend (tests substitute a
    /// [`MemoryBackend`]), seeding default data on first run and restoring
    /// any persisted session.
    pub fn new(env: Config, backend: Arc<dyn StorageBackend>) -> Result<Self, AppError> {
        let db_client = StoreClient::new(backend);
        db_client.initialize(&env)?;

        let session = SessionManager::new(db_client.clone())?;
        let marketplace = MarketplaceService::new(db_client);

        Ok(App {
            env,
            session,
            marketplace,
        })
    }

    /// Open the durable application over a file store in the configured data
    /// directory.
    pub fn open(env: Config) -> Result<Self, AppError> {
        let backend = FileBackend::open(env.data_dir.clone())?;
        Self::new(env, Arc::new(backend))
    }
}
