use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::models::inmate::{Inmate, NewInmate};

pub mod migrator;
pub mod repositories;

pub use repositories::user::{RegisterError, User};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn inmate_repo(&self) -> repositories::inmate::InmateRepository {
        repositories::inmate::InmateRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    pub async fn add_inmate(
        &self,
        fields: NewInmate,
        evidence_file: Option<String>,
    ) -> Result<Inmate> {
        self.inmate_repo().add(fields, evidence_file).await
    }

    pub async fn list_inmates(&self) -> Result<Vec<Inmate>> {
        self.inmate_repo().list().await
    }

    pub async fn get_inmate(&self, id: i32) -> Result<Option<Inmate>> {
        self.inmate_repo().get(id).await
    }

    pub async fn update_inmate(
        &self,
        id: i32,
        fields: NewInmate,
        new_evidence_file: Option<String>,
    ) -> Result<Option<Inmate>> {
        self.inmate_repo().update(id, fields, new_evidence_file).await
    }

    pub async fn remove_inmate(&self, id: i32) -> Result<bool> {
        self.inmate_repo().remove(id).await
    }

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        badge: i32,
        security: &SecurityConfig,
    ) -> Result<User, RegisterError> {
        self.user_repo()
            .create(username, password, badge, security)
            .await
    }

    pub async fn find_user_by_credentials(
        &self,
        username: &str,
        badge: i32,
    ) -> Result<Option<User>> {
        self.user_repo().find_by_credentials(username, badge).await
    }

    pub async fn verify_user_password(
        &self,
        username: &str,
        badge: i32,
        password: &str,
    ) -> Result<bool> {
        self.user_repo()
            .verify_password(username, badge, password)
            .await
    }
}
