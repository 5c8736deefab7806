use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{cities, provinces, room_pictures, rooms, users};
use crate::models::{RoomInput, RoomSearchParams};

pub mod migrator;
pub mod repositories;

pub use repositories::room::{RoomDetails, RoomListing};
pub use repositories::user::{NewOwnerProfile, User};

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

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn room_repo(&self) -> repositories::room::RoomRepository {
        repositories::room::RoomRepository::new(self.conn.clone())
    }

    fn picture_repo(&self) -> repositories::picture::PictureRepository {
        repositories::picture::PictureRepository::new(self.conn.clone())
    }

    fn city_repo(&self) -> repositories::city::CityRepository {
        repositories::city::CityRepository::new(self.conn.clone())
    }

    fn favorite_repo(&self) -> repositories::favorite::FavoriteRepository {
        repositories::favorite::FavoriteRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn get_user_auth_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        self.user_repo().get_auth_by_email(email).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        self.user_repo().email_exists(email).await
    }

    pub async fn create_user(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
        config: &SecurityConfig,
    ) -> Result<User> {
        self.user_repo()
            .create(first_name, last_name, email, password, config)
            .await
    }

    pub async fn record_login_attempt(&self, user_id: i32, failed_attempts: i32) -> Result<()> {
        self.user_repo()
            .record_login_attempt(user_id, failed_attempts)
            .await
    }

    pub async fn promote_to_owner(
        &self,
        user_id: i32,
        profile: &NewOwnerProfile,
    ) -> Result<User> {
        self.user_repo().promote_to_owner(user_id, profile).await
    }

    pub async fn verify_password(&self, password_hash: &str, password: &str) -> Result<bool> {
        self.user_repo()
            .verify_password(password_hash, password)
            .await
    }

    // ========== Rooms ==========

    pub async fn get_room(&self, id: i32) -> Result<Option<rooms::Model>> {
        self.room_repo().get(id).await
    }

    pub async fn get_room_with_owner(
        &self,
        id: i32,
    ) -> Result<Option<(rooms::Model, users::Model)>> {
        self.room_repo().get_with_owner(id).await
    }

    pub async fn create_room(&self, owner_id: i32, input: &RoomInput) -> Result<rooms::Model> {
        self.room_repo().create(owner_id, input).await
    }

    pub async fn update_room(&self, room_id: i32, input: &RoomInput) -> Result<rooms::Model> {
        self.room_repo().update(room_id, input).await
    }

    pub async fn set_room_rented(&self, room_id: i32, is_rented: bool) -> Result<rooms::Model> {
        self.room_repo().set_rented(room_id, is_rented).await
    }

    pub async fn delete_room(&self, room_id: i32) -> Result<Vec<String>> {
        self.room_repo().delete(room_id).await
    }

    pub async fn search_rooms(&self, params: &RoomSearchParams) -> Result<Vec<RoomListing>> {
        self.room_repo().search(params).await
    }

    pub async fn list_rooms_by_owner(&self, owner_id: i32) -> Result<Vec<RoomListing>> {
        self.room_repo().list_by_owner(owner_id).await
    }

    pub async fn room_listings_by_ids(&self, ids: &[i32]) -> Result<Vec<RoomListing>> {
        self.room_repo().listings_by_ids(ids).await
    }

    pub async fn room_details(&self, room_id: i32) -> Result<Option<RoomDetails>> {
        self.room_repo().details(room_id).await
    }

    // ========== Room pictures ==========

    pub async fn get_picture(&self, id: i32) -> Result<Option<room_pictures::Model>> {
        self.picture_repo().get(id).await
    }

    pub async fn list_pictures_for_room(
        &self,
        room_id: i32,
    ) -> Result<Vec<room_pictures::Model>> {
        self.picture_repo().list_for_room(room_id).await
    }

    pub async fn insert_pictures(
        &self,
        room_id: i32,
        urls: &[String],
    ) -> Result<Vec<room_pictures::Model>> {
        self.picture_repo().insert_batch(room_id, urls).await
    }

    pub async fn recompute_cover(&self, room_id: i32) -> Result<()> {
        self.picture_repo().recompute_cover(room_id).await
    }

    pub async fn swap_picture_order(
        &self,
        source_id: i32,
        target_id: i32,
        ascending: bool,
    ) -> Result<room_pictures::Model> {
        self.picture_repo()
            .swap_order(source_id, target_id, ascending)
            .await
    }

    pub async fn delete_picture(&self, id: i32) -> Result<Option<room_pictures::Model>> {
        self.picture_repo().delete(id).await
    }

    // ========== Cities ==========

    pub async fn search_cities(
        &self,
        query: &str,
    ) -> Result<Vec<(cities::Model, provinces::Model)>> {
        self.city_repo().search(query).await
    }

    pub async fn list_cities_by_province(&self, province_id: i32) -> Result<Vec<cities::Model>> {
        self.city_repo().list_by_province(province_id).await
    }

    pub async fn list_provinces(&self) -> Result<Vec<provinces::Model>> {
        self.city_repo().list_provinces().await
    }

    // ========== Favorites ==========

    pub async fn add_favorite(&self, user_id: i32, room_id: i32) -> Result<()> {
        self.favorite_repo().add(user_id, room_id).await
    }

    pub async fn remove_favorite(&self, user_id: i32, room_id: i32) -> Result<()> {
        self.favorite_repo().remove(user_id, room_id).await
    }

    pub async fn favorite_room_ids(&self, user_id: i32) -> Result<Vec<i32>> {
        self.favorite_repo().room_ids_for_user(user_id).await
    }

    pub async fn recent_favorite_room_ids(&self, user_id: i32) -> Result<Vec<i32>> {
        self.favorite_repo().recent_room_ids_for_user(user_id).await
    }
}
