use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, CityService, ImageService, PictureService, RoomService, SeaOrmAuthService,
    SeaOrmPictureService, SeaOrmRoomService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub room_service: Arc<dyn RoomService>,

    pub picture_service: Arc<dyn PictureService>,

    pub city_service: Arc<CityService>,

    pub image_service: Arc<ImageService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        // Clone config before moving it into the RwLock for services that
        // need it at construction time.
        let image_service_config = config.clone();
        let config_arc = Arc::new(RwLock::new(config));

        let image_service = Arc::new(ImageService::new(image_service_config));

        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone(), config_arc.clone()))
            as Arc<dyn AuthService + Send + Sync + 'static>;

        let room_service = Arc::new(SeaOrmRoomService::new(store.clone(), image_service.clone()))
            as Arc<dyn RoomService + Send + Sync + 'static>;

        let picture_service = Arc::new(SeaOrmPictureService::new(
            store.clone(),
            image_service.clone(),
        )) as Arc<dyn PictureService + Send + Sync + 'static>;

        let city_service = Arc::new(CityService::new(store.clone()));

        Ok(Self {
            config: config_arc,
            store,
            auth_service,
            room_service,
            picture_service,
            city_service,
            image_service,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
