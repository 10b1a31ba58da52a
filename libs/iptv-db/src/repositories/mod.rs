pub mod catalog_repo;
pub mod reseller_repo;
pub mod user_repo;

pub use catalog_repo::{
    CatalogRepository, ChannelRepository, EpisodeRepository, SeriesRepository, VodRepository,
};
pub use reseller_repo::ResellerRepository;
pub use user_repo::UserRepository;
