mod model;
mod repository;

pub use model::FollowDB;
pub use repository::FollowRepository;
