//! Social module - following public portfolios and discovering them.

mod social_model;
mod social_service;
mod social_traits;


pub use social_model::{Follow, Page};
pub use social_service::SocialService;
pub use social_traits::{FollowRepositoryTrait, SocialServiceTrait};
