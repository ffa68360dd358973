mod model;
mod repository;

pub use model::HoldingDB;
pub use repository::HoldingRepository;
pub(crate) use repository::{apply_holding_write, load_holding};
