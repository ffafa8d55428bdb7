pub mod handlers;
pub mod models;
mod storage;

pub use models::SearchHistory;
pub use storage::HistoryStorage;
