pub mod store_file;

pub use store_file::{load_collection, save_collection};
