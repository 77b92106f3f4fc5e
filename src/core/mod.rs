pub mod errors;
pub mod models;

pub use errors::OkurigoError;
pub use models::{
    Book,
    WordRecord,
};
