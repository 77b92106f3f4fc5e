pub mod api;

pub use api::{
    IknowClient,
    DEFAULT_BASE_URL,
};
