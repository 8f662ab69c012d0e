pub mod errors;
pub mod http;
pub mod models;

pub use errors::MemoError;
pub use http::{
    ApiClient,
    AuthenticatedClient,
};
pub use models::{
    Card,
    Credential,
    NewCard,
};
