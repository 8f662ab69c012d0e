pub mod app;
pub mod config;
pub mod core;
pub mod logging;
pub mod memo;
pub mod persistence;
pub mod session;

pub use app::MemoApp;
pub use config::MemoConfig;
pub use self::core::{
    Card,
    Credential,
    MemoError,
};
