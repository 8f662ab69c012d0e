pub mod api;
pub mod cache;
pub mod card_view;
pub mod controller;
pub mod state;

pub use api::CardRepository;
pub use cache::LocalCardCache;
pub use card_view::{
    CardView,
    CheckListener,
    Face,
};
pub use controller::{
    Delivery,
    MemoController,
};
pub use state::{
    CardCollection,
    LoadState,
};
