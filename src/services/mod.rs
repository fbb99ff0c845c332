pub mod status_engine;
pub mod subscription_service;
pub mod subscription_store;

pub use status_engine::*;
pub use subscription_service::*;
pub use subscription_store::*;
