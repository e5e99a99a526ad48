pub mod bootstrap;
mod codec;
pub mod errors;
pub mod finality_update;
pub mod header;
pub mod optimistic_update;
pub mod processor;
pub mod proof;
pub mod provider;
pub mod service;
pub mod store;
pub mod update;
