pub mod backup;
pub mod board;
pub mod checklist;
pub mod config;
pub mod defaults;
pub mod drag;
pub mod proxy;
pub mod search;
pub mod stats;
pub mod storage;
pub mod store;
pub mod types;
