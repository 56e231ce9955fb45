pub mod archive;
pub mod config;
pub mod deadline;
pub mod error;
pub mod list_api;
pub mod model;
pub mod session;
pub mod storage;
