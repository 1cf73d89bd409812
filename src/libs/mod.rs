pub mod attendance;
pub mod clock;
pub mod config;
pub mod conflict;
pub mod data_storage;
pub mod error;
pub mod export;
pub mod formatter;
pub mod locks;
pub mod logging;
pub mod messages;
pub mod projection;
pub mod registry;
pub mod session;
pub mod shift;
pub mod signals;
pub mod view;
