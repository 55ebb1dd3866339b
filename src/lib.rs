pub mod backup;
pub mod cli;
pub mod config;
pub mod deps;
pub mod disk;
pub mod error;
pub mod lock;
pub mod mount;
pub mod notify;
pub mod outcome;
pub mod privilege;
pub mod schedule;
pub mod settings;
pub mod signal_handler;
pub mod util;
pub mod wizard;
