pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;

pub use client::{
    ApiError, ClientError, HttpTrackerApi, LocalStore, MockTrackerApi, TrackerApi, TrackerClient,
};
pub use config::{ClientConfig, Config};
pub use db::{init_db, Repository};
pub use domain::{Decimal, GameType, Player, RosterPlayer, ShotCategory, StatEntry, TimeMs};
pub use error::AppError;
