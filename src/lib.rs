pub mod changelog;
pub mod config;
pub mod data;
pub mod error;
pub mod services;
pub mod utils;

#[cfg(test)]
mod testing;

pub use changelog::{ChangelogGenerator, ChangelogSettings};
pub use config::Config;
pub use error::{ChangelogError, Result};
pub use services::{GitHubApi, GitHubClient};
