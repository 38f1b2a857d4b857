//! mvnbox - Maven builds in pinned, cached containers
//!
//! Runs Maven inside a digest-pinned image through Podman or Docker, with
//! the local repository kept in a persistent volume and the project
//! mounted as the working directory.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod maven;
pub mod orchestration;
pub mod ui;

pub use error::{MvnboxError, MvnboxResult};
pub use maven::{Artifact, Maven};
