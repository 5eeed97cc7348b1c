//! Centralized state management for the Actix web server
use crate::{db, milestones::render::Renderer, utils::config::Config};

/// Global, read-only state
pub trait Global {
    /// Database connection
    fn db(&self) -> &db::DatabaseConnection;
    /// Loaded configuration
    fn config(&self) -> &Config;
    /// Compiled templates
    fn renderer(&self) -> &Renderer;
}

/// Application state
#[derive(Debug, Clone)]
pub struct App {
    /// Database connection
    pub db: db::DatabaseConnection,
    /// Loaded configuration
    pub config: Config,
    /// Compiled templates
    pub renderer: Renderer,
}

impl App {
    /// Build the state from a connected database and the configuration.
    ///
    /// # Errors
    /// Errors if the embedded templates do not compile.
    pub fn new(db: db::DatabaseConnection, config: Config) -> anyhow::Result<Self> {
        Ok(Self {
            db,
            config,
            renderer: Renderer::new()?,
        })
    }
}

impl Global for App {
    fn db(&self) -> &db::DatabaseConnection {
        &self.db
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn renderer(&self) -> &Renderer {
        &self.renderer
    }
}
