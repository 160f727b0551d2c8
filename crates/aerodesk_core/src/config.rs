//! Session configuration.

/// Configuration for opening a database.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to create the data directory if it doesn't exist.
    pub create_if_missing: bool,

    /// Whether to error if the data directory already holds tables.
    pub error_if_exists: bool,

    /// Whether dangling references and double-booked seats in loaded
    /// tables are fatal instead of logged.
    pub strict_load: bool,

    /// Whether `close` writes the tables back before releasing the lock.
    pub save_on_close: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            error_if_exists: false,
            strict_load: false,
            save_on_close: false,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the data directory if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets whether to error if the data directory already holds tables.
    #[must_use]
    pub const fn error_if_exists(mut self, value: bool) -> Self {
        self.error_if_exists = value;
        self
    }

    /// Sets whether load-time data issues are fatal.
    #[must_use]
    pub const fn strict_load(mut self, value: bool) -> Self {
        self.strict_load = value;
        self
    }

    /// Sets whether closing saves.
    #[must_use]
    pub const fn save_on_close(mut self, value: bool) -> Self {
        self.save_on_close = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.create_if_missing);
        assert!(!config.error_if_exists);
        assert!(!config.strict_load);
        assert!(!config.save_on_close);
    }

    #[test]
    fn builder_pattern() {
        let config = Config::new()
            .create_if_missing(false)
            .strict_load(true)
            .save_on_close(true);

        assert!(!config.create_if_missing);
        assert!(config.strict_load);
        assert!(config.save_on_close);
    }
}
