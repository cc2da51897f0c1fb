use std::env;
use std::path::PathBuf;

/// Runtime configuration for the capture backend
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listening port (default: 5000)
    pub port: u16,

    /// Directory captured images are written to (default: `captured_images`,
    /// relative to the working directory)
    pub upload_dir: PathBuf,

    /// Maximum accepted request body in bytes (default: 16 MB)
    pub max_body_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            upload_dir: PathBuf::from("captured_images"),
            max_body_size: 16 * 1024 * 1024, // 16 MB
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),

            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.upload_dir),

            max_body_size: env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_body_size),
        }
    }
}
