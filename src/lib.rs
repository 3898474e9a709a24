pub mod bacteria;
pub mod compute;
pub mod config;
pub mod director;
pub mod draw;
pub mod engine;
pub mod entities;
pub mod error;
pub mod immune;
pub mod logging;
pub mod raster;
pub mod space;
pub mod surface;

pub use config::Config;
pub use director::Director;
pub use engine::{Command, Engine};
pub use error::ConfigError;
