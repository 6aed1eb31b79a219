pub mod loader;

pub use loader::{load_activity, parse_activity_toml, ActivityConfig, EffectConfig};
