mod content_provider;
mod manager;
mod serializer;

pub use content_provider::{ContentProvider, FileContentProvider, InMemoryContentProvider};
pub use manager::ConfigManager;
pub use serializer::{ConfigSerializer, YamlConfigSerializer};

pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
