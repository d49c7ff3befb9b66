pub mod settings;

pub use settings::{
    CredentialSettings, RegistrySettings, Settings, DEFAULT_CACHE_TTL_SECS, DEFAULT_REGISTRY_URL,
};
