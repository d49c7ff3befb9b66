pub mod store;

pub use store::FileCredentialStore;
