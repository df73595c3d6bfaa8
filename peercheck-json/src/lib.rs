//! JSON-file persistence for PeerCheck preferences.

pub mod atomic;
pub mod bootstrap;
pub mod dirs;
pub mod paths;
pub mod store;

pub use bootstrap::BootstrapPointer;
pub use dirs::DirectoryMemory;
pub use store::PreferenceStore;
