// Infrastructure layer - Filesystem stores and change watching
pub mod config_store;
pub mod preference_store;
pub mod watcher;
