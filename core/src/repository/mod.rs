pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;
pub use traits::KeyValueStore;

/// Key holding the serialized usage dataset.
pub const DATASET_KEY: &str = "energyUsageData";
/// Key holding the theme preference.
pub const THEME_KEY: &str = "theme";
