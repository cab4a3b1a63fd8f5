pub mod chart;
pub mod entry_editor;
pub mod navigator;
pub mod stats;
pub mod theme;
pub mod transfer;
pub mod usage_store;
