mod entry;
mod metrics;
mod store;

pub use store::InMemoryRecordStore;
