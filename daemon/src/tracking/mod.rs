pub mod slot;

pub use slot::ResultSlot;
