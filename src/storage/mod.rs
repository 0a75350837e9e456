//! Persistence of labeled coefficient vectors

mod store;
mod vowel;

pub use store::{Snapshot, SnapshotStore};
pub use vowel::Vowel;
