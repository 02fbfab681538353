//! Persistence: the JSON snapshot codec and the on-disk save store.

pub mod codec;
mod store;

pub use codec::{decode, encode, BuildingRecord, Decoded, SaveData, SAVE_DATE_FORMAT};
pub use store::{SaveInfo, SaveStore, AUTO_SAVE_FILE};
