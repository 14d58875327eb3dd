/// Save module: codec for the client's save-blob format, flat-file storage,
/// and the JSON encoding helper.
pub mod codec;
pub mod error;
pub mod json;
pub mod store;

pub use codec::{SaveCodec, SaveData, SaveKey};
pub use error::SaveError;
pub use store::SaveStore;
