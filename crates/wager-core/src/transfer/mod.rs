//! External transfer mechanism abstraction.

mod mock;
mod traits;

pub use mock::MockTransferClient;
pub use traits::{TransferError, TransferProvider};
