pub mod retry;
pub mod store;
pub mod store_tests;

pub use retry::with_retries;
pub use retry::RetryPolicy;
pub use store::Store;
pub use store::StoreError;
pub use store::Txn;
