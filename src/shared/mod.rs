pub mod errors;
pub mod money;
pub mod retry;
pub mod shutdown;

pub use errors::{DomainError, ErrorKind};
pub use money::round2;
pub use retry::{retry_with_backoff, RetryConfig};
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};
