//! Rate-limit recovery for story generation calls.
//!
//! Providers signal throttling only through their error text, so a failure is
//! retried when its message carries one of the
//! [`RATE_LIMIT_INDICATORS`](novel_diver_error::RATE_LIMIT_INDICATORS). Every
//! other failure propagates on the first attempt.
//!
//! ```
//! use novel_diver_rate_limit::{RetryPolicy, retry_with_backoff};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let policy = RetryPolicy::default();
//! let value: Result<u32, String> = retry_with_backoff(&policy, || async { Ok(7) }).await;
//! assert_eq!(value, Ok(7));
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod policy;
mod retry;

pub use novel_diver_error::{RATE_LIMIT_INDICATORS, is_rate_limit_message};
pub use policy::RetryPolicy;
pub use retry::{retry_with_backoff, retry_with_backoff_if};
