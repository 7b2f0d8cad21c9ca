//! Post messages and attachments to Slack incoming webhooks.
//!
//! ```no_run
//! use jarjar::{Attachment, Defaults, Jarjar, MessageRequest};
//!
//! # async fn demo() -> jarjar::Result<()> {
//! let jj = Jarjar::new(Defaults {
//!     channel: Some("#general".into()),
//!     webhook: Some("https://hooks.slack.com/services/T000/B000/XXX".into()),
//!     ..Defaults::default()
//! });
//! jj.attach(
//!     MessageRequest::new()
//!         .message("nightly build")
//!         .attach(Attachment::new().with("status", "green").with("tests", 412)),
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod payload;
pub mod runner;

pub use client::{Delivery, Jarjar, Method};
pub use config::{Config, Defaults};
pub use error::{JarjarError, Result};
pub use payload::{Attachment, MessageRequest, Payload, FALLBACK_TEXT};
