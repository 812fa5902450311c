//! # chainrelay-actions
//!
//! The GoGoPool notification flows. Each transaction-triggered flow is an
//! [`Action`]: extract typed events from the transaction, enrich them with
//! on-chain reads, compose one payload per notification and hand the result
//! to the dispatcher. The rewards flow runs on a schedule instead.
//!
//! ```rust,ignore
//! use chainrelay_actions::{ActionKind, RelayConfig, Services};
//!
//! let services = Services::builder(RelayConfig::default())
//!     .secrets(Arc::new(EnvSecrets))
//!     .build()?;
//! let report = ActionKind::MinipoolStatus.run(&services, &tx).await?;
//! println!("{} sent, {} failed", report.sent(), report.failed());
//! ```

pub mod action;
pub mod config;
pub mod events;
pub mod flows;
pub mod reads;
pub mod services;
pub mod templates;

pub use action::{execute, Action, ActionKind};
pub use config::RelayConfig;
pub use flows::{check_rewards_periodic, RewardsType};
pub use services::{Services, ServicesBuilder};
