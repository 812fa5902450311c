//! # chainrelay-sinks
//!
//! Concrete `NotificationSink` implementations. Each sink reads one shape out
//! of a `NotificationPayload` and POSTs it through an `HttpTransport`:
//!
//! | sink      | shape       | destination                       |
//! |-----------|-------------|-----------------------------------|
//! | `discord` | `chat`      | Discord webhook URL               |
//! | `slack`   | `slack`     | `hints.slack_url`                 |
//! | `knock`   | `workflow`  | Knock workflow trigger API        |
//! | `webhook` | `body`      | generic JSON webhook URL          |

pub mod discord;
pub mod knock;
pub mod slack;
pub mod transport;
pub mod webhook;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use discord::{DiscordSink, DISCORD_SINK_ID};
pub use knock::{default_workflow_key, KnockSink, KNOCK_API_BASE, KNOCK_SINK_ID};
pub use slack::{SlackSink, SLACK_SINK_ID};
pub use transport::{HttpRequest, HttpTransport, ReqwestTransport};
pub use webhook::{WebhookSink, WEBHOOK_SINK_ID};
