//! Discord message building blocks and display helpers.

use alloy_primitives::{Address, U256};
use chainrelay_core::ChatMessage;
use chainrelay_evm::units::display_amount;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: true,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Footer {
    text: String,
}

/// A Discord embed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    footer: Option<Footer>,
}

impl Embed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: EmbedField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(Footer { text: text.into() });
        self
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// A link button (`style: 5`).
#[derive(Debug, Clone, PartialEq)]
pub struct LinkButton {
    pub emoji: &'static str,
    pub label: &'static str,
    pub url: String,
}

impl LinkButton {
    pub fn new(emoji: &'static str, label: &'static str, url: impl Into<String>) -> Self {
        Self {
            emoji,
            label,
            url: url.into(),
        }
    }

    fn to_value(&self) -> Value {
        json!({
            "type": 2,
            "style": 5,
            "label": self.label,
            "emoji": { "name": self.emoji },
            "url": self.url,
        })
    }
}

/// One action row holding `buttons`.
pub fn action_row(buttons: &[LinkButton]) -> Value {
    json!({
        "type": 1,
        "components": buttons.iter().map(LinkButton::to_value).collect::<Vec<_>>(),
    })
}

/// A message with one embed and, when `buttons` is non-empty, one action row.
pub fn chat_message(embed: Embed, buttons: &[LinkButton]) -> ChatMessage {
    ChatMessage {
        components: if buttons.is_empty() {
            vec![]
        } else {
            vec![action_row(buttons)]
        },
        embeds: vec![embed.to_value()],
    }
}

/// `0x1234...abcd` of the checksummed address.
pub fn short_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// `**1,234.5 GGP**`
pub fn ggp_display(amount: U256) -> String {
    format!("**{} GGP**", display_amount(amount, 0))
}

/// `**1,234.5000 AVAX**`, with at least `min_fraction` digits.
pub fn avax_display(amount: U256, min_fraction: usize) -> String {
    format!("**{} AVAX**", display_amount(amount, min_fraction))
}

/// Unix seconds as `M/D/YYYY, h:mm:ss AM` in UTC.
pub fn local_datetime(unix: u64) -> String {
    i64::try_from(unix)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|t| t.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
        .unwrap_or_else(|| unix.to_string())
}

/// Discord timestamp tag. `style` is `D` (date) or `R` (relative).
pub fn discord_time(unix: u64, style: char) -> String {
    format!("<t:{unix}:{style}>")
}

/// `1st`, `2nd`, `3rd`, `11th`, `22nd`.
pub fn ordinal(n: u64) -> String {
    let suffix = match (n % 10, n % 100) {
        (1, r) if r != 11 => "st",
        (2, r) if r != 12 => "nd",
        (3, r) if r != 13 => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
