use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Chat platforms a briefing can be delivered to.
///
/// This is a closed set: every member needs a routing entry in the canvas
/// router and a sender, and both are exhaustive matches over this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    Discord,
    Slack,
    Telegram,
    Signal,
    #[serde(rename = "imessage")]
    IMessage,
    Teams,
    Zalo,
}

impl ChannelType {
    pub const ALL: [Self; 7] = [
        Self::Discord,
        Self::Slack,
        Self::Telegram,
        Self::Signal,
        Self::IMessage,
        Self::Teams,
        Self::Zalo,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Discord => "discord",
            Self::Slack => "slack",
            Self::Telegram => "telegram",
            Self::Signal => "signal",
            Self::IMessage => "imessage",
            Self::Teams => "teams",
            Self::Zalo => "zalo",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelType {
    type Err = Error;

    /// Case-sensitive, matching the serialized names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::unsupported_channel(s))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case("discord", ChannelType::Discord)]
    #[case("imessage", ChannelType::IMessage)]
    #[case("zalo", ChannelType::Zalo)]
    fn parses_known_names(#[case] name: &str, #[case] expected: ChannelType) {
        assert_eq!(name.parse::<ChannelType>().unwrap(), expected);
    }

    #[test]
    fn unknown_name_is_unsupported() {
        let err = "whatsapp".parse::<ChannelType>().unwrap_err();
        assert_eq!(err, Error::unsupported_channel("whatsapp"));
        assert_eq!(err.to_string(), "unsupported channel: whatsapp");
    }

    #[test]
    fn serde_names_match_display() {
        for channel in ChannelType::ALL {
            let json = serde_json::to_string(&channel).unwrap();
            assert_eq!(json, format!("\"{channel}\""));
            let back: ChannelType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, channel);
        }
    }
}
