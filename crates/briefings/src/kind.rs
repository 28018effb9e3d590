use std::{fmt, str::FromStr};

use crate::Error;

/// Every scheduled briefing job name starts with this.
pub const JOB_NAME_PREFIX: &str = "Briefing:";

/// Trigger texts look like `dispatch-briefing:morning`.
pub const TRIGGER_PREFIX: &str = "dispatch-briefing:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BriefingKind {
    Morning,
    PreMeeting,
    Weekly,
}

impl BriefingKind {
    pub const ALL: [Self; 3] = [Self::Morning, Self::PreMeeting, Self::Weekly];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::PreMeeting => "pre-meeting",
            Self::Weekly => "weekly",
        }
    }

    /// Name of the scheduled job that fires this briefing.
    #[must_use]
    pub fn job_name(self) -> &'static str {
        match self {
            Self::Morning => "Briefing: Morning",
            Self::PreMeeting => "Briefing: Pre-Meeting",
            Self::Weekly => "Briefing: Weekly",
        }
    }

    #[must_use]
    pub fn trigger_text(self) -> String {
        format!("{TRIGGER_PREFIX}{}", self.as_str())
    }

    /// Inverse of [`Self::trigger_text`].
    #[must_use]
    pub fn from_trigger(text: &str) -> Option<Self> {
        text.trim()
            .strip_prefix(TRIGGER_PREFIX)
            .and_then(|name| name.parse().ok())
    }
}

impl fmt::Display for BriefingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BriefingKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "morning" => Ok(Self::Morning),
            "pre-meeting" | "pre_meeting" | "premeeting" => Ok(Self::PreMeeting),
            "weekly" => Ok(Self::Weekly),
            _ => Err(Error::UnknownKind { name: s.to_string() }),
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[test]
    fn trigger_text_round_trips() {
        for kind in BriefingKind::ALL {
            assert_eq!(BriefingKind::from_trigger(&kind.trigger_text()), Some(kind));
        }
        assert_eq!(BriefingKind::Morning.trigger_text(), "dispatch-briefing:morning");
    }

    #[rstest]
    #[case("dispatch-briefing:")]
    #[case("dispatch-briefing:monthly")]
    #[case("morning")]
    #[case("")]
    fn foreign_trigger_text(#[case] text: &str) {
        assert_eq!(BriefingKind::from_trigger(text), None);
    }

    #[test]
    fn job_names_share_prefix() {
        for kind in BriefingKind::ALL {
            assert!(kind.job_name().starts_with(JOB_NAME_PREFIX));
        }
        assert_eq!(BriefingKind::PreMeeting.job_name(), "Briefing: Pre-Meeting");
    }

    #[rstest]
    #[case("Morning", BriefingKind::Morning)]
    #[case("pre_meeting", BriefingKind::PreMeeting)]
    #[case("WEEKLY", BriefingKind::Weekly)]
    fn parses_names(#[case] name: &str, #[case] kind: BriefingKind) {
        assert_eq!(name.parse::<BriefingKind>().unwrap(), kind);
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert!(matches!(
            "evening".parse::<BriefingKind>(),
            Err(Error::UnknownKind { .. })
        ));
    }
}
