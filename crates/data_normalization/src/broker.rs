use std::sync::LazyLock;

use regex::Regex;

pub const UNKNOWN_BROKER: &str = "Unknown";

static ARN_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ARN-\d+").expect("ARN marker pattern is valid"));

const DEALER_MARKER: &str = "is :";

/// Broker string shapes, tried in [`BROKER_PATTERNS`] order; the first that yields a
/// non-empty name wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerPattern {
    /// `MFD*/Intermediary : ARN-34413 / Rakhi Golechha`: name after the last `/`
    /// following the AMFI registration marker.
    ArnRegistration,
    /// `Your Broker/Dealer is : NAME`: name after `is :`.
    DealerDeclaration,
    /// Anything else is taken as the name itself.
    Verbatim,
}

/// ARN goes first: ARN strings may also contain `is :`-like text.
pub const BROKER_PATTERNS: [BrokerPattern; 3] = [
    BrokerPattern::ArnRegistration,
    BrokerPattern::DealerDeclaration,
    BrokerPattern::Verbatim,
];

impl BrokerPattern {
    pub fn extract(self, raw: &str) -> Option<String> {
        let name = match self {
            BrokerPattern::ArnRegistration => {
                let marker = ARN_MARKER.find(raw)?;
                let tail = &raw[marker.end()..];
                let slash = tail.rfind('/')?;
                &tail[slash + 1..]
            }
            BrokerPattern::DealerDeclaration => {
                let at = raw.find(DEALER_MARKER)?;
                &raw[at + DEALER_MARKER.len()..]
            }
            BrokerPattern::Verbatim => raw,
        };
        let name = name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }
}

/// Resolves the intermediary's display name from the raw BROKER column.
pub fn extract_broker(raw: &str) -> String {
    BROKER_PATTERNS
        .iter()
        .find_map(|pattern| pattern.extract(raw))
        .unwrap_or_else(|| UNKNOWN_BROKER.to_string())
}
