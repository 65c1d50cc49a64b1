//! Verdict tone: the color cue a notification gets.

/// Two-way classification of a verdict label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    /// The verdict leans affirmative ("True", "Mostly true").
    Affirmative,
    /// Everything else, including unknown and neutral verdicts.
    Alert,
}

/// Classify a verdict by case-insensitive substring match on "true".
///
/// There is deliberately no neutral bucket: "Unclear" and "Misleading" are
/// alerts, as is any label the service may add later.
pub fn classify(verdict: &str) -> Tone {
    if verdict.to_lowercase().contains("true") {
        Tone::Affirmative
    } else {
        Tone::Alert
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affirmative_verdicts() {
        assert_eq!(classify("True"), Tone::Affirmative);
        assert_eq!(classify("TRUE"), Tone::Affirmative);
        assert_eq!(classify("Mostly true"), Tone::Affirmative);
    }

    #[test]
    fn everything_else_is_an_alert() {
        for verdict in ["False", "Misleading", "Unclear", "Error", "", "Partially accurate"] {
            assert_eq!(classify(verdict), Tone::Alert, "{verdict}");
        }
    }
}
