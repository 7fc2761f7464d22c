use crate::patch::ReplacementRule;

/// The operator's answer to "continue or save".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Continue,
    Save,
}

impl Choice {
    /// `s` as the first non-blank character saves; anything else continues.
    pub fn parse(input: &str) -> Self {
        match input.trim_start().chars().next() {
            Some('s') => Choice::Save,
            _ => Choice::Continue,
        }
    }
}

/// Rules collected so far, in entry order.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    rules: Vec<ReplacementRule>,
    finalized: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_rule(&mut self, rule: ReplacementRule) {
        debug_assert!(!self.is_finalized(), "rule added after finalizing");
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[ReplacementRule] {
        &self.rules
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn finalize(&mut self) {
        self.finalized = true;
    }

    pub fn into_rules(self) -> Vec<ReplacementRule> {
        self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_parse() {
        assert_eq!(Choice::parse("s"), Choice::Save);
        assert_eq!(Choice::parse("  save\n"), Choice::Save);
        assert_eq!(Choice::parse("S"), Choice::Continue);
        assert_eq!(Choice::parse("c"), Choice::Continue);
        assert_eq!(Choice::parse(""), Choice::Continue);
        assert_eq!(Choice::parse("yes"), Choice::Continue);
    }

    #[test]
    fn test_state_keeps_entry_order_and_duplicates() {
        let mut state = SessionState::new();
        state.push_rule(ReplacementRule::new("a", "b"));
        state.push_rule(ReplacementRule::new("b", "c"));
        state.push_rule(ReplacementRule::new("a", "b"));
        assert_eq!(state.rules().len(), 3);
        assert_eq!(state.rules()[1], ReplacementRule::new("b", "c"));
        assert!(!state.is_finalized());

        state.finalize();
        assert!(state.is_finalized());
        assert_eq!(state.into_rules()[2], ReplacementRule::new("a", "b"));
    }
}
