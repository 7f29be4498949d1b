//! Rule-based action screening for `check_ethics`
//!
//! Deny-rules are regexes from config, matched against the action text.
//! Every matching rule is reported; an action with no match is allowed.

use memcore_core::{EthicsRule, Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub rule: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthicsVerdict {
    pub allowed: bool,
    pub violations: Vec<Violation>,
    pub rules_checked: usize,
}

#[derive(Debug, Clone, Default)]
pub struct EthicsChecker {
    rules: Vec<(EthicsRule, Regex)>,
}

impl EthicsChecker {
    pub fn new(rules: &[EthicsRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                Regex::new(&rule.pattern)
                    .map(|re| (rule.clone(), re))
                    .map_err(|e| {
                        Error::Config(format!("ethics rule '{}': invalid pattern: {}", rule.name, e))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn check(&self, action: &str) -> EthicsVerdict {
        let violations: Vec<Violation> = self
            .rules
            .iter()
            .filter(|(_, re)| re.is_match(action))
            .map(|(rule, _)| Violation {
                rule: rule.name.clone(),
                reason: rule.reason.clone(),
            })
            .collect();
        EthicsVerdict {
            allowed: violations.is_empty(),
            violations,
            rules_checked: self.rules.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, pattern: &str) -> EthicsRule {
        EthicsRule {
            name: name.into(),
            pattern: pattern.into(),
            reason: format!("{} is not allowed", name),
        }
    }

    #[test]
    fn no_rules_allows_everything() {
        let checker = EthicsChecker::new(&[]).unwrap();
        let verdict = checker.check("anything at all");
        assert!(verdict.allowed);
        assert_eq!(verdict.rules_checked, 0);
    }

    #[test]
    fn all_matching_rules_are_reported() {
        let checker = EthicsChecker::new(&[
            rule("front-running", r"(?i)front[- ]?run"),
            rule("sandwich", r"(?i)sandwich"),
            rule("secrets", r"(?i)private key"),
        ])
        .unwrap();
        let verdict = checker.check("Front-run and sandwich the victim swap");
        assert!(!verdict.allowed);
        let names: Vec<&str> = verdict.violations.iter().map(|v| v.rule.as_str()).collect();
        assert_eq!(names, vec!["front-running", "sandwich"]);
        assert!(checker.check("rebalance the treasury").allowed);
    }

    #[test]
    fn bad_pattern_is_config_error() {
        let err = EthicsChecker::new(&[rule("broken", "(unclosed")]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
