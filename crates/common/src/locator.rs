//! Locator strategies for addressing elements in the page under test.
//!
//! Page objects describe elements through these values instead of raw DOM
//! paths, so the selection strategy (test-id attribute, accessible role +
//! name, text pattern, CSS) can change without touching test bodies. A
//! locator is a chain of segments applied in order, each scoping the next;
//! the browser driver folds the chain into its native query API. Name and
//! text patterns are case-insensitive regular expressions.

use serde::Serialize;

/// One segment of a locator chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum Segment {
    /// Stable test-identifier attribute (the preferred strategy).
    TestId { id: String },
    /// Accessible role, optionally narrowed by name pattern and heading level.
    Role {
        role: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        level: Option<u32>,
    },
    /// Raw CSS selector; the fallback when no better handle exists.
    Css { selector: String },
    /// Visible text pattern.
    Text { pattern: String },
    /// Form-field placeholder pattern.
    Placeholder { pattern: String },
    /// Keep only elements whose subtree text matches the pattern.
    HasText { pattern: String },
    /// Select the n-th match of the chain so far.
    Nth { index: usize },
}

/// A chain of [`Segment`]s addressing one element (or element set).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Locator {
    chain: Vec<Segment>,
}

impl Locator {
    pub fn test_id(id: impl Into<String>) -> Self {
        Self {
            chain: vec![Segment::TestId { id: id.into() }],
        }
    }

    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            chain: vec![Segment::Role {
                role: role.into(),
                name: Some(name.into()),
                level: None,
            }],
        }
    }

    /// A heading of the given level, unnarrowed by name.
    pub fn heading(level: u32) -> Self {
        Self {
            chain: vec![Segment::Role {
                role: "heading".into(),
                name: None,
                level: Some(level),
            }],
        }
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            chain: vec![Segment::Css {
                selector: selector.into(),
            }],
        }
    }

    pub fn text(pattern: impl Into<String>) -> Self {
        Self {
            chain: vec![Segment::Text {
                pattern: pattern.into(),
            }],
        }
    }

    pub fn placeholder(pattern: impl Into<String>) -> Self {
        Self {
            chain: vec![Segment::Placeholder {
                pattern: pattern.into(),
            }],
        }
    }

    /// Scope a further query inside the current match.
    pub fn then(mut self, inner: Locator) -> Self {
        self.chain.extend(inner.chain);
        self
    }

    pub fn then_css(self, selector: impl Into<String>) -> Self {
        self.then(Locator::css(selector))
    }

    pub fn then_role(self, role: impl Into<String>, name: impl Into<String>) -> Self {
        self.then(Locator::role(role, name))
    }

    /// Keep only matches whose text matches the pattern.
    pub fn has_text(mut self, pattern: impl Into<String>) -> Self {
        self.chain.push(Segment::HasText {
            pattern: pattern.into(),
        });
        self
    }

    pub fn nth(mut self, index: usize) -> Self {
        self.chain.push(Segment::Nth { index });
        self
    }

    pub fn first(self) -> Self {
        self.nth(0)
    }

    /// Human-readable description for timeout and mismatch messages.
    pub fn describe(&self) -> String {
        self.chain
            .iter()
            .map(|seg| match seg {
                Segment::TestId { id } => format!("test-id={id}"),
                Segment::Role {
                    role,
                    name: Some(name),
                    ..
                } => format!("role={role}[name~/{name}/i]"),
                Segment::Role {
                    role,
                    name: None,
                    level: Some(level),
                } => format!("role={role}[level={level}]"),
                Segment::Role { role, .. } => format!("role={role}"),
                Segment::Css { selector } => format!("css={selector}"),
                Segment::Text { pattern } => format!("text~/{pattern}/i"),
                Segment::Placeholder { pattern } => format!("placeholder~/{pattern}/i"),
                Segment::HasText { pattern } => format!("has-text~/{pattern}/i"),
                Segment::Nth { index } => format!("nth={index}"),
            })
            .collect::<Vec<_>>()
            .join(" >> ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_a_tagged_chain() {
        let locator = Locator::css(r#"[role="menu"]"#)
            .first()
            .then_css(r#"a[role="menuitem"]"#);
        let json = serde_json::to_value(&locator).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"by": "css", "selector": "[role=\"menu\"]"},
                {"by": "nth", "index": 0},
                {"by": "css", "selector": "a[role=\"menuitem\"]"},
            ])
        );
    }

    #[test]
    fn role_omits_absent_fields() {
        let json = serde_json::to_value(Locator::heading(1)).unwrap();
        assert_eq!(json, serde_json::json!([{"by": "role", "role": "heading", "level": 1}]));

        let json = serde_json::to_value(Locator::role("button", "^login$")).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"by": "role", "role": "button", "name": "^login$"}])
        );
    }

    #[test]
    fn describe_reads_as_a_chain() {
        let locator = Locator::role("button", "open user account menu");
        assert_eq!(locator.describe(), "role=button[name~/open user account menu/i]");

        let chained = Locator::css(".cart_item").has_text("Backpack").first();
        assert_eq!(
            chained.describe(),
            "css=.cart_item >> has-text~/Backpack/i >> nth=0"
        );
    }
}
