//! Suite configuration, resolved once at startup.
//!
//! Every recognized environment variable is enumerated here together with
//! its precedence and fallback default; call sites receive the resolved
//! [`SuiteConfig`] and never consult the environment themselves.
//!
//! Recognized variables:
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `TEKQA_LIVE` | opt-in gate for scenarios that touch live sites | unset (live scenarios skip) |
//! | `TEKQA_DATA_DIR` | directory holding scenario datasets | `data` |
//! | `TEKQA_SHOP_URL` | e-commerce demo base URL | `https://www.saucedemo.com` |
//! | `TEKQA_SHOP_USER` / `TEKQA_SHOP_PASSWORD` | shop credentials | public demo pair |
//! | `TEKQA_PORTAL_URL` | travel-portal base URL | `https://polaris.adventures` |
//! | `PORTAL_EMAIL`, then `PORTAL_USER` | portal account identifier | none (portal scenarios skip) |
//! | `PORTAL_PASSWORD`, then `PORTAL_PASS` | portal account password | none (portal scenarios skip) |
//! | `TEKQA_GITHUB_API` | REST API base for hybrid checks | `https://api.github.com` |
//! | `TEKQA_GITHUB_WEB` | web UI base for hybrid checks | `https://github.com` |
//! | `GITHUB_TOKEN` | optional bearer token to dodge rate limits | none |
//! | `TEKQA_SEARCH_URL` | Hacker News search base URL | `https://hn.algolia.com` |
//! | `TEKQA_WIKI_URL` | Wikipedia base URL | `https://en.wikipedia.org` |

use std::path::PathBuf;

use tracing::debug;

/// A username/password (or email/password) pair. Read-only for the suite's
/// lifetime.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// E-commerce demo site. The public demo credentials are the documented
/// fallback, so these scenarios run without any environment at all.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    pub base_url: String,
    pub credentials: Credentials,
}

/// Travel-booking portal. Credentials have no safe default; when absent the
/// portal scenarios are skipped with a descriptive reason.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub base_url: String,
    pub credentials: Option<Credentials>,
}

/// REST + web bases for the hybrid repo checks.
#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub api_base: String,
    pub web_base: String,
    pub token: Option<String>,
}

/// Fully resolved configuration for one suite run.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    pub shop: ShopConfig,
    pub portal: PortalConfig,
    pub github: GithubConfig,
    pub search_url: String,
    pub wiki_url: String,
    pub data_dir: PathBuf,
    /// Whether scenarios that reach out to live sites may run.
    pub live: bool,
}

impl SuiteConfig {
    /// Resolve from the process environment.
    pub fn resolve() -> Self {
        Self::resolve_from(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary key→value source. Tests inject maps here so
    /// resolution stays deterministic without mutating process state.
    pub fn resolve_from(var: impl Fn(&str) -> Option<String>) -> Self {
        let first_of = |keys: &[&str]| -> Option<String> {
            keys.iter()
                .find_map(|k| var(k).filter(|v| !v.trim().is_empty()))
        };

        let portal_credentials = match (
            first_of(&["PORTAL_EMAIL", "PORTAL_USER"]),
            first_of(&["PORTAL_PASSWORD", "PORTAL_PASS"]),
        ) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            _ => None,
        };

        let config = Self {
            shop: ShopConfig {
                base_url: first_of(&["TEKQA_SHOP_URL"])
                    .unwrap_or_else(|| "https://www.saucedemo.com".into()),
                credentials: Credentials {
                    username: first_of(&["TEKQA_SHOP_USER"])
                        .unwrap_or_else(|| "standard_user".into()),
                    password: first_of(&["TEKQA_SHOP_PASSWORD"])
                        .unwrap_or_else(|| "secret_sauce".into()),
                },
            },
            portal: PortalConfig {
                base_url: first_of(&["TEKQA_PORTAL_URL"])
                    .unwrap_or_else(|| "https://polaris.adventures".into()),
                credentials: portal_credentials,
            },
            github: GithubConfig {
                api_base: first_of(&["TEKQA_GITHUB_API"])
                    .unwrap_or_else(|| "https://api.github.com".into()),
                web_base: first_of(&["TEKQA_GITHUB_WEB"])
                    .unwrap_or_else(|| "https://github.com".into()),
                token: first_of(&["GITHUB_TOKEN"]),
            },
            search_url: first_of(&["TEKQA_SEARCH_URL"])
                .unwrap_or_else(|| "https://hn.algolia.com".into()),
            wiki_url: first_of(&["TEKQA_WIKI_URL"])
                .unwrap_or_else(|| "https://en.wikipedia.org".into()),
            data_dir: PathBuf::from(first_of(&["TEKQA_DATA_DIR"]).unwrap_or_else(|| "data".into())),
            live: first_of(&["TEKQA_LIVE"])
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(false),
        };

        debug!(
            live = config.live,
            portal_credentials = config.portal.credentials.is_some(),
            github_token = config.github.token.is_some(),
            "resolved suite configuration"
        );
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve(pairs: &[(&str, &str)]) -> SuiteConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SuiteConfig::resolve_from(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply_with_empty_environment() {
        let config = resolve(&[]);
        assert_eq!(config.shop.base_url, "https://www.saucedemo.com");
        assert_eq!(config.shop.credentials.username, "standard_user");
        assert!(config.portal.credentials.is_none());
        assert!(config.github.token.is_none());
        assert!(!config.live);
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn portal_email_takes_precedence_over_user() {
        let config = resolve(&[
            ("PORTAL_EMAIL", "ryan@example.com"),
            ("PORTAL_USER", "legacy"),
            ("PORTAL_PASS", "hunter2"),
        ]);
        let creds = config.portal.credentials.expect("credentials resolved");
        assert_eq!(creds.username, "ryan@example.com");
        assert_eq!(creds.password, "hunter2");
    }

    #[test]
    fn partial_portal_credentials_resolve_to_none() {
        let config = resolve(&[("PORTAL_EMAIL", "ryan@example.com")]);
        assert!(config.portal.credentials.is_none());
    }

    #[test]
    fn blank_values_fall_through_to_the_next_source() {
        let config = resolve(&[("PORTAL_EMAIL", "  "), ("PORTAL_USER", "ryan"), ("PORTAL_PASS", "pw")]);
        assert_eq!(config.portal.credentials.unwrap().username, "ryan");
    }

    #[test]
    fn live_gate_parses_truthy_values() {
        assert!(resolve(&[("TEKQA_LIVE", "1")]).live);
        assert!(resolve(&[("TEKQA_LIVE", "yes")]).live);
        assert!(!resolve(&[("TEKQA_LIVE", "0")]).live);
        assert!(!resolve(&[("TEKQA_LIVE", "false")]).live);
        assert!(!resolve(&[]).live);
    }
}
