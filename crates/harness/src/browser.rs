//! Browser session driving.
//!
//! A [`Session`] owns one Playwright driver subprocess (Node) hosting a
//! single browser context and page. Commands are line-delimited JSON on the
//! child's stdin; each command produces exactly one JSON response line on
//! stdout. Every command is a bounded-wait suspension point: the driver
//! reports Playwright timeouts distinctly so they surface as
//! [`QaError::PreconditionTimeout`] with the unmet condition named.

use std::fmt;
use std::process::Stdio;
use std::sync::Mutex as StdMutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use tekqa_common::locator::Locator;
use tekqa_common::{QaError, QaResult};

const DRIVER_JS: &str = include_str!("driver.js");

/// Navigation gets a longer leash than element-level waits.
pub const NAV_TIMEOUT_MS: u64 = 30_000;

/// Browser engine to drive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        }
    }
}

impl std::str::FromStr for BrowserKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chromium" => Ok(BrowserKind::Chromium),
            "firefox" => Ok(BrowserKind::Firefox),
            "webkit" => Ok(BrowserKind::Webkit),
            other => Err(format!("unknown browser: {other}")),
        }
    }
}

/// Configuration for launching a session.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub kind: BrowserKind,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Attribute the sites under test use for stable test identifiers.
    pub test_id_attribute: String,
    /// Default bounded wait for element-level operations.
    pub default_timeout_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            kind: BrowserKind::Chromium,
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            test_id_attribute: "data-test".to_string(),
            default_timeout_ms: 10_000,
        }
    }
}

/// Element state to wait for.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitState {
    #[default]
    Visible,
    Hidden,
    Attached,
    Detached,
}

impl fmt::Display for WaitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WaitState::Visible => "visible",
            WaitState::Hidden => "hidden",
            WaitState::Attached => "attached",
            WaitState::Detached => "detached",
        };
        f.write_str(s)
    }
}

/// A screenshot request; element-scoped when `locator` is set.
#[derive(Debug, Clone, Default)]
pub struct ScreenshotRequest {
    pub path: String,
    pub locator: Option<Locator>,
    pub full_page: bool,
    /// Locators whose boxes are blanked out (dynamic regions such as badges).
    pub mask: Vec<Locator>,
}

/// One `[data-test]`-style element gathered by the locator inventory.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TestIdEntry {
    pub test_id: String,
    pub tag: String,
    pub text: String,
}

#[derive(Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
enum DriverCommand<'a> {
    Goto {
        url: &'a str,
        timeout_ms: u64,
    },
    Click {
        locator: &'a Locator,
        timeout_ms: u64,
    },
    Fill {
        locator: &'a Locator,
        value: &'a str,
        timeout_ms: u64,
    },
    Press {
        #[serde(skip_serializing_if = "Option::is_none")]
        locator: Option<&'a Locator>,
        key: &'a str,
    },
    WaitFor {
        locator: &'a Locator,
        state: WaitState,
        timeout_ms: u64,
    },
    WaitUrl {
        pattern: &'a str,
        timeout_ms: u64,
    },
    IsVisible {
        locator: &'a Locator,
    },
    Text {
        locator: &'a Locator,
        timeout_ms: u64,
    },
    Attr {
        locator: &'a Locator,
        name: &'a str,
        timeout_ms: u64,
    },
    Count {
        locator: &'a Locator,
    },
    Title,
    Url,
    Screenshot {
        path: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        locator: Option<&'a Locator>,
        full_page: bool,
        mask: &'a [Locator],
    },
    ScrollIntoView {
        locator: &'a Locator,
        timeout_ms: u64,
    },
    CollectTestIds {
        attribute: &'a str,
    },
    Close,
}

#[derive(Deserialize)]
struct DriverResponse {
    id: i64,
    ok: bool,
    #[serde(default)]
    timeout: bool,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    error: Option<String>,
}

struct DriverIo {
    stdin: ChildStdin,
    lines: Lines<BufReader<ChildStdout>>,
    next_id: i64,
}

/// A live browser session. Valid for one scenario execution; page objects
/// borrow it and die with it.
pub struct Session {
    io: Mutex<DriverIo>,
    child: StdMutex<Child>,
    config: BrowserConfig,
    // Keeps the materialized driver script alive for the child's lifetime.
    _driver_dir: tempfile::TempDir,
}

impl Session {
    /// Verify the Playwright installation the driver depends on.
    pub fn check_driver_installed() -> QaResult<()> {
        let status = std::process::Command::new("npx")
            .args(["playwright", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match status {
            Ok(s) if s.success() => Ok(()),
            _ => Err(QaError::DriverNotFound),
        }
    }

    /// Spawn the driver subprocess and wait for it to come up.
    pub async fn launch(config: BrowserConfig) -> QaResult<Self> {
        Self::check_driver_installed()?;

        let driver_dir = tempfile::tempdir()?;
        let script_path = driver_dir.path().join("driver.js");
        std::fs::write(&script_path, DRIVER_JS)?;

        let opts = serde_json::json!({
            "browser": config.kind.as_str(),
            "headless": config.headless,
            "width": config.viewport_width,
            "height": config.viewport_height,
            "test_id_attribute": config.test_id_attribute,
            "default_timeout_ms": config.default_timeout_ms,
        });

        debug!(browser = config.kind.as_str(), "launching driver");

        let mut child = Command::new("node")
            .arg(&script_path)
            .arg(opts.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| QaError::Driver(format!("failed to spawn node: {e}")))?;

        let stdin = child.stdin.take().ok_or(QaError::DriverClosed)?;
        let stdout = child.stdout.take().ok_or(QaError::DriverClosed)?;
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(target: "tekqa::driver", "{line}");
                }
            });
        }

        let session = Self {
            io: Mutex::new(DriverIo {
                stdin,
                lines: BufReader::new(stdout).lines(),
                next_id: 0,
            }),
            child: StdMutex::new(child),
            config,
            _driver_dir: driver_dir,
        };

        // First round-trip proves the browser actually launched.
        session.request(DriverCommand::Title, "driver startup", NAV_TIMEOUT_MS).await?;
        info!(browser = session.config.kind.as_str(), "browser session ready");
        Ok(session)
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    async fn request(
        &self,
        cmd: DriverCommand<'_>,
        condition: &str,
        waited_ms: u64,
    ) -> QaResult<Value> {
        let mut io = self.io.lock().await;
        io.next_id += 1;
        let id = io.next_id;

        let mut envelope = serde_json::to_value(&cmd)?;
        envelope["id"] = id.into();
        let line = serde_json::to_string(&envelope)?;
        debug!(target: "tekqa::protocol", "{line}");

        io.stdin.write_all(line.as_bytes()).await.map_err(|_| QaError::DriverClosed)?;
        io.stdin.write_all(b"\n").await.map_err(|_| QaError::DriverClosed)?;
        io.stdin.flush().await.map_err(|_| QaError::DriverClosed)?;

        loop {
            let line = io
                .lines
                .next_line()
                .await
                .map_err(|_| QaError::DriverClosed)?
                .ok_or(QaError::DriverClosed)?;
            let resp: DriverResponse = match serde_json::from_str(&line) {
                Ok(resp) => resp,
                Err(_) => {
                    debug!(target: "tekqa::driver", "{line}");
                    continue;
                }
            };
            if resp.id != id {
                warn!(got = resp.id, want = id, "out-of-order driver response dropped");
                continue;
            }
            if resp.ok {
                return Ok(resp.value);
            }
            let error = resp.error.unwrap_or_else(|| "unknown driver error".into());
            if resp.timeout {
                return Err(QaError::PreconditionTimeout {
                    condition: condition.to_string(),
                    waited_ms,
                });
            }
            return Err(QaError::Driver(error));
        }
    }

    pub async fn goto(&self, url: &str) -> QaResult<()> {
        info!(url, "navigate");
        self.request(
            DriverCommand::Goto { url, timeout_ms: NAV_TIMEOUT_MS },
            &format!("navigation to {url}"),
            NAV_TIMEOUT_MS,
        )
        .await
        .map(|_| ())
    }

    pub async fn click(&self, locator: &Locator) -> QaResult<()> {
        let t = self.config.default_timeout_ms;
        debug!(locator = %locator.describe(), "click");
        self.request(
            DriverCommand::Click { locator, timeout_ms: t },
            &format!("{} to be clickable", locator.describe()),
            t,
        )
        .await
        .map(|_| ())
    }

    pub async fn fill(&self, locator: &Locator, value: &str) -> QaResult<()> {
        let t = self.config.default_timeout_ms;
        debug!(locator = %locator.describe(), "fill");
        self.request(
            DriverCommand::Fill { locator, value, timeout_ms: t },
            &format!("{} to accept input", locator.describe()),
            t,
        )
        .await
        .map(|_| ())
    }

    pub async fn press(&self, locator: &Locator, key: &str) -> QaResult<()> {
        self.request(
            DriverCommand::Press { locator: Some(locator), key },
            &format!("{} to receive {key}", locator.describe()),
            self.config.default_timeout_ms,
        )
        .await
        .map(|_| ())
    }

    /// Wait until the element reaches `state`, bounded by `timeout_ms`.
    pub async fn wait_for(&self, locator: &Locator, state: WaitState, timeout_ms: u64) -> QaResult<()> {
        self.request(
            DriverCommand::WaitFor { locator, state, timeout_ms },
            &format!("{} to become {state}", locator.describe()),
            timeout_ms,
        )
        .await
        .map(|_| ())
    }

    /// Wait for visibility with the session default timeout.
    pub async fn wait_visible(&self, locator: &Locator) -> QaResult<()> {
        self.wait_for(locator, WaitState::Visible, self.config.default_timeout_ms).await
    }

    /// Wait until the page URL matches the (case-insensitive) pattern.
    pub async fn wait_for_url(&self, pattern: &str, timeout_ms: u64) -> QaResult<()> {
        self.request(
            DriverCommand::WaitUrl { pattern, timeout_ms },
            &format!("URL matching /{pattern}/i"),
            timeout_ms,
        )
        .await
        .map(|_| ())
    }

    /// Non-waiting visibility probe.
    pub async fn is_visible(&self, locator: &Locator) -> QaResult<bool> {
        let value = self
            .request(
                DriverCommand::IsVisible { locator },
                &format!("{} visibility probe", locator.describe()),
                0,
            )
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    /// Rendered text of the element.
    pub async fn inner_text(&self, locator: &Locator) -> QaResult<String> {
        let t = self.config.default_timeout_ms;
        let value = self
            .request(
                DriverCommand::Text { locator, timeout_ms: t },
                &format!("{} to expose text", locator.describe()),
                t,
            )
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// Attribute value, `None` when the attribute is absent.
    pub async fn attribute(&self, locator: &Locator, name: &str) -> QaResult<Option<String>> {
        let t = self.config.default_timeout_ms;
        let value = self
            .request(
                DriverCommand::Attr { locator, name, timeout_ms: t },
                &format!("{} to expose attribute {name}", locator.describe()),
                t,
            )
            .await?;
        Ok(value.as_str().map(str::to_string))
    }

    /// Number of elements currently matching.
    pub async fn count(&self, locator: &Locator) -> QaResult<usize> {
        let value = self
            .request(
                DriverCommand::Count { locator },
                &format!("{} count probe", locator.describe()),
                0,
            )
            .await?;
        Ok(value.as_u64().unwrap_or(0) as usize)
    }

    pub async fn title(&self) -> QaResult<String> {
        let value = self.request(DriverCommand::Title, "page title", 0).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    pub async fn current_url(&self) -> QaResult<String> {
        let value = self.request(DriverCommand::Url, "page url", 0).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    pub async fn screenshot(&self, req: &ScreenshotRequest) -> QaResult<()> {
        info!(path = %req.path, "screenshot");
        self.request(
            DriverCommand::Screenshot {
                path: &req.path,
                locator: req.locator.as_ref(),
                full_page: req.full_page,
                mask: &req.mask,
            },
            "screenshot capture",
            NAV_TIMEOUT_MS,
        )
        .await
        .map(|_| ())
    }

    pub async fn scroll_into_view(&self, locator: &Locator) -> QaResult<()> {
        let t = self.config.default_timeout_ms;
        self.request(
            DriverCommand::ScrollIntoView { locator, timeout_ms: t },
            &format!("{} to scroll into view", locator.describe()),
            t,
        )
        .await
        .map(|_| ())
    }

    /// Gather every element carrying the configured test-id attribute.
    pub async fn collect_test_ids(&self) -> QaResult<Vec<TestIdEntry>> {
        let attribute = self.config.test_id_attribute.clone();
        let value = self
            .request(
                DriverCommand::CollectTestIds { attribute: &attribute },
                "test-id inventory",
                0,
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Graceful shutdown: protocol close, then SIGTERM, then kill.
    pub async fn close(&self) -> QaResult<()> {
        let _ = self.request(DriverCommand::Close, "driver shutdown", NAV_TIMEOUT_MS).await;

        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            let pid = self.child.lock().expect("child lock").id();
            if let Some(pid) = pid {
                let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
        }

        let mut child = self.child.lock().expect("child lock");
        let _ = child.start_kill();
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Ok(mut child) = self.child.lock() {
            let _ = child.start_kill();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_serialize_with_a_cmd_tag() {
        let locator = Locator::test_id("login-button");
        let cmd = DriverCommand::Click { locator: &locator, timeout_ms: 5000 };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["cmd"], "click");
        assert_eq!(json["timeout_ms"], 5000);
        assert_eq!(json["locator"][0]["by"], "test_id");
    }

    #[test]
    fn press_without_locator_omits_the_field() {
        let cmd = DriverCommand::Press { locator: None, key: "Enter" };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["cmd"], "press");
        assert!(json.get("locator").is_none());
    }

    #[test]
    fn wait_state_serializes_snake_case() {
        let locator = Locator::css(".inventory_list");
        let cmd = DriverCommand::WaitFor {
            locator: &locator,
            state: WaitState::Visible,
            timeout_ms: 1000,
        };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["state"], "visible");
    }

    #[test]
    fn browser_kind_round_trips() {
        for kind in ["chromium", "firefox", "webkit"] {
            let parsed: BrowserKind = kind.parse().unwrap();
            assert_eq!(parsed.as_str(), kind);
        }
        assert!("opera".parse::<BrowserKind>().is_err());
    }
}
