use std::fmt;

use clap::Parser;
use log::info;
use miette::Diagnostic;
use reqwest::Url;
use thiserror::Error;

/// Set one field on one or more Jira issues.
///
/// Every input can also be set through the environment variable shown next to it.
// Nothing here has been checked yet, call `validate` to get a `Config`.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Inputs {
    /// Username for basic auth. Ignored when a cookie is provided.
    #[arg(long, env = "jira_username")]
    pub username: Option<String>,
    /// Password (or API token) for basic auth. Ignored when a cookie is provided.
    #[arg(long, env = "jira_password", hide_env_values = true)]
    pub password: Option<Secret>,
    /// A session cookie in the form `name=value`, used instead of username and password.
    #[arg(long, env = "jira_cookie", hide_env_values = true)]
    pub cookie: Option<Secret>,
    /// Base URL of the Jira instance, like `https://example.atlassian.net`.
    #[arg(long, env = "jira_instance_url")]
    pub instance_url: Option<String>,
    /// Issue IDs or keys to update, separated by `|`.
    #[arg(long, env = "issue_id_or_key_list", value_delimiter = '|')]
    pub issues: Vec<String>,
    /// The key of the field to set, like `summary` or `customfield_10010`.
    #[arg(long, env = "field_key")]
    pub field_key: Option<String>,
    /// The new value of the field.
    #[arg(long, env = "field_value")]
    pub field_value: Option<String>,
    /// Build every request and log it, but don't send anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl Inputs {
    /// Write the provided inputs to the log, never printing secrets.
    pub fn dump(&self) {
        info!("Configs:");
        if is_blank(self.cookie.as_ref().map(Secret::expose)) {
            info!(" - Username: {}", self.username.as_deref().unwrap_or_default());
            info!(" - Password (hidden): {}", Secret::MASK);
        } else {
            info!(" - Cookie (hidden): {}", Secret::MASK);
        }
        info!(
            " - Instance URL: {}",
            self.instance_url.as_deref().unwrap_or_default()
        );
        let issues: Vec<&str> = self.issues.iter().map(|issue| issue.trim()).collect();
        info!(" - Issues: {issues:?}");
        info!(" - Field key: {}", self.field_key.as_deref().unwrap_or_default());
        info!(
            " - Field value: {}",
            self.field_value.as_deref().unwrap_or_default()
        );
    }

    /// Check every input, in order, and turn them into a [`Config`].
    ///
    /// ## Errors
    /// The first problem found, see [`ConfigError`] for the order they're checked in.
    pub fn validate(&self) -> Result<Config, ConfigError> {
        let auth = self.auth()?;

        let instance_url = self.instance_url.as_deref().unwrap_or_default().trim();
        let instance_url = Url::parse(instance_url).map_err(|source| {
            ConfigError::InvalidInstanceUrl {
                reason: source.to_string(),
            }
        })?;
        if instance_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidInstanceUrl {
                reason: String::from("URL cannot be used as a base for API paths"),
            });
        }

        if self.issues.is_empty() {
            return Err(ConfigError::NoIssues);
        }
        let issues = self
            .issues
            .iter()
            .map(|issue| issue.trim())
            .enumerate()
            .map(|(index, issue)| {
                if issue.is_empty() {
                    Err(ConfigError::EmptyIssue { index })
                } else {
                    Ok(issue.to_string())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let field_key = match self.field_key.as_deref() {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => return Err(ConfigError::MissingFieldKey),
        };

        Ok(Config {
            auth,
            instance_url,
            issues,
            field_key,
            field_value: self.field_value.clone().unwrap_or_default(),
        })
    }

    /// A cookie always wins over basic auth, even if username and password are also set.
    fn auth(&self) -> Result<Auth, ConfigError> {
        if let Some(cookie) = self.cookie.as_ref().filter(|cookie| !cookie.is_empty()) {
            let (name, value) = cookie
                .expose()
                .split_once('=')
                .ok_or(ConfigError::MalformedCookie)?;
            let (name, value) = (name.trim(), value.trim());
            if !is_cookie_name(name) || !is_cookie_value(value) {
                return Err(ConfigError::MalformedCookie);
            }
            return Ok(Auth::Cookie {
                name: name.to_string(),
                value: Secret::from(value),
            });
        }

        let username = self
            .username
            .as_deref()
            .filter(|username| !username.is_empty())
            .ok_or(ConfigError::MissingUsername)?;
        let password = self
            .password
            .as_ref()
            .filter(|password| !password.is_empty())
            .ok_or(ConfigError::MissingPassword)?;
        Ok(Auth::Basic {
            username: username.to_string(),
            password: password.clone(),
        })
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, str::is_empty)
}

/// An RFC 6265 `cookie-name`, which is an HTTP token.
fn is_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|byte| {
            byte.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&byte)
        })
}

/// An RFC 6265 `cookie-value`, so exactly one cookie ends up in the header.
fn is_cookie_value(value: &str) -> bool {
    let value = value
        .strip_prefix('"')
        .and_then(|value| value.strip_suffix('"'))
        .unwrap_or(value);
    value
        .bytes()
        .all(|byte| byte.is_ascii_graphic() && !b"\",;\\".contains(&byte))
}

/// Validated, immutable configuration for a whole run.
#[derive(Clone, Debug)]
pub struct Config {
    pub auth: Auth,
    pub instance_url: Url,
    /// Never empty, and no element is empty.
    pub issues: Vec<String>,
    /// Never empty.
    pub field_key: String,
    pub field_value: String,
}

/// How requests authenticate with Jira.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Auth {
    Basic { username: String, password: Secret },
    Cookie { name: String, value: Secret },
}

/// A string which must never end up in logs. Both [`fmt::Debug`] and [`fmt::Display`] print a
/// fixed mask, the real value is only available via [`Secret::expose`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    const MASK: &'static str = "*****";

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::MASK)
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::MASK)
    }
}

/// Problems with the provided inputs, found before any request is made. They're listed in the
/// order [`Inputs::validate`] checks for them.
#[derive(Debug, Diagnostic, Error)]
pub enum ConfigError {
    #[error("No Jira cookie nor username specified")]
    #[diagnostic(
        code(config::missing_username),
        help("Set jira_username and jira_password, or set jira_cookie")
    )]
    MissingUsername,
    #[error("No Jira cookie nor password specified")]
    #[diagnostic(
        code(config::missing_password),
        help("Set jira_password, or set jira_cookie instead of jira_username")
    )]
    MissingPassword,
    #[error("Invalid cookie specified (missing key-value separator)")]
    #[diagnostic(
        code(config::malformed_cookie),
        help("jira_cookie must look like `name=value`, for example `JSESSIONID=abc123`")
    )]
    MalformedCookie,
    #[error("Invalid Jira instance URL: {reason}")]
    #[diagnostic(
        code(config::invalid_instance_url),
        help("jira_instance_url must be absolute, like `https://example.atlassian.net`")
    )]
    InvalidInstanceUrl { reason: String },
    #[error("No Jira issue IDs nor keys specified")]
    #[diagnostic(
        code(config::no_issues),
        help("Set issue_id_or_key_list to one or more issue keys separated by `|`")
    )]
    NoIssues,
    #[error("Empty Jira issue ID nor key specified at index {index}")]
    #[diagnostic(
        code(config::empty_issue),
        help("Check issue_id_or_key_list for stray or doubled `|` separators")
    )]
    EmptyIssue { index: usize },
    #[error("No field key specified")]
    #[diagnostic(code(config::missing_field_key), help("Set field_key"))]
    MissingFieldKey,
    #[error("Could not parse arguments: {0}")]
    #[diagnostic(code(config::arguments))]
    Arguments(#[from] clap::Error),
}
