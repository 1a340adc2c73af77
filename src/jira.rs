use http::StatusCode;
use miette::Diagnostic;
use reqwest::Client;

mod request;
mod update;

pub use request::{build_request, issue_url, update_body};
pub use update::update_issues;

/// Create the client used for every request in a run.
///
/// ## Errors
/// If the TLS backend can't be initialized.
pub fn client() -> Result<Client, Error> {
    Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|source| Error::Client(Box::new(source)))
}

#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum Error {
    #[error("Could not create an HTTP client: {0}")]
    #[diagnostic(code(jira::client))]
    Client(#[source] Box<reqwest::Error>),
    #[error("Could not serialize the request body: {0}")]
    #[diagnostic(code(jira::body))]
    Body(#[from] serde_json::Error),
    #[error("Could not build a URL for issue {issue}")]
    #[diagnostic(
        code(jira::url),
        help("jira_instance_url must be a URL which paths can be appended to")
    )]
    Url { issue: String },
    #[error("The configured credentials are not a valid HTTP header value")]
    #[diagnostic(
        code(jira::header),
        help("Check jira_cookie, jira_username and jira_password for control characters")
    )]
    Header,
    #[error("Could not build the request for issue {issue}: {source}")]
    #[diagnostic(code(jira::build))]
    Build {
        issue: String,
        source: Box<reqwest::Error>,
    },
    #[error("Problem communicating with Jira while updating issue {issue}: {source}")]
    #[diagnostic(
        code(jira::send),
        help("Check your network connection and jira_instance_url")
    )]
    Send {
        issue: String,
        source: Box<reqwest::Error>,
    },
    #[error("Could not read the Jira API response for issue {issue}: {source}")]
    #[diagnostic(code(jira::read_body))]
    ReadBody {
        issue: String,
        source: Box<reqwest::Error>,
    },
    #[error("Jira denied authentication while updating issue {issue}")]
    #[diagnostic(
        code(jira::authentication_denied),
        help("Too many failed logins triggered a CAPTCHA, log in to Jira through a browser to clear it")
    )]
    AuthenticationDenied { issue: String },
    #[error("Jira API request for issue {issue} failed with status {status}")]
    #[diagnostic(
        code(jira::rejected),
        help("The response body was logged above, check the issue key, field key and permissions")
    )]
    Rejected { issue: String, status: StatusCode },
}
