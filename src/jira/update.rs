use http::StatusCode;
use log::{info, warn};
use reqwest::{Client, Request};

use super::{build_request, update_body, Error};
use crate::{config::Config, state::RunType};

/// Jira sets this header when it wants a CAPTCHA before accepting more logins.
const LOGIN_REASON: &str = "X-Seraph-LoginReason";
const AUTHENTICATION_DENIED: &str = "AUTHENTICATION_DENIED";

/// Set the configured field on every configured issue, one at a time and in order, stopping at
/// the first failure.
///
/// ## Errors
/// The first issue which could not be updated.
pub async fn update_issues(client: &Client, run_type: RunType<&Config>) -> Result<(), Error> {
    let (run_type, config) = run_type.take();
    let body = update_body(config)?;

    for issue in &config.issues {
        let request = build_request(client, config, issue, &body)?;
        if let RunType::DryRun(()) = run_type {
            info!(
                "Would set {field} on issue {issue} with {method} {url}",
                field = config.field_key,
                method = request.method(),
                url = request.url(),
            );
            continue;
        }
        update_issue(client, issue, request).await?;
    }
    Ok(())
}

async fn update_issue(client: &Client, issue: &str, request: Request) -> Result<(), Error> {
    info!("Updating issue {issue}");

    let response = client
        .execute(request)
        .await
        .map_err(|source| Error::Send {
            issue: issue.to_string(),
            source: Box::new(source),
        })?;

    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        info!("Issue {issue} updated successfully");
        return Ok(());
    }

    warn!("Jira API response status: {status}");
    let authentication_denied = response
        .headers()
        .get(LOGIN_REASON)
        .is_some_and(|reason| reason == AUTHENTICATION_DENIED);
    let body = response.text().await.map_err(|source| Error::ReadBody {
        issue: issue.to_string(),
        source: Box::new(source),
    })?;

    if authentication_denied {
        warn!("CAPTCHA triggered");
        return Err(Error::AuthenticationDenied {
            issue: issue.to_string(),
        });
    }
    warn!("Jira API response: {body}");
    Err(Error::Rejected {
        issue: issue.to_string(),
        status,
    })
}
