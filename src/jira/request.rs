use std::collections::HashMap;

use base64::{prelude::BASE64_STANDARD as base64, Engine};
use http::{
    header::{HeaderName, ACCEPT, AUTHORIZATION, CONTENT_TYPE, COOKIE},
    HeaderValue, Method,
};
use reqwest::{Client, Request, Url};
use serde::Serialize;

use super::Error;
use crate::config::{Auth, Config};

const APPLICATION_JSON: &str = "application/json";

#[derive(Serialize, Debug)]
struct UpdateBody<'a> {
    fields: HashMap<&'a str, &'a str>,
}

/// The JSON body which sets the configured field. The same body is sent for every issue.
///
/// ## Errors
/// If the body can't be serialized.
pub fn update_body(config: &Config) -> Result<Vec<u8>, Error> {
    let body = UpdateBody {
        fields: HashMap::from([(config.field_key.as_str(), config.field_value.as_str())]),
    };
    Ok(serde_json::to_vec(&body)?)
}

/// `{instance_url}/rest/api/2/issue/{issue}`, keeping any path the instance URL already has.
///
/// ## Errors
/// If `instance_url` can't have path segments appended to it.
pub fn issue_url(instance_url: &Url, issue: &str) -> Result<Url, Error> {
    let mut url = instance_url.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|()| Error::Url {
            issue: issue.to_string(),
        })?
        .pop_if_empty()
        .extend(["rest", "api", "2", "issue", issue]);
    Ok(url)
}

/// Build the authenticated `PUT` which updates a single issue with `body`.
///
/// ## Errors
/// If the URL, the auth header, or the request itself can't be built.
pub fn build_request(
    client: &Client,
    config: &Config,
    issue: &str,
    body: &[u8],
) -> Result<Request, Error> {
    let url = issue_url(&config.instance_url, issue)?;
    let (auth_name, auth_value) = auth_header(&config.auth)?;
    client
        .request(Method::PUT, url)
        .header(CONTENT_TYPE, APPLICATION_JSON)
        .header(ACCEPT, APPLICATION_JSON)
        .header(auth_name, auth_value)
        .body(body.to_vec())
        .build()
        .map_err(|source| Error::Build {
            issue: issue.to_string(),
            source: Box::new(source),
        })
}

fn auth_header(auth: &Auth) -> Result<(HeaderName, HeaderValue), Error> {
    let (name, value) = match auth {
        Auth::Basic { username, password } => {
            let credentials = base64.encode(format!("{username}:{}", password.expose()));
            (AUTHORIZATION, format!("Basic {credentials}"))
        }
        Auth::Cookie { name, value } => (COOKIE, format!("{name}={}", value.expose())),
    };
    let mut value = HeaderValue::from_str(&value).map_err(|_| Error::Header)?;
    value.set_sensitive(true);
    Ok((name, value))
}
