//! Blocking HTTP implementation of [`ManagementApi`].

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use super::posture::PostureCheckDetail;
use super::wire::{ApiErrorEnvelope, ConfigCreate, ConfigDetail, ConfigUpdate, Envelope, ListQuery};
use super::ManagementApi;
use crate::{ZitiError, ZitiResult, ZitiResultExt};

const SESSION_HEADER: &str = "zt-session";
const CONFIG: &str = "config";
const POSTURE_CHECK: &str = "posture check";

#[derive(Serialize)]
struct PasswordLogin<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(serde::Deserialize)]
struct Session {
    token: String,
}

#[derive(serde::Deserialize)]
struct CreatedEntity {
    id: String,
}

/// Management API client authenticated with a session token.
pub struct HttpManagementClient {
    client: Client,
    base: Url,
    session: Option<String>,
}

impl fmt::Debug for HttpManagementClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpManagementClient")
            .field("base", &self.base.as_str())
            .field("authenticated", &self.session.is_some())
            .finish_non_exhaustive()
    }
}

impl HttpManagementClient {
    /// Build an unauthenticated client for `endpoint`.
    ///
    /// `ca_pool` is a base64 string holding either a PEM bundle or a single
    /// DER certificate; its certificates are trusted in addition to the
    /// built-in roots.
    ///
    /// # Errors
    ///
    /// Returns [`ZitiError::Endpoint`] for an unusable endpoint,
    /// [`ZitiError::CaPool`] for an undecodable CA pool, and
    /// [`ZitiError::Transport`] when the HTTP client cannot be built.
    pub fn new(endpoint: &str, ca_pool: Option<&str>) -> ZitiResult<Self> {
        let base = parse_endpoint(endpoint)?;
        let mut builder = Client::builder();
        if let Some(pool) = ca_pool {
            for certificate in decode_ca_pool(pool)? {
                builder = builder.add_root_certificate(certificate);
            }
        }
        Ok(Self {
            client: builder.build()?,
            base,
            session: None,
        })
    }

    /// Build a client and log in with a username and password.
    ///
    /// # Errors
    ///
    /// Same as [`HttpManagementClient::new`] and
    /// [`HttpManagementClient::authenticate`].
    pub fn connect(
        endpoint: &str,
        ca_pool: Option<&str>,
        username: &str,
        password: &str,
    ) -> ZitiResult<Self> {
        let mut client = Self::new(endpoint, ca_pool)?;
        client.authenticate(username, password)?;
        Ok(client)
    }

    /// Obtain a session token with password authentication.
    ///
    /// # Errors
    ///
    /// Returns [`ZitiError::Api`] when the controller rejects the
    /// credentials.
    pub fn authenticate(&mut self, username: &str, password: &str) -> ZitiResult<()> {
        let mut url = self.url(&["authenticate"])?;
        url.query_pairs_mut().append_pair("method", "password");
        let request = self
            .client
            .post(url)
            .json(&PasswordLogin { username, password });
        let session: Envelope<Session> = read_json(check(request.send()?, "session", username)?)?;
        info!(endpoint = %self.base, "authenticated with the management API");
        self.session = Some(session.data.token);
        Ok(())
    }

    /// Returns `true` once a session token is held.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    fn url(&self, segments: &[&str]) -> ZitiResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| cannot_be_base(self.base.as_str()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn with_session(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.session {
            Some(token) => request.header(SESSION_HEADER, token),
            None => request,
        }
    }

    fn send(&self, request: RequestBuilder, entity: &'static str, id: &str) -> ZitiResult<Response> {
        check(self.with_session(request).send()?, entity, id)
    }
}

impl ManagementApi for HttpManagementClient {
    fn create_config(&self, config: &ConfigCreate) -> ZitiResult<String> {
        let url = self.url(&["configs"])?;
        debug!(name = %config.name, "creating config");
        let response = self.send(self.client.post(url).json(config), CONFIG, &config.name)?;
        let created: Envelope<CreatedEntity> = read_json(response)?;
        Ok(created.data.id)
    }

    fn detail_config(&self, id: &str) -> ZitiResult<ConfigDetail> {
        let url = self.url(&["configs", id])?;
        let detail: Envelope<ConfigDetail> = read_json(self.send(self.client.get(url), CONFIG, id)?)?;
        Ok(detail.data)
    }

    fn update_config(&self, id: &str, config: &ConfigUpdate) -> ZitiResult<()> {
        let url = self.url(&["configs", id])?;
        debug!(%id, "updating config");
        self.send(self.client.put(url).json(config), CONFIG, id)?;
        Ok(())
    }

    fn delete_config(&self, id: &str) -> ZitiResult<()> {
        let url = self.url(&["configs", id])?;
        debug!(%id, "deleting config");
        self.send(self.client.delete(url), CONFIG, id)?;
        Ok(())
    }

    fn list_configs(&self, query: &ListQuery) -> ZitiResult<Vec<ConfigDetail>> {
        let mut url = self.url(&["configs"])?;
        url.query_pairs_mut()
            .append_pair("filter", &query.filter)
            .append_pair("limit", &query.limit.to_string())
            .append_pair("offset", &query.offset.to_string());
        debug!(filter = %query.filter, "listing configs");
        let list: Envelope<Vec<ConfigDetail>> =
            read_json(self.send(self.client.get(url), CONFIG, &query.filter)?)?;
        Ok(list.data)
    }

    fn detail_posture_check(&self, id: &str) -> ZitiResult<PostureCheckDetail> {
        let url = self.url(&["posture-checks", id])?;
        let detail: Envelope<PostureCheckDetail> =
            read_json(self.send(self.client.get(url), POSTURE_CHECK, id)?)?;
        Ok(detail.data)
    }
}

fn parse_endpoint(endpoint: &str) -> ZitiResult<Url> {
    let base = Url::parse(endpoint).map_err(|source| ZitiError::Endpoint {
        endpoint: endpoint.to_owned(),
        source,
    })?;
    if base.cannot_be_a_base() {
        return Err(cannot_be_base(endpoint));
    }
    Ok(base)
}

fn cannot_be_base(endpoint: &str) -> ZitiError {
    ZitiError::Endpoint {
        endpoint: endpoint.to_owned(),
        source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
    }
}

fn decode_ca_pool(pool: &str) -> ZitiResult<Vec<reqwest::Certificate>> {
    let bytes = STANDARD
        .decode(pool.trim())
        .map_err(|err| ZitiError::CaPool(format!("not valid base64: {err}")))?;
    let certificates = if bytes.starts_with(b"-----BEGIN") {
        reqwest::Certificate::from_pem_bundle(&bytes)
    } else {
        reqwest::Certificate::from_der(&bytes).map(|certificate| vec![certificate])
    }
    .map_err(|err| ZitiError::CaPool(err.to_string()))?;
    if certificates.is_empty() {
        return Err(ZitiError::CaPool("no certificates found".to_owned()));
    }
    debug!(count = certificates.len(), "loaded CA pool");
    Ok(certificates)
}

fn check(response: Response, entity: &'static str, id: &str) -> ZitiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ZitiError::not_found(entity, id));
    }
    let body = response.text()?;
    Err(ZitiError::Api {
        status: status.as_u16(),
        message: ApiErrorEnvelope::describe(&body),
    })
}

fn read_json<T: DeserializeOwned>(response: Response) -> ZitiResult<T> {
    let bytes = response.bytes()?;
    serde_json::from_slice(&bytes).into_unmarshal()
}
