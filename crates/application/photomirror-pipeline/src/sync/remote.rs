use photomirror_core::formats::{
    parse_reply, AlbumsResponse, ApiReply, ImagesResponse, LoginResponse,
};
use photomirror_core::{Album, RemoteItem};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("invalid API endpoint {endpoint}: {reason}")]
    Endpoint { endpoint: String, reason: String },
    #[error("Login error: {0}")]
    Auth(String),
    #[error("Catalogue error: {0}")]
    Enumeration(String),
}

#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub nick_name: String,
}

/// Session establishment and hierarchy enumeration.
#[async_trait::async_trait]
pub trait CatalogueProvider: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, RemoteError>;
    async fn list_albums(&self, session: &Session) -> Result<Vec<Album>, RemoteError>;
    async fn list_items(
        &self,
        session: &Session,
        album: &Album,
    ) -> Result<Vec<RemoteItem>, RemoteError>;
}

/// Client for the SmugMug 1.2.2 JSON API.
pub struct SmugmugCatalogue {
    client: Client,
    endpoint: Url,
}

impl SmugmugCatalogue {
    pub fn new(client: Client, endpoint: &str) -> Result<Self, RemoteError> {
        let endpoint = Url::parse(endpoint).map_err(|e| RemoteError::Endpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(RemoteError::Endpoint {
                endpoint: endpoint.to_string(),
                reason: "scheme must be http or https".into(),
            });
        }
        Ok(Self { client, endpoint })
    }

    /// Issue one API method call. The error string never includes the query,
    /// which carries the password for the login call.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, &str)],
    ) -> Result<ApiReply<T>, String> {
        debug!("calling {}", method);
        let resp = self
            .client
            .get(self.endpoint.clone())
            .query(&[("method", method)])
            .query(params)
            .send()
            .await
            .map_err(|e| format!("{method} request failed: {}", e.without_url()))?;

        if !resp.status().is_success() {
            return Err(format!("{method} returned HTTP {}", resp.status()));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| format!("{method} body failed: {}", e.without_url()))?;

        parse_reply(&bytes).map_err(|e| format!("{method} parse failed: {e}"))
    }
}

#[async_trait::async_trait]
impl CatalogueProvider for SmugmugCatalogue {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, RemoteError> {
        let reply = self
            .call::<LoginResponse>(
                "smugmug.login.withPassword",
                &[
                    ("EmailAddress", credentials.email.as_str()),
                    ("Password", credentials.password.as_str()),
                    ("APIKey", credentials.api_key.as_str()),
                ],
            )
            .await
            .map_err(RemoteError::Auth)?;

        match reply {
            ApiReply::Ok(login) => Ok(Session {
                id: login.login.session.id,
                nick_name: login.login.user.nick_name,
            }),
            ApiReply::Fail(status) => Err(RemoteError::Auth(status.to_string())),
        }
    }

    async fn list_albums(&self, session: &Session) -> Result<Vec<Album>, RemoteError> {
        let reply = self
            .call::<AlbumsResponse>(
                "smugmug.albums.get",
                &[
                    ("SessionID", session.id.as_str()),
                    ("NickName", session.nick_name.as_str()),
                    ("Heavy", "1"),
                ],
            )
            .await
            .map_err(RemoteError::Enumeration)?;

        match reply {
            ApiReply::Ok(r) => Ok(r.albums.into_iter().map(Album::from).collect()),
            // A user without albums gets the same "empty set" answer.
            ApiReply::Fail(status) if status.is_empty_set() => Ok(Vec::new()),
            ApiReply::Fail(status) => Err(RemoteError::Enumeration(format!(
                "albums for {}: {status}",
                session.nick_name
            ))),
        }
    }

    async fn list_items(
        &self,
        session: &Session,
        album: &Album,
    ) -> Result<Vec<RemoteItem>, RemoteError> {
        let album_id = album.id.to_string();
        let reply = self
            .call::<ImagesResponse>(
                "smugmug.images.get",
                &[
                    ("SessionID", session.id.as_str()),
                    ("AlbumID", album_id.as_str()),
                    ("AlbumKey", album.key.as_str()),
                    ("Heavy", "1"),
                ],
            )
            .await
            .map_err(RemoteError::Enumeration)?;

        match reply {
            ApiReply::Ok(r) => Ok(r
                .album
                .images
                .into_iter()
                .map(|img| img.into_item(album))
                .collect()),
            ApiReply::Fail(status) if status.is_empty_set() => Ok(Vec::new()),
            ApiReply::Fail(status) => Err(RemoteError::Enumeration(format!(
                "images for album {}: {status}",
                album.title
            ))),
        }
    }
}
