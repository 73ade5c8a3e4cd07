//! Wire format of the SmugMug 1.2.2 JSON API.
//!
//! Every response carries a `stat` field; failures add `code` and `message`
//! instead of the method payload.

use crate::{Album, RemoteItem};
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// `smugmug.images.get` answers an empty album with this failure code.
pub const EMPTY_SET_CODE: i64 = 15;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiStatus {
    pub stat: String,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiStatus {
    pub fn is_ok(&self) -> bool {
        self.stat == "ok"
    }

    pub fn is_empty_set(&self) -> bool {
        self.code == Some(EMPTY_SET_CODE)
    }
}

impl std::fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "stat={} code={} message={}",
            self.stat,
            self.code.map_or_else(|| "-".to_string(), |c| c.to_string()),
            self.message.as_deref().unwrap_or("-")
        )
    }
}

#[derive(Debug)]
pub enum ApiReply<T> {
    Ok(T),
    Fail(ApiStatus),
}

/// Decode a response body, separating API-level failures from payloads.
pub fn parse_reply<T: DeserializeOwned>(data: &[u8]) -> Result<ApiReply<T>> {
    let slice = strip_preamble(data);
    let status: ApiStatus = serde_json::from_slice(slice)
        .map_err(|e| anyhow::anyhow!("failed to parse API status: {e}"))?;
    if !status.is_ok() {
        return Ok(ApiReply::Fail(status));
    }
    let body: T = serde_json::from_slice(slice)
        .map_err(|e| anyhow::anyhow!("failed to parse API payload: {e}"))?;
    Ok(ApiReply::Ok(body))
}

// Some proxies prepend a UTF-8 BOM or blank lines.
fn strip_preamble(data: &[u8]) -> &[u8] {
    let data = data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data);
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    &data[start..]
}

// --- smugmug.login.withPassword ---

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct LoginResponse {
    pub login: LoginExternal,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct LoginExternal {
    pub session: SessionExternal,
    pub user: UserExternal,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionExternal {
    pub id: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct UserExternal {
    pub nick_name: String,
}

// --- smugmug.albums.get ---

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct AlbumsResponse {
    #[serde(default)]
    pub albums: Vec<AlbumExternal>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct AlbumExternal {
    #[serde(rename = "id")]
    pub id: u64,
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: Option<CategoryExternal>,
    #[serde(default)]
    pub sub_category: Option<CategoryExternal>,
    #[serde(rename = "URL", default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct CategoryExternal {
    #[serde(rename = "id", default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

impl From<AlbumExternal> for Album {
    fn from(a: AlbumExternal) -> Album {
        Album {
            id: a.id,
            key: a.key,
            title: a.title,
            // A missing category maps to an empty group, which the path
            // mapper rejects rather than inventing a directory name.
            category: a.category.map(|c| c.name).unwrap_or_default(),
            subcategory: a.sub_category.map(|c| c.name),
            url: a.url,
        }
    }
}

// --- smugmug.images.get ---

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct ImagesResponse {
    pub album: ImagesAlbumExternal,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct ImagesAlbumExternal {
    #[serde(default)]
    pub images: Vec<ImageExternal>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct ImageExternal {
    #[serde(rename = "id")]
    pub id: u64,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(rename = "MD5Sum", default)]
    pub md5_sum: String,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "OriginalURL", default)]
    pub original_url: String,
}

impl ImageExternal {
    pub fn into_item(self, album: &Album) -> RemoteItem {
        RemoteItem {
            id: self.id,
            key: self.key,
            position: album.position_of(&self.file_name),
            checksum: self.md5_sum,
            size: self.size,
            url: self.original_url,
        }
    }
}
