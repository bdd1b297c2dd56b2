use bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Media host reference stored on hosted records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HostedImage {
    /// Identifier of the object on the media host
    pub public_id: String,
    /// Public URL of the object
    pub url: String,
}

/// Where the image bytes live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ImageSource {
    Hosted { image: HostedImage },
    Direct { url: String },
}

impl ImageSource {
    pub fn url(&self) -> &str {
        match self {
            ImageSource::Hosted { image } => &image.url,
            ImageSource::Direct { url } => url,
        }
    }
}

/// Image record as persisted in the `images` collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(flatten)]
    pub source: ImageSource,
}

impl ImageRecord {
    /// Media host identifier, present on hosted records only
    pub fn public_id(&self) -> Option<&str> {
        match &self.source {
            ImageSource::Hosted { image } => Some(&image.public_id),
            ImageSource::Direct { .. } => None,
        }
    }
}

/// Record fields before the store assigns an identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    pub name: String,
    pub source: ImageSource,
}

impl NewImage {
    pub fn hosted(name: impl Into<String>, public_id: String, url: String) -> Self {
        Self {
            name: name.into(),
            source: ImageSource::Hosted {
                image: HostedImage { public_id, url },
            },
        }
    }

    pub fn direct(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: ImageSource::Direct { url: url.into() },
        }
    }

    /// Document in the persisted field layout, without `_id`
    pub fn to_document(&self) -> Document {
        match &self.source {
            ImageSource::Hosted { image } => doc! {
                "name": self.name.as_str(),
                "image": { "publicId": image.public_id.as_str(), "url": image.url.as_str() },
            },
            ImageSource::Direct { url } => doc! {
                "name": self.name.as_str(),
                "url": url.as_str(),
            },
        }
    }
}

/// Image record as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImageResponse {
    /// Hex-encoded record identifier
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub source: ImageSource,
}

impl From<ImageRecord> for ImageResponse {
    fn from(record: ImageRecord) -> Self {
        Self {
            id: record.id.to_hex(),
            name: record.name,
            source: record.source,
        }
    }
}
