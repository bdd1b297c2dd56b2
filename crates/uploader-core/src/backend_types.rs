use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Record store backend types
///
/// Defined in core because it is read from configuration and consumed by the
/// store factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(anyhow::anyhow!("Invalid store backend: {}", s)),
        }
    }
}

impl Display for StoreBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StoreBackend::Mongo => write!(f, "mongo"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Media host backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaHostBackend {
    Cloudinary,
    Local,
}

impl FromStr for MediaHostBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cloudinary" => Ok(MediaHostBackend::Cloudinary),
            "local" => Ok(MediaHostBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid media host backend: {}", s)),
        }
    }
}

impl Display for MediaHostBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaHostBackend::Cloudinary => write!(f, "cloudinary"),
            MediaHostBackend::Local => write!(f, "local"),
        }
    }
}
