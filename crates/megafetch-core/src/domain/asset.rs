//! Asset, component and grant types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A catalog asset together with its category tags.
///
/// Immutable once fetched; produced by the catalog and consumed by the
/// priority filter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    /// Catalog identifier of the asset.
    pub id: String,
    /// Category tags as returned by the detail endpoint.
    pub categories: Vec<String>,
}

impl AssetRef {
    /// Create a new asset reference.
    pub fn new(id: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            id: id.into(),
            categories,
        }
    }
}

/// A texture channel the pipeline knows how to consume.
///
/// The declaration order is the order in which components are requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    NormalBump,
    NormalObject,
    Albedo,
    Cavity,
    Curvature,
    Gloss,
    Normal,
    Displacement,
    Bump,
    Ao,
    Metalness,
    Diffuse,
    Roughness,
    Specular,
    Fuzz,
}

impl ComponentType {
    /// Every recognized component type, in request order.
    pub const ALL: [Self; 15] = [
        Self::NormalBump,
        Self::NormalObject,
        Self::Albedo,
        Self::Cavity,
        Self::Curvature,
        Self::Gloss,
        Self::Normal,
        Self::Displacement,
        Self::Bump,
        Self::Ao,
        Self::Metalness,
        Self::Diffuse,
        Self::Roughness,
        Self::Specular,
        Self::Fuzz,
    ];

    /// The tag used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NormalBump => "normalbump",
            Self::NormalObject => "normalobject",
            Self::Albedo => "albedo",
            Self::Cavity => "cavity",
            Self::Curvature => "curvature",
            Self::Gloss => "gloss",
            Self::Normal => "normal",
            Self::Displacement => "displacement",
            Self::Bump => "bump",
            Self::Ao => "ao",
            Self::Metalness => "metalness",
            Self::Diffuse => "diffuse",
            Self::Roughness => "roughness",
            Self::Specular => "specular",
            Self::Fuzz => "fuzz",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .copied()
            .ok_or_else(|| format!("unrecognized component type: {s}"))
    }
}

/// A negotiated authorization to fetch one asset archive.
///
/// Deliberately not `Clone`: a grant is moved into exactly one transfer.
#[derive(Debug, PartialEq, Eq)]
pub struct DownloadGrant {
    /// Download identifier issued by the remote service.
    pub download_id: String,
    /// Asset the grant was issued for.
    pub asset_id: String,
    /// Fully built transfer URL for the archive.
    pub transfer_url: String,
}
