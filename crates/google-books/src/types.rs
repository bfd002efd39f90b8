//! Wire types for the volumes search response.
//!
//! Every field is defaulted: the upstream omits `items` on empty result sets
//! and drops most `volumeInfo` fields for sparse records.

use serde::{Deserialize, Serialize};

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Volumes {
    pub kind: String,
    /// Upstream's estimate of the total match count, not the page length.
    pub total_items: u64,
    pub items: Vec<Volume>,
}

/// A single book record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Volume {
    pub kind: String,
    pub id: String,
    pub etag: String,
    pub self_link: String,
    pub volume_info: VolumeInfo,
    pub sale_info: SaleInfo,
    pub access_info: AccessInfo,
    pub search_info: SearchInfo,
}

impl Volume {
    pub fn title(&self) -> &str {
        &self.volume_info.title
    }

    pub fn authors(&self) -> &[String] {
        &self.volume_info.authors
    }

    pub fn published_date(&self) -> &str {
        &self.volume_info.published_date
    }

    pub fn description(&self) -> &str {
        &self.volume_info.description
    }

    pub fn language(&self) -> &str {
        &self.volume_info.language
    }

    pub fn thumbnail(&self) -> &str {
        &self.volume_info.image_links.thumbnail
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VolumeInfo {
    pub title: String,
    pub authors: Vec<String>,
    pub publisher: String,
    /// Free-form: `YYYY`, `YYYY-MM` or `YYYY-MM-DD` in practice.
    pub published_date: String,
    pub description: String,
    pub industry_identifiers: Vec<IndustryIdentifier>,
    pub reading_modes: ReadingModes,
    pub page_count: u32,
    pub print_type: String,
    pub categories: Vec<String>,
    pub maturity_rating: String,
    pub allow_anon_logging: bool,
    pub content_version: String,
    pub panelization_summary: PanelizationSummary,
    pub image_links: ImageLinks,
    pub language: String,
    pub preview_link: String,
    pub info_link: String,
    pub canonical_volume_link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndustryIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingModes {
    pub text: bool,
    pub image: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanelizationSummary {
    pub contains_epub_bubbles: bool,
    pub contains_image_bubbles: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageLinks {
    pub small_thumbnail: String,
    pub thumbnail: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaleInfo {
    pub country: String,
    pub saleability: String,
    pub is_ebook: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessInfo {
    pub country: String,
    pub viewability: String,
    pub embeddable: bool,
    pub public_domain: bool,
    pub text_to_speech_permission: String,
    pub epub: EpubInfo,
    pub pdf: PdfInfo,
    pub web_reader_link: String,
    pub access_view_status: String,
    pub quote_sharing_allowed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EpubInfo {
    pub is_available: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PdfInfo {
    pub is_available: bool,
    pub acs_token_link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchInfo {
    pub text_snippet: String,
}
