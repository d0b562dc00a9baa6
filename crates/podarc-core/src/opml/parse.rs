//! Outline-tree structures of the OPML export document.

use serde::Deserialize;

/// Root `<opml>` element.
#[derive(Debug, Deserialize)]
pub struct OpmlDocument {
    #[serde(rename = "@version")]
    pub version: Option<String>,
    pub head: Option<OpmlHead>,
    pub body: OpmlBody,
}

#[derive(Debug, Deserialize)]
pub struct OpmlHead {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OpmlBody {
    #[serde(default, rename = "outline")]
    pub outlines: Vec<OpmlOutline>,
}

/// One `<outline>` node. The export nests these arbitrarily: grouping nodes
/// carry only `text`, feed nodes carry `type="rss"` plus feed attributes,
/// and episode nodes carry the title/URL attributes.
#[derive(Debug, Deserialize)]
pub struct OpmlOutline {
    #[serde(rename = "@type")]
    pub kind: Option<String>,
    #[serde(rename = "@text")]
    pub text: Option<String>,
    #[serde(rename = "@title")]
    pub title: Option<String>,
    #[serde(rename = "@xmlUrl")]
    pub xml_url: Option<String>,
    #[serde(rename = "@pubDate")]
    pub pub_date: Option<String>,
    #[serde(rename = "@url")]
    pub url: Option<String>,
    #[serde(rename = "@enclosureUrl")]
    pub enclosure_url: Option<String>,
    #[serde(rename = "@overcastId")]
    pub episode_id: Option<String>,
    #[serde(default, rename = "outline")]
    pub children: Vec<OpmlOutline>,
}
