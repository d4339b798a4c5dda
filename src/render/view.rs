use serde::Serialize;

use crate::status::DisplayState;

/// Whole board as rendered for one refresh cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    /// Global error banner; `None` means the banner is hidden
    pub banner: Option<String>,
    pub columns: Vec<ColumnView>,
}

/// One location group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnView {
    pub title: String,
    pub sections: Vec<SectionView>,
}

/// One location inside a column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub label: String,
    pub key: String,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SectionBody {
    Placeholder(String),
    Chargers(Vec<ChargerTile>),
}

/// A single clickable plug tile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargerTile {
    pub plug: String,
    pub label: String,
    pub state: DisplayState,
    /// Rendered faded when the plug reports offline
    pub dimmed: bool,
    pub link: OutboundLink,
}

/// Link opened in a new browsing context without an opener reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundLink {
    pub href: String,
    pub target: &'static str,
    pub rel: &'static str,
}

impl OutboundLink {
    pub fn new_context(href: String) -> Self {
        Self {
            href,
            target: "_blank",
            rel: "noopener noreferrer",
        }
    }
}

impl BoardView {
    /// Total number of plug tiles on the board
    pub fn tile_count(&self) -> usize {
        self.columns
            .iter()
            .flat_map(|c| c.sections.iter())
            .map(|s| match &s.body {
                SectionBody::Chargers(tiles) => tiles.len(),
                SectionBody::Placeholder(_) => 0,
            })
            .sum()
    }
}
