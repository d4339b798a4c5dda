use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::watch;

use crate::config::{LayoutConfig, LayoutMetrics, MountsConfig, Size, SurfaceConfig};
use crate::error::{ChargeboardError, Result};

use super::html::locations_html;
use super::page::default_template;
use super::surface::{DisplaySurface, MountPoint};
use super::view::{BoardView, SectionBody};

/// What the kiosk page needs to draw itself
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceSnapshot {
    pub locations_html: String,
    pub last_update: String,
    pub banner: Option<String>,
    pub scale: f64,
    pub revision: u64,
}

/// Surface backed by an HTML page template.
///
/// Mount points are the elements whose `id` matches the configured mount ids.
/// Changes are published as a fresh [`SurfaceSnapshot`] on a watch channel
/// when the batch is flushed, and only if something visible changed.
#[derive(Debug)]
pub struct HtmlSurface {
    template: String,
    present: HashSet<MountPoint>,
    metrics: LayoutMetrics,
    board: Option<BoardView>,
    locations_html: String,
    last_update: String,
    banner: Option<String>,
    viewport: Size,
    scale: f64,
    revision: u64,
    published: watch::Sender<Arc<SurfaceSnapshot>>,
}

fn template_has_id(template: &str, id: &str) -> bool {
    !id.is_empty()
        && (template.contains(&format!("id=\"{}\"", id))
            || template.contains(&format!("id='{}'", id)))
}

impl HtmlSurface {
    pub fn new(template: String, mounts: &MountsConfig, layout: &LayoutConfig) -> Self {
        let present = MountPoint::ALL
            .into_iter()
            .filter(|m| {
                let id = match m {
                    MountPoint::Locations => &mounts.locations,
                    MountPoint::LastUpdate => &mounts.last_update,
                    MountPoint::ScaleRoot => &mounts.scale_root,
                    MountPoint::ErrorBanner => &mounts.error_banner,
                };
                template_has_id(&template, id)
            })
            .collect();

        let initial = Arc::new(SurfaceSnapshot {
            locations_html: String::new(),
            last_update: String::new(),
            banner: None,
            scale: 1.0,
            revision: 0,
        });
        let (published, _) = watch::channel(initial);

        Self {
            template,
            present,
            metrics: layout.metrics.clone(),
            board: None,
            locations_html: String::new(),
            last_update: String::new(),
            banner: None,
            viewport: layout.default_viewport,
            scale: 1.0,
            revision: 0,
            published,
        }
    }

    /// Build from config: the configured template file, or the built-in page
    pub fn from_config(surface: &SurfaceConfig, layout: &LayoutConfig) -> Result<Self> {
        let template = match &surface.template_file {
            Some(path) => std::fs::read_to_string(path).map_err(|e| {
                ChargeboardError::io(format!("Failed to read page template {}: {}", path, e))
            })?,
            None => default_template(&surface.mounts),
        };
        Ok(Self::new(template, &surface.mounts, layout))
    }

    /// Like [`HtmlSurface::from_config`], but an unreadable template file
    /// falls back to the built-in page. The load error is handed back so the
    /// caller can keep the refresh loop off and show the banner.
    pub fn from_config_or_builtin(
        surface: &SurfaceConfig,
        layout: &LayoutConfig,
    ) -> (Self, Option<ChargeboardError>) {
        match Self::from_config(surface, layout) {
            Ok(built) => (built, None),
            Err(e) => (
                Self::new(default_template(&surface.mounts), &surface.mounts, layout),
                Some(e),
            ),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn board(&self) -> Option<&BoardView> {
        self.board.as_ref()
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        SurfaceSnapshot {
            locations_html: self.locations_html.clone(),
            last_update: self.last_update.clone(),
            banner: self.banner.clone(),
            scale: self.scale,
            revision: self.revision,
        }
    }

    /// Last snapshot sent to subscribers
    pub fn published(&self) -> SurfaceSnapshot {
        self.published.borrow().as_ref().clone()
    }

    /// Follow published snapshots
    pub fn subscribe(&self) -> watch::Receiver<Arc<SurfaceSnapshot>> {
        self.published.subscribe()
    }
}

/// Estimate the unscaled size of the scale root from the page box model
pub fn estimate_content_size(
    view: Option<&BoardView>,
    banner_shown: bool,
    m: &LayoutMetrics,
) -> Size {
    let columns = view.map(|v| v.columns.as_slice()).unwrap_or(&[]);
    let n = columns.len() as f64;
    let gaps = (n - 1.0).max(0.0);
    let width = 2.0 * m.page_padding + n * m.column_width + gaps * m.column_gap;

    let tiles_per_row = if m.tile_width > 0.0 {
        ((m.column_width / m.tile_width).floor() as usize).max(1)
    } else {
        1
    };
    let tallest = columns
        .iter()
        .map(|c| {
            m.group_heading_height
                + c.sections
                    .iter()
                    .map(|s| {
                        m.location_heading_height
                            + match &s.body {
                                SectionBody::Placeholder(_) => m.placeholder_height,
                                SectionBody::Chargers(tiles) => {
                                    tiles.len().div_ceil(tiles_per_row) as f64 * m.tile_height
                                }
                            }
                    })
                    .sum::<f64>()
        })
        .fold(0.0, f64::max);

    let banner = if banner_shown { m.banner_height } else { 0.0 };
    Size::new(width, 2.0 * m.page_padding + banner + m.header_height + tallest)
}

impl DisplaySurface for HtmlSurface {
    fn has_mount(&self, mount: MountPoint) -> bool {
        self.present.contains(&mount)
    }

    fn replace_board(&mut self, view: &BoardView) {
        if !self.has_mount(MountPoint::Locations) {
            return;
        }
        self.locations_html = locations_html(view);
        self.board = Some(view.clone());
    }

    fn set_banner(&mut self, text: Option<&str>) {
        if !self.has_mount(MountPoint::ErrorBanner) {
            return;
        }
        self.banner = text.map(str::to_string);
    }

    fn set_last_update(&mut self, text: &str) {
        if !self.has_mount(MountPoint::LastUpdate) {
            return;
        }
        self.last_update = text.to_string();
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    fn content_size(&self) -> Size {
        estimate_content_size(self.board.as_ref(), self.banner.is_some(), &self.metrics)
            .scaled(self.scale)
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    fn flush(&mut self) {
        let current = Arc::clone(&self.published.borrow());
        let mut next = self.snapshot();
        next.revision = current.revision;
        if *current == next {
            return;
        }
        self.revision = current.revision + 1;
        next.revision = self.revision;
        self.published.send_replace(Arc::new(next));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::verify_mounts;
    use crate::render::view::{ChargerTile, ColumnView, OutboundLink, SectionView};
    use crate::status::DisplayState;

    fn tile(n: usize) -> ChargerTile {
        ChargerTile {
            plug: n.to_string(),
            label: format!("Plug {}", n),
            state: DisplayState::Available,
            dimmed: false,
            link: OutboundLink::new_context(format!("https://x/now/K/{}", n)),
        }
    }

    fn board(columns: usize, tiles: usize) -> BoardView {
        BoardView {
            banner: None,
            columns: (0..columns)
                .map(|c| ColumnView {
                    title: format!("C{}", c),
                    sections: vec![SectionView {
                        label: "L".to_string(),
                        key: "k".to_string(),
                        body: SectionBody::Chargers((0..tiles).map(tile).collect()),
                    }],
                })
                .collect(),
        }
    }

    #[test]
    fn default_template_exposes_all_mounts() {
        let surface = HtmlSurface::from_config(&SurfaceConfig::default(), &LayoutConfig::default())
            .unwrap();
        for m in MountPoint::ALL {
            assert!(surface.has_mount(m), "missing {:?}", m);
        }
        assert!(verify_mounts(&surface).is_ok());
    }

    #[test]
    fn custom_template_missing_ids_fails_verification() {
        let template = r#"<div id='locations'></div><p id="page-error"></p>"#.to_string();
        let surface = HtmlSurface::new(
            template,
            &MountsConfig::default(),
            &LayoutConfig::default(),
        );
        assert!(surface.has_mount(MountPoint::Locations));
        assert!(surface.has_mount(MountPoint::ErrorBanner));
        assert!(!surface.has_mount(MountPoint::ScaleRoot));
        assert!(verify_mounts(&surface).is_err());
    }

    #[test]
    fn unreadable_template_falls_back_to_builtin_page() {
        let dir = tempfile::tempdir().unwrap();
        let config = SurfaceConfig {
            template_file: Some(dir.path().join("missing.html").display().to_string()),
            ..SurfaceConfig::default()
        };
        assert!(HtmlSurface::from_config(&config, &LayoutConfig::default()).is_err());

        let (mut surface, err) =
            HtmlSurface::from_config_or_builtin(&config, &LayoutConfig::default());
        assert!(matches!(err, Some(ChargeboardError::Io { .. })));
        assert!(verify_mounts(&surface).is_ok());
        assert_eq!(surface.template(), default_template(&config.mounts));

        surface.set_banner(Some("Erro: elementos base não encontrados (IDs)."));
        surface.flush();
        assert!(surface.published().banner.is_some());
    }

    #[test]
    fn readable_template_reports_no_error() {
        let (_, err) =
            HtmlSurface::from_config_or_builtin(&SurfaceConfig::default(), &LayoutConfig::default());
        assert!(err.is_none());
    }

    #[test]
    fn changes_are_published_on_flush() {
        let mut surface =
            HtmlSurface::from_config(&SurfaceConfig::default(), &LayoutConfig::default()).unwrap();
        let rx = surface.subscribe();

        surface.replace_board(&board(1, 2));
        surface.set_banner(Some("falha"));
        surface.set_last_update("agora");
        assert_eq!(rx.borrow().revision, 0);

        surface.flush();
        let snap = rx.borrow().clone();
        assert_eq!(snap.revision, 1);
        assert_eq!(snap.banner.as_deref(), Some("falha"));
        assert_eq!(snap.last_update, "agora");
        assert!(snap.locations_html.contains("Plug 1"));

        // Scale reset and restore within one batch is not a visible change
        surface.set_scale(1.0);
        surface.set_scale(1.0);
        surface.flush();
        assert_eq!(rx.borrow().revision, 1);

        surface.set_banner(None);
        surface.flush();
        assert_eq!(rx.borrow().revision, 2);
        assert_eq!(rx.borrow().banner, None);
    }

    #[test]
    fn estimate_grows_with_columns_and_tiles() {
        let m = LayoutMetrics::default();
        let small = estimate_content_size(Some(&board(1, 1)), false, &m);
        let wide = estimate_content_size(Some(&board(4, 1)), false, &m);
        let tall = estimate_content_size(Some(&board(1, 40)), false, &m);
        assert!(wide.width > small.width);
        assert_eq!(wide.height, small.height);
        assert!(tall.height > small.height);

        let empty = estimate_content_size(None, false, &m);
        assert!(empty.width > 0.0 && empty.height > 0.0);
    }

    #[test]
    fn shown_banner_counts_toward_content_height() {
        let mut surface =
            HtmlSurface::from_config(&SurfaceConfig::default(), &LayoutConfig::default()).unwrap();
        surface.replace_board(&board(2, 6));
        let without = surface.content_size();

        surface.set_banner(Some("Falha ao atualizar"));
        let with = surface.content_size();
        assert_eq!(with.width, without.width);
        assert_eq!(
            with.height - without.height,
            LayoutMetrics::default().banner_height
        );

        surface.set_banner(None);
        assert_eq!(surface.content_size(), without);
    }

    #[test]
    fn banner_lowers_fitted_scale() {
        let layout = LayoutConfig::default();
        let mut surface = HtmlSurface::from_config(&SurfaceConfig::default(), &layout).unwrap();
        surface.replace_board(&board(1, 60));
        surface.set_viewport(Size::new(1920.0, 1080.0));
        let plain = crate::refresh::fit_to_viewport(&mut surface, &layout);

        surface.set_banner(Some("Falha ao atualizar"));
        let with_banner = crate::refresh::fit_to_viewport(&mut surface, &layout);
        assert!(plain < 1.0);
        assert!(with_banner < plain);
    }
}
