use std::collections::HashSet;

use crate::config::Size;
use crate::error::{ChargeboardError, Result};

use super::view::BoardView;

/// Named elements the board renders into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MountPoint {
    Locations,
    LastUpdate,
    ScaleRoot,
    ErrorBanner,
}

impl MountPoint {
    /// Mount points without which nothing can be rendered
    pub const REQUIRED: [MountPoint; 3] = [
        MountPoint::Locations,
        MountPoint::LastUpdate,
        MountPoint::ScaleRoot,
    ];

    pub const ALL: [MountPoint; 4] = [
        MountPoint::Locations,
        MountPoint::LastUpdate,
        MountPoint::ScaleRoot,
        MountPoint::ErrorBanner,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MountPoint::Locations => "locations",
            MountPoint::LastUpdate => "last_update",
            MountPoint::ScaleRoot => "scale_root",
            MountPoint::ErrorBanner => "error_banner",
        }
    }
}

/// Anything the board can be projected onto.
///
/// Every mutation replaces what was there before; nothing is patched.
pub trait DisplaySurface: Send {
    fn has_mount(&self, mount: MountPoint) -> bool;

    /// Clear the locations mount and draw `view` into it
    fn replace_board(&mut self, view: &BoardView);

    /// Show the banner, or hide it entirely with `None`
    fn set_banner(&mut self, text: Option<&str>);

    fn set_last_update(&mut self, text: &str);

    fn viewport(&self) -> Size;

    fn set_viewport(&mut self, viewport: Size);

    /// Bounding box of the scale root at the current scale
    fn content_size(&self) -> Size;

    fn scale(&self) -> f64;

    fn set_scale(&mut self, scale: f64);

    /// End of a batch of mutations. Surfaces that push updates publish here.
    fn flush(&mut self) {}
}

/// Check that every required mount point exists
pub fn verify_mounts(surface: &dyn DisplaySurface) -> Result<()> {
    let missing: Vec<&str> = MountPoint::REQUIRED
        .iter()
        .filter(|m| !surface.has_mount(**m))
        .map(|m| m.name())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ChargeboardError::surface(format!(
            "Missing mount point(s): {}",
            missing.join(", ")
        )))
    }
}

/// In-memory surface, used headless and in tests
#[derive(Debug, Clone)]
pub struct MemorySurface {
    mounts: HashSet<MountPoint>,
    board: Option<BoardView>,
    render_count: u64,
    banner: Option<String>,
    last_update: Option<String>,
    viewport: Size,
    natural_size: Size,
    scale: f64,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self {
            mounts: MountPoint::ALL.into_iter().collect(),
            board: None,
            render_count: 0,
            banner: None,
            last_update: None,
            viewport: Size::new(1920.0, 1080.0),
            natural_size: Size::new(800.0, 600.0),
            scale: 1.0,
        }
    }
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface exposing only the given mount points
    pub fn with_mounts(mounts: &[MountPoint]) -> Self {
        Self {
            mounts: mounts.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Unscaled size the board occupies
    pub fn with_content_size(mut self, size: Size) -> Self {
        self.natural_size = size;
        self
    }

    pub fn with_viewport(mut self, viewport: Size) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn board(&self) -> Option<&BoardView> {
        self.board.as_ref()
    }

    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn last_update(&self) -> Option<&str> {
        self.last_update.as_deref()
    }
}

impl DisplaySurface for MemorySurface {
    fn has_mount(&self, mount: MountPoint) -> bool {
        self.mounts.contains(&mount)
    }

    fn replace_board(&mut self, view: &BoardView) {
        if !self.has_mount(MountPoint::Locations) {
            return;
        }
        self.board = Some(view.clone());
        self.render_count += 1;
    }

    fn set_banner(&mut self, text: Option<&str>) {
        if self.has_mount(MountPoint::ErrorBanner) {
            self.banner = text.map(str::to_string);
        }
    }

    fn set_last_update(&mut self, text: &str) {
        if self.has_mount(MountPoint::LastUpdate) {
            self.last_update = Some(text.to_string());
        }
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    fn content_size(&self) -> Size {
        self.natural_size.scaled(self.scale)
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }
}
