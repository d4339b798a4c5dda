//! Board rendering
//!
//! Rendering happens in two steps: [`build_view`] turns the configured groups
//! and the merged dataset into an immutable [`BoardView`], then the view is
//! projected onto a [`DisplaySurface`], replacing whatever it showed before.

use crate::config::DisplayConfig;
use crate::model::{LocationGroup, MergedDataset};
use crate::status::{classify_record, payment_link_with_base};

pub mod html;
pub mod html_surface;
pub mod page;
pub mod surface;
pub mod view;

pub use html_surface::{HtmlSurface, SurfaceSnapshot};
pub use surface::{DisplaySurface, MemorySurface, MountPoint, verify_mounts};
pub use view::{BoardView, ChargerTile, ColumnView, OutboundLink, SectionBody, SectionView};

/// Build the board view for one cycle
pub fn build_view(
    groups: &[LocationGroup],
    dataset: &MergedDataset,
    had_any_error: bool,
    display: &DisplayConfig,
    payment_base: &str,
) -> BoardView {
    let messages = &display.messages;

    let columns = groups
        .iter()
        .map(|group| ColumnView {
            title: group.name.clone(),
            sections: group
                .locations
                .iter()
                .map(|loc| {
                    let chargers = dataset.get(&loc.key).map(Vec::as_slice).unwrap_or(&[]);
                    let body = if chargers.is_empty() {
                        let text = if had_any_error {
                            &messages.load_failed
                        } else {
                            &messages.no_data
                        };
                        SectionBody::Placeholder(text.clone())
                    } else {
                        SectionBody::Chargers(
                            chargers
                                .iter()
                                .map(|ch| ChargerTile {
                                    plug: ch.plug.clone(),
                                    label: format!("{} {}", display.plug_label, ch.plug),
                                    state: classify_record(ch),
                                    dimmed: !ch.online.is_online(),
                                    link: OutboundLink::new_context(payment_link_with_base(
                                        payment_base,
                                        &loc.key,
                                        &ch.plug,
                                    )),
                                })
                                .collect(),
                        )
                    };
                    SectionView {
                        label: loc.label.clone(),
                        key: loc.key.clone(),
                        body,
                    }
                })
                .collect(),
        })
        .collect();

    BoardView {
        banner: had_any_error.then(|| messages.partial_failure_banner.clone()),
        columns,
    }
}

/// Build the view and project it onto `surface`
pub fn render<S: DisplaySurface + ?Sized>(
    surface: &mut S,
    groups: &[LocationGroup],
    dataset: &MergedDataset,
    had_any_error: bool,
    display: &DisplayConfig,
    payment_base: &str,
) -> BoardView {
    let view = build_view(groups, dataset, had_any_error, display, payment_base);
    surface.replace_board(&view);
    surface.set_banner(view.banner.as_deref());
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChargerRecord, Location};
    use crate::status::{DEFAULT_PAYMENT_BASE, DisplayState};

    fn groups() -> Vec<LocationGroup> {
        vec![
            LocationGroup::new(
                "Norte",
                vec![Location::new("Hotel", "inc298"), Location::new("Posto", "inc299")],
            ),
            LocationGroup::new("Sul", vec![Location::new("Mall", "pc111")]),
        ]
    }

    fn dataset() -> MergedDataset {
        let mut d = MergedDataset::new();
        d.insert(
            "inc298".to_string(),
            vec![
                ChargerRecord::new("1", "Charging", 1),
                ChargerRecord::new("2", "Available", 0),
            ],
        );
        d.insert("inc299".to_string(), vec![]);
        d
    }

    #[test]
    fn groups_and_locations_keep_configured_order() {
        let view = build_view(
            &groups(),
            &dataset(),
            false,
            &DisplayConfig::default(),
            DEFAULT_PAYMENT_BASE,
        );
        let titles: Vec<&str> = view.columns.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Norte", "Sul"]);
        let labels: Vec<&str> = view.columns[0]
            .sections
            .iter()
            .map(|s| s.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Hotel", "Posto"]);
    }

    #[test]
    fn tiles_carry_state_dimming_and_link() {
        let view = build_view(
            &groups(),
            &dataset(),
            false,
            &DisplayConfig::default(),
            DEFAULT_PAYMENT_BASE,
        );
        let SectionBody::Chargers(tiles) = &view.columns[0].sections[0].body else {
            panic!("expected chargers");
        };
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[0].label, "Plug 1");
        assert_eq!(tiles[0].state, DisplayState::Charging);
        assert!(!tiles[0].dimmed);
        assert_eq!(tiles[0].link.href, "https://incharge.app/now/INC298/1");
        assert_eq!(tiles[0].link.target, "_blank");
        assert_eq!(tiles[0].link.rel, "noopener noreferrer");

        assert_eq!(tiles[1].state, DisplayState::Offline);
        assert!(tiles[1].dimmed);
    }

    #[test]
    fn placeholder_text_depends_on_error_flag() {
        let display = DisplayConfig::default();
        let ok = build_view(&groups(), &dataset(), false, &display, DEFAULT_PAYMENT_BASE);
        let failed = build_view(&groups(), &dataset(), true, &display, DEFAULT_PAYMENT_BASE);

        // inc299 is present but empty, pc111 is absent from the dataset
        for view_and_text in [
            (&ok, &display.messages.no_data),
            (&failed, &display.messages.load_failed),
        ] {
            let (view, text) = view_and_text;
            assert_eq!(
                view.columns[0].sections[1].body,
                SectionBody::Placeholder(text.clone())
            );
            assert_eq!(
                view.columns[1].sections[0].body,
                SectionBody::Placeholder(text.clone())
            );
        }
        assert_ne!(display.messages.no_data, display.messages.load_failed);
    }

    #[test]
    fn banner_only_when_errors() {
        let display = DisplayConfig::default();
        let ok = build_view(&groups(), &dataset(), false, &display, DEFAULT_PAYMENT_BASE);
        assert_eq!(ok.banner, None);
        let failed = build_view(&groups(), &dataset(), true, &display, DEFAULT_PAYMENT_BASE);
        assert_eq!(
            failed.banner.as_deref(),
            Some(display.messages.partial_failure_banner.as_str())
        );
    }

    #[test]
    fn render_is_idempotent_and_clears_banner() {
        let display = DisplayConfig::default();
        let mut surface = MemorySurface::new();

        let first = render(&mut surface, &groups(), &dataset(), true, &display, DEFAULT_PAYMENT_BASE);
        assert!(surface.banner().is_some());

        let second = render(&mut surface, &groups(), &dataset(), false, &display, DEFAULT_PAYMENT_BASE);
        let third = render(&mut surface, &groups(), &dataset(), false, &display, DEFAULT_PAYMENT_BASE);
        assert_ne!(first, second);
        assert_eq!(second, third);
        assert_eq!(surface.board(), Some(&third));
        assert_eq!(surface.banner(), None);
        assert_eq!(surface.render_count(), 3);
    }
}
