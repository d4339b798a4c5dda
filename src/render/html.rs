//! HTML projection of a [`BoardView`]

use std::fmt::Write as _;

use super::view::{BoardView, ChargerTile, SectionBody};

/// Escape text for use inside element content and quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn tile_html(out: &mut String, tile: &ChargerTile) {
    let _ = write!(
        out,
        r#"<a href="{}" target="{}" rel="{}"><div class="chargerInfo {}""#,
        escape_html(&tile.link.href),
        tile.link.target,
        tile.link.rel,
        tile.state.css_class(),
    );
    if tile.dimmed {
        out.push_str(r#" style="opacity: 0.6""#);
    }
    let _ = write!(out, ">{}</div></a>", escape_html(&tile.label));
}

/// Content of the locations mount: one `city-column` per group
pub fn locations_html(view: &BoardView) -> String {
    let mut out = String::new();
    for column in &view.columns {
        out.push_str(r#"<div class="city-column">"#);
        let _ = write!(out, "<h2>{}</h2>", escape_html(&column.title));
        for section in &column.sections {
            let _ = write!(
                out,
                r#"<h3 class="titleCidade">{}</h3><div class="containerInfo">"#,
                escape_html(&section.label)
            );
            match &section.body {
                SectionBody::Placeholder(text) => {
                    let _ = write!(out, r#"<p class="loading">{}</p>"#, escape_html(text));
                }
                SectionBody::Chargers(tiles) => {
                    for tile in tiles {
                        tile_html(&mut out, tile);
                    }
                }
            }
            out.push_str("</div>");
        }
        out.push_str("</div>");
    }
    out
}
