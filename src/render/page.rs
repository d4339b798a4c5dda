//! Built-in kiosk page and the client script that applies surface updates

use crate::config::MountsConfig;

use super::html::escape_html;

/// Default page: header with the last-update stamp, banner, scaled board
pub fn default_template(mounts: &MountsConfig) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Chargeboard</title>
<link rel="stylesheet" href="/assets/board.css">
<style>
  html, body {{ margin: 0; overflow: hidden; font-family: sans-serif; background: #0f1720; color: #f1f5f9; }}
  #{root} {{ transform-origin: top left; padding: 16px; display: inline-block; }}
  #{locations} {{ display: flex; gap: 24px; align-items: flex-start; }}
  #{banner} {{ display: none; background: #b91c1c; color: #fff; padding: 8px 12px; margin-bottom: 8px; }}
  .city-column {{ width: 420px; }}
  .containerInfo {{ display: flex; flex-wrap: wrap; gap: 8px; }}
  .containerInfo a {{ text-decoration: none; }}
  .chargerInfo {{ width: 120px; height: 48px; line-height: 48px; text-align: center; border-radius: 6px; color: #fff; }}
  .is-available {{ background: #16a34a; }}
  .is-preparing {{ background: #ca8a04; }}
  .is-finishing {{ background: #0284c7; }}
  .is-charging {{ background: #2563eb; }}
  .is-offline {{ background: #6b7280; }}
</style>
</head>
<body>
<div id="{root}">
  <div id="{banner}"></div>
  <p id="{last_update}"></p>
  <div id="{locations}"></div>
</div>
<script src="/board.js"></script>
</body>
</html>
"#,
        root = escape_html(&mounts.scale_root),
        banner = escape_html(&mounts.error_banner),
        last_update = escape_html(&mounts.last_update),
        locations = escape_html(&mounts.locations),
    )
}

fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

/// Client script: pulls the surface once, follows `/api/events`, reports resizes
pub fn board_script(mounts: &MountsConfig) -> String {
    format!(
        r#"(function () {{
  const ids = {{ locations: {locations}, lastUpdate: {last_update}, scaleRoot: {root}, banner: {banner} }};

  function apply(s) {{
    const locations = document.getElementById(ids.locations);
    if (locations) locations.innerHTML = s.locations_html;
    const lastUpdate = document.getElementById(ids.lastUpdate);
    if (lastUpdate) lastUpdate.textContent = s.last_update;
    const root = document.getElementById(ids.scaleRoot);
    if (root) root.style.transform = "scale(" + s.scale + ")";
    const banner = document.getElementById(ids.banner);
    if (banner) {{
      banner.style.display = s.banner ? "block" : "none";
      banner.textContent = s.banner || "";
    }}
  }}

  function reportViewport() {{
    fetch("/api/viewport", {{
      method: "POST",
      headers: {{ "Content-Type": "application/json" }},
      body: JSON.stringify({{ width: window.innerWidth, height: window.innerHeight }}),
    }}).catch(function (e) {{ console.error("[chargeboard] viewport report failed", e); }});
  }}

  fetch("/api/surface", {{ cache: "no-store" }})
    .then(function (r) {{ return r.json(); }})
    .then(apply)
    .catch(function (e) {{ console.error("[chargeboard] surface fetch failed", e); }});

  const events = new EventSource("/api/events");
  events.addEventListener("surface", function (e) {{ apply(JSON.parse(e.data)); }});

  window.addEventListener("resize", reportViewport);
  reportViewport();
}})();
"#,
        locations = js_string(&mounts.locations),
        last_update = js_string(&mounts.last_update),
        root = js_string(&mounts.scale_root),
        banner = js_string(&mounts.error_banner),
    )
}
