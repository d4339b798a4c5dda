use super::*;
use crate::model::Location;

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.incharge.app".to_string(),
            payment_base_url: crate::status::DEFAULT_PAYMENT_BASE.to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            no_data: "Sem dados no momento".to_string(),
            load_failed: "Falha ao carregar (ver log)".to_string(),
            partial_failure_banner:
                "Falha ao carregar dados de alguns/ todos os locais (ver log).".to_string(),
            unexpected_error_banner: "Erro inesperado ao carregar dados (ver log).".to_string(),
            missing_mounts_banner: "Erro: elementos base não encontrados (IDs).".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timezone: "America/Sao_Paulo".to_string(),
            last_update_format: "Última atualização: %d/%m/%Y às %H:%M:%S".to_string(),
            plug_label: "Plug".to_string(),
            messages: MessagesConfig::default(),
        }
    }
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            page_padding: 16.0,
            header_height: 64.0,
            column_width: 420.0,
            column_gap: 24.0,
            group_heading_height: 48.0,
            location_heading_height: 40.0,
            tile_width: 128.0,
            tile_height: 56.0,
            placeholder_height: 32.0,
            banner_height: 44.0,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin_px: 8.0,
            min_scale: 0.6,
            default_viewport: Size::new(1920.0, 1080.0),
            metrics: LayoutMetrics::default(),
        }
    }
}

impl Default for MountsConfig {
    fn default() -> Self {
        Self {
            locations: "locations".to_string(),
            last_update: "last-update".to_string(),
            scale_root: "scale-root".to_string(),
            error_banner: "page-error".to_string(),
        }
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            template_file: None,
            mounts: MountsConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            console_level: None,
            file_level: None,
            file: "/tmp/chargeboard".to_string(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8090,
            assets_dir: "./assets".to_string(),
        }
    }
}

/// The two board columns shipped out of the box
pub fn default_groups() -> Vec<LocationGroup> {
    vec![
        LocationGroup::new(
            "Locais",
            vec![
                Location::new("Hotel Santory", "inc298"),
                Location::new("Hotel Colonial", "inc334"),
                Location::new("Drogaria Americana", "inc335"),
            ],
        ),
        LocationGroup::new(
            "Locais",
            vec![
                Location::new("Shopping Fabrika Mall DC", "pc111"),
                Location::new("Posto Caxuxa", "inc299"),
                Location::new("Posto One", "inc332"),
            ],
        ),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: EndpointConfig::default(),
            refresh_interval_ms: 30_000,
            groups: default_groups(),
            display: DisplayConfig::default(),
            layout: LayoutConfig::default(),
            surface: SurfaceConfig::default(),
            logging: LoggingConfig::default(),
            web: WebConfig::default(),
        }
    }
}
