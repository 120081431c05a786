use serde::{Deserialize, Serialize};

/// A self-hosted service listed on the cloud page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudService {
    pub name: String,
    pub description: String,
    pub url: String,
    pub icon_url: String,
}

impl CloudService {
    fn new(name: &str, description: &str, url: &str, icon_url: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            url: url.to_string(),
            icon_url: icon_url.to_string(),
        }
    }
}

const ICONS: &str = "https://cdn.jsdelivr.net/gh/homarr-labs/dashboard-icons";

/// Services shown on the cloud page, in display order.
/// Add or remove entries here.
pub fn cloud_services() -> Vec<CloudService> {
    vec![
        CloudService::new(
            "FoundryVTT",
            "Virtual tabletop for playing tabletop RPGs online",
            "https://foundry.robswebhub.net",
            &format!("{ICONS}/png/foundry-vtt.png"),
        ),
        CloudService::new(
            "Vaultwarden",
            "Lightweight, self-hosted password manager compatible with Bitwarden",
            "https://vault.robswebhub.net",
            &format!("{ICONS}/svg/vaultwarden.svg"),
        ),
        CloudService::new(
            "Wakapi",
            "Coding activity dashboard that tracks time spent in your editor",
            "https://wakapi.robswebhub.net",
            &format!("{ICONS}/svg/wakapi.svg"),
        ),
        CloudService::new(
            "Nextcloud",
            "Personal cloud storage for files, calendars, and contacts",
            "https://storage.robswebhub.net",
            &format!("{ICONS}/svg/nextcloud.svg"),
        ),
        CloudService::new(
            "Uptime Kuma",
            "Self-hosted monitoring tool to track service uptime and availability",
            "https://uptime.robswebhub.net",
            &format!("{ICONS}/svg/uptime-kuma.svg"),
        ),
        CloudService::new(
            "Audiobookshelf",
            "Self-hosted audiobook and podcast server",
            "https://audiobookshelf.robswebhub.net",
            &format!("{ICONS}/svg/audiobookshelf.svg"),
        ),
        CloudService::new(
            "Paperless-ngx",
            "Document management system that turns physical documents into a searchable archive of PDFs",
            "https://paperless.robswebhub.net",
            &format!("{ICONS}/svg/paperless-ngx.svg"),
        ),
        CloudService::new(
            "Miniflux",
            "Minimalist and opinionated feed reader",
            "https://miniflux.robswebhub.net",
            &format!("{ICONS}/svg/miniflux.svg"),
        ),
    ]
}
