use serde::{Deserialize, Serialize};

use super::models::CloudService;

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HomePage {
    pub logged_in: bool,
    pub user_name: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AboutPage {
    pub logged_in: bool,
    pub title: String,
    pub summary: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CloudPage {
    pub logged_in: bool,
    pub services: Vec<CloudService>,
}
