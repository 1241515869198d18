use std::{error::Error, future::Future};

use futures::future;
use log::{debug, info};
use reqwest::Client;

use crate::grid::models::Section;

use super::models::{
    payload_model::{FacultySchedule, StudentSchedule},
    Config, SectionPage, View,
};

/// A trait, necessary for every entity that will be used for getting the sections of a view.
#[allow(async_fn_in_trait)]
pub trait SectionGetter {
    async fn get_sections(&self, view: &View) -> Result<SectionPage, Box<dyn Error>>;
}

/// Requests every level at once and concatenates the sections in the order
/// the levels were asked for. One failing level fails the whole page.
pub async fn collect_levels<F, Fut, E>(levels: &[u64], get_level: F) -> Result<Vec<Section>, E>
where
    F: Fn(u64) -> Fut,
    Fut: Future<Output = Result<Vec<Section>, E>>,
{
    let per_level = future::join_all(levels.iter().map(|&level_id| get_level(level_id)))
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(per_level.into_iter().flatten().collect())
}

/// Talks to the scheduling backend's REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(http_client: Client, config: &Config) -> Self {
        ApiClient {
            http_client,
            base_url: config.api_base_url.trim_end_matches('/').to_owned(),
            token: config.api_token.clone(),
        }
    }

    /// Path (with query) of the endpoint serving `view`.
    pub fn endpoint(view: &View) -> String {
        match view {
            View::Student { user_id } => format!("/sections/schedule/{}", user_id),
            View::Faculty { faculty_id } => format!("/sections/faculty/{}", faculty_id),
            View::Level {
                level_id,
                group_id: Some(group_id),
            } => format!("/sections?level_id={}&group_id={}", level_id, group_id),
            View::Level {
                level_id,
                group_id: None,
            } => format!("/sections?level_id={}", level_id),
            View::All { .. } => "/sections".to_owned(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, reqwest::Error> {
        let request_url = format!("{}{}", self.base_url, path);
        debug!("GET {}", request_url);
        let mut request = self.http_client.get(request_url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?.error_for_status()?;
        response.json().await
    }

    async fn get_level_sections(&self, level_id: u64) -> Result<Vec<Section>, reqwest::Error> {
        info!("Getting sections for level {}", level_id);
        self.get_json(&Self::endpoint(&View::Level {
            level_id,
            group_id: None,
        }))
        .await
    }
}

impl SectionGetter for ApiClient {
    async fn get_sections(&self, view: &View) -> Result<SectionPage, Box<dyn Error>> {
        let page = match view {
            View::Student { user_id } => {
                info!("Getting schedule for student {}", user_id);
                let schedule: StudentSchedule = self.get_json(&Self::endpoint(view)).await?;
                SectionPage::from(schedule)
            }
            View::Faculty { faculty_id } => {
                info!("Getting sections for faculty {}", faculty_id);
                let schedule: FacultySchedule = self.get_json(&Self::endpoint(view)).await?;
                SectionPage::from(schedule)
            }
            View::Level { .. } => SectionPage {
                sections: self.get_json(&Self::endpoint(view)).await?,
                owner: None,
            },
            View::All { levels } if levels.is_empty() => {
                info!("Getting all sections");
                SectionPage {
                    sections: self.get_json(&Self::endpoint(view)).await?,
                    owner: None,
                }
            }
            View::All { levels } => SectionPage {
                sections: collect_levels(levels, |level_id| self.get_level_sections(level_id)).await?,
                owner: None,
            },
        };
        info!("Collected {} sections", page.sections.len());
        Ok(page)
    }
}
