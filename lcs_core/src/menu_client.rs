//! This client fetches the family menu of a school from LinqConnect.

use tracing::{info, instrument};

use crate::{
    date_range::ResolvedRange,
    error::{Error, Result},
    menu::MenuResponse,
};

pub static URL: &str = "https://api.linqconnect.com/api/FamilyMenu";

#[derive(Debug, Clone)]
pub struct MenuClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for MenuClient {
    fn default() -> Self {
        MenuClient::new()
    }
}

impl MenuClient {
    pub fn new() -> Self {
        MenuClient::with_base_url(URL)
    }

    /// A client talking to another endpoint, e.g. a mock server.
    pub fn with_base_url(base_url: &str) -> Self {
        MenuClient {
            client: reqwest::Client::new(),
            base_url: String::from(base_url),
        }
    }

    /// Get the menu of a building for a date range.
    ///
    /// Exactly one request is sent, there are no retries.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch(
        &self,
        building_id: &str,
        district_id: &str,
        range: &ResolvedRange,
    ) -> Result<MenuResponse> {
        let body = self.get_response(building_id, district_id, range).await?;
        parse(&body)
    }

    async fn get_response(
        &self,
        building_id: &str,
        district_id: &str,
        range: &ResolvedRange,
    ) -> Result<String> {
        let (start_date, end_date) = range.query_dates();
        info!(url = %self.base_url, %range, "fetching menu");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("buildingId", building_id),
                ("districtId", district_id),
                ("startDate", start_date.as_str()),
                ("endDate", end_date.as_str()),
            ])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Fetch { status, body });
        }
        Ok(body)
    }
}

/// Parse the menu JSON.
fn parse(body: &str) -> Result<MenuResponse> {
    let menu: MenuResponse = serde_json::from_str(body)?;
    info!(
        sessions = menu.family_menu_sessions.len(),
        "menu response parsed"
    );
    Ok(menu)
}
