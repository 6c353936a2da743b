use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use super::error::*;

/// A ticket as returned by the ticket endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: i64,
    pub event_date: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date_range_label: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, alias = "isPurchased", alias = "purchased")]
    pub is_eligible: bool,
}

impl EventRecord {
    pub fn new(id: i64, event_date: &str) -> Self {
        EventRecord {
            id,
            event_date: event_date.to_owned(),
            title: String::new(),
            subtitle: String::new(),
            location: String::new(),
            date_range_label: String::new(),
            image_url: String::new(),
            is_eligible: true,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    pub fn eligible(mut self, is_eligible: bool) -> Self {
        self.is_eligible = is_eligible;
        self
    }
}

#[derive(Deserialize)]
struct TicketResponse {
    data: Vec<Value>,
}

/// Decodes the `{"data": [...]}` payload of the ticket endpoint.
///
/// Entries that do not decode as an [`EventRecord`] are skipped.
pub fn decode_tickets(json: &str) -> Result<Vec<EventRecord>> {
    let response: TicketResponse = serde_json::from_str(json)?;

    let records = response
        .data
        .into_iter()
        .enumerate()
        .map(|(idx, value)| {
            serde_json::from_value::<EventRecord>(value).map_err(|err| {
                Error::new(
                    ErrorKind::TicketParse,
                    &format!("Skipping ticket entry {}: {}", idx, err),
                )
            })
        })
        .inspect(|res| {
            if let Err(err) = res {
                log::warn!("{}", err)
            }
        })
        .filter_map(Result::ok)
        .collect::<Vec<_>>();

    log::debug!("Decoded {} ticket(s)", records.len());

    Ok(records)
}

pub fn load_tickets(path: &Path) -> Result<Vec<EventRecord>> {
    let content = fs::read_to_string(path).map_err(|err| {
        Error::from(err)
            .with_msg(&format!("Could not read tickets from '{}'", path.display()))
    })?;

    decode_tickets(&content)
}
