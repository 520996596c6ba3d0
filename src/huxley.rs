//! Huxley2 departure board payload
//!
//! Only the fields the board consumes are modelled. Everything is optional
//! upstream, so every field tolerates `null` or absence.

use serde::Deserialize;

use crate::departure::{
    DepartureRecord, EstimatedTime, UNKNOWN_DESTINATION, parse_hhmm, trim_destination,
};

const DESTINATION_SEPARATOR: &str = " & ";

/// Top level `/departures/{crs}/{rows}` response
#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationBoard {
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub crs: Option<String>,
    #[serde(default)]
    pub train_services: Option<Vec<TrainService>>,
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainService {
    #[serde(default)]
    pub std: Option<String>,
    #[serde(default)]
    pub etd: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub is_cancelled: Option<bool>,
    #[serde(default)]
    pub destination: Option<Vec<ServiceLocation>>,
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLocation {
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub crs: Option<String>,
    #[serde(default)]
    pub via: Option<String>,
}

/// Parse a raw response body
pub fn parse_board(body: &[u8]) -> Result<StationBoard, serde_json::Error> {
    serde_json::from_slice(body)
}

impl StationBoard {
    /// Number of train services in the payload
    pub fn service_count(&self) -> usize {
        self.train_services.as_ref().map_or(0, Vec::len)
    }

    /// Convert every service into a record, keeping upstream order
    pub fn into_records(self, destination_max_chars: usize) -> Vec<DepartureRecord> {
        self.train_services
            .unwrap_or_default()
            .iter()
            .map(|service| service.to_record(destination_max_chars))
            .collect()
    }
}

impl TrainService {
    /// Destination text: all locations joined, each with its `via` suffix
    pub fn destination_text(&self) -> String {
        let names: Vec<String> = self
            .destination
            .iter()
            .flatten()
            .filter_map(ServiceLocation::display_name)
            .collect();

        if names.is_empty() {
            UNKNOWN_DESTINATION.to_owned()
        } else {
            names.join(DESTINATION_SEPARATOR)
        }
    }

    pub fn to_record(&self, destination_max_chars: usize) -> DepartureRecord {
        let scheduled = self.std.as_deref().and_then(parse_hhmm);
        let estimated = EstimatedTime::parse(self.etd.as_deref());
        let platform = self.platform.as_deref().map(str::trim).map(str::to_owned);

        DepartureRecord::new(
            trim_destination(&self.destination_text(), destination_max_chars),
            platform,
            scheduled,
            estimated,
            self.is_cancelled.unwrap_or(false),
        )
    }
}

impl ServiceLocation {
    fn display_name(&self) -> Option<String> {
        let name = self.location_name.as_deref().map(str::trim)?;
        if name.is_empty() {
            return None;
        }
        match self.via.as_deref().map(str::trim) {
            Some(via) if !via.is_empty() => Some(format!("{} {}", name, via)),
            _ => Some(name.to_owned()),
        }
    }
}
