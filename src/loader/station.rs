//! Station loading
//!
//! Each row of `lines/<line>.csv` is merged into the graph by
//! `station_identifier`: an unseen identifier creates a `Station` node, a
//! known one gains the line's name and line-scoped identifier.

use serde::Deserialize;
use tracing::{debug, info};

use crate::client::{ClientResult, GraphClient};
use crate::config::{LoaderConfig, MembershipPolicy};
use crate::graph::{Label, Node, NodeId, PropertyMap, PropertyValue};

use super::csv_rows::CsvRows;
use super::error::{FieldError, LoadResult};
use super::line::TubeLine;
use super::parse_flag;

/// Node label for stations
pub const STATION_LABEL: &str = "Station";

pub const STATION_IDENTIFIER: &str = "station_identifier";
pub const TUBE_LINES: &str = "tube_lines";
pub const TUBE_LINE_IDENTIFIERS: &str = "tube_line_identifiers";

/// One row of a stations CSV, as text
#[derive(Debug, Clone, Deserialize)]
pub struct StationRecord {
    pub station_identifier: String,
    pub station_name: String,
    pub end_of_line: String,
    pub tube_line_identifier: String,
    pub location: String,
    pub year_opened: String,
    pub wiggle_ranking: String,
}

/// A station as stored on its node
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub station_identifier: String,
    pub station_name: String,
    pub end_of_line: bool,
    pub tube_lines: Vec<String>,
    pub tube_line_identifiers: Vec<String>,
    pub location: String,
    pub year_opened: i64,
    pub wiggle_ranking: String,
}

impl Station {
    /// Build the station a row describes on `line`.
    ///
    /// `end_of_line` is true only for the exact text `True`; a blank
    /// `year_opened` becomes 0.
    pub fn from_record(record: &StationRecord, line: &TubeLine) -> Result<Self, FieldError> {
        Ok(Self {
            station_identifier: record.station_identifier.clone(),
            station_name: record.station_name.clone(),
            end_of_line: parse_flag(&record.end_of_line),
            tube_lines: vec![line.line_name.clone()],
            tube_line_identifiers: vec![record.tube_line_identifier.clone()],
            location: record.location.clone(),
            year_opened: parse_year(&record.year_opened)?,
            wiggle_ranking: record.wiggle_ranking.clone(),
        })
    }

    pub fn to_properties(&self) -> PropertyMap {
        let mut props = PropertyMap::new();
        props.insert(STATION_IDENTIFIER.to_string(), self.station_identifier.as_str().into());
        props.insert("station_name".to_string(), self.station_name.as_str().into());
        props.insert("end_of_line".to_string(), self.end_of_line.into());
        props.insert(TUBE_LINES.to_string(), self.tube_lines.clone().into());
        props.insert(
            TUBE_LINE_IDENTIFIERS.to_string(),
            self.tube_line_identifiers.clone().into(),
        );
        props.insert("location".to_string(), self.location.as_str().into());
        props.insert("year_opened".to_string(), self.year_opened.into());
        props.insert("wiggle_ranking".to_string(), self.wiggle_ranking.as_str().into());
        props
    }

    /// Read a station back from its node; `None` if a property is missing
    /// or has the wrong type.
    pub fn from_node(node: &Node) -> Option<Self> {
        let text = |key: &str| node.get_property(key)?.as_string().map(str::to_string);
        let list = |key: &str| node.get_property(key)?.as_string_list();

        Some(Self {
            station_identifier: text(STATION_IDENTIFIER)?,
            station_name: text("station_name")?,
            end_of_line: node.get_property("end_of_line")?.as_boolean()?,
            tube_lines: list(TUBE_LINES)?,
            tube_line_identifiers: list(TUBE_LINE_IDENTIFIERS)?,
            location: text("location")?,
            year_opened: node.get_property("year_opened")?.as_integer()?,
            wiggle_ranking: text("wiggle_ranking")?,
        })
    }
}

fn parse_year(raw: &str) -> Result<i64, FieldError> {
    if raw.is_empty() {
        return Ok(0);
    }
    raw.trim()
        .parse()
        .map_err(|_| FieldError::new("year_opened", raw))
}

/// Existing node for an identifier, resolved once per row
#[derive(Debug)]
pub enum StationMatch {
    Found(Node),
    NotFound,
}

impl StationMatch {
    pub async fn resolve(client: &dyn GraphClient, station_identifier: &str) -> ClientResult<Self> {
        let label = Label::new(STATION_LABEL);
        let existing = client
            .find_node(&label, STATION_IDENTIFIER, &PropertyValue::from(station_identifier))
            .await?;
        Ok(match existing {
            Some(node) => StationMatch::Found(node),
            None => StationMatch::NotFound,
        })
    }
}

/// What merging one row did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Created(NodeId),
    /// The station existed; `changed` is false when its lists already held
    /// this line's entries.
    Updated { id: NodeId, changed: bool },
}

/// Merge one station into the graph
pub async fn merge_station(
    client: &dyn GraphClient,
    station: &Station,
    membership: MembershipPolicy,
) -> ClientResult<MergeOutcome> {
    match StationMatch::resolve(client, &station.station_identifier).await? {
        StationMatch::Found(mut node) => {
            let dedupe = membership.dedupes();
            let mut changed = false;
            for line_name in &station.tube_lines {
                changed |= node.append_to_list(TUBE_LINES, line_name.as_str(), dedupe);
            }
            for identifier in &station.tube_line_identifiers {
                changed |= node.append_to_list(TUBE_LINE_IDENTIFIERS, identifier.as_str(), dedupe);
            }
            if changed {
                client.save_node(&node).await?;
            }
            Ok(MergeOutcome::Updated { id: node.id, changed })
        }
        StationMatch::NotFound => {
            let label = Label::new(STATION_LABEL);
            let id = client.create_node(&label, station.to_properties()).await?;
            Ok(MergeOutcome::Created(id))
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StationLoadReport {
    pub created: usize,
    pub updated: usize,
}

impl StationLoadReport {
    pub fn rows(&self) -> usize {
        self.created + self.updated
    }
}

/// Load `lines/<line>.csv` in file order, stopping at the first bad row.
pub async fn load_stations(
    client: &dyn GraphClient,
    line: &TubeLine,
    config: &LoaderConfig,
) -> LoadResult<StationLoadReport> {
    info!("Loading stations for {} line", line.line_name);

    let path = line.stations_path(config.data_dir());
    let mut report = StationLoadReport::default();

    for row in CsvRows::<StationRecord>::open(&path)? {
        let row = row?;
        let station = Station::from_record(&row.value, line).map_err(|e| e.at(&path, row.row))?;

        match merge_station(client, &station, config.membership).await? {
            MergeOutcome::Created(id) => {
                debug!(row = row.row, node = %id, "created station {}", station.station_identifier);
                report.created += 1;
            }
            MergeOutcome::Updated { id, changed } => {
                debug!(
                    row = row.row,
                    node = %id,
                    changed,
                    "station {} already present",
                    station.station_identifier
                );
                report.updated += 1;
            }
        }
    }

    info!(
        created = report.created,
        updated = report.updated,
        "Loaded stations for {} line",
        line.line_name
    );
    Ok(report)
}
