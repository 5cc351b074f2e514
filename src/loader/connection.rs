//! Connection loading
//!
//! Each row of `connections/<line>.csv` links two stations by their
//! line-scoped identifiers. Edges are directed and typed by the line's data
//! file name; an edge already present in the same direction is skipped, so a
//! file can be loaded any number of times.

use serde::Deserialize;
use tracing::{debug, info};

use crate::client::{ClientResult, GraphClient};
use crate::config::LoaderConfig;
use crate::graph::{Edge, Label, NodeId, PropertyMap, PropertyValue};

use super::csv_rows::CsvRows;
use super::error::{FieldError, LoadError, LoadResult};
use super::line::TubeLine;
use super::parse_flag;
use super::station::{STATION_LABEL, TUBE_LINE_IDENTIFIERS};

/// One row of a connections CSV, as text
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionRecord {
    pub from_station: String,
    pub to_station: String,
    pub forward_travel: String,
    pub travel_time_seconds: String,
    pub distance_km: String,
}

/// Properties of a connection edge. Line name and colour come from the line,
/// not the row.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub line_name: String,
    pub line_colour: String,
    pub forward_travel: bool,
    pub travel_time_seconds: f64,
    pub distance_km: f64,
}

impl Connection {
    pub fn from_record(record: &ConnectionRecord, line: &TubeLine) -> Result<Self, FieldError> {
        Ok(Self {
            line_name: line.line_name.clone(),
            line_colour: line.line_colour.clone(),
            forward_travel: parse_flag(&record.forward_travel),
            travel_time_seconds: parse_float("travel_time_seconds", &record.travel_time_seconds)?,
            distance_km: parse_float("distance_km", &record.distance_km)?,
        })
    }

    pub fn to_properties(&self) -> PropertyMap {
        let mut props = PropertyMap::new();
        props.insert("line_name".to_string(), self.line_name.as_str().into());
        props.insert("line_colour".to_string(), self.line_colour.as_str().into());
        props.insert("forward_travel".to_string(), self.forward_travel.into());
        props.insert("travel_time_seconds".to_string(), self.travel_time_seconds.into());
        props.insert("distance_km".to_string(), self.distance_km.into());
        props
    }

    pub fn from_edge(edge: &Edge) -> Option<Self> {
        let text = |key: &str| edge.get_property(key)?.as_string().map(str::to_string);
        Some(Self {
            line_name: text("line_name")?,
            line_colour: text("line_colour")?,
            forward_travel: edge.get_property("forward_travel")?.as_boolean()?,
            travel_time_seconds: edge.get_property("travel_time_seconds")?.as_float()?,
            distance_km: edge.get_property("distance_km")?.as_float()?,
        })
    }
}

fn parse_float(field: &'static str, raw: &str) -> Result<f64, FieldError> {
    raw.trim().parse().map_err(|_| FieldError::new(field, raw))
}

/// Station carrying `identifier` among its line-scoped identifiers
pub async fn resolve_endpoint(
    client: &dyn GraphClient,
    identifier: &str,
) -> ClientResult<Option<NodeId>> {
    let node = client
        .find_node_with_member(
            &Label::new(STATION_LABEL),
            TUBE_LINE_IDENTIFIERS,
            &PropertyValue::from(identifier),
        )
        .await?;
    Ok(node.map(|n| n.id))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionLoadReport {
    pub created: usize,
    pub skipped: usize,
}

impl ConnectionLoadReport {
    pub fn rows(&self) -> usize {
        self.created + self.skipped
    }
}

/// Load `connections/<line>.csv` in file order.
///
/// An identifier that matches no station aborts the load with
/// [`LoadError::MissingEndpoint`]; rows after it are not applied.
pub async fn load_connections(
    client: &dyn GraphClient,
    line: &TubeLine,
    config: &LoaderConfig,
) -> LoadResult<ConnectionLoadReport> {
    info!("Loading connections for {} line", line.line_name);

    let path = line.connections_path(config.data_dir());
    let edge_type = line.edge_type();
    let mut report = ConnectionLoadReport::default();

    for row in CsvRows::<ConnectionRecord>::open(&path)? {
        let row = row?;
        let record = &row.value;
        let connection = Connection::from_record(record, line).map_err(|e| e.at(&path, row.row))?;

        let source = resolve_endpoint(client, &record.from_station).await?;
        let target = resolve_endpoint(client, &record.to_station).await?;
        let (source, target) = match (source, target) {
            (Some(source), Some(target)) => (source, target),
            (source, target) => {
                let mut missing = Vec::new();
                if source.is_none() {
                    missing.push(record.from_station.clone());
                }
                if target.is_none() {
                    missing.push(record.to_station.clone());
                }
                return Err(LoadError::MissingEndpoint {
                    path,
                    row: row.row,
                    from_station: record.from_station.clone(),
                    to_station: record.to_station.clone(),
                    missing,
                });
            }
        };

        if client.edge_exists(source, target, &edge_type).await? {
            debug!(
                row = row.row,
                "{} -> {} already connected",
                record.from_station,
                record.to_station
            );
            report.skipped += 1;
            continue;
        }

        let edge = client
            .create_edge(source, target, &edge_type, connection.to_properties())
            .await?;
        debug!(
            row = row.row,
            edge = %edge,
            "connected {} -> {}",
            record.from_station,
            record.to_station
        );
        report.created += 1;
    }

    info!(
        created = report.created,
        skipped = report.skipped,
        "Loaded connections for {} line",
        line.line_name
    );
    Ok(report)
}
