use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;
use tubegraph::client::{connect, EmbeddedClient, GraphClient, StorageStats};
use tubegraph::graph::{EdgeType, Label, PropertyValue};
use tubegraph::loader::{
    Connection, LoadError, Loader, Station, TubeLine, TubeLineList, WipeConfirmation,
    STATION_LABEL,
};
use tubegraph::{LoaderConfig, MembershipPolicy};

const STATION_HEADER: &str =
    "station_identifier,station_name,end_of_line,tube_line_identifier,location,year_opened,wiggle_ranking";
const CONNECTION_HEADER: &str =
    "from_station,to_station,forward_travel,travel_time_seconds,distance_km";

fn write_csv(data_dir: &Path, kind: &str, file: &str, header: &str, rows: &[&str]) {
    let dir = data_dir.join(kind);
    fs::create_dir_all(&dir).unwrap();
    let mut contents = String::from(header);
    contents.push('\n');
    for row in rows {
        contents.push_str(row);
        contents.push('\n');
    }
    fs::write(dir.join(format!("{}.csv", file)), contents).unwrap();
}

fn write_stations(data_dir: &Path, file: &str, rows: &[&str]) {
    write_csv(data_dir, "lines", file, STATION_HEADER, rows);
}

fn write_connections(data_dir: &Path, file: &str, rows: &[&str]) {
    write_csv(data_dir, "connections", file, CONNECTION_HEADER, rows);
}

/// Leicester Square and Covent Garden, one connection between them
fn piccadilly_fixture() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    write_stations(
        temp_dir.path(),
        "piccadilly",
        &[
            "LSQ,Leicester Square,False,LS-A,Zone 1,1906,3",
            "CGD,Covent Garden,False,CG-A,Zone 1,1907,5",
        ],
    );
    write_connections(temp_dir.path(), "piccadilly", &["LS-A,CG-A,True,90,0.3"]);
    temp_dir
}

fn loader_for(client: Arc<EmbeddedClient>, data_dir: &Path) -> Loader {
    Loader::new(client, LoaderConfig::new(data_dir))
}

async fn station(client: &EmbeddedClient, identifier: &str) -> Station {
    let node = client
        .find_node(
            &Label::new(STATION_LABEL),
            "station_identifier",
            &PropertyValue::from(identifier),
        )
        .await
        .unwrap()
        .expect("station should exist");
    Station::from_node(&node).expect("station properties")
}

#[tokio::test]
async fn test_end_to_end_single_connection() {
    let data = piccadilly_fixture();
    let client = Arc::new(EmbeddedClient::new());
    let loader = loader_for(client.clone(), data.path());

    let reports = loader.load_all(&TubeLineList::default()).await.unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].line_name, "Piccadilly");
    assert_eq!(reports[0].stations.created, 2);
    assert_eq!(reports[0].connections.created, 1);

    let leicester = station(&client, "LSQ").await;
    assert_eq!(leicester.station_name, "Leicester Square");
    assert_eq!(leicester.tube_lines, vec!["Piccadilly"]);
    assert_eq!(leicester.tube_line_identifiers, vec!["LS-A"]);
    assert_eq!(leicester.year_opened, 1906);
    assert!(!leicester.end_of_line);

    let store = client.store_read().await;
    assert_eq!(store.node_count(), 2);

    let edges = store.get_edges_by_type(&EdgeType::new("piccadilly"));
    assert_eq!(edges.len(), 1);
    let edge = edges[0];
    assert_eq!(
        store.get_node(edge.source).unwrap().get_property("station_identifier"),
        Some(&PropertyValue::from("LSQ"))
    );
    assert_eq!(
        store.get_node(edge.target).unwrap().get_property("station_identifier"),
        Some(&PropertyValue::from("CGD"))
    );
    assert_eq!(
        Connection::from_edge(edge).unwrap(),
        Connection {
            line_name: "Piccadilly".to_string(),
            line_colour: "#1C1865".to_string(),
            forward_travel: true,
            travel_time_seconds: 90.0,
            distance_km: 0.3,
        }
    );
}

#[tokio::test]
async fn test_reloading_a_line_is_idempotent() {
    let data = piccadilly_fixture();
    let client = Arc::new(EmbeddedClient::new());
    let loader = loader_for(client.clone(), data.path());
    let line = TubeLine::piccadilly();

    loader.load_line(&line).await.unwrap();
    let second = loader.load_line(&line).await.unwrap();

    assert_eq!(second.stations.created, 0);
    assert_eq!(second.stations.updated, 2);
    assert_eq!(second.connections.created, 0);
    assert_eq!(second.connections.skipped, 1);
    assert_eq!(client.status().await.unwrap(), StorageStats { nodes: 2, edges: 1 });

    // Deduplicated membership leaves the lists as they were
    let leicester = station(&client, "LSQ").await;
    assert_eq!(leicester.tube_lines, vec!["Piccadilly"]);
    assert_eq!(leicester.tube_line_identifiers, vec!["LS-A"]);
}

#[tokio::test]
async fn test_append_always_repeats_membership_on_reload() {
    let data = piccadilly_fixture();
    let client = Arc::new(EmbeddedClient::new());
    let loader = Loader::new(
        client.clone(),
        LoaderConfig::new(data.path()).with_membership(MembershipPolicy::AppendAlways),
    );
    let line = TubeLine::piccadilly();

    loader.load_line(&line).await.unwrap();
    loader.load_line(&line).await.unwrap();

    let leicester = station(&client, "LSQ").await;
    assert_eq!(leicester.tube_lines, vec!["Piccadilly", "Piccadilly"]);
    assert_eq!(leicester.tube_line_identifiers, vec!["LS-A", "LS-A"]);
    assert_eq!(client.status().await.unwrap(), StorageStats { nodes: 2, edges: 1 });
}

#[tokio::test]
async fn test_station_on_two_lines_is_one_node() {
    let data = piccadilly_fixture();
    write_stations(
        data.path(),
        "northern",
        &[
            "LSQ,Leicester Square,False,LS-N,Zone 1,1906,3",
            "TCR,Tottenham Court Road,False,TC-N,Zone 1,1907,2",
        ],
    );
    write_connections(data.path(), "northern", &["TC-N,LS-N,False,60,0.5"]);

    let registry = TubeLineList::new(vec![
        TubeLine::piccadilly(),
        TubeLine::new("Northern", "#000000", "northern"),
    ]);
    let client = Arc::new(EmbeddedClient::new());
    let loader = loader_for(client.clone(), data.path());
    let reports = loader.load_all(&registry).await.unwrap();

    assert_eq!(reports[1].stations.created, 1);
    assert_eq!(reports[1].stations.updated, 1);

    let leicester = station(&client, "LSQ").await;
    assert_eq!(leicester.tube_lines, vec!["Piccadilly", "Northern"]);
    assert_eq!(leicester.tube_line_identifiers, vec!["LS-A", "LS-N"]);

    let store = client.store_read().await;
    assert_eq!(store.get_nodes_by_label(&Label::new(STATION_LABEL)).len(), 3);
    assert_eq!(store.get_edges_by_type(&EdgeType::new("piccadilly")).len(), 1);
    assert_eq!(store.get_edges_by_type(&EdgeType::new("northern")).len(), 1);
}

#[tokio::test]
async fn test_blank_year_and_literal_flags() {
    let data = TempDir::new().unwrap();
    write_stations(
        data.path(),
        "piccadilly",
        &[
            "CFS,Cockfosters,True,CF-A,Zone 5,,1",
            "UXB,Uxbridge,true,UX-A,Zone 6,1904,1",
        ],
    );
    write_connections(data.path(), "piccadilly", &["CF-A,UX-A,TRUE,60,1.0"]);

    let client = Arc::new(EmbeddedClient::new());
    loader_for(client.clone(), data.path())
        .load_line(&TubeLine::piccadilly())
        .await
        .unwrap();

    let cockfosters = station(&client, "CFS").await;
    assert_eq!(cockfosters.year_opened, 0);
    assert!(cockfosters.end_of_line);

    let uxbridge = station(&client, "UXB").await;
    assert!(!uxbridge.end_of_line);

    let store = client.store_read().await;
    let edges = store.all_edges();
    assert_eq!(edges.len(), 1);
    assert!(!Connection::from_edge(edges[0]).unwrap().forward_travel);
}

#[tokio::test]
async fn test_reverse_direction_edges_coexist() {
    let data = piccadilly_fixture();
    write_connections(
        data.path(),
        "piccadilly",
        &[
            "LS-A,CG-A,True,90,0.3",
            "CG-A,LS-A,False,95,0.3",
            "LS-A,CG-A,True,90,0.3",
        ],
    );

    let client = Arc::new(EmbeddedClient::new());
    let report = loader_for(client.clone(), data.path())
        .load_line(&TubeLine::piccadilly())
        .await
        .unwrap();

    assert_eq!(report.connections.created, 2);
    assert_eq!(report.connections.skipped, 1);
    assert_eq!(client.status().await.unwrap().edges, 2);
}

#[tokio::test]
async fn test_missing_endpoint_stops_the_load() {
    let data = TempDir::new().unwrap();
    write_stations(
        data.path(),
        "piccadilly",
        &[
            "LSQ,Leicester Square,False,LS-A,Zone 1,1906,3",
            "CGD,Covent Garden,False,CG-A,Zone 1,1907,5",
            "HOL,Holborn,False,HO-A,Zone 1,1906,4",
        ],
    );
    write_connections(
        data.path(),
        "piccadilly",
        &[
            "LS-A,CG-A,True,90,0.3",
            "CG-A,XX-Z,True,80,0.4",
            "CG-A,HO-A,True,70,0.5",
        ],
    );

    let client = Arc::new(EmbeddedClient::new());
    let result = loader_for(client.clone(), data.path())
        .load_line(&TubeLine::piccadilly())
        .await;

    match result {
        Err(LoadError::MissingEndpoint {
            row,
            from_station,
            to_station,
            missing,
            ..
        }) => {
            assert_eq!(row, 3);
            assert_eq!(from_station, "CG-A");
            assert_eq!(to_station, "XX-Z");
            assert_eq!(missing, vec!["XX-Z"]);
        }
        other => panic!("expected MissingEndpoint, got {:?}", other),
    }

    // The first row was applied, the row after the failure was not
    assert_eq!(client.status().await.unwrap(), StorageStats { nodes: 3, edges: 1 });
}

#[tokio::test]
async fn test_bad_year_names_file_row_and_field() {
    let data = TempDir::new().unwrap();
    write_stations(
        data.path(),
        "piccadilly",
        &[
            "LSQ,Leicester Square,False,LS-A,Zone 1,1906,3",
            "CGD,Covent Garden,False,CG-A,Zone 1,nineteen-oh-seven,5",
        ],
    );

    let client = Arc::new(EmbeddedClient::new());
    let err = loader_for(client.clone(), data.path())
        .load_line(&TubeLine::piccadilly())
        .await
        .unwrap_err();

    match err {
        LoadError::InvalidField {
            path,
            row,
            field,
            value,
        } => {
            assert!(path.ends_with("lines/piccadilly.csv"));
            assert_eq!(row, 3);
            assert_eq!(field, "year_opened");
            assert_eq!(value, "nineteen-oh-seven");
        }
        other => panic!("expected InvalidField, got {:?}", other),
    }
    assert_eq!(client.status().await.unwrap().nodes, 1);
}

#[tokio::test]
async fn test_missing_files_and_columns() {
    let data = TempDir::new().unwrap();
    let client = Arc::new(EmbeddedClient::new());
    let loader = loader_for(client.clone(), data.path());

    let err = loader.load_line(&TubeLine::piccadilly()).await.unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));

    fs::create_dir_all(data.path().join("lines")).unwrap();
    fs::write(
        data.path().join("lines/piccadilly.csv"),
        "station_identifier,station_name\nLSQ,Leicester Square\n",
    )
    .unwrap();
    let err = loader.load_line(&TubeLine::piccadilly()).await.unwrap_err();
    assert!(matches!(err, LoadError::Csv { .. }));
    assert_eq!(client.status().await.unwrap().nodes, 0);
}

#[tokio::test]
async fn test_snapshot_backed_reload() {
    let data = piccadilly_fixture();
    let snapshot_dir = TempDir::new().unwrap();
    let url = format!(
        "file://{}",
        snapshot_dir.path().join("tube.snapshot").display()
    );
    let registry = TubeLineList::default();

    let client = connect(&url).unwrap();
    let loader = Loader::new(client, LoaderConfig::new(data.path()));
    loader.load_all(&registry).await.unwrap();

    // A fresh process sees the flushed graph
    let reopened = connect(&url).unwrap();
    assert_eq!(reopened.status().await.unwrap(), StorageStats { nodes: 2, edges: 1 });

    let loader = Loader::new(reopened.clone(), LoaderConfig::new(data.path()));
    let refused = loader
        .reload_all(&registry, WipeConfirmation::NotConfirmed)
        .await;
    assert!(matches!(refused, Err(LoadError::WipeNotConfirmed)));
    assert_eq!(reopened.status().await.unwrap().nodes, 2);

    let reports = loader
        .reload_all(&registry, WipeConfirmation::Confirmed)
        .await
        .unwrap();
    assert_eq!(reports[0].stations.created, 2);
    assert_eq!(reports[0].connections.created, 1);

    let after = connect(&url).unwrap();
    assert_eq!(after.status().await.unwrap(), StorageStats { nodes: 2, edges: 1 });
}

#[tokio::test]
async fn test_unknown_line_is_rejected() {
    let registry = TubeLineList::default();
    assert!(matches!(
        registry.select(&["Waterloo & City"]),
        Err(LoadError::UnknownLine(_))
    ));
}
