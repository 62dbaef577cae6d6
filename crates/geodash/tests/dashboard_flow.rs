//! End-to-end: serve generated projects, load them over HTTP, and browse.

use std::net::SocketAddr;
use std::time::Duration;

use geodash::map::{Viewport, SELECTION_ZOOM};
use geodash::server::{serve_listener, PROJECTS_PATH};
use geodash::table::Pagination;
use geodash::{
    BoundingBox, Dashboard, GeneratorSettings, HttpSource, LoadState, ProjectStatus, ServerState,
    SortField, SortItem, SortModel,
};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

const COUNT: usize = 300;

async fn spawn_server(state: ServerState) -> (SocketAddr, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(serve_listener(listener, state, async {
        let _ = rx.await;
    }));
    (addr, tx)
}

fn endpoint(addr: SocketAddr) -> String {
    format!("http://{addr}{PROJECTS_PATH}")
}

#[tokio::test]
async fn test_load_filter_sort_select() {
    let state = ServerState::new(GeneratorSettings::default(), COUNT).with_seed(Some(2024));
    let (addr, shutdown) = spawn_server(state).await;

    let source = HttpSource::new(endpoint(addr), Duration::from_secs(10)).unwrap();
    let mut dash = Dashboard::load(
        &source,
        Duration::from_millis(20),
        BoundingBox::INDIA,
        Pagination::default(),
    )
    .await;

    assert_eq!(dash.store().state(), &LoadState::Ready);
    assert_eq!(dash.store().total_count(), COUNT);
    for project in dash.store().data() {
        assert!(BoundingBox::INDIA.contains(project.latitude, project.longitude));
    }

    // Filter by status through the debouncer.
    dash.store_mut().set_filter_text("PENDING");
    dash.store().settle().await;
    dash.refresh();
    let pending = dash
        .store()
        .data()
        .iter()
        .filter(|p| p.status == ProjectStatus::Pending)
        .count();
    assert_eq!(dash.store().filtered_count(), pending);
    let stats = dash.stats();
    assert_eq!(stats.total, COUNT);
    assert_eq!(stats.pending, pending);
    assert_eq!(stats.active + stats.completed, 0);

    // Sort the filtered rows by latitude, descending.
    dash.store_mut()
        .set_sort_model(SortModel::by(SortItem::desc(SortField::Latitude)));
    dash.refresh();
    let rows = dash.store().rows();
    assert!(rows.windows(2).all(|w| w[0].latitude >= w[1].latitude));

    // Selecting the first visible row centres the map on it.
    let first = rows[0].clone();
    let viewport = dash.on_row_click(first.id);
    assert_eq!(
        viewport,
        Some(Viewport::Centered {
            center: first.location(),
            zoom: SELECTION_ZOOM
        })
    );
    assert!(dash.markers().iter().any(|m| m.id == first.id && m.selected));

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_unreachable_endpoint_shows_error_panel() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = HttpSource::new(endpoint(addr), Duration::from_secs(2)).unwrap();
    let dash = Dashboard::load(
        &source,
        Duration::from_millis(20),
        BoundingBox::INDIA,
        Pagination::default(),
    )
    .await;

    assert!(!dash.store().is_loading());
    let panel = dash.error().unwrap();
    assert!(panel.starts_with("Error loading data\n"));
    assert_eq!(dash.store().total_count(), 0);
}

#[tokio::test]
async fn test_server_error_maps_to_fetch_failure() {
    let state = ServerState::default().with_dump(Some("/nonexistent/db.json".into()));
    let (addr, shutdown) = spawn_server(state).await;

    let source = HttpSource::new(endpoint(addr), Duration::from_secs(10)).unwrap();
    let dash = Dashboard::load(
        &source,
        Duration::from_millis(20),
        BoundingBox::INDIA,
        Pagination::default(),
    )
    .await;

    assert_eq!(
        dash.error().as_deref(),
        Some("Error loading data\nFailed to fetch data")
    );
    let _ = shutdown.send(());
}
