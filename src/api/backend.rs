//! API worker: executes queued commands off the UI thread.
//!
//! The UI loop never awaits. It pushes [`ApiCommand`]s onto an unbounded
//! channel and drains [`ApiEvent`]s once per tick. The worker owns a
//! single-threaded tokio runtime and spawns one task per command, so
//! mutating requests may overlap; each completion is reported independently.
//!
use std::sync::Arc;
use std::thread::JoinHandle;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use super::{ApiClient, ApiError};
use crate::error::AppError;
use crate::model::{ExternalVehicle, VehiclePayload};

/// Requests queued from the UI to the worker.
#[derive(Clone, Debug, PartialEq)]
pub enum ApiCommand {
    FetchAll,
    Create { payload: VehiclePayload },
    Update { id: String, payload: VehiclePayload },
    Delete { id: String },
}

/// Which kind of save a [`ApiEvent::Saved`] completes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SaveKind {
    Create,
    Update,
}

/// Completions reported back to the UI.
#[derive(Clone, Debug, PartialEq)]
pub enum ApiEvent {
    Fetched(Result<Vec<ExternalVehicle>, ApiError>),
    Saved {
        kind: SaveKind,
        result: Result<(), ApiError>,
    },
    Deleted {
        id: String,
        result: Result<(), ApiError>,
    },
}

/// Handle to a running worker thread.
pub struct Backend {
    pub commands: UnboundedSender<ApiCommand>,
    pub events: UnboundedReceiver<ApiEvent>,
    worker: JoinHandle<()>,
}

impl Backend {
    /// Close the command channel and wait for the worker to exit.
    ///
    /// Requests still in flight are abandoned. Other clones of the command
    /// sender must be dropped first or this blocks.
    pub fn shutdown(self) {
        let Backend {
            commands,
            events,
            worker,
        } = self;
        drop(commands);
        drop(events);
        let _ = worker.join();
    }
}

/// Start the worker thread for `client`.
pub fn spawn_backend(client: ApiClient) -> Result<Backend, AppError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(AppError::Worker)?;
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<ApiCommand>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<ApiEvent>();
    let client = Arc::new(client);

    let worker = std::thread::Builder::new()
        .name("api-worker".into())
        .spawn(move || {
            runtime.block_on(async move {
                while let Some(cmd) = cmd_rx.recv().await {
                    debug!(?cmd, "dispatching api command");
                    let client = client.clone();
                    let event_tx = event_tx.clone();
                    tokio::spawn(async move {
                        let event = execute(&client, cmd).await;
                        // The UI may already be gone during shutdown.
                        let _ = event_tx.send(event);
                    });
                }
                info!("api worker stopping");
            });
        })
        .map_err(AppError::Worker)?;

    Ok(Backend {
        commands: cmd_tx,
        events: event_rx,
        worker,
    })
}

/// Run one command to completion against the API.
pub async fn execute(client: &ApiClient, cmd: ApiCommand) -> ApiEvent {
    match cmd {
        ApiCommand::FetchAll => ApiEvent::Fetched(client.list().await),
        ApiCommand::Create { payload } => ApiEvent::Saved {
            kind: SaveKind::Create,
            result: client.create(&payload).await,
        },
        ApiCommand::Update { id, payload } => ApiEvent::Saved {
            kind: SaveKind::Update,
            result: client.update(&id, &payload).await,
        },
        ApiCommand::Delete { id } => {
            let result = client.delete(&id).await;
            ApiEvent::Deleted { id, result }
        }
    }
}
