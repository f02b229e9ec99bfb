use super::protocol::{CellDetails, ClientMessage, ServerMessage};
use crate::session::Session;
use crate::world::Position;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle on the session that every WebSocket connection renders
/// from and sends its commands to.
#[derive(Clone)]
pub struct StateStream {
    session: Arc<RwLock<Session>>,
}

impl StateStream {
    pub fn new(session: Arc<RwLock<Session>>) -> Self {
        Self { session }
    }

    pub async fn frame(&self) -> ServerMessage {
        let session = self.session.read().await;
        ServerMessage::frame(session.metrics(), session.game())
    }

    /// Applies one client command and returns the reply for that client.
    pub async fn handle(&self, message: ClientMessage) -> ServerMessage {
        match message {
            ClientMessage::GetState => self.frame().await,
            ClientMessage::Reset => {
                let mut session = self.session.write().await;
                match session.reset() {
                    Ok(()) => ServerMessage::frame(session.metrics(), session.game()),
                    Err(e) => ServerMessage::error(e.to_string()),
                }
            }
            ClientMessage::Step => {
                let mut session = self.session.write().await;
                session.step();
                ServerMessage::frame(session.metrics(), session.game())
            }
            ClientMessage::AdvanceGeneration => {
                let mut session = self.session.write().await;
                match session.advance_generation() {
                    Ok(summary) => {
                        log::info!(
                            "Generation {} finished after {} ticks",
                            summary.metrics.generation,
                            summary.metrics.tick
                        );
                        ServerMessage::frame(session.metrics(), session.game())
                    }
                    Err(e) => ServerMessage::error(e.to_string()),
                }
            }
            ClientMessage::QueryCell { x, y } => {
                let session = self.session.read().await;
                let pos = Position::new(x, y);
                if !pos.is_within(session.game().width(), session.game().height()) {
                    return ServerMessage::error(format!("cell [{};{}] is off the board", x, y));
                }
                ServerMessage::Cell(CellDetails::from(&session.cell(pos)))
            }
            ClientMessage::Save { path } => {
                let session = self.session.read().await;
                let path = snapshot_path(&session, path);
                match session.save(&path) {
                    Ok(()) => {
                        log::info!("Saved game to {:?}", path);
                        ServerMessage::frame(session.metrics(), session.game())
                    }
                    Err(e) => ServerMessage::error(format!("save to {:?} failed: {}", path, e)),
                }
            }
            ClientMessage::Load { path } => {
                let mut session = self.session.write().await;
                let path = snapshot_path(&session, path);
                match session.load(&path) {
                    Ok(()) => {
                        log::info!("Loaded game from {:?}", path);
                        ServerMessage::frame(session.metrics(), session.game())
                    }
                    Err(e) => ServerMessage::error(format!("load from {:?} failed: {}", path, e)),
                }
            }
        }
    }
}

fn snapshot_path(session: &Session, requested: Option<String>) -> PathBuf {
    PathBuf::from(requested.unwrap_or_else(|| session.config().trainer.snapshot_path.clone()))
}
