use actix::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{info, warn};
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::engine::MoveRequest;
use crate::game::ChessRules;
use crate::models::{AppState, ClientMessage, ServerMessage};
use crate::session::{Effect, Session};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// One browser connection playing one game against the engine.
///
/// The actor's mailbox is the only place the session is touched, so clock
/// ticks, engine replies and client messages are handled one at a time.
pub struct ChessWebSocket {
    pub id: String,
    pub app_state: web::Data<AppState>,
    pub(super) session: Session,
    tick: Option<SpawnHandle>,
}

impl Actor for ChessWebSocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let total_sessions = self.app_state.connection_opened();
        info!("WebSocket connection started: {}", self.id);
        info!("Total active sessions: {}", total_sessions);

        self.push_state(ctx);
    }

    fn stopping(&mut self, ctx: &mut Self::Context) -> Running {
        self.disarm_clock(ctx);

        let total_sessions = self.app_state.connection_closed();
        info!("WebSocket connection closed: {}", self.id);
        info!("Total active sessions: {}", total_sessions);

        Running::Stop
    }
}

// WebSocket message handler
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ChessWebSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                // Do nothing for pong messages
            }
            Ok(ws::Message::Text(text)) => {
                info!("Received text message: {}", text);
                match serde_json::from_str::<ClientMessage>(text.as_ref()) {
                    Ok(client_msg) => {
                        info!("Parsed client message: {:?}", client_msg);
                        self.handle_message(client_msg, ctx);
                    }
                    Err(e) => {
                        warn!("Error parsing client message: {}", e);
                        self.send(&ServerMessage::error(format!("Invalid message format: {}", e)), ctx);
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                warn!("Binary messages are not supported");
                self.send(&ServerMessage::error("Binary messages are not supported"), ctx);
            }
            Ok(ws::Message::Close(reason)) => {
                info!("Connection closed: {:?}", reason);
                ctx.close(reason);
                ctx.stop();
            }
            _ => {
                ctx.stop();
            }
        }
    }
}

impl ChessWebSocket {
    pub fn new(id: String, app_state: web::Data<AppState>) -> Self {
        let start_secs = app_state.config.start_time_secs;
        ChessWebSocket {
            id,
            app_state,
            session: Session::new(ChessRules::new(), start_secs),
            tick: None,
        }
    }

    pub fn handle_message(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        match msg.message_type.as_str() {
            "start" => self.handle_start(msg, ctx),
            "move" => self.handle_move(msg, ctx),
            "reset" => self.handle_reset(ctx),
            "get_moves" => self.handle_get_moves(msg, ctx),
            "sync" => self.push_state(ctx),
            _ => {
                info!("Unknown message type: {}", msg.message_type);
                self.send(&ServerMessage::error(format!("Unknown message type: {}", msg.message_type)), ctx);
            }
        }
    }

    /// Carry out what a session transition asked for.
    pub fn apply_effects(&mut self, effects: Vec<Effect>, ctx: &mut ws::WebsocketContext<Self>) {
        for effect in effects {
            match effect {
                Effect::Render => self.push_state(ctx),
                Effect::ArmClock => self.arm_clock(ctx),
                Effect::DisarmClock => self.disarm_clock(ctx),
                Effect::RequestRemoteMove { generation, request } => {
                    self.request_remote_move(generation, request, ctx)
                }
                Effect::RejectMove(reason) => {
                    let fen = self.session.snapshot().fen;
                    self.send(&ServerMessage::move_rejected(reason, fen), ctx);
                }
            }
        }
    }

    pub fn send(&self, message: &ServerMessage, ctx: &mut ws::WebsocketContext<Self>) {
        match serde_json::to_string(message) {
            Ok(text) => ctx.text(text),
            Err(e) => {
                warn!("Failed to serialize response: {}", e);
                ctx.text("{\"error\": \"Internal server error\"}");
            }
        }
    }

    pub fn push_state(&self, ctx: &mut ws::WebsocketContext<Self>) {
        self.send(&ServerMessage::state(self.session.snapshot()), ctx);
    }

    // Re-arming restarts the one-second phase from the handoff.
    fn arm_clock(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        self.disarm_clock(ctx);
        let handle = ctx.run_interval(TICK_INTERVAL, |act, ctx| {
            let effects = act.session.on_clock_tick();
            act.apply_effects(effects, ctx);
        });
        self.tick = Some(handle);
    }

    fn disarm_clock(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        if let Some(handle) = self.tick.take() {
            ctx.cancel_future(handle);
        }
    }

    fn request_remote_move(&mut self, generation: u64, request: MoveRequest, ctx: &mut ws::WebsocketContext<Self>) {
        info!("Connection {} asking engine for a move (generation {})", self.id, generation);
        let pending = self.app_state.engine.request_move(request);
        ctx.spawn(pending.into_actor(self).map(move |reply, act, ctx| {
            let effects = act.session.on_remote_move_resolved(generation, reply, Instant::now());
            act.apply_effects(effects, ctx);
        }));
    }
}

// WebSocket connection handler
pub async fn ws_index(req: HttpRequest, stream: web::Payload, app_state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    let id = Uuid::new_v4().to_string();
    info!("New WebSocket connection: {}", id);

    ws::start(ChessWebSocket::new(id, app_state), &req, stream)
}
