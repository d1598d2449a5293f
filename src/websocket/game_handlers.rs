use actix_web_actors::ws;
use chess::Square;
use log::{info, warn};
use std::str::FromStr;
use std::time::Instant;

use crate::engine::SelectionMethod;
use crate::game::rules::promotion_piece;
use crate::models::{ClientMessage, ServerMessage};
use crate::session::{SideChoice, StartParams};
use crate::websocket::handler::ChessWebSocket;

impl ChessWebSocket {
    pub fn handle_start(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        let config = &self.app_state.config;

        let side = match msg.color_preference.as_deref() {
            None => SideChoice::default(),
            Some(value) => match SideChoice::parse(value) {
                Some(side) => side,
                None => {
                    warn!("Invalid color preference: {}", value);
                    self.send(&ServerMessage::error(format!("Invalid color preference: {}", value)), ctx);
                    return;
                }
            },
        };
        let method = match msg.method.as_deref() {
            None => config.engine_method,
            Some(value) => match SelectionMethod::parse(value) {
                Some(method) => method,
                None => {
                    warn!("Invalid selection method: {}", value);
                    self.send(&ServerMessage::error(format!("Invalid selection method: {}", value)), ctx);
                    return;
                }
            },
        };
        let params = StartParams {
            side,
            start_secs: msg.start_time_seconds.unwrap_or(config.start_time_secs),
            method,
            depth: msg.depth.unwrap_or(config.engine_depth),
        };
        info!("Starting game for {}: {:?}", self.id, params);

        let effects = self.session.on_start_requested(params, &mut rand::rng(), Instant::now());
        self.apply_effects(effects, ctx);
    }

    pub fn handle_move(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        info!("Processing move: {:?}", msg);

        let (from, to) = match (parse_square(msg.move_from.as_deref()), parse_square(msg.move_to.as_deref())) {
            (Some(from), Some(to)) => (from, to),
            _ => {
                warn!("Move requires valid from and to squares");
                let fen = self.session.snapshot().fen;
                self.send(&ServerMessage::move_rejected("Invalid square".to_string(), fen), ctx);
                return;
            }
        };
        let promotion = msg
            .promote_to
            .as_deref()
            .and_then(|p| p.chars().next())
            .and_then(promotion_piece);

        let effects = self.session.on_local_move_proposed(from, to, promotion, Instant::now());
        self.apply_effects(effects, ctx);
    }

    pub fn handle_reset(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let effects = self.session.on_reset_requested();
        self.apply_effects(effects, ctx);
    }

    pub fn handle_get_moves(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        let square = match parse_square(msg.move_from.as_deref()) {
            Some(square) => square,
            None => {
                warn!("No valid square provided");
                self.send(&ServerMessage::error("No valid square provided"), ctx);
                return;
            }
        };

        // Get all legal moves for the piece on the square
        let available_moves = self
            .session
            .legal_destinations(square)
            .iter()
            .map(|s| s.to_string())
            .collect();
        self.send(&ServerMessage::available_moves(available_moves), ctx);
    }
}

fn parse_square(value: Option<&str>) -> Option<Square> {
    Square::from_str(&value?.to_lowercase()).ok()
}
