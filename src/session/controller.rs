use chess::{Color, Piece, Square};
use log::{debug, info, warn};
use rand::Rng;
use std::time::Instant;

use super::ledger::turn_for;
use super::{CaptureTracker, Clock, Effect, MoveLedger, Phase, SideChoice, Snapshot, StartParams, Tick};
use super::DEFAULT_DEPTH;
use crate::engine::{EngineReply, MoveRequest, SelectionMethod};
use crate::error::RemoteError;
use crate::game::utils::{color_to_string, format_clock, side_name};
use crate::game::{AppliedMove, ChessRules, RulesEngine};

const IDLE_STATUS: &str = "Press start to play";

/// One game between the local player and the remote engine.
pub struct Session<R: RulesEngine = ChessRules> {
    phase: Phase,
    side_on_move: Color,
    human_side: Color,
    created_at: Option<Instant>,
    // Bumped on every start and reset; engine replies from older
    // generations are dropped.
    generation: u64,
    awaiting_remote: bool,
    fault: Option<String>,
    status: String,
    last_handoff: Instant,
    start_secs: u64,
    method: SelectionMethod,
    depth: u32,
    clock: Clock,
    ledger: MoveLedger,
    captures: CaptureTracker,
    rules: R,
}

#[cfg(test)]
impl Default for Session<ChessRules> {
    fn default() -> Self {
        Session::new(ChessRules::new(), super::DEFAULT_START_SECS)
    }
}

impl<R: RulesEngine> Session<R> {
    pub fn new(rules: R, start_secs: u64) -> Self {
        Session {
            phase: Phase::NotStarted,
            side_on_move: Color::White,
            human_side: Color::White,
            created_at: None,
            generation: 0,
            awaiting_remote: false,
            fault: None,
            status: IDLE_STATUS.to_string(),
            last_handoff: Instant::now(),
            start_secs,
            method: SelectionMethod::Best,
            depth: DEFAULT_DEPTH,
            clock: Clock::new(start_secs),
            ledger: MoveLedger::new(),
            captures: CaptureTracker::new(),
            rules,
        }
    }

    /// Legal targets for the human's piece on `from`; empty when the human
    /// may not move right now.
    pub fn legal_destinations(&self, from: Square) -> Vec<Square> {
        if self.accepts_local_input() {
            self.rules.legal_destinations(from)
        } else {
            Vec::new()
        }
    }

    pub fn on_start_requested<G: Rng + ?Sized>(&mut self, params: StartParams, rng: &mut G, now: Instant) -> Vec<Effect> {
        self.clear(params.start_secs);
        self.method = params.method;
        self.depth = params.depth.max(1);
        self.human_side = match params.side {
            SideChoice::White => Color::White,
            SideChoice::Black => Color::Black,
            SideChoice::Random if rng.random_bool(0.5) => Color::White,
            SideChoice::Random => Color::Black,
        };
        self.phase = Phase::InProgress;
        self.created_at = Some(now);
        info!(
            "Session {} started: human plays {}, {}s per side",
            self.generation,
            color_to_string(self.human_side),
            self.start_secs
        );
        self.hand_off_to(self.rules.turn_to_move(), now)
    }

    pub fn on_local_move_proposed(&mut self, from: Square, to: Square, promotion: Option<Piece>, now: Instant) -> Vec<Effect> {
        if self.phase != Phase::InProgress || self.fault.is_some() {
            return vec![Effect::RejectMove("Game is not in progress".to_string())];
        }
        if !self.accepts_local_input() {
            return vec![Effect::RejectMove("Not your turn".to_string())];
        }
        match self.rules.apply_move(from, to, promotion) {
            Some(applied) => self.commit(applied, now),
            None => {
                debug!("Rejected illegal move {}{}", from, to);
                vec![Effect::RejectMove("Illegal move".to_string())]
            }
        }
    }

    pub fn on_remote_move_resolved(
        &mut self,
        generation: u64,
        reply: Result<EngineReply, RemoteError>,
        now: Instant,
    ) -> Vec<Effect> {
        if generation != self.generation || self.phase != Phase::InProgress || !self.awaiting_remote {
            debug!(
                "Discarding engine reply for generation {} (current {}, {:?})",
                generation, self.generation, self.phase
            );
            return Vec::new();
        }
        self.awaiting_remote = false;

        match reply {
            Ok(EngineReply::Move(token)) => match self.rules.apply_engine_move(&token) {
                Some(applied) => self.commit(applied, now),
                None => self.fail(format!("engine sent illegal move {}", token)),
            },
            Ok(EngineReply::GameOver(reason)) => self.finish(format!("Game over: {}", reason)),
            Ok(EngineReply::Error(reason)) => self.fail(reason),
            Err(err) => self.fail(err.to_string()),
        }
    }

    pub fn on_clock_tick(&mut self) -> Vec<Effect> {
        if self.phase != Phase::InProgress {
            return Vec::new();
        }
        match self.clock.tick() {
            Tick::Idle => Vec::new(),
            Tick::Counted { side, remaining } => {
                debug!("{} clock at {}s", side_name(side), remaining);
                vec![Effect::Render]
            }
            Tick::Expired(side) => {
                info!("{} flagged in session {}", side_name(side), self.generation);
                self.finish(format!("{} ran out of time — {} wins", side_name(side), side_name(!side)))
            }
        }
    }

    pub fn on_reset_requested(&mut self) -> Vec<Effect> {
        match self.created_at {
            Some(at) => info!("Session {} reset after {:.0?}", self.generation, at.elapsed()),
            None => info!("Session {} reset", self.generation),
        }
        self.clear(self.start_secs);
        vec![Effect::DisarmClock, Effect::Render]
    }

    pub fn snapshot(&self) -> Snapshot {
        let started = self.phase != Phase::NotStarted;
        Snapshot {
            phase: self.phase,
            status: self.status.clone(),
            fen: self.rules.fen(),
            human_side: started.then(|| color_to_string(self.human_side)),
            side_on_move: color_to_string(self.side_on_move),
            running_clock: self.clock.running().map(color_to_string),
            white_clock: format_clock(self.clock.remaining(Color::White)),
            black_clock: format_clock(self.clock.remaining(Color::Black)),
            captured_by_white: self.captures.codes(Color::White),
            captured_by_black: self.captures.codes(Color::Black),
            moves: self.ledger.rows(),
            thinking: self.awaiting_remote,
            fault: self.fault.clone(),
        }
    }

    fn accepts_local_input(&self) -> bool {
        self.phase == Phase::InProgress
            && self.fault.is_none()
            && !self.awaiting_remote
            && self.side_on_move == self.human_side
    }

    fn clear(&mut self, start_secs: u64) {
        self.generation += 1;
        self.phase = Phase::NotStarted;
        self.side_on_move = Color::White;
        self.created_at = None;
        self.awaiting_remote = false;
        self.fault = None;
        self.status = IDLE_STATUS.to_string();
        self.start_secs = start_secs;
        self.clock.reset(start_secs);
        self.ledger.clear();
        self.captures.clear();
        self.rules.reset();
    }

    // Shared by local and engine moves.
    fn commit(&mut self, applied: AppliedMove, now: Instant) -> Vec<Effect> {
        self.captures.record_if_capture(&applied);
        self.clock.stop();

        let secs = now.saturating_duration_since(self.last_handoff).as_secs_f64();
        let turn = turn_for(self.rules.applied_move_count());
        if let Err(e) = self.ledger.record_move(turn, applied.side, &applied.san, secs) {
            warn!("Ledger refused {}: {}", applied.san, e);
        }
        info!(
            "{} played {} ({}{}) after {:.2}s (turn {})",
            side_name(applied.side),
            applied.san,
            applied.from,
            applied.to,
            secs,
            turn
        );
        debug!("Position after {}: {}", applied.san, applied.fen);

        if self.rules.is_checkmate() {
            return self.finish(format!("Checkmate! {} wins", side_name(applied.side)));
        }
        if self.rules.is_draw() {
            return self.finish("Draw".to_string());
        }
        self.hand_off_to(!applied.side, now)
    }

    fn hand_off_to(&mut self, side: Color, now: Instant) -> Vec<Effect> {
        self.side_on_move = side;
        self.last_handoff = now;
        self.clock.start(side);

        let mut effects = vec![Effect::ArmClock];
        if side == self.human_side {
            self.status = if self.rules.is_in_check() {
                format!("{} to move, in check", side_name(side))
            } else {
                format!("{} to move", side_name(side))
            };
        } else {
            self.awaiting_remote = true;
            self.status = format!("{} (engine) is thinking...", side_name(side));
            effects.push(Effect::RequestRemoteMove {
                generation: self.generation,
                request: MoveRequest {
                    fen: self.rules.fen(),
                    depth: self.depth,
                    method: self.method,
                },
            });
        }
        effects.push(Effect::Render);
        effects
    }

    fn finish(&mut self, status: String) -> Vec<Effect> {
        info!("Session {} ended: {}", self.generation, status);
        self.phase = Phase::Ended;
        self.awaiting_remote = false;
        self.clock.stop();
        self.status = status;
        vec![Effect::DisarmClock, Effect::Render]
    }

    fn fail(&mut self, reason: String) -> Vec<Effect> {
        warn!("Engine failure in session {}: {}", self.generation, reason);
        self.clock.stop();
        self.status = format!("Engine service unreachable ({}). Reset to play again.", reason);
        self.fault = Some(reason);
        vec![Effect::DisarmClock, Effect::Render]
    }
}

#[cfg(test)]
impl<R: RulesEngine> Session<R> {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn side_on_move(&self) -> Color {
        self.side_on_move
    }

    pub fn human_side(&self) -> Color {
        self.human_side
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_faulted(&self) -> bool {
        self.fault.is_some()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn ledger(&self) -> &MoveLedger {
        &self.ledger
    }

    pub fn captures(&self) -> &CaptureTracker {
        &self.captures
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }
}
