use crate::analysis::client::AnalysisClient;
use crate::analysis::types::{AnalysisRequest, AnalysisResult, Exercise};
use crate::capture::CaptureSource;
use crate::error::{AnalysisError, AppError, CaptureError};
use crate::session::scheduler::CycleScheduler;
use crate::session::state::{SessionError, SessionState};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(2_000);
const COMMAND_BUFFER: usize = 16;

/// Where the state machine currently is. Cycles are awaited inline in the
/// orchestrator's loop, so a second cycle cannot start while one is in
/// flight; the tick transition carries an explicit guard on top of that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    RequestInFlight,
    ContinuousArmed,
    ContinuousRequestInFlight,
}

pub(crate) enum SessionCommand {
    AnalyzeOnce {
        responder: oneshot::Sender<Result<SessionState, AppError>>,
    },
    StartContinuous {
        responder: oneshot::Sender<()>,
    },
    StopContinuous {
        responder: oneshot::Sender<()>,
    },
    SetExercise {
        exercise: Exercise,
    },
    Snapshot {
        responder: oneshot::Sender<SessionState>,
    },
}

enum CycleOutcome {
    Analyzed(AnalysisResult),
    CaptureFailed(CaptureError),
    AnalysisFailed(AnalysisError),
}

struct Orchestrator {
    capture: Box<dyn CaptureSource>,
    client: Box<dyn AnalysisClient>,
    state: SessionState,
    phase: Phase,
    scheduler: Option<CycleScheduler>,
    tick_period: Duration,
    tick_tx: mpsc::Sender<()>,
    state_tx: watch::Sender<SessionState>,
    cancel: CancellationToken,
}

impl Orchestrator {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<SessionCommand>,
        mut tick_rx: mpsc::Receiver<()>,
    ) {
        let cancel = self.cancel.clone();
        info!("session orchestrator started");
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command, &mut tick_rx).await,
                    None => break,
                },
                Some(_) = tick_rx.recv() => self.handle_tick(&mut tick_rx).await,
            }
        }
        if let Some(scheduler) = self.scheduler.take() {
            scheduler.stop();
        }
        info!("session orchestrator stopped");
    }

    async fn handle_command(
        &mut self,
        command: SessionCommand,
        tick_rx: &mut mpsc::Receiver<()>,
    ) {
        match command {
            SessionCommand::AnalyzeOnce { responder } => {
                if self.phase != Phase::Idle {
                    let _ = responder.send(Err(AppError::SessionBusy));
                    return;
                }
                self.phase = Phase::RequestInFlight;
                let completed = self.run_cycle().await;
                self.phase = Phase::Idle;
                if completed {
                    let _ = responder.send(Ok(self.state.clone()));
                }
                // on an abandoned cycle the responder is dropped and the
                // caller observes SessionClosed
            }
            SessionCommand::StartContinuous { responder } => {
                if self.phase == Phase::Idle {
                    self.scheduler = Some(CycleScheduler::start(
                        self.tick_period,
                        self.tick_tx.clone(),
                    ));
                    self.phase = Phase::ContinuousArmed;
                    self.state.continuous_active = true;
                    self.publish();
                    info!(period_ms = self.tick_period.as_millis() as u64, "continuous session started");
                } else {
                    warn!(phase = ?self.phase, "start_continuous ignored");
                }
                let _ = responder.send(());
            }
            SessionCommand::StopContinuous { responder } => {
                if let Some(scheduler) = self.scheduler.take() {
                    scheduler.stop();
                    // ticks already delivered belong to the stopped timer
                    while tick_rx.try_recv().is_ok() {}
                    self.phase = Phase::Idle;
                    self.state.continuous_active = false;
                    self.publish();
                    info!("continuous session stopped");
                }
                let _ = responder.send(());
            }
            SessionCommand::SetExercise { exercise } => {
                debug!(%exercise, "exercise selection changed");
                self.state.selected_exercise = exercise;
                self.publish();
            }
            SessionCommand::Snapshot { responder } => {
                let _ = responder.send(self.state.clone());
            }
        }
    }

    async fn handle_tick(&mut self, tick_rx: &mut mpsc::Receiver<()>) {
        if self.phase != Phase::ContinuousArmed {
            debug!(phase = ?self.phase, "tick skipped; no cycle may start now");
            return;
        }
        self.phase = Phase::ContinuousRequestInFlight;
        self.run_cycle().await;
        self.phase = Phase::ContinuousArmed;
        // a tick that landed while the cycle ran is stale; the next cycle
        // waits for a fresh one
        while tick_rx.try_recv().is_ok() {}
    }

    /// One capture→analyze→state-update cycle. Returns false when the session
    /// was torn down mid-flight; in that case nothing is written.
    async fn run_cycle(&mut self) -> bool {
        self.state.request_in_flight = true;
        self.publish();

        let cancel = self.cancel.clone();
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            outcome = self.execute_cycle() => Some(outcome),
        };

        let Some(outcome) = outcome else {
            debug!("cycle abandoned; session shutting down");
            return false;
        };

        self.state.request_in_flight = false;
        match outcome {
            CycleOutcome::Analyzed(result) => {
                self.state.latest_result = Some(result);
                self.state.latest_error = None;
            }
            CycleOutcome::CaptureFailed(err) => {
                self.state.latest_error = Some(SessionError::capture(&err));
            }
            CycleOutcome::AnalysisFailed(err) => {
                // keep the previous result visible; stale beats blank
                self.state.latest_error = Some(SessionError::analysis(&err));
            }
        }
        self.publish();
        true
    }

    async fn execute_cycle(&mut self) -> CycleOutcome {
        let exercise = self.state.selected_exercise;
        let frame = match self.capture.capture().await {
            Ok(frame) => frame,
            Err(e) => {
                warn!(%exercise, "frame capture failed: {e}");
                return CycleOutcome::CaptureFailed(e);
            }
        };
        debug!(frame_id = %frame.frame_id(), %exercise, "frame captured");
        let request = AnalysisRequest::new(frame, exercise, true);
        match self.client.analyze(request).await {
            Ok(result) => {
                info!(
                    %exercise,
                    score = result.form_score,
                    corrections = result.corrections.len(),
                    "analysis completed"
                );
                CycleOutcome::Analyzed(result)
            }
            Err(e) => {
                warn!(%exercise, "analysis failed: {e}");
                CycleOutcome::AnalysisFailed(e)
            }
        }
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.state.clone());
    }
}

/// A running analysis session. Owns the orchestrator task; dropping or
/// stopping it cancels the timer and discards any in-flight outcome.
pub struct Session {
    handle: SessionHandle,
    state_rx: watch::Receiver<SessionState>,
    actor_task: tokio::task::JoinHandle<()>,
    cancel: CancellationToken,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Snapshot stream; a new value is published on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_rx.clone()
    }

    pub fn state(&self) -> SessionState {
        self.state_rx.borrow().clone()
    }

    pub fn stop(&self) {
        self.cancel.cancel();
        self.actor_task.abort();
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Cloneable front for driving a session from UI code.
#[derive(Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// Runs one cycle and returns the session state it produced. Rejected
    /// with `SessionBusy` while another request or a continuous session is
    /// active.
    pub async fn analyze_once(&self) -> Result<SessionState, AppError> {
        let (responder, response) = oneshot::channel();
        self.command_tx
            .send(SessionCommand::AnalyzeOnce { responder })
            .await
            .map_err(|_| AppError::SessionClosed)?;
        response.await.map_err(|_| AppError::SessionClosed)?
    }

    pub async fn start_continuous(&self) -> Result<(), AppError> {
        let (responder, response) = oneshot::channel();
        self.command_tx
            .send(SessionCommand::StartContinuous { responder })
            .await
            .map_err(|_| AppError::SessionClosed)?;
        response.await.map_err(|_| AppError::SessionClosed)
    }

    /// Stops the recurring timer. Once this returns no further cycle starts;
    /// the outcome of a cycle that was already in flight has been applied.
    pub async fn stop_continuous(&self) -> Result<(), AppError> {
        let (responder, response) = oneshot::channel();
        self.command_tx
            .send(SessionCommand::StopContinuous { responder })
            .await
            .map_err(|_| AppError::SessionClosed)?;
        response.await.map_err(|_| AppError::SessionClosed)
    }

    /// Takes effect on the next captured frame; an in-flight request is not
    /// interrupted.
    pub async fn set_exercise(&self, exercise: Exercise) -> Result<(), AppError> {
        self.command_tx
            .send(SessionCommand::SetExercise { exercise })
            .await
            .map_err(|_| AppError::SessionClosed)
    }

    pub async fn snapshot(&self) -> Result<SessionState, AppError> {
        let (responder, response) = oneshot::channel();
        self.command_tx
            .send(SessionCommand::Snapshot { responder })
            .await
            .map_err(|_| AppError::SessionClosed)?;
        response.await.map_err(|_| AppError::SessionClosed)
    }
}

pub struct SessionBuilder {
    capture: Option<Box<dyn CaptureSource>>,
    client: Option<Box<dyn AnalysisClient>>,
    exercise: Exercise,
    tick_period: Duration,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            capture: None,
            client: None,
            exercise: Exercise::Squat,
            tick_period: DEFAULT_TICK_PERIOD,
        }
    }

    pub fn capture(mut self, source: impl CaptureSource + 'static) -> Self {
        self.capture = Some(Box::new(source));
        self
    }

    pub fn client(mut self, client: impl AnalysisClient + 'static) -> Self {
        self.client = Some(Box::new(client));
        self
    }

    pub fn exercise(mut self, exercise: Exercise) -> Self {
        self.exercise = exercise;
        self
    }

    // Overrides the default 2000 ms continuous-mode period.
    pub fn tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Spawns the orchestrator task. Must be called from within a tokio
    /// runtime.
    pub fn build(self) -> Result<Session, AppError> {
        let capture = self
            .capture
            .ok_or_else(|| AppError::Builder("capture source not set".to_string()))?;
        let client = self
            .client
            .ok_or_else(|| AppError::Builder("analysis client not set".to_string()))?;

        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (tick_tx, tick_rx) = mpsc::channel(1);
        let state = SessionState::new(self.exercise);
        let (state_tx, state_rx) = watch::channel(state.clone());
        let cancel = CancellationToken::new();

        let orchestrator = Orchestrator {
            capture,
            client,
            state,
            phase: Phase::Idle,
            scheduler: None,
            tick_period: self.tick_period,
            tick_tx,
            state_tx,
            cancel: cancel.clone(),
        };
        let actor_task = tokio::spawn(orchestrator.run(command_rx, tick_rx));

        Ok(Session {
            handle: SessionHandle { command_tx },
            state_rx,
            actor_task,
            cancel,
        })
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
