use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use super::capture_session::CaptureSession;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateError {
    #[error("capture is already running")]
    AlreadyCapturing,
    #[error("frame budget must be at least 1")]
    ZeroBudget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    Idle,
    Capturing,
}

/// Permission to persist one frame, with the sequence number it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    pub session_id: u64,
    pub sequence_number: u64,
    /// This frame used up the session's frame budget; the gate is idle again.
    pub budget_exhausted: bool,
}

#[derive(Debug)]
struct GateState {
    phase: GatePhase,
    session: CaptureSession,
    sessions_started: u64,
}

/// Decides, at arrival time, whether a frame is captured.
///
/// Two mutually exclusive policies share this gate: explicit start/stop
/// (`start(None)`) and a frame budget (`start(Some(n))`) that returns the
/// gate to idle once `n` frames have been accepted.
///
/// Phase and sequence counter sit behind one mutex, so the UI thread's
/// `start`/`stop` can never interleave with the sensor thread's `admit`.
/// While idle the counter is always 0.
pub struct CaptureGate {
    state: Mutex<GateState>,
}

impl CaptureGate {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState {
                phase: GatePhase::Idle,
                session: CaptureSession::default(),
                sessions_started: 0,
            }),
        }
    }

    /// Opens a new session and returns its id.
    pub fn start(&self, frame_budget: Option<u32>) -> Result<u64, GateError> {
        if frame_budget == Some(0) {
            return Err(GateError::ZeroBudget);
        }
        let mut state = self.lock();
        if state.phase == GatePhase::Capturing {
            return Err(GateError::AlreadyCapturing);
        }
        state.sessions_started += 1;
        state.session = CaptureSession::new(state.sessions_started, frame_budget);
        state.phase = GatePhase::Capturing;

        match frame_budget {
            Some(budget) => log::info!(
                "Capture session {} started (budget {budget} frames)",
                state.sessions_started
            ),
            None => log::info!("Capture session {} started", state.sessions_started),
        }
        Ok(state.sessions_started)
    }

    /// Closes the running session, returning how many frames it accepted.
    /// `None` if the gate was already idle.
    pub fn stop(&self) -> Option<u64> {
        let mut state = self.lock();
        if state.phase == GatePhase::Idle {
            return None;
        }
        let accepted = state.session.sequence_counter();
        log::info!(
            "Capture session {} stopped after {accepted} frames",
            state.session.id()
        );
        state.phase = GatePhase::Idle;
        state.session = CaptureSession::default();
        Some(accepted)
    }

    /// Called once per arriving frame. Frames arriving while idle are
    /// dropped and consume nothing.
    pub fn admit(&self) -> Option<Admission> {
        let mut state = self.lock();
        if state.phase == GatePhase::Idle {
            return None;
        }
        let session_id = state.session.id();
        let sequence_number = state.session.next_sequence();
        let budget_exhausted = state.session.budget_exhausted();
        if budget_exhausted {
            log::info!(
                "Capture session {session_id} reached its budget of {sequence_number} frames"
            );
            state.phase = GatePhase::Idle;
            state.session = CaptureSession::default();
        }
        Some(Admission {
            session_id,
            sequence_number,
            budget_exhausted,
        })
    }

    pub fn phase(&self) -> GatePhase {
        self.lock().phase
    }

    pub fn is_capturing(&self) -> bool {
        self.phase() == GatePhase::Capturing
    }

    /// Frames accepted so far in the running session (0 while idle).
    pub fn frames_accepted(&self) -> u64 {
        self.lock().session.sequence_counter()
    }

    /// Snapshot of the running session, if any.
    pub fn session(&self) -> Option<CaptureSession> {
        let state = self.lock();
        (state.phase == GatePhase::Capturing).then_some(state.session)
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        // Every critical section leaves the state consistent, so a panic
        // elsewhere while holding the lock does not invalidate it.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CaptureGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_initially_idle() {
        let gate = CaptureGate::new();
        assert_eq!(gate.phase(), GatePhase::Idle);
        assert!(!gate.is_capturing());
        assert!(gate.session().is_none());
    }

    #[test]
    fn test_idle_gate_drops_frames_without_consuming_sequence() {
        let gate = CaptureGate::new();
        for _ in 0..10 {
            assert!(gate.admit().is_none());
        }
        assert_eq!(gate.frames_accepted(), 0);
    }

    #[test]
    fn test_capturing_gate_assigns_increasing_sequence() {
        let gate = CaptureGate::new();
        let id = gate.start(None).unwrap();
        let seqs: Vec<u64> = (0..4)
            .map(|_| gate.admit().unwrap().sequence_number)
            .collect();
        assert_eq!(seqs, vec![1, 2, 3, 4]);
        assert_eq!(gate.frames_accepted(), 4);
        assert_eq!(gate.session().unwrap().id(), id);
    }

    #[test]
    fn test_start_while_capturing_is_rejected_and_keeps_state() {
        let gate = CaptureGate::new();
        gate.start(None).unwrap();
        gate.admit();
        gate.admit();
        assert_eq!(gate.start(Some(5)), Err(GateError::AlreadyCapturing));
        assert!(gate.is_capturing());
        assert_eq!(gate.frames_accepted(), 2);
        assert_eq!(gate.session().unwrap().frame_budget(), None);
    }

    #[test]
    fn test_zero_budget_is_rejected() {
        let gate = CaptureGate::new();
        assert_eq!(gate.start(Some(0)), Err(GateError::ZeroBudget));
        assert!(!gate.is_capturing());
    }

    #[test]
    fn test_stop_returns_accepted_count_and_resets() {
        let gate = CaptureGate::new();
        gate.start(None).unwrap();
        gate.admit();
        gate.admit();
        gate.admit();
        assert_eq!(gate.stop(), Some(3));
        assert!(!gate.is_capturing());
        assert_eq!(gate.frames_accepted(), 0);
        assert!(gate.admit().is_none());
    }

    #[test]
    fn test_stop_twice_is_noop() {
        let gate = CaptureGate::new();
        gate.start(None).unwrap();
        assert_eq!(gate.stop(), Some(0));
        assert_eq!(gate.stop(), None);
        assert_eq!(gate.phase(), GatePhase::Idle);
    }

    #[test]
    fn test_stop_on_fresh_gate_is_noop() {
        assert_eq!(CaptureGate::new().stop(), None);
    }

    #[test]
    fn test_restart_resets_sequence_and_bumps_session() {
        let gate = CaptureGate::new();
        let first = gate.start(None).unwrap();
        gate.admit();
        gate.admit();
        gate.stop();
        let second = gate.start(None).unwrap();
        assert_eq!(second, first + 1);
        let admission = gate.admit().unwrap();
        assert_eq!(admission.sequence_number, 1);
        assert_eq!(admission.session_id, second);
    }

    #[test]
    fn test_frame_budget_auto_stops() {
        let gate = CaptureGate::new();
        gate.start(Some(3)).unwrap();

        let admissions: Vec<Option<Admission>> = (0..5).map(|_| gate.admit()).collect();

        let accepted: Vec<&Admission> = admissions.iter().flatten().collect();
        assert_eq!(accepted.len(), 3);
        assert_eq!(
            accepted.iter().map(|a| a.sequence_number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(!accepted[0].budget_exhausted);
        assert!(!accepted[1].budget_exhausted);
        assert!(accepted[2].budget_exhausted);
        assert!(admissions[3].is_none());
        assert!(admissions[4].is_none());
        assert!(!gate.is_capturing());
    }

    #[test]
    fn test_budget_of_one() {
        let gate = CaptureGate::new();
        gate.start(Some(1)).unwrap();
        let admission = gate.admit().unwrap();
        assert!(admission.budget_exhausted);
        assert!(!gate.is_capturing());
    }

    #[test]
    fn test_explicit_stop_before_budget() {
        let gate = CaptureGate::new();
        gate.start(Some(10)).unwrap();
        gate.admit();
        assert_eq!(gate.stop(), Some(1));
        assert!(gate.admit().is_none());
    }

    #[test]
    fn test_start_after_budget_exhaustion() {
        let gate = CaptureGate::new();
        gate.start(Some(1)).unwrap();
        gate.admit();
        assert!(gate.start(None).is_ok());
        assert_eq!(gate.admit().unwrap().sequence_number, 1);
    }

    #[test]
    fn test_concurrent_toggling_never_duplicates_sequence() {
        let gate = Arc::new(CaptureGate::new());
        let done = Arc::new(AtomicBool::new(false));

        let toggler = {
            let gate = gate.clone();
            let done = done.clone();
            std::thread::spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    let _ = gate.start(None);
                    std::thread::yield_now();
                    gate.stop();
                }
            })
        };

        let arrivals: Vec<_> = (0..4)
            .map(|_| {
                let gate = gate.clone();
                std::thread::spawn(move || {
                    (0..2_000).filter_map(|_| gate.admit()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all = Vec::new();
        for handle in arrivals {
            all.extend(handle.join().unwrap());
        }
        done.store(true, Ordering::Relaxed);
        toggler.join().unwrap();

        let unique: HashSet<(u64, u64)> = all
            .iter()
            .map(|a| (a.session_id, a.sequence_number))
            .collect();
        assert_eq!(unique.len(), all.len());

        let mut per_session: HashMap<u64, Vec<u64>> = HashMap::new();
        for a in &all {
            per_session
                .entry(a.session_id)
                .or_default()
                .push(a.sequence_number);
        }
        for seqs in per_session.values_mut() {
            seqs.sort_unstable();
            let expected: Vec<u64> = (1..=seqs.len() as u64).collect();
            assert_eq!(*seqs, expected);
        }
    }
}
