/// Per-run capture state: the sequence counter and optional frame budget.
///
/// Sequence numbers are 1-based; the counter holds the last one handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureSession {
    id: u64,
    sequence_counter: u64,
    frame_budget: Option<u32>,
}

impl CaptureSession {
    pub fn new(id: u64, frame_budget: Option<u32>) -> Self {
        Self {
            id,
            sequence_counter: 0,
            frame_budget,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn sequence_counter(&self) -> u64 {
        self.sequence_counter
    }

    pub fn frame_budget(&self) -> Option<u32> {
        self.frame_budget
    }

    /// Consumes and returns the next sequence number.
    pub fn next_sequence(&mut self) -> u64 {
        self.sequence_counter += 1;
        self.sequence_counter
    }

    pub fn budget_exhausted(&self) -> bool {
        self.frame_budget
            .is_some_and(|budget| self.sequence_counter >= u64::from(budget))
    }
}
