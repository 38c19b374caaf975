/// Load state of one slot in the snapshot batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotLoadState {
    Pending,
    Ready,
    Failed(String),
}

/// Outcome of joining every slot of the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
    Pending { ready: usize, total: usize },
    Ready { total: usize },
    /// First failing slot in index order; the whole batch is failed.
    Failed { index: usize, reason: String },
}

/// All-or-nothing join: any failed slot fails the batch, otherwise the batch is
/// ready only once every slot is. An empty batch is never ready.
pub fn join_batch(states: impl IntoIterator<Item = SlotLoadState>) -> BatchStatus {
    let mut ready = 0;
    let mut total = 0;
    for (index, state) in states.into_iter().enumerate() {
        total += 1;
        match state {
            SlotLoadState::Ready => ready += 1,
            SlotLoadState::Pending => {}
            SlotLoadState::Failed(reason) => return BatchStatus::Failed { index, reason },
        }
    }

    if total > 0 && ready == total {
        BatchStatus::Ready { total }
    } else {
        BatchStatus::Pending { ready, total }
    }
}
