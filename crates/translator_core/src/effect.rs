use std::time::Duration;

use crate::{Affordance, Annotation, JobId, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Poll for the chat root now and then every `interval`.
    StartRootPolling { interval: Duration },
    StopRootPolling,
    AttachContentWatcher,
    DetachContentWatcher,
    AttachStructuralWatcher,
    DetachStructuralWatcher,
    /// (Re)start the single debounce timer; any earlier deadline is replaced.
    ArmDebounce { generation: u64, delay: Duration },
    /// Snapshot identity, configuration and message nodes for a scan cycle.
    ScanPage,
    /// Snapshot identity only, for a structural navigation check.
    SampleIdentity,
    ScheduleSettle { delay: Duration },
    /// Remove every injected affordance and its `button-shown` marker.
    RemoveAffordances,
    RemoveAffordance { node: NodeId },
    ShowAffordance { node: NodeId, affordance: Affordance },
    MarkPending { node: NodeId, job_id: JobId },
    Dispatch { job_id: JobId, text: String },
    /// Apply a settled job to its node if the node is still attached.
    Reconcile {
        node: NodeId,
        job_id: JobId,
        annotation: Annotation,
    },
}
