use crate::{ChatIdentity, JobId, NodeId, NodeMarkers, ProviderId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Page context is ready; start looking for the chat root.
    Started,
    /// One tick of the attachment poll.
    RootPolled {
        root_present: bool,
        identity: ChatIdentity,
    },
    /// Something changed under the chat root.
    ContentMutated,
    /// A batch of mutations on the body's immediate children; one entry per
    /// mutation record with the number of nodes it added.
    BodyMutated { added_per_record: Vec<usize> },
    /// The debounce timer armed with `generation` fired.
    DebounceElapsed { generation: u64 },
    /// Snapshot of the page taken for one scan cycle.
    PageScanned(PageScan),
    /// Identity sampled after a structural change.
    IdentitySampled(ChatIdentity),
    /// The post-reset settle delay is over.
    SettleElapsed,
    /// User clicked the translate affordance of a message.
    AffordanceActivated { node: NodeId, at_ms: u64 },
    /// A provider reply came back for a job.
    TranslationSettled { job_id: JobId, outcome: JobOutcome },
    /// Page is going away.
    Unloading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageScan {
    pub identity: ChatIdentity,
    /// Provider configured at the time of the scan.
    pub provider: ProviderId,
    pub messages: Vec<ScannedMessage>,
    pub at_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedMessage {
    pub node: NodeId,
    pub markers: NodeMarkers,
    /// Extracted plain text; may be empty.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Translated(String),
    Failed(String),
}
