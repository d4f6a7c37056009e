use crate::ChatIdentity;

/// Diagnostic snapshot of the translator, for logs and debug output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslatorView {
    pub identity: Option<ChatIdentity>,
    pub polling: bool,
    pub observer_attached: bool,
    pub structural_attached: bool,
    pub pending_jobs: usize,
    pub shown_affordances: usize,
    pub jobs_issued: u64,
    pub scan_cycles: u64,
    pub resets: u64,
    pub unloaded: bool,
}
