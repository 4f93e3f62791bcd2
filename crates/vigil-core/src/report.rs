//! Probe outcome and report types.

use serde::{Deserialize, Serialize};

/// Verdict of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProbeStatus {
    /// The probe was attempted and succeeded.
    Ok,
    /// The probe was attempted and did not succeed.
    Fail,
    /// Prerequisite configuration was absent; the probe was not attempted.
    Skip,
}

impl ProbeStatus {
    /// Status icon used in human-readable output.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Ok => "✅",
            Self::Fail => "❌",
            Self::Skip => "⚠️",
        }
    }
}

impl std::fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Ok => "OK",
            Self::Fail => "FAIL",
            Self::Skip => "SKIP",
        };
        write!(f, "{label}")
    }
}

/// Result record for one probe, created transiently for console reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// Component name (e.g. `Redis`, `LLM Structured`).
    pub component: String,
    /// Probe verdict.
    pub status: ProbeStatus,
    /// Free-text detail: response excerpt, error message, or skip reason.
    pub detail: String,
}

/// Ordered sequence of probe outcomes for one command invocation.
#[derive(Debug, Default, Serialize)]
pub struct ProbeReport {
    outcomes: Vec<ProbeOutcome>,
}

impl ProbeReport {
    /// Append an outcome.
    pub fn record(&mut self, outcome: ProbeOutcome) {
        self.outcomes.push(outcome);
    }

    /// Record a successful probe.
    pub fn ok(&mut self, component: impl Into<String>, detail: impl Into<String>) {
        self.record(ProbeOutcome {
            component: component.into(),
            status: ProbeStatus::Ok,
            detail: detail.into(),
        });
    }

    /// Record a failed probe.
    pub fn fail(&mut self, component: impl Into<String>, detail: impl Into<String>) {
        self.record(ProbeOutcome {
            component: component.into(),
            status: ProbeStatus::Fail,
            detail: detail.into(),
        });
    }

    /// Record a skipped probe.
    pub fn skip(&mut self, component: impl Into<String>, detail: impl Into<String>) {
        self.record(ProbeOutcome {
            component: component.into(),
            status: ProbeStatus::Skip,
            detail: detail.into(),
        });
    }

    /// All outcomes in recording order.
    #[must_use]
    pub fn outcomes(&self) -> &[ProbeOutcome] {
        &self.outcomes
    }

    /// Outcomes with status FAIL, in recording order.
    pub fn failures(&self) -> impl Iterator<Item = &ProbeOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == ProbeStatus::Fail)
    }

    #[must_use]
    pub fn ok_count(&self) -> usize {
        self.count(ProbeStatus::Ok)
    }

    #[must_use]
    pub fn fail_count(&self) -> usize {
        self.count(ProbeStatus::Fail)
    }

    #[must_use]
    pub fn skip_count(&self) -> usize {
        self.count(ProbeStatus::Skip)
    }

    /// True when no probe reported FAIL. SKIP does not count against passing.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.fail_count() == 0
    }

    /// Process exit code: 0 iff no probe reported FAIL.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.all_passed())
    }

    fn count(&self, status: ProbeStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }
}
