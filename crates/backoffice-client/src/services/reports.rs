//! Register-scoped reports.

use backoffice_core::{CashRegisterId, Report, ReportKind, ReportPeriod};

use crate::boundary::HttpBoundary;
use crate::error::RemoteResult;
use crate::facade::ResourceClient;

/// Fetches one report for `period` (both ends inclusive).
pub async fn fetch_report<B: HttpBoundary>(
    client: &ResourceClient<B>,
    register: CashRegisterId,
    kind: ReportKind,
    period: ReportPeriod,
) -> RemoteResult<Report> {
    let path = format!("reports/{}", kind.path_segment());
    client
        .perform(
            move |b, options| async move {
                let options = options
                    .param("from", period.from.format("%Y-%m-%d"))
                    .param("to", period.to.format("%Y-%m-%d"));
                b.get(&path, options).await
            },
            Some(register),
            "Failed to load report",
        )
        .await
}
