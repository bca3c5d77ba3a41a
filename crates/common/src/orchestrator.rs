use crate::directory::DirectorySource;
use crate::error::ProvisionError;
use crate::fs::{Connect, FileSystem};
use crate::reconcile::{ReconcileReport, Reconciler};

/// Run one provisioning pass: directory phase, then filesystem phase.
///
/// A directory failure returns before the filesystem is ever opened. Once a
/// handle is acquired it is closed exactly once, whether reconciliation
/// succeeded or not. A reconcile failure wins over a close failure.
pub async fn run<D, C>(
    directory: &D,
    connector: &C,
    reconciler: &Reconciler,
) -> Result<ReconcileReport, ProvisionError>
where
    D: DirectorySource + ?Sized,
    C: Connect + ?Sized,
{
    let users = directory.fetch_users().await?;
    tracing::info!(count = users.len(), "found users");

    let fs = connector.connect().await?;
    let outcome = reconciler.reconcile(&fs, &users).await;
    let closed = fs.close().await;

    match (outcome, closed) {
        (Ok(report), Ok(())) => Ok(report),
        (Ok(_), Err(close_err)) => Err(close_err.into()),
        (Err(err), Ok(())) => Err(err.into()),
        (Err(err), Err(close_err)) => {
            tracing::warn!(error = %close_err, "failed to close filesystem after error");
            Err(err.into())
        }
    }
}
