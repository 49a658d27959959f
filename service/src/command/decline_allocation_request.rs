//! [`Command`] for declining an [`AllocationRequest`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        allocation::{self, Decision, Verdict},
        AllocationRequest,
    },
    infra::{backend, Backend},
    Service,
};
#[cfg(doc)]
use crate::domain::Room;

use super::Command;

/// [`Command`] for declining a pending [`AllocationRequest`].
///
/// The requested [`Room`] is left untouched.
#[derive(Clone, Copy, Debug, From)]
pub struct DeclineAllocationRequest {
    /// ID of the [`AllocationRequest`] to decline.
    pub request_id: allocation::Id,
}

impl<B> Command<DeclineAllocationRequest> for Service<B>
where
    B: Backend<
            Select<By<Option<AllocationRequest>, allocation::Id>>,
            Ok = Option<AllocationRequest>,
            Err = Traced<backend::Error>,
        > + Backend<
            Update<Decision>,
            Ok = AllocationRequest,
            Err = Traced<backend::Error>,
        >,
{
    type Ok = AllocationRequest;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeclineAllocationRequest,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeclineAllocationRequest { request_id } = cmd;

        _ = self
            .backend()
            .execute(Select(By::<Option<AllocationRequest>, _>::new(
                request_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RequestNotExists(request_id))
            .map_err(tracerr::wrap!())?
            .decide(Verdict::Decline)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        match self
            .backend()
            .execute(Update(Decision {
                request_id,
                verdict: Verdict::Decline,
            }))
            .await
        {
            Ok(request) => Ok(request),
            Err(e) if e.as_ref().is_conflict() => {
                Err(tracerr::new!(E::DecidedMeanwhile(request_id)))
            }
            Err(e) if e.as_ref().is_not_found() => {
                Err(tracerr::new!(E::RequestNotExists(request_id)))
            }
            Err(e) => Err(e).map_err(tracerr::map_from_and_wrap!(=> E)),
        }
    }
}

/// Error of [`DeclineAllocationRequest`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`AllocationRequest`] is decided already.
    #[display("{_0}")]
    AlreadyDecided(allocation::AlreadyDecided),

    /// [`Backend`] error.
    #[display("`Backend` operation failed: {_0}")]
    Backend(backend::Error),

    /// [`AllocationRequest`] is decided by someone else meanwhile.
    #[display("`AllocationRequest(id: {_0})` is decided meanwhile")]
    #[from(ignore)]
    DecidedMeanwhile(#[error(not(source))] allocation::Id),

    /// [`AllocationRequest`] with the provided ID does not exist.
    #[display("`AllocationRequest(id: {_0})` does not exist")]
    #[from(ignore)]
    RequestNotExists(#[error(not(source))] allocation::Id),
}
