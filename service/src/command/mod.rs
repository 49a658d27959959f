//! [`Command`] definition.

pub mod approve_allocation_request;
pub mod assign_student;
pub mod authorize_session;
pub mod decline_allocation_request;
pub mod submit_allocation_request;
pub mod unassign_student;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    approve_allocation_request::ApproveAllocationRequest,
    assign_student::AssignStudent, authorize_session::AuthorizeSession,
    decline_allocation_request::DeclineAllocationRequest,
    submit_allocation_request::SubmitAllocationRequest,
    unassign_student::UnassignStudent,
};
