//! Allocation [`Request`] read model definition.
//!
//! [`Request`]: crate::domain::AllocationRequest

pub mod list {
    //! Allocation [`Request`]s list definitions.

    use common::define_pagination;

    use crate::domain::{allocation, room, user, AllocationRequest};
    #[cfg(doc)]
    use crate::domain::{AllocationRequest as Request, Room, User};

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = AllocationRequest;

    /// Cursor pointing to a specific [`Request`] in a list.
    pub type Cursor = allocation::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// [`allocation::Status`] to filter by.
        pub status: Option<allocation::Status>,

        /// ID of the requesting [`User`] to filter by.
        pub student_id: Option<user::Id>,

        /// ID of the requested [`Room`] to filter by.
        pub room_id: Option<room::Id>,
    }

    impl Filter {
        /// Indicates whether the provided [`Request`] passes this [`Filter`].
        #[must_use]
        pub fn matches(&self, request: &AllocationRequest) -> bool {
            self.status.map_or(true, |s| s == request.status)
                && self.student_id.map_or(true, |id| id == request.student_id)
                && self.room_id.map_or(true, |id| id == request.room_id)
        }
    }
}
