//! [`Capability`] definitions.
//!
//! The single place mapping a [`Role`] to the actions offered to it. It only
//! decides what is shown: the backend authorizes every call on its own.

use std::collections::BTreeSet;

use common::define_kind;

use super::Role;

define_kind! {
    #[doc = "Action offered to a [`Role`]."]
    enum Capability {
        #[doc = "Browse rooms and their occupancy."]
        ViewRooms = 1,

        #[doc = "Submit an allocation request for a bed."]
        RequestRoom = 2,

        #[doc = "Browse allocation requests of all students."]
        ViewRequestQueue = 3,

        #[doc = "Approve or decline allocation requests."]
        DecideRequests = 4,

        #[doc = "Assign students into beds and vacate them directly."]
        AssignRooms = 5,

        #[doc = "Create, edit and delete hostels and rooms."]
        ManageHostels = 6,

        #[doc = "Manage roles of other users."]
        ManageUsers = 7,
    }
}

/// Resolves the set of [`Capability`]s of the provided [`Role`].
#[must_use]
pub fn capabilities_for(role: Role) -> BTreeSet<Capability> {
    use Capability as C;

    let caps: &[Capability] = match role {
        Role::Student => &[C::ViewRooms, C::RequestRoom],
        Role::Staff => &[
            C::ViewRooms,
            C::ViewRequestQueue,
            C::DecideRequests,
            C::AssignRooms,
        ],
        Role::Admin => &[
            C::ViewRooms,
            C::ViewRequestQueue,
            C::DecideRequests,
            C::AssignRooms,
            C::ManageHostels,
        ],
        Role::SuperAdmin => Capability::ALL,
    };
    caps.iter().copied().collect()
}

#[cfg(test)]
mod spec {
    use super::{capabilities_for, Capability, Role};

    #[test]
    fn students_only_request() {
        let caps = capabilities_for(Role::Student);

        assert!(caps.contains(&Capability::RequestRoom));
        assert!(!caps.contains(&Capability::DecideRequests));
        assert!(!caps.contains(&Capability::AssignRooms));
    }

    #[test]
    fn administration_decides() {
        for role in [Role::Staff, Role::Admin, Role::SuperAdmin] {
            assert!(role.can(Capability::DecideRequests), "{role}");
            assert!(role.can(Capability::AssignRooms), "{role}");
        }
        assert!(!Role::Staff.can(Capability::ManageHostels));
    }

    #[test]
    fn super_admin_can_everything() {
        assert_eq!(
            capabilities_for(Role::SuperAdmin).len(),
            Capability::ALL.len(),
        );
    }
}
