//! [`Query`] collection related to a single [`Room`].

use common::operations::By;

use crate::domain::{room, Room};
#[cfg(doc)]
use crate::Query;

use super::BackendQuery;

/// Queries a [`Room`] by its [`room::Id`].
pub type ById = BackendQuery<By<Option<Room>, room::Id>>;
