//! [`Query`] collection related to the multiple [`Hostel`]s.

use common::operations::By;

use crate::domain::Hostel;
#[cfg(doc)]
use crate::Query;

use super::BackendQuery;

/// Queries all the [`Hostel`]s.
pub type All = BackendQuery<By<Vec<Hostel>, ()>>;
