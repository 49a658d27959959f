//! [`Query`] collection related to the [`AllocationRequest`]s queue.

use common::{
    operations::{By, Select},
    pagination,
};
use tracerr::Traced;

use crate::{
    domain::{allocation, AllocationRequest},
    infra::{backend, Backend},
    read::allocation::list,
    Query, Service,
};

use super::BackendQuery;

/// Queries an [`AllocationRequest`] by its [`allocation::Id`].
pub type ById = BackendQuery<By<Option<AllocationRequest>, allocation::Id>>;

/// Queries a [`list::Page`] of [`AllocationRequest`]s ordered by their
/// submission time.
///
/// The whole queue is fetched, then filtered and paginated in place.
#[derive(Clone, Copy, Debug)]
pub struct List(pub list::Selector);

impl From<list::Selector> for List {
    fn from(selector: list::Selector) -> Self {
        Self(selector)
    }
}

impl<B> Query<List> for Service<B>
where
    B: Backend<
        Select<By<Vec<AllocationRequest>, ()>>,
        Ok = Vec<AllocationRequest>,
        Err = Traced<backend::Error>,
    >,
{
    type Ok = list::Page;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        List(selector): List,
    ) -> Result<Self::Ok, Self::Err> {
        let pagination::Selector { arguments, filter } = selector;

        let mut requests = self
            .backend()
            .execute(Select(By::<Vec<AllocationRequest>, _>::new(())))
            .await
            .map_err(tracerr::wrap!())?;
        requests.retain(|r| filter.matches(r));
        requests.sort_by_key(|r| (r.created_at, r.id));

        Ok(list::Page::paginate(
            &arguments,
            requests.into_iter().map(|r| (r.id, r)),
        ))
    }
}
