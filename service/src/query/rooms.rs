//! [`Query`] collection related to the multiple [`Room`]s.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::Room,
    infra::{backend, Backend},
    read, Query, Service,
};

use super::BackendQuery;

/// Queries all the [`Room`]s as a flat list.
pub type All = BackendQuery<By<Vec<Room>, ()>>;

/// Queries all the [`Room`]s grouped into a [`read::Index`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Index;

impl<B> Query<Index> for Service<B>
where
    B: Backend<
        Select<By<Vec<Room>, ()>>,
        Ok = Vec<Room>,
        Err = Traced<backend::Error>,
    >,
{
    type Ok = read::Index;
    type Err = Traced<backend::Error>;

    async fn execute(&self, _: Index) -> Result<Self::Ok, Self::Err> {
        Ok(read::Index::new(
            self.backend()
                .execute(Select(By::<Vec<Room>, _>::new(())))
                .await
                .map_err(tracerr::wrap!())?,
        ))
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{
            hostel,
            room::{self, Capacity, Number},
            user, Room,
        },
        infra::{memory::Seed, Memory},
        read::{locator::Key, Occupancy},
        Config, Query as _, Service,
    };

    use super::Index;

    fn room(
        hostel: &hostel::Ref,
        floor: i16,
        slots: Vec<Option<user::Id>>,
    ) -> Room {
        Room {
            id: room::Id::new(),
            hostel: Some(hostel.clone()),
            block: None,
            floor: Some(floor),
            number: Number::new(format!("{floor}01")).unwrap(),
            capacity: Capacity::new(4).unwrap(),
            price: None,
            slots,
        }
    }

    #[tokio::test]
    async fn fetching_twice_yields_same_occupancy() {
        let queens = hostel::Ref {
            id: hostel::Id::new(),
            name: hostel::Name::new("Queens").unwrap(),
        };
        let (a, b) = (user::Id::new(), user::Id::new());
        let service = Service::new(
            Config::default(),
            Memory::new(Seed {
                rooms: vec![
                    room(&queens, 1, vec![Some(a), None, None, Some(b)]),
                    room(&queens, 2, vec![]),
                ],
                ..Seed::default()
            }),
        );

        let first = service.execute(Index).await.unwrap();
        let second = service.execute(Index).await.unwrap();

        let occupancies = |index: &crate::read::Index| {
            index.iter().map(Occupancy::from).collect::<Vec<_>>()
        };
        assert_eq!(occupancies(&first), occupancies(&second));
        assert_eq!(first.summary(), second.summary());

        let floor = first.rooms(
            &Key::Known(queens.name.clone()),
            &Key::Unknown,
            &Key::Known(1),
        );
        let occupancy = Occupancy::from(&floor[0]);
        assert_eq!(occupancy.occupied, 2);
        assert_eq!(occupancy.vacant, 2);
        assert_eq!(occupancy.free_beds, [1, 2]);
    }
}
