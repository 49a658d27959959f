//! Domain definitions.

/// Defines a trimmed non-empty text value limited by `max` bytes.
macro_rules! define_text {
    (
        #[doc = $doc:literal]
        $name:ident(max = $max:literal)
    ) => {
        #[doc = $doc]
        #[derive(
            ::derive_more::AsRef,
            Clone,
            Debug,
            ::derive_more::Display,
            Eq,
            Hash,
            Ord,
            PartialEq,
            PartialOrd,
            ::serde::Deserialize,
            ::serde::Serialize,
        )]
        #[as_ref(forward)]
        #[serde(try_from = "String")]
        pub struct $name(String);

        impl $name {
            #[doc = concat!(
                "Creates a new [`", stringify!($name), "`] if the given ",
                "`value` is valid.",
            )]
            #[must_use]
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let value = value.into();
                Self::check(&value).then_some(Self(value))
            }

            #[doc = concat!(
                "Checks whether the given `value` is a valid [`",
                stringify!($name), "`].",
            )]
            fn check(value: impl AsRef<str>) -> bool {
                let value = value.as_ref();
                value.trim() == value && !value.is_empty() && value.len() <= $max
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = &'static str;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s).ok_or(concat!("invalid `", stringify!($name), "`"))
            }
        }

        impl TryFrom<String> for $name {
            type Error = &'static str;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value).ok_or(concat!("invalid `", stringify!($name), "`"))
            }
        }
    };
}

pub mod allocation;
pub mod hostel;
pub mod room;
pub mod user;

pub use self::{
    allocation::Request as AllocationRequest, hostel::Hostel, room::Room,
    user::User,
};
