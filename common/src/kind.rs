//! Macro for defining kind enums.

/// Defines a kind enum: a closed set of named values carried over the wire
/// as `camelCase` strings.
///
/// # Example
///
/// ```rust
/// # use common::define_kind;
///
/// define_kind! {
///     #[doc = "Status of a payment."]
///     enum PaymentStatus {
///         #[doc = "Awaiting payment."]
///         Pending = 1,
///
///         #[doc = "Paid in full."]
///         Paid = 2,
///     }
/// }
///
/// assert_eq!(PaymentStatus::Paid.to_string(), "paid");
/// assert_eq!("pending".parse(), Ok(PaymentStatus::Pending));
/// assert_eq!(PaymentStatus::ALL.len(), 2);
/// ```
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_kind {
    (
        #[doc = $doc:literal]
        enum $name:ident {
            $(
                #[doc = $variant_doc:literal]
                $variant:ident = $value:expr
            ),* $(,)?
        }
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            $crate::private::strum::Display,
            $crate::private::strum::EnumString,
            Eq,
            Hash,
            Ord,
            PartialEq,
            PartialOrd,
            $crate::private::serde::Deserialize,
            $crate::private::serde::Serialize,
        )]
        #[serde(rename_all = "camelCase")]
        #[doc = $doc]
        #[repr(u8)]
        #[strum(serialize_all = "camelCase")]
        pub enum $name {
            $(
                 #[doc = $variant_doc]
                 $variant = $value,
            )*
        }

        impl $name {
            #[doc = "All the variants, in declaration order."]
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Converts this into its [`u8`] representation.
            #[must_use]
            pub const fn u8(self) -> u8 {
                self as u8
            }
        }
    };
}
