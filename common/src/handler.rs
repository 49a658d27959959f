//! [`Handler`] abstraction.
//!
//! Every backend call, query and command in this workspace is a [`Handler`]
//! implementation selected by the type of its arguments.

use std::future::Future;

/// Asynchronous handler of `Args`.
pub trait Handler<Args = ()> {
    /// Type of a successful result.
    type Ok;

    /// Type of an error.
    type Err;

    /// Handles the provided `args`.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
