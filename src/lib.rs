mod collection;
mod error;
mod mongo;
mod options;
mod page;
mod paginator;
mod params;

pub use collection::{FindSpec, PaginatedRead};
pub use error::{PaginateError, PaginateResult};
pub use options::{PaginationOptions, PopulateSpec};
pub use page::{PageResult, Records};
pub use paginator::{PaginateExt, Paginator};
