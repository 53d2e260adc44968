mod category;
mod index;
mod location;
mod record;
mod snapshot;

pub use self::category::Category;
pub use self::index::{Page, SearchIndex};
pub use self::location::Location;
pub use self::record::Record;
pub use self::snapshot::Snapshot;

fn sanitize(s: impl AsRef<str>) -> String {
    s.as_ref().trim().to_lowercase()
}
