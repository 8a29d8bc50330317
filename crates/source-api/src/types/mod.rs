mod criteria;
mod item;
mod page;
mod payload;

pub use criteria::SearchCriteria;
pub use item::{ItemId, ResultItem};
pub use page::ResultPage;
pub use payload::{MediaKind, Payload};
