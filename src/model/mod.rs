pub mod dates;
pub mod record;

pub use record::{Bucket, BucketFilter, Record, ValidationError, parse_datetime};
