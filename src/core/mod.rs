pub mod etl;
pub mod output;
pub mod pipeline;
pub mod source;

pub use crate::domain::model::{Posting, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
