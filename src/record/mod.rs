//! Launch description data model

mod types;

pub use types::{
    IncludeRecord, LaunchArgument, LaunchDescription, LaunchEntity, NodeRecord,
};
