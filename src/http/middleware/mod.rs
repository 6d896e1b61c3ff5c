pub mod access_log;

pub use access_log::{
    access_log_middleware, wrap_with_access_log, wrap_with_access_log_to, AccessRecord,
};
