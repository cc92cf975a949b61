pub mod timing;

pub use stark101_util::{log2_ceil, log2_strict, try_log2_strict};
