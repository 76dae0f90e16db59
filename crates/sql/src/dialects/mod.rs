pub mod function_mapper;
pub mod oracle;

pub use function_mapper::{FunctionMapper, Translation, TransformFn};
pub use oracle::OracleDialect;
