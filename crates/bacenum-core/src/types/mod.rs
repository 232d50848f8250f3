pub mod data_value;
pub mod error_codes;
pub mod object_id;
pub mod object_type;
pub mod property_id;

pub use data_value::DataValue;
pub use object_id::ObjectId;
pub use object_type::ObjectType;
pub use property_id::PropertyId;
pub use error_codes::{ErrorClass, ErrorCode};
