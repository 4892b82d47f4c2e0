//! Wire-level data model: graph definitions, evaluation requests and responses.

mod content;
mod definition;
mod response;

pub use content::*;
pub use definition::*;
pub use response::*;
