//! DDL builders: CREATE, ALTER, DROP and TRUNCATE TABLE.
//!
//! DDL text cannot carry bind parameters, so DEFAULT values are inlined as
//! literals and every identifier is validated before rendering.

pub mod alter;
pub mod column;
pub mod create;
pub mod drop;

pub use alter::{AlterOperation, AlterTable, ColumnModification};
pub use column::{ColumnBuilder, ColumnConstraint, ColumnDefinition, ColumnOwner};
pub use create::{CreateTable, TableConstraint};
pub use drop::{DropTable, TruncateTable};
