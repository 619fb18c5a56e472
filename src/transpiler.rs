//! SQL Transpiler for push-down queries.
//!
//! Converts a [`Statement`] into the SQL text of one foreign dialect. The grammar shape is
//! shared by every dialect and lives in [`render`]; dialects contribute data through their
//! [`crate::dialect::DialectDescriptor`] and the few structural hooks of [`SqlGenerator`].

pub mod function_mapper;
pub mod render;
pub mod sql;
pub mod traits;

#[cfg(test)]
mod tests;

use crate::ast::Statement;
use crate::error::VsResult;
pub use render::{Position, RenderContext, Renderer};
pub use traits::{GroupConcatCall, OrderKey, SqlGenerator};

/// Trait for converting a push-down statement to SQL.
pub trait ToSql {
    /// Render with the given dialect generator and per-query context.
    fn to_sql(&self, generator: &dyn SqlGenerator, context: &RenderContext) -> VsResult<String>;
}

impl ToSql for Statement {
    fn to_sql(&self, generator: &dyn SqlGenerator, context: &RenderContext) -> VsResult<String> {
        Renderer::new(generator, context).render(self)
    }
}
