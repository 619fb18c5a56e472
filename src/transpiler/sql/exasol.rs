//! Exasol to Exasol. The reference grammar: every capability, no rewrites.

use crate::ast::ScalarFunction;
use crate::config::AdapterProperties;
use crate::dialect::capabilities::{AggregateCapability, LiteralCapability, PredicateCapability};
use crate::dialect::{Capabilities, DialectDescriptor, NullSorting};
use crate::error::VsResult;
use crate::identifier::{IdentifierConverter, QuoteStyle};
use crate::metadata::{DataType, NativeTypeDescriptor};
use crate::transpiler::traits::SqlGenerator;
use crate::types::{BinaryColumnHandling, TypeMapper, jdbc, map_base};

use super::{MAIN_FULL, keywords};

pub struct ExasolGenerator {
    descriptor: DialectDescriptor,
    identifiers: IdentifierConverter,
    types: ExasolTypeMapper,
}

impl ExasolGenerator {
    pub fn new(properties: &AdapterProperties) -> VsResult<Self> {
        let capabilities = Capabilities::builder()
            .main(MAIN_FULL)
            .literals(LiteralCapability::ALL)
            .predicates(PredicateCapability::ALL)
            .scalar_functions(ScalarFunction::ALL)
            .aggregates(AggregateCapability::ALL)
            .build();
        let descriptor = DialectDescriptor::new("EXASOL", capabilities)
            .null_sorting(NullSorting::High)
            .omit_parentheses(&[
                ScalarFunction::Sysdate,
                ScalarFunction::Systimestamp,
                ScalarFunction::CurrentSchema,
                ScalarFunction::CurrentSession,
                ScalarFunction::CurrentStatement,
                ScalarFunction::CurrentUser,
            ])
            .excluding(properties)?;
        Ok(Self {
            descriptor,
            identifiers: IdentifierConverter::upper_case(QuoteStyle::DoubleQuote).with_reserved_words(keywords::EXASOL),
            types: ExasolTypeMapper {
                binary_handling: properties.binary_column_handling()?,
            },
        })
    }
}

impl SqlGenerator for ExasolGenerator {
    fn descriptor(&self) -> &DialectDescriptor {
        &self.descriptor
    }

    fn identifiers(&self) -> &IdentifierConverter {
        &self.identifiers
    }

    fn type_mapper(&self) -> &dyn TypeMapper {
        &self.types
    }
}

/// Exasol reports its own types under vendor codes.
#[derive(Debug, Clone, Copy)]
pub struct ExasolTypeMapper {
    binary_handling: BinaryColumnHandling,
}

impl TypeMapper for ExasolTypeMapper {
    fn map(&self, descriptor: &NativeTypeDescriptor) -> DataType {
        match descriptor.jdbc_type {
            jdbc::ORACLE_INTERVAL_DAY_TO_SECOND => DataType::IntervalDayToSecond {
                precision: 2,
                fraction: 3,
            },
            jdbc::ORACLE_INTERVAL_YEAR_TO_MONTH => DataType::IntervalYearToMonth { precision: 2 },
            jdbc::EXASOL_GEOMETRY => DataType::Geometry { srid: 3857 },
            jdbc::EXASOL_TIMESTAMP_WITH_LOCAL_TIME_ZONE => DataType::Timestamp {
                with_local_time_zone: true,
            },
            jdbc::EXASOL_HASHTYPE => DataType::Hashtype { bytes: 16 },
            _ => map_base(descriptor, self.binary_handling),
        }
    }
}
