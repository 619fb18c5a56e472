//! Capability catalog.
//!
//! Capabilities are consumed by the host's push-down planner, not by the renderer. A dialect
//! declaring a capability promises that the renderer produces SQL the target accepts for it.

use std::collections::BTreeSet;

use crate::ast::ScalarFunction;
use crate::error::{VsError, VsResult};

named_enum! {
    /// Structural features of a push-down query.
    pub enum MainCapability {
        SelectlistProjection => "SELECTLIST_PROJECTION",
        SelectlistExpressions => "SELECTLIST_EXPRESSIONS",
        FilterExpressions => "FILTER_EXPRESSIONS",
        AggregateSingleGroup => "AGGREGATE_SINGLE_GROUP",
        AggregateGroupByColumn => "AGGREGATE_GROUP_BY_COLUMN",
        AggregateGroupByExpression => "AGGREGATE_GROUP_BY_EXPRESSION",
        AggregateGroupByTuple => "AGGREGATE_GROUP_BY_TUPLE",
        AggregateHaving => "AGGREGATE_HAVING",
        OrderByColumn => "ORDER_BY_COLUMN",
        OrderByExpression => "ORDER_BY_EXPRESSION",
        Limit => "LIMIT",
        LimitWithOffset => "LIMIT_WITH_OFFSET",
    }
}

named_enum! {
    /// Literal kinds.
    pub enum LiteralCapability {
        Null => "NULL",
        Bool => "BOOL",
        Date => "DATE",
        Timestamp => "TIMESTAMP",
        TimestampUtc => "TIMESTAMP_UTC",
        Double => "DOUBLE",
        ExactNumeric => "EXACTNUMERIC",
        String => "STRING",
        Interval => "INTERVAL",
    }
}

named_enum! {
    /// Predicates.
    pub enum PredicateCapability {
        And => "AND",
        Or => "OR",
        Not => "NOT",
        Equal => "EQUAL",
        NotEqual => "NOTEQUAL",
        Less => "LESS",
        LessEqual => "LESSEQUAL",
        Like => "LIKE",
        LikeEscape => "LIKE_ESCAPE",
        RegexpLike => "REGEXP_LIKE",
        Between => "BETWEEN",
        InConstList => "IN_CONSTLIST",
        IsNull => "IS_NULL",
        IsNotNull => "IS_NOT_NULL",
    }
}

named_enum! {
    /// Aggregate functions, including their COUNT(*) and DISTINCT variants.
    pub enum AggregateCapability {
        Count => "COUNT",
        CountStar => "COUNT_STAR",
        CountDistinct => "COUNT_DISTINCT",
        Sum => "SUM",
        SumDistinct => "SUM_DISTINCT",
        Min => "MIN",
        Max => "MAX",
        Avg => "AVG",
        AvgDistinct => "AVG_DISTINCT",
        Median => "MEDIAN",
        FirstValue => "FIRST_VALUE",
        LastValue => "LAST_VALUE",
        Stddev => "STDDEV",
        StddevDistinct => "STDDEV_DISTINCT",
        StddevPop => "STDDEV_POP",
        StddevPopDistinct => "STDDEV_POP_DISTINCT",
        StddevSamp => "STDDEV_SAMP",
        StddevSampDistinct => "STDDEV_SAMP_DISTINCT",
        Variance => "VARIANCE",
        VarianceDistinct => "VARIANCE_DISTINCT",
        VarPop => "VAR_POP",
        VarPopDistinct => "VAR_POP_DISTINCT",
        VarSamp => "VAR_SAMP",
        VarSampDistinct => "VAR_SAMP_DISTINCT",
        GroupConcat => "GROUP_CONCAT",
        ApproximateCountDistinct => "APPROXIMATE_COUNT_DISTINCT",
    }
}

const LITERAL_PREFIX: &str = "LITERAL_";
const PREDICATE_PREFIX: &str = "FN_PRED_";
const AGGREGATE_PREFIX: &str = "FN_AGG_";
const SCALAR_PREFIX: &str = "FN_";

/// Immutable set of declared capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub main: BTreeSet<MainCapability>,
    pub literals: BTreeSet<LiteralCapability>,
    pub predicates: BTreeSet<PredicateCapability>,
    pub scalar_functions: BTreeSet<ScalarFunction>,
    pub aggregates: BTreeSet<AggregateCapability>,
}

impl Capabilities {
    pub fn builder() -> CapabilitiesBuilder {
        CapabilitiesBuilder::default()
    }

    pub fn supports_main(&self, capability: MainCapability) -> bool {
        self.main.contains(&capability)
    }

    pub fn supports_scalar(&self, function: ScalarFunction) -> bool {
        self.scalar_functions.contains(&function)
    }

    /// All capability names, in the prefixed wire spelling (`LIMIT`, `LITERAL_NULL`, `FN_AGG_COUNT`, ...).
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.main.iter().map(|c| c.name().to_string()).collect();
        names.extend(self.literals.iter().map(|c| format!("{}{}", LITERAL_PREFIX, c)));
        names.extend(self.predicates.iter().map(|c| format!("{}{}", PREDICATE_PREFIX, c)));
        names.extend(self.aggregates.iter().map(|c| format!("{}{}", AGGREGATE_PREFIX, c)));
        names.extend(self.scalar_functions.iter().map(|c| format!("{}{}", SCALAR_PREFIX, c)));
        names
    }

    /// Copy of this set without the named capabilities.
    pub fn without<'a>(&self, excluded: impl IntoIterator<Item = &'a str>) -> VsResult<Capabilities> {
        let mut result = self.clone();
        for name in excluded {
            match parse_capability(name)? {
                CapabilityRef::Main(c) => {
                    result.main.remove(&c);
                }
                CapabilityRef::Literal(c) => {
                    result.literals.remove(&c);
                }
                CapabilityRef::Predicate(c) => {
                    result.predicates.remove(&c);
                }
                CapabilityRef::Aggregate(c) => {
                    result.aggregates.remove(&c);
                }
                CapabilityRef::Scalar(c) => {
                    result.scalar_functions.remove(&c);
                }
            }
        }
        Ok(result)
    }
}

/// Reference to a single capability of any category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityRef {
    Main(MainCapability),
    Literal(LiteralCapability),
    Predicate(PredicateCapability),
    Aggregate(AggregateCapability),
    Scalar(ScalarFunction),
}

/// Resolve a prefixed capability name.
pub fn parse_capability(name: &str) -> VsResult<CapabilityRef> {
    let found = if let Some(rest) = name.strip_prefix(LITERAL_PREFIX) {
        LiteralCapability::from_name(rest).map(CapabilityRef::Literal)
    } else if let Some(rest) = name.strip_prefix(PREDICATE_PREFIX) {
        PredicateCapability::from_name(rest).map(CapabilityRef::Predicate)
    } else if let Some(rest) = name.strip_prefix(AGGREGATE_PREFIX) {
        AggregateCapability::from_name(rest).map(CapabilityRef::Aggregate)
    } else if let Some(rest) = name.strip_prefix(SCALAR_PREFIX) {
        ScalarFunction::from_name(rest).map(CapabilityRef::Scalar)
    } else {
        MainCapability::from_name(name).map(CapabilityRef::Main)
    };
    found.ok_or_else(|| VsError::config(format!("Unknown capability '{}' in EXCLUDED_CAPABILITIES", name)))
}

/// Builder for [`Capabilities`].
#[derive(Debug, Default)]
pub struct CapabilitiesBuilder {
    caps: Capabilities,
}

impl CapabilitiesBuilder {
    pub fn main(mut self, caps: &[MainCapability]) -> Self {
        self.caps.main.extend(caps.iter().copied());
        self
    }

    pub fn literals(mut self, caps: &[LiteralCapability]) -> Self {
        self.caps.literals.extend(caps.iter().copied());
        self
    }

    pub fn predicates(mut self, caps: &[PredicateCapability]) -> Self {
        self.caps.predicates.extend(caps.iter().copied());
        self
    }

    pub fn scalar_functions(mut self, caps: &[ScalarFunction]) -> Self {
        self.caps.scalar_functions.extend(caps.iter().copied());
        self
    }

    pub fn aggregates(mut self, caps: &[AggregateCapability]) -> Self {
        self.caps.aggregates.extend(caps.iter().copied());
        self
    }

    pub fn build(self) -> Capabilities {
        self.caps
    }
}
