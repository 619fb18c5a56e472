//! Scalar and aggregate function catalog.

named_enum! {
    /// Scalar functions the host can push down. Arithmetic operators are modelled as functions too.
    pub enum ScalarFunction {
        // Numeric
        Abs => "ABS",
        Acos => "ACOS",
        Asin => "ASIN",
        Atan => "ATAN",
        Atan2 => "ATAN2",
        Ceil => "CEIL",
        Cos => "COS",
        Cosh => "COSH",
        Cot => "COT",
        Degrees => "DEGREES",
        Div => "DIV",
        Exp => "EXP",
        Floor => "FLOOR",
        Ln => "LN",
        Log => "LOG",
        Mod => "MOD",
        Power => "POWER",
        Radians => "RADIANS",
        Rand => "RAND",
        Round => "ROUND",
        Sign => "SIGN",
        Sin => "SIN",
        Sinh => "SINH",
        Sqrt => "SQRT",
        Tan => "TAN",
        Tanh => "TANH",
        Trunc => "TRUNC",
        // String
        Ascii => "ASCII",
        BitLength => "BIT_LENGTH",
        CharacterLength => "CHARACTER_LENGTH",
        Chr => "CHR",
        ColognePhonetic => "COLOGNE_PHONETIC",
        Concat => "CONCAT",
        Dump => "DUMP",
        EditDistance => "EDIT_DISTANCE",
        Insert => "INSERT",
        Instr => "INSTR",
        Length => "LENGTH",
        Locate => "LOCATE",
        Lower => "LOWER",
        Lpad => "LPAD",
        Ltrim => "LTRIM",
        OctetLength => "OCTET_LENGTH",
        RegexpInstr => "REGEXP_INSTR",
        RegexpReplace => "REGEXP_REPLACE",
        RegexpSubstr => "REGEXP_SUBSTR",
        Repeat => "REPEAT",
        Replace => "REPLACE",
        Reverse => "REVERSE",
        Right => "RIGHT",
        Rpad => "RPAD",
        Rtrim => "RTRIM",
        Soundex => "SOUNDEX",
        Space => "SPACE",
        Substr => "SUBSTR",
        Translate => "TRANSLATE",
        Trim => "TRIM",
        Unicode => "UNICODE",
        Unicodechr => "UNICODECHR",
        Upper => "UPPER",
        // Date and time
        AddDays => "ADD_DAYS",
        AddHours => "ADD_HOURS",
        AddMinutes => "ADD_MINUTES",
        AddMonths => "ADD_MONTHS",
        AddSeconds => "ADD_SECONDS",
        AddWeeks => "ADD_WEEKS",
        AddYears => "ADD_YEARS",
        ConvertTz => "CONVERT_TZ",
        CurrentDate => "CURRENT_DATE",
        CurrentTimestamp => "CURRENT_TIMESTAMP",
        DateTrunc => "DATE_TRUNC",
        Day => "DAY",
        DaysBetween => "DAYS_BETWEEN",
        Dbtimezone => "DBTIMEZONE",
        FromPosixTime => "FROM_POSIX_TIME",
        Hour => "HOUR",
        HoursBetween => "HOURS_BETWEEN",
        Localtimestamp => "LOCALTIMESTAMP",
        Minute => "MINUTE",
        MinutesBetween => "MINUTES_BETWEEN",
        Month => "MONTH",
        MonthsBetween => "MONTHS_BETWEEN",
        Numtodsinterval => "NUMTODSINTERVAL",
        Numtoyminterval => "NUMTOYMINTERVAL",
        PosixTime => "POSIX_TIME",
        Second => "SECOND",
        SecondsBetween => "SECONDS_BETWEEN",
        Sessiontimezone => "SESSIONTIMEZONE",
        Sysdate => "SYSDATE",
        Systimestamp => "SYSTIMESTAMP",
        Week => "WEEK",
        Year => "YEAR",
        YearsBetween => "YEARS_BETWEEN",
        // Geospatial
        StArea => "ST_AREA",
        StDistance => "ST_DISTANCE",
        StIntersects => "ST_INTERSECTS",
        StTouches => "ST_TOUCHES",
        StUnion => "ST_UNION",
        StWithin => "ST_WITHIN",
        StX => "ST_X",
        StY => "ST_Y",
        // Bitwise
        BitAnd => "BIT_AND",
        BitCheck => "BIT_CHECK",
        BitNot => "BIT_NOT",
        BitOr => "BIT_OR",
        BitSet => "BIT_SET",
        BitToNum => "BIT_TO_NUM",
        BitXor => "BIT_XOR",
        // Conversion
        IsDate => "IS_DATE",
        IsNumber => "IS_NUMBER",
        ToChar => "TO_CHAR",
        ToDate => "TO_DATE",
        ToNumber => "TO_NUMBER",
        ToTimestamp => "TO_TIMESTAMP",
        // Other
        CurrentSchema => "CURRENT_SCHEMA",
        CurrentSession => "CURRENT_SESSION",
        CurrentStatement => "CURRENT_STATEMENT",
        CurrentUser => "CURRENT_USER",
        HashMd5 => "HASH_MD5",
        HashSha => "HASH_SHA",
        HashSha1 => "HASH_SHA1",
        HashTiger => "HASH_TIGER",
        Nullifzero => "NULLIFZERO",
        SysGuid => "SYS_GUID",
        Zeroifnull => "ZEROIFNULL",
        // Operators
        Add => "ADD",
        Sub => "SUB",
        Mult => "MULT",
        FloatDiv => "FLOAT_DIV",
        Neg => "NEG",
        // Structural functions that have their own node kinds
        Case => "CASE",
        Cast => "CAST",
        Extract => "EXTRACT",
    }
}

impl ScalarFunction {
    /// Infix spelling for the binary arithmetic operators.
    pub fn infix_operator(&self) -> Option<&'static str> {
        match self {
            ScalarFunction::Add => Some("+"),
            ScalarFunction::Sub => Some("-"),
            ScalarFunction::Mult => Some("*"),
            ScalarFunction::FloatDiv => Some("/"),
            _ => None,
        }
    }

    /// Unit keyword of the `ADD_*` date arithmetic family.
    pub fn add_unit(&self) -> Option<&'static str> {
        match self {
            ScalarFunction::AddDays | ScalarFunction::AddWeeks => Some("DAY"),
            ScalarFunction::AddHours => Some("HOUR"),
            ScalarFunction::AddMinutes => Some("MINUTE"),
            ScalarFunction::AddMonths => Some("MONTH"),
            ScalarFunction::AddSeconds => Some("SECOND"),
            ScalarFunction::AddYears => Some("YEAR"),
            _ => None,
        }
    }

    /// Unit keyword of the `*_BETWEEN` date difference family.
    pub fn between_unit(&self) -> Option<&'static str> {
        match self {
            ScalarFunction::DaysBetween => Some("DAY"),
            ScalarFunction::HoursBetween => Some("HOUR"),
            ScalarFunction::MinutesBetween => Some("MINUTE"),
            ScalarFunction::MonthsBetween => Some("MONTH"),
            ScalarFunction::SecondsBetween => Some("SECOND"),
            ScalarFunction::YearsBetween => Some("YEAR"),
            _ => None,
        }
    }
}

named_enum! {
    /// Aggregate functions.
    pub enum AggregateFunction {
        Count => "COUNT",
        Sum => "SUM",
        Min => "MIN",
        Max => "MAX",
        Avg => "AVG",
        Median => "MEDIAN",
        FirstValue => "FIRST_VALUE",
        LastValue => "LAST_VALUE",
        Stddev => "STDDEV",
        StddevPop => "STDDEV_POP",
        StddevSamp => "STDDEV_SAMP",
        Variance => "VARIANCE",
        VarPop => "VAR_POP",
        VarSamp => "VAR_SAMP",
        GroupConcat => "GROUP_CONCAT",
        ApproximateCountDistinct => "APPROXIMATE_COUNT_DISTINCT",
        GeoIntersectionAggregate => "ST_INTERSECTION",
        GeoUnionAggregate => "ST_UNION",
        Mul => "MUL",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for function in ScalarFunction::ALL {
            assert_eq!(ScalarFunction::from_name(function.name()), Some(*function));
        }
        for function in AggregateFunction::ALL {
            assert_eq!(AggregateFunction::from_name(function.name()), Some(*function));
        }
    }

    #[test]
    fn test_serde_uses_sql_name() {
        let json = serde_json::to_string(&ScalarFunction::AddDays).unwrap();
        assert_eq!(json, "\"ADD_DAYS\"");
        let back: ScalarFunction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ScalarFunction::AddDays);
        assert!(serde_json::from_str::<ScalarFunction>("\"NOPE\"").is_err());
    }

    #[test]
    fn test_units() {
        assert_eq!(ScalarFunction::AddWeeks.add_unit(), Some("DAY"));
        assert_eq!(ScalarFunction::YearsBetween.between_unit(), Some("YEAR"));
        assert_eq!(ScalarFunction::Mult.infix_operator(), Some("*"));
        assert_eq!(ScalarFunction::Abs.infix_operator(), None);
    }
}
