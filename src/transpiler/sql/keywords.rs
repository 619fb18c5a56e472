//! Reserved words of each dialect beyond the common SQL keywords. An identifier spelled like
//! one of these is always quoted.

pub const EXASOL: &[&str] = &[
    "ABSOLUTE", "ACTION", "ADD", "AFTER", "ALTER", "ARRAY", "AT", "BEGIN", "BOOLEAN", "BOTH",
    "CALL", "CASCADE", "CHAR", "CHARACTER", "CLOSE", "COMMIT", "CONNECT", "CONNECTION",
    "CONTINUE", "CURSOR", "DECIMAL", "DECLARE", "DO", "DOUBLE", "EACH", "ELSEIF", "ENUM", "EXIT",
    "EXPORT", "EXTERNAL", "EXTRACT", "FILE", "FLOAT", "FUNCTION", "GEOMETRY", "GLOBAL", "GOTO",
    "HASHTYPE", "IF", "IMPORT", "INT", "INTEGER", "ITERATE", "LEAVE", "LEVEL", "LOCAL",
    "LOCALTIMESTAMP", "LOOP", "MERGE", "NOCYCLE", "NOW", "NUMERIC", "OF", "PRIOR", "PROCEDURE",
    "PROFILE", "RANDOM", "REAL", "RECURSIVE", "RETURN", "RETURNS", "REVOKE", "ROLE", "ROLLBACK",
    "SCRIPT", "SMALLINT", "START", "SYSDATE", "SYSTIMESTAMP", "TRIGGER", "UNTIL", "VARCHAR",
    "WHILE", "WINDOW",
];

pub const POSTGRESQL: &[&str] = &[
    "ANALYSE", "ANALYZE", "ARRAY", "ASYMMETRIC", "BOTH", "COLLATE", "CONCURRENTLY",
    "CURRENT_CATALOG", "CURRENT_ROLE", "CURRENT_SCHEMA", "DEFERRABLE", "DO", "FREEZE", "ILIKE",
    "INITIALLY", "ISNULL", "LATERAL", "LEADING", "LOCALTIME", "LOCALTIMESTAMP", "NOTNULL",
    "OVERLAPS", "PLACING", "RETURNING", "SIMILAR", "SYMMETRIC", "TABLESAMPLE", "TRAILING",
    "VARIADIC", "VERBOSE", "WINDOW",
];

pub const ORACLE: &[&str] = &[
    "ACCESS", "ADD", "ALTER", "AUDIT", "CLUSTER", "COMMENT", "COMPRESS", "CONNECT", "CURRENT",
    "DECIMAL", "EXCLUSIVE", "FILE", "FLOAT", "IDENTIFIED", "IMMEDIATE", "INCREMENT", "INDEX",
    "INITIAL", "INTEGER", "LEVEL", "LOCK", "LONG", "MAXEXTENTS", "MINUS", "MLSLABEL", "MODE",
    "MODIFY", "NOAUDIT", "NOCOMPRESS", "NOWAIT", "NUMBER", "OF", "OFFLINE", "ONLINE", "OPTION",
    "PCTFREE", "PRIOR", "PUBLIC", "RAW", "RENAME", "RESOURCE", "REVOKE", "ROWID", "ROWLABEL",
    "SESSION", "SHARE", "SIZE", "SMALLINT", "START", "SUCCESSFUL", "SYNONYM", "SYSDATE",
    "TRIGGER", "UID", "VALIDATE", "VARCHAR", "VARCHAR2", "WHENEVER",
];

pub const SQLSERVER: &[&str] = &[
    "ADD", "ALTER", "BACKUP", "BEGIN", "BREAK", "BROWSE", "BULK", "CASCADE", "CHECKPOINT",
    "CLOSE", "CLUSTERED", "COALESCE", "COLLATE", "COMMIT", "COMPUTE", "CONTAINS",
    "CONTAINSTABLE", "CONTINUE", "CONVERT", "CURRENT", "CURSOR", "DATABASE", "DBCC",
    "DEALLOCATE", "DECLARE", "DENY", "DISK", "DISTRIBUTED", "DOUBLE", "DUMP", "ERRLVL", "EXEC",
    "EXECUTE", "EXIT", "EXTERNAL", "FILE", "FILLFACTOR", "FREETEXT", "FREETEXTTABLE",
    "FUNCTION", "GOTO", "HOLDLOCK", "IDENTITY", "IDENTITYCOL", "IDENTITY_INSERT", "IF", "INDEX",
    "KILL", "LINENO", "LOAD", "MERGE", "NATIONAL", "NOCHECK", "NONCLUSTERED", "NULLIF", "OF",
    "OFF", "OFFSETS", "OPEN", "OPENDATASOURCE", "OPENQUERY", "OPENROWSET", "OPENXML", "OPTION",
    "OVER", "PERCENT", "PIVOT", "PLAN", "PRECISION", "PRINT", "PROC", "PROCEDURE", "PUBLIC",
    "RAISERROR", "READ", "READTEXT", "RECONFIGURE", "REPLICATION", "RESTORE", "RESTRICT",
    "RETURN", "REVERT", "REVOKE", "ROLLBACK", "ROWCOUNT", "ROWGUIDCOL", "RULE", "SAVE",
    "SECURITYAUDIT", "SHUTDOWN", "STATISTICS", "SYSTEM_USER", "TABLESAMPLE", "TEXTSIZE", "TRAN",
    "TRANSACTION", "TRIGGER", "TRUNCATE", "TRY_CONVERT", "TSEQUAL", "UNPIVOT", "UPDATETEXT",
    "USE", "VARYING", "WAITFOR", "WHILE", "WITHIN", "WRITETEXT",
];

pub const MYSQL: &[&str] = &[
    "ACCESSIBLE", "ADD", "ALTER", "ANALYZE", "BEFORE", "BIGINT", "BINARY", "BLOB", "BOTH",
    "CALL", "CASCADE", "CHANGE", "CHAR", "CHARACTER", "COLLATE", "CONDITION", "CONTINUE",
    "CONVERT", "CURSOR", "DATABASE", "DATABASES", "DAY_HOUR", "DAY_MINUTE", "DAY_SECOND", "DEC",
    "DECIMAL", "DECLARE", "DELAYED", "DESCRIBE", "DIV", "DOUBLE", "DUAL", "EACH", "ELSEIF",
    "ENCLOSED", "ESCAPED", "EXIT", "EXPLAIN", "FLOAT", "FORCE", "FULLTEXT", "GROUPS",
    "HIGH_PRIORITY", "HOUR_MINUTE", "HOUR_SECOND", "IF", "IGNORE", "INDEX", "INFILE", "INT",
    "INTEGER", "ITERATE", "KEYS", "KILL", "LEADING", "LEAVE", "LINES", "LOAD", "LOCK", "LONG",
    "LOOP", "MATCH", "MOD", "MODIFIES", "NO_WRITE_TO_BINLOG", "OPTIMIZE", "OPTION", "OUTFILE",
    "PARTITION", "PRECISION", "PROCEDURE", "PURGE", "RANGE", "RANK", "READ", "REAL", "REGEXP",
    "RELEASE", "RENAME", "REPEAT", "REPLACE", "REQUIRE", "RESTRICT", "RETURN", "REVOKE",
    "RLIKE", "ROW_NUMBER", "SCHEMAS", "SEPARATOR", "SHOW", "SMALLINT", "SPATIAL", "SQL",
    "STARTING", "STRAIGHT_JOIN", "TERMINATED", "TINYINT", "TRAILING", "TRIGGER", "UNDO",
    "UNLOCK", "UNSIGNED", "USAGE", "USE", "UTC_DATE", "VARCHAR", "WHILE", "WINDOW", "WRITE",
    "XOR", "YEAR_MONTH", "ZEROFILL",
];

pub const BIGQUERY: &[&str] = &[
    "ARRAY", "ASSERT_ROWS_MODIFIED", "AT", "COLLATE", "CONTAINS", "CUBE", "CURRENT", "DEFINE",
    "ENUM", "EXCLUDE", "EXTRACT", "FOLLOWING", "GROUPING", "GROUPS", "HASH", "IF", "IGNORE",
    "LATERAL", "LOOKUP", "MERGE", "NEW", "NO", "NULLS", "OF", "OVER", "PARTITION", "PRECEDING",
    "PROTO", "QUALIFY", "RANGE", "RECURSIVE", "RESPECT", "ROLLUP", "STRUCT", "TABLESAMPLE",
    "TREAT", "UNBOUNDED", "WINDOW", "WITHIN",
];

pub const DB2: &[&str] = &[
    "ADD", "AFTER", "ALIAS", "ALLOCATE", "ALLOW", "ALTER", "ASENSITIVE", "ASSOCIATE", "AUDIT",
    "BEFORE", "BEGIN", "CALL", "CALLED", "CAPTURE", "CARDINALITY", "CASCADED", "CCSID",
    "CLOSE", "CLUSTER", "COLLECTION", "COMMENT", "COMMIT", "CONCAT", "CONDITION", "CONNECT",
    "CONNECTION", "CONTAINS", "CONTINUE", "CURRENT", "CURSOR", "CYCLE", "DATABASE", "DAY",
    "DAYS", "DEALLOCATE", "DECLARE", "DESCRIBE", "DESCRIPTOR", "DETERMINISTIC", "DISCONNECT",
    "DO", "DOUBLE", "DYNAMIC", "EACH", "ELSEIF", "ENCODING", "ENCRYPTION", "ENDING", "EXCLUSIVE",
    "EXECUTE", "EXIT", "EXPLAIN", "EXTERNAL", "FENCED", "FILE", "FINAL", "FREE", "FUNCTION",
    "GENERATED", "GET", "GLOBAL", "GO", "GOTO", "GRAPHIC", "HANDLER", "HOLD", "HOUR", "HOURS",
    "IDENTITY", "IF", "IMMEDIATE", "INCLUDING", "INCREMENT", "INDEX", "INDICATOR", "INOUT",
    "INSENSITIVE", "ISOLATION", "ITERATE", "LABEL", "LANGUAGE", "LATERAL", "LEAVE", "LOCALE",
    "LOCATOR", "LOCK", "LOCKSIZE", "LONG", "LOOP", "MAXVALUE", "MICROSECOND", "MICROSECONDS",
    "MINUTE", "MINUTES", "MINVALUE", "MODE", "MODIFIES", "MONTH", "MONTHS", "NEW", "NOCACHE",
    "NOCYCLE", "NOMAXVALUE", "NOMINVALUE", "NONE", "NOORDER", "NULLS", "OLD", "OPEN",
    "OPTIMIZATION", "OPTIMIZE", "OPTION", "OUT", "OVER", "OVERRIDING", "PACKAGE", "PARAMETER",
    "PART", "PARTITION", "PARTITIONED", "PASSWORD", "PATH", "PLAN", "POSITION", "PRECISION",
    "PREPARE", "PRIVILEGES", "PROCEDURE", "PROGRAM", "PUBLIC", "QUERY", "RANGE", "RANK", "READ",
    "READS", "RECOVERY", "REFERENCING", "REFRESH", "RELEASE", "RENAME", "REPEAT", "RESET",
    "RESIGNAL", "RESTART", "RESTRICT", "RESULT", "RETURN", "RETURNS", "REVOKE", "ROLE",
    "ROLLBACK", "ROUTINE", "ROW_NUMBER", "ROWSET", "RRN", "RUN", "SAVEPOINT", "SCRATCHPAD",
    "SCROLL", "SEARCH", "SECOND", "SECONDS", "SECURITY", "SENSITIVE", "SEQUENCE", "SESSION",
    "SIGNAL", "SIMPLE", "SOURCE", "SPECIFIC", "SQL", "SQLID", "STANDARD", "START", "STARTING",
    "STATEMENT", "STATIC", "STOGROUP", "STORES", "SUBSTRING", "SUMMARY", "SYNONYM", "SYSFUN",
    "SYSIBM", "SYSPROC", "SYSTEM", "SYSTEM_USER", "TABLESPACE", "TRANSACTION", "TRIGGER",
    "TRIM", "TRUNCATE", "TYPE", "UNDO", "UNTIL", "USAGE", "VALUE", "VARIABLE", "VARIANT",
    "VCAT", "VERSION", "VOLATILE", "WHILE", "WLM", "WRITE", "YEAR", "YEARS",
];
