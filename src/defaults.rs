//! Default values and fixed names of the configuration dump layout.
//!
//! This module centralizes names used across the pipeline and the CLI so the
//! two cannot drift apart.

/// Entity cloned when `--source` is not given.
pub const DEFAULT_SOURCE: &str = "Предметы";

/// Entity created when `--target` is not given.
pub const DEFAULT_TARGET: &str = "УТО_Тест";

/// Lightweight registry file at the configuration root.
pub const CONFIGURATION_FILE: &str = "Configuration.xml";

/// Rich registry file at the configuration root.
pub const DUMP_INFO_FILE: &str = "ConfigDumpInfo.xml";

/// Lock file guarding a configuration tree against concurrent runs.
pub const LOCK_FILE: &str = ".catalog-clone.lock";

/// Suffix of files and directories staged before they replace their targets.
pub const STAGING_SUFFIX: &str = "catalog-clone-tmp";

/// Metadata object classes: definitions and `Configuration.xml`.
pub const MD_CLASSES_NS: &str = "http://v8.1c.ru/8.3/MDClasses";

/// Readable internal info (`xr:` prefix): generated types and their ids.
pub const READABLE_NS: &str = "http://v8.1c.ru/8.3/xcf/readable";

/// Core data types (`v8:` prefix): localized strings.
pub const CORE_NS: &str = "http://v8.1c.ru/8.1/data/core";

/// `ConfigDumpInfo.xml`.
pub const DUMP_INFO_NS: &str = "http://v8.1c.ru/8.3/xcf/dumpinfo";

/// Version lock of a record that has never been synchronized.
pub const UNSYNCHRONIZED_VERSION: &str = "0000000000000000000000000000000000000000";
