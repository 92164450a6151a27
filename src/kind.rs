//! Metadata kinds and how they are named across the configuration files.
//!
//! A kind appears in three places:
//! - as the element name of a record in `Configuration.xml`
//!   (`<Catalog>Items</Catalog>`) and of the entity in its definition file;
//! - as the first segment of a compound name in `ConfigDumpInfo.xml`
//!   (`Catalog.Items`);
//! - as the qualifier in front of an entity name in type and field references
//!   (`CatalogRef.Items`, `cfg:CatalogObject.Items`, `Справочники.Items`).

/// The order in which kinds are grouped under `ChildObjects` of
/// `Configuration.xml`.
pub const CONFIGURATION_KIND_ORDER: &[&str] = &[
    "Language",
    "Subsystem",
    "StyleItem",
    "Style",
    "CommonPicture",
    "SessionParameter",
    "Role",
    "CommonTemplate",
    "FilterCriterion",
    "CommonModule",
    "CommonAttribute",
    "ExchangePlan",
    "XDTOPackage",
    "WebService",
    "HTTPService",
    "WSReference",
    "EventSubscription",
    "ScheduledJob",
    "SettingsStorage",
    "FunctionalOption",
    "FunctionalOptionsParameter",
    "DefinedType",
    "CommonCommand",
    "CommandGroup",
    "Constant",
    "CommonForm",
    "Catalog",
    "Document",
    "DocumentNumerator",
    "Sequence",
    "DocumentJournal",
    "Enum",
    "Report",
    "DataProcessor",
    "InformationRegister",
    "AccumulationRegister",
    "ChartOfCharacteristicTypes",
    "ChartOfAccounts",
    "AccountingRegister",
    "ChartOfCalculationTypes",
    "CalculationRegister",
    "BusinessProcess",
    "Task",
    "IntegrationService",
];

/// A kind of metadata entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataKind {
    element: &'static str,
    directory: &'static str,
    qualifiers: &'static [&'static str],
}

/// Catalogs, the only kind this tool clones.
pub const CATALOG: MetadataKind = MetadataKind {
    element: "Catalog",
    directory: "Catalogs",
    qualifiers: &["Catalog", "Справочник"],
};

impl MetadataKind {
    /// Element local name used for this kind.
    pub fn element(&self) -> &'static str {
        self.element
    }

    /// Directory of the configuration dump holding this kind's definitions.
    pub fn directory(&self) -> &'static str {
        self.directory
    }

    /// Prefixes of the qualifier segment that precedes an entity name in a
    /// compound reference. `Catalog` covers `CatalogRef`, `CatalogObject`,
    /// `Catalogs` and so on.
    pub fn qualifiers(&self) -> &'static [&'static str] {
        self.qualifiers
    }

    /// `Catalog.<name>`
    pub fn compound_name(&self, name: &str) -> String {
        format!("{}.{}", self.element, name)
    }

    /// `Catalog.`
    pub fn compound_prefix(&self) -> String {
        format!("{}.", self.element)
    }

    /// Kinds that are grouped after this one in `Configuration.xml`.
    ///
    /// Empty when the kind is not part of the known ordering.
    pub fn following_kinds(&self) -> &'static [&'static str] {
        CONFIGURATION_KIND_ORDER
            .iter()
            .position(|k| *k == self.element)
            .map(|idx| &CONFIGURATION_KIND_ORDER[idx + 1..])
            .unwrap_or(&[])
    }
}
