//! Closed vocabularies of the system-characteristics schema.
//!
//! Subtypes, their families, collection statuses, message levels and entry
//! datatypes. The `SubtypeTable` derives the XML identity of every item
//! subtype once, up front, so parsing and serialization only ever do lookups.

use hashbrown::HashMap as FastMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Base namespace of the system-characteristics schema.
pub const SYSCHAR_NAMESPACE: &str = "http://oval.mitre.org/XMLSchema/oval-system-characteristics-5";

/// Prefix used when the base namespace has to be declared on an element.
pub const SYSCHAR_PREFIX: &str = "oval-sc";

/// Suffix shared by every item element name.
pub const ITEM_SUFFIX: &str = "_item";

text_enum! {
    /// Grouping of related subtypes; selects the item's namespace.
    pub enum Family {
        Unknown => "unknown",
        Aix => "aix",
        Apache => "apache",
        Catos => "catos",
        Esx => "esx",
        Freebsd => "freebsd",
        Hpux => "hpux",
        Independent => "independent",
        Ios => "ios",
        Linux => "linux",
        Macos => "macos",
        Pixos => "pixos",
        Solaris => "solaris",
        Unix => "unix",
        Windows => "windows",
    }
}

impl Family {
    pub fn from_text(text: &str) -> Option<Self> {
        Self::from_token(text)
    }

    /// `SYSCHAR_NAMESPACE#family`
    pub fn namespace(self) -> String {
        format!("{}#{}", SYSCHAR_NAMESPACE, self.text())
    }
}

oval_subtypes! {
    AixFileset => (Aix, "fileset"),
    AixFix => (Aix, "fix"),
    AixOslevel => (Aix, "oslevel"),
    ApacheHttpd => (Apache, "httpd"),
    CatosLine => (Catos, "line"),
    CatosModule => (Catos, "module"),
    CatosVersion => (Catos, "version"),
    EsxPatch => (Esx, "patch"),
    EsxVersion => (Esx, "version"),
    FreebsdPortinfo => (Freebsd, "portinfo"),
    HpuxGetconf => (Hpux, "getconf"),
    HpuxPatch => (Hpux, "patch"),
    HpuxSoftwarelist => (Hpux, "softwarelist"),
    HpuxTrusted => (Hpux, "trusted"),
    IndependentFamily => (Independent, "family"),
    IndependentFilehash => (Independent, "filehash"),
    IndependentFilehash58 => (Independent, "filehash58"),
    IndependentEnvironmentVariable => (Independent, "environmentvariable"),
    IndependentEnvironmentVariable58 => (Independent, "environmentvariable58"),
    IndependentLdap => (Independent, "ldap"),
    IndependentSql => (Independent, "sql"),
    IndependentSql57 => (Independent, "sql57"),
    IndependentTextFileContent54 => (Independent, "textfilecontent54"),
    IndependentTextFileContent => (Independent, "textfilecontent"),
    IndependentVariable => (Independent, "variable"),
    IndependentXmlFileContent => (Independent, "xmlfilecontent"),
    IosGlobal => (Ios, "global"),
    IosInterface => (Ios, "interface"),
    IosLine => (Ios, "line"),
    IosSnmp => (Ios, "snmp"),
    IosTclsh => (Ios, "tclsh"),
    IosVersion => (Ios, "version"),
    LinuxDpkgInfo => (Linux, "dpkginfo"),
    LinuxIfListeners => (Linux, "iflisteners"),
    LinuxInetListeningServers => (Linux, "inetlisteningservers"),
    LinuxPartition => (Linux, "partition"),
    LinuxRpmInfo => (Linux, "rpminfo"),
    LinuxRpmVerify => (Linux, "rpmverify"),
    LinuxRpmVerifyFile => (Linux, "rpmverifyfile"),
    LinuxRpmVerifyPackage => (Linux, "rpmverifypackage"),
    LinuxSelinuxBoolean => (Linux, "selinuxboolean"),
    LinuxSelinuxSecurityContext => (Linux, "selinuxsecuritycontext"),
    LinuxSlackwarePkgInfo => (Linux, "slackwarepkginfo"),
    LinuxSystemdUnitProperty => (Linux, "systemdunitproperty"),
    MacosAccountInfo => (Macos, "accountinfo"),
    MacosInetListeningServers => (Macos, "inetlisteningservers"),
    MacosNvram => (Macos, "nvram"),
    MacosPlist => (Macos, "plist"),
    MacosPwpolicy => (Macos, "pwpolicy"),
    PixosLine => (Pixos, "line"),
    PixosVersion => (Pixos, "version"),
    SolarisIsainfo => (Solaris, "isainfo"),
    SolarisNdd => (Solaris, "ndd"),
    SolarisPackage => (Solaris, "package"),
    SolarisPackageCheck => (Solaris, "packagecheck"),
    SolarisPatch => (Solaris, "patch"),
    SolarisSmf => (Solaris, "smf"),
    UnixFile => (Unix, "file"),
    UnixFileExtendedAttribute => (Unix, "fileextendedattribute"),
    UnixGconf => (Unix, "gconf"),
    UnixInetd => (Unix, "inetd"),
    UnixInterface => (Unix, "interface"),
    UnixPassword => (Unix, "password"),
    UnixProcess => (Unix, "process"),
    UnixProcess58 => (Unix, "process58"),
    UnixRunlevel => (Unix, "runlevel"),
    UnixSccs => (Unix, "sccs"),
    UnixShadow => (Unix, "shadow"),
    UnixSymlink => (Unix, "symlink"),
    UnixSysctl => (Unix, "sysctl"),
    UnixUname => (Unix, "uname"),
    UnixXinetd => (Unix, "xinetd"),
    WindowsAccessToken => (Windows, "accesstoken"),
    WindowsActiveDirectory => (Windows, "activedirectory"),
    WindowsAuditEventPolicy => (Windows, "auditeventpolicy"),
    WindowsAuditEventPolicySubcategories => (Windows, "auditeventpolicysubcategories"),
    WindowsCmdlet => (Windows, "cmdlet"),
    WindowsDnsCache => (Windows, "dnscache"),
    WindowsFile => (Windows, "file"),
    WindowsFileAuditedPermissions => (Windows, "fileauditedpermissions"),
    WindowsFileEffectiveRights => (Windows, "fileeffectiverights"),
    WindowsGroup => (Windows, "group"),
    WindowsGroupSid => (Windows, "group_sid"),
    WindowsInterface => (Windows, "interface"),
    WindowsLockoutPolicy => (Windows, "lockoutpolicy"),
    WindowsMetabase => (Windows, "metabase"),
    WindowsPasswordPolicy => (Windows, "passwordpolicy"),
    WindowsPort => (Windows, "port"),
    WindowsPrinterEffectiveRights => (Windows, "printereffectiverights"),
    WindowsProcess => (Windows, "process"),
    WindowsRegistry => (Windows, "registry"),
    WindowsRegkeyAuditedPermissions => (Windows, "regkeyauditedpermissions"),
    WindowsRegkeyEffectiveRights => (Windows, "regkeyeffectiverights"),
    WindowsService => (Windows, "service"),
    WindowsSharedResource => (Windows, "sharedresource"),
    WindowsSid => (Windows, "sid"),
    WindowsSidSid => (Windows, "sid_sid"),
    WindowsUser => (Windows, "user"),
    WindowsUserSid => (Windows, "user_sid"),
    WindowsVolume => (Windows, "volume"),
    WindowsWmi => (Windows, "wmi"),
    WindowsWuaUpdateSearcher => (Windows, "wuaupdatesearcher"),
}

impl Subtype {
    /// Resolves an element's `(namespace, local name)` to a subtype.
    /// Anything not in the table is `Unknown`.
    pub fn from_tag(namespace: &str, local_name: &str) -> Subtype {
        SubtypeTable::global().subtype_from_tag(namespace, local_name)
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subtype::Unknown => f.write_str("unknown"),
            _ => write!(f, "{}:{}", self.family().text(), self.text()),
        }
    }
}

impl Serialize for Subtype {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// XML identity of an item subtype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemTag {
    pub family: Family,
    pub namespace: String,
    pub local_name: String,
}

/// Precomputed `Subtype <-> (namespace, local name)` mapping.
#[derive(Debug)]
pub struct SubtypeTable {
    tags: FastMap<Subtype, ItemTag, ahash::RandomState>,
    // namespace -> local name -> subtype
    by_tag: FastMap<String, NameIndex, ahash::RandomState>,
}

type NameIndex = FastMap<String, Subtype, ahash::RandomState>;

static SUBTYPE_TABLE: LazyLock<SubtypeTable> = LazyLock::new(SubtypeTable::build);

impl SubtypeTable {
    pub fn global() -> &'static SubtypeTable {
        &SUBTYPE_TABLE
    }

    fn build() -> SubtypeTable {
        let mut tags =
            FastMap::with_capacity_and_hasher(Subtype::ALL.len(), ahash::RandomState::new());
        let mut by_tag: FastMap<String, NameIndex, ahash::RandomState> =
            FastMap::with_hasher(ahash::RandomState::new());

        for &subtype in Subtype::ALL {
            let family = subtype.family();
            assert_ne!(family, Family::Unknown, "{:?} has no family", subtype);

            let tag = ItemTag {
                family,
                namespace: family.namespace(),
                local_name: format!("{}{}", subtype.text(), ITEM_SUFFIX),
            };

            let previous = by_tag
                .entry(tag.namespace.clone())
                .or_insert_with(|| FastMap::with_hasher(ahash::RandomState::new()))
                .insert(tag.local_name.clone(), subtype);
            assert!(
                previous.is_none(),
                "{:?} and {:?} both map to <{}>",
                previous,
                subtype,
                tag.local_name
            );

            tags.insert(subtype, tag);
        }

        SubtypeTable { tags, by_tag }
    }

    /// `None` only for `Subtype::Unknown`.
    pub fn item_tag(&self, subtype: Subtype) -> Option<&ItemTag> {
        self.tags.get(&subtype)
    }

    pub fn subtype_from_tag(&self, namespace: &str, local_name: &str) -> Subtype {
        self.by_tag
            .get(namespace)
            .and_then(|names| names.get(local_name))
            .copied()
            .unwrap_or(Subtype::Unknown)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

text_enum! {
    /// Collection outcome of an item (and of an individual entry).
    #[derive(Default)]
    pub enum SysCharStatus {
        Exists => "exists",
        DoesNotExist => "does-not-exist",
        Error => "error",
        NotCollected => "not-collected",
        NotApplicable => "not-applicable",
        #[default]
        Unknown => "unknown",
    }
}

impl SysCharStatus {
    /// Also accepts the schema spellings `does not exist` and `not collected`.
    pub fn from_text(text: &str) -> Option<Self> {
        match text {
            "does not exist" => Some(SysCharStatus::DoesNotExist),
            "not collected" => Some(SysCharStatus::NotCollected),
            "not applicable" => Some(SysCharStatus::NotApplicable),
            other => Self::from_token(other),
        }
    }
}

text_enum! {
    /// Severity of the diagnostic message attached to an item.
    #[derive(Default)]
    pub enum MessageLevel {
        #[default]
        None => "none",
        Info => "info",
        Warning => "warning",
        Error => "error",
        Fatal => "fatal",
    }
}

impl MessageLevel {
    /// `debug` has no level of its own and reads as `info`.
    pub fn from_text(text: &str) -> Option<Self> {
        match text {
            "debug" => Some(MessageLevel::Info),
            other => Self::from_token(other),
        }
    }
}

text_enum! {
    /// Datatype of a collected entry value.
    #[derive(Default)]
    pub enum Datatype {
        #[default]
        String => "string",
        Int => "int",
        Float => "float",
        Boolean => "boolean",
        Binary => "binary",
        EvrString => "evr_string",
        Version => "version",
        Ipv4Address => "ipv4_address",
        Ipv6Address => "ipv6_address",
        FilesetRevision => "fileset_revision",
        IosVersion => "ios_version",
        DebianEvrString => "debian_evr_string",
        Record => "record",
        Unknown => "unknown",
    }
}

impl Datatype {
    /// Unrecognized tokens map to `Unknown`, which makes the entry invalid.
    pub fn from_text(text: &str) -> Self {
        Self::from_token(text).unwrap_or(Datatype::Unknown)
    }
}
