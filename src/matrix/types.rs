use serde::{Deserialize, Serialize};

/// A supported Qt release and the installer packages it needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QtRelease {
    /// Release version (e.g., "6.2.0")
    pub version: String,

    /// Installer archives, in install order
    #[serde(default)]
    pub archives: Vec<String>,

    /// Optional add-on modules
    #[serde(default)]
    pub modules: Vec<String>,
}

impl QtRelease {
    pub fn new(version: &str, archives: &[&str], modules: &[&str]) -> Self {
        Self {
            version: version.to_string(),
            archives: archives.iter().map(|s| s.to_string()).collect(),
            modules: modules.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A CI platform with the compilers built on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    /// Platform name (windows, macos or linux)
    pub name: String,

    #[serde(default)]
    pub compilers: Vec<Compiler>,
}

impl Platform {
    pub fn new(name: &str, compilers: Vec<Compiler>) -> Self {
        Self {
            name: name.to_string(),
            compilers,
        }
    }
}

/// A compiler and the versions of it to build with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compiler {
    /// Compiler identifier (e.g., "gcc", "clang", "msvc")
    pub name: String,

    /// Versions to build with. `None` or empty means a single unversioned build.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versions: Option<Vec<String>>,
}

impl Compiler {
    /// A compiler with exactly one unversioned variant
    pub fn unversioned(name: &str) -> Self {
        Self {
            name: name.to_string(),
            versions: None,
        }
    }

    pub fn versioned(name: &str, versions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            versions: Some(versions.iter().map(|s| s.to_string()).collect()),
        }
    }

    /// Versions to expand, with the empty string standing for "unversioned"
    pub fn expanded_versions(&self) -> Vec<&str> {
        match &self.versions {
            Some(versions) if !versions.is_empty() => {
                versions.iter().map(String::as_str).collect()
            }
            _ => vec![""],
        }
    }
}

/// The closed set of platforms a runner image exists for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformKind {
    Windows,
    MacOs,
    Linux,
}

impl PlatformKind {
    pub const ALL: [PlatformKind; 3] = [
        PlatformKind::Windows,
        PlatformKind::MacOs,
        PlatformKind::Linux,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformKind::Windows => "windows",
            PlatformKind::MacOs => "macos",
            PlatformKind::Linux => "linux",
        }
    }
}

impl std::fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived field set a [`Configuration`] carries.
///
/// Each schema is a strict superset of the one before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Schema {
    /// Qt version, platform and compiler fields only
    Basic,
    /// Adds the space-joined `qt_modules` and `qt_archives`
    #[default]
    Archives,
    /// Adds `compiler_base_image` for container jobs
    Container,
}

impl Schema {
    pub fn carries_qt_packages(&self) -> bool {
        matches!(self, Schema::Archives | Schema::Container)
    }

    pub fn carries_base_image(&self) -> bool {
        matches!(self, Schema::Container)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Schema::Basic => "basic",
            Schema::Archives => "archives",
            Schema::Container => "container",
        }
    }
}

/// Container image a compiler job runs in, or `null` when there is none
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseImage(pub Option<String>);

impl BaseImage {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// One fully resolved point of the build matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
    pub qt_version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub qt_modules: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub qt_archives: Option<String>,

    pub platform: String,
    pub compiler: String,

    /// Empty for unversioned compilers
    pub compiler_version: String,

    /// `compiler` or `compiler-version`
    pub compiler_full: String,

    /// CI runner image for the platform
    pub runs_on: String,

    /// "ON" or "OFF"
    pub with_qtdbus: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub compiler_base_image: Option<BaseImage>,
}

/// The complete matrix, in the shape CI `strategy.matrix` expects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Matrix {
    pub include: Vec<Configuration>,
}

impl Matrix {
    pub fn len(&self) -> usize {
        self.include.len()
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty()
    }
}

/// Error type for matrix expansion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// A platform name with no known runner image
    UnrecognizedPlatform { name: String },
}

impl std::fmt::Display for MatrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatrixError::UnrecognizedPlatform { name } => write!(
                f,
                "Invalid platform '{}' (expected one of: windows, macos, linux)",
                name
            ),
        }
    }
}

impl std::error::Error for MatrixError {}
