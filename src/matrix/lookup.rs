//! Derived-field lookups.
//!
//! Every function here is a pure function of a single axis value. Only the
//! platform lookup can fail; compilers without a container image simply
//! have none.

use super::types::{BaseImage, MatrixError, PlatformKind};

/// Resolve a platform name against the closed platform set
pub fn platform_kind(name: &str) -> Result<PlatformKind, MatrixError> {
    PlatformKind::ALL
        .into_iter()
        .find(|kind| kind.as_str() == name)
        .ok_or_else(|| MatrixError::UnrecognizedPlatform {
            name: name.to_string(),
        })
}

/// CI runner image for a platform
pub fn runner_image(kind: PlatformKind) -> &'static str {
    match kind {
        PlatformKind::Windows => "windows-2022",
        PlatformKind::Linux => "ubuntu-20.04",
        PlatformKind::MacOs => "macos-11",
    }
}

/// `runs_on` for a platform name
pub fn runs_on(platform: &str) -> Result<&'static str, MatrixError> {
    platform_kind(platform).map(runner_image)
}

pub fn compiler_full(compiler: &str, version: &str) -> String {
    if version.is_empty() {
        compiler.to_string()
    } else {
        format!("{}-{}", compiler, version)
    }
}

/// QtDBus is not built on macOS
pub fn with_qtdbus(platform: &str) -> &'static str {
    if platform == PlatformKind::MacOs.as_str() {
        "OFF"
    } else {
        "ON"
    }
}

pub fn compiler_base_image(compiler: &str) -> BaseImage {
    let image = match compiler {
        "gcc" => Some("gcc"),
        "clang" => Some("silkeh/clang"),
        _ => None,
    };
    BaseImage(image.map(str::to_string))
}

pub fn join_packages(packages: &[String]) -> String {
    packages.join(" ")
}
