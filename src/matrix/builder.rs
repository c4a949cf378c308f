use super::lookup;
use super::types::{Compiler, Configuration, Matrix, MatrixError, Platform, QtRelease, Schema};

/// Expands axis tables into a [`Matrix`]
#[derive(Debug, Clone)]
pub struct MatrixBuilder<'a> {
    qt: &'a [QtRelease],
    platforms: &'a [Platform],
    schema: Schema,
    filter: Option<&'a str>,
}

impl<'a> MatrixBuilder<'a> {
    pub fn new(qt: &'a [QtRelease], platforms: &'a [Platform]) -> Self {
        Self {
            qt,
            platforms,
            schema: Schema::default(),
            filter: None,
        }
    }

    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    /// Restrict the matrix to platforms with exactly this name
    pub fn filter(mut self, platform: Option<&'a str>) -> Self {
        self.filter = platform;
        self
    }

    /// Platforms taking part after the filter, in declaration order
    fn selected_platforms(&self) -> Vec<&'a Platform> {
        self.platforms
            .iter()
            .filter(|p| self.filter.is_none_or(|name| p.name == name))
            .collect()
    }

    pub fn build(&self) -> Result<Matrix, MatrixError> {
        // Resolve every runner image up front so a bad platform yields no output at all.
        let platforms = self
            .selected_platforms()
            .into_iter()
            .map(|p| lookup::runs_on(&p.name).map(|runs_on| (p, runs_on)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut include = Vec::new();
        for qt in self.qt {
            for &(platform, runs_on) in &platforms {
                for compiler in &platform.compilers {
                    for version in compiler.expanded_versions() {
                        include.push(self.configuration(qt, platform, compiler, version, runs_on));
                    }
                }
            }
        }

        Ok(Matrix { include })
    }

    fn configuration(
        &self,
        qt: &QtRelease,
        platform: &Platform,
        compiler: &Compiler,
        version: &str,
        runs_on: &str,
    ) -> Configuration {
        let packages = self.schema.carries_qt_packages();

        Configuration {
            qt_version: qt.version.clone(),
            qt_modules: packages.then(|| lookup::join_packages(&qt.modules)),
            qt_archives: packages.then(|| lookup::join_packages(&qt.archives)),
            platform: platform.name.clone(),
            compiler: compiler.name.clone(),
            compiler_version: version.to_string(),
            compiler_full: lookup::compiler_full(&compiler.name, version),
            runs_on: runs_on.to_string(),
            with_qtdbus: lookup::with_qtdbus(&platform.name).to_string(),
            compiler_base_image: self
                .schema
                .carries_base_image()
                .then(|| lookup::compiler_base_image(&compiler.name)),
        }
    }
}

/// Expand with the default schema
pub fn build(
    qt: &[QtRelease],
    platforms: &[Platform],
    platform_filter: Option<&str>,
) -> Result<Matrix, MatrixError> {
    MatrixBuilder::new(qt, platforms)
        .filter(platform_filter)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::BaseImage;
    use serde_json::json;

    fn qt_tables() -> Vec<QtRelease> {
        vec![
            QtRelease::new("5.15.2", &["qtbase", "icu", "qtwebsockets"], &[]),
            QtRelease::new("6.2.0", &["qtbase", "icu"], &["qtwebsockets"]),
        ]
    }

    fn platform_tables() -> Vec<Platform> {
        vec![
            Platform::new("windows", vec![Compiler::unversioned("msvc")]),
            Platform::new("macos", vec![Compiler::unversioned("apple-clang")]),
            Platform::new(
                "linux",
                vec![
                    Compiler::versioned("gcc", &["10.3.0", "11.3.0"]),
                    Compiler::versioned("clang", &["11", "14", "15"]),
                ],
            ),
        ]
    }

    #[test]
    fn test_single_macos_configuration() {
        let qt = vec![QtRelease::new("5.15.2", &["qtbase", "icu"], &[])];
        let platforms = vec![Platform::new(
            "macos",
            vec![Compiler::unversioned("apple-clang")],
        )];

        let matrix = build(&qt, &platforms, None).unwrap();
        let value = serde_json::to_value(&matrix).unwrap();

        assert_eq!(
            value,
            json!({
                "include": [{
                    "qt_version": "5.15.2",
                    "qt_archives": "qtbase icu",
                    "qt_modules": "",
                    "platform": "macos",
                    "compiler": "apple-clang",
                    "compiler_version": "",
                    "compiler_full": "apple-clang",
                    "runs_on": "macos-11",
                    "with_qtdbus": "OFF"
                }]
            })
        );
    }

    #[test]
    fn test_one_configuration_per_combination() {
        let matrix = build(&qt_tables(), &platform_tables(), None).unwrap();

        // 2 Qt releases x (msvc + apple-clang + 2 gcc + 3 clang)
        assert_eq!(matrix.len(), 14);

        let mut keys: Vec<_> = matrix
            .include
            .iter()
            .map(|c| (c.qt_version.clone(), c.platform.clone(), c.compiler_full.clone()))
            .collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 14);
    }

    #[test]
    fn test_declaration_order() {
        let matrix = build(&qt_tables(), &platform_tables(), None).unwrap();
        let order: Vec<String> = matrix
            .include
            .iter()
            .take(7)
            .map(|c| format!("{}/{}", c.qt_version, c.compiler_full))
            .collect();

        assert_eq!(
            order,
            vec![
                "5.15.2/msvc",
                "5.15.2/apple-clang",
                "5.15.2/gcc-10.3.0",
                "5.15.2/gcc-11.3.0",
                "5.15.2/clang-11",
                "5.15.2/clang-14",
                "5.15.2/clang-15",
            ]
        );
        assert_eq!(matrix.include[7].qt_version, "6.2.0");
        assert_eq!(matrix.include[7].compiler_full, "msvc");
    }

    #[test]
    fn test_filter_yields_subset_in_order() {
        let full = build(&qt_tables(), &platform_tables(), None).unwrap();
        let linux = build(&qt_tables(), &platform_tables(), Some("linux")).unwrap();

        let expected: Vec<_> = full
            .include
            .iter()
            .filter(|c| c.platform == "linux")
            .cloned()
            .collect();
        assert_eq!(linux.include, expected);
        assert_eq!(linux.len(), 10);
    }

    #[test]
    fn test_filter_without_match_is_empty() {
        let matrix = build(&qt_tables(), &platform_tables(), Some("freebsd")).unwrap();
        assert!(matrix.is_empty());
        assert_eq!(serde_json::to_string(&matrix).unwrap(), r#"{"include":[]}"#);
    }

    #[test]
    fn test_with_qtdbus_off_only_on_macos() {
        let matrix = build(&qt_tables(), &platform_tables(), None).unwrap();
        for config in &matrix.include {
            let expected = if config.platform == "macos" { "OFF" } else { "ON" };
            assert_eq!(config.with_qtdbus, expected);
        }
    }

    #[test]
    fn test_unrecognized_platform_fails_without_output() {
        let mut platforms = platform_tables();
        platforms.push(Platform::new("freebsd", vec![Compiler::unversioned("clang")]));

        let result = build(&qt_tables(), &platforms, None);
        assert_eq!(
            result,
            Err(MatrixError::UnrecognizedPlatform {
                name: "freebsd".to_string()
            })
        );
    }

    #[test]
    fn test_filtered_out_platform_is_not_resolved() {
        let mut platforms = platform_tables();
        platforms.push(Platform::new("freebsd", vec![Compiler::unversioned("clang")]));

        let matrix = build(&qt_tables(), &platforms, Some("windows")).unwrap();
        assert_eq!(matrix.len(), 2);
    }

    #[test]
    fn test_platform_without_compilers_contributes_nothing() {
        let platforms = vec![Platform::new("linux", Vec::new())];
        let matrix = build(&qt_tables(), &platforms, None).unwrap();
        assert!(matrix.is_empty());
    }

    #[test]
    fn test_basic_schema_omits_packages() {
        let matrix = MatrixBuilder::new(&qt_tables(), &platform_tables())
            .schema(Schema::Basic)
            .build()
            .unwrap();
        let value = serde_json::to_value(&matrix.include[0]).unwrap();
        assert!(value.get("qt_modules").is_none());
        assert!(value.get("qt_archives").is_none());
        assert!(value.get("compiler_base_image").is_none());
    }

    #[test]
    fn test_container_schema_base_images() {
        let qt = qt_tables();
        let platforms = platform_tables();
        let matrix = MatrixBuilder::new(&qt, &platforms)
            .schema(Schema::Container)
            .filter(Some("linux"))
            .build()
            .unwrap();

        let gcc = &matrix.include[0];
        assert_eq!(gcc.compiler_base_image, Some(BaseImage(Some("gcc".to_string()))));
        let clang = &matrix.include[2];
        assert_eq!(clang.compiler, "clang");
        assert_eq!(clang.compiler_base_image.as_ref().and_then(|i| i.as_deref()), Some("silkeh/clang"));

        let msvc = MatrixBuilder::new(&qt, &platforms)
            .schema(Schema::Container)
            .filter(Some("windows"))
            .build()
            .unwrap();
        let value = serde_json::to_value(&msvc.include[0]).unwrap();
        assert_eq!(value["compiler_base_image"], serde_json::Value::Null);
        assert_eq!(value["qt_archives"], "qtbase icu qtwebsockets");
    }
}
