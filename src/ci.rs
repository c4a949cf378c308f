//! GitHub Actions workflow generator.
//!
//! `qtmatrix workflow` writes a workflow in which one job runs `qtmatrix`
//! and publishes the JSON as a job output, and a second job fans out over it
//! with `fromJson`. The build job selects the compiler from `matrix.compiler`
//! and `matrix.compiler_version`; with the `container` schema it also runs
//! inside `compiler_base_image`. Every `matrix.*` key it reads is a
//! [`Configuration`] field of the chosen schema.
//!
//! [`Configuration`]: crate::matrix::Configuration

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};

use crate::matrix::Schema;

pub const WORKFLOW_FILE: &str = "build.yml";

const HEADER: &str = r#"name: Build

on:
  push:
    branches: [ "main", "master" ]
  pull_request:
    branches: [ "main", "master" ]

jobs:
  matrix:
    runs-on: ubuntu-latest
    outputs:
      matrix: ${{ steps.generate.outputs.matrix }}
    steps:
    - uses: actions/checkout@v4

    - name: Install qtmatrix
      run: cargo install qtmatrix --locked

    - name: Generate build matrix
      id: generate
      run: echo "matrix=$(qtmatrix --schema @SCHEMA@)" >> "$GITHUB_OUTPUT"

  build:
    needs: matrix
    strategy:
      fail-fast: false
      matrix: ${{ fromJson(needs.matrix.outputs.matrix) }}
    runs-on: ${{ matrix.runs_on }}
    name: ${{ matrix.platform }} (Qt ${{ matrix.qt_version }}, ${{ matrix.compiler_full }})
"#;

/// Versioned images are tagged with the compiler version
const CONTAINER: &str = r#"    container: ${{ matrix.compiler_base_image && format('{0}:{1}', matrix.compiler_base_image, matrix.compiler_version) || '' }}
"#;

const INSTALL_QT: &str = r#"
    steps:
    - uses: actions/checkout@v4

    - name: Install Qt
      uses: jurplel/install-qt-action@v3
      with:
        version: ${{ matrix.qt_version }}
"#;

const QT_PACKAGES: &str = r#"        archives: ${{ matrix.qt_archives }}
        modules: ${{ matrix.qt_modules }}
"#;

// Runner images ship versioned gcc-N/clang-N binaries; compiler images only
// have the unversioned names.
const SELECT_COMPILER: &str = r#"
    - name: Select compiler
      if: ${{ matrix.compiler_version != '' }}
      shell: bash
      run: |
        image="@IMAGE@"
        major="${{ matrix.compiler_version }}"
        major="${major%%.*}"
        case "${{ matrix.compiler }}" in
          gcc) cc=gcc; cxx=g++ ;;
          clang) cc=clang; cxx=clang++ ;;
          *) echo "No compiler setup for ${{ matrix.compiler_full }}"; exit 0 ;;
        esac
        if [ -z "$image" ]; then
          packages="$cc-$major"
          [ "${{ matrix.compiler }}" = gcc ] && packages="$packages $cxx-$major"
          cc="$cc-$major"
          cxx="$cxx-$major"
          command -v "$cxx" >/dev/null || { sudo apt-get update && sudo apt-get install -y $packages; }
        fi
        echo "CC=$cc" >> "$GITHUB_ENV"
        echo "CXX=$cxx" >> "$GITHUB_ENV"
"#;

const BUILD_STEPS: &str = r#"
    - name: Configure
      run: cmake -B build -DCMAKE_BUILD_TYPE=Debug -DWITH_QTDBUS=${{ matrix.with_qtdbus }}

    - name: Build
      run: cmake --build build --parallel

    - name: Test
      run: ctest --test-dir build --output-on-failure
"#;

/// Path of the workflow inside a project directory
pub fn workflow_path(dir: &Path) -> PathBuf {
    dir.join(".github").join("workflows").join(WORKFLOW_FILE)
}

/// Workflow text for a schema. Only fields the schema emits are referenced.
pub fn workflow_content(schema: Schema) -> String {
    let mut content = HEADER.replace("@SCHEMA@", schema.as_str());
    if schema.carries_base_image() {
        content.push_str(CONTAINER);
    }
    content.push_str(INSTALL_QT);
    if schema.carries_qt_packages() {
        content.push_str(QT_PACKAGES);
    }
    let image = if schema.carries_base_image() {
        "${{ matrix.compiler_base_image }}"
    } else {
        ""
    };
    content.push_str(&SELECT_COMPILER.replace("@IMAGE@", image));
    content.push_str(BUILD_STEPS);
    content
}

/// Write the workflow under `dir`, refusing to replace an existing one unless `force`
pub fn generate_workflow_in(dir: &Path, schema: Schema, force: bool) -> Result<PathBuf> {
    let path = workflow_path(dir);

    if path.exists() && !force {
        bail!(
            "Workflow already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    if let Some(workflows_dir) = path.parent() {
        fs::create_dir_all(workflows_dir)
            .context("Failed to create .github/workflows directory")?;
    }

    fs::write(&path, workflow_content(schema)).context("Failed to write workflow file")?;

    Ok(path)
}
