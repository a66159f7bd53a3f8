//! NuGet `packages.config` manifests for generated data-access projects.
//!
//! Generated code for each ORM target needs a fixed set of packages. The
//! manifests are byte-stable: LF line endings, two-space indentation, and no
//! trailing newline, so a checked-in copy can be pinned by checksum.
//!
//! # Examples
//!
//! ```
//! use schema_reader_codegen::{CodeTarget, write_entity_framework_net4};
//!
//! let manifest = CodeTarget::EntityFramework.manifest();
//! assert_eq!(manifest.render(), write_entity_framework_net4());
//! assert_eq!(manifest.checksum().len(), 64);
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use sha2::{Digest, Sha256};

use crate::error::{CodegenError, Result};

/// File name NuGet expects next to the project file.
pub const PACKAGES_CONFIG: &str = "packages.config";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Entity Framework 6 on .NET 4.0.
pub const ENTITY_FRAMEWORK_NET4: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<packages>
  <package id="EntityFramework" version="6.0.1" targetFramework="net40" />
</packages>"#;

/// Fluent NHibernate 1.3 with its NHibernate 3.3 dependencies on .NET 4.0.
pub const FLUENT_NHIBERNATE_NET4: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<packages>
  <package id="FluentNHibernate" version="1.3.0.733" targetFramework="net40" />
  <package id="Iesi.Collections" version="3.2.0.4000" targetFramework="net40" />
  <package id="NHibernate" version="3.3.3.4001" targetFramework="net40" />
</packages>"#;

/// The `packages.config` for an Entity Framework project.
pub fn write_entity_framework_net4() -> &'static str {
    ENTITY_FRAMEWORK_NET4
}

/// The `packages.config` for a Fluent NHibernate project.
pub fn write_fluent_nhibernate_net4() -> &'static str {
    FLUENT_NHIBERNATE_NET4
}

/// One `<package>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageReference {
    pub id: &'static str,
    pub version: &'static str,
    pub target_framework: &'static str,
}

impl PackageReference {
    const fn net40(id: &'static str, version: &'static str) -> Self {
        Self {
            id,
            version,
            target_framework: "net40",
        }
    }
}

impl fmt::Display for PackageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"<package id="{}" version="{}" targetFramework="{}" />"#,
            self.id, self.version, self.target_framework
        )
    }
}

/// The package set one [`CodeTarget`] depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyManifest {
    pub target: CodeTarget,
    pub packages: Vec<PackageReference>,
}

impl DependencyManifest {
    /// Renders the `packages.config` document.
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.packages.len() + 3);
        lines.push(XML_DECLARATION.to_string());
        lines.push("<packages>".to_string());
        lines.extend(self.packages.iter().map(|p| format!("  {p}")));
        lines.push("</packages>".to_string());
        lines.join("\n")
    }

    /// SHA-256 hex digest of [`render`](Self::render).
    pub fn checksum(&self) -> String {
        format!("{:x}", Sha256::digest(self.render().as_bytes()))
    }

    /// Writes the document to `packages.config` inside `dir`.
    ///
    /// Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::CodegenError::IoError) if the file cannot
    /// be written.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(PACKAGES_CONFIG);
        std::fs::write(&path, self.render())?;
        Ok(path)
    }

    /// Checks that the file at `path` holds exactly this document.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::CodegenError::IoError) if the file cannot
    /// be read, or [`InvalidChecksum`](crate::CodegenError::InvalidChecksum)
    /// if its bytes differ.
    pub fn verify(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let actual = format!("{:x}", Sha256::digest(&bytes));
        let expected = self.checksum();
        if actual != expected {
            return Err(CodegenError::InvalidChecksum(format!(
                "{}: expected {expected}, found {actual}",
                path.display()
            )));
        }
        Ok(())
    }
}

/// ORM flavors code can be generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeTarget {
    EntityFramework,
    FluentNHibernate,
}

impl CodeTarget {
    pub const ALL: [CodeTarget; 2] = [CodeTarget::EntityFramework, CodeTarget::FluentNHibernate];

    /// Kebab-case name used on the command line.
    pub fn label(self) -> &'static str {
        match self {
            CodeTarget::EntityFramework => "entity-framework",
            CodeTarget::FluentNHibernate => "fluent-nhibernate",
        }
    }

    /// The packages this target's generated code references.
    pub fn manifest(self) -> DependencyManifest {
        let packages = match self {
            CodeTarget::EntityFramework => {
                vec![PackageReference::net40("EntityFramework", "6.0.1")]
            }
            CodeTarget::FluentNHibernate => vec![
                PackageReference::net40("FluentNHibernate", "1.3.0.733"),
                PackageReference::net40("Iesi.Collections", "3.2.0.4000"),
                PackageReference::net40("NHibernate", "3.3.3.4001"),
            ],
        };
        DependencyManifest {
            target: self,
            packages,
        }
    }
}

impl fmt::Display for CodeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CodeTarget {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        CodeTarget::ALL
            .into_iter()
            .find(|target| target.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown code target: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_framework_document() {
        let expected = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
                        <packages>\n  \
                        <package id=\"EntityFramework\" version=\"6.0.1\" targetFramework=\"net40\" />\n\
                        </packages>";
        assert_eq!(write_entity_framework_net4(), expected);
    }

    #[test]
    fn test_fluent_nhibernate_document() {
        let doc = write_fluent_nhibernate_net4();
        let lines: Vec<_> = doc.split('\n').collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(
            lines[2],
            r#"  <package id="FluentNHibernate" version="1.3.0.733" targetFramework="net40" />"#
        );
        assert_eq!(
            lines[3],
            r#"  <package id="Iesi.Collections" version="3.2.0.4000" targetFramework="net40" />"#
        );
        assert_eq!(
            lines[4],
            r#"  <package id="NHibernate" version="3.3.3.4001" targetFramework="net40" />"#
        );
    }

    #[test]
    fn test_documents_are_byte_stable() {
        for doc in [write_entity_framework_net4(), write_fluent_nhibernate_net4()] {
            assert!(!doc.contains('\r'));
            assert!(!doc.ends_with('\n'));
            assert!(doc.ends_with("</packages>"));
        }
    }

    #[test]
    fn test_render_matches_fixed_documents() {
        assert_eq!(
            CodeTarget::EntityFramework.manifest().render(),
            ENTITY_FRAMEWORK_NET4
        );
        assert_eq!(
            CodeTarget::FluentNHibernate.manifest().render(),
            FLUENT_NHIBERNATE_NET4
        );
    }

    #[test]
    fn test_checksums_differ_per_target() {
        let ef = CodeTarget::EntityFramework.manifest().checksum();
        let nh = CodeTarget::FluentNHibernate.manifest().checksum();
        assert_eq!(ef.len(), 64);
        assert_ne!(ef, nh);
        assert_eq!(ef, CodeTarget::EntityFramework.manifest().checksum());
    }

    #[test]
    fn test_code_target_parse() {
        assert_eq!(
            "fluent-nhibernate".parse::<CodeTarget>().unwrap(),
            CodeTarget::FluentNHibernate
        );
        assert_eq!(
            "Entity-Framework".parse::<CodeTarget>().unwrap(),
            CodeTarget::EntityFramework
        );
        assert!("linq-to-sql".parse::<CodeTarget>().is_err());
    }
}
