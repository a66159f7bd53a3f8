//! Dependency manifests for code generated from a read schema.
//!
//! Each [`CodeTarget`] maps to a fixed NuGet `packages.config` document.
//!
//! # Quick start
//!
//! ```no_run
//! use schema_reader_codegen::CodeTarget;
//!
//! let manifest = CodeTarget::FluentNHibernate.manifest();
//! let path = manifest.save("out/").unwrap();
//! manifest.verify(&path).unwrap();
//! println!("{} sha256={}", path.display(), manifest.checksum());
//! ```

mod error;
mod manifest;

pub use error::{CodegenError, Result};
pub use manifest::{
    CodeTarget, DependencyManifest, ENTITY_FRAMEWORK_NET4, FLUENT_NHIBERNATE_NET4,
    PACKAGES_CONFIG, PackageReference, write_entity_framework_net4, write_fluent_nhibernate_net4,
};
