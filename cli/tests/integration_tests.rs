use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

const BIN: &str = env!("CARGO_BIN_EXE_schema-reader");

/// Helper to create a temp directory that is cleaned up on drop.
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "schema_reader_cli_test_{name}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run(args: &[&str]) -> Output {
    Command::new(BIN)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run schema-reader")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Snapshot of a small airline catalog in schema `martin`.
fn write_snapshot(dir: &TempDir) -> PathBuf {
    let yaml = r#"
keys:
  - { constraint_name: pk_airline, schema_name: martin, table_name: airline, column_name: al_id, key_position: 1 }
  - { constraint_name: pk_country, schema_name: martin, table_name: country, column_name: ct_code, key_position: 1 }
constraints:
  - { constraint_name: uk_airline, schema_name: martin, table_name: airline, constraint_type: U, text_segment: "UNIQUE (al_iatacode, al_name)" }
  - { constraint_name: ck_airline, schema_name: martin, table_name: airline, constraint_type: C, text_segment: "CHECK (al_id > 0)" }
  - { constraint_name: fk_airline_country, schema_name: martin, table_name: airline, constraint_type: R, text_segment: "FOREIGN KEY (al_ccode) REFERENCES \"martin\".country(ct_code)" }
ref_constraints:
  - { ref_constraint_name: fk_airline_country, ref_schema_name: martin, ref_table_name: airline, unique_constraint_name: pk_country, unique_schema_name: martin, unique_table_name: country }
"#;
    let path = dir.join("snapshot.yml");
    fs::write(&path, yaml).expect("failed to write snapshot");
    path
}

/// Creates and seeds a mirror database, returning its path.
fn seeded_mirror(dir: &TempDir) -> PathBuf {
    let db = dir.join("catalog.db");
    let snapshot = write_snapshot(dir);
    let out = run(&[
        "mirror",
        "seed",
        "--db",
        db.to_str().unwrap(),
        "--snapshot",
        snapshot.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "seed failed: {}", stderr(&out));
    db
}

// ---------------------------------------------------------------------------
// mirror
// ---------------------------------------------------------------------------

#[test]
fn test_mirror_lifecycle() {
    let dir = TempDir::new("mirror_lifecycle");
    let db = dir.join("catalog.db");
    let db = db.to_str().unwrap();

    let out = run(&["mirror", "status", "--db", db]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("Tables exist: no"));

    assert!(run(&["mirror", "init", "--db", db]).status.success());
    let out = run(&["mirror", "status", "--db", db]);
    assert!(stdout(&out).contains("Tables exist: yes"));
    assert!(stdout(&out).contains("iikeys rows: 0"));

    assert!(run(&["mirror", "drop", "--db", db]).status.success());
    let out = run(&["mirror", "status", "--db", db]);
    assert!(stdout(&out).contains("Tables exist: no"));
}

#[test]
fn test_mirror_seed_reports_counts() {
    let dir = TempDir::new("mirror_seed");
    let db = seeded_mirror(&dir);

    let out = run(&["mirror", "status", "--db", db.to_str().unwrap()]);
    let text = stdout(&out);
    assert!(text.contains("iikeys rows: 2"), "{text}");
    assert!(text.contains("iiconstraints rows: 3"), "{text}");
    assert!(text.contains("iiref_constraints rows: 1"), "{text}");
}

#[test]
fn test_mirror_seed_missing_snapshot_fails() {
    let dir = TempDir::new("mirror_seed_missing");
    let out = run(&[
        "mirror",
        "seed",
        "--db",
        dir.join("catalog.db").to_str().unwrap(),
        "--snapshot",
        dir.join("missing.yml").to_str().unwrap(),
    ]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("Failed to load snapshot"));
}

// ---------------------------------------------------------------------------
// read
// ---------------------------------------------------------------------------

#[test]
fn test_read_single_kind_as_json() {
    let dir = TempDir::new("read_kind");
    let db = seeded_mirror(&dir);

    let out = run(&[
        "read",
        "--db",
        db.to_str().unwrap(),
        "--table",
        "airline",
        "--kind",
        "unique-constraints",
    ]);
    assert!(out.status.success(), "{}", stderr(&out));

    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json[0]["kind"], "unique-constraints");
    let rows = json[0]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["column_name"], "al_iatacode");
    assert_eq!(rows[1]["column_name"], "al_name");
    assert_eq!(rows[1]["table_name"], "airline");
}

#[test]
fn test_read_all_kinds() {
    let dir = TempDir::new("read_all");
    let db = seeded_mirror(&dir);

    let out = run(&[
        "read",
        "--db",
        db.to_str().unwrap(),
        "--table",
        "airline",
        "--owner",
        "martin",
    ]);
    assert!(out.status.success(), "{}", stderr(&out));

    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    let all = &json[0];
    assert_eq!(all["query"]["table"], "airline");
    assert_eq!(all["primary_keys"].as_array().unwrap().len(), 1);
    assert_eq!(all["check_constraints"][0]["Expression"], "CHECK (al_id > 0)");
    assert_eq!(all["unique_keys"].as_array().unwrap().len(), 2);
    assert_eq!(all["foreign_keys"][0]["column_name"], "al_ccode");
    assert_eq!(all["foreign_keys"][0]["fk_table"], "country");
}

#[test]
fn test_read_as_yaml() {
    let dir = TempDir::new("read_yaml");
    let db = seeded_mirror(&dir);

    let out = run(&[
        "read",
        "--db",
        db.to_str().unwrap(),
        "--kind",
        "primary-keys",
        "--format",
        "yaml",
    ]);
    assert!(out.status.success(), "{}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("kind: primary-keys"), "{text}");
    assert!(text.contains("column_name: ct_code"), "{text}");
}

#[test]
fn test_read_with_config() {
    let dir = TempDir::new("read_config");
    seeded_mirror(&dir);
    let config = dir.join("schema-reader.yml");
    fs::write(
        &config,
        r#"version: "1.0"
provider: ingres
connection:
  sqlite: catalog.db
owner: martin
tables: [airline, country]
exclude: [country]
"#,
    )
    .unwrap();

    let out = run(&[
        "read",
        "--config",
        config.to_str().unwrap(),
        "--kind",
        "primary-keys",
    ]);
    assert!(out.status.success(), "{}", stderr(&out));

    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    let results = json.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["rows"][0]["table_name"], "airline");
}

#[test]
fn test_read_requires_a_source() {
    let out = run(&["read", "--table", "airline"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("one of --db, --odbc or --config is required"));
}

#[test]
fn test_read_rejects_unknown_provider() {
    let dir = TempDir::new("read_provider");
    let db = seeded_mirror(&dir);
    let out = run(&[
        "read",
        "--db",
        db.to_str().unwrap(),
        "--provider",
        "Oracle.DataAccess.Client",
    ]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("unsupported provider"));
}

#[test]
fn test_read_missing_database_fails() {
    let dir = TempDir::new("read_missing");
    let out = run(&["read", "--db", dir.join("missing.db").to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("Failed to open database"));
}

#[test]
fn test_read_accepts_ado_provider_name() {
    let dir = TempDir::new("read_ado_name");
    let db = seeded_mirror(&dir);
    let out = run(&[
        "read",
        "--db",
        db.to_str().unwrap(),
        "--provider",
        "Ingres.Client",
        "--kind",
        "check-constraints",
    ]);
    assert!(out.status.success(), "{}", stderr(&out));
}

// ---------------------------------------------------------------------------
// packages
// ---------------------------------------------------------------------------

#[test]
fn test_packages_prints_exact_document() {
    let out = run(&["packages", "--target", "entity-framework"]);
    assert!(out.status.success());
    assert_eq!(
        stdout(&out),
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<packages>\n  <package id=\"EntityFramework\" version=\"6.0.1\" targetFramework=\"net40\" />\n</packages>"
    );
}

#[test]
fn test_packages_checksum() {
    let out = run(&["packages", "--target", "fluent-nhibernate", "--checksum"]);
    assert!(out.status.success());
    let digest = stdout(&out);
    let digest = digest.trim();
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_packages_output_then_check() {
    let dir = TempDir::new("packages_check");
    let out_dir = dir.join("proj");
    fs::create_dir_all(&out_dir).unwrap();

    let out = run(&[
        "packages",
        "--target",
        "fluent-nhibernate",
        "--output",
        out_dir.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "{}", stderr(&out));
    let written = out_dir.join("packages.config");
    assert!(fs::read_to_string(&written).unwrap().contains("NHibernate"));

    let check = |target: &str| {
        run(&[
            "packages",
            "--target",
            target,
            "--check",
            written.to_str().unwrap(),
        ])
    };
    assert!(check("fluent-nhibernate").status.success());

    let out = check("entity-framework");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("Manifest check failed"));
}

#[test]
fn test_packages_unknown_target() {
    let out = run(&["packages", "--target", "linq-to-sql"]);
    assert!(!out.status.success());
}
