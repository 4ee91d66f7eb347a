//! Architecture boundary tests. Run with `cargo test -p firmware --test arch_boundaries`
//!
//! Layering rules:
//!   Rule 1: platform depends on no other workspace crate
//!   Rule 2: bus depends only on platform
//!   Rule 3: connectivity, polling and ui never depend on firmware or on each other
//!   Rule 4: library crates are `no_std` and keep host-only crates out of [dependencies]
//!
//! The dependency graph is checked by reading each crate's Cargo.toml; the
//! `no_std` rule by reading its lib.rs. Compiling this binary already proves
//! there is no cycle through firmware.
// Architecture test file: expect/unwrap/panic are intentional test mechanisms.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]

const PLATFORM_TOML: &str = include_str!("../../platform/Cargo.toml");
const BUS_TOML: &str = include_str!("../../bus/Cargo.toml");
const CONNECTIVITY_TOML: &str = include_str!("../../connectivity/Cargo.toml");
const POLLING_TOML: &str = include_str!("../../polling/Cargo.toml");
const UI_TOML: &str = include_str!("../../ui/Cargo.toml");

const LIBRARY_CRATES: [(&str, &str, &str); 5] = [
    ("platform", PLATFORM_TOML, include_str!("../../platform/src/lib.rs")),
    ("bus", BUS_TOML, include_str!("../../bus/src/lib.rs")),
    ("connectivity", CONNECTIVITY_TOML, include_str!("../../connectivity/src/lib.rs")),
    ("polling", POLLING_TOML, include_str!("../../polling/src/lib.rs")),
    ("ui", UI_TOML, include_str!("../../ui/src/lib.rs")),
];

/// Lines of the `[dependencies]` table only (dev-dependencies excluded).
fn runtime_dependencies(manifest: &str) -> Vec<&str> {
    let mut in_deps = false;
    let mut deps = Vec::new();
    for line in manifest.lines().map(str::trim) {
        if line.starts_with('[') {
            in_deps = line == "[dependencies]";
            continue;
        }
        if in_deps && !line.is_empty() && !line.starts_with('#') {
            deps.push(line.split(['=', ' ']).next().unwrap_or(""));
        }
    }
    deps
}

fn path_dependencies(manifest: &str) -> Vec<&str> {
    let mut in_deps = false;
    let mut deps = Vec::new();
    for line in manifest.lines().map(str::trim) {
        if line.starts_with('[') {
            in_deps = line == "[dependencies]";
            continue;
        }
        if in_deps && line.contains("path = ") {
            deps.push(line.split(['=', ' ']).next().unwrap_or(""));
        }
    }
    deps
}

#[test]
fn platform_is_the_bottom_layer() {
    assert!(path_dependencies(PLATFORM_TOML).is_empty());
}

#[test]
fn bus_depends_only_on_platform() {
    assert_eq!(path_dependencies(BUS_TOML), vec!["platform"]);
}

#[test]
fn state_machines_and_ui_sit_beside_each_other() {
    for (name, manifest) in [
        ("connectivity", CONNECTIVITY_TOML),
        ("polling", POLLING_TOML),
        ("ui", UI_TOML),
    ] {
        let deps = path_dependencies(manifest);
        for forbidden in ["firmware", "connectivity", "polling", "ui"] {
            assert!(
                !deps.contains(&forbidden),
                "{name} must not depend on {forbidden}, found {deps:?}"
            );
        }
    }
}

#[test]
fn library_crates_are_no_std() {
    for (name, _, lib) in LIBRARY_CRATES {
        let no_std = lib
            .lines()
            .any(|l| l.starts_with("#![cfg_attr(not(") && l.contains("no_std)]"));
        assert!(
            no_std,
            "{name}/src/lib.rs must be no_std outside host builds"
        );
    }
}

#[test]
fn library_crates_keep_host_crates_optional() {
    for (name, manifest, _) in LIBRARY_CRATES {
        let deps = runtime_dependencies(manifest);
        for host_only in ["tokio", "tracing-subscriber", "serde_json", "anyhow"] {
            assert!(
                !deps.contains(&host_only),
                "{name} must not pull {host_only} into the firmware build"
            );
        }
    }
}

#[test]
fn library_crates_deny_panicking_shortcuts() {
    for (name, _, lib) in LIBRARY_CRATES {
        for lint in ["clippy::unwrap_used", "clippy::expect_used", "clippy::panic"] {
            assert!(
                lib.contains(&format!("#![deny({lint})]")),
                "{name} must deny {lint}"
            );
        }
    }
}

#[test]
fn collaborator_traits_are_reachable_without_firmware() {
    fn _display<T: platform::DisplayPanel>() {}
    fn _radio<T: platform::WifiRadio>() {}
    fn _source<T: platform::DataSource>() {}
    fn _store<T: platform::CredentialStore>() {}
    _display::<platform::mocks::MockPanel>();
    _radio::<platform::mocks::MockRadio>();
    _source::<platform::mocks::MockDataSource>();
    _store::<platform::mocks::MemoryCredentialStore>();
}
