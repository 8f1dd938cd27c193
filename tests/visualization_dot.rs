use kconfig_graph::assigned::{AssignedConfig, DEFAULT_PREFIX};
use kconfig_graph::graph::SymbolGraph;
use kconfig_graph::visualization::{render, DotGenerator, EdgeFilter};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn depends_on_edge_rendered_only_when_both_assigned() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("Kconfig"), "config A\n\tdepends on B\nconfig B\n");
    let graph = SymbolGraph::build_from_directory(dir.path());

    let both = AssignedConfig::parse_str("CONFIG_A=y\nCONFIG_B=y\n", DEFAULT_PREFIX);
    assert_eq!(render(&graph, &both), "digraph G {\n  \"B\" -> \"A\";\n}\n");

    let only_a = AssignedConfig::parse_str("CONFIG_A=y\n", DEFAULT_PREFIX);
    assert_eq!(render(&graph, &only_a), "digraph G {\n}\n");
}

#[test]
fn select_and_if_block_edges() {
    let dir = tempdir().unwrap();
    write(
        &dir.path().join("Kconfig"),
        "\
config A
\tbool \"A\"
\tselect C

if COND
config D
\tbool \"D\"
endif
",
    );
    let graph = SymbolGraph::build_from_directory(dir.path());
    let cfg = AssignedConfig::parse_str("CONFIG_A=y\nCONFIG_C=y\nCONFIG_COND=y\nCONFIG_D=m\n", DEFAULT_PREFIX);
    let out = render(&graph, &cfg);
    assert!(out.starts_with("digraph G {\n"));
    assert!(out.ends_with("}\n"));
    assert!(out.contains("  \"A\" -> \"C\";\n"));
    assert!(out.contains("  \"COND\" -> \"D\";\n"));
    assert_eq!(out.matches("->").count(), 2);
}

#[test]
fn edges_from_several_files_share_one_graph() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("Kconfig"), "config NET\n\tbool \"Networking\"\n");
    write(
        &dir.path().join("net/ipv4/Kconfig"),
        "config INET\n\tbool \"TCP/IP\"\n\tdepends on NET\n",
    );
    write(&dir.path().join("lib/Kconfig.debug"), "config DEBUG_NET\n\tdepends on INET\n");
    // Not a Kconfig file by name
    write(&dir.path().join("net/Makefile"), "config IGNORED\n\tdepends on NET\n");

    let graph = SymbolGraph::build_from_directory(dir.path());
    assert!(graph.get("IGNORED").is_none());

    let cfg = AssignedConfig::parse_str("CONFIG_NET=y\nCONFIG_INET=y\nCONFIG_DEBUG_NET=y\n", DEFAULT_PREFIX);
    assert_eq!(
        render(&graph, &cfg),
        "digraph G {\n  \"NET\" -> \"INET\";\n  \"INET\" -> \"DEBUG_NET\";\n}\n"
    );
}

#[test]
fn unfiltered_render_includes_unassigned_edges() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("Kconfig"), "config A\n\tselect B\n\tselect C\n");
    let graph = SymbolGraph::build_from_directory(dir.path());
    let out = DotGenerator::new().generate_dot_with_filter(&graph, EdgeFilter::All);
    assert_eq!(out, "digraph G {\n  \"A\" -> \"B\";\n  \"A\" -> \"C\";\n}\n");
}

#[test]
fn repeated_builds_render_identically() {
    let dir = tempdir().unwrap();
    for (i, name) in ["alpha", "beta", "gamma", "delta"].iter().enumerate() {
        write(
            &dir.path().join(name).join("Kconfig"),
            &format!("config S{i}\n\tdepends on BASE\n\tselect LEAF{i}\n"),
        );
    }
    let text: String = (0..4).map(|i| format!("CONFIG_S{i}=y\nCONFIG_LEAF{i}=y\n")).collect();
    let cfg = AssignedConfig::parse_str(&format!("CONFIG_BASE=y\n{text}"), DEFAULT_PREFIX);

    let first = render(&SymbolGraph::build_from_directory(dir.path()), &cfg);
    let second = render(&SymbolGraph::build_from_directory(dir.path()), &cfg);
    assert_eq!(first, second);
    assert_eq!(first.matches("->").count(), 8);
}

#[test]
fn non_utf8_bytes_do_not_drop_a_file() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a/Kconfig"), "config A\n\tselect B\n");
    fs::create_dir_all(dir.path().join("b")).unwrap();
    fs::write(
        dir.path().join("b/Kconfig"),
        b"config LATIN\n\tdepends on B\n\thelp\n\t  Ren\xe9 wrote this driver.\n",
    )
    .unwrap();
    write(&dir.path().join("c/Kconfig"), "config C\n\tdepends on B\n");

    let (graph, report) = SymbolGraph::build_from_directory_with_report(dir.path());
    assert_eq!(report.files_parsed, 3);
    assert!(report.skipped.is_empty());
    assert!(graph.get("LATIN").unwrap().description.starts_with("Ren\u{FFFD}"));

    let cfg = AssignedConfig::parse_str("CONFIG_A=y\nCONFIG_B=y\nCONFIG_LATIN=y\n", DEFAULT_PREFIX);
    assert_eq!(render(&graph, &cfg), "digraph G {\n  \"A\" -> \"B\";\n  \"B\" -> \"LATIN\";\n}\n");
}

#[test]
fn kconfig_anywhere_in_base_name_is_scanned() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("arch.Kconfig"), "config A\n\tselect B\n");
    let graph = SymbolGraph::build_from_directory(dir.path());
    assert_eq!(graph.len(), 2);

    let cfg = AssignedConfig::parse_str("CONFIG_A=y\nCONFIG_B=y\n", DEFAULT_PREFIX);
    assert_eq!(render(&graph, &cfg), "digraph G {\n  \"A\" -> \"B\";\n}\n");
}

#[cfg(unix)]
#[test]
fn unreadable_file_is_skipped_and_scan_continues() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    write(&dir.path().join("a/Kconfig"), "config A\n\tselect B\n");
    let locked = dir.path().join("b/Kconfig");
    write(&locked, "config HIDDEN\n");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    // Privileged users can read anything; nothing to check then
    if fs::read(&locked).is_ok() {
        return;
    }

    let (graph, report) = SymbolGraph::build_from_directory_with_report(dir.path());
    assert_eq!(report.files_parsed, 1);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].0.ends_with("b/Kconfig"));
    assert!(graph.get("HIDDEN").is_none());
    assert!(graph.get("B").is_some());
}
