//! Scaling analysis: verify that building node arenas stays linear in input size
//!
//! Parses growing inputs with `yamlschema_yaml::parse_documents` and with
//! `yaml_rust2::YamlLoader`, reporting nodes per document and the time ratio
//! between the two. A ratio that stays flat as the input grows means the
//! arena builder and line index add constant work per node.
//!
//! Run with: cargo bench --bench scaling_overhead

use std::time::{Duration, Instant};
use yaml_rust2::YamlLoader;
use yamlschema_yaml::parse_documents;

const ROUNDS: u32 = 5;

struct ScalingResult {
    size: usize,
    nodes: usize,
    raw: Duration,
    tracked: Duration,
}

impl ScalingResult {
    fn ratio(&self) -> f64 {
        self.tracked.as_secs_f64() / self.raw.as_secs_f64().max(f64::EPSILON)
    }
}

/// Generate a flat array of N string items
fn generate_flat_array(n: usize) -> String {
    let mut yaml = String::from("[\n");
    for i in 0..n {
        yaml.push_str(&format!("  \"item_{}\",\n", i));
    }
    yaml.push_str("]\n");
    yaml
}

/// Generate a flat hash with N key-value pairs
fn generate_flat_hash(n: usize) -> String {
    let mut yaml = String::new();
    for i in 0..n {
        yaml.push_str(&format!("key_{}: \"value_{}\"\n", i, i));
    }
    yaml
}

/// Generate N small documents sharing an anchor through merge keys
fn generate_merge_stream(n: usize) -> String {
    let mut yaml = String::new();
    for i in 0..n {
        yaml.push_str(&format!(
            "---\nbase: &base\n  timeout: 30\n  retries: 3\nservice:\n  <<: *base\n  name: svc_{}\n  ports: [80, 443]\n",
            i
        ));
    }
    yaml
}

/// Generate a mixed structure: top-level hash with N keys, each having a small nested structure
fn generate_mixed_structure(n: usize) -> String {
    let mut yaml = String::new();
    for i in 0..n {
        yaml.push_str(&format!(
            "section_{}:\n  title: \"Section {}\"\n  enabled: true\n  items:\n    - item1\n    - item2\n    - item3\n",
            i, i
        ));
    }
    yaml
}

fn time<T>(mut f: impl FnMut() -> T) -> (Duration, T) {
    let mut last = f();
    let start = Instant::now();
    for _ in 0..ROUNDS {
        last = f();
    }
    (start.elapsed() / ROUNDS, last)
}

fn test_scaling(name: &str, generator: impl Fn(usize) -> String, sizes: &[usize]) {
    println!("\n{}", "=".repeat(70));
    println!("Scaling Test: {}", name);
    println!("{}", "=".repeat(70));
    println!(
        "{:>6} {:>10} {:>14} {:>14} {:>8}",
        "Size", "Nodes", "yaml-rust2", "arena", "Ratio"
    );
    println!("{}", "-".repeat(70));

    let mut results = Vec::new();

    for &size in sizes {
        let yaml_content = generator(size);

        let (raw, raw_docs) = time(|| YamlLoader::load_from_str(&yaml_content));
        if raw_docs.is_err() {
            println!("{:>6} yaml-rust2 rejected the generated input", size);
            continue;
        }

        let (tracked, docs) = time(|| parse_documents(&yaml_content).collect::<Vec<_>>());
        let nodes = docs
            .iter()
            .filter_map(|doc| doc.as_ref().ok())
            .map(|doc| doc.node_count())
            .sum();

        let result = ScalingResult {
            size,
            nodes,
            raw,
            tracked,
        };
        println!(
            "{:>6} {:>10} {:>14?} {:>14?} {:>8.2}x",
            size,
            nodes,
            raw,
            tracked,
            result.ratio()
        );
        results.push(result);
    }

    println!("\nScaling Analysis:");
    if let (Some(first), Some(last)) = (results.first(), results.last()) {
        if results.len() < 2 {
            return;
        }
        println!(
            "  Size increased:  {:.1}x",
            last.size as f64 / first.size as f64
        );
        println!(
            "  Nodes increased: {:.1}x",
            last.nodes as f64 / first.nodes.max(1) as f64
        );

        let ratio_change_pct = ((last.ratio() - first.ratio()) / first.ratio()).abs() * 100.0;
        println!(
            "  Time ratio: {:.2}x → {:.2}x (Δ{:.1}%)",
            first.ratio(),
            last.ratio(),
            ratio_change_pct
        );

        if ratio_change_pct < 25.0 {
            println!("  ✅ Arena building scales linearly");
        } else {
            println!("  ⚠️  Time ratio drifts with input size");
        }
    }
}

fn main() {
    println!("Scaling Analysis: positioned YAML arenas");
    println!("=============================================================");

    let sizes = [10, 100, 1000, 5000];
    test_scaling("Flat Array", generate_flat_array, &sizes);
    test_scaling("Flat Hash", generate_flat_hash, &sizes);
    test_scaling("Mixed Structure", generate_mixed_structure, &[5, 50, 500]);
    test_scaling("Merge Stream", generate_merge_stream, &[5, 50, 500]);
}
