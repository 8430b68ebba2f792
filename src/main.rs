// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context};
use puzzle_bridge::backends::WasmEngine;
use puzzle_bridge::bridge::{PuzzleBridge, PuzzleId, SolveRequest};
use puzzle_bridge::config::{load_and_validate_config, resolve_relative, Config};
use puzzle_bridge::observability::init_tracing;
use puzzle_bridge::presentation::{render_failure, render_report, render_results};
use puzzle_bridge::testcases::load_testcases;

const STDIN_MARKER: &str = "-";
const VERIFY_FLAG: &str = "--verify";

fn usage(program: &str) {
    eprintln!("Usage: {} <config.yaml> <day> <input-file | ->", program);
    eprintln!("       {} <config.yaml> --verify [testcases.toml]", program);
    eprintln!("Example: {} configs/aoc-2024.yaml 3 inputs/day03.txt", program);
    eprintln!("Example: cat inputs/day03.txt | {} configs/aoc-2024.yaml 3 -", program);
}

#[tokio::main]
async fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        usage(&args[0]);
        std::process::exit(2);
    }

    let outcome = if args[2] == VERIFY_FLAG {
        run_verify(&args[1], args.get(3).map(String::as_str)).await
    } else if args.len() == 4 {
        run_solve(&args[1], &args[2], &args[3]).await
    } else {
        usage(&args[0]);
        std::process::exit(2);
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        }
    }
}

fn load_bridge(config_file: &str) -> anyhow::Result<(Config, PuzzleBridge<WasmEngine>)> {
    let config = load_and_validate_config(config_file)
        .with_context(|| format!("Failed to load configuration '{}'", config_file))?;
    let module_path = resolve_relative(config_file, &config.engine.module);

    println!("📋 Configuration: {}", config_file);
    println!("🧩 Engine: {}", module_path.display());

    let engine = WasmEngine::new(module_path, config.wasm_options());
    Ok((config, PuzzleBridge::new(engine)))
}

fn read_input(source: &str) -> anyhow::Result<String> {
    if source == STDIN_MARKER {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read input from stdin")?;
        Ok(input)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Failed to read input '{}'", source))
    }
}

/// Solve one puzzle. Returns `false` when the request failed as a whole.
async fn run_solve(config_file: &str, day: &str, input_source: &str) -> anyhow::Result<bool> {
    let day: u32 = day
        .parse()
        .with_context(|| format!("'{}' is not a puzzle number", day))?;
    let id = PuzzleId::new(day)?;
    let input = read_input(input_source)?;
    let (_, bridge) = load_bridge(config_file)?;

    println!("🎄 Day {}", id);
    println!();

    let start_time = Instant::now();
    match bridge.solve_puzzle(&SolveRequest::new(id, input)).await {
        Ok(results) => {
            print!("{}", render_results(&results));
            println!("\n⏱️  Total Time (including engine load): {:?}", start_time.elapsed());
            Ok(true)
        }
        Err(e) => {
            eprintln!("{}", render_failure(&e));
            Ok(false)
        }
    }
}

/// Run a test-case catalogue. Returns `false` unless every case passed.
async fn run_verify(config_file: &str, catalogue: Option<&str>) -> anyhow::Result<bool> {
    let (config, bridge) = load_bridge(config_file)?;

    let catalogue_path: PathBuf = match (catalogue, config.testcases.as_deref()) {
        (Some(path), _) => PathBuf::from(path),
        (None, Some(path)) => resolve_relative(config_file, path),
        (None, None) => bail!("No testcase catalogue given and none configured"),
    };
    let testcases = load_testcases(&catalogue_path)
        .with_context(|| format!("Failed to load testcases '{}'", catalogue_path.display()))?;

    println!("🧪 Testcases: {} ({} cases)", catalogue_path.display(), testcases.len());
    println!();

    let reports = match bridge.verify_testcases(&testcases).await {
        Ok(reports) => reports,
        Err(e) => {
            eprintln!("{}", render_failure(&e));
            return Ok(false);
        }
    };

    for report in &reports {
        println!("{}", render_report(report));
    }

    let passed = reports.iter().filter(|r| r.passed).count();
    println!("\n📊 {}/{} passed", passed, reports.len());
    Ok(passed == reports.len())
}
