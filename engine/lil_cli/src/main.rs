//! lil engine CLI
//!
//! Headless driver around the scene and the evaluator: run a script
//! against an empty scene, syntax-check a file, or run and dump the scene
//! back out as a script or a JSON document.
//!
//! Exit codes: 0 success, 1 script or parse failure, 2 usage.

use lil_parse::ListPool;
use lil_scene::{Scene, Severity};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(2);
    }

    match args[1].as_str() {
        "run" => {
            if args.len() < 3 {
                eprintln!("Usage: lil run <scene.lil>");
                std::process::exit(2);
            }
            run_command(&args[2]);
        }
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: lil check <file.lil>");
                std::process::exit(2);
            }
            check_command(&args[2]);
        }
        "dump" => {
            if args.len() < 3 {
                eprintln!("Usage: lil dump <scene.lil> [--json]");
                std::process::exit(2);
            }
            let json = args.iter().skip(3).any(|arg| arg == "--json");
            dump_command(&args[2], json);
        }
        "--help" | "-h" | "help" => {
            print_usage();
        }
        other => {
            eprintln!("error: unknown command {other:?}");
            print_usage();
            std::process::exit(2);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: lil <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <scene.lil>           Run a scene script and print a summary");
    eprintln!("  check <file.lil>          Parse a script without running it");
    eprintln!("  dump <scene.lil> [--json] Run a scene script and dump the scene");
}

fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("error: cannot read {path}: {err}");
            std::process::exit(1);
        }
    }
}

/// Execute `text` as the init source of a fresh scene.
fn run_scene(text: &str) -> (Scene, bool) {
    let mut scene = Scene::with_capture_log();
    scene.add_source("init", text);
    let ok = lil_eval::run_source(&mut scene, "init");
    scene.new_frame();
    (scene, ok)
}

/// Print buffered diagnostics: script output to stdout unless `quiet_stdout`
/// (used when stdout carries a document), warnings and errors to stderr.
fn flush_log(scene: &Scene, quiet_stdout: bool) {
    for (severity, message) in scene.log.captured() {
        match severity {
            Severity::Debug => {
                if quiet_stdout {
                    eprintln!("{message}");
                } else {
                    println!("{message}");
                }
            }
            Severity::Warning => eprintln!("warning: {message}"),
            Severity::Error => eprintln!("error: {message}"),
        }
    }
}

fn run_command(path: &str) {
    let text = read_file(path);
    let (scene, ok) = run_scene(&text);
    flush_log(&scene, false);

    let live = scene.nodes.nodes().iter().filter(|n| n.is_alive()).count();
    println!("nodes: {live} live / {} slots", scene.nodes.num_nodes());
    println!("links: {}", scene.nodes.links().len());
    println!("sources: {}", scene.source_names().count());
    let [x, y, z] = scene.camera.pos;
    println!("camera: {x:.6} {y:.6} {z:.6}");

    if !ok {
        std::process::exit(1);
    }
}

fn check_command(path: &str) {
    let text = read_file(path);
    let mut pool = ListPool::with_capacity(256);
    pool.enter_scope();
    let result = lil_parse::parse(&text, &mut pool);
    pool.exit_scope();
    match result {
        Ok(_) => println!("{path}: ok"),
        Err(err) => {
            eprintln!("{path}: {err}");
            std::process::exit(1);
        }
    }
}

fn dump_command(path: &str, json: bool) {
    let text = read_file(path);
    let (scene, ok) = run_scene(&text);
    flush_log(&scene, true);
    if !ok {
        std::process::exit(1);
    }
    if json {
        match scene.to_json() {
            Ok(document) => println!("{document}"),
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        }
    } else {
        println!("{}", scene.save_script());
    }
}
